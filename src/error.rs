use thiserror::Error;

#[derive(Error, Debug)]
pub enum UtilError {
    #[error("Parse error: {message} in {input:?}")]
    Parse { message: String, input: String },
    #[error("Record error: {0}")]
    Record(String),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, UtilError>;

impl UtilError {
    pub(crate) fn parse(message: impl Into<String>, input: &str) -> Self {
        Self::Parse { message: message.into(), input: input.to_string() }
    }
}

// Helper conversions
impl From<config::ConfigError> for UtilError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for UtilError {
    fn from(e: serde_json::Error) -> Self { Self::Record(e.to_string()) }
}
