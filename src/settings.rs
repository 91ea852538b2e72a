// a settings file and XAPI_UTIL_* environment variables, in that order
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::Result;
use crate::language::{LocaleProvider, StaticLocale, SystemLocale};

pub const DEFAULT_SETTINGS_FILE: &str = "xapi-util";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Overrides the language reported by the system when set.
    #[serde(default)]
    pub language: Option<String>,
    /// Filter directive handed to the log subscriber.
    #[serde(default = "default_log")]
    pub log: String,
}

fn default_log() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self { language: None, log: default_log() }
    }
}

impl Settings {
    /// Reads the optional settings file (any format `config` knows, found by
    /// its stem) and then the environment.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = File::with_name(path.unwrap_or(DEFAULT_SETTINGS_FILE)).required(path.is_some());
        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("XAPI_UTIL"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// The configured language when present, otherwise the system locale.
    pub fn locale(&self) -> Box<dyn LocaleProvider + Send + Sync> {
        match self.language.as_deref().filter(|l| !l.is_empty()) {
            Some(tag) => Box::new(StaticLocale::new(tag)),
            None => Box::new(SystemLocale),
        }
    }
}
