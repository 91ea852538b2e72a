//! Reads statements as JSON from stdin and prints one line per statement:
//! its normalized timestamp and its `actor verb object` display.
//!
//! ```text
//! xapi-util [settings-file] < statements.json
//! ```

use std::io::{self, Read};
use std::process::ExitCode;

use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use xapi_util::record::Statement;
use xapi_util::resolver::EntityResolver;
use xapi_util::settings::Settings;

fn main() -> ExitCode {
    let settings_path = std::env::args().nth(1);
    let settings = match Settings::load(settings_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        warn!(error = %e, "could not read stdin");
        return ExitCode::FAILURE;
    }

    let resolver = EntityResolver::new(settings.locale());
    let mut shown = 0usize;
    let mut rejected = 0usize;
    // accepts a single statement, an array of them, or one per line
    for value in serde_json::Deserializer::from_str(&input).into_iter::<Value>() {
        let value = match value {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "malformed JSON, stopping");
                rejected += 1;
                break;
            }
        };
        let records = match value {
            Value::Array(items) => items,
            other => vec![other],
        };
        for record in records {
            match serde_json::from_value::<Statement>(record) {
                Ok(statement) => {
                    let when = statement
                        .timestamp
                        .or(statement.stored)
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!("{}\t{}", when, resolver.statement_display(&statement));
                    shown += 1;
                }
                Err(e) => {
                    warn!(error = %e, "skipping record");
                    rejected += 1;
                }
            }
        }
    }
    info!(shown, rejected, "done");
    if rejected > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
