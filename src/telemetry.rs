use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Targets whose verbosity follows `WELLNESS_LOG_LEVEL`: the library and the
/// bulk binary. Everything else stays at `warn`.
const TARGETS: [&str; 2] = ["wellness_check", "bulk"];

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter { value: String, source: ParseError },
    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Turns the configured level into filter directives. A bare level such as
/// `debug` applies to this crate only; anything containing `=` or `,` is
/// taken as a complete filter.
pub fn directives(config: &AppConfig) -> String {
    let level = config.log_level.trim();
    if level.contains(['=', ',']) {
        return level.to_string();
    }
    let mut directives = TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>();
    directives.push("warn".to_string());
    directives.join(",")
}

pub fn filter(config: &AppConfig) -> Result<EnvFilter, TelemetryError> {
    let value = directives(config);
    EnvFilter::try_new(&value).map_err(|source| TelemetryError::EnvFilter { value, source })
}

/// Installs the global subscriber. `RUST_LOG` wins over the configuration.
///
/// Logs go to stderr so they never mix with questionnaire output.
pub fn init(config: &AppConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => filter(config)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
