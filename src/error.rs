use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Position outside the question set
    #[error("question index {0} is outside the question set")]
    IllegalQuestion(usize),

    /// Empty answer value
    #[error("answer for question {0} is empty")]
    IllegalAnswer(usize),

    #[error("invalid question bank: {0}")]
    InvalidBank(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Telemetry Error: {0}")]
    Telemetry(#[from] crate::telemetry::TelemetryError),
}
