use std::env;
use std::path::PathBuf;

use crate::scoring::EngineOptions;

pub const DEFAULT_RESULTS_PATH: &str = "results/assessments.jsonl";

/// Top-level configuration, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub log_level: String,
    /// Question bank file; the embedded bank is used when unset.
    pub question_bank: Option<PathBuf>,
    pub engine: EngineOptions,
    pub results_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            question_bank: None,
            engine: EngineOptions::default(),
            results_path: PathBuf::from(DEFAULT_RESULTS_PATH),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let log_level = lookup("WELLNESS_LOG_LEVEL").unwrap_or(defaults.log_level);
        let question_bank = lookup("WELLNESS_QUESTION_BANK")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let allow_overlap_counting = match lookup("WELLNESS_ALLOW_OVERLAP") {
            Some(value) => parse_bool("WELLNESS_ALLOW_OVERLAP", &value)?,
            None => defaults.engine.allow_overlap_counting,
        };
        let results_path = lookup("WELLNESS_RESULTS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.results_path);

        Ok(Self {
            log_level,
            question_bank,
            engine: EngineOptions {
                allow_overlap_counting,
            },
            results_path,
        })
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a boolean, got {value:?}")]
    InvalidBool { key: &'static str, value: String },
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.engine.allow_overlap_counting);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("WELLNESS_LOG_LEVEL", "debug"),
            ("WELLNESS_QUESTION_BANK", "data/bank.json"),
            ("WELLNESS_ALLOW_OVERLAP", "off"),
            ("WELLNESS_RESULTS_PATH", "/tmp/out.jsonl"),
        ]))
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.question_bank, Some(PathBuf::from("data/bank.json")));
        assert!(!config.engine.allow_overlap_counting);
        assert_eq!(config.results_path, PathBuf::from("/tmp/out.jsonl"));
    }

    #[test]
    fn test_invalid_bool() {
        let err = AppConfig::from_lookup(lookup(&[("WELLNESS_ALLOW_OVERLAP", "sometimes")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { .. }));
    }
}
