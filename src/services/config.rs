// src/services/config.rs
use crate::core::aggregate::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::error::ConfigurationError;
use log::{error, info};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_TEMPERATURE: f64 = 0.0;
pub const DEFAULT_OPENAI_API_VERSION: &str = "2023-07-01-preview";
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Service credentials and tunables, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub document_endpoint: String,
    pub document_key: String,
    pub openai_endpoint: String,
    pub openai_key: String,
    pub openai_model: String,
    pub openai_temperature: f64,
    pub openai_api_version: String,
    pub templates_dir: PathBuf,
    pub confidence_threshold: f64,
}

impl Settings {
    /// Load settings from the environment; a `.env` file is honored when
    /// present. Every missing required variable is reported at once.
    pub fn from_env() -> Result<Settings, ConfigurationError> {
        let _ = dotenvy::dotenv();
        info!("Loading environment variables...");

        let mut missing = Vec::new();
        let document_endpoint = require("DOCUMENT_ENDPOINT", &mut missing);
        let document_key = require("DOCUMENT_KEY", &mut missing);
        let openai_endpoint = require("OPENAI_ENDPOINT", &mut missing);
        let openai_key = require("OPENAI_KEY", &mut missing);

        if !missing.is_empty() {
            error!("Missing required environment variables: {}", missing.join(", "));
            return Err(ConfigurationError::MissingEnv(missing));
        }

        let settings = Settings {
            document_endpoint,
            document_key,
            openai_endpoint,
            openai_key,
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            openai_temperature: parse_f64("OPENAI_TEMPERATURE", DEFAULT_OPENAI_TEMPERATURE)?,
            openai_api_version: env::var("OPENAI_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_OPENAI_API_VERSION.to_string()),
            templates_dir: PathBuf::from(
                env::var("TEMPLATES_DIR").unwrap_or_else(|_| DEFAULT_TEMPLATES_DIR.to_string()),
            ),
            confidence_threshold: parse_f64(
                "OCR_CONFIDENCE_THRESHOLD",
                DEFAULT_CONFIDENCE_THRESHOLD,
            )?,
        };

        info!("Environment variables loaded successfully");
        Ok(settings)
    }
}

fn require(name: &str, missing: &mut Vec<String>) -> String {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            missing.push(name.to_string());
            String::new()
        }
    }
}

fn parse_f64(name: &str, default: f64) -> Result<f64, ConfigurationError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw.parse::<f64>().map_err(|_| {
            error!("Invalid numeric value for {}: {:?}", name, raw);
            ConfigurationError::InvalidValue {
                name: name.to_string(),
                value: raw,
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment mutation is process-global, so everything lives in one
    // test to keep it race-free under the parallel test runner.
    #[test]
    fn from_env_reports_missing_and_loads_when_complete() {
        for name in [
            "DOCUMENT_ENDPOINT",
            "DOCUMENT_KEY",
            "OPENAI_ENDPOINT",
            "OPENAI_KEY",
            "OPENAI_TEMPERATURE",
            "OCR_CONFIDENCE_THRESHOLD",
        ] {
            env::remove_var(name);
        }

        let err = Settings::from_env().unwrap_err();
        match err {
            ConfigurationError::MissingEnv(names) => {
                assert_eq!(names.len(), 4);
                assert!(names.contains(&"DOCUMENT_KEY".to_string()));
            }
            other => panic!("expected MissingEnv, got {:?}", other),
        }

        env::set_var("DOCUMENT_ENDPOINT", "https://ocr.example.com/");
        env::set_var("DOCUMENT_KEY", "doc-key");
        env::set_var("OPENAI_ENDPOINT", "https://llm.example.com/");
        env::set_var("OPENAI_KEY", "llm-key");

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.document_endpoint, "https://ocr.example.com/");
        assert_eq!(settings.openai_model, DEFAULT_OPENAI_MODEL);
        assert_eq!(settings.openai_temperature, DEFAULT_OPENAI_TEMPERATURE);
        assert_eq!(settings.confidence_threshold, DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(settings.templates_dir, PathBuf::from(DEFAULT_TEMPLATES_DIR));

        env::set_var("OCR_CONFIDENCE_THRESHOLD", "not-a-number");
        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
        env::remove_var("OCR_CONFIDENCE_THRESHOLD");
    }
}
