//! Configuration types.

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::generation::GeneratorConfig;
use crate::llm::{DEFAULT_GEMINI_API_BASE, LlmBackend, LlmConfig};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Application configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub generator: GeneratorConfig,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let model = lookup("MENTOR_MATCH_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base =
            lookup("MENTOR_MATCH_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string());

        let defaults = GeneratorConfig::default();
        let mentor_count = match lookup("MENTOR_MATCH_MENTOR_COUNT") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "MENTOR_MATCH_MENTOR_COUNT".to_string(),
                        message: format!("expected a positive integer, got {raw:?}"),
                    });
                }
            },
            None => defaults.mentor_count,
        };
        let temperature = match lookup("MENTOR_MATCH_TEMPERATURE") {
            Some(raw) => match raw.parse::<f32>() {
                Ok(t) if (0.0..=2.0).contains(&t) => t,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "MENTOR_MATCH_TEMPERATURE".to_string(),
                        message: format!("expected a number between 0 and 2, got {raw:?}"),
                    });
                }
            },
            None => defaults.temperature,
        };

        Ok(Self {
            llm: LlmConfig {
                backend: LlmBackend::Gemini,
                api_key: SecretString::from(api_key),
                model,
                api_base,
            },
            generator: GeneratorConfig {
                mentor_count,
                temperature,
                ..defaults
            },
        })
    }
}
