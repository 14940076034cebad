//! Error types for mentor-match.

use std::time::Duration;

use crate::wizard::Step;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Mentor generation errors. Callers collapse these to an empty mentor list.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Malformed mentor payload: {reason}")]
    MalformedResponse { reason: String },
}

/// Why a wizard action was rejected.
///
/// In a rendered UI these correspond to controls that are disabled, so they
/// are reported to the caller rather than treated as failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("{action} is not available on the {step} step")]
    NotAllowed { action: &'static str, step: Step },

    #[error("A name is required before choosing a goal")]
    NameRequired,

    #[error("Name must not be empty")]
    EmptyName,

    #[error("Search criteria incomplete, missing: {}", .missing.join(", "))]
    IncompleteCriteria { missing: Vec<&'static str> },

    #[error("Mentor {id} is not in the current recommendations")]
    UnknownMentor { id: String },

    #[error("No mentor selected")]
    NoMentorSelected,

    #[error("Recommendations are still loading")]
    Busy,
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
