//! LLM integration for mentor-match.
//!
//! Mentor generation goes through the `LlmProvider` trait so the wizard can be
//! driven by a stub in tests. The only real backend is Gemini, reached through
//! rig-core and bridged by `RigAdapter`; structured output is requested with a
//! Gemini response schema.

pub mod costs;
pub mod provider;
mod rig_adapter;

pub use provider::*;
pub use rig_adapter::{RigAdapter, StructuredOutput};

use std::sync::Arc;

use rig::client::CompletionClient;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use crate::error::LlmError;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Gemini,
}

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: SecretString,
    pub model: String,
    pub api_base: String,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.backend {
        LlmBackend::Gemini => create_gemini_provider(config),
    }
}

fn create_gemini_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    use rig::providers::gemini;

    let client = gemini::Client::<reqwest::Client>::builder()
        .api_key(config.api_key.expose_secret())
        .base_url(config.api_base.trim_end_matches('/'))
        .build()
        .map_err(|e| LlmError::RequestFailed {
            provider: "gemini".to_string(),
            reason: format!("Failed to create Gemini client: {}", e),
        })?;

    let model = client.completion_model(&config.model);
    tracing::info!("Using Gemini (model: {})", config.model);
    Ok(Arc::new(
        RigAdapter::new(model, &config.model, "gemini")
            .with_structured_output(gemini_structured_output),
    ))
}

/// `generationConfig` asking Gemini for JSON constrained by `schema`.
pub fn gemini_structured_output(schema: &Value) -> Value {
    json!({
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": schema,
        }
    })
}
