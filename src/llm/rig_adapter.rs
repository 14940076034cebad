//! Bridges rig's `CompletionModel` to our `LlmProvider` trait.

use async_trait::async_trait;
use rig::completion::message::{AssistantContent, Message};
use rig::completion::{CompletionError, CompletionModel};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::LlmError;

use super::costs;
use super::provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider,
    ResponseFormat, Role,
};

/// Maps a provider-level response schema to rig `additional_params`.
pub type StructuredOutput = fn(&Value) -> Value;

/// Adapter from a rig completion model to `LlmProvider`.
pub struct RigAdapter<M> {
    model: M,
    model_name: String,
    provider: &'static str,
    structured_output: Option<StructuredOutput>,
}

impl<M> RigAdapter<M> {
    pub fn new(model: M, model_name: &str, provider: &'static str) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
            provider,
            structured_output: None,
        }
    }

    /// Enable JSON-schema requests, encoded for this provider by `params`.
    pub fn with_structured_output(mut self, params: StructuredOutput) -> Self {
        self.structured_output = Some(params);
        self
    }
}

/// Split our messages into a rig preamble, chat history and final prompt.
fn to_rig_messages(
    messages: Vec<ChatMessage>,
) -> (Option<String>, Vec<Message>, Option<Message>) {
    let mut system = Vec::new();
    let mut history = Vec::new();
    for message in messages {
        match message.role {
            Role::System => system.push(message.content),
            Role::User => history.push(Message::user(message.content)),
            Role::Assistant => history.push(Message::assistant(message.content)),
        }
    }
    let preamble = (!system.is_empty()).then(|| system.join("\n\n"));
    let prompt = history.pop();
    (preamble, history, prompt)
}

/// Google-style error envelope: `{"error": {"status": ..., "details": [...]}}`.
fn error_envelope(message: &str) -> Option<Value> {
    let start = message.find('{')?;
    let body: Value = serde_json::from_str(&message[start..]).ok()?;
    body.get("error").cloned()
}

/// `"retryDelay": "7s"` from the error details, if present.
fn retry_delay(error: &Value) -> Option<std::time::Duration> {
    error["details"]
        .as_array()?
        .iter()
        .filter_map(|d| d["retryDelay"].as_str())
        .find_map(|raw| raw.strip_suffix('s')?.parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(std::time::Duration::from_secs_f64)
}

fn provider_error(provider: &str, message: String) -> LlmError {
    let envelope = error_envelope(&message);
    let status = envelope
        .as_ref()
        .and_then(|e| e["status"].as_str())
        .unwrap_or_default();

    match status {
        "UNAUTHENTICATED" | "PERMISSION_DENIED" => LlmError::AuthFailed {
            provider: provider.to_string(),
        },
        _ if message.contains("API_KEY_INVALID") => LlmError::AuthFailed {
            provider: provider.to_string(),
        },
        "RESOURCE_EXHAUSTED" => LlmError::RateLimited {
            provider: provider.to_string(),
            retry_after: envelope.as_ref().and_then(retry_delay),
        },
        _ => LlmError::RequestFailed {
            provider: provider.to_string(),
            reason: message,
        },
    }
}

fn map_error(provider: &str, err: CompletionError) -> LlmError {
    match err {
        CompletionError::ProviderError(message) => provider_error(provider, message),
        CompletionError::JsonError(e) => LlmError::Json(e),
        CompletionError::ResponseError(reason) => LlmError::InvalidResponse {
            provider: provider.to_string(),
            reason,
        },
        other => LlmError::RequestFailed {
            provider: provider.to_string(),
            reason: other.to_string(),
        },
    }
}

/// rig drops the provider's finish reason; hitting the token cap means truncation.
fn finish_reason(output_tokens: u64, max_tokens: Option<u32>) -> FinishReason {
    match max_tokens {
        Some(max) if output_tokens >= u64::from(max) => FinishReason::Length,
        _ => FinishReason::Stop,
    }
}

#[async_trait]
impl<M> LlmProvider for RigAdapter<M>
where
    M: CompletionModel + Send + Sync + 'static,
{
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn cost_per_token(&self) -> (Decimal, Decimal) {
        costs::model_cost(&self.model_name)
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let CompletionRequest {
            messages,
            max_tokens,
            temperature,
            response_format,
        } = request;

        let (preamble, history, prompt) = to_rig_messages(messages);
        let prompt = prompt.ok_or_else(|| LlmError::RequestFailed {
            provider: self.provider.to_string(),
            reason: "no user message to send".to_string(),
        })?;

        let mut builder = self.model.completion_request(prompt).messages(history);
        if let Some(preamble) = preamble {
            builder = builder.preamble(preamble);
        }
        if let Some(temperature) = temperature {
            builder = builder.temperature(f64::from(temperature));
        }
        if let Some(max_tokens) = max_tokens {
            builder = builder.max_tokens(u64::from(max_tokens));
        }
        if let ResponseFormat::Json { schema } = &response_format {
            let params = self.structured_output.ok_or_else(|| LlmError::RequestFailed {
                provider: self.provider.to_string(),
                reason: "structured output is not supported by this model".to_string(),
            })?;
            builder = builder.additional_params(params(schema));
        }

        tracing::debug!(provider = self.provider, model = %self.model_name, "Completion request");

        let response = self
            .model
            .completion(builder.build())
            .await
            .map_err(|e| map_error(self.provider, e))?;

        let content: String = response
            .choice
            .iter()
            .filter_map(|c| match c {
                AssistantContent::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect();

        let output_tokens = response.usage.output_tokens;
        Ok(CompletionResponse {
            content,
            input_tokens: u32::try_from(response.usage.input_tokens).unwrap_or(u32::MAX),
            output_tokens: u32::try_from(output_tokens).unwrap_or(u32::MAX),
            finish_reason: finish_reason(output_tokens, max_tokens),
            response_id: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn system_messages_become_preamble() {
        let (preamble, history, prompt) = to_rig_messages(vec![
            ChatMessage::system("be terse"),
            ChatMessage::user("first"),
            ChatMessage::assistant("[]"),
            ChatMessage::system("json only"),
            ChatMessage::user("list mentors"),
        ]);
        assert_eq!(preamble.as_deref(), Some("be terse\n\njson only"));
        assert_eq!(history.len(), 2);
        assert!(prompt.is_some());
    }

    #[test]
    fn system_only_has_no_prompt() {
        let (preamble, history, prompt) = to_rig_messages(vec![ChatMessage::system("hi")]);
        assert!(preamble.is_some());
        assert!(history.is_empty());
        assert!(prompt.is_none());
    }

    #[test]
    fn unauthenticated_maps_to_auth_failed() {
        let body = r#"{"error": {"code": 401, "message": "bad key", "status": "UNAUTHENTICATED"}}"#;
        let err = provider_error("gemini", body.to_string());
        assert!(matches!(err, LlmError::AuthFailed { .. }), "{err}");

        let invalid_key = r#"{"error": {"code": 400, "status": "INVALID_ARGUMENT",
            "details": [{"reason": "API_KEY_INVALID"}]}}"#;
        let err = provider_error("gemini", invalid_key.to_string());
        assert!(matches!(err, LlmError::AuthFailed { .. }), "{err}");
    }

    #[test]
    fn resource_exhausted_carries_retry_delay() {
        let body = r#"Gemini error: {"error": {"code": 429, "status": "RESOURCE_EXHAUSTED",
            "details": [{"@type": "google.rpc.RetryInfo", "retryDelay": "7s"}]}}"#;
        match provider_error("gemini", body.to_string()) {
            LlmError::RateLimited { retry_after, .. } => {
                assert_eq!(retry_after, Some(Duration::from_secs(7)));
            }
            other => panic!("expected rate limit, got {other}"),
        }
    }

    #[test]
    fn other_provider_errors_keep_message() {
        let err = provider_error("gemini", "upstream exploded".to_string());
        match err {
            LlmError::RequestFailed { reason, .. } => assert_eq!(reason, "upstream exploded"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn token_cap_reports_length() {
        assert_eq!(finish_reason(8192, Some(8192)), FinishReason::Length);
        assert_eq!(finish_reason(100, Some(8192)), FinishReason::Stop);
        assert_eq!(finish_reason(100, None), FinishReason::Stop);
    }
}
