//! Mentor generation: prompts the LLM for structured mentor profiles and
//! validates what comes back.

pub mod parse;
pub mod prompt;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::GenerationError;
use crate::llm::costs;
use crate::llm::provider::{ChatMessage, CompletionRequest, FinishReason, LlmProvider};
use crate::model::{LearningGoal, Mentor};
use crate::wizard::SearchCriteria;

pub use parse::{fallback_avatar, is_secure_url, parse_mentors};
pub use prompt::{PHOTO_POOL, mentor_prompt, response_schema};

/// Everything one generation call is parameterised by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub goal: LearningGoal,
    pub criteria: SearchCriteria,
}

/// Configuration for mentor generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of profiles requested per search.
    pub mentor_count: usize,
    /// LLM temperature.
    pub temperature: f32,
    /// Max tokens for the LLM response.
    pub max_tokens: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mentor_count: 6,
            temperature: 0.7,
            max_tokens: 8192,
        }
    }
}

/// Generates mentor recommendations with a single LLM call per search.
pub struct MentorGenerator {
    llm: Arc<dyn LlmProvider>,
    config: GeneratorConfig,
}

impl MentorGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>, config: GeneratorConfig) -> Self {
        Self { llm, config }
    }

    /// Issue exactly one completion call and validate the result.
    ///
    /// No retries; every failure is returned to the caller.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<Mentor>, GenerationError> {
        let industry = request.criteria.industry;
        info!(
            goal = %request.goal,
            industry = %industry,
            count = self.config.mentor_count,
            "Generating mentor recommendations"
        );

        let llm_request = CompletionRequest::new(vec![ChatMessage::user(mentor_prompt(
            request,
            self.config.mentor_count,
        ))])
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens)
        .with_json_schema(response_schema());

        let response = self.llm.complete(llm_request).await?;

        if response.finish_reason == FinishReason::Length {
            warn!(
                output_tokens = response.output_tokens,
                "Mentor generation hit the token limit; payload may be truncated"
            );
        }

        let mentors = parse_mentors(&response.content, industry)?;

        let cost = costs::call_cost(
            self.llm.cost_per_token(),
            response.input_tokens,
            response.output_tokens,
        );
        info!(
            count = mentors.len(),
            model = self.llm.model_name(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            cost_usd = %cost,
            "Generated mentor recommendations"
        );

        Ok(mentors)
    }
}
