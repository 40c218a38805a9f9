//! Quiz Generation Service
//!
//! Produces a focus-check quiz for a piece of lesson content. The generator is
//! a trait so sessions can run against the model-backed implementation, a
//! static one for development, or a test double.

use crate::{
    error::QuizGenerationError,
    llm_client::{CompletionRequest, CompletionService},
    prompt::{QUIZ_CONTENT_LIMIT, quiz_prompt, truncate_chars},
    quiz::{QuizFormat, QuizOutput},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Defines the contract for any service that can generate a focus-check quiz.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Generates one quiz from `content`.
    ///
    /// Structured generators must return output that satisfies the declared
    /// schema; anything else is reported as [`QuizGenerationError::Schema`].
    async fn generate(&self, content: &str) -> Result<QuizOutput, QuizGenerationError>;
}

/// A `QuizGenerator` that prompts a completion service.
pub struct LLMQuizGenerator {
    client: Arc<dyn CompletionService>,
    format: QuizFormat,
}

impl LLMQuizGenerator {
    pub fn new(client: Arc<dyn CompletionService>, format: QuizFormat) -> Self {
        Self { client, format }
    }
}

#[async_trait]
impl QuizGenerator for LLMQuizGenerator {
    async fn generate(&self, content: &str) -> Result<QuizOutput, QuizGenerationError> {
        let prompt = quiz_prompt(truncate_chars(content, QUIZ_CONTENT_LIMIT), self.format);
        let request = CompletionRequest::user_only(prompt)
            .with_temperature(0.6)
            .with_max_tokens(300);

        let raw = self
            .client
            .complete(request)
            .await
            .map_err(QuizGenerationError::Transport)?;
        debug!(format = ?self.format, len = raw.len(), "Quiz generator answered");

        match self.format {
            QuizFormat::Structured => decode_structured(&raw),
            QuizFormat::Freeform => Ok(QuizOutput::Freeform(raw)),
        }
    }
}

/// Decodes a structured quiz answer strictly; nothing is repaired.
fn decode_structured(raw: &str) -> Result<QuizOutput, QuizGenerationError> {
    let schema_error = || QuizGenerationError::Schema {
        raw: raw.to_string(),
    };

    let value: serde_json::Value = serde_json::from_str(raw.trim()).map_err(|e| {
        warn!(error = %e, "Quiz JSON parse failed");
        schema_error()
    })?;

    match QuizOutput::from_value(value) {
        Some(QuizOutput::Structured(quiz)) if quiz.is_well_formed() => {
            Ok(QuizOutput::Structured(quiz))
        }
        _ => Err(schema_error()),
    }
}

/// A `QuizGenerator` returning the same freeform quiz for every request.
///
/// Useful for running the service without a model and in integration tests.
pub struct StaticQuizGenerator {
    text: String,
}

impl StaticQuizGenerator {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Default for StaticQuizGenerator {
    fn default() -> Self {
        Self::new("1. Which part of the lesson did you just read?\nThe introduction\nThe main idea\nThe summary\nI am not sure")
    }
}

#[async_trait]
impl QuizGenerator for StaticQuizGenerator {
    async fn generate(&self, _content: &str) -> Result<QuizOutput, QuizGenerationError> {
        Ok(QuizOutput::Freeform(self.text.clone()))
    }
}
