//! Lesson Transformation Service
//!
//! Drives one request through the five-section protocol: prompt, completion,
//! extraction, validation. The completion service is injected so several
//! transformers (and test doubles) can coexist.

use crate::{
    error::TransformError,
    llm_client::{CompletionRequest, CompletionService},
    prompt::{transform_system_prompt, tutor_prompt},
    sections::{TransformationRequest, TransformationResult, extract_sections, validate},
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Rewrites lesson content into the five accessibility renderings.
pub struct LessonTransformer {
    client: Arc<dyn CompletionService>,
}

impl LessonTransformer {
    pub fn new(client: Arc<dyn CompletionService>) -> Self {
        Self { client }
    }

    /// Runs one transformation.
    ///
    /// Either every section is returned (some possibly empty) or the whole
    /// call fails; there is no partial result.
    pub async fn transform(
        &self,
        request: &TransformationRequest,
    ) -> Result<TransformationResult, TransformError> {
        let completion = CompletionRequest::new(transform_system_prompt(), request.content.clone())
            .with_temperature(0.6)
            .with_max_tokens(2500);

        let raw = self
            .client
            .complete(completion)
            .await
            .map_err(TransformError::Transport)?;
        debug!(len = raw.len(), "Transform completion received");

        let result = validate(extract_sections(&raw), &raw)?;
        info!(
            usable_sections = result
                .iter()
                .filter(|(_, s)| crate::sections::is_usable(s))
                .count(),
            "Lesson transformed"
        );
        Ok(result)
    }

    /// Answers a learner's question about a lesson.
    pub async fn ask_tutor(&self, lesson: &str, question: &str) -> Result<String> {
        let request = CompletionRequest::user_only(tutor_prompt(lesson, question))
            .with_temperature(0.7)
            .with_max_tokens(1000);
        self.client.complete(request).await
    }
}
