//! API Models
//!
//! Request and response bodies of the REST API, annotated for OpenAPI
//! generation with `utoipa`.

use eduaccess_core::{
    quiz::{QuizBlock, QuizOutput},
    sections::TransformationResult,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema, Debug)]
pub struct TransformPayload {
    #[schema(example = "Photosynthesis turns light into chemical energy.")]
    pub content: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct TransformResponse {
    pub success: bool,
    /// One rendering per section: `visual`, `hearing`, `dyslexia`, `adhd`, `study_plan`.
    #[schema(value_type = Object)]
    pub result: TransformationResult,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct AttentionQuizPayload {
    #[schema(example = "Photosynthesis turns light into chemical energy.")]
    pub content: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct AttentionQuizResponse {
    /// The generator's answer as produced: a `{q, options, correctIndex}`
    /// object or freeform text.
    #[schema(value_type = Object)]
    pub quiz: QuizOutput,
    /// The same quiz resolved into renderable question blocks.
    #[schema(value_type = Vec<Object>)]
    pub blocks: Vec<QuizBlock>,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct AskPayload {
    #[schema(example = "Why do plants need sunlight?")]
    pub question: String,
    #[serde(default)]
    pub lesson: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduaccess_core::quiz::StructuredQuiz;
    use serde_json::json;

    #[test]
    fn test_transform_payload_missing_field() {
        let result: Result<TransformPayload, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_ask_payload_lesson_is_optional() {
        let payload: AskPayload = serde_json::from_str(r#"{"question": "What is ATP?"}"#).unwrap();
        assert_eq!(payload.question, "What is ATP?");
        assert!(payload.lesson.is_empty());
    }

    #[test]
    fn test_transform_response_uses_section_keys() {
        let response = TransformResponse {
            success: true,
            result: TransformationResult {
                visual: "v".to_string(),
                study_plan: "plan".to_string(),
                ..Default::default()
            },
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["result"]["visual"], json!("v"));
        assert_eq!(value["result"]["study_plan"], json!("plan"));
    }

    #[test]
    fn test_structured_quiz_response_keeps_wire_names() {
        let structured = StructuredQuiz {
            q: "Which gas do plants absorb?".to_string(),
            options: vec!["O2".into(), "CO2".into(), "N2".into(), "He".into()],
            correct_index: 1,
        };
        let response = AttentionQuizResponse {
            blocks: vec![QuizBlock {
                question: structured.q.clone(),
                options: structured.options.clone(),
                correct_index: Some(1),
            }],
            quiz: QuizOutput::Structured(structured),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["quiz"]["correctIndex"], json!(1));
        assert_eq!(value["blocks"][0]["correctIndex"], json!(1));
        assert_eq!(value["blocks"][0]["options"][1], json!("CO2"));
    }

    #[test]
    fn test_freeform_quiz_serializes_as_text() {
        let response = AttentionQuizResponse {
            quiz: QuizOutput::Freeform("1. Q?\nA\nB".to_string()),
            blocks: vec![],
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"quiz":"1. Q?\nA\nB","blocks":[]}"#);
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse {
            message: "Content required".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, r#"{"message":"Content required"}"#);
    }
}
