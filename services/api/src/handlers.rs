//! Axum Handlers for the REST API
//!
//! Lesson transformation, focus-check quiz generation and the tutor endpoint.
//! It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use eduaccess_core::{
    error::TransformError,
    quiz::parse_quiz,
    sections::TransformationRequest,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    models::{
        AskPayload, AskResponse, AttentionQuizPayload, AttentionQuizResponse, ErrorResponse,
        TransformPayload, TransformResponse,
    },
    state::AppState,
};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

fn require_content(content: &str) -> Result<(), ApiError> {
    if content.trim().is_empty() {
        return Err(ApiError::BadRequest("Content required".to_string()));
    }
    Ok(())
}

/// Health check.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is running", body = String))
)]
pub async fn health() -> &'static str {
    "EduAccess API running"
}

/// Rewrite lesson content into five accessibility renderings.
#[utoipa::path(
    post,
    path = "/api/transform",
    request_body = TransformPayload,
    responses(
        (status = 200, description = "Lesson transformed", body = TransformResponse),
        (status = 400, description = "Empty content", body = ErrorResponse),
        (status = 500, description = "Model unavailable or output unusable", body = ErrorResponse)
    )
)]
pub async fn transform(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TransformPayload>,
) -> Result<Json<TransformResponse>, ApiError> {
    require_content(&payload.content)?;

    let request = TransformationRequest {
        content: payload.content,
    };
    let result = match state.transformer.transform(&request).await {
        Ok(result) => result,
        Err(TransformError::Format { raw }) => {
            error!(raw = %raw, "Model output did not follow the section format");
            return Err(ApiError::InternalServerError(anyhow::anyhow!(
                "unusable transform output"
            )));
        }
        Err(e) => return Err(e.into()),
    };

    info!(len = request.content.len(), "Transform request served");
    Ok(Json(TransformResponse {
        success: true,
        result,
    }))
}

/// Generate one focus-recovery quiz for lesson content.
#[utoipa::path(
    post,
    path = "/api/quiz/attention",
    request_body = AttentionQuizPayload,
    responses(
        (status = 200, description = "Quiz generated", body = AttentionQuizResponse),
        (status = 400, description = "Empty content", body = ErrorResponse),
        (status = 500, description = "Quiz generation failed", body = ErrorResponse)
    )
)]
pub async fn attention_quiz(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AttentionQuizPayload>,
) -> Result<Json<AttentionQuizResponse>, ApiError> {
    require_content(&payload.content)?;

    let quiz = state
        .quiz_generator
        .generate(&payload.content)
        .await
        .inspect_err(|e| warn!(error = %e, "Attention quiz generation failed"))?;
    let blocks = parse_quiz(&quiz).into_blocks();

    Ok(Json(AttentionQuizResponse { quiz, blocks }))
}

/// Ask the tutor a question about a lesson.
#[utoipa::path(
    post,
    path = "/api/agent/ask",
    request_body = AskPayload,
    responses(
        (status = 200, description = "Tutor answer", body = AskResponse),
        (status = 400, description = "Empty question", body = ErrorResponse),
        (status = 500, description = "Model unavailable", body = ErrorResponse)
    )
)]
pub async fn ask_tutor(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AskPayload>,
) -> Result<Json<AskResponse>, ApiError> {
    if payload.question.trim().is_empty() {
        return Err(ApiError::BadRequest("Question required".to_string()));
    }

    let answer = state
        .transformer
        .ask_tutor(&payload.lesson, &payload.question)
        .await?;
    Ok(Json(AskResponse { answer }))
}
