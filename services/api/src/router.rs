//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API, WebSocket endpoint, and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        AskPayload, AskResponse, AttentionQuizPayload, AttentionQuizResponse, ErrorResponse,
        TransformPayload, TransformResponse,
    },
    state::AppState,
    ws::ws_handler,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::transform,
        handlers::attention_quiz,
        handlers::ask_tutor,
    ),
    components(
        schemas(TransformPayload, TransformResponse, AttentionQuizPayload, AttentionQuizResponse, AskPayload, AskResponse, ErrorResponse)
    ),
    tags(
        (name = "EduAccess API", description = "Accessible lesson transformation and focus-check quizzes")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/", get(handlers::health))
        .route("/api/transform", post(handlers::transform))
        .route("/api/quiz/attention", post(handlers::attention_quiz))
        .route("/api/agent/ask", post(handlers::ask_tutor))
        .route("/api/ws", get(ws_handler))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
