//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the service clients
//! and tunables shared by every handler and WebSocket session.

use eduaccess_core::{generator::QuizGenerator, session::SessionConfig, transform::LessonTransformer};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub transformer: Arc<LessonTransformer>,
    pub quiz_generator: Arc<dyn QuizGenerator>,
    pub session_config: SessionConfig,
}
