//! Defines the WebSocket message protocol between the browser client and the API server.

use eduaccess_core::{mode::AdaptiveMode, quiz::QuizBlock, session::SessionEvent};
use serde::{Deserialize, Serialize};

/// Messages sent from the client (browser) to the server.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Starts attention tracking for a lesson. Must precede every other message.
    StartTracking {
        #[serde(default)]
        content: String,
    },
    /// One face-tracker observation. `centered` is null when no face was detected.
    Sample {
        #[serde(default)]
        centered: Option<bool>,
    },
    /// The learner pressed the focus-boost button.
    Boost,
    /// Picks option `option` of quiz block `block`.
    AnswerQuiz {
        #[serde(default)]
        block: usize,
        option: usize,
    },
    DismissQuiz,
    /// Replaces the lesson content used for future quizzes.
    SetContent { content: String },
    StopTracking,
}

/// Messages sent from the server to the client (browser).
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    TrackingStarted,
    Attention {
        engagement: u8,
        reward: u8,
        mode: AdaptiveMode,
        cooldown_active: bool,
        low_focus: bool,
    },
    /// Engagement recorded at each decay tick, oldest first.
    History { scores: Vec<u8> },
    QuizLoading,
    Quiz { blocks: Vec<QuizBlock> },
    /// `correct` is null when the quiz did not carry its answer.
    QuizAnswered { correct: Option<bool> },
    QuizFailed { message: String },
    TrackingStopped,
    /// Reports a protocol error to the client. The connection stays open.
    Error { message: String },
}

impl From<SessionEvent> for ServerMessage {
    fn from(event: SessionEvent) -> Self {
        match event {
            SessionEvent::Attention(snapshot) => ServerMessage::Attention {
                engagement: snapshot.engagement,
                reward: snapshot.reward,
                mode: snapshot.mode,
                cooldown_active: snapshot.cooldown_active,
                low_focus: snapshot.low_focus,
            },
            SessionEvent::History(scores) => ServerMessage::History { scores },
            SessionEvent::QuizLoading => ServerMessage::QuizLoading,
            SessionEvent::QuizReady(blocks) => ServerMessage::Quiz { blocks },
            SessionEvent::QuizAnswered { correct } => ServerMessage::QuizAnswered { correct },
            SessionEvent::QuizFailed { message } => ServerMessage::QuizFailed { message },
            SessionEvent::Stopped => ServerMessage::TrackingStopped,
        }
    }
}
