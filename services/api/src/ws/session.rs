//! Manages the WebSocket connection lifecycle for a focus session.

use super::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use anyhow::Result;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use eduaccess_core::session::{FocusSession, SessionEvent, SessionHandle};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use std::sync::Arc;
use tokio::sync::{
    Mutex,
    mpsc::{self, UnboundedReceiver},
};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Face-tracker samples buffered per connection before new ones are dropped.
const SAMPLE_BUFFER: usize = 64;

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// A running focus session bound to this connection.
struct ActiveSession {
    handle: SessionHandle,
    samples: mpsc::Sender<Option<bool>>,
    events: UnboundedReceiver<SessionEvent>,
}

impl ActiveSession {
    fn start(state: &AppState, content: String) -> Self {
        let (samples, sample_rx) = mpsc::channel(SAMPLE_BUFFER);
        let (handle, events) = FocusSession::start(
            state.session_config.clone(),
            content,
            state.quiz_generator.clone(),
            ReceiverStream::new(sample_rx),
        );
        Self {
            handle,
            samples,
            events,
        }
    }
}

#[instrument(name = "ws_session", skip_all, fields(session_id))]
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4();
    tracing::Span::current().record("session_id", &session_id.to_string());
    info!("New WebSocket connection.");

    let (socket_tx, socket_rx) = socket.split();
    let socket_tx = Arc::new(Mutex::new(socket_tx));

    if let Err(e) = run_connection(&state, &socket_tx, socket_rx).await {
        error!(error = ?e, "Focus session connection terminated with error.");
    }
    info!("WebSocket connection closed.");
}

/// The main event loop of one connection.
///
/// Client messages drive the session; session events are forwarded to the
/// client as they arrive. Closing the socket stops any running session.
async fn run_connection(
    state: &AppState,
    socket_tx: &Arc<Mutex<SplitSink<WebSocket, Message>>>,
    mut socket_rx: SplitStream<WebSocket>,
) -> Result<()> {
    let mut active: Option<ActiveSession> = None;

    let outcome = loop {
        tokio::select! {
            msg_result = socket_rx.next() => {
                let text = match msg_result {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Client closed the connection.");
                        break Ok(());
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        error!("Error receiving from client WebSocket: {:?}", e);
                        break Ok(());
                    }
                };

                let reply = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(msg) => handle_client_message(state, &mut active, msg).await,
                    Err(e) => {
                        warn!(error = %e, "Ignoring malformed client message.");
                        Some(ServerMessage::Error { message: format!("Invalid message: {}", e) })
                    }
                };
                if let Some(reply) = reply {
                    if let Err(e) = send_msg(&mut *socket_tx.lock().await, reply).await {
                        break Err(e);
                    }
                }
            },
            Some(event) = next_event(&mut active) => {
                let stopped = event == SessionEvent::Stopped;
                if let Err(e) = send_msg(&mut *socket_tx.lock().await, event.into()).await {
                    break Err(e);
                }
                if stopped {
                    active = None;
                }
            },
        }
    };

    if let Some(session) = active.take() {
        session.handle.stop().await;
    }
    outcome
}

/// Applies one client message. Returns an immediate reply, if any.
async fn handle_client_message(
    state: &AppState,
    active: &mut Option<ActiveSession>,
    msg: ClientMessage,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::StartTracking { content } => {
            if active.is_some() {
                return Some(ServerMessage::Error {
                    message: "Tracking already started.".to_string(),
                });
            }
            *active = Some(ActiveSession::start(state, content));
            info!("Attention tracking started.");
            return Some(ServerMessage::TrackingStarted);
        }
        ClientMessage::StopTracking => {
            if let Some(ActiveSession {
                handle, mut events, ..
            }) = active.take()
            {
                handle.stop().await;
                // Drain what the session emitted while shutting down; it ends with `Stopped`.
                while events.recv().await.is_some() {}
                info!("Attention tracking stopped.");
                return Some(ServerMessage::TrackingStopped);
            }
            return Some(not_tracking());
        }
        _ => {}
    }

    let Some(session) = active.as_ref() else {
        return Some(not_tracking());
    };
    let delivered = match msg {
        ClientMessage::Sample { centered } => {
            if session.samples.try_send(centered).is_err() {
                debug!("Sample buffer full, dropping sample.");
            }
            true
        }
        ClientMessage::Boost => session.handle.boost(),
        ClientMessage::AnswerQuiz { block, option } => session.handle.answer_quiz(block, option),
        ClientMessage::DismissQuiz => session.handle.dismiss_quiz(),
        ClientMessage::SetContent { content } => session.handle.set_content(content),
        ClientMessage::StartTracking { .. } | ClientMessage::StopTracking => true,
    };
    if !delivered {
        warn!("Focus session is no longer running.");
    }
    None
}

fn not_tracking() -> ServerMessage {
    ServerMessage::Error {
        message: "Tracking has not started.".to_string(),
    }
}

/// Next event of the active session; pending forever when there is none.
async fn next_event(active: &mut Option<ActiveSession>) -> Option<SessionEvent> {
    match active {
        Some(session) => session.events.recv().await,
        None => std::future::pending().await,
    }
}

/// A helper function to serialize and send a `ServerMessage` to the client.
pub(crate) async fn send_msg(
    socket_tx: &mut SplitSink<WebSocket, Message>,
    msg: ServerMessage,
) -> Result<()> {
    let serialized = serde_json::to_string(&msg)?;
    socket_tx.send(Message::Text(serialized.into())).await?;
    Ok(())
}
