//! WebSocket Focus Sessions
//!
//! - `protocol`: the JSON message format between the browser and the server.
//! - `session`: connection lifecycle, bridging the socket to a core `FocusSession`.

pub mod protocol;
pub mod session;

pub use session::ws_handler;
