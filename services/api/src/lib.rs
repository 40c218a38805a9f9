//! EduAccess API Library Crate
//!
//! The web service around `eduaccess-core`: configuration, application state,
//! REST handlers, the focus-session WebSocket and routing. The `api` binary is
//! a thin wrapper around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod ws;
