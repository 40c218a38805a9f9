//! EduAccess Core
//!
//! The five-section lesson transformation protocol and the attention-driven
//! focus session: prompt construction, section extraction and validation,
//! attention tracking, quiz scheduling and parsing, and adaptive mode
//! selection.

pub mod attention;
pub mod error;
pub mod generator;
pub mod llm_client;
pub mod mode;
pub mod prompt;
pub mod quiz;
pub mod scheduler;
pub mod sections;
pub mod session;
pub mod timer;
pub mod transform;
