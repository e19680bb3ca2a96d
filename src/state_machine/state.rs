//! Session controller state types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Controller state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    /// Ready for user input, no pending reply
    #[default]
    Idle,

    /// User message accepted, reply scheduled
    AwaitingResponse {
        /// The submitted text the reply will answer
        prompt: String,
        /// Transcript index of the user message; matches the timer that fires
        ticket: usize,
    },
}

impl SessionState {
    pub fn is_awaiting(&self) -> bool {
        matches!(self, SessionState::AwaitingResponse { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingResponse { .. } => "awaiting_response",
        }
    }
}

/// Default simulated "thinking" time before a reply
pub const DEFAULT_RESPONSE_DELAY: Duration = Duration::from_millis(500);

/// Context for a session (immutable configuration)
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub response_delay: Duration,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, response_delay: Duration) -> Self {
        Self {
            session_id: session_id.into(),
            response_delay,
        }
    }
}
