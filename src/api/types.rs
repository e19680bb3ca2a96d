//! API request and response types

use crate::workspace::SessionView;
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Request to open a specific file; an absent body opens an untitled one
#[derive(Debug, Deserialize)]
pub struct CreateFileRequest {
    pub name: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub content: String,
}

fn default_language() -> String {
    "javascript".to_string()
}

/// Editor `onChange` payload
#[derive(Debug, Deserialize)]
pub struct EditFileRequest {
    /// File the editor was showing when the text changed
    pub index: usize,
    pub content: String,
}

/// Response with a session snapshot
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: SessionView,
}

/// Response for chat action
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub queued: bool,
}

/// Response for file and lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
