//! Session data owned by a runtime: open files plus chat transcript

mod files;
mod transcript;

pub use files::{FileRecord, FileStore, FileStoreError};
pub use transcript::{ChatMessage, Role, Transcript};

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const WELCOME_MESSAGE: &str = "Welcome to Codepad! I'm your coding assistant. I can help you write code, debug issues, explain concepts, and more. What would you like to build today?";

pub const EXAMPLE_FILE_NAME: &str = "example.ts";

pub const EXAMPLE_FILE_CONTENT: &str = "// Welcome to Codepad!
// Start typing or ask me to help you write code

function fibonacci(n: number): number {
  if (n <= 1) return n;
  return fibonacci(n - 1) + fibonacci(n - 2);
}

console.log(fibonacci(10));";

/// Files and transcript of one editor session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub files: FileStore,
    pub transcript: Transcript,
}

impl Workspace {
    /// Fresh session: the fibonacci example open and a welcome message
    pub fn seeded() -> Self {
        let mut transcript = Transcript::new();
        transcript.append_assistant(WELCOME_MESSAGE);
        Self {
            files: FileStore::new(FileRecord::new(
                EXAMPLE_FILE_NAME,
                "typescript",
                EXAMPLE_FILE_CONTENT,
            )),
            transcript,
        }
    }

    pub fn view(&self, id: &str, created_at: DateTime<Utc>) -> SessionView {
        SessionView {
            id: id.to_string(),
            created_at,
            files: self.files.files().to_vec(),
            active_file: self.files.active_index(),
            messages: self.transcript.messages().to_vec(),
            awaiting_response: self.transcript.is_busy(),
        }
    }
}

/// Read-only snapshot handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub files: Vec<FileRecord>,
    pub active_file: usize,
    pub messages: Vec<ChatMessage>,
    pub awaiting_response: bool,
}

impl SessionView {
    #[cfg(test)]
    pub fn active(&self) -> Option<&FileRecord> {
        self.files.get(self.active_file)
    }
}
