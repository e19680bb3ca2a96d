//! Events that can occur in a session

use crate::workspace::FileRecord;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    UserMessage {
        text: String,
    },
    SelectFile {
        index: usize,
    },
    /// Sidebar "new file" button
    NewFile,
    CreateFile {
        file: FileRecord,
    },
    /// Editor `onChange`; `index` is the file the editor was showing
    EditActiveFile {
        index: usize,
        content: String,
    },

    // Timer events
    ResponseDue {
        ticket: usize,
    },
}

impl Event {
    #[cfg(test)]
    pub fn user_message(text: impl Into<String>) -> Self {
        Event::UserMessage { text: text.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::UserMessage { .. } => "user_message",
            Event::SelectFile { .. } => "select_file",
            Event::NewFile => "new_file",
            Event::CreateFile { .. } => "create_file",
            Event::EditActiveFile { .. } => "edit_active_file",
            Event::ResponseDue { .. } => "response_due",
        }
    }
}
