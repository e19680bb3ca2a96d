//! Effects produced by state transitions

use crate::classifier::Rule;
use crate::workspace::{ChatMessage, FileRecord, FileStoreError, Workspace};
use std::time::Duration;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the transcript
    AppendMessage {
        message: ChatMessage,
        /// Classifier rule behind an assistant reply
        rule: Option<Rule>,
    },

    /// Toggle the "assistant is responding" flag
    SetBusy(bool),

    /// Open a new file and make it active
    CreateFile(FileRecord),

    /// Open an `untitled-<n>.js` file and make it active
    CreateUntitledFile,

    /// Switch the active file
    SelectFile { index: usize },

    /// Replace the content of file `index`, which must still be active
    EditActiveFile { index: usize, content: String },

    /// Deliver `Event::ResponseDue` after `delay`
    ScheduleResponse { delay: Duration, ticket: usize },
}

/// What applying an effect changed in the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Message(ChatMessage),
    Files,
    /// One file's content changed; the file list and pointer did not
    FileEdited { index: usize, content: String },
    Busy(bool),
    /// Nothing in the workspace; handled by the runtime
    Deferred,
}

impl Effect {
    pub fn user_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            message: ChatMessage::user(text),
            rule: None,
        }
    }

    pub fn assistant_reply(text: impl Into<String>, rule: Rule) -> Self {
        Effect::AppendMessage {
            message: ChatMessage::assistant(text),
            rule: Some(rule),
        }
    }

    /// Apply a workspace effect in place.
    ///
    /// `ScheduleResponse` has no workspace part and reports `Change::Deferred`.
    pub fn apply(&self, workspace: &mut Workspace) -> Result<Change, FileStoreError> {
        match self {
            Effect::AppendMessage { message, .. } => {
                workspace.transcript.append(message.clone());
                Ok(Change::Message(message.clone()))
            }
            Effect::SetBusy(busy) => {
                workspace.transcript.set_busy(*busy);
                Ok(Change::Busy(*busy))
            }
            Effect::CreateFile(file) => {
                workspace.files.create_file(file.clone());
                Ok(Change::Files)
            }
            Effect::CreateUntitledFile => {
                workspace.files.create_untitled();
                Ok(Change::Files)
            }
            Effect::SelectFile { index } => {
                workspace.files.set_active(*index)?;
                Ok(Change::Files)
            }
            Effect::EditActiveFile { index, content } => {
                workspace.files.ensure_active(*index)?;
                workspace.files.edit_active_content(content.as_str())?;
                Ok(Change::FileEdited {
                    index: *index,
                    content: content.clone(),
                })
            }
            Effect::ScheduleResponse { .. } => Ok(Change::Deferred),
        }
    }
}
