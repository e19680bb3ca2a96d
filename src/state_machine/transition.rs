//! Pure state transition function

use super::{Effect, Event, SessionContext, SessionState};
use crate::classifier::classify;
use crate::workspace::{FileStoreError, Workspace};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Assistant is still responding, wait for the reply before sending another message")]
    AwaitingResponse,
    #[error(transparent)]
    File(#[from] FileStoreError),
}

/// Pure transition function.
///
/// Reads the workspace but never mutates it; every change is returned as an
/// effect for the runtime to apply.
pub fn transition(
    state: &SessionState,
    context: &SessionContext,
    workspace: &Workspace,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // User messages
        // ============================================================

        // Blank input is dropped without a trace
        (_, Event::UserMessage { text }) if text.trim().is_empty() => {
            Ok(TransitionResult::new(state.clone()))
        }

        // Idle + UserMessage -> AwaitingResponse
        (SessionState::Idle, Event::UserMessage { text }) => {
            let ticket = workspace.transcript.len();
            Ok(TransitionResult::new(SessionState::AwaitingResponse {
                prompt: text.clone(),
                ticket,
            })
            .with_effect(Effect::user_message(text))
            .with_effect(Effect::SetBusy(true))
            .with_effect(Effect::ScheduleResponse {
                delay: context.response_delay,
                ticket,
            }))
        }

        // At most one pending reply
        (SessionState::AwaitingResponse { .. }, Event::UserMessage { .. }) => {
            Err(TransitionError::AwaitingResponse)
        }

        // ============================================================
        // Scripted reply
        // ============================================================

        // AwaitingResponse + ResponseDue -> Idle
        (
            SessionState::AwaitingResponse { prompt, ticket },
            Event::ResponseDue { ticket: due },
        ) if *ticket == due => {
            let result = classify(prompt, &workspace.files.active().content);
            Ok(TransitionResult::new(SessionState::Idle)
                .with_effects(result.new_file.map(Effect::CreateFile))
                .with_effect(Effect::assistant_reply(result.reply, result.rule))
                .with_effect(Effect::SetBusy(false)))
        }

        // Stale or unexpected timer: nothing to answer
        (_, Event::ResponseDue { .. }) => Ok(TransitionResult::new(state.clone())),

        // ============================================================
        // File commands (allowed in any state)
        // ============================================================
        (_, Event::SelectFile { index }) => {
            if !workspace.files.contains(index) {
                return Err(FileStoreError::OutOfRange {
                    index,
                    len: workspace.files.len(),
                }
                .into());
            }
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::SelectFile { index }))
        }

        (_, Event::NewFile) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::CreateUntitledFile))
        }

        (_, Event::CreateFile { file }) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::CreateFile(file)))
        }

        // An edit typed against a file that has since lost focus is stale
        (_, Event::EditActiveFile { index, content }) => {
            workspace.files.ensure_active(index)?;
            Ok(TransitionResult::new(state.clone())
                .with_effect(Effect::EditActiveFile { index, content }))
        }
    }
}
