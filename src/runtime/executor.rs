//! Session runtime executor

use super::SseEvent;
use crate::state_machine::{
    transition, Change, Effect, Event, SessionContext, SessionState, TransitionError,
};
use crate::workspace::{SessionView, Workspace};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Owns one session's state and workspace; applies effects in event order
pub struct SessionRuntime {
    context: SessionContext,
    state: SessionState,
    workspace: Workspace,
    created_at: DateTime<Utc>,
    event_rx: mpsc::Receiver<Event>,
    /// Weak so that pending timers alone do not keep the session alive
    timer_tx: mpsc::WeakSender<Event>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    view_tx: watch::Sender<SessionView>,
    cancel: CancellationToken,
}

impl SessionRuntime {
    pub fn new(
        context: SessionContext,
        workspace: Workspace,
        event_rx: mpsc::Receiver<Event>,
        timer_tx: mpsc::WeakSender<Event>,
        broadcast_tx: broadcast::Sender<SseEvent>,
        view_tx: watch::Sender<SessionView>,
        cancel: CancellationToken,
    ) -> Self {
        let created_at = view_tx.borrow().created_at;
        Self {
            context,
            state: SessionState::Idle,
            workspace,
            created_at,
            event_rx,
            timer_tx,
            broadcast_tx,
            view_tx,
            cancel,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.context.session_id, "Starting session runtime");

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                event = self.event_rx.recv() => {
                    let Some(event) = event else { break };
                    if let Err(e) = self.process_event(event) {
                        tracing::warn!(
                            session_id = %self.context.session_id,
                            error = %e,
                            "Event rejected"
                        );
                        let _ = self.broadcast_tx.send(SseEvent::Error {
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        if self.state.is_awaiting() {
            tracing::debug!(session_id = %self.context.session_id, "Dropping pending reply");
        }
        tracing::info!(session_id = %self.context.session_id, "Session runtime stopped");
    }

    fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        tracing::debug!(
            session_id = %self.context.session_id,
            event = event.kind(),
            state = self.state.name(),
            "Processing event"
        );

        // Pure state transition
        let result = transition(&self.state, &self.context, &self.workspace, event)?;
        let old_state = std::mem::replace(&mut self.state, result.new_state);

        let mut files_changed = false;
        for effect in result.effects {
            if let Effect::ScheduleResponse { delay, ticket } = effect {
                self.schedule_response(delay, ticket);
                continue;
            }
            if let Effect::AppendMessage {
                rule: Some(rule), ..
            } = &effect
            {
                tracing::info!(
                    session_id = %self.context.session_id,
                    rule = rule.as_str(),
                    "Scripted reply"
                );
            }

            match effect.apply(&mut self.workspace)? {
                Change::Message(message) => {
                    let _ = self.broadcast_tx.send(SseEvent::Message { message });
                }
                Change::Files => files_changed = true,
                Change::FileEdited { index, content } => {
                    let _ = self
                        .broadcast_tx
                        .send(SseEvent::FileEdited { index, content });
                }
                Change::Busy(_) | Change::Deferred => {}
            }
        }

        if files_changed {
            let _ = self.broadcast_tx.send(SseEvent::Files {
                files: self.workspace.files.files().to_vec(),
                active_file: self.workspace.files.active_index(),
            });
        }
        if old_state != self.state {
            let _ = self.broadcast_tx.send(SseEvent::StateChange {
                state: self.state.clone(),
            });
        }

        self.view_tx
            .send_replace(self.workspace.view(&self.context.session_id, self.created_at));
        Ok(())
    }

    /// One-shot timer delivering `ResponseDue`.
    ///
    /// Cancelled with the session; if the runtime is gone by the time it
    /// fires, the delivery is dropped.
    fn schedule_response(&self, delay: Duration, ticket: usize) {
        let timer_tx = self.timer_tx.clone();
        let cancel = self.cancel.clone();
        let session_id = self.context.session_id.clone();

        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    let Some(tx) = timer_tx.upgrade() else { return };
                    if tx.send(Event::ResponseDue { ticket }).await.is_err() {
                        tracing::debug!(session_id = %session_id, ticket, "Session gone before reply");
                    }
                }
            }
        });
    }
}
