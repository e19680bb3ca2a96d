//! Runtime for executing sessions
//!
//! Each session runs as its own task that owns the workspace, applies
//! effects from the state machine and streams changes to subscribers.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;

use crate::state_machine::{Event, SessionContext, SessionState};
use crate::workspace::{ChatMessage, FileRecord, SessionView, Workspace};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch, RwLock};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    #[error("Session is closed: {0}")]
    SessionClosed(String),
}

/// Events sent to SSE clients
#[derive(Debug, Clone)]
pub enum SseEvent {
    Init {
        view: SessionView,
    },
    Message {
        message: ChatMessage,
    },
    Files {
        files: Vec<FileRecord>,
        active_file: usize,
    },
    FileEdited {
        index: usize,
        content: String,
    },
    StateChange {
        state: SessionState,
    },
    Error {
        message: String,
    },
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    pub event_tx: mpsc::Sender<Event>,
    pub broadcast_tx: broadcast::Sender<SseEvent>,
    pub view_rx: watch::Receiver<SessionView>,
    pub cancel: CancellationToken,
}

impl SessionHandle {
    /// Latest published snapshot
    pub fn view(&self) -> SessionView {
        self.view_rx.borrow().clone()
    }
}

/// Spawn a runtime task for `workspace` and return its handle
pub fn start_session(context: SessionContext, workspace: Workspace) -> SessionHandle {
    let (event_tx, event_rx) = mpsc::channel(32);
    let (broadcast_tx, _) = broadcast::channel(128);
    let view = workspace.view(&context.session_id, Utc::now());
    let (view_tx, view_rx) = watch::channel(view);
    let cancel = CancellationToken::new();

    let session_id = context.session_id.clone();
    let runtime = SessionRuntime::new(
        context,
        workspace,
        event_rx,
        event_tx.downgrade(),
        broadcast_tx.clone(),
        view_tx,
        cancel.clone(),
    );

    tokio::spawn(async move {
        runtime.run().await;
        tracing::info!(session_id = %session_id, "Session runtime finished");
    });

    SessionHandle {
        event_tx,
        broadcast_tx,
        view_rx,
        cancel,
    }
}

/// Manager for all session runtimes.
///
/// A session lives as long as some client streams it. One that has had no
/// stream attached for `idle_grace` is closed.
pub struct RuntimeManager {
    response_delay: Duration,
    idle_grace: Duration,
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl RuntimeManager {
    pub fn new(response_delay: Duration, idle_grace: Duration) -> Self {
        Self {
            response_delay,
            idle_grace,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a seeded session and return its first snapshot
    pub async fn create_session(self: &Arc<Self>) -> SessionView {
        let id = uuid::Uuid::new_v4().to_string();
        let context = SessionContext::new(&id, self.response_delay);
        let handle = start_session(context, Workspace::seeded());
        let view = handle.view();

        self.sessions.write().await.insert(id.clone(), handle);
        tracing::info!(session_id = %id, "Session created");

        // A client that never opens the stream must not leak the session
        self.close_when_unwatched(&id);
        view
    }

    pub async fn get(&self, session_id: &str) -> Result<SessionHandle, RuntimeError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| RuntimeError::SessionNotFound(session_id.to_string()))
    }

    pub async fn view(&self, session_id: &str) -> Result<SessionView, RuntimeError> {
        Ok(self.get(session_id).await?.view())
    }

    /// Send an event to a session
    pub async fn send_event(&self, session_id: &str, event: Event) -> Result<(), RuntimeError> {
        let handle = self.get(session_id).await?;
        handle
            .event_tx
            .send(event)
            .await
            .map_err(|_| RuntimeError::SessionClosed(session_id.to_string()))
    }

    /// Subscribe to session updates, returning the snapshot to start from
    pub async fn subscribe(
        &self,
        session_id: &str,
    ) -> Result<(SessionView, broadcast::Receiver<SseEvent>), RuntimeError> {
        let sessions = self.sessions.read().await;
        let handle = sessions
            .get(session_id)
            .ok_or_else(|| RuntimeError::SessionNotFound(session_id.to_string()))?;
        // Subscribe before reading the view so no change falls in between
        let rx = handle.broadcast_tx.subscribe();
        Ok((handle.view(), rx))
    }

    /// After `idle_grace`, close the session if nobody is streaming it
    pub fn close_when_unwatched(self: &Arc<Self>, session_id: &str) {
        let Ok(rt) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let manager = Arc::clone(self);
        let session_id = session_id.to_string();
        rt.spawn(async move {
            tokio::time::sleep(manager.idle_grace).await;
            manager.close_if_unwatched(&session_id).await;
        });
    }

    /// Close the session when it has no subscribers; returns whether it did
    async fn close_if_unwatched(&self, session_id: &str) -> bool {
        // Held across the check so a concurrent `subscribe` cannot slip in
        let mut sessions = self.sessions.write().await;
        let unwatched = sessions
            .get(session_id)
            .is_some_and(|h| h.broadcast_tx.receiver_count() == 0);
        if !unwatched {
            return false;
        }
        if let Some(handle) = sessions.remove(session_id) {
            handle.cancel.cancel();
        }
        tracing::info!(session_id = %session_id, "Closed session with no subscribers");
        true
    }

    /// Tear a session down; a pending reply is dropped
    pub async fn close(&self, session_id: &str) -> Result<(), RuntimeError> {
        let handle = self
            .sessions
            .write()
            .await
            .remove(session_id)
            .ok_or_else(|| RuntimeError::SessionNotFound(session_id.to_string()))?;
        handle.cancel.cancel();
        tracing::info!(session_id = %session_id, "Session closed");
        Ok(())
    }

    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Lives inside an SSE response; dropping it lets the session be reaped
pub struct StreamGuard {
    manager: Arc<RuntimeManager>,
    session_id: String,
}

impl StreamGuard {
    pub fn new(manager: Arc<RuntimeManager>, session_id: impl Into<String>) -> Self {
        Self {
            manager,
            session_id: session_id.into(),
        }
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        tracing::debug!(session_id = %self.session_id, "Stream detached");
        self.manager.close_when_unwatched(&self.session_id);
    }
}
