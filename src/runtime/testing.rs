//! Test harness for session runtimes
//!
//! Spawns a real runtime with a short reply delay and offers helpers to
//! drive it and wait on its published snapshots.

use super::{start_session, SessionHandle, SseEvent};
use crate::state_machine::{Event, SessionContext};
use crate::workspace::{SessionView, Workspace};
use std::time::Duration;
use tokio::sync::broadcast;

/// Builder for a test session
pub struct TestRuntime {
    delay: Duration,
    workspace: Workspace,
}

impl TestRuntime {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_millis(10),
            workspace: Workspace::seeded(),
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = workspace;
        self
    }

    pub fn build(self) -> RunningTestRuntime {
        let handle = start_session(SessionContext::new("test-session", self.delay), self.workspace);
        let events = handle.broadcast_tx.subscribe();
        RunningTestRuntime { handle, events }
    }
}

impl Default for TestRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// A spawned session plus a subscription to its broadcast stream
pub struct RunningTestRuntime {
    pub handle: SessionHandle,
    pub events: broadcast::Receiver<SseEvent>,
}

impl RunningTestRuntime {
    pub async fn send(&self, event: Event) {
        self.handle.event_tx.send(event).await.unwrap();
    }

    pub async fn send_message(&self, text: &str) {
        self.send(Event::user_message(text)).await;
    }

    pub fn view(&self) -> SessionView {
        self.handle.view()
    }

    /// Wait until the snapshot satisfies `pred`, or time out
    pub async fn wait_until(
        &self,
        timeout: Duration,
        pred: impl FnMut(&SessionView) -> bool,
    ) -> bool {
        let mut rx = self.handle.view_rx.clone();
        tokio::time::timeout(timeout, rx.wait_for(pred))
            .await
            .is_ok_and(|r| r.is_ok())
    }

    /// Wait for the transcript to reach `len` messages with no reply pending
    pub async fn wait_for_idle(&self, len: usize, timeout: Duration) -> bool {
        self.wait_until(timeout, |v| !v.awaiting_response && v.messages.len() == len)
            .await
    }

    /// Drain broadcast events received so far
    pub fn drain_events(&mut self) -> Vec<SseEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::SessionState;
    use crate::workspace::{ChatMessage, FileRecord, Role};

    const WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn test_greeting_end_to_end() {
        let rt = TestRuntime::new().build();
        rt.send_message("hi").await;

        assert!(rt.wait_for_idle(3, WAIT).await);
        let view = rt.view();
        assert_eq!(view.messages[1], ChatMessage::user("hi"));
        assert_eq!(
            view.messages[2],
            ChatMessage::assistant("Hello! How can I help you with your code today?")
        );
        assert!(!view.awaiting_response);
        assert_eq!(view.files.len(), 1);
    }

    #[tokio::test]
    async fn test_busy_until_delay_elapses() {
        let rt = TestRuntime::new().delay(Duration::from_millis(200)).build();
        rt.send_message("what can you do").await;

        assert!(rt.wait_until(WAIT, |v| v.awaiting_response).await);
        assert_eq!(rt.view().messages.len(), 2);

        assert!(rt.wait_for_idle(3, WAIT).await);
    }

    #[tokio::test]
    async fn test_create_java_class_end_to_end() {
        let rt = TestRuntime::new().build();
        rt.send_message("create a java class").await;

        assert!(rt.wait_for_idle(3, WAIT).await);
        let view = rt.view();
        assert_eq!(view.files.len(), 2);
        assert_eq!(view.active_file, 1);
        let active = view.active().unwrap();
        assert_eq!(active.name, "Main.java");
        assert_eq!(active.language, "java");
        assert!(active.content.contains("public static void main"));
        let reply = view.messages.last().unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert!(reply.content.contains("Main.java"));
    }

    #[tokio::test]
    async fn test_empty_submission_ignored() {
        let rt = TestRuntime::new().build();
        rt.send_message("   ").await;
        // A later event proves the blank one was processed
        rt.send(Event::NewFile).await;

        assert!(rt.wait_until(WAIT, |v| v.files.len() == 2).await);
        let view = rt.view();
        assert_eq!(view.messages.len(), 1);
        assert!(!view.awaiting_response);
    }

    #[tokio::test]
    async fn test_overlapping_submit_is_rejected() {
        let mut rt = TestRuntime::new().delay(Duration::from_millis(100)).build();
        rt.send_message("hello").await;
        rt.send_message("fix my bug").await;

        assert!(rt.wait_for_idle(3, WAIT).await);
        let view = rt.view();
        assert_eq!(view.messages[1].content, "hello");
        assert_eq!(view.messages[2].role, Role::Assistant);

        let errors: Vec<_> = rt
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SseEvent::Error { .. }))
            .collect();
        assert_eq!(errors.len(), 1);

        // Still idle afterwards, so a new message is accepted
        rt.send_message("fix my bug").await;
        assert!(rt.wait_for_idle(5, WAIT).await);
    }

    #[tokio::test]
    async fn test_file_commands_while_awaiting() {
        let rt = TestRuntime::new().delay(Duration::from_millis(100)).build();
        rt.send_message("explain the code").await;
        rt.send(Event::CreateFile {
            file: FileRecord::new("plain.js", "javascript", "let x = 1;"),
        })
        .await;

        assert!(rt.wait_for_idle(3, WAIT).await);
        // The reply classifies against whatever is active at delivery
        assert_eq!(
            rt.view().messages[2].content,
            "I can explain any code you have in the editor. What would you like me to clarify?"
        );
    }

    #[tokio::test]
    async fn test_explain_seeded_file() {
        let rt = TestRuntime::new().build();
        rt.send_message("Explain the code").await;

        assert!(rt.wait_for_idle(3, WAIT).await);
        assert!(rt.view().messages[2]
            .content
            .starts_with("This code implements the Fibonacci sequence"));
    }

    #[tokio::test]
    async fn test_select_and_edit() {
        let mut rt = TestRuntime::new().build();
        rt.send(Event::NewFile).await;
        rt.send(Event::SelectFile { index: 0 }).await;
        rt.send(Event::EditActiveFile {
            index: 0,
            content: "// cleared".to_string(),
        })
        .await;

        assert!(rt
            .wait_until(WAIT, |v| v.files[0].content == "// cleared")
            .await);
        let view = rt.view();
        assert_eq!(view.active_file, 0);
        assert_eq!(view.files[1].content, "// New file\n");

        rt.send(Event::SelectFile { index: 7 }).await;
        rt.send(Event::NewFile).await;
        assert!(rt.wait_until(WAIT, |v| v.files.len() == 3).await);
        assert!(rt
            .drain_events()
            .iter()
            .any(|e| matches!(e, SseEvent::Error { message } if message.contains("out of range"))));
    }

    #[tokio::test]
    async fn test_edit_broadcasts_only_that_file() {
        let mut rt = TestRuntime::new().build();
        rt.send(Event::EditActiveFile {
            index: 0,
            content: "let a = 1;".to_string(),
        })
        .await;
        assert!(rt
            .wait_until(WAIT, |v| v.files[0].content == "let a = 1;")
            .await);

        let events = rt.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            SseEvent::FileEdited { index: 0, content } if content == "let a = 1;"
        ));
    }

    #[tokio::test]
    async fn test_edit_after_switch_lands_nowhere() {
        let mut rt = TestRuntime::new().build();
        rt.send(Event::NewFile).await;
        // Typed into example.ts, delivered after the new file took focus
        rt.send(Event::EditActiveFile {
            index: 0,
            content: "late keystrokes".to_string(),
        })
        .await;
        rt.send(Event::NewFile).await;

        assert!(rt.wait_until(WAIT, |v| v.files.len() == 3).await);
        let view = rt.view();
        assert!(view.files[0].content.contains("fibonacci"));
        assert_eq!(view.files[1].content, "// New file\n");
        assert!(rt
            .drain_events()
            .iter()
            .any(|e| matches!(e, SseEvent::Error { message } if message.contains("no longer the active file"))));
    }

    #[tokio::test]
    async fn test_explain_custom_workspace() {
        let mut ws = Workspace::seeded();
        ws.files
            .create_file(FileRecord::new("sum.py", "python", "print(1 + 2)"));
        let rt = TestRuntime::new().workspace(ws).build();
        assert_eq!(rt.view().active_file, 1);

        rt.send_message("explain this").await;
        assert!(rt.wait_for_idle(3, WAIT).await);
        assert_eq!(
            rt.view().messages[2].content,
            "I can explain any code you have in the editor. What would you like me to clarify?"
        );
    }

    #[tokio::test]
    async fn test_broadcast_order() {
        let mut rt = TestRuntime::new().build();
        rt.send_message("create a python file").await;
        assert!(rt.wait_for_idle(3, WAIT).await);

        let kinds: Vec<&str> = rt
            .drain_events()
            .iter()
            .map(|e| match e {
                SseEvent::Init { .. } => "init",
                SseEvent::Message { .. } => "message",
                SseEvent::Files { .. } => "files",
                SseEvent::FileEdited { .. } => "file_edited",
                SseEvent::StateChange { .. } => "state_change",
                SseEvent::Error { .. } => "error",
            })
            .collect();
        assert_eq!(
            kinds,
            ["message", "state_change", "message", "files", "state_change"]
        );
    }

    #[tokio::test]
    async fn test_close_drops_pending_reply() {
        let rt = TestRuntime::new().delay(Duration::from_millis(50)).build();
        rt.send_message("hi").await;
        assert!(rt.wait_until(WAIT, |v| v.awaiting_response).await);

        rt.handle.cancel.cancel();
        tokio::time::sleep(Duration::from_millis(150)).await;

        let view = rt.view();
        assert_eq!(view.messages.len(), 2);
        assert!(view.awaiting_response);
        assert!(rt.handle.event_tx.send(Event::NewFile).await.is_err());
    }

    #[tokio::test]
    async fn test_state_change_payload() {
        let mut rt = TestRuntime::new().build();
        rt.send_message("hi").await;
        assert!(rt.wait_for_idle(3, WAIT).await);

        let states: Vec<SessionState> = rt
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                SseEvent::StateChange { state } => Some(state),
                _ => None,
            })
            .collect();
        assert_eq!(
            states,
            vec![
                SessionState::AwaitingResponse {
                    prompt: "hi".to_string(),
                    ticket: 1,
                },
                SessionState::Idle,
            ]
        );
    }
}
