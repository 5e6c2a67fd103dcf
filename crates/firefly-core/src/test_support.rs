//! In-memory gateway used by the store tests.

use crate::error::{FireflyError, Result};
use crate::gateway::{BackendGateway, RenameOutcome, SendReply};
use crate::session::{ChatMessage, DEFAULT_SESSION_TITLE, SessionId, SessionSummary};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Lets a test observe the start of a send and decide when it resolves.
#[derive(Default)]
pub(crate) struct SendGate {
    pub started: Notify,
    pub release: Notify,
}

#[derive(Default)]
struct MockState {
    sessions: Vec<SessionSummary>,
    messages: HashMap<SessionId, Vec<ChatMessage>>,
    next_id: i64,
    scripted_lists: VecDeque<Vec<SessionSummary>>,
    failing: HashSet<&'static str>,
    rename_refusal: Option<String>,
    calls: Vec<&'static str>,
    send_targets: Vec<Option<SessionId>>,
}

pub(crate) struct MockGateway {
    state: Mutex<MockState>,
    send_gate: Option<Arc<SendGate>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                next_id: 1,
                ..MockState::default()
            }),
            send_gate: None,
        }
    }

    pub fn with_sessions(sessions: Vec<SessionSummary>) -> Self {
        let gateway = Self::new();
        {
            let mut state = gateway.state.lock().unwrap();
            state.next_id = sessions.iter().map(|s| s.id.get()).max().unwrap_or(0) + 1;
            state.sessions = sessions;
        }
        gateway
    }

    /// Makes every send wait on the returned gate.
    pub fn gated(mut self) -> (Self, Arc<SendGate>) {
        let gate = Arc::new(SendGate::default());
        self.send_gate = Some(gate.clone());
        (self, gate)
    }

    pub fn fail(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.remove(operation);
    }

    /// Queues a list result returned by the next `list_sessions` call.
    pub fn script_list(&self, sessions: Vec<SessionSummary>) {
        self.state.lock().unwrap().scripted_lists.push_back(sessions);
    }

    pub fn refuse_renames(&self, error: &str) {
        self.state.lock().unwrap().rename_refusal = Some(error.to_string());
    }

    pub fn set_messages(&self, session_id: SessionId, messages: Vec<ChatMessage>) {
        self.state.lock().unwrap().messages.insert(session_id, messages);
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    pub fn send_targets(&self) -> Vec<Option<SessionId>> {
        self.state.lock().unwrap().send_targets.clone()
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(operation);
        if state.failing.contains(operation) {
            return Err(FireflyError::gateway(format!("{operation} failed")));
        }
        Ok(())
    }

    fn create(state: &mut MockState) -> SessionId {
        let id = SessionId(state.next_id);
        state.next_id += 1;
        state
            .sessions
            .push(SessionSummary::new(id, DEFAULT_SESSION_TITLE, Utc::now()));
        id
    }
}

#[async_trait]
impl BackendGateway for MockGateway {
    async fn send_message(
        &self,
        session_id: Option<SessionId>,
        text: &str,
    ) -> Result<SendReply> {
        {
            let mut state = self.state.lock().unwrap();
            state.calls.push("send");
            state.send_targets.push(session_id);
        }
        if let Some(gate) = &self.send_gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        let mut state = self.state.lock().unwrap();
        if state.failing.contains("send") {
            return Err(FireflyError::gateway("send failed"));
        }
        let target = match session_id {
            Some(id) => id,
            None => Self::create(&mut state),
        };
        let content = format!("echo: {text}");
        let history = state.messages.entry(target).or_default();
        history.push(ChatMessage::user(text));
        history.push(ChatMessage::assistant(content.clone()));
        Ok(SendReply {
            session_id: target,
            content,
        })
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        self.record("list")?;
        let mut state = self.state.lock().unwrap();
        if let Some(scripted) = state.scripted_lists.pop_front() {
            return Ok(scripted);
        }
        Ok(state.sessions.clone())
    }

    async fn create_session(&self) -> Result<SessionId> {
        self.record("create")?;
        Ok(Self::create(&mut self.state.lock().unwrap()))
    }

    async fn load_session_messages(&self, session_id: SessionId) -> Result<Vec<ChatMessage>> {
        self.record("load")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .messages
            .get(&session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_session(&self, session_id: SessionId) -> Result<bool> {
        self.record("delete")?;
        let mut state = self.state.lock().unwrap();
        state.sessions.retain(|s| s.id != session_id);
        state.messages.remove(&session_id);
        Ok(true)
    }

    async fn rename_session(
        &self,
        session_id: SessionId,
        new_title: &str,
    ) -> Result<RenameOutcome> {
        self.record("rename")?;
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.rename_refusal.clone() {
            return Ok(RenameOutcome::refused(error));
        }
        match state.sessions.iter_mut().find(|s| s.id == session_id) {
            Some(session) => {
                session.title = new_title.to_string();
                Ok(RenameOutcome::accepted(new_title))
            }
            None => Ok(RenameOutcome::refused(format!("Session {session_id} not found"))),
        }
    }
}
