//! Per-user sessions: conversation state, history and flow data behind one lock per user.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::history::{History, HistoryEntry, DEFAULT_HISTORY_LIMIT};
use crate::state::{transition, ConversationState, Event, Transition};

/// Opaque identifier of a conversation participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the bot remembers about one user.
#[derive(Debug, Clone)]
pub struct Session {
    state: ConversationState,
    pub history: History,
    /// URL of the photo uploaded in the edit flow; only set while that flow is running.
    source_image: Option<String>,
}

impl Session {
    pub fn new(history_limit: usize) -> Self {
        Self {
            state: ConversationState::Idle,
            history: History::with_limit(history_limit),
            source_image: None,
        }
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// Moves to `state`. Flow data does not outlive its flow: it is dropped on every move
    /// except into [`ConversationState::AwaitingEditPrompt`].
    pub fn set_state(&mut self, state: ConversationState) {
        if state != ConversationState::AwaitingEditPrompt {
            self.source_image = None;
        }
        self.state = state;
    }

    /// Back to Idle after success, failure or cancellation. History is kept.
    pub fn reset(&mut self) {
        self.set_state(ConversationState::Idle);
    }

    /// Applies `event` and returns the transition; the new state is already set.
    pub fn apply(&mut self, event: &Event) -> Transition {
        let t = transition(self.state, event);
        self.set_state(t.next);
        t
    }

    pub fn source_image(&self) -> Option<&str> {
        self.source_image.as_deref()
    }

    pub fn set_source_image(&mut self, url: impl Into<String>) {
        self.source_image = Some(url.into());
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

/// Sessions keyed by [`UserId`].
///
/// The map lock is only held to look up or insert a session; each session has its own
/// mutex, so handling for one user never blocks another. Callers that hold a session guard
/// must use the guard directly instead of the store's convenience methods for the same user.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<UserId, Arc<Mutex<Session>>>>>,
    history_limit: usize,
}

impl SessionStore {
    pub fn new(history_limit: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            history_limit,
        }
    }

    /// Returns the user's session handle, creating an idle one if absent.
    pub async fn session(&self, user_id: UserId) -> Arc<Mutex<Session>> {
        if let Some(session) = self.sessions.read().await.get(&user_id) {
            return session.clone();
        }
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(user_id)
            .or_insert_with(|| {
                debug!(user_id = %user_id, "creating session");
                Arc::new(Mutex::new(Session::new(self.history_limit)))
            })
            .clone()
    }

    pub async fn append(&self, user_id: UserId, entry: HistoryEntry) {
        let session = self.session(user_id).await;
        session.lock().await.history.push(entry);
    }

    /// The user's history in chronological order; empty for unknown users.
    pub async fn history(&self, user_id: UserId) -> Vec<HistoryEntry> {
        match self.existing(user_id).await {
            Some(session) => session.lock().await.history.to_vec(),
            None => Vec::new(),
        }
    }

    pub async fn clear(&self, user_id: UserId) {
        if let Some(session) = self.existing(user_id).await {
            session.lock().await.history.clear();
        }
    }

    pub async fn state(&self, user_id: UserId) -> ConversationState {
        match self.existing(user_id).await {
            Some(session) => session.lock().await.state(),
            None => ConversationState::Idle,
        }
    }

    /// Applies `event` to the user's session and returns the new state.
    pub async fn transition(&self, user_id: UserId, event: &Event) -> ConversationState {
        let session = self.session(user_id).await;
        let mut session = session.lock().await;
        session.apply(event).next
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn existing(&self, user_id: UserId) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().await.get(&user_id).cloned()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
