use chrono::DateTime;
use chrono::Utc;
use colloquy_protocol::Message;
use colloquy_protocol::Role;
use colloquy_protocol::SessionId;

use crate::config::ChatConfig;

/// Characters of the first user message that become the session title.
const TITLE_LIMIT: usize = 30;

/// One conversation: the transcript plus display metadata.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    /// Insertion order is chronological order; never reordered.
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub enable_thinking: bool,
}

/// The authoritative session collection and current selection.
///
/// Ordered newest-created-first. The selection is display state only:
/// stream bookkeeping lives in the registry, keyed by id, so nothing here
/// moves when a background stream makes progress.
#[derive(Debug)]
pub(crate) struct SessionStore {
    sessions: Vec<Session>,
    current: Option<SessionId>,
    greeting: String,
    clear_notice: String,
    default_title: String,
    max_history: usize,
}

impl SessionStore {
    pub(crate) fn new(config: &ChatConfig) -> Self {
        Self {
            sessions: Vec::new(),
            current: None,
            greeting: config.greeting.clone(),
            clear_notice: config.clear_notice.clone(),
            default_title: config.default_title.clone(),
            max_history: config.max_history,
        }
    }

    /// Create a session seeded with the greeting, prepend it, and select it.
    pub(crate) fn create(&mut self) -> SessionId {
        let now = Utc::now();
        let session = Session {
            id: SessionId::new(),
            title: self.default_title.clone(),
            messages: vec![Message::new(Role::Assistant, self.greeting.clone())],
            created_at: now,
            updated_at: now,
            enable_thinking: false,
        };
        let id = session.id;
        self.sessions.insert(0, session);
        self.current = Some(id);
        id
    }

    /// Select `id` for display; unknown ids leave the selection unchanged.
    pub(crate) fn select(&mut self, id: SessionId) {
        if self.sessions.iter().any(|session| session.id == id) {
            self.current = Some(id);
        }
    }

    pub(crate) fn current_id(&self) -> Option<SessionId> {
        self.current
    }

    pub(crate) fn current(&self) -> Option<&Session> {
        self.current.and_then(|id| self.get(id))
    }

    pub(crate) fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|session| session.id == id)
    }

    pub(crate) fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Append a message, resolving the target in order: the explicit id if
    /// it still names a session, else the current session, else a session
    /// created on the spot. Returns the id the message landed in.
    ///
    /// The fallback chain is what guarantees there is always a session to
    /// write into, even when the intended target was deleted mid-stream.
    pub(crate) fn append_message(
        &mut self,
        role: Role,
        content: &str,
        target: Option<SessionId>,
    ) -> SessionId {
        let resolved = target
            .filter(|id| self.get(*id).is_some())
            .or(self.current)
            .unwrap_or_else(|| self.create());
        let max_history = self.max_history;
        let default_title = self.default_title.clone();
        let Some(session) = self
            .sessions
            .iter_mut()
            .find(|session| session.id == resolved)
        else {
            return resolved;
        };

        let first_user_message = role == Role::User
            && session.messages.len() == 1
            && session.title == default_title;
        session.messages.push(Message::new(role, content));
        if first_user_message {
            session.title = derive_title(content);
        }
        if session.messages.len() > max_history {
            // Keep the seed message plus the most recent entries.
            let excess = session.messages.len() - max_history;
            session.messages.drain(1..1 + excess);
        }
        session.updated_at = Utc::now();
        resolved
    }

    /// Replace the transcript with a single notice message; the session and
    /// its id survive.
    pub(crate) fn clear(&mut self, id: SessionId) {
        let notice = self.clear_notice.clone();
        if let Some(session) = self.sessions.iter_mut().find(|session| session.id == id) {
            session.messages = vec![Message::new(Role::Assistant, notice)];
            session.updated_at = Utc::now();
        }
    }

    /// Remove a session. When the deleted session was selected, selection
    /// falls to the most recently updated survivor, or to nothing.
    pub(crate) fn delete(&mut self, id: SessionId) -> bool {
        let Some(idx) = self.sessions.iter().position(|session| session.id == id) else {
            return false;
        };
        self.sessions.remove(idx);
        if self.current == Some(id) {
            self.current = self
                .sessions
                .iter()
                .max_by_key(|session| session.updated_at)
                .map(|session| session.id);
        }
        true
    }

    /// Set the current session's thinking flag to `explicit`, or flip it
    /// when no value is given. No-op without a current session.
    pub(crate) fn toggle_thinking(&mut self, explicit: Option<bool>) {
        let Some(id) = self.current else {
            return;
        };
        if let Some(session) = self.sessions.iter_mut().find(|session| session.id == id) {
            session.enable_thinking = explicit.unwrap_or(!session.enable_thinking);
            session.updated_at = Utc::now();
        }
    }
}

fn derive_title(content: &str) -> String {
    let mut title: String = content.chars().take(TITLE_LIMIT).collect();
    if content.chars().nth(TITLE_LIMIT).is_some() {
        title.push_str("...");
    }
    title
}
