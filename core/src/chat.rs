use colloquy_protocol::ChatRequest;
use colloquy_protocol::Message;
use colloquy_protocol::Role;
use colloquy_protocol::SessionId;
use futures::StreamExt;
use tokio::sync::Mutex;
use tracing::debug;
use tracing::warn;

use crate::client::ChatClient;
use crate::client::StreamEvent;
use crate::config::ChatConfig;
use crate::error::ChatErr;
use crate::error::Result;
use crate::normalize::collapse_cjk_whitespace;
use crate::registry::StreamRegistry;
use crate::sessions::Session;
use crate::sessions::SessionStore;

/// Session store plus stream registry behind one lock. Every mutation is a
/// short synchronous critical section; the lock is never held across a
/// network await, so any number of streams can interleave safely.
#[derive(Debug)]
struct ChatState {
    store: SessionStore,
    registry: StreamRegistry,
}

impl ChatState {
    fn create_session(&mut self) -> SessionId {
        let id = self.store.create();
        // Ids are freshly generated, so no transient entries can exist under
        // this one; purge regardless so a new session can never inherit
        // stream state.
        self.registry.purge(id);
        id
    }

    fn delete_session(&mut self, id: SessionId) {
        self.store.delete(id);
        // Deletion always cleans transient state, whether or not a stream
        // is actually in flight under this id.
        self.registry.purge(id);
    }

    fn is_loading(&self) -> bool {
        self.store
            .current_id()
            .is_some_and(|id| self.registry.is_loading(id))
    }

    /// Partial text for the selected session, double-guarded: the id must be
    /// marked loading AND be the one selected for viewing. A stale map entry
    /// alone never becomes visible.
    fn streaming_message(&self) -> String {
        let Some(id) = self.store.current_id() else {
            return String::new();
        };
        if !self.registry.is_loading(id) {
            return String::new();
        }
        self.registry.progress(id).unwrap_or_default().to_string()
    }
}

/// The chat orchestrator: owns all conversation state and drives one
/// streaming request per [`ChatManager::send`].
///
/// Any number of sends may be in flight at once, each bound to the session
/// id captured when it started. Switching, creating, or deleting sessions
/// never interrupts or redirects a running stream; its output remains
/// retrievable under the captured id until the stream finishes.
pub struct ChatManager {
    state: Mutex<ChatState>,
    client: ChatClient,
    config: ChatConfig,
}

impl ChatManager {
    pub fn new(config: ChatConfig) -> Self {
        let client = ChatClient::new(config.base_url.clone());
        let mut state = ChatState {
            store: SessionStore::new(&config),
            registry: StreamRegistry::default(),
        };
        // Seed the first session so there is always somewhere to type.
        state.create_session();
        Self {
            state: Mutex::new(state),
            client,
            config,
        }
    }

    pub async fn create_session(&self) -> SessionId {
        self.state.lock().await.create_session()
    }

    pub async fn select_session(&self, id: SessionId) {
        self.state.lock().await.store.select(id);
    }

    pub async fn delete_session(&self, id: SessionId) {
        self.state.lock().await.delete_session(id);
    }

    /// Replace the current session's history with the clear notice.
    pub async fn clear_current_session(&self) {
        let mut state = self.state.lock().await;
        if let Some(id) = state.store.current_id() {
            state.store.clear(id);
        }
    }

    pub async fn toggle_thinking(&self, explicit: Option<bool>) {
        self.state.lock().await.store.toggle_thinking(explicit);
    }

    pub async fn sessions(&self) -> Vec<Session> {
        self.state.lock().await.store.sessions().to_vec()
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.state.lock().await.store.current().cloned()
    }

    pub async fn current_messages(&self) -> Vec<Message> {
        self.state
            .lock()
            .await
            .store
            .current()
            .map(|session| session.messages.clone())
            .unwrap_or_default()
    }

    /// Whether the currently selected session has a stream in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.is_loading()
    }

    pub async fn is_session_loading(&self, id: SessionId) -> bool {
        self.state.lock().await.registry.is_loading(id)
    }

    /// Partial assistant text for the selected session, or empty while it
    /// has no visible stream. See [`ChatState::streaming_message`].
    pub async fn streaming_message(&self) -> String {
        self.state.lock().await.streaming_message()
    }

    /// Send `text` from the current session and drive the reply stream to
    /// its end. No-op on blank text or when no session is selected.
    ///
    /// The session id is captured here, once. Everything that happens later
    /// targets that id, regardless of where the selection has moved in the
    /// meantime.
    pub async fn send(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let request = {
            let mut state = self.state.lock().await;
            let Some(current) = state.store.current() else {
                return;
            };
            let session_id = current.id;
            let enable_thinking = current.enable_thinking;
            state.registry.mark_loading(session_id);
            state.store.append_message(Role::User, text, Some(session_id));
            ChatRequest {
                session_id,
                message: text.to_string(),
                enable_thinking,
            }
        };
        let session_id = request.session_id;

        let outcome = self.run_stream(&request).await;

        let mut state = self.state.lock().await;
        match outcome {
            Ok(full) if full.is_empty() => {
                debug!(%session_id, "stream finished without content");
            }
            Ok(full) => {
                let full = if self.config.collapse_cjk_whitespace {
                    collapse_cjk_whitespace(&full)
                } else {
                    full
                };
                state
                    .store
                    .append_message(Role::Assistant, &full, Some(session_id));
            }
            Err(err) => {
                warn!(%session_id, "chat stream failed: {err}");
                state.store.append_message(
                    Role::Assistant,
                    &self.config.failure_notice,
                    Some(session_id),
                );
            }
        }
        // Finalize in order: message first, then progress, then the loading
        // flag, all under one lock acquisition, so observers never see
        // loading end before the final message is in place.
        state.registry.clear_progress(session_id);
        state.registry.clear_loading(session_id);
    }

    async fn run_stream(&self, request: &ChatRequest) -> Result<String> {
        let mut stream = self.client.stream_chat(request).await?;
        self.state
            .lock()
            .await
            .registry
            .begin_progress(request.session_id);

        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::Progress(text) => {
                    self.state
                        .lock()
                        .await
                        .registry
                        .update_progress(request.session_id, text);
                }
                StreamEvent::Completed(text) => return Ok(text),
            }
        }
        Err(ChatErr::Stream(
            "stream ended without completion".to_string(),
        ))
    }
}
