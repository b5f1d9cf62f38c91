use std::collections::HashMap;
use std::collections::HashSet;

use colloquy_protocol::SessionId;

/// Transient per-session stream state, keyed strictly by session id.
///
/// Which session is selected for display is irrelevant here: a background
/// stream keeps publishing under the id captured when its request was
/// issued, and switching the selection must neither redirect nor erase that
/// state. Nothing in this table is part of the session transcript; entries
/// exist only while a stream is in flight.
#[derive(Debug, Default)]
pub(crate) struct StreamRegistry {
    loading: HashSet<SessionId>,
    progress: HashMap<SessionId, String>,
}

impl StreamRegistry {
    pub(crate) fn mark_loading(&mut self, id: SessionId) {
        self.loading.insert(id);
    }

    pub(crate) fn clear_loading(&mut self, id: SessionId) {
        self.loading.remove(&id);
    }

    pub(crate) fn is_loading(&self, id: SessionId) -> bool {
        self.loading.contains(&id)
    }

    /// Install an empty progress entry for a stream that just went live.
    pub(crate) fn begin_progress(&mut self, id: SessionId) {
        self.progress.insert(id, String::new());
    }

    /// Replace the accumulated text for `id`. A write without an active
    /// entry is dropped silently: a late publish from a stream whose
    /// session was deleted or already finalized must not resurrect state.
    pub(crate) fn update_progress(&mut self, id: SessionId, text: String) {
        if let Some(entry) = self.progress.get_mut(&id) {
            *entry = text;
        }
    }

    pub(crate) fn progress(&self, id: SessionId) -> Option<&str> {
        self.progress.get(&id).map(String::as_str)
    }

    pub(crate) fn clear_progress(&mut self, id: SessionId) {
        self.progress.remove(&id);
    }

    /// Drop every trace of `id`, loading flag and progress alike.
    pub(crate) fn purge(&mut self, id: SessionId) {
        self.loading.remove(&id);
        self.progress.remove(&id);
    }
}
