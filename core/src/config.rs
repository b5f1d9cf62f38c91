/// Static configuration for a [`crate::ChatManager`].
///
/// The defaults reproduce the shipped product: a local backend and the
/// stock zh-CN interface text. Embedders override whatever they need;
/// operational knobs (timeouts) live in environment flags instead, see
/// `flags.rs`.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Scheme + host (+ optional port) of the chat backend, no trailing
    /// path. The streaming endpoint path is fixed by the wire contract.
    pub base_url: String,
    /// Seed message every new session starts with.
    pub greeting: String,
    /// Replacement message installed when a session's history is cleared.
    pub clear_notice: String,
    /// Assistant message appended when a stream fails.
    pub failure_notice: String,
    /// Placeholder title until the first user message names the session.
    pub default_title: String,
    /// Upper bound on messages kept per session. When an append exceeds it,
    /// the seed message plus the most recent entries survive.
    pub max_history: usize,
    /// Collapse whitespace between CJK ideographs in finalized assistant
    /// text. Display-only normalization, see [`crate::normalize`].
    pub collapse_cjk_whitespace: bool,
}

impl ChatConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            greeting: "你好！我是AI助手，有什么可以帮助您的吗？".to_string(),
            clear_notice: "历史记录已清除。有什么新的问题吗？".to_string(),
            failure_notice: "抱歉，发生了错误，请稍后再试。".to_string(),
            default_title: "新会话".to_string(),
            max_history: 100,
            collapse_cjk_whitespace: false,
        }
    }
}
