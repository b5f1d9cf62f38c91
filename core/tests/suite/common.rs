#![allow(clippy::expect_used)]

use std::future::Future;
use std::time::Duration;

use colloquy_core::ChatConfig;
use colloquy_core::ChatManager;
use wiremock::MockServer;

/// Render frames the way the backend does: marker-prefixed and
/// double-line-break terminated.
pub fn frames_body(frames: &[&str]) -> String {
    frames.iter().map(|frame| format!("data:{frame}\n\n")).collect()
}

pub fn manager_for(server: &MockServer) -> ChatManager {
    ChatManager::new(ChatConfig::with_base_url(server.uri()))
}

/// Poll until `condition` holds; panics when it never does within the
/// deadline. Keeps timing-sensitive assertions deterministic without
/// hard-coded sleeps.
pub async fn wait_until<F, Fut>(what: &str, mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for: {what}");
}
