#![allow(clippy::expect_used)]

use colloquy_core::ChatConfig;
use colloquy_protocol::Role;
use pretty_assertions::assert_eq;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;

use crate::suite::common::frames_body;
use crate::suite::common::manager_for;

#[tokio::test]
async fn send_appends_streamed_reply_to_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(frames_body(&["Hel", "lo!"]), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let manager = manager_for(&server);
    manager.send("hi").await;

    let messages = manager.current_messages().await;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "hi");
    assert_eq!(messages[2].role, Role::Assistant);
    assert_eq!(messages[2].content, "Hello!");
    assert!(!manager.is_loading().await);
    assert_eq!(manager.streaming_message().await, "");
}

#[tokio::test]
async fn request_body_carries_session_and_thinking_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/stream"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let manager = manager_for(&server);
    manager.toggle_thinking(Some(true)).await;
    manager.send("question").await;

    let requests = server.received_requests().await.expect("recorded");
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
    let current = manager.current_session().await.expect("seeded session");
    assert_eq!(
        body,
        serde_json::json!({
            "sessionId": current.id.to_string(),
            "message": "question",
            "enableThinking": true,
        })
    );
}

#[tokio::test]
async fn failed_request_appends_the_failure_notice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/stream"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let manager = manager_for(&server);
    manager.send("hi").await;

    let messages = manager.current_messages().await;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[2].role, Role::Assistant);
    assert_eq!(messages[2].content, ChatConfig::default().failure_notice);
    assert!(!manager.is_loading().await);
    assert_eq!(manager.streaming_message().await, "");
}

#[tokio::test]
async fn failure_does_not_poison_later_sends() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/stream"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(frames_body(&["recovered"]), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let manager = manager_for(&server);
    manager.send("first").await;
    manager.send("second").await;

    let messages = manager.current_messages().await;
    let last = messages.last().expect("messages");
    assert_eq!(last.content, "recovered");
    assert!(!manager.is_loading().await);
}

#[tokio::test]
async fn empty_stream_appends_no_assistant_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/stream"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let manager = manager_for(&server);
    manager.send("hi").await;

    let messages = manager.current_messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, Role::User);
    assert!(!manager.is_loading().await);
    assert_eq!(manager.streaming_message().await, "");
}

#[tokio::test]
async fn blank_text_is_ignored() {
    let server = MockServer::start().await;
    let manager = manager_for(&server);

    manager.send("").await;
    manager.send("   \n\t").await;

    assert_eq!(manager.current_messages().await.len(), 1);
    let requests = server.received_requests().await.expect("recorded");
    assert!(requests.is_empty());
}
