use serde::Deserialize;
use serde::Serialize;

use crate::id::SessionId;

/// Body of the one outbound request the core makes: POST to the streaming
/// chat endpoint. Field names are camelCase on the wire; the response is not
/// JSON but a marker-framed text stream (see the core crate's `sse` module).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub session_id: SessionId,
    pub message: String,
    pub enable_thinking: bool,
}
