use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use bytes::Bytes;
use colloquy_protocol::ChatRequest;
use futures::Stream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::debug;
use tracing::trace;

use crate::error::ChatErr;
use crate::error::Result;
use crate::flags::CHAT_CONNECT_TIMEOUT_MS;
use crate::flags::CHAT_STREAM_IDLE_TIMEOUT_MS;
use crate::sse::FrameDecoder;

/// Path of the streaming chat endpoint, relative to the configured base URL.
pub(crate) const CHAT_STREAM_PATH: &str = "/api/chat/stream";

/// Events published by an in-flight response stream.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StreamEvent {
    /// The accumulated assistant text so far. Published after every chunk
    /// that completed at least one fragment; lengths never decrease.
    Progress(String),
    /// Terminal event carrying the final text, always published last.
    /// Empty text is a legal outcome, distinct from failure.
    Completed(String),
}

pub(crate) struct ChatStream {
    rx_event: mpsc::Receiver<Result<StreamEvent>>,
}

impl Stream for ChatStream {
    type Item = Result<StreamEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx_event.poll_recv(cx)
    }
}

/// HTTP half of the chat core: one POST per send, the response consumed as
/// an incremental byte stream. No retries; a failed send surfaces once and
/// the caller decides what to show.
#[derive(Debug, Clone)]
pub(crate) struct ChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(*CHAT_CONNECT_TIMEOUT_MS)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_http(http, base_url)
    }

    pub(crate) fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    /// Open the streaming request and hand back the event stream. Decoding
    /// and accumulation happen on a background task; the caller only sees
    /// cumulative text.
    pub(crate) async fn stream_chat(&self, request: &ChatRequest) -> Result<ChatStream> {
        let url = format!("{}{CHAT_STREAM_PATH}", self.base_url);
        debug!(url, session_id = %request.session_id, "POST (chat stream)");
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatErr::UnexpectedStatus(status, body));
        }

        let (tx_event, rx_event) = mpsc::channel::<Result<StreamEvent>>(16);
        tokio::spawn(process_frame_stream(response.bytes_stream(), tx_event));
        Ok(ChatStream { rx_event })
    }
}

/// Read loop for one response: every chunk goes through the frame decoder,
/// decoded fragments extend the running full text, and each step that made
/// progress is published. End of input flushes the decoder's carry-over,
/// publishes the final accumulator state once more, then completes.
async fn process_frame_stream<S>(mut stream: S, tx_event: mpsc::Sender<Result<StreamEvent>>)
where
    S: Stream<Item = reqwest::Result<Bytes>> + Unpin,
{
    let idle_timeout = *CHAT_STREAM_IDLE_TIMEOUT_MS;
    let mut decoder = FrameDecoder::new();
    let mut full_response = String::new();

    loop {
        let chunk = match timeout(idle_timeout, stream.next()).await {
            Ok(Some(Ok(chunk))) => chunk,
            Ok(Some(Err(e))) => {
                let _ = tx_event.send(Err(ChatErr::Stream(e.to_string()))).await;
                return;
            }
            Ok(None) => {
                if let Some(tail) = decoder.finish() {
                    full_response.push_str(&tail);
                }
                let _ = tx_event
                    .send(Ok(StreamEvent::Progress(full_response.clone())))
                    .await;
                let _ = tx_event
                    .send(Ok(StreamEvent::Completed(full_response)))
                    .await;
                return;
            }
            Err(_) => {
                let _ = tx_event
                    .send(Err(ChatErr::Stream(
                        "idle timeout waiting for chunk".to_string(),
                    )))
                    .await;
                return;
            }
        };

        trace!("chunk: {} bytes", chunk.len());
        let fragments = decoder.feed(&chunk);
        if fragments.is_empty() {
            continue;
        }
        for fragment in fragments {
            full_response.push_str(&fragment);
        }
        let _ = tx_event
            .send(Ok(StreamEvent::Progress(full_response.clone())))
            .await;
    }
}
