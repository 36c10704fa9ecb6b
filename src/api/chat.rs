// Chat stream transport: POST + incremental event parsing

use futures::stream::{Stream, StreamExt};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use super::{endpoints, ApiClient, ApiError, ApiResult};

#[derive(Debug, Clone, Serialize)]
pub struct ChatStreamRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_reasoning: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
}

/// One event from the chat stream. The backend tags each JSON payload with a
/// `type` field; `complete` and `error` are terminal, everything else may
/// repeat. `partial_response`/`final_response` carry cumulative text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Status {
        message: String,
    },
    PartialResponse {
        content: String,
    },
    FinalResponse {
        content: String,
    },
    Complete {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        conversation_id: Option<String>,
        response_time: f64,
        #[serde(default)]
        tools_used: Vec<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        workflow_used: Option<bool>,
    },
    Error {
        message: String,
    },
}

pub type ChatEventStream = Pin<Box<dyn Stream<Item = ApiResult<StreamEvent>> + Send>>;

/// Parse one stream line. The payloads are server-sent-event-like: an
/// optional `data:` prefix, blank keep-alive lines, and `:` comments are
/// tolerated. Returns `None` for lines that carry no event.
fn parse_event(line: &str) -> Option<ApiResult<StreamEvent>> {
    let mut payload = line.trim();
    if let Some(rest) = payload.strip_prefix("data:") {
        payload = rest.trim_start();
    }
    if payload.is_empty() || payload.starts_with(':') || payload == "[DONE]" {
        return None;
    }

    Some(serde_json::from_str::<StreamEvent>(payload).map_err(ApiError::from))
}

impl ApiClient {
    /// Open the chat stream. The returned stream yields typed events until
    /// the connection closes; a non-2xx status before the stream starts is
    /// reported through the usual error mapping (including the 401 path).
    pub async fn stream_chat(&self, request: &ChatStreamRequest) -> ApiResult<ChatEventStream> {
        let path = endpoints::chat::STREAM;
        let builder = self.request(Method::POST, path).json(request);
        let response = self.execute(builder, &Method::POST, path).await?;

        // Buffer bytes until a full line is available; a trailing payload
        // without a newline is parsed when the connection closes.
        let stream = futures::stream::unfold(
            (response.bytes_stream(), Vec::new()),
            |(mut byte_stream, mut buffer)| async move {
                loop {
                    if let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                        let mut line = buffer.split_off(pos + 1);
                        std::mem::swap(&mut buffer, &mut line);

                        let text = String::from_utf8_lossy(&line).into_owned();
                        if let Some(event) = parse_event(&text) {
                            return Some((event, (byte_stream, buffer)));
                        }
                        continue;
                    }

                    match byte_stream.next().await {
                        Some(Ok(bytes)) => buffer.extend_from_slice(&bytes),
                        Some(Err(err)) => {
                            return Some((Err(ApiError::from(err)), (byte_stream, buffer)));
                        }
                        None => {
                            if buffer.is_empty() {
                                return None;
                            }
                            let text = String::from_utf8_lossy(&buffer).into_owned();
                            buffer.clear();
                            if let Some(event) = parse_event(&text) {
                                return Some((event, (byte_stream, buffer)));
                            }
                            return None;
                        }
                    }
                }
            },
        );

        Ok(Box::pin(stream))
    }
}
