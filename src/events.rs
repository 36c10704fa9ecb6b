// Event types for async communication between network tasks and the UI loop

use crate::api::chat::StreamEvent;
use crate::api::types::SearchResponse;

#[derive(Debug)]
pub enum AppEvent {
    /// A parsed event from the active chat stream.
    Chat(StreamEvent),
    /// The chat stream failed at the transport level (connection drop,
    /// malformed payload, non-2xx before the stream started).
    ChatFailed(String),
    /// The chat stream closed without a terminal event.
    ChatClosed,
    SearchCompleted(Box<SearchResponse>),
    SearchFailed(String),
    /// Login round-trip finished; the token is already stored on success.
    LoginSucceeded,
    LoginFailed(String),
    /// A 401 was handled by the API client; credentials are gone and the
    /// user must sign in again.
    SessionExpired,
}
