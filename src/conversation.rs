// Conversation transcript state and the per-exchange state machine

use crate::api::chat::StreamEvent;
use crate::models::{ConversationMessage, MessageRole};

/// Lifecycle of a single exchange (one user message and the bot events it
/// produces). `Completed` and `Errored` are terminal; a new exchange may
/// begin from any state except `Sending`/`Streaming`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePhase {
    Idle,
    Sending,
    Streaming,
    Completed,
    Errored,
}

/// What applying one stream event did to the transcript.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Applied {
    /// Set when a `complete` event carried a conversation id that differs
    /// from the one held so far. Reported at most once per id so the caller
    /// can persist it without tracking duplicates itself.
    pub new_conversation_id: Option<String>,
    /// False when the event was dropped (no exchange in flight).
    pub applied: bool,
}

impl Applied {
    const fn ignored() -> Self {
        Self {
            new_conversation_id: None,
            applied: false,
        }
    }
}

/// The ordered transcript plus the state machine that folds stream events
/// into it. Pure state: transport and persistence live elsewhere.
#[derive(Debug)]
pub struct Conversation {
    entries: Vec<ConversationMessage>,
    phase: ExchangePhase,
    conversation_id: Option<String>,
    // Index of the bot entry the current exchange is streaming into.
    pending_bot: Option<usize>,
}

impl Conversation {
    pub const fn new(conversation_id: Option<String>) -> Self {
        Self {
            entries: Vec::new(),
            phase: ExchangePhase::Idle,
            conversation_id,
            pending_bot: None,
        }
    }

    pub fn entries(&self) -> &[ConversationMessage] {
        &self.entries
    }

    pub const fn phase(&self) -> ExchangePhase {
        self.phase
    }

    pub const fn conversation_id(&self) -> Option<&String> {
        self.conversation_id.as_ref()
    }

    pub const fn is_in_flight(&self) -> bool {
        matches!(self.phase, ExchangePhase::Sending | ExchangePhase::Streaming)
    }

    fn push_status(&mut self, content: String) {
        self.entries
            .push(ConversationMessage::new(MessageRole::Status, content));
    }

    /// Start a new exchange. Returns the trimmed message to send, or `None`
    /// when the input is empty after trimming or an exchange is already in
    /// flight (both are silent no-ops).
    pub fn begin_exchange(&mut self, input: &str) -> Option<String> {
        let message = input.trim();
        if message.is_empty() || self.is_in_flight() {
            return None;
        }

        self.entries.push(ConversationMessage::new(
            MessageRole::User,
            message.to_string(),
        ));
        self.entries.push(ConversationMessage::pending_bot());
        self.pending_bot = Some(self.entries.len() - 1);
        self.phase = ExchangePhase::Sending;

        Some(message.to_string())
    }

    /// Fold one stream event into the transcript.
    ///
    /// Events arriving outside an active exchange (before `begin_exchange`,
    /// after a terminal event, or after `cancel`) are dropped.
    pub fn apply(&mut self, event: StreamEvent) -> Applied {
        if !self.is_in_flight() {
            return Applied::ignored();
        }
        self.phase = ExchangePhase::Streaming;

        let mut outcome = Applied {
            new_conversation_id: None,
            applied: true,
        };

        match event {
            StreamEvent::Status { message } => self.push_status(message),
            // Cumulative text: each event replaces the pending content.
            StreamEvent::PartialResponse { content } => self.set_pending(content, false),
            StreamEvent::FinalResponse { content } => self.set_pending(content, true),
            StreamEvent::Complete {
                conversation_id,
                response_time,
                tools_used,
                workflow_used,
            } => {
                self.finish_pending();
                if let Some(id) = conversation_id {
                    if self.conversation_id.as_ref() != Some(&id) {
                        self.conversation_id = Some(id.clone());
                        outcome.new_conversation_id = Some(id);
                    }
                }
                let mode = if workflow_used.unwrap_or(false) {
                    "workflow"
                } else {
                    "agent"
                };
                self.push_status(format!(
                    "{response_time:.2}s | {} tools | {mode}",
                    tools_used.len()
                ));
                self.phase = ExchangePhase::Completed;
                self.pending_bot = None;
            }
            StreamEvent::Error { message } => {
                self.set_pending(format!("Error: {message}"), true);
                self.phase = ExchangePhase::Errored;
                self.pending_bot = None;
            }
        }

        outcome
    }

    /// Transport-level failure: connection drop or non-2xx before the stream
    /// started. Surfaces as a single synthetic bot message; events already
    /// applied stay untouched.
    pub fn fail(&mut self, reason: &str) {
        if !self.is_in_flight() {
            return;
        }
        self.set_pending(format!("Connection error: {reason}"), true);
        self.phase = ExchangePhase::Errored;
        self.pending_bot = None;
    }

    /// Abort the in-flight exchange. The caller aborts the transport task;
    /// entering a terminal state here guarantees any late events it already
    /// queued are dropped.
    pub fn cancel(&mut self) {
        if !self.is_in_flight() {
            return;
        }
        self.finish_pending();
        self.push_status("Response cancelled".to_string());
        self.phase = ExchangePhase::Errored;
        self.pending_bot = None;
    }

    /// Discard the transcript and start over, optionally carrying a
    /// conversation id (None begins a fresh backend conversation).
    pub fn reset(&mut self, conversation_id: Option<String>) {
        self.entries.clear();
        self.phase = ExchangePhase::Idle;
        self.conversation_id = conversation_id;
        self.pending_bot = None;
    }

    fn set_pending(&mut self, content: String, complete: bool) {
        if let Some(idx) = self.pending_bot {
            let entry = &mut self.entries[idx];
            entry.content = content;
            entry.complete = complete;
        }
    }

    fn finish_pending(&mut self) {
        if let Some(idx) = self.pending_bot {
            self.entries[idx].complete = true;
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_event(id: Option<&str>, response_time: f64) -> StreamEvent {
        StreamEvent::Complete {
            conversation_id: id.map(ToString::to_string),
            response_time,
            tools_used: Vec::new(),
            workflow_used: Some(false),
        }
    }

    #[test]
    fn test_begin_exchange_appends_user_and_pending_bot() {
        let mut conv = Conversation::new(None);
        let sent = conv.begin_exchange("  Apa dasar hukum?  ");
        assert_eq!(sent, Some("Apa dasar hukum?".to_string()));
        assert_eq!(conv.phase(), ExchangePhase::Sending);

        let entries = conv.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, MessageRole::User);
        assert_eq!(entries[0].content, "Apa dasar hukum?");
        assert_eq!(entries[1].role, MessageRole::Bot);
        assert!(!entries[1].complete);
    }

    #[test]
    fn test_begin_exchange_rejects_blank_input() {
        let mut conv = Conversation::new(None);
        assert_eq!(conv.begin_exchange("   \n\t "), None);
        assert!(conv.entries().is_empty());
        assert_eq!(conv.phase(), ExchangePhase::Idle);
    }

    #[test]
    fn test_begin_exchange_rejects_while_in_flight() {
        let mut conv = Conversation::new(None);
        conv.begin_exchange("first").unwrap();
        assert_eq!(conv.begin_exchange("second"), None);
        assert_eq!(conv.entries().len(), 2);
    }

    #[test]
    fn test_partial_responses_replace_not_concatenate() {
        let mut conv = Conversation::new(None);
        conv.begin_exchange("question").unwrap();

        for content in ["The", "The answer", "The answer is 42."] {
            conv.apply(StreamEvent::PartialResponse {
                content: content.to_string(),
            });
        }

        let bot = &conv.entries()[1];
        assert_eq!(bot.content, "The answer is 42.");
        assert!(!bot.complete);
        assert_eq!(conv.phase(), ExchangePhase::Streaming);
    }

    #[test]
    fn test_final_response_replaces_and_completes_entry() {
        let mut conv = Conversation::new(None);
        conv.begin_exchange("question").unwrap();
        conv.apply(StreamEvent::PartialResponse {
            content: "partial".to_string(),
        });
        conv.apply(StreamEvent::FinalResponse {
            content: "final text".to_string(),
        });

        let bot = &conv.entries()[1];
        assert_eq!(bot.content, "final text");
        assert!(bot.complete);
    }

    #[test]
    fn test_status_events_append_and_never_merge() {
        let mut conv = Conversation::new(None);
        conv.begin_exchange("question").unwrap();
        conv.apply(StreamEvent::Status {
            message: "Retrieving documents".to_string(),
        });
        conv.apply(StreamEvent::Status {
            message: "Generating answer".to_string(),
        });

        let statuses: Vec<_> = conv
            .entries()
            .iter()
            .filter(|e| e.role == MessageRole::Status)
            .collect();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].content, "Retrieving documents");
        assert_eq!(statuses[1].content, "Generating answer");
    }

    #[test]
    fn test_complete_scenario_reports_id_and_appends_timing_status() {
        let mut conv = Conversation::new(None);
        conv.begin_exchange("Apa dasar hukum?").unwrap();

        let outcome = conv.apply(complete_event(Some("abc123"), 1.2));
        assert_eq!(outcome.new_conversation_id, Some("abc123".to_string()));
        assert_eq!(conv.conversation_id(), Some(&"abc123".to_string()));
        assert_eq!(conv.phase(), ExchangePhase::Completed);

        let status = conv.entries().last().unwrap();
        assert_eq!(status.role, MessageRole::Status);
        assert!(status.content.contains("1.20s"), "got {}", status.content);
        assert!(status.content.contains("0 tools"));
        assert!(status.content.contains("agent"));
    }

    #[test]
    fn test_repeated_conversation_id_is_idempotent() {
        let mut conv = Conversation::new(Some("abc123".to_string()));
        conv.begin_exchange("first").unwrap();
        let outcome = conv.apply(complete_event(Some("abc123"), 0.5));
        assert_eq!(outcome.new_conversation_id, None);
        assert!(outcome.applied);

        conv.begin_exchange("second").unwrap();
        let outcome = conv.apply(complete_event(Some("xyz789"), 0.5));
        assert_eq!(outcome.new_conversation_id, Some("xyz789".to_string()));
    }

    #[test]
    fn test_error_event_overwrites_pending_and_terminates() {
        let mut conv = Conversation::new(None);
        conv.begin_exchange("question").unwrap();
        conv.apply(StreamEvent::PartialResponse {
            content: "partial".to_string(),
        });
        conv.apply(StreamEvent::Error {
            message: "model unavailable".to_string(),
        });

        let bot = &conv.entries()[1];
        assert_eq!(bot.content, "Error: model unavailable");
        assert!(bot.complete);
        assert_eq!(conv.phase(), ExchangePhase::Errored);
    }

    #[test]
    fn test_no_events_applied_after_terminal() {
        let mut conv = Conversation::new(None);
        conv.begin_exchange("question").unwrap();
        conv.apply(complete_event(None, 0.1));
        let len = conv.entries().len();

        let outcome = conv.apply(StreamEvent::PartialResponse {
            content: "stale".to_string(),
        });
        assert!(!outcome.applied);
        assert_eq!(conv.entries().len(), len);
        assert_eq!(conv.entries()[1].content, "");
    }

    #[test]
    fn test_terminal_phase_allows_next_exchange() {
        let mut conv = Conversation::new(None);
        conv.begin_exchange("first").unwrap();
        conv.apply(complete_event(None, 0.1));

        assert!(conv.begin_exchange("second").is_some());
        assert_eq!(conv.phase(), ExchangePhase::Sending);
        // The new exchange streams into its own bot slot.
        conv.apply(StreamEvent::PartialResponse {
            content: "fresh".to_string(),
        });
        assert_eq!(conv.entries().last().unwrap().content, "fresh");
    }

    #[test]
    fn test_transport_failure_becomes_synthetic_bot_message() {
        let mut conv = Conversation::new(None);
        conv.begin_exchange("question").unwrap();
        conv.apply(StreamEvent::Status {
            message: "Working".to_string(),
        });
        conv.fail("connection refused");

        let bot = &conv.entries()[1];
        assert_eq!(bot.content, "Connection error: connection refused");
        assert_eq!(conv.phase(), ExchangePhase::Errored);
        // The earlier status entry is not corrupted.
        assert_eq!(conv.entries()[2].content, "Working");
    }

    #[test]
    fn test_cancel_drops_late_events() {
        let mut conv = Conversation::new(None);
        conv.begin_exchange("question").unwrap();
        conv.apply(StreamEvent::PartialResponse {
            content: "partial".to_string(),
        });
        conv.cancel();
        assert_eq!(conv.phase(), ExchangePhase::Errored);

        let outcome = conv.apply(StreamEvent::FinalResponse {
            content: "late".to_string(),
        });
        assert!(!outcome.applied);
        assert_eq!(conv.entries()[1].content, "partial");
    }

    #[test]
    fn test_reset_clears_transcript_and_id() {
        let mut conv = Conversation::new(Some("abc123".to_string()));
        conv.begin_exchange("question").unwrap();
        conv.apply(complete_event(None, 0.1));

        conv.reset(None);
        assert!(conv.entries().is_empty());
        assert_eq!(conv.conversation_id(), None);
        assert_eq!(conv.phase(), ExchangePhase::Idle);
    }
}
