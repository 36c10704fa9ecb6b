use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for a locally stored conversation.
///
/// `remote_id` is the backend-assigned conversation identifier; it stays
/// `None` until the first completed exchange reports one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationMetadata {
    pub id: Uuid,
    pub remote_id: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationMetadata {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            remote_id: None,
            summary: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_remote_id(&mut self, remote_id: String) {
        self.remote_id = Some(remote_id);
        self.updated_at = Utc::now();
    }

    pub fn set_summary(&mut self, summary: String) {
        self.summary = Some(summary);
        self.updated_at = Utc::now();
    }
}

impl Default for ConversationMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// A single transcript entry.
///
/// Bot entries stream in incrementally: they start with `complete = false`
/// and are flipped by a `final_response` or terminal event, which lets the
/// renderer hold off markdown styling until the text stops changing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Bot,
    Status,
}

impl ConversationMessage {
    pub const fn new(role: MessageRole, content: String) -> Self {
        Self {
            role,
            content,
            complete: true,
        }
    }

    /// An empty bot entry awaiting streamed content.
    pub const fn pending_bot() -> Self {
        Self {
            role: MessageRole::Bot,
            content: String::new(),
            complete: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout: u64,
    pub theme: ThemeConfig,
}

const fn default_timeout() -> u64 {
    60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout: default_timeout(),
            theme: ThemeConfig::default(),
        }
    }
}

#[allow(clippy::struct_field_names)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub user_message_color: String,
    pub bot_message_color: String,
    pub status_message_color: String,
    pub border_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            user_message_color: "cyan".to_string(),
            bot_message_color: "green".to_string(),
            status_message_color: "darkgray".to_string(),
            border_color: "cyan".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_metadata_new() {
        let meta = ConversationMetadata::new();
        assert!(meta.remote_id.is_none());
        assert!(meta.summary.is_none());
    }

    #[test]
    fn test_conversation_metadata_set_remote_id() {
        let mut meta = ConversationMetadata::new();
        meta.set_remote_id("abc123".to_string());
        assert_eq!(meta.remote_id, Some("abc123".to_string()));
        assert!(meta.updated_at >= meta.created_at);
    }

    #[test]
    fn test_conversation_metadata_set_summary() {
        let mut meta = ConversationMetadata::new();
        meta.set_summary("Land dispute precedents".to_string());
        assert_eq!(meta.summary, Some("Land dispute precedents".to_string()));
    }

    #[test]
    fn test_message_creation() {
        let msg = ConversationMessage::new(MessageRole::User, "Hello".to_string());
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "Hello");
        assert!(msg.complete);
    }

    #[test]
    fn test_pending_bot_starts_incomplete() {
        let msg = ConversationMessage::pending_bot();
        assert_eq!(msg.role, MessageRole::Bot);
        assert!(msg.content.is_empty());
        assert!(!msg.complete);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&MessageRole::Status).unwrap();
        assert_eq!(json, "\"status\"");
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout, 60);
    }
}
