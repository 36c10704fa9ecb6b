// Local persistence for conversation transcripts

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

use crate::markdown;
use crate::models::{ConversationMessage, ConversationMetadata, MessageRole};

pub struct Storage {
    config_dir: PathBuf,
    chats_dir: PathBuf,
}

impl Storage {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("lexchat");

        let chats_dir = config_dir.join("chats");

        fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        fs::create_dir_all(&chats_dir).context("Failed to create chats directory")?;

        Ok(Self {
            config_dir,
            chats_dir,
        })
    }

    pub fn get_conversation_path(&self, id: &Uuid) -> PathBuf {
        self.chats_dir.join(format!("{id}.md"))
    }

    pub fn get_metadata_path(&self, id: &Uuid) -> PathBuf {
        self.chats_dir.join(format!("{id}_meta.json"))
    }

    pub fn get_export_path(&self, id: &Uuid) -> PathBuf {
        self.chats_dir.join(format!("{id}.html"))
    }

    pub fn save_conversation(&self, id: &Uuid, entries: &[ConversationMessage]) -> Result<()> {
        let path = self.get_conversation_path(id);
        let mut content = String::new();

        for entry in entries {
            content.push_str("## ");
            content.push_str(role_heading(entry.role));
            content.push_str("\n\n");
            content.push_str(&entry.content);
            content.push_str("\n\n");
        }

        fs::write(&path, content).context("Failed to write conversation file")?;

        Ok(())
    }

    pub fn load_conversation(&self, id: &Uuid) -> Result<Vec<ConversationMessage>> {
        let path = self.get_conversation_path(id);

        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).context("Failed to read conversation file")?;

        Ok(Self::parse_conversation(&content))
    }

    fn parse_conversation(content: &str) -> Vec<ConversationMessage> {
        let mut entries = Vec::new();
        let sections: Vec<&str> = content.split("## ").collect();

        for section in sections.iter().skip(1) {
            if let Some((role_line, body)) = section.split_once('\n') {
                let role = match role_line.trim() {
                    "User" => MessageRole::User,
                    "Status" => MessageRole::Status,
                    _ => MessageRole::Bot,
                };
                entries.push(ConversationMessage::new(role, body.trim().to_string()));
            }
        }

        entries
    }

    /// Render the transcript to a standalone HTML document. Bot entries go
    /// through the restricted markdown transform; user and status entries
    /// are escaped verbatim.
    pub fn export_html(
        &self,
        metadata: &ConversationMetadata,
        entries: &[ConversationMessage],
    ) -> Result<PathBuf> {
        let path = self.get_export_path(&metadata.id);
        let title = metadata
            .summary
            .as_deref()
            .map_or_else(|| metadata.id.to_string(), ToString::to_string);

        let mut body = String::new();
        for entry in entries {
            let (class, html) = match entry.role {
                MessageRole::User => ("user", markdown::escape_with_breaks(&entry.content)),
                MessageRole::Status => ("status", markdown::escape_html(&entry.content)),
                MessageRole::Bot => ("bot", markdown::render_markdown(&entry.content)),
            };
            body.push_str(&format!("<div class=\"message {class}\">{html}</div>\n"));
        }

        let document = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{}</title>\n</head>\n<body>\n{body}</body>\n</html>\n",
            markdown::escape_html(&title)
        );

        fs::write(&path, document).context("Failed to write transcript export")?;

        Ok(path)
    }

    pub fn save_metadata(&self, metadata: &ConversationMetadata) -> Result<()> {
        let path = self.get_metadata_path(&metadata.id);
        let content =
            serde_json::to_string_pretty(metadata).context("Failed to serialize metadata")?;

        fs::write(&path, content).context("Failed to write metadata file")?;

        Ok(())
    }

    pub fn load_metadata(&self, id: &Uuid) -> Result<ConversationMetadata> {
        let path = self.get_metadata_path(id);

        if !path.exists() {
            anyhow::bail!("Metadata file not found");
        }

        let content = fs::read_to_string(&path).context("Failed to read metadata file")?;

        let metadata: ConversationMetadata =
            serde_json::from_str(&content).context("Failed to parse metadata file")?;

        Ok(metadata)
    }

    pub fn list_conversations(&self) -> Result<Vec<ConversationMetadata>> {
        let mut conversations = Vec::new();

        if !self.chats_dir.exists() {
            return Ok(conversations);
        }

        for entry in fs::read_dir(&self.chats_dir).context("Failed to read chats directory")? {
            let entry = entry?;
            let path = entry.path();

            if let Some(filename) = path.file_name() {
                let filename = filename.to_string_lossy();
                if filename.ends_with("_meta.json") {
                    let content = fs::read_to_string(&path)?;
                    if let Ok(metadata) = serde_json::from_str::<ConversationMetadata>(&content) {
                        conversations.push(metadata);
                    }
                }
            }
        }

        // Most recent first.
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(conversations)
    }

    pub fn delete_conversation(&self, id: &Uuid) -> Result<()> {
        for path in [
            self.get_conversation_path(id),
            self.get_metadata_path(id),
            self.get_export_path(id),
        ] {
            if path.exists() {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to delete {}", path.display()))?;
            }
        }

        Ok(())
    }

    #[allow(dead_code)]
    pub const fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }
}

fn role_heading(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "User",
        MessageRole::Bot => "Bot",
        MessageRole::Status => "Status",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().join(".config/lexchat");
        let chats_dir = config_dir.join("chats");

        fs::create_dir_all(&chats_dir).unwrap();

        let storage = Storage {
            config_dir,
            chats_dir,
        };

        (temp_dir, storage)
    }

    fn sample_entries() -> Vec<ConversationMessage> {
        vec![
            ConversationMessage::new(MessageRole::User, "Apa dasar hukum?".to_string()),
            ConversationMessage::new(MessageRole::Bot, "**UU 35/2009** applies.".to_string()),
            ConversationMessage::new(MessageRole::Status, "1.20s | 0 tools | agent".to_string()),
        ]
    }

    #[test]
    fn test_save_and_load_conversation() {
        let (_temp, storage) = setup_test_storage();
        let id = Uuid::new_v4();

        storage.save_conversation(&id, &sample_entries()).unwrap();

        let loaded = storage.load_conversation(&id).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].role, MessageRole::User);
        assert_eq!(loaded[0].content, "Apa dasar hukum?");
        assert_eq!(loaded[1].role, MessageRole::Bot);
        assert_eq!(loaded[2].role, MessageRole::Status);
    }

    #[test]
    fn test_load_missing_conversation_is_empty() {
        let (_temp, storage) = setup_test_storage();
        let loaded = storage.load_conversation(&Uuid::new_v4()).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_and_load_metadata() {
        let (_temp, storage) = setup_test_storage();
        let mut metadata = ConversationMetadata::new();
        metadata.set_summary("Narcotics precedent research".to_string());
        metadata.set_remote_id("abc123".to_string());

        storage.save_metadata(&metadata).unwrap();

        let loaded = storage.load_metadata(&metadata.id).unwrap();
        assert_eq!(loaded.id, metadata.id);
        assert_eq!(loaded.remote_id, Some("abc123".to_string()));
        assert_eq!(
            loaded.summary,
            Some("Narcotics precedent research".to_string())
        );
    }

    #[test]
    fn test_list_conversations_sorted_most_recent_first() {
        let (_temp, storage) = setup_test_storage();

        let mut meta1 = ConversationMetadata::new();
        meta1.set_summary("First".to_string());
        storage.save_metadata(&meta1).unwrap();

        let mut meta2 = ConversationMetadata::new();
        meta2.set_summary("Second".to_string());
        storage.save_metadata(&meta2).unwrap();

        let conversations = storage.list_conversations().unwrap();
        assert_eq!(conversations.len(), 2);
        assert!(conversations[0].updated_at >= conversations[1].updated_at);
    }

    #[test]
    fn test_delete_conversation_removes_all_files() {
        let (_temp, storage) = setup_test_storage();
        let mut metadata = ConversationMetadata::new();
        let id = metadata.id;
        metadata.set_summary("To delete".to_string());

        storage.save_conversation(&id, &sample_entries()).unwrap();
        storage.save_metadata(&metadata).unwrap();
        storage.export_html(&metadata, &sample_entries()).unwrap();

        storage.delete_conversation(&id).unwrap();

        assert!(!storage.get_conversation_path(&id).exists());
        assert!(!storage.get_metadata_path(&id).exists());
        assert!(!storage.get_export_path(&id).exists());
    }

    #[test]
    fn test_parse_conversation() {
        let content = "## User\n\nHello\n\n## Bot\n\nHi there!\n\n## Status\n\n0.50s\n\n";

        let entries = Storage::parse_conversation(content);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].content, "Hello");
        assert_eq!(entries[1].role, MessageRole::Bot);
        assert_eq!(entries[2].role, MessageRole::Status);
    }

    #[test]
    fn test_export_html_escapes_user_and_renders_bot() {
        let (_temp, storage) = setup_test_storage();
        let metadata = ConversationMetadata::new();
        let entries = vec![
            ConversationMessage::new(MessageRole::User, "<b>not markup</b>".to_string()),
            ConversationMessage::new(MessageRole::Bot, "**bold** answer".to_string()),
        ];

        let path = storage.export_html(&metadata, &entries).unwrap();
        let html = fs::read_to_string(path).unwrap();

        assert!(html.contains("&lt;b&gt;not markup&lt;/b&gt;"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(!html.contains("<b>not markup</b>"));
    }
}
