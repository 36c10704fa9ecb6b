// Client-side session state: bearer token and active conversation id

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Durable per-user state injected into the API client and the chat view.
///
/// Both values are opaque strings owned by the backend; the client only
/// stores and replays them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub conversation_id: Option<String>,
}

impl Session {
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Shared handle used by request tasks; the UI loop holds the other clone.
pub type SharedSession = Arc<Mutex<Session>>;

pub fn shared(session: Session) -> SharedSession {
    Arc::new(Mutex::new(session))
}

/// File-backed persistence for [`Session`], one JSON file under the
/// platform config directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("lexchat");

        fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        Ok(Self {
            path: config_dir.join("session.json"),
        })
    }

    /// A store rooted at an explicit path; tests point this at a temp dir.
    pub const fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::default());
        }

        let content = fs::read_to_string(&self.path).context("Failed to read session file")?;
        let session = serde_json::from_str(&content).context("Failed to parse session file")?;

        Ok(session)
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let content =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        fs::write(&self.path, content).context("Failed to write session file")?;

        Ok(())
    }

    /// Drop the stored token, keeping the conversation id intact.
    pub fn clear_token(&self) -> Result<()> {
        let mut session = self.load()?;
        session.token = None;
        self.save(&session)
    }
}
