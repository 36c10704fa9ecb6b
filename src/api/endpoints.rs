// REST endpoint paths for the legal research backend
//
// Paths with an `:id` placeholder are substituted with [`with_id`] before
// dispatch; the id is taken verbatim, its format is not validated here.

pub mod auth {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const REFRESH: &str = "/auth/refresh";
    pub const LOGOUT: &str = "/auth/logout";
    pub const PROFILE: &str = "/auth/profile";
}

pub mod recording {
    pub const START: &str = "/recording/start";
    pub const STOP: &str = "/recording/stop";
    pub const PAUSE: &str = "/recording/pause";
    pub const RESUME: &str = "/recording/resume";
    pub const UPLOAD: &str = "/recording/upload";
    pub const STATUS: &str = "/recording/status";
    pub const LIST: &str = "/recording/list";
    pub const DELETE: &str = "/recording/:id";
}

pub mod transcription {
    pub const CREATE: &str = "/transcription/create";
    pub const GET: &str = "/transcription/:id";
    pub const UPDATE: &str = "/transcription/:id";
    pub const DELETE: &str = "/transcription/:id";
    pub const LIST: &str = "/transcription/list";
    pub const PROCESS: &str = "/transcription/process";
}

pub mod analysis {
    pub const GENERATE: &str = "/analysis/generate";
    pub const GET: &str = "/analysis/:id";
    pub const UPDATE: &str = "/analysis/:id";
    pub const DELETE: &str = "/analysis/:id";
    pub const LIST: &str = "/analysis/list";
    pub const SUMMARY: &str = "/analysis/summary";
    pub const KEY_ISSUES: &str = "/analysis/key-issues";
    pub const ACTION_ITEMS: &str = "/analysis/action-items";
}

pub mod documents {
    pub const UPLOAD: &str = "/documents/upload";
    pub const GET: &str = "/documents/:id";
    pub const UPDATE: &str = "/documents/:id";
    pub const DELETE: &str = "/documents/:id";
    pub const LIST: &str = "/documents/list";
    pub const SEARCH: &str = "/documents/search";
    pub const DOWNLOAD: &str = "/documents/:id/download";
    pub const SHARE: &str = "/documents/:id/share";
}

pub mod cases {
    pub const CREATE: &str = "/cases/create";
    pub const GET: &str = "/cases/:id";
    pub const UPDATE: &str = "/cases/:id";
    pub const DELETE: &str = "/cases/:id";
    pub const LIST: &str = "/cases/list";
    pub const SEARCH: &str = "/cases/search";
    pub const ASSIGN: &str = "/cases/:id/assign";
}

pub mod settings {
    pub const GET: &str = "/settings";
    pub const UPDATE: &str = "/settings";
    pub const THEME: &str = "/settings/theme";
    pub const NOTIFICATIONS: &str = "/settings/notifications";
}

pub mod search {
    pub const GLOBAL: &str = "/api/v1/search/";
}

pub mod chat {
    pub const STREAM: &str = "/api/v1/chat/stream";
}

pub const HEALTH: &str = "/health";
pub const STATUS: &str = "/status";

/// Substitute the `:id` placeholder with a literal id.
pub fn with_id(template: &str, id: &str) -> String {
    template.replace(":id", id)
}
