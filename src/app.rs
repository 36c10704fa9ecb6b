use crate::api::types::{SearchMetrics, SearchResponse, SearchResult};
use crate::conversation::Conversation;
use crate::models::{ConversationMetadata, ThemeConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Chat,
    Search,
    Login,
}

/// State of the search view.
#[derive(Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub metrics: Option<SearchMetrics>,
    pub total_results: u64,
    pub error: Option<String>,
    pub is_searching: bool,
    pub has_searched: bool,
}

impl SearchState {
    pub fn apply_response(&mut self, response: SearchResponse) {
        self.results = response.results;
        self.metrics = Some(response.metrics);
        self.total_results = response.total_results;
        self.error = None;
        self.is_searching = false;
        self.has_searched = true;
    }

    /// A failed search clears any previous results.
    pub fn fail(&mut self, message: String) {
        self.results.clear();
        self.metrics = None;
        self.total_results = 0;
        self.error = Some(message);
        self.is_searching = false;
        self.has_searched = true;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The summary card comes from the top result; with no results there is
    /// no card.
    pub fn summary(&self) -> Option<&str> {
        self.results.first().map(|r| r.summary.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
    pub is_submitting: bool,
}

impl Default for LoginState {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: LoginField::Email,
            error: None,
            is_submitting: false,
        }
    }
}

impl LoginState {
    pub const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn focused_input(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub mode: AppMode,
    pub should_quit: bool,
    pub conversation: Conversation,
    pub metadata: ConversationMetadata,
    pub input_buffer: String,
    pub scroll_offset: usize,
    pub show_help: bool,
    pub exit_pending: bool,
    pub search: SearchState,
    pub login: LoginState,
    pub theme: ThemeConfig,
    /// Transient message shown in the status bar (export path, save errors).
    pub notice: Option<String>,
}

impl App {
    pub fn new(conversation_id: Option<String>) -> Self {
        Self {
            mode: AppMode::Chat,
            should_quit: false,
            conversation: Conversation::new(conversation_id),
            metadata: ConversationMetadata::new(),
            input_buffer: String::new(),
            scroll_offset: 0,
            show_help: false,
            exit_pending: false,
            search: SearchState::default(),
            login: LoginState::default(),
            theme: ThemeConfig::default(),
            notice: None,
        }
    }

    pub const fn quit(&mut self) {
        self.should_quit = true;
    }

    pub const fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub const fn switch_mode(&mut self, mode: AppMode) {
        self.mode = mode;
    }

    pub const fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount);
    }

    pub const fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub const fn scroll_to_bottom(&mut self) {
        // The rendering code clamps this to the real maximum.
        self.scroll_offset = usize::MAX;
    }

    /// Start over with a fresh backend conversation.
    pub fn new_conversation(&mut self) {
        self.conversation.reset(None);
        self.metadata = ConversationMetadata::new();
        self.scroll_offset = 0;
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::SearchMetrics;

    fn empty_response(total: u64) -> SearchResponse {
        SearchResponse {
            query: "narkotika".to_string(),
            results: Vec::new(),
            metrics: SearchMetrics {
                query_time: 0.1,
                retrieval_time: 0.1,
                generation_time: 0.1,
                validation_time: 0.1,
                documents_retrieved: 0,
                tokens_used: 0,
                cache_hit: false,
            },
            timestamp: "2025-01-01T00:00:00Z".to_string(),
            filters_applied: serde_json::Value::Null,
            total_results: total,
            has_more: false,
        }
    }

    #[test]
    fn test_app_new() {
        let app = App::new(None);
        assert_eq!(app.mode, AppMode::Chat);
        assert!(!app.should_quit);
        assert!(app.conversation.entries().is_empty());
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::new(None);
        app.quit();
        assert!(app.should_quit);
    }

    #[test]
    fn test_switch_mode() {
        let mut app = App::new(None);
        app.switch_mode(AppMode::Search);
        assert_eq!(app.mode, AppMode::Search);
    }

    #[test]
    fn test_scrolling() {
        let mut app = App::new(None);
        app.scroll_offset = 10;
        app.scroll_up(3);
        assert_eq!(app.scroll_offset, 7);
        app.scroll_up(100);
        assert_eq!(app.scroll_offset, 0);
        app.scroll_down(5);
        assert_eq!(app.scroll_offset, 5);
        app.scroll_to_top();
        assert_eq!(app.scroll_offset, 0);
        app.scroll_to_bottom();
        assert_eq!(app.scroll_offset, usize::MAX);
    }

    #[test]
    fn test_new_conversation_resets_transcript_and_metadata() {
        let mut app = App::new(Some("abc123".to_string()));
        app.conversation.begin_exchange("question").unwrap();
        let old_local_id = app.metadata.id;

        app.new_conversation();

        assert!(app.conversation.entries().is_empty());
        assert_eq!(app.conversation.conversation_id(), None);
        assert_ne!(app.metadata.id, old_local_id);
    }

    #[test]
    fn test_search_empty_results_has_no_summary_card() {
        let mut search = SearchState::default();
        search.apply_response(empty_response(0));

        assert!(search.has_searched);
        assert!(search.results.is_empty());
        assert_eq!(search.total_results, 0);
        assert!(search.summary().is_none());
        assert!(search.error.is_none());
    }

    #[test]
    fn test_search_failure_clears_previous_results() {
        let mut search = SearchState::default();
        let mut response = empty_response(1);
        response.results.push(SearchResult {
            summary: "Putusan summary".to_string(),
            key_points: vec![],
            source_documents: vec![],
            validation_status: "validated".to_string(),
            confidence_score: 0.9,
            legal_areas: vec![],
        });
        search.apply_response(response);
        assert_eq!(search.summary(), Some("Putusan summary"));

        search.fail("index unavailable".to_string());
        assert!(search.results.is_empty());
        assert_eq!(search.error.as_deref(), Some("index unavailable"));
        assert!(search.summary().is_none());
        assert_eq!(search.total_results, 0);
    }

    #[test]
    fn test_login_focus_toggle() {
        let mut login = LoginState::default();
        assert_eq!(login.focus, LoginField::Email);
        login.toggle_focus();
        assert_eq!(login.focus, LoginField::Password);
        login.focused_input().push('x');
        assert_eq!(login.password, "x");
    }
}
