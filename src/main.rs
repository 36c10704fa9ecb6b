mod api;
mod app;
mod config;
mod conversation;
mod events;
mod logging;
mod markdown;
mod models;
mod session;
mod storage;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::Backend, prelude::*};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use api::chat::{ChatStreamRequest, StreamEvent};
use api::types::{LoginRequest, SearchRequest};
use api::{ApiClient, ApiError};
use app::{App, AppMode};
use events::AppEvent;
use session::{SessionStore, SharedSession};
use storage::Storage;

// Options sent with every chat exchange.
const INCLUDE_REASONING: bool = true;
const MAX_TOKENS: u64 = 100;

#[tokio::main]
async fn main() -> Result<()> {
    let app_config = config::load_config()?;
    let _log_guard = logging::init(config::get_config_dir()?.join("logs"));
    info!(base_url = %app_config.api_base_url, "starting lexchat");

    let store = SessionStore::new()?;
    let saved_session = store.load().unwrap_or_default();
    let session = session::shared(saved_session.clone());

    let client = ApiClient::new(
        app_config.api_base_url.clone(),
        app_config.request_timeout,
        session.clone(),
        store.clone(),
    )?;
    let storage = Storage::new()?;

    let mut app = App::new(saved_session.conversation_id);
    app.theme = app_config.theme;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Channel for events coming back from network tasks
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    let res = run_app(
        &mut terminal,
        &mut app,
        &client,
        &storage,
        &session,
        &store,
        &tx,
        &mut rx,
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn persist_session(session: &SharedSession, store: &SessionStore) -> Result<()> {
    let snapshot = session
        .lock()
        .map_err(|_| anyhow::anyhow!("session lock poisoned"))?
        .clone();
    store.save(&snapshot)
}

fn save_transcript(app: &mut App, storage: &Storage) {
    if app.conversation.entries().is_empty() {
        return;
    }
    if app.metadata.summary.is_none() {
        if let Some(first_user) = app
            .conversation
            .entries()
            .iter()
            .find(|e| e.role == models::MessageRole::User)
        {
            let summary: String = first_user.content.chars().take(80).collect();
            app.metadata.set_summary(summary);
        }
    }

    let result = storage
        .save_conversation(&app.metadata.id, app.conversation.entries())
        .and_then(|()| storage.save_metadata(&app.metadata));
    if let Err(err) = result {
        error!(error = %err, "failed to save transcript");
        app.notice = Some("Failed to save transcript".to_string());
    }
}

fn handle_app_event(
    app: &mut App,
    event: AppEvent,
    session: &SharedSession,
    store: &SessionStore,
    storage: &Storage,
) {
    match event {
        AppEvent::Chat(stream_event) => {
            let outcome = app.conversation.apply(stream_event);
            if !outcome.applied {
                return;
            }

            // Persist a newly assigned conversation id exactly once.
            if let Some(id) = outcome.new_conversation_id {
                app.metadata.set_remote_id(id.clone());
                if let Ok(mut live) = session.lock() {
                    live.conversation_id = Some(id);
                }
                if let Err(err) = persist_session(session, store) {
                    error!(error = %err, "failed to persist conversation id");
                }
            }

            if !app.conversation.is_in_flight() {
                save_transcript(app, storage);
            }
            app.scroll_to_bottom();
        }
        AppEvent::ChatFailed(reason) => {
            app.conversation.fail(&reason);
            app.scroll_to_bottom();
        }
        AppEvent::ChatClosed => {
            // The stream ended without a terminal event.
            app.conversation.fail("stream closed before completion");
            app.scroll_to_bottom();
        }
        AppEvent::SearchCompleted(response) => {
            app.search.apply_response(*response);
            app.scroll_to_top();
        }
        AppEvent::SearchFailed(reason) => {
            app.search.fail(reason);
        }
        AppEvent::LoginSucceeded => {
            app.login.is_submitting = false;
            app.login.error = None;
            app.login.password.clear();
            app.notice = Some("Signed in".to_string());
            app.switch_mode(AppMode::Chat);
        }
        AppEvent::LoginFailed(reason) => {
            app.login.is_submitting = false;
            app.login.error = Some(reason);
        }
        AppEvent::SessionExpired => {
            app.login.error = Some("Your session has expired".to_string());
            app.switch_mode(AppMode::Login);
        }
    }
}

fn send_message(
    app: &mut App,
    client: &ApiClient,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) -> Option<JoinHandle<()>> {
    let message = app.conversation.begin_exchange(&app.input_buffer)?;
    app.input_buffer.clear();
    app.scroll_to_bottom();

    let request = ChatStreamRequest {
        message,
        conversation_id: app.conversation.conversation_id().cloned(),
        include_reasoning: Some(INCLUDE_REASONING),
        max_tokens: Some(MAX_TOKENS),
    };

    let client = client.clone();
    let tx = event_tx.clone();

    Some(tokio::spawn(async move {
        match client.stream_chat(&request).await {
            Ok(mut stream) => {
                let mut terminal_seen = false;
                while let Some(result) = stream.next().await {
                    match result {
                        Ok(stream_event) => {
                            let is_terminal = matches!(
                                stream_event,
                                StreamEvent::Complete { .. } | StreamEvent::Error { .. }
                            );
                            let _ = tx.send(AppEvent::Chat(stream_event));
                            if is_terminal {
                                terminal_seen = true;
                                break;
                            }
                        }
                        Err(err) => {
                            let _ = tx.send(AppEvent::ChatFailed(err.to_string()));
                            terminal_seen = true;
                            break;
                        }
                    }
                }
                if !terminal_seen {
                    let _ = tx.send(AppEvent::ChatClosed);
                }
            }
            Err(ApiError::Unauthorized) => {
                let _ = tx.send(AppEvent::ChatFailed("authentication required".to_string()));
                let _ = tx.send(AppEvent::SessionExpired);
            }
            Err(err) => {
                let _ = tx.send(AppEvent::ChatFailed(err.to_string()));
            }
        }
    }))
}

fn run_search(app: &mut App, client: &ApiClient, event_tx: &mpsc::UnboundedSender<AppEvent>) {
    let query = app.input_buffer.trim().to_string();
    if query.is_empty() || app.search.is_searching {
        return;
    }

    app.search.query.clone_from(&query);
    app.search.is_searching = true;
    app.search.error = None;
    app.input_buffer.clear();

    let client = client.clone();
    let tx = event_tx.clone();

    tokio::spawn(async move {
        match client.global_search(&SearchRequest::new(query)).await {
            Ok(response) => {
                let _ = tx.send(AppEvent::SearchCompleted(Box::new(response)));
            }
            Err(ApiError::Unauthorized) => {
                let _ = tx.send(AppEvent::SearchFailed("authentication required".to_string()));
                let _ = tx.send(AppEvent::SessionExpired);
            }
            Err(err) => {
                let _ = tx.send(AppEvent::SearchFailed(err.to_string()));
            }
        }
    });
}

fn submit_login(
    app: &mut App,
    client: &ApiClient,
    session: &SharedSession,
    store: &SessionStore,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
) {
    if app.login.is_submitting {
        return;
    }
    let email = app.login.email.trim().to_string();
    let password = app.login.password.clone();
    if email.is_empty() || password.is_empty() {
        app.login.error = Some("Email and password are required".to_string());
        return;
    }

    app.login.is_submitting = true;
    app.login.error = None;

    let client = client.clone();
    let session = session.clone();
    let store = store.clone();
    let tx = event_tx.clone();

    tokio::spawn(async move {
        match client.login(&LoginRequest { email, password }).await {
            Ok(envelope) if envelope.success => {
                if let Ok(mut live) = session.lock() {
                    live.token = Some(envelope.data.token.clone());
                }
                if let Err(err) = persist_session(&session, &store) {
                    error!(error = %err, "failed to persist session token");
                }
                let _ = tx.send(AppEvent::LoginSucceeded);
            }
            Ok(envelope) => {
                let reason = envelope
                    .message
                    .unwrap_or_else(|| "Sign in failed".to_string());
                let _ = tx.send(AppEvent::LoginFailed(reason));
            }
            Err(ApiError::Unauthorized) => {
                let _ = tx.send(AppEvent::LoginFailed("Invalid email or password".to_string()));
            }
            Err(err) => {
                let _ = tx.send(AppEvent::LoginFailed(err.to_string()));
            }
        }
    });
}

fn export_transcript(app: &mut App, storage: &Storage) {
    if app.conversation.entries().is_empty() {
        app.notice = Some("Nothing to export".to_string());
        return;
    }
    save_transcript(app, storage);
    match storage.export_html(&app.metadata, app.conversation.entries()) {
        Ok(path) => {
            app.notice = Some(format!("Exported to {}", path.display()));
        }
        Err(err) => {
            error!(error = %err, "transcript export failed");
            app.notice = Some("Export failed".to_string());
        }
    }
}

fn cancel_stream(app: &mut App, stream_task: &mut Option<JoinHandle<()>>) {
    // Terminal state first so anything the task already queued is dropped.
    app.conversation.cancel();
    if let Some(task) = stream_task.take() {
        task.abort();
    }
}

const fn handle_help_keys(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> bool {
    if !app.show_help {
        return false;
    }

    match key {
        KeyCode::Char('h') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.toggle_help();
        }
        KeyCode::Esc => {
            app.show_help = false;
        }
        _ => {}
    }
    true
}

#[allow(clippy::too_many_arguments, clippy::too_many_lines)]
fn handle_keyboard_input(
    app: &mut App,
    key: KeyCode,
    modifiers: KeyModifiers,
    client: &ApiClient,
    storage: &Storage,
    session: &SharedSession,
    store: &SessionStore,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
    stream_task: &mut Option<JoinHandle<()>>,
) {
    // Global keys first
    match key {
        KeyCode::Char('q') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
            return;
        }
        KeyCode::Char('h') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.toggle_help();
            return;
        }
        KeyCode::Char('s')
            if modifiers.contains(KeyModifiers::CONTROL) && app.mode != AppMode::Login =>
        {
            app.input_buffer.clear();
            app.switch_mode(AppMode::Search);
            return;
        }
        KeyCode::Char('t')
            if modifiers.contains(KeyModifiers::CONTROL) && app.mode != AppMode::Login =>
        {
            app.input_buffer.clear();
            app.switch_mode(AppMode::Chat);
            return;
        }
        _ => {}
    }

    match app.mode {
        AppMode::Chat => match key {
            KeyCode::Char('n') if modifiers.contains(KeyModifiers::CONTROL) => {
                if app.conversation.is_in_flight() {
                    cancel_stream(app, stream_task);
                }
                save_transcript(app, storage);
                app.new_conversation();
                if let Ok(mut live) = session.lock() {
                    live.conversation_id = None;
                }
                if let Err(err) = persist_session(session, store) {
                    error!(error = %err, "failed to persist session");
                }
            }
            KeyCode::Char('e') if modifiers.contains(KeyModifiers::CONTROL) => {
                export_transcript(app, storage);
            }
            KeyCode::Esc if app.conversation.is_in_flight() => {
                cancel_stream(app, stream_task);
                app.scroll_to_bottom();
            }
            KeyCode::Up => app.scroll_up(1),
            KeyCode::Down => app.scroll_down(1),
            KeyCode::PageUp => app.scroll_up(10),
            KeyCode::PageDown => app.scroll_down(10),
            KeyCode::Home => app.scroll_to_top(),
            KeyCode::End => app.scroll_to_bottom(),
            KeyCode::Backspace => {
                app.input_buffer.pop();
            }
            KeyCode::Enter => {
                if let Some(handle) = send_message(app, client, event_tx) {
                    *stream_task = Some(handle);
                }
            }
            KeyCode::Char(c) => {
                app.input_buffer.push(c);
            }
            _ => {}
        },
        AppMode::Search => match key {
            KeyCode::Up => app.scroll_up(1),
            KeyCode::Down => app.scroll_down(1),
            KeyCode::PageUp => app.scroll_up(10),
            KeyCode::PageDown => app.scroll_down(10),
            KeyCode::Home => app.scroll_to_top(),
            KeyCode::End => app.scroll_to_bottom(),
            KeyCode::Backspace => {
                app.input_buffer.pop();
            }
            KeyCode::Enter => run_search(app, client, event_tx),
            KeyCode::Char(c) => {
                app.input_buffer.push(c);
            }
            _ => {}
        },
        AppMode::Login => match key {
            KeyCode::Tab => app.login.toggle_focus(),
            KeyCode::Esc => {
                app.login.error = None;
                app.switch_mode(AppMode::Chat);
            }
            KeyCode::Backspace => {
                app.login.focused_input().pop();
            }
            KeyCode::Enter => submit_login(app, client, session, store, event_tx),
            KeyCode::Char(c) => {
                app.login.focused_input().push(c);
            }
            _ => {}
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: &ApiClient,
    storage: &Storage,
    session: &SharedSession,
    store: &SessionStore,
    event_tx: &mpsc::UnboundedSender<AppEvent>,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut stream_task: Option<JoinHandle<()>> = None;

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Drain events from network tasks first
        while let Ok(app_event) = event_rx.try_recv() {
            handle_app_event(app, app_event, session, store, storage);
        }

        // Keyboard input with a short timeout keeps streaming smooth
        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if handle_help_keys(app, key.code, key.modifiers) {
                        continue;
                    }

                    match key.code {
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            if app.exit_pending {
                                app.quit();
                            } else {
                                app.exit_pending = true;
                            }
                            continue;
                        }
                        KeyCode::Esc if app.exit_pending => {
                            app.exit_pending = false;
                            continue;
                        }
                        _ if app.exit_pending => {
                            // Any other key cancels the pending exit
                            app.exit_pending = false;
                        }
                        _ => {}
                    }

                    handle_keyboard_input(
                        app,
                        key.code,
                        key.modifiers,
                        client,
                        storage,
                        session,
                        store,
                        event_tx,
                        &mut stream_task,
                    );
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Leaving the app cancels any stream still in flight.
    if app.conversation.is_in_flight() {
        cancel_stream(app, &mut stream_task);
    }
    save_transcript(app, storage);

    Ok(())
}
