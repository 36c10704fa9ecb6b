pub mod markdown;
pub mod widgets;

use crate::app::{App, AppMode};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App) {
    // Grow the input box with its content, up to half the screen.
    let available_width = frame.area().width.saturating_sub(2) as usize;
    let input_lines = if app.input_buffer.is_empty() {
        1
    } else {
        let chars_count = app.input_buffer.chars().count();
        if available_width == 0 {
            1
        } else {
            chars_count.div_ceil(available_width)
        }
    };

    let max_lines = (frame.area().height as usize / 2).saturating_sub(2);
    let actual_lines = input_lines.clamp(1, max_lines.max(1));

    #[allow(clippy::cast_possible_truncation)]
    let input_height = (actual_lines + 2) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),               // History / results (flexible)
            Constraint::Length(1),            // Gap
            Constraint::Length(1),            // Status line
            Constraint::Length(input_height), // Input field
            Constraint::Length(1),            // Keymap bar
        ])
        .split(frame.area());

    match app.mode {
        AppMode::Search => widgets::render_search_results(frame, app, chunks[0]),
        _ => widgets::render_chat_history(frame, app, chunks[0]),
    }
    // chunks[1] is the gap, left empty
    widgets::render_status_bar(frame, app, chunks[2]);
    widgets::render_input_field(frame, app, chunks[3]);
    widgets::render_bottom_bar(frame, app, chunks[4]);

    if app.mode == AppMode::Login {
        widgets::render_login_form(frame, app, frame.area());
    }

    if app.show_help {
        widgets::render_help_window(frame, frame.area());
    }
}
