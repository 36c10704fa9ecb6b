use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppMode, LoginField};
use crate::models::MessageRole;

/// Map a configured color name to a terminal color.
pub fn color_from_name(name: &str) -> Color {
    match name.to_ascii_lowercase().as_str() {
        "cyan" => Color::Cyan,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "red" => Color::Red,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        _ => Color::White,
    }
}

pub fn render_help_window(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            "LexChat - Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "General:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  Ctrl+H        - Show/hide this help"),
        Line::from("  Ctrl+Q        - Quit application"),
        Line::from("  Ctrl+C        - Quit (press twice)"),
        Line::from(""),
        Line::from(Span::styled(
            "Views:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  Ctrl+S        - Legal search"),
        Line::from("  Ctrl+T        - Chat"),
        Line::from(""),
        Line::from(Span::styled(
            "Chat:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  Enter         - Send message"),
        Line::from("  Esc           - Cancel streaming response"),
        Line::from("  Ctrl+N        - New conversation"),
        Line::from("  Ctrl+E        - Export transcript to HTML"),
        Line::from(""),
        Line::from(Span::styled(
            "Navigation:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("  Up/Down       - Scroll history"),
        Line::from("  PgUp/PgDn     - Scroll history"),
        Line::from("  Home/End      - Jump to start/end"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Ctrl+H or Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    let popup_area = centered_rect(area, 60, 26);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(help_paragraph, popup_area);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect {
        x: area.x + x,
        y: area.y + y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

pub fn render_bottom_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.exit_pending {
        (
            "Press Ctrl+C again to exit, Esc to cancel".to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        let keys = match app.mode {
            AppMode::Chat => "Enter: Send | Ctrl+S: Search | Ctrl+N: New | Ctrl+E: Export",
            AppMode::Search => "Enter: Search | Ctrl+T: Chat",
            AppMode::Login => "Enter: Sign in | Tab: Next field",
        };
        (
            format!("{keys} | Ctrl+H: Help | Ctrl+C: Quit"),
            Style::default().fg(Color::DarkGray),
        )
    };

    let bar = Paragraph::new(text)
        .alignment(ratatui::layout::Alignment::Center)
        .style(style);

    frame.render_widget(bar, area);
}

pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let activity = match app.mode {
        AppMode::Chat if app.conversation.is_in_flight() => " [Streaming...]",
        AppMode::Search if app.search.is_searching => " [Searching...]",
        AppMode::Login if app.login.is_submitting => " [Signing in...]",
        _ => "",
    };

    let conversation = app
        .conversation
        .conversation_id()
        .map_or_else(|| "new conversation".to_string(), |id| format!("conv {id}"));

    let status_text = app.notice.as_ref().map_or_else(
        || format!("{conversation}{activity}"),
        |notice| format!("{notice} | {conversation}{activity}"),
    );

    let status = Paragraph::new(status_text)
        .alignment(ratatui::layout::Alignment::Right)
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));

    frame.render_widget(status, area);
}

#[allow(clippy::too_many_lines)]
pub fn render_chat_history(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut lines = Vec::new();

    if app.conversation.entries().is_empty() {
        let welcome_text = vec![
            Line::from(Span::styled(
                "Welcome to LexChat",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Ask about court rulings, legal precedents and statutes",
                Style::default().fg(Color::Cyan),
            )),
            Line::from(Span::styled(
                "Example: Apa dasar hukum putusan tentang sengketa tanah?",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let welcome_paragraph =
            Paragraph::new(welcome_text).alignment(ratatui::layout::Alignment::Center);

        let welcome_height = 3;
        let welcome_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(welcome_height),
            width: area.width,
            height: welcome_height.min(area.height),
        };

        frame.render_widget(welcome_paragraph, welcome_area);
        return;
    }

    let user_color = color_from_name(&app.theme.user_message_color);
    let bot_color = color_from_name(&app.theme.bot_message_color);
    let status_color = color_from_name(&app.theme.status_message_color);

    for entry in app.conversation.entries() {
        if entry.role == MessageRole::Status {
            lines.push(Line::from(Span::styled(
                format!("· {}", entry.content),
                Style::default()
                    .fg(status_color)
                    .add_modifier(Modifier::ITALIC),
            )));
            continue;
        }

        let (role, color) = match entry.role {
            MessageRole::User => ("User", user_color),
            _ => ("Assistant", bot_color),
        };

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("## {role}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));

        if entry.content.is_empty() {
            // Placeholder while the bot entry waits for streamed content.
            lines.push(Line::from(Span::styled(
                "...",
                Style::default().fg(Color::DarkGray),
            )));
            continue;
        }

        if entry.role == MessageRole::Bot && !entry.complete {
            // Still streaming: show the raw text, style it once finished.
            for content_line in entry.content.lines() {
                lines.push(Line::from(content_line.to_string()));
            }
            continue;
        }

        let mut in_code_block = false;
        for content_line in entry.content.lines() {
            if super::markdown::is_code_fence(content_line) {
                if in_code_block {
                    lines.push(Line::from(Span::styled(
                        "└──────────────────────────────────────────────",
                        Style::default().fg(Color::DarkGray),
                    )));
                    in_code_block = false;
                } else {
                    in_code_block = true;
                    let code_lang = super::markdown::extract_code_language(content_line);
                    let lang_display = code_lang.as_deref().unwrap_or("code");
                    lines.push(Line::from(Span::styled(
                        format!("┌─ {lang_display} ─────────────────────────────────"),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            } else if in_code_block {
                lines.push(Line::from(Span::styled(
                    format!("  {content_line}"),
                    Style::default().fg(Color::Green),
                )));
            } else {
                lines.extend(super::markdown::render_markdown_to_lines(content_line));
            }
        }
    }

    render_scrolled(frame, app, area, lines);
}

/// Clamp the scroll offset against the wrapped line count and render.
fn render_scrolled(frame: &mut Frame, app: &mut App, area: Rect, lines: Vec<Line<'static>>) {
    let available_width = area.width as usize;
    let mut total_visual_lines = 0;

    for line in &lines {
        let line_width = line.width();
        if line_width == 0 || available_width == 0 {
            total_visual_lines += 1;
        } else {
            total_visual_lines += line_width.div_ceil(available_width);
        }
    }

    let visible_height = area.height as usize;
    let max_scroll = total_visual_lines.saturating_sub(visible_height);
    let actual_scroll = app.scroll_offset.min(max_scroll);

    if app.scroll_offset != actual_scroll {
        app.scroll_offset = actual_scroll;
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(actual_scroll).unwrap_or(u16::MAX), 0));

    frame.render_widget(paragraph, area);
}

#[allow(clippy::too_many_lines)]
pub fn render_search_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut lines = Vec::new();

    if app.search.is_searching {
        lines.push(Line::from(Span::styled(
            "Searching...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = &app.search.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if !app.search.has_searched {
        lines.push(Line::from(Span::styled(
            "Search court rulings and legal documents",
            Style::default().fg(Color::Cyan),
        )));
        lines.push(Line::from(Span::styled(
            "Example: narkotika, sanksi pidana korupsi, sengketa tanah",
            Style::default().fg(Color::DarkGray),
        )));
    } else if app.search.results.is_empty() {
        lines.push(Line::from(Span::styled(
            "No results found",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        if let Some(summary) = app.search.summary() {
            lines.push(Line::from(Span::styled(
                "Summary",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            for summary_line in summary.lines() {
                lines.push(Line::from(summary_line.to_string()));
            }
            lines.push(Line::from(""));
        }

        for (index, result) in app.search.results.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}. ", index + 1),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!(
                        "confidence {:.0}% | {}",
                        result.confidence_score * 100.0,
                        result.validation_status
                    ),
                    Style::default().fg(Color::Green),
                ),
                Span::styled(
                    format!(" | {}", result.legal_areas.join(", ")),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));

            for point in &result.key_points {
                lines.push(Line::from(vec![
                    Span::styled("  • ", Style::default().fg(Color::Cyan)),
                    Span::raw(point.clone()),
                ]));
            }

            for doc in &result.source_documents {
                lines.push(Line::from(vec![
                    Span::styled("  ↳ ", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        doc.title.clone(),
                        Style::default()
                            .fg(Color::Blue)
                            .add_modifier(Modifier::UNDERLINED),
                    ),
                    Span::styled(
                        format!(" ({})", doc.case_number),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
                if !doc.link_pdf.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("    {}", doc.link_pdf),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
            lines.push(Line::from(""));
        }

        if let Some(metrics) = &app.search.metrics {
            lines.push(Line::from(Span::styled(
                format!(
                    "{} results | {} documents | {} tokens | {:.2}s query{}",
                    app.search.total_results,
                    metrics.documents_retrieved,
                    metrics.tokens_used,
                    metrics.query_time,
                    if metrics.cache_hit { " | cached" } else { "" }
                ),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    render_scrolled(frame, app, area, lines);
}

pub fn render_login_form(frame: &mut Frame, app: &App, area: Rect) {
    let focused = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let blurred = Style::default().fg(Color::Gray);

    let masked_password: String = "*".repeat(app.login.password.chars().count());

    let mut lines = vec![
        Line::from(Span::styled(
            "Session expired - please sign in",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "Email:    ",
                if app.login.focus == LoginField::Email {
                    focused
                } else {
                    blurred
                },
            ),
            Span::raw(app.login.email.clone()),
        ]),
        Line::from(vec![
            Span::styled(
                "Password: ",
                if app.login.focus == LoginField::Password {
                    focused
                } else {
                    blurred
                },
            ),
            Span::raw(masked_password),
        ]),
        Line::from(""),
    ];

    if app.login.is_submitting {
        lines.push(Line::from(Span::styled(
            "Signing in...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = &app.login.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let form = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Sign in ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    let popup_area = centered_rect(area, 50, 9);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(form, popup_area);
}

pub fn render_input_field(frame: &mut Frame, app: &App, area: Rect) {
    let placeholder = match app.mode {
        AppMode::Search => "Type a search query...",
        _ => "Type your message...",
    };

    let input_text = if app.input_buffer.is_empty() {
        placeholder
    } else {
        &app.input_buffer
    };

    let input_style = if app.input_buffer.is_empty() {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    };

    let border_color = color_from_name(&app.theme.border_color);
    let input = Paragraph::new(input_text)
        .style(input_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(input, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_name() {
        assert_eq!(color_from_name("cyan"), Color::Cyan);
        assert_eq!(color_from_name("DarkGray"), Color::DarkGray);
        assert_eq!(color_from_name("unknown"), Color::White);
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered_rect(area, 60, 26);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);
    }
}
