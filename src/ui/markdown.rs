// Markdown styling for terminal display
//
// Mirrors the feature set of the HTML export transform (headings, bold,
// italic, inline code, links, lists) but renders to styled spans instead
// of markup, so nothing needs escaping here.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Convert markdown text to styled lines.
pub fn render_markdown_to_lines(markdown: &str) -> Vec<Line<'static>> {
    markdown.lines().map(render_markdown_line).collect()
}

fn render_markdown_line(line: &str) -> Line<'static> {
    if let Some((level, rest)) = heading(line) {
        let color = match level {
            1 => Color::Yellow,
            2 => Color::Cyan,
            _ => Color::Blue,
        };
        return Line::from(Span::styled(
            rest.trim().to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        let mut spans = vec![Span::styled("• ", Style::default().fg(Color::Cyan))];
        spans.extend(inline_spans(item));
        return Line::from(spans);
    }

    if let Some((number, item)) = ordered_item(line) {
        let mut spans = vec![Span::styled(
            format!("{number}. "),
            Style::default().fg(Color::Cyan),
        )];
        spans.extend(inline_spans(item));
        return Line::from(spans);
    }

    let spans = inline_spans(line);
    if spans.is_empty() {
        Line::from("")
    } else {
        Line::from(spans)
    }
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    line[hashes..].strip_prefix(' ').map(|rest| (hashes, rest))
}

fn ordered_item(line: &str) -> Option<(&str, &str)> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..]
        .strip_prefix(". ")
        .map(|rest| (&line[..digits], rest))
}

/// Inline styling: `**bold**`, `*italic*`, `` `code` `` and `[text](url)`.
/// Unclosed markers render literally.
fn inline_spans(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    let flush = |current: &mut String, spans: &mut Vec<Span<'static>>| {
        if !current.is_empty() {
            spans.push(Span::raw(std::mem::take(current)));
        }
    };

    while i < chars.len() {
        match chars[i] {
            '*' if i + 1 < chars.len() && chars[i + 1] == '*' => {
                if let Some(end) = find_double_star(&chars, i + 2) {
                    flush(&mut current, &mut spans);
                    spans.push(Span::styled(
                        chars[i + 2..end].iter().collect::<String>(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ));
                    i = end + 2;
                } else {
                    current.push('*');
                    i += 1;
                }
            }
            '*' => {
                if let Some(end) = find_single(&chars, i + 1, '*') {
                    flush(&mut current, &mut spans);
                    spans.push(Span::styled(
                        chars[i + 1..end].iter().collect::<String>(),
                        Style::default().add_modifier(Modifier::ITALIC),
                    ));
                    i = end + 1;
                } else {
                    current.push('*');
                    i += 1;
                }
            }
            '`' => {
                if let Some(end) = find_single(&chars, i + 1, '`') {
                    flush(&mut current, &mut spans);
                    spans.push(Span::styled(
                        chars[i + 1..end].iter().collect::<String>(),
                        Style::default().fg(Color::Magenta),
                    ));
                    i = end + 1;
                } else {
                    current.push('`');
                    i += 1;
                }
            }
            '[' => {
                if let Some((text, url, next)) = link(&chars, i) {
                    flush(&mut current, &mut spans);
                    spans.push(Span::styled(
                        text,
                        Style::default()
                            .fg(Color::Blue)
                            .add_modifier(Modifier::UNDERLINED),
                    ));
                    spans.push(Span::styled(
                        format!(" ({url})"),
                        Style::default().fg(Color::DarkGray),
                    ));
                    i = next;
                } else {
                    current.push('[');
                    i += 1;
                }
            }
            ch => {
                current.push(ch);
                i += 1;
            }
        }
    }
    flush(&mut current, &mut spans);

    spans
}

fn find_double_star(chars: &[char], from: usize) -> Option<usize> {
    let mut i = from;
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '*' && i > from {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn find_single(chars: &[char], from: usize, marker: char) -> Option<usize> {
    chars[from..]
        .iter()
        .position(|&c| c == marker)
        .filter(|&offset| offset > 0)
        .map(|offset| from + offset)
}

fn link(chars: &[char], open: usize) -> Option<(String, String, usize)> {
    let close = chars[open + 1..].iter().position(|&c| c == ']')? + open + 1;
    if close + 1 >= chars.len() || chars[close + 1] != '(' {
        return None;
    }
    let paren_close = chars[close + 2..].iter().position(|&c| c == ')')? + close + 2;

    let text: String = chars[open + 1..close].iter().collect();
    let url: String = chars[close + 2..paren_close].iter().collect();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return None;
    }

    Some((text, url, paren_close + 1))
}

/// Detect a code block fence.
pub fn is_code_fence(line: &str) -> bool {
    line.trim().starts_with("```")
}

/// Extract the language tag from a code fence.
pub fn extract_code_language(line: &str) -> Option<String> {
    line.trim()
        .strip_prefix("```")
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain_text() {
        let lines = render_markdown_to_lines("Hello world");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 1);
    }

    #[test]
    fn test_render_bold_splits_spans() {
        let lines = render_markdown_to_lines("This is **bold** text");
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[0].spans[1].content, "bold");
    }

    #[test]
    fn test_render_italic() {
        let lines = render_markdown_to_lines("an *italic* word");
        assert_eq!(lines[0].spans[1].content, "italic");
    }

    #[test]
    fn test_render_inline_code() {
        let lines = render_markdown_to_lines("Use `Pasal 112` here");
        assert_eq!(lines[0].spans[1].content, "Pasal 112");
    }

    #[test]
    fn test_render_link_shows_text_and_url() {
        let lines = render_markdown_to_lines("[ruling](https://example.com/p.pdf)");
        assert_eq!(lines[0].spans[0].content, "ruling");
        assert_eq!(lines[0].spans[1].content, " (https://example.com/p.pdf)");
    }

    #[test]
    fn test_render_header() {
        let lines = render_markdown_to_lines("## Header");
        assert_eq!(lines[0].spans[0].content, "Header");
    }

    #[test]
    fn test_render_lists() {
        let lines = render_markdown_to_lines("- first\n1. second");
        assert_eq!(lines[0].spans[0].content, "• ");
        assert_eq!(lines[1].spans[0].content, "1. ");
    }

    #[test]
    fn test_unclosed_marker_is_literal() {
        let lines = render_markdown_to_lines("**open");
        assert_eq!(lines[0].spans.len(), 1);
        assert_eq!(lines[0].spans[0].content, "**open");
    }

    #[test]
    fn test_is_code_fence() {
        assert!(is_code_fence("```"));
        assert!(is_code_fence("```rust"));
        assert!(!is_code_fence("code"));
    }

    #[test]
    fn test_extract_code_language() {
        assert_eq!(extract_code_language("```rust"), Some("rust".to_string()));
        assert_eq!(extract_code_language("```"), None);
    }
}
