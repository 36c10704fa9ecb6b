// Restricted markdown-to-HTML transform for transcript export
//
// Raw text is HTML-escaped before any markup is applied, so content arriving
// over the stream can never inject executable markup. Fenced code blocks are
// lifted out before the escape pass and reinserted afterwards, escaped exactly
// once, preserving their literal formatting.

/// Escape the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape plain text and turn line breaks into `<br/>` (user and status
/// entries are rendered verbatim, without markdown).
pub fn escape_with_breaks(raw: &str) -> String {
    escape_html(raw).replace('\n', "<br/>")
}

/// Render restricted markdown to HTML: headings, bold/italic, inline and
/// fenced code, links, ordered/unordered lists, paragraph breaks. Everything
/// else stays literal text.
pub fn render_markdown(text: &str) -> String {
    let (stripped, code_blocks) = extract_code_blocks(text);
    let escaped = escape_html(&stripped);

    let mut html = String::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut list_items: Vec<String> = Vec::new();
    let mut list_ordered = false;

    for line in escaped.lines() {
        if let Some((level, rest)) = heading_line(line) {
            flush_paragraph(&mut html, &mut paragraph);
            flush_list(&mut html, &mut list_items, list_ordered);
            html.push_str(&format!("<h{level}>{}</h{level}>", render_inline(rest)));
            continue;
        }

        if let Some(item) = unordered_item(line) {
            flush_paragraph(&mut html, &mut paragraph);
            if list_ordered {
                flush_list(&mut html, &mut list_items, list_ordered);
            }
            list_ordered = false;
            list_items.push(render_inline(item));
            continue;
        }

        if let Some(item) = ordered_item(line) {
            flush_paragraph(&mut html, &mut paragraph);
            if !list_ordered {
                flush_list(&mut html, &mut list_items, list_ordered);
            }
            list_ordered = true;
            list_items.push(render_inline(item));
            continue;
        }

        flush_list(&mut html, &mut list_items, list_ordered);

        if line.trim().is_empty() {
            flush_paragraph(&mut html, &mut paragraph);
        } else if is_placeholder_line(line) {
            // A code block on its own lines becomes a top-level <pre>,
            // not a paragraph member.
            flush_paragraph(&mut html, &mut paragraph);
            html.push_str(line.trim());
        } else {
            paragraph.push(render_inline(line));
        }
    }
    flush_paragraph(&mut html, &mut paragraph);
    flush_list(&mut html, &mut list_items, list_ordered);

    restore_code_blocks(&html, &code_blocks)
}

fn flush_paragraph(html: &mut String, paragraph: &mut Vec<String>) {
    if paragraph.is_empty() {
        return;
    }
    html.push_str("<p>");
    html.push_str(&paragraph.join("<br/>"));
    html.push_str("</p>");
    paragraph.clear();
}

fn flush_list(html: &mut String, items: &mut Vec<String>, ordered: bool) {
    if items.is_empty() {
        return;
    }
    let tag = if ordered { "ol" } else { "ul" };
    html.push_str(&format!("<{tag}>"));
    for item in items.iter() {
        html.push_str(&format!("<li>{item}</li>"));
    }
    html.push_str(&format!("</{tag}>"));
    items.clear();
}

fn heading_line(line: &str) -> Option<(usize, &str)> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &line[hashes..];
    if rest.is_empty() {
        Some((hashes, ""))
    } else {
        rest.strip_prefix(' ').map(|text| (hashes, text))
    }
}

fn unordered_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))
}

fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

/// Inline transforms over already-escaped text: `**bold**`, `*italic*`,
/// `` `code` `` and `[text](http…)` links. Unclosed markers stay literal.
fn render_inline(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if i + 1 < chars.len() && chars[i + 1] == '*' => {
                if let Some(end) = find_marker(&chars, i + 2, "**") {
                    out.push_str("<strong>");
                    out.extend(&chars[i + 2..end]);
                    out.push_str("</strong>");
                    i = end + 2;
                } else {
                    out.push('*');
                    i += 1;
                }
            }
            '*' => {
                if let Some(end) = find_marker(&chars, i + 1, "*") {
                    out.push_str("<em>");
                    out.extend(&chars[i + 1..end]);
                    out.push_str("</em>");
                    i = end + 1;
                } else {
                    out.push('*');
                    i += 1;
                }
            }
            '`' => {
                if let Some(end) = find_marker(&chars, i + 1, "`") {
                    out.push_str("<code>");
                    out.extend(&chars[i + 1..end]);
                    out.push_str("</code>");
                    i = end + 1;
                } else {
                    out.push('`');
                    i += 1;
                }
            }
            '[' => {
                if let Some((text, url, next)) = parse_link(&chars, i) {
                    out.push_str(&format!(
                        "<a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">{text}</a>"
                    ));
                    i = next;
                } else {
                    out.push('[');
                    i += 1;
                }
            }
            ch => {
                out.push(ch);
                i += 1;
            }
        }
    }
    out
}

fn find_marker(chars: &[char], from: usize, marker: &str) -> Option<usize> {
    let marker: Vec<char> = marker.chars().collect();
    let mut i = from;
    while i + marker.len() <= chars.len() {
        if chars[i..i + marker.len()] == marker[..] {
            // An empty span (e.g. `****`) is not a marker pair.
            if i > from {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// `[text](url)` where the url must be absolute http(s).
fn parse_link(chars: &[char], open: usize) -> Option<(String, String, usize)> {
    let close = chars[open + 1..].iter().position(|&c| c == ']')? + open + 1;
    if close + 1 >= chars.len() || chars[close + 1] != '(' {
        return None;
    }
    let paren_close = chars[close + 2..].iter().position(|&c| c == ')')? + close + 2;

    let text: String = chars[open + 1..close].iter().collect();
    let url: String = chars[close + 2..paren_close].iter().collect();
    if !(url.starts_with("http://") || url.starts_with("https://")) || url.contains(char::is_whitespace) {
        return None;
    }

    Some((text, url, paren_close + 1))
}

const PLACEHOLDER_PREFIX: &str = "@@CODE_BLOCK_";

fn placeholder(index: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{index}@@")
}

fn is_placeholder_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with(PLACEHOLDER_PREFIX) && trimmed.ends_with("@@")
}

/// Pull fenced blocks out before the escape pass. An unpaired fence is left
/// in place and treated as literal text.
fn extract_code_blocks(text: &str) -> (String, Vec<String>) {
    let mut blocks = Vec::new();
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("```") {
        let after_open = &rest[start + 3..];
        let Some(end) = after_open.find("```") else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&placeholder(blocks.len()));
        blocks.push(after_open[..end].to_string());
        rest = &after_open[end + 3..];
    }
    out.push_str(rest);

    (out, blocks)
}

fn restore_code_blocks(html: &str, blocks: &[String]) -> String {
    let mut out = html.to_string();
    for (i, block) in blocks.iter().enumerate() {
        let (lang, code) = split_info_string(block);
        let escaped = escape_html(code);
        let replacement = lang.map_or_else(
            || format!("<pre><code>{escaped}</code></pre>"),
            |lang| format!("<pre><code class=\"language-{lang}\">{escaped}</code></pre>"),
        );
        out = out.replace(&placeholder(i), &replacement);
    }
    out
}

/// The first fence line names the language when it is a single bare token.
fn split_info_string(block: &str) -> (Option<&str>, &str) {
    if let Some((first, rest)) = block.split_once('\n') {
        let tag = first.trim();
        if tag.is_empty() {
            return (None, rest);
        }
        if tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return (Some(tag), rest);
        }
    }
    (None, block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#039;y&#039;&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_with_breaks() {
        assert_eq!(escape_with_breaks("a<b\nc"), "a&lt;b<br/>c");
    }

    #[test]
    fn test_plain_paragraph() {
        assert_eq!(render_markdown("hello world"), "<p>hello world</p>");
    }

    #[test]
    fn test_single_newline_becomes_br() {
        assert_eq!(render_markdown("one\ntwo"), "<p>one<br/>two</p>");
    }

    #[test]
    fn test_double_newline_splits_paragraphs() {
        assert_eq!(render_markdown("one\n\ntwo"), "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_headings() {
        assert_eq!(render_markdown("## Ruling"), "<h2>Ruling</h2>");
        assert_eq!(render_markdown("###### Note"), "<h6>Note</h6>");
        // Seven hashes is not a heading.
        assert_eq!(render_markdown("####### x"), "<p>####### x</p>");
    }

    #[test]
    fn test_bold_italic_inline_code() {
        assert_eq!(
            render_markdown("**bold** and *em* and `code`"),
            "<p><strong>bold</strong> and <em>em</em> and <code>code</code></p>"
        );
    }

    #[test]
    fn test_unclosed_markers_stay_literal() {
        assert_eq!(render_markdown("**open and `tick"), "<p>**open and `tick</p>");
    }

    #[test]
    fn test_links_require_absolute_http() {
        assert_eq!(
            render_markdown("see [ruling](https://example.com/p.pdf)"),
            "<p>see <a href=\"https://example.com/p.pdf\" target=\"_blank\" \
             rel=\"noopener noreferrer\">ruling</a></p>"
        );
        assert_eq!(
            render_markdown("see [ruling](javascript:alert(1))"),
            "<p>see [ruling](javascript:alert(1))</p>"
        );
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(
            render_markdown("- one\n- two"),
            "<ul><li>one</li><li>two</li></ul>"
        );
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            render_markdown("1. one\n2. two"),
            "<ol><li>one</li><li>two</li></ol>"
        );
    }

    #[test]
    fn test_fenced_code_preserves_specials_literally() {
        let html = render_markdown("before\n\n```\nif a < b && c > d {}\n```\n\nafter");
        assert!(html.contains("<pre><code>if a &lt; b &amp;&amp; c &gt; d {}\n</code></pre>"));
        // Escaped exactly once.
        assert!(!html.contains("&amp;amp;"));
        assert!(html.contains("<p>before</p>"));
        assert!(html.contains("<p>after</p>"));
    }

    #[test]
    fn test_fenced_code_with_language_tag() {
        let html = render_markdown("```rust\nlet x = 1;\n```");
        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">let x = 1;\n</code></pre>"
        );
    }

    #[test]
    fn test_markdown_inside_fence_is_not_transformed() {
        let html = render_markdown("```\n**not bold**\n# not a heading\n```");
        assert!(html.contains("**not bold**"));
        assert!(html.contains("# not a heading"));
        assert!(!html.contains("<strong>"));
        assert!(!html.contains("<h1>"));
    }

    #[test]
    fn test_no_raw_html_survives_outside_fences() {
        let html = render_markdown("<img src=x onerror=alert(1)> and `<b>`");
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(html.contains("<code>&lt;b&gt;</code>"));
    }

    #[test]
    fn test_unpaired_fence_is_literal() {
        let html = render_markdown("```\nunclosed");
        assert!(html.contains("```"));
        assert!(!html.contains("<pre>"));
    }
}
