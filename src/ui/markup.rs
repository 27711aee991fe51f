use crate::ui::highlight::highlight_code_line;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Strips control characters so streamed model output cannot inject escape
/// sequences into the terminal. Newlines and tabs survive.
pub fn escape_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Escaped plain-text lines with a uniform style; the non-markdown path.
pub fn plain_lines(text: &str, style: Style) -> Vec<Line<'static>> {
    let escaped = escape_text(text);
    escaped
        .lines()
        .map(|line| Line::styled(line.to_string(), style))
        .collect()
}

/// Language tag from an opening code fence, e.g. "```json" -> "json".
pub fn fence_language(fence: &str) -> &str {
    fence.trim().trim_start_matches('`').trim()
}

/// Line-oriented markdown renderer for answer sections: fenced code with
/// highlighting, headings, lists, blockquotes, rules, inline formatting.
/// Unknown constructs fall through as styled plain text; this never fails.
pub fn render_markdown(text: &str) -> Vec<Line<'static>> {
    let escaped = escape_text(text);
    let mut out = Vec::new();
    let mut fence_lang: Option<String> = None;

    for raw_line in escaped.lines() {
        if raw_line.trim_start().starts_with("```") {
            match fence_lang.take() {
                Some(_) => {}
                None => fence_lang = Some(fence_language(raw_line).to_string()),
            }
            out.push(Line::styled(
                raw_line.to_string(),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            ));
            continue;
        }

        if let Some(lang) = &fence_lang {
            out.push(highlight_code_line(raw_line, lang));
            continue;
        }

        out.push(markdown_line(raw_line));
    }

    if out.is_empty() {
        out.push(Line::default());
    }
    out
}

fn markdown_line(text: &str) -> Line<'static> {
    let body_style = Style::default().fg(Color::White);

    if text == "---" || text == "***" || text == "___" {
        return Line::styled(
            "  ────────────────────────────────────".to_string(),
            Style::default().fg(Color::DarkGray),
        );
    }

    if text.starts_with('#') {
        let stripped = text.trim_start_matches('#');
        let level = text.len() - stripped.len();
        let heading = stripped.strip_prefix(' ').unwrap_or(stripped);
        if level <= 6 && !heading.is_empty() {
            let style = match level {
                1 => Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                2 => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                _ => Style::default().fg(Color::Cyan),
            };
            return Line::from(inline_spans(heading, style));
        }
    }

    if let Some(quote) = text.strip_prefix("> ") {
        let dim = Style::default().fg(Color::DarkGray);
        let mut spans = vec![Span::styled("│ ".to_string(), dim)];
        spans.extend(inline_spans(quote, dim));
        return Line::from(spans);
    }

    if let Some(rest) = strip_any_prefix(text, &["- [ ] ", "* [ ] "]) {
        let mut spans = vec![Span::styled(
            "☐ ".to_string(),
            Style::default().fg(Color::DarkGray),
        )];
        spans.extend(inline_spans(rest, body_style));
        return Line::from(spans);
    }
    if let Some(rest) = strip_any_prefix(text, &["- [x] ", "* [x] ", "- [X] ", "* [X] "]) {
        let mut spans = vec![Span::styled("☑ ".to_string(), Style::default().fg(Color::Green))];
        spans.extend(inline_spans(
            rest,
            body_style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT),
        ));
        return Line::from(spans);
    }

    if let Some(item) = strip_any_prefix(text, &["- ", "* "]) {
        let mut spans = vec![Span::styled("• ".to_string(), Style::default().fg(Color::Cyan))];
        spans.extend(inline_spans(item, body_style));
        return Line::from(spans);
    }

    if let Some((number, item)) = split_ordered_item(text) {
        let mut spans = vec![Span::styled(number, Style::default().fg(Color::Cyan))];
        spans.extend(inline_spans(item, body_style));
        return Line::from(spans);
    }

    Line::from(inline_spans(text, body_style))
}

fn strip_any_prefix<'a>(text: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|prefix| text.strip_prefix(prefix))
}

fn split_ordered_item(text: &str) -> Option<(String, &str)> {
    let dot = text.find(". ")?;
    if dot == 0 || dot > 4 || !text[..dot].chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((text[..dot + 2].to_string(), &text[dot + 2..]))
}

/// Inline markdown: `code`, **bold**, *italic*, [text](url). Nested
/// emphasis inside bold/italic is parsed recursively.
pub fn inline_spans(text: &str, base_style: Style) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut i = 0usize;
    let mut plain_start = 0usize;

    let mut push_plain = |spans: &mut Vec<Span<'static>>, from: usize, to: usize| {
        if to > from {
            spans.push(Span::styled(text[from..to].to_string(), base_style));
        }
    };

    while i < len {
        if bytes[i] == b'`' {
            if let Some(end) = text[i + 1..].find('`') {
                push_plain(&mut spans, plain_start, i);
                spans.push(Span::styled(
                    text[i + 1..i + 1 + end].to_string(),
                    Style::default().fg(Color::Yellow),
                ));
                i += end + 2;
                plain_start = i;
                continue;
            }
        } else if bytes[i] == b'*' && i + 1 < len && bytes[i + 1] == b'*' {
            if let Some(end) = text[i + 2..].find("**") {
                push_plain(&mut spans, plain_start, i);
                spans.extend(inline_spans(
                    &text[i + 2..i + 2 + end],
                    base_style.add_modifier(Modifier::BOLD),
                ));
                i += end + 4;
                plain_start = i;
                continue;
            }
        } else if bytes[i] == b'*' {
            if let Some(end) = text[i + 1..].find('*') {
                if end > 0 {
                    push_plain(&mut spans, plain_start, i);
                    spans.extend(inline_spans(
                        &text[i + 1..i + 1 + end],
                        base_style.add_modifier(Modifier::ITALIC),
                    ));
                    i += end + 2;
                    plain_start = i;
                    continue;
                }
            }
        } else if bytes[i] == b'[' {
            if let Some((label, url, consumed)) = parse_link(&text[i..]) {
                push_plain(&mut spans, plain_start, i);
                spans.push(Span::styled(
                    label,
                    base_style.fg(Color::LightBlue).add_modifier(Modifier::UNDERLINED),
                ));
                spans.push(Span::styled(
                    format!(" ({url})"),
                    Style::default().fg(Color::DarkGray),
                ));
                i += consumed;
                plain_start = i;
                continue;
            }
        }
        i += text[i..].chars().next().map_or(1, |c| c.len_utf8());
    }

    push_plain(&mut spans, plain_start, len);
    if spans.is_empty() {
        spans.push(Span::styled(text.to_string(), base_style));
    }
    spans
}

fn parse_link(text: &str) -> Option<(String, String, usize)> {
    let close_bracket = text.find(']')?;
    let label = &text[1..close_bracket];
    if label.is_empty() {
        return None;
    }
    let rest = &text[close_bracket + 1..];
    if !rest.starts_with('(') {
        return None;
    }
    let close_paren = rest.find(')')?;
    let url = &rest[1..close_paren];
    Some((
        label.to_string(),
        url.to_string(),
        close_bracket + 1 + close_paren + 1,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_strips_control_sequences() {
        assert_eq!(escape_text("safe\x1b[31m text"), "safe[31m text");
        assert_eq!(escape_text("line\nbreak\ttab"), "line\nbreak\ttab");
    }

    #[test]
    fn test_fence_language_extraction() {
        assert_eq!(fence_language("```json"), "json");
        assert_eq!(fence_language("```  "), "");
        assert_eq!(fence_language("``` python "), "python");
    }

    #[test]
    fn test_inline_code_and_bold_split_into_spans() {
        let spans = inline_spans("run `netconvert` with **care**", Style::default());
        let rendered: Vec<String> = spans.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(rendered, vec!["run ", "netconvert", " with ", "care"]);
    }

    #[test]
    fn test_link_renders_label_and_url() {
        let spans = inline_spans("see [the docs](https://sumo.dlr.de)", Style::default());
        let rendered: Vec<String> = spans.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["see ", "the docs", " (https://sumo.dlr.de)"]
        );
    }

    #[test]
    fn test_markdown_preserves_line_count_outside_fences() {
        let lines = render_markdown("# Title\n\nbody text\n- item");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_fenced_block_passes_through_highlighter() {
        let lines = render_markdown("```json\n{\"a\": 1}\n```");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_input_yields_single_blank_line() {
        assert_eq!(render_markdown("").len(), 1);
    }
}
