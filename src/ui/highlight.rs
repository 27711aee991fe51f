use crate::api::logging::emit_render_warning;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

struct HighlightAssets {
    syntax_set: SyntaxSet,
    theme: Theme,
}

fn assets() -> &'static HighlightAssets {
    static ASSETS: OnceLock<HighlightAssets> = OnceLock::new();
    ASSETS.get_or_init(|| {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove("base16-eighties.dark")
            .unwrap_or_else(Theme::default);
        HighlightAssets { syntax_set, theme }
    })
}

fn to_ratatui_color(c: syntect::highlighting::Color) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Highlight one line of code from a fenced block. Uses syntect when the
/// fence language has a known syntax; any failure degrades to the keyword
/// fallback instead of propagating.
pub fn highlight_code_line(line: &str, lang: &str) -> Line<'static> {
    let assets = assets();
    let syntax = if lang.is_empty() {
        None
    } else {
        assets
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| assets.syntax_set.find_syntax_by_extension(lang))
    };

    if let Some(syntax) = syntax {
        use syntect::easy::HighlightLines;
        let mut highlighter = HighlightLines::new(syntax, &assets.theme);
        match highlighter.highlight_line(line, &assets.syntax_set) {
            Ok(ranges) => {
                let spans: Vec<Span<'static>> = ranges
                    .into_iter()
                    .map(|(style, text)| {
                        let mut out = Style::default().fg(to_ratatui_color(style.foreground));
                        if style
                            .font_style
                            .contains(syntect::highlighting::FontStyle::BOLD)
                        {
                            out = out.add_modifier(Modifier::BOLD);
                        }
                        Span::styled(text.to_string(), out)
                    })
                    .collect();
                if !spans.is_empty() {
                    return Line::from(spans);
                }
            }
            Err(error) => {
                emit_render_warning("highlight", &format!("lang={lang} error={error}"));
            }
        }
    }

    fallback_line(line)
}

/// Keyword-based highlighting for languages syntect does not know.
fn fallback_line(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    for word in split_keeping_separators(line) {
        let style = if is_keyword(word) {
            Style::default().fg(Color::Magenta)
        } else if word.chars().all(|c| c.is_ascii_digit()) && !word.is_empty() {
            Style::default().fg(Color::Cyan)
        } else if word.starts_with('"') || word.starts_with('\'') {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(word.to_string(), style));
    }
    if spans.is_empty() {
        spans.push(Span::raw(String::new()));
    }
    Line::from(spans)
}

fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "fn" | "let"
            | "if"
            | "else"
            | "for"
            | "while"
            | "return"
            | "def"
            | "class"
            | "import"
            | "from"
            | "true"
            | "false"
            | "null"
            | "None"
            | "True"
            | "False"
    )
}

fn split_keeping_separators(line: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (index, ch) in line.char_indices() {
        if !ch.is_alphanumeric() && ch != '_' && ch != '"' && ch != '\'' {
            if index > start {
                parts.push(&line[start..index]);
            }
            parts.push(&line[index..index + ch.len_utf8()]);
            start = index + ch.len_utf8();
        }
    }
    if start < line.len() {
        parts.push(&line[start..]);
    }
    parts
}
