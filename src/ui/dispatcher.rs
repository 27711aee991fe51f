use crate::api::logging::emit_render_warning;
use crate::state::section::SectionKind;
use crate::ui::highlight::highlight_code_line;
use crate::ui::markup::{plain_lines, render_markdown};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;

/// Sole formatting path from section content to terminal text. Formatting
/// failures inside a section degrade to plain output; they never escape
/// this boundary.
pub fn format_section(kind: &SectionKind, content: &str) -> Vec<Line<'static>> {
    match kind {
        SectionKind::Think => plain_lines(
            content,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
        SectionKind::ToolCalls | SectionKind::ToolResponses => format_structured(content),
        SectionKind::Answer => render_markdown(content),
        SectionKind::Other(_) => plain_lines(content, Style::default().fg(Color::White)),
    }
}

/// Tool payloads are usually JSON; pretty-print and highlight them when
/// they parse, otherwise show the raw text as an unhighlighted code block.
fn format_structured(content: &str) -> Vec<Line<'static>> {
    match serde_json::from_str::<serde_json::Value>(content.trim()) {
        Ok(value) => {
            let pretty = match serde_json::to_string_pretty(&value) {
                Ok(pretty) => pretty,
                Err(error) => {
                    emit_render_warning("tool_json", &error.to_string());
                    return code_block_lines(content);
                }
            };
            pretty
                .lines()
                .map(|line| highlight_code_line(line, "json"))
                .collect()
        }
        Err(_) => code_block_lines(content),
    }
}

fn code_block_lines(content: &str) -> Vec<Line<'static>> {
    plain_lines(content, Style::default().fg(Color::Gray))
}

/// Header line for a section's render node: icon, label, progress marker.
pub fn section_header(kind: &SectionKind, complete: bool, expanded: bool) -> Line<'static> {
    let marker = if complete { "" } else { " ⋯" };
    let caret = match kind {
        SectionKind::Think if !expanded => " ▸",
        SectionKind::Think => " ▾",
        _ => "",
    };
    Line::styled(
        format!("{} {}{caret}{marker}", kind.icon(), kind.label()),
        Style::default()
            .fg(header_color(kind))
            .add_modifier(Modifier::BOLD),
    )
}

fn header_color(kind: &SectionKind) -> Color {
    match kind {
        SectionKind::Think => Color::DarkGray,
        SectionKind::ToolCalls => Color::Yellow,
        SectionKind::ToolResponses => Color::Green,
        SectionKind::Answer => Color::Cyan,
        SectionKind::Other(_) => Color::White,
    }
}
