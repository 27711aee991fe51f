use crate::types::{TodoItem, TodoStatus};
use crate::ui::dispatcher::{format_section, section_header};
use crate::ui::markup::escape_text;
use crate::ui::surface::{TranscriptBlock, TranscriptSurface};
use crate::util::truncate_line;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Flattens the transcript into drawable lines. Collapsed reasoning
/// sections contribute only their header.
pub fn transcript_lines(surface: &TranscriptSurface) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for block in &surface.blocks {
        match block {
            TranscriptBlock::UserTurn(text) => {
                lines.push(Line::styled(
                    format!("> {}", escape_text(text)),
                    Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
                ));
                lines.push(Line::default());
            }
            TranscriptBlock::AssistantTurn { sections } => {
                for node in sections {
                    lines.push(section_header(&node.kind, node.complete, node.expanded));
                    let collapsed =
                        matches!(node.kind, crate::state::SectionKind::Think) && !node.expanded;
                    if !collapsed {
                        for body_line in format_section(&node.kind, &node.content) {
                            lines.push(indent(body_line));
                        }
                    }
                    lines.push(Line::default());
                }
            }
            TranscriptBlock::ErrorNotice(message) => {
                lines.push(Line::styled(
                    format!("! {}", escape_text(message)),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ));
                lines.push(Line::default());
            }
            TranscriptBlock::Image(notice) => {
                lines.push(Line::styled(
                    format!("▣ {}", escape_text(&notice.title)),
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                ));
                if !notice.description.is_empty() {
                    lines.push(indent(Line::styled(
                        escape_text(&notice.description),
                        Style::default().fg(Color::Gray),
                    )));
                }
                lines.push(indent(Line::styled(
                    escape_text(&notice.image_path),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::UNDERLINED),
                )));
                lines.push(Line::default());
            }
        }
    }

    lines
}

fn indent(line: Line<'static>) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    spans.extend(line.spans);
    Line::from(spans)
}

pub fn render_transcript(frame: &mut Frame<'_>, area: Rect, surface: &TranscriptSurface, scroll: usize) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let lines = transcript_lines(surface);
    // Follow the bottom unless the user scrolled back.
    let visible = area.height as usize;
    let max_scroll = lines.len().saturating_sub(visible);
    let offset = max_scroll.saturating_sub(scroll);

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((offset as u16, 0));
    frame.render_widget(paragraph, area);
}

pub fn render_todo_panel(frame: &mut Frame<'_>, area: Rect, todos: &[TodoItem]) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let block = Block::default()
        .borders(Borders::LEFT)
        .title("Tasks")
        .style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line<'static>> = if todos.is_empty() {
        vec![Line::styled(
            "no tasks".to_string(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
        )]
    } else {
        todos.iter().map(todo_line).collect()
    };

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn todo_line(item: &TodoItem) -> Line<'static> {
    let (glyph, style) = match item.status {
        TodoStatus::Pending => ("☐ ", Style::default().fg(Color::Gray)),
        TodoStatus::InProgress => ("◐ ", Style::default().fg(Color::Yellow)),
        TodoStatus::Completed => (
            "☑ ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::CROSSED_OUT),
        ),
    };
    Line::from(vec![
        Span::styled(glyph.to_string(), style),
        Span::styled(escape_text(&item.content), style),
    ])
}

pub fn render_status_line(frame: &mut Frame<'_>, area: Rect, status: &str) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let text = truncate_line(status, area.width as usize);
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

pub fn render_input(frame: &mut Frame<'_>, area: Rect, input: &str, cursor_chars: usize) {
    if area.height == 0 || area.width <= 2 {
        return;
    }

    frame.render_widget(
        Paragraph::new(format!("> {input}")).style(Style::default().fg(Color::White)),
        area,
    );

    let cursor_x = area
        .x
        .saturating_add(2 + cursor_chars as u16)
        .min(area.x.saturating_add(area.width.saturating_sub(1)));
    frame.set_cursor_position((cursor_x, area.y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SectionKind;
    use crate::ui::surface::RenderSurface;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_collapsed_think_section_renders_header_only() {
        let mut surface = TranscriptSurface::new();
        surface.append_assistant_container();
        surface.ensure_section("think", &SectionKind::Think);
        surface.paint_section("think", "   ", false);

        let lines = transcript_lines(&surface);
        let body_lines: Vec<String> = lines.iter().map(line_text).collect();
        assert!(body_lines[0].contains("Thinking"));
        // Header plus trailing blank, no body.
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_expanded_think_section_includes_body() {
        let mut surface = TranscriptSurface::new();
        surface.append_assistant_container();
        surface.ensure_section("think", &SectionKind::Think);
        surface.paint_section("think", "analyzing", true);

        let lines = transcript_lines(&surface);
        assert!(lines.iter().any(|line| line_text(line).contains("analyzing")));
    }

    #[test]
    fn test_image_block_shows_title_and_path() {
        let mut surface = TranscriptSurface::new();
        surface.append_image_block(&crate::types::ImageNotice {
            title: "Flow heatmap".to_string(),
            description: "Morning peak".to_string(),
            image_path: "/data/flow.png".to_string(),
            timestamp: 0.0,
        });

        let rendered: Vec<String> = transcript_lines(&surface).iter().map(line_text).collect();
        assert!(rendered.iter().any(|l| l.contains("Flow heatmap")));
        assert!(rendered.iter().any(|l| l.contains("/data/flow.png")));
        assert!(rendered.iter().any(|l| l.contains("Morning peak")));
    }
}
