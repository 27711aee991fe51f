use ratatui::layout::{Constraint, Direction, Layout, Rect};

const TODO_PANEL_WIDTH: u16 = 34;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChatLayout {
    pub transcript: Rect,
    /// Present only while the task panel is revealed.
    pub todo_panel: Option<Rect>,
    pub status: Rect,
    pub input: Rect,
}

pub fn split_chat_layout(area: Rect, todo_panel_visible: bool) -> ChatLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let (transcript, todo_panel) = if todo_panel_visible && area.width > TODO_PANEL_WIDTH * 2 {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(TODO_PANEL_WIDTH)])
            .split(rows[0]);
        (columns[0], Some(columns[1]))
    } else {
        (rows[0], None)
    };

    ChatLayout {
        transcript,
        todo_panel,
        status: rows[1],
        input: rows[2],
    }
}
