use crate::api::ChatClient;
use crate::config::Config;
use crate::push::{self, PushReconciler};
use crate::state::TurnController;
use crate::terminal::TerminalSession;
use crate::types::PushEvent;
use crate::ui::layout::split_chat_layout;
use crate::ui::render;
use crate::ui::surface::{ChannelSurface, RenderSurface, SurfaceOp, TranscriptSurface};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

const TUI_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Messages the background turn task sends back to the UI loop.
#[derive(Debug)]
pub enum UiUpdate {
    Surface(SurfaceOp),
    TurnComplete,
    TurnFailed(String),
}

/// The input line plus the one-turn-at-a-time gate. All submission
/// decisions happen here, independent of the terminal and the spawned
/// tasks, so the gate is testable on its own.
#[derive(Default)]
pub struct Composer {
    buffer: String,
    cursor: usize,
    turn_in_progress: bool,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_busy(&self) -> bool {
        self.turn_in_progress
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Takes the trimmed buffer as the next turn's message and marks the
    /// composer busy. While a turn is active, or when the buffer trims to
    /// nothing, the submission is rejected and the buffer is left alone.
    pub fn take_submission(&mut self) -> Option<String> {
        if self.turn_in_progress {
            return None;
        }
        let message = self.buffer.trim().to_string();
        if message.is_empty() {
            return None;
        }
        self.buffer.clear();
        self.cursor = 0;
        self.turn_in_progress = true;
        Some(message)
    }

    pub fn turn_finished(&mut self) {
        self.turn_in_progress = false;
    }

    pub fn insert_str(&mut self, text: &str) {
        let idx = self.byte_index(self.cursor);
        self.buffer.insert_str(idx, text);
        self.cursor += text.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let idx = self.byte_index(self.cursor - 1);
            self.buffer.remove(idx);
            self.cursor -= 1;
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.buffer.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.buffer.chars().count();
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.buffer.len())
    }
}

pub struct App {
    surface: TranscriptSurface,
    reconciler: PushReconciler,
    terminal: Option<TerminalSession>,
    composer: Composer,
    scroll_offset: usize,
    should_quit: bool,
    submit_tx: mpsc::UnboundedSender<String>,
    update_rx: mpsc::UnboundedReceiver<UiUpdate>,
    push_rx: mpsc::UnboundedReceiver<PushEvent>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let (submit_tx, submit_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let (push_tx, push_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_turn_worker(
            ChatClient::new(&config),
            submit_rx,
            update_tx,
        ));
        tokio::spawn(push::listen(ChatClient::new(&config), push_tx));

        Ok(Self {
            surface: TranscriptSurface::new(),
            reconciler: PushReconciler::new(),
            terminal: None,
            composer: Composer::new(),
            scroll_offset: 0,
            should_quit: false,
            submit_tx,
            update_rx,
            push_rx,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.terminal = Some(TerminalSession::begin()?);
        let result = self.run_loop().await;
        // Dropping the session restores the display.
        self.terminal = None;
        result
    }

    async fn run_loop(&mut self) -> Result<()> {
        let mut tick = tokio::time::interval(TUI_TICK_INTERVAL);
        while !self.should_quit {
            self.draw_frame()?;
            self.process_input_events()?;

            tokio::select! {
                _ = tick.tick() => {}
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
                update = self.update_rx.recv() => {
                    if let Some(update) = update {
                        self.handle_update(update);
                    }
                }
                event = self.push_rx.recv() => {
                    if let Some(event) = event {
                        self.reconciler.on_event(event, &mut self.surface);
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_update(&mut self, update: UiUpdate) {
        match update {
            UiUpdate::Surface(op) => self.surface.apply(op),
            UiUpdate::TurnComplete => self.composer.turn_finished(),
            UiUpdate::TurnFailed(message) => {
                self.surface.append_error_notice(&message);
                self.composer.turn_finished();
            }
        }
    }

    fn draw_frame(&mut self) -> Result<()> {
        let status_line = self.status_line_text();
        let Some(session) = self.terminal.as_mut() else {
            return Ok(());
        };

        let surface = &self.surface;
        let composer = &self.composer;
        let scroll_offset = self.scroll_offset;

        session.terminal().draw(|frame| {
            let layout = split_chat_layout(frame.area(), surface.todo_panel_visible);
            render::render_transcript(frame, layout.transcript, surface, scroll_offset);
            if let Some(panel) = layout.todo_panel {
                render::render_todo_panel(frame, panel, &surface.todos);
            }
            render::render_status_line(frame, layout.status, &status_line);
            render::render_input(frame, layout.input, composer.buffer(), composer.cursor());
        })?;

        Ok(())
    }

    fn status_line_text(&self) -> String {
        if self.composer.is_busy() {
            "streaming (input held until the turn finishes)".to_string()
        } else {
            "ready".to_string()
        }
    }

    fn process_input_events(&mut self) -> Result<()> {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Paste(text) => {
                    if !text.is_empty() {
                        self.composer.insert_str(&text);
                    }
                }
                Event::Key(key)
                    if key.kind == KeyEventKind::Press || key.kind == KeyEventKind::Repeat =>
                {
                    self.handle_key_event(key);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Esc => {
                if self.composer.is_empty() {
                    self.should_quit = true;
                } else {
                    self.composer.clear();
                }
            }
            KeyCode::Char(c) => self.composer.insert_str(&c.to_string()),
            KeyCode::Backspace => self.composer.backspace(),
            KeyCode::Left => self.composer.move_left(),
            KeyCode::Right => self.composer.move_right(),
            KeyCode::Home => self.composer.move_home(),
            KeyCode::End => self.composer.move_end(),
            KeyCode::PageUp => self.scroll_offset = self.scroll_offset.saturating_add(3),
            KeyCode::PageDown => self.scroll_offset = self.scroll_offset.saturating_sub(3),
            _ => {}
        }
    }

    fn submit_input(&mut self) {
        let Some(message) = self.composer.take_submission() else {
            return;
        };
        self.scroll_offset = 0;

        // Echo the user's message right away; sections stream in behind it.
        self.surface.append_user_turn(&message);
        if self.submit_tx.send(message).is_err() {
            self.composer.turn_finished();
            self.surface
                .append_error_notice("background turn task is gone; restart the client");
        }
    }
}

/// Owns the `TurnController` off the UI thread. Each submitted message gets
/// its own surface-op channel whose forwarder wraps ops as `UiUpdate`s.
async fn run_turn_worker(
    client: ChatClient,
    mut submit_rx: mpsc::UnboundedReceiver<String>,
    update_tx: mpsc::UnboundedSender<UiUpdate>,
) {
    let mut controller = TurnController::new(client);

    while let Some(message) = submit_rx.recv().await {
        let (op_tx, mut op_rx) = mpsc::unbounded_channel();
        let forward_tx = update_tx.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(op) = op_rx.recv().await {
                if forward_tx.send(UiUpdate::Surface(op)).is_err() {
                    break;
                }
            }
        });

        let mut surface = ChannelSurface::new(op_tx);
        let mut turn = controller.begin_turn();
        let outcome = controller.run_turn(&mut turn, &message, &mut surface).await;

        // Drop the surface so the forwarder drains and exits before the
        // completion notice, keeping surface ops ordered ahead of it.
        drop(surface);
        let _ = forwarder.await;

        let update = match outcome {
            Ok(()) => UiUpdate::TurnComplete,
            Err(err) => UiUpdate::TurnFailed(format!("turn failed: {err:#}")),
        };
        if update_tx.send(update).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_during_active_turn_is_rejected_outright() {
        let mut composer = Composer::new();
        composer.insert_str("first question");
        assert_eq!(
            composer.take_submission().as_deref(),
            Some("first question")
        );
        assert!(composer.is_busy());

        // A second submit while the turn streams is dropped, not queued;
        // the typed text stays in the buffer.
        composer.insert_str("second question");
        assert_eq!(composer.take_submission(), None);
        assert_eq!(composer.buffer(), "second question");

        composer.turn_finished();
        assert_eq!(
            composer.take_submission().as_deref(),
            Some("second question")
        );
    }

    #[test]
    fn test_blank_submission_neither_sends_nor_marks_busy() {
        let mut composer = Composer::new();
        composer.insert_str("   ");
        assert_eq!(composer.take_submission(), None);
        assert!(!composer.is_busy());
    }

    #[test]
    fn test_composer_edits_respect_char_boundaries() {
        let mut composer = Composer::new();
        composer.insert_str("优化信号");
        composer.move_left();
        composer.backspace();
        assert_eq!(composer.buffer(), "优化号");
        composer.move_end();
        composer.insert_str("!");
        assert_eq!(composer.buffer(), "优化号!");
    }
}
