use crate::state::section::SectionKind;
use crate::types::{ImageNotice, TodoItem};
use tokio::sync::mpsc;

/// The only contact points between the turn/push logic and the visible
/// transcript. Everything the user sees is mutated through this trait, so
/// all mutation sites are enumerable and testable without a terminal.
pub trait RenderSurface: Send {
    fn append_user_turn(&mut self, text: &str);
    /// Opens the container all of the current turn's sections render into.
    fn append_assistant_container(&mut self);
    /// Creates the render node for a section (header, empty body).
    fn ensure_section(&mut self, id: &str, kind: &SectionKind);
    /// Replaces a section's visible content in place.
    fn paint_section(&mut self, id: &str, content: &str, expanded: bool);
    /// Drops a section's render node after late suppression.
    fn remove_section(&mut self, id: &str);
    /// Clears the in-progress indicator.
    fn complete_section(&mut self, id: &str);
    fn append_error_notice(&mut self, message: &str);
    fn append_image_block(&mut self, notice: &ImageNotice);
    fn replace_todo_region(&mut self, todos: &[TodoItem]);
}

/// One `RenderSurface` mutation, reified so a background turn task can ship
/// it over a channel to the UI loop.
#[derive(Debug, Clone)]
pub enum SurfaceOp {
    UserTurn(String),
    AssistantContainer,
    EnsureSection { id: String, kind: SectionKind },
    PaintSection {
        id: String,
        content: String,
        expanded: bool,
    },
    RemoveSection { id: String },
    CompleteSection { id: String },
    ErrorNotice(String),
    ImageBlock(ImageNotice),
    TodoRegion(Vec<TodoItem>),
}

/// Surface implementation that forwards every mutation over an unbounded
/// channel. Send failures mean the UI is gone; they are ignored, matching
/// how stream updates are forwarded elsewhere.
pub struct ChannelSurface {
    tx: mpsc::UnboundedSender<SurfaceOp>,
}

impl ChannelSurface {
    pub fn new(tx: mpsc::UnboundedSender<SurfaceOp>) -> Self {
        Self { tx }
    }

    fn send(&self, op: SurfaceOp) {
        let _ = self.tx.send(op);
    }
}

impl RenderSurface for ChannelSurface {
    fn append_user_turn(&mut self, text: &str) {
        self.send(SurfaceOp::UserTurn(text.to_string()));
    }

    fn append_assistant_container(&mut self) {
        self.send(SurfaceOp::AssistantContainer);
    }

    fn ensure_section(&mut self, id: &str, kind: &SectionKind) {
        self.send(SurfaceOp::EnsureSection {
            id: id.to_string(),
            kind: kind.clone(),
        });
    }

    fn paint_section(&mut self, id: &str, content: &str, expanded: bool) {
        self.send(SurfaceOp::PaintSection {
            id: id.to_string(),
            content: content.to_string(),
            expanded,
        });
    }

    fn remove_section(&mut self, id: &str) {
        self.send(SurfaceOp::RemoveSection { id: id.to_string() });
    }

    fn complete_section(&mut self, id: &str) {
        self.send(SurfaceOp::CompleteSection { id: id.to_string() });
    }

    fn append_error_notice(&mut self, message: &str) {
        self.send(SurfaceOp::ErrorNotice(message.to_string()));
    }

    fn append_image_block(&mut self, notice: &ImageNotice) {
        self.send(SurfaceOp::ImageBlock(notice.clone()));
    }

    fn replace_todo_region(&mut self, todos: &[TodoItem]) {
        self.send(SurfaceOp::TodoRegion(todos.to_vec()));
    }
}

/// A section's render node inside an assistant turn container.
#[derive(Debug, Clone)]
pub struct SectionNode {
    pub id: String,
    pub kind: SectionKind,
    pub content: String,
    pub expanded: bool,
    pub complete: bool,
}

#[derive(Debug, Clone)]
pub enum TranscriptBlock {
    UserTurn(String),
    AssistantTurn { sections: Vec<SectionNode> },
    ErrorNotice(String),
    Image(ImageNotice),
}

/// The in-memory transcript the TUI draws from. Owned and mutated only by
/// the app's single event loop.
#[derive(Default)]
pub struct TranscriptSurface {
    pub blocks: Vec<TranscriptBlock>,
    pub todos: Vec<TodoItem>,
    pub todo_panel_visible: bool,
}

impl TranscriptSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, op: SurfaceOp) {
        match op {
            SurfaceOp::UserTurn(text) => self.append_user_turn(&text),
            SurfaceOp::AssistantContainer => self.append_assistant_container(),
            SurfaceOp::EnsureSection { id, kind } => self.ensure_section(&id, &kind),
            SurfaceOp::PaintSection {
                id,
                content,
                expanded,
            } => self.paint_section(&id, &content, expanded),
            SurfaceOp::RemoveSection { id } => self.remove_section(&id),
            SurfaceOp::CompleteSection { id } => self.complete_section(&id),
            SurfaceOp::ErrorNotice(message) => self.append_error_notice(&message),
            SurfaceOp::ImageBlock(notice) => self.append_image_block(&notice),
            SurfaceOp::TodoRegion(todos) => self.replace_todo_region(&todos),
        }
    }

    /// Section ids are unique within a turn, so lookups stay inside the
    /// newest assistant container.
    fn current_sections(&mut self) -> Option<&mut Vec<SectionNode>> {
        self.blocks.iter_mut().rev().find_map(|block| match block {
            TranscriptBlock::AssistantTurn { sections } => Some(sections),
            _ => None,
        })
    }

    fn section_node(&mut self, id: &str) -> Option<&mut SectionNode> {
        self.current_sections()?
            .iter_mut()
            .find(|node| node.id == id)
    }
}

impl RenderSurface for TranscriptSurface {
    fn append_user_turn(&mut self, text: &str) {
        self.blocks.push(TranscriptBlock::UserTurn(text.to_string()));
    }

    fn append_assistant_container(&mut self) {
        self.blocks.push(TranscriptBlock::AssistantTurn {
            sections: Vec::new(),
        });
    }

    fn ensure_section(&mut self, id: &str, kind: &SectionKind) {
        let node = SectionNode {
            id: id.to_string(),
            kind: kind.clone(),
            content: String::new(),
            expanded: false,
            complete: false,
        };
        match self.current_sections() {
            Some(sections) => {
                if !sections.iter().any(|existing| existing.id == id) {
                    sections.push(node);
                }
            }
            None => {
                // Tolerate a section arriving before any container.
                self.blocks.push(TranscriptBlock::AssistantTurn {
                    sections: vec![node],
                });
            }
        }
    }

    fn paint_section(&mut self, id: &str, content: &str, expanded: bool) {
        if let Some(node) = self.section_node(id) {
            node.content = content.to_string();
            node.expanded = expanded;
        }
    }

    fn remove_section(&mut self, id: &str) {
        if let Some(sections) = self.current_sections() {
            sections.retain(|node| node.id != id);
        }
    }

    fn complete_section(&mut self, id: &str) {
        if let Some(node) = self.section_node(id) {
            node.complete = true;
        }
    }

    fn append_error_notice(&mut self, message: &str) {
        self.blocks
            .push(TranscriptBlock::ErrorNotice(message.to_string()));
    }

    fn append_image_block(&mut self, notice: &ImageNotice) {
        self.blocks.push(TranscriptBlock::Image(notice.clone()));
    }

    fn replace_todo_region(&mut self, todos: &[TodoItem]) {
        self.todos = todos.to_vec();
        if !self.todos.is_empty() {
            self.todo_panel_visible = true;
        }
    }
}
