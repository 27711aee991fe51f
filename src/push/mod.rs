use crate::api::stream::PushParser;
use crate::api::ChatClient;
use crate::types::{ImageNotice, PushEvent, TodoItem};
use crate::ui::surface::RenderSurface;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;

const RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Merges out-of-band notifications into the view, independent of any turn.
/// Owns the last rendered todo snapshot; nobody else compares against it.
#[derive(Default)]
pub struct PushReconciler {
    last_todos: Option<Vec<TodoItem>>,
}

impl PushReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_event(&mut self, event: PushEvent, surface: &mut dyn RenderSurface) {
        match event {
            PushEvent::NewImage(notice) => self.on_image(notice, surface),
            PushEvent::TodosUpdated(todos) => {
                self.on_todos(todos, surface);
            }
        }
    }

    /// Every image notification becomes its own standalone block; there is
    /// no dedup and no suppression for images.
    pub fn on_image(&mut self, notice: ImageNotice, surface: &mut dyn RenderSurface) {
        surface.append_image_block(&notice);
    }

    /// Full-replace reconciliation: a structurally identical snapshot is a
    /// no-op; anything else rebuilds the task region wholesale. Returns
    /// whether a render pass happened.
    pub fn on_todos(&mut self, todos: Vec<TodoItem>, surface: &mut dyn RenderSurface) -> bool {
        if self.last_todos.as_deref() == Some(todos.as_slice()) {
            return false;
        }
        surface.replace_todo_region(&todos);
        self.last_todos = Some(todos);
        true
    }
}

/// Background listener: keeps the push channel open for the lifetime of the
/// app, forwarding decoded events to the UI loop and reconnecting with a
/// fixed delay after transport errors. The backend replays the current todo
/// snapshot on every (re)connect; the reconciler's equality check makes the
/// replay invisible.
pub async fn listen(client: ChatClient, events_tx: mpsc::UnboundedSender<PushEvent>) {
    loop {
        if let Ok(mut stream) = client.create_push_stream().await {
            let mut parser = PushParser::new();
            while let Some(chunk_result) = stream.next().await {
                let Ok(chunk) = chunk_result else {
                    break;
                };
                let Ok(events) = parser.process(&chunk) else {
                    break;
                };
                for event in events {
                    if events_tx.send(event).is_err() {
                        return;
                    }
                }
            }
        }

        if events_tx.is_closed() {
            return;
        }
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TodoStatus;
    use crate::ui::surface::{TranscriptBlock, TranscriptSurface};

    fn todo(id: &str, content: &str, status: TodoStatus) -> TodoItem {
        TodoItem {
            id: id.to_string(),
            content: content.to_string(),
            status,
        }
    }

    #[test]
    fn test_identical_snapshot_delivered_twice_renders_once() {
        let mut reconciler = PushReconciler::new();
        let mut surface = TranscriptSurface::new();
        let snapshot = vec![todo("1", "generate network", TodoStatus::Pending)];

        assert!(reconciler.on_todos(snapshot.clone(), &mut surface));
        assert!(!reconciler.on_todos(snapshot, &mut surface));
    }

    #[test]
    fn test_nth_snapshot_fully_replaces_earlier_ones() {
        let mut reconciler = PushReconciler::new();
        let mut surface = TranscriptSurface::new();

        reconciler.on_todos(
            vec![
                todo("1", "generate network", TodoStatus::InProgress),
                todo("2", "run simulation", TodoStatus::Pending),
            ],
            &mut surface,
        );
        reconciler.on_todos(
            vec![todo("3", "plot results", TodoStatus::Pending)],
            &mut surface,
        );

        assert_eq!(surface.todos.len(), 1);
        assert_eq!(surface.todos[0].id, "3");
    }

    #[test]
    fn test_status_change_alone_triggers_a_render() {
        let mut reconciler = PushReconciler::new();
        let mut surface = TranscriptSurface::new();

        reconciler.on_todos(
            vec![todo("1", "generate network", TodoStatus::Pending)],
            &mut surface,
        );
        let rendered = reconciler.on_todos(
            vec![todo("1", "generate network", TodoStatus::Completed)],
            &mut surface,
        );

        assert!(rendered);
        assert_eq!(surface.todos[0].status, TodoStatus::Completed);
    }

    #[test]
    fn test_empty_snapshot_replaces_but_does_not_reveal() {
        let mut reconciler = PushReconciler::new();
        let mut surface = TranscriptSurface::new();

        assert!(reconciler.on_todos(Vec::new(), &mut surface));
        assert!(!surface.todo_panel_visible);

        reconciler.on_todos(
            vec![todo("1", "generate network", TodoStatus::Pending)],
            &mut surface,
        );
        assert!(surface.todo_panel_visible);
    }

    #[test]
    fn test_images_always_append_even_when_identical() {
        let mut reconciler = PushReconciler::new();
        let mut surface = TranscriptSurface::new();
        let notice = ImageNotice {
            title: "Junction heatmap".to_string(),
            description: String::new(),
            image_path: "/data/heatmap.png".to_string(),
            timestamp: 0.0,
        };

        reconciler.on_image(notice.clone(), &mut surface);
        reconciler.on_image(notice, &mut surface);

        let images = surface
            .blocks
            .iter()
            .filter(|block| matches!(block, TranscriptBlock::Image(_)))
            .count();
        assert_eq!(images, 2);
    }
}
