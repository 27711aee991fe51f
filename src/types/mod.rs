mod wire;

pub use wire::{ImageNotice, PushEvent, TodoItem, TodoSnapshotPayload, TodoStatus, WireEvent};
