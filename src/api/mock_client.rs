use crate::api::client::{ByteStream, MockStreamProducer};
use anyhow::{anyhow, Result};
use bytes::Bytes;
use futures::stream;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted turn's byte stream, assembled event by event. Typed helpers
/// emit complete `data:` frames as single chunks; `raw` delivers arbitrary
/// bytes as their own chunk, so a test can split one frame across chunk
/// boundaries or inject noise between frames.
#[derive(Debug, Clone, Default)]
pub struct TurnScript {
    chunks: Vec<Bytes>,
}

impl TurnScript {
    pub fn new() -> Self {
        Self::default()
    }

    fn frame(mut self, payload: serde_json::Value) -> Self {
        self.chunks.push(Bytes::from(format!("data: {payload}\n\n")));
        self
    }

    pub fn section_start(self, section: &str) -> Self {
        self.frame(json!({"type": "section_start", "section": section}))
    }

    pub fn content(self, section: &str, content: &str) -> Self {
        self.frame(json!({"type": "content", "section": section, "content": content}))
    }

    pub fn section_complete(self, section: &str) -> Self {
        self.frame(json!({"type": "section_complete", "section": section}))
    }

    pub fn error(self, message: &str) -> Self {
        self.frame(json!({"type": "error", "message": message}))
    }

    pub fn turn_complete(self) -> Self {
        self.frame(json!({"type": "complete"}))
    }

    pub fn raw(mut self, bytes: &str) -> Self {
        self.chunks.push(Bytes::from(bytes.to_string()));
        self
    }
}

/// Scripted stream producer for turn tests: each request consumes the next
/// script; a request past the last script fails like a refused connection.
pub struct MockChatClient {
    scripts: Mutex<VecDeque<TurnScript>>,
}

impl MockChatClient {
    pub fn new(scripts: Vec<TurnScript>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
        }
    }

    pub fn single(script: TurnScript) -> Self {
        Self::new(vec![script])
    }

    /// A producer with nothing scripted; every request errors, standing in
    /// for a backend that refuses the connection.
    pub fn refusing() -> Self {
        Self::new(Vec::new())
    }
}

impl MockStreamProducer for MockChatClient {
    fn create_mock_stream(&self, _message: &str) -> Result<ByteStream> {
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted turn left for this request"))?;
        let chunks: Vec<Result<Bytes>> = script.chunks.into_iter().map(Ok).collect();
        Ok(Box::pin(stream::iter(chunks)))
    }
}
