use crate::api::logging::emit_parse_error;
use crate::types::{ImageNotice, PushEvent, TodoSnapshotPayload, WireEvent};
use anyhow::Result;

/// One framed server-sent event: optional `event:` name, optional `data:`
/// payload. Lines inside a frame that carry neither prefix are ignored.
struct SseFrame {
    event: Option<String>,
    data: Option<String>,
}

/// Splits raw byte chunks into complete frames, holding partial text until
/// the blank-line terminator arrives. No frame is emitted for a partial line.
#[derive(Default)]
struct FrameBuffer {
    buffer: String,
}

impl FrameBuffer {
    fn drain_frames(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));
        let mut frames = Vec::new();
        let mut start = 0;

        while let Some(end) = self.buffer[start..].find("\n\n") {
            let frame_end = start + end + 2;
            let frame_text = &self.buffer[start..frame_end];

            let mut event = None;
            let mut data = None;
            for line in frame_text.lines() {
                if let Some(rest) = line.strip_prefix("event: ") {
                    event = Some(rest.trim().to_string());
                } else if let Some(rest) = line.strip_prefix("data: ") {
                    data = Some(rest.trim().to_string());
                }
            }

            frames.push(SseFrame { event, data });
            start = frame_end;
        }

        if start > 0 {
            self.buffer.drain(..start);
        }
        frames
    }

    fn take_remainder(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

/// Decoder for the per-turn answer stream: `data: {json}` frames carrying
/// `WireEvent` records. Malformed payloads are logged and dropped; the
/// stream is never aborted by a bad line.
#[derive(Default)]
pub struct StreamParser {
    frames: FrameBuffer,
}

impl StreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, chunk: &[u8]) -> Result<Vec<WireEvent>> {
        let mut events = Vec::new();
        for frame in self.frames.drain_frames(chunk) {
            let Some(data) = frame.data else {
                continue;
            };
            match serde_json::from_str::<WireEvent>(&data) {
                Ok(event) => events.push(event),
                Err(error) => emit_parse_error("stream", &data, &error),
            }
        }
        Ok(events)
    }

    pub fn flush(&mut self) -> String {
        self.frames.take_remainder()
    }
}

/// Decoder for the persistent push channel: named frames (`event: new_image`,
/// `event: todos_updated`) with JSON payloads. Unknown event names are
/// skipped; decode failures are logged and dropped.
#[derive(Default)]
pub struct PushParser {
    frames: FrameBuffer,
}

impl PushParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, chunk: &[u8]) -> Result<Vec<PushEvent>> {
        let mut events = Vec::new();
        for frame in self.frames.drain_frames(chunk) {
            let (Some(name), Some(data)) = (frame.event, frame.data) else {
                continue;
            };
            match name.as_str() {
                "new_image" => match serde_json::from_str::<ImageNotice>(&data) {
                    Ok(notice) => events.push(PushEvent::NewImage(notice)),
                    Err(error) => emit_parse_error("push", &data, &error),
                },
                "todos_updated" => match serde_json::from_str::<TodoSnapshotPayload>(&data) {
                    Ok(payload) => events.push(PushEvent::TodosUpdated(payload.todos)),
                    Err(error) => emit_parse_error("push", &data, &error),
                },
                _ => {}
            }
        }
        Ok(events)
    }
}
