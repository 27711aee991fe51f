use super::state::TurnState;
use crate::api::stream::StreamParser;
use crate::api::ChatClient;
use crate::ui::surface::RenderSurface;
use anyhow::Result;
use futures::StreamExt;
use std::sync::Arc;

/// Drives one conversational turn: opens the answer stream and feeds every
/// decoded event through the turn's state machine in arrival order. Events
/// are never reordered or batched across frames.
pub struct TurnController {
    client: Arc<ChatClient>,
    next_turn_id: u64,
}

impl TurnController {
    pub fn new(client: ChatClient) -> Self {
        Self {
            client: Arc::new(client),
            next_turn_id: 0,
        }
    }

    /// Fresh tracking state for the next turn; the previous turn's pending
    /// and suppressed sets die with their `TurnState`.
    pub fn begin_turn(&mut self) -> TurnState {
        self.next_turn_id += 1;
        TurnState::new(self.next_turn_id)
    }

    /// Runs a turn to stream exhaustion. Transport failures surface as
    /// `Err`; the caller renders them as an inline notice. Producer `error`
    /// frames render inline too but do not stop the remaining events.
    pub async fn run_turn(
        &self,
        turn: &mut TurnState,
        message: &str,
        surface: &mut dyn RenderSurface,
    ) -> Result<()> {
        let mut stream = self.client.create_turn_stream(message).await?;
        surface.append_assistant_container();

        let mut parser = StreamParser::new();
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            for event in parser.process(&chunk)? {
                turn.apply(event, surface);
            }
        }

        Ok(())
    }
}
