use crate::config::Config;
use anyhow::{anyhow, Result};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::json;
use std::pin::Pin;
#[cfg(test)]
use std::sync::Arc;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

#[cfg(test)]
pub trait MockStreamProducer: Send + Sync {
    fn create_mock_stream(&self, message: &str) -> Result<ByteStream>;
}

/// HTTP transport for the chat backend: one streaming POST per turn and a
/// persistent GET for the push channel.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    chat_url: String,
    push_url: String,
    #[cfg(test)]
    mock_stream_producer: Option<Arc<dyn MockStreamProducer>>,
}

impl ChatClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            chat_url: config.chat_url.clone(),
            push_url: config.push_url.clone(),
            #[cfg(test)]
            mock_stream_producer: None,
        }
    }

    #[cfg(test)]
    pub fn new_mock(mock_producer: Arc<dyn MockStreamProducer>) -> Self {
        Self {
            http: reqwest::Client::new(),
            chat_url: "http://127.0.0.1:5000/api/chat".to_string(),
            push_url: "http://127.0.0.1:5000/api/push".to_string(),
            mock_stream_producer: Some(mock_producer),
        }
    }

    /// Open the answer stream for one turn. The request carries the user's
    /// message; the response body is the framed event stream.
    pub async fn create_turn_stream(&self, message: &str) -> Result<ByteStream> {
        #[cfg(test)]
        {
            if let Some(producer) = &self.mock_stream_producer {
                return producer.create_mock_stream(message);
            }
        }

        let response = self
            .http
            .post(&self.chat_url)
            .header("content-type", "application/json")
            .json(&json!({ "message": message }))
            .send()
            .await
            .map_err(|error| map_request_error(error, &self.chat_url))?
            .error_for_status()
            .map_err(|error| map_request_error(error, &self.chat_url))?;

        Ok(wrap_byte_stream(response, self.chat_url.clone()))
    }

    /// Open the push channel. Callers reconnect when the returned stream
    /// ends; the channel is independent of turn boundaries.
    pub async fn create_push_stream(&self) -> Result<ByteStream> {
        let response = self
            .http
            .get(&self.push_url)
            .send()
            .await
            .map_err(|error| map_request_error(error, &self.push_url))?
            .error_for_status()
            .map_err(|error| map_request_error(error, &self.push_url))?;

        Ok(wrap_byte_stream(response, self.push_url.clone()))
    }
}

fn wrap_byte_stream(response: reqwest::Response, request_url: String) -> ByteStream {
    let stream = response
        .bytes_stream()
        .map(move |item| item.map_err(|error| map_request_error(error, &request_url)));
    Box::pin(stream)
}

fn map_request_error(error: reqwest::Error, request_url: &str) -> anyhow::Error {
    if error.is_connect() {
        return anyhow!(
            "cannot reach backend '{}': {}. Start the agent server or update SUMOCHAT_API_URL.",
            request_url,
            error
        );
    }
    if error.is_timeout() {
        return anyhow!("request to '{}' timed out: {}", request_url, error);
    }
    if let Some(status) = error.status() {
        return anyhow!("backend '{}' returned HTTP {}: {}", request_url, status, error);
    }
    anyhow!("request to '{}' failed: {}", request_url, error)
}
