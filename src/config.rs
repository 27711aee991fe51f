use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_CHAT_URL: &str = "http://127.0.0.1:5000/api/chat";
const DEFAULT_PUSH_URL: &str = "http://127.0.0.1:5000/api/push";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub chat_url: String,
    pub push_url: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let chat_url =
            std::env::var("SUMOCHAT_API_URL").unwrap_or_else(|_| DEFAULT_CHAT_URL.to_string());
        let push_url =
            std::env::var("SUMOCHAT_PUSH_URL").unwrap_or_else(|_| DEFAULT_PUSH_URL.to_string());

        Ok(Self { chat_url, push_url })
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("SUMOCHAT_API_URL", &self.chat_url),
            ("SUMOCHAT_PUSH_URL", &self.push_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("Invalid {} '{}': expected http:// or https:// URL", name, url);
            }
        }

        Ok(())
    }
}
