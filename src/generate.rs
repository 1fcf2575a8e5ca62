//! Generation collaborator client.
//!
//! Sends the ordered message list to an Ollama `/api/chat` endpoint and
//! returns the assistant's reply. Streaming transport is the server layer's
//! concern; this client asks for a complete response.

use std::time::Duration;

use anyhow::{anyhow, bail, Result};

use crate::config::LlmConfig;
use crate::models::Message;

pub struct LlmClient {
    url: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            client,
        })
    }

    /// Complete the conversation and return the assistant message content.
    pub async fn complete(&self, messages: &[Message]) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
            "options": { "temperature": self.temperature },
        });

        let response = self
            .client
            .post(format!("{}/api/chat", self.url))
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("LLM connection error (is Ollama running at {}?): {}", self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("LLM API error {}: {}", status, body_text);
        }

        let json: serde_json::Value = response.json().await?;
        json.pointer("/message/content")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("Invalid LLM response: missing message content"))
    }
}
