use async_trait::async_trait;
use tracing::debug;

use warden_core::{ChatMessage, Result, WardenError};

use crate::provider::Proposer;

/// OpenAI-compatible chat completions provider (works with OpenAI, Azure,
/// Together, vLLM, …).
pub struct OpenAiProposer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiProposer {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: "https://api.openai.com/v1".into(),
            model,
        }
    }

    /// Use a custom base URL (for Azure, Together, a local server, …).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl Proposer for OpenAiProposer {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = serde_json::json!({
            "model": &self.model,
            "messages": messages,
            "temperature": 1.0,
        });

        debug!(model = %self.model, turns = messages.len(), "proposer request");

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| WardenError::Proposer(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(WardenError::Proposer(format!("HTTP {status}: {text}")));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| WardenError::Proposer(format!("invalid response body: {e}")))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WardenError::Proposer("response carried no message content".into()))
    }
}
