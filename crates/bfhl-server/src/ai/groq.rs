//! Groq chat-completion client (OpenAI-compatible API).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::AiConfig;

use super::{single_word, AiError, AiProvider, SYSTEM_INSTRUCTION};

const MAX_TOKENS: u32 = 10;

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    config: AiConfig,
}

impl GroqClient {
    pub fn new(config: AiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request_body(&self, question: &str) -> Value {
        json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_INSTRUCTION },
                { "role": "user", "content": question }
            ],
            "temperature": 0,
            "max_tokens": MAX_TOKENS,
        })
    }
}

#[async_trait]
impl AiProvider for GroqClient {
    fn name(&self) -> &'static str {
        "groq"
    }

    async fn ask(&self, question: &str) -> Result<String, AiError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AiError::NotConfigured)?;

        tracing::debug!("Groq request: model={}", self.config.model);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&self.request_body(question))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| AiError::Malformed(e.to_string()))?;

        let content = raw["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AiError::Malformed("no content in response".to_string()))?;

        Ok(single_word(content))
    }
}
