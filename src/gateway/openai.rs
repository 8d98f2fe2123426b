//! OpenAI chat-completions adapter.
//!
//! Uses the JSON-object response format so the model is constrained to emit
//! a single JSON document, and temperature 0 so extraction is deterministic.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{http_client, transport_error, LlmGateway, Provider};
use crate::error::DocGleanError;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Instructing the model at the system level backs up the per-prompt
/// "only the JSON output" instruction; both are needed in practice.
const SYSTEM_MESSAGE: &str = "You are a helpful assistant designed to output JSON.";

#[derive(Debug)]
pub struct OpenAiGateway {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiGateway {
    pub(crate) fn new(
        api_key: &str,
        model: String,
        timeout: Duration,
    ) -> Result<Self, DocGleanError> {
        Ok(Self {
            client: http_client(Provider::OpenAi, timeout)?,
            api_key: api_key.to_string(),
            model,
        })
    }

    fn provider_error(detail: impl Into<String>) -> DocGleanError {
        DocGleanError::Provider {
            provider: Provider::OpenAi.as_str().to_string(),
            detail: detail.into(),
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn send(&self, prompt: &str) -> Result<String, DocGleanError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_MESSAGE },
                { "role": "user", "content": prompt }
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.0
        });

        debug!("Sending {} chars to OpenAI model {}", prompt.len(), self.model);

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(Provider::OpenAi, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::provider_error(format!("HTTP {status}: {text}")));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| Self::provider_error(format!("invalid completion envelope: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Self::provider_error("completion contained no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_decodes_first_choice_content() {
        let raw = r#"{"choices":[{"message":{"content":"{\"a\":1}"}}]}"#;
        let completion: ChatCompletion = serde_json::from_str(raw).unwrap();
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap();
        assert_eq!(content, "{\"a\":1}");
    }

    #[test]
    fn envelope_tolerates_missing_content() {
        let raw = r#"{"choices":[{"message":{}}]}"#;
        let completion: ChatCompletion = serde_json::from_str(raw).unwrap();
        assert!(completion.choices[0].message.content.is_none());
    }
}
