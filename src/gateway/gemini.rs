//! Google Gemini generateContent adapter.
//!
//! Requests `application/json` as the response MIME type so the model emits
//! bare JSON rather than prose, and temperature 0 for deterministic
//! extraction. The API key travels in the `x-goog-api-key` header instead
//! of the query string so it never lands in request logs.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{http_client, transport_error, LlmGateway, Provider};
use crate::error::DocGleanError;

const GENERATE_CONTENT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug)]
pub struct GeminiGateway {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiGateway {
    pub(crate) fn new(
        api_key: &str,
        model: String,
        timeout: Duration,
    ) -> Result<Self, DocGleanError> {
        Ok(Self {
            client: http_client(Provider::Gemini, timeout)?,
            api_key: api_key.to_string(),
            model,
        })
    }

    fn provider_error(detail: impl Into<String>) -> DocGleanError {
        DocGleanError::Provider {
            provider: Provider::Gemini.as_str().to_string(),
            detail: detail.into(),
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    async fn send(&self, prompt: &str) -> Result<String, DocGleanError> {
        let url = format!("{GENERATE_CONTENT_BASE}/{}:generateContent", self.model);
        let body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "temperature": 0.0
            }
        });

        debug!("Sending {} chars to Gemini model {}", prompt.len(), self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(Provider::Gemini, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::provider_error(format!("HTTP {status}: {text}")));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Self::provider_error(format!("invalid response envelope: {e}")))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Self::provider_error(
                "response contained no candidate text (possibly blocked)".to_string(),
            ));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_joins_candidate_parts() {
        let raw = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "{\"a\":" }, { "text": "1}" } ] } }
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap();
        assert_eq!(text, "{\"a\":1}");
    }

    #[test]
    fn envelope_tolerates_empty_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
