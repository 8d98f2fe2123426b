//! Language-model gateway: one capability interface, one adapter per provider.
//!
//! The pipeline only ever sees `send(prompt) -> text`. Provider-specific
//! request and response shapes stay inside their adapters, selected by a
//! configuration-time factory, so swapping or adding a provider never
//! touches the pipeline.
//!
//! This layer deliberately does **not** retry, rate-limit, or cache.
//! Transient-failure policy belongs to the caller, who must also treat
//! authentication and configuration failures as non-retryable.

mod gemini;
mod openai;

pub use gemini::GeminiGateway;
pub use openai::OpenAiGateway;

use crate::error::DocGleanError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// The closed set of supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Gemini,
}

impl Provider {
    /// Lowercase name used in errors, logs, and the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }

    /// The model used when the caller does not name one.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-3.5-turbo-0125",
            Provider::Gemini => "gemini-1.5-flash",
        }
    }

    /// Build the gateway for this provider.
    ///
    /// Fails with [`DocGleanError::Configuration`] when `api_key` is empty —
    /// before any HTTP client is constructed or network call attempted.
    pub fn gateway(
        &self,
        api_key: &str,
        model: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Arc<dyn LlmGateway>, DocGleanError> {
        if api_key.trim().is_empty() {
            return Err(DocGleanError::Configuration(format!(
                "API key is missing for LLM provider '{}'",
                self.as_str()
            )));
        }
        let model = model.unwrap_or(self.default_model()).to_string();
        let timeout = Duration::from_secs(timeout_secs);
        Ok(match self {
            Provider::OpenAi => Arc::new(OpenAiGateway::new(api_key, model, timeout)?),
            Provider::Gemini => Arc::new(GeminiGateway::new(api_key, model, timeout)?),
        })
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = DocGleanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "gemini" => Ok(Provider::Gemini),
            other => Err(DocGleanError::Configuration(format!(
                "Unsupported LLM provider '{other}'. Choose 'openai' or 'gemini'."
            ))),
        }
    }
}

/// A configured provider connection.
///
/// Implementations enforce deterministic generation (temperature 0) and
/// request structured-object output where the provider supports it, so that
/// the same document and prompt produce the same record.
#[async_trait]
pub trait LlmGateway: Send + Sync + std::fmt::Debug {
    /// Send a prompt and return the provider's raw text output.
    async fn send(&self, prompt: &str) -> Result<String, DocGleanError>;
}

/// Map a reqwest transport failure to a [`DocGleanError::Provider`].
pub(crate) fn transport_error(provider: Provider, e: reqwest::Error) -> DocGleanError {
    let detail = if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    };
    DocGleanError::Provider {
        provider: provider.as_str().to_string(),
        detail,
    }
}

/// Build a reqwest client with the gateway timeout applied.
pub(crate) fn http_client(
    provider: Provider,
    timeout: Duration,
) -> Result<reqwest::Client, DocGleanError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DocGleanError::Provider {
            provider: provider.as_str().to_string(),
            detail: format!("failed to build HTTP client: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("Gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!(" GEMINI ".parse::<Provider>().unwrap(), Provider::Gemini);
    }

    #[test]
    fn unknown_provider_is_a_configuration_error() {
        let err = "claude".parse::<Provider>().unwrap_err();
        assert!(matches!(err, DocGleanError::Configuration(_)), "got: {err}");
        assert!(err.to_string().contains("claude"));
    }

    #[test]
    fn empty_api_key_fails_before_any_client_exists() {
        for provider in [Provider::OpenAi, Provider::Gemini] {
            let err = provider.gateway("", None, 60).unwrap_err();
            assert!(matches!(err, DocGleanError::Configuration(_)), "got: {err}");
            assert!(err.to_string().contains(provider.as_str()));
        }
    }

    #[test]
    fn whitespace_api_key_counts_as_missing() {
        let err = Provider::Gemini.gateway("   ", None, 60).unwrap_err();
        assert!(matches!(err, DocGleanError::Configuration(_)));
    }

    #[test]
    fn default_models_per_provider() {
        assert_eq!(Provider::OpenAi.default_model(), "gpt-3.5-turbo-0125");
        assert_eq!(Provider::Gemini.default_model(), "gemini-1.5-flash");
    }

    #[test]
    fn non_empty_key_builds_a_gateway() {
        let gateway = Provider::OpenAi.gateway("sk-test", Some("gpt-4o-mini"), 30);
        assert!(gateway.is_ok());
    }
}
