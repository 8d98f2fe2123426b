//! Configuration for document analysis.
//!
//! All pipeline behaviour is controlled through [`AnalysisConfig`], built
//! via its [`AnalysisConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across calls and to see in one place what a
//! run will do.
//!
//! # Design choice: builder over constructor
//! A many-field constructor breaks on every new field. The builder lets
//! callers set only what they care about and rely on documented defaults
//! for the rest.

use crate::error::DocGleanError;
use crate::gateway::{LlmGateway, Provider};
use crate::pipeline::ocr::{OcrEngine, TesseractOcr};
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Configuration for one or more document analyses.
///
/// Built via [`AnalysisConfig::builder()`] or [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use docglean::{AnalysisConfig, Provider};
///
/// let config = AnalysisConfig::builder()
///     .provider(Provider::Gemini)
///     .api_key("sk-...")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Which language-model provider to call. Default: [`Provider::Gemini`].
    pub provider: Provider,

    /// API key for the provider. Checked for emptiness before any network
    /// call; an empty key fails with
    /// [`DocGleanError::Configuration`](crate::error::DocGleanError::Configuration).
    pub api_key: String,

    /// Model identifier override. If `None`, the provider's default is used.
    pub model: Option<String>,

    /// Per-provider-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Maximum rendered page dimension (width or height) in pixels when a
    /// page is rasterised for recognition. Default: 2000.
    ///
    /// A safety cap independent of page size: an A0 poster rendered without
    /// a cap could produce a five-figure-pixel image and exhaust memory.
    pub max_render_pixels: u32,

    /// Recognition engine used for image inputs and text-layer fallback.
    /// Default: [`TesseractOcr`] via the system binary.
    pub ocr: Arc<dyn OcrEngine>,

    /// Pre-constructed gateway. Takes precedence over `provider`/`api_key`;
    /// useful in tests or when the caller wraps the gateway with its own
    /// retry/timeout middleware.
    pub gateway: Option<Arc<dyn LlmGateway>>,

    /// Cooperative cancellation flag, checked between pipeline stages
    /// (never mid-call — the underlying engines are opaque).
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            api_key: String::new(),
            model: None,
            api_timeout_secs: 60,
            max_render_pixels: 2000,
            ocr: Arc::new(TesseractOcr::default()),
            gateway: None,
            cancel: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("provider", &self.provider)
            .field("api_key", &if self.api_key.is_empty() { "<empty>" } else { "<set>" })
            .field("model", &self.model)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("max_render_pixels", &self.max_render_pixels)
            .field("ocr", &"<dyn OcrEngine>")
            .field("gateway", &self.gateway.as_ref().map(|_| "<dyn LlmGateway>"))
            .field("cancel", &self.cancel.is_some())
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn provider(mut self, provider: Provider) -> Self {
        self.config.provider = provider;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn max_render_pixels(mut self, px: u32) -> Self {
        self.config.max_render_pixels = px.max(100);
        self
    }

    pub fn ocr(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.ocr = engine;
        self
    }

    pub fn gateway(mut self, gateway: Arc<dyn LlmGateway>) -> Self {
        self.config.gateway = Some(gateway);
        self
    }

    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.config.cancel = Some(flag);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, DocGleanError> {
        let c = &self.config;
        if c.api_timeout_secs == 0 {
            return Err(DocGleanError::Configuration(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AnalysisConfig::default();
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.api_timeout_secs, 60);
        assert_eq!(config.max_render_pixels, 2000);
        assert!(config.gateway.is_none());
        assert!(config.cancel.is_none());
    }

    #[test]
    fn builder_clamps_degenerate_values() {
        let config = AnalysisConfig::builder()
            .api_timeout_secs(0)
            .max_render_pixels(1)
            .build()
            .unwrap();
        assert_eq!(config.api_timeout_secs, 1);
        assert_eq!(config.max_render_pixels, 100);
    }

    #[test]
    fn debug_never_prints_the_api_key() {
        let config = AnalysisConfig::builder().api_key("sk-secret").build().unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"), "got: {rendered}");
    }
}
