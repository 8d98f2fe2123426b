//! Error types for the docglean library.
//!
//! Every pipeline stage either returns a valid typed result or fails with
//! exactly one [`DocGleanError`] variant — no stage silently substitutes
//! default data for a hard failure. The one deliberate exception is the
//! display transformer's handling of an irregular `items` shape, which
//! degrades to empty item rows with a `tracing::warn!` instead of erroring,
//! because a malformed line-item table should not destroy an otherwise
//! usable analysis.
//!
//! Callers can distinguish "no text could be extracted" (a valid empty
//! [`crate::output::ExtractionResult`], not an error) from "extraction
//! failed" (an [`DocGleanError::Extraction`] error).

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the docglean library.
#[derive(Debug, Error)]
pub enum DocGleanError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The file extension is outside the supported media set.
    #[error("Unsupported document format '{extension}' for '{path}'\nSupported: .png, .jpg, .jpeg, .pdf")]
    UnsupportedFormat { path: PathBuf, extension: String },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The text-layer or OCR engine failed for this document.
    ///
    /// Extraction is all-or-nothing: a failed page aborts the whole
    /// document rather than returning partial text.
    #[error("Text extraction failed for '{path}': {detail}")]
    Extraction { path: PathBuf, detail: String },

    // ── Gateway errors ────────────────────────────────────────────────────
    /// Missing or invalid credentials/provider selection, detected before
    /// any network call is made.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The language-model provider call failed (network, auth, quota).
    ///
    /// This layer does not retry; the caller owns retry policy and must
    /// treat authentication failures as non-retryable.
    #[error("LLM provider '{provider}' request failed: {detail}")]
    Provider { provider: String, detail: String },

    /// The provider's output could not be decoded as a single JSON object.
    ///
    /// The raw response text is attached for diagnosis.
    #[error("Provider response is not a JSON object: {detail}\nRaw response:\n{raw}")]
    MalformedResponse { detail: String, raw: String },

    // ── Control flow ──────────────────────────────────────────────────────
    /// The caller's cancellation flag was observed between stages.
    #[error("Analysis cancelled")]
    Cancelled,

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocGleanError {
    /// Build an [`DocGleanError::Extraction`] from any displayable engine failure.
    pub(crate) fn extraction(path: impl Into<PathBuf>, detail: impl std::fmt::Display) -> Self {
        DocGleanError::Extraction {
            path: path.into(),
            detail: detail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_display_lists_supported_set() {
        let e = DocGleanError::UnsupportedFormat {
            path: PathBuf::from("/tmp/report.docx"),
            extension: ".docx".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains(".docx"), "got: {msg}");
        assert!(msg.contains(".pdf"), "got: {msg}");
    }

    #[test]
    fn provider_display_names_provider() {
        let e = DocGleanError::Provider {
            provider: "gemini".into(),
            detail: "HTTP 429".into(),
        };
        assert!(e.to_string().contains("gemini"));
        assert!(e.to_string().contains("429"));
    }

    #[test]
    fn malformed_response_display_attaches_raw() {
        let e = DocGleanError::MalformedResponse {
            detail: "expected a JSON object, got array".into(),
            raw: "[1,2,3]".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("[1,2,3]"), "raw response must be attached: {msg}");
    }

    #[test]
    fn extraction_helper_keeps_path() {
        let e = DocGleanError::extraction("/tmp/scan.pdf", "page 3 decode failed");
        assert!(e.to_string().contains("/tmp/scan.pdf"));
        assert!(e.to_string().contains("page 3"));
    }
}
