//! Top-level pipeline orchestration.
//!
//! One call runs the whole chain: open → extract → classify → prompt →
//! provider → parse → transform. The pipeline is synchronous per document —
//! each stage fully completes before the next starts — and every invocation
//! owns its Document, ExtractionResult, record, and bundle exclusively, so
//! concurrent analyses of different documents never share state.
//!
//! Cancellation is cooperative: the optional flag in
//! [`AnalysisConfig::cancel`] is checked between stages, never mid-call,
//! because the underlying engines are opaque black boxes.

use crate::classify::classify;
use crate::config::AnalysisConfig;
use crate::error::DocGleanError;
use crate::gateway::LlmGateway;
use crate::output::{AnalysisOutput, AnalysisStats, DocumentAnalysis};
use crate::pipeline::extract::{extract, Document};
use crate::pipeline::parse::parse_record;
use crate::pipeline::transform::transform;
use crate::prompts::build_prompt;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Analyse a document end-to-end.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input`  — Path to a PNG, JPEG, or PDF file
/// * `config` — Analysis configuration
///
/// # Returns
/// `Ok(AnalysisOutput)` with `analysis: None` when the document yielded no
/// text (a valid terminal state — no provider call is made), or with the
/// full classification/record/bundle otherwise.
///
/// # Errors
/// Returns `Err(DocGleanError)` for hard failures only: unsupported or
/// missing input, engine failure, missing credentials, provider failure, or
/// an undecodable provider response.
pub async fn analyze(
    input: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, DocGleanError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    info!("Starting analysis: {}", input.display());

    // ── Step 1: Open the document ────────────────────────────────────────
    let document = Document::open(input).await?;
    check_cancelled(config)?;

    // ── Step 2: Extract raw text ─────────────────────────────────────────
    let extract_start = Instant::now();
    let extraction = extract(&document, config).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    check_cancelled(config)?;

    let mut stats = AnalysisStats {
        total_pages: extraction.pages.len(),
        ocr_pages: extraction.ocr_pages(),
        direct_pages: extraction.pages.len() - extraction.ocr_pages(),
        extract_duration_ms,
        llm_duration_ms: 0,
        total_duration_ms: 0,
    };

    if extraction.is_blank() {
        info!("No text extracted; skipping analysis");
        stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
        return Ok(AnalysisOutput {
            extraction,
            analysis: None,
            stats,
        });
    }

    // ── Step 3: Classify and build the prompt ────────────────────────────
    let raw_text = extraction.text();
    let category = classify(&raw_text);
    debug!("Classified as '{category}' ({} chars of text)", raw_text.len());
    let prompt = build_prompt(category, &raw_text);
    check_cancelled(config)?;

    // ── Step 4: Send to the provider ─────────────────────────────────────
    // The gateway is resolved only now: a blank document must not fail on
    // missing credentials it never needed.
    let gateway = resolve_gateway(config)?;
    let llm_start = Instant::now();
    let response_text = gateway.send(&prompt).await?;
    stats.llm_duration_ms = llm_start.elapsed().as_millis() as u64;
    check_cancelled(config)?;

    // ── Step 5: Parse and partition ──────────────────────────────────────
    let record = parse_record(&response_text)?;
    let bundle = transform(&record);

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Analysis complete: {} pages, category '{}', {} main fields, {} item rows, {}ms",
        stats.total_pages,
        category,
        bundle.main_fields.len(),
        bundle.item_rows.len(),
        stats.total_duration_ms
    );

    Ok(AnalysisOutput {
        extraction,
        analysis: Some(DocumentAnalysis {
            category,
            record,
            bundle,
        }),
        stats,
    })
}

/// Synchronous wrapper around [`analyze`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_sync(
    input: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, DocGleanError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DocGleanError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(analyze(input, config))
}

/// Resolve the gateway: a caller-provided instance wins, otherwise the
/// configured provider builds one (failing fast on an empty API key).
fn resolve_gateway(config: &AnalysisConfig) -> Result<Arc<dyn LlmGateway>, DocGleanError> {
    if let Some(ref gateway) = config.gateway {
        return Ok(Arc::clone(gateway));
    }
    config
        .provider
        .gateway(&config.api_key, config.model.as_deref(), config.api_timeout_secs)
}

fn check_cancelled(config: &AnalysisConfig) -> Result<(), DocGleanError> {
    match &config.cancel {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(DocGleanError::Cancelled),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_gateway_and_empty_key_is_a_configuration_error() {
        let config = AnalysisConfig::default();
        let err = resolve_gateway(&config).unwrap_err();
        assert!(matches!(err, DocGleanError::Configuration(_)), "got: {err}");
    }

    #[test]
    fn cancellation_flag_is_observed() {
        use std::sync::atomic::AtomicBool;
        use std::sync::Arc;

        let flag = Arc::new(AtomicBool::new(true));
        let config = AnalysisConfig::builder()
            .cancel_flag(Arc::clone(&flag))
            .build()
            .unwrap();
        assert!(matches!(
            check_cancelled(&config),
            Err(DocGleanError::Cancelled)
        ));

        flag.store(false, Ordering::Relaxed);
        assert!(check_cancelled(&config).is_ok());
    }
}
