//! Output types produced by the analysis pipeline.
//!
//! Each stage's output is the next stage's sole input, so the whole data
//! contract lives in one place:
//!
//! * [`ExtractionResult`] — per-page raw text with the method that produced it
//! * [`ExtractedRecord`] — the object-rooted JSON mapping parsed from the
//!   provider response
//! * [`DisplayBundle`] — the three-way split (main fields / item rows /
//!   summary) consumed by rendering surfaces
//! * [`AnalysisOutput`] — the pipeline's final result with timing stats
//!
//! No entity here is shared across concurrent analyses; every pipeline
//! invocation owns its own copies.

use serde::{Deserialize, Serialize};

use crate::classify::DocumentCategory;

/// How the text of one page was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// A selectable text layer existed and was read directly.
    Direct,
    /// The page was rasterised and run through optical character recognition.
    Ocr,
}

/// The extracted text of a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub page: usize,
    /// Raw text as the engine produced it. May be empty.
    pub text: String,
    /// Which path produced the text.
    pub method: ExtractionMethod,
}

/// Raw text recovered from a document, in page order.
///
/// An all-blank result is a valid terminal state ("nothing to analyse"),
/// not an error — extraction *failure* is reported through
/// [`crate::error::DocGleanError::Extraction`] instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Per-page text, ordered by page number.
    pub pages: Vec<PageText>,
}

impl ExtractionResult {
    /// Ordered concatenation of all page text.
    ///
    /// No reordering, deduplication, or whitespace normalisation is applied
    /// beyond what the underlying engines produced.
    pub fn text(&self) -> String {
        self.pages.iter().map(|p| p.text.as_str()).collect()
    }

    /// True when every page yielded empty or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.text.trim().is_empty())
    }

    /// Number of pages that needed the recognition fallback.
    pub fn ocr_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.method == ExtractionMethod::Ocr)
            .count()
    }
}

/// The structured record parsed from a provider response.
///
/// Values are whatever the model returned: strings, numbers, null, an
/// ordered sequence of nested mappings (for `items`), or nested strings.
/// No schema is enforced beyond object-rootedness — unexpected, missing,
/// or extra fields relative to the requested schema are accepted as-is.
pub type ExtractedRecord = serde_json::Map<String, serde_json::Value>;

/// Display-ready partition of an [`ExtractedRecord`].
///
/// Produced by [`crate::pipeline::transform::transform`]; recomputed fresh
/// per record and never merged across documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayBundle {
    /// Every top-level key except `items` and the summary-role keys,
    /// with its native JSON value.
    pub main_fields: ExtractedRecord,
    /// Line items in input order. Empty when `items` is absent, empty,
    /// or irregularly shaped.
    pub item_rows: Vec<ExtractedRecord>,
    /// The chosen summary string (may be empty when the record carries none).
    pub summary_text: String,
}

/// The LLM-backed half of an analysis: present only when extraction
/// yielded non-blank text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    /// Category that selected the extraction template.
    pub category: DocumentCategory,
    /// The parsed provider output, untouched.
    pub record: ExtractedRecord,
    /// The display partition of `record`.
    pub bundle: DisplayBundle,
}

/// Wall-clock and page accounting for one pipeline invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages read from a selectable text layer.
    pub direct_pages: usize,
    /// Pages that went through the recognition fallback.
    pub ocr_pages: usize,
    /// Time spent in text extraction.
    pub extract_duration_ms: u64,
    /// Time spent waiting on the language-model provider (0 when skipped).
    pub llm_duration_ms: u64,
    /// End-to-end pipeline time.
    pub total_duration_ms: u64,
}

/// Final result of [`crate::analyze::analyze`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// Raw per-page extraction, always present.
    pub extraction: ExtractionResult,
    /// Classification, record, and display bundle — `None` when the
    /// document yielded no text (a valid outcome, not an error).
    pub analysis: Option<DocumentAnalysis>,
    /// Timing and page accounting.
    pub stats: AnalysisStats,
}
