//! # docglean
//!
//! Extract structured data from scanned and digital documents using
//! LLM-assisted analysis.
//!
//! ## Why this crate?
//!
//! Invoices, contracts, and forms arrive as images and PDFs with wildly
//! inconsistent layouts. Template-based extractors break on every new
//! vendor. Instead this crate recovers the raw text (reading the selectable
//! text layer when one exists, falling back to OCR when it doesn't), picks
//! a category-specific extraction prompt, and lets a language model return
//! the fields as a JSON record — then partitions that record into
//! display-ready groups.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Document (PNG / JPEG / PDF)
//!  │
//!  ├─ 1. Extract    text layer per page, OCR fallback (CPU-bound, spawn_blocking)
//!  ├─ 2. Classify   keyword rules → invoice / contract / form / general
//!  ├─ 3. Prompt     category template + schema + verbatim document text
//!  ├─ 4. Gateway    deterministic JSON-mode call to OpenAI or Gemini
//!  ├─ 5. Parse      response must be a single JSON object
//!  └─ 6. Transform  main fields + item rows + summary (DisplayBundle)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docglean::{analyze, AnalysisConfig, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::builder()
//!         .provider(Provider::Gemini)
//!         .api_key(std::env::var("GOOGLE_API_KEY")?)
//!         .build()?;
//!
//!     let output = analyze("invoice.pdf", &config).await?;
//!     match output.analysis {
//!         Some(analysis) => {
//!             println!("category: {}", analysis.category);
//!             println!("summary:  {}", analysis.bundle.summary_text);
//!         }
//!         None => println!("document contained no extractable text"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docglean` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docglean = { version = "0.3", default-features = false }
//! ```
//!
//! ## External engines
//!
//! Recognition uses the system `tesseract` binary by default (swap in any
//! [`pipeline::ocr::OcrEngine`] implementation via the config). PDF text
//! layers and page rasterisation use pdfium. The language-model call is the
//! only network I/O; this crate does not retry it — wrap the gateway if you
//! need backoff, and treat configuration errors as non-retryable.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod classify;
pub mod config;
pub mod error;
pub mod gateway;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod report;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, analyze_sync};
pub use classify::{classify, DocumentCategory};
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use error::DocGleanError;
pub use gateway::{LlmGateway, Provider};
pub use output::{
    AnalysisOutput, AnalysisStats, DisplayBundle, DocumentAnalysis, ExtractedRecord,
    ExtractionMethod, ExtractionResult, PageText,
};
pub use pipeline::extract::{Document, MediaKind};
pub use pipeline::ocr::{OcrEngine, OcrError, TesseractOcr};
pub use pipeline::parse::parse_record;
pub use pipeline::transform::{flatten, transform};
pub use prompts::build_prompt;
pub use report::build_report;
