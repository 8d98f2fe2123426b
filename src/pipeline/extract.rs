//! Text extraction: direct text layer first, recognition fallback per page.
//!
//! ## Why spawn_blocking?
//!
//! pdfium wraps a C++ library with thread-local state and Tesseract runs as
//! a subprocess; both are blocking, CPU-bound work. `tokio::task::spawn_blocking`
//! moves the whole per-document walk onto the blocking pool so the async
//! workers never stall. Pages are walked in order inside one blocking
//! region — pdfium is not safe to drive from multiple threads, and the
//! in-order walk makes the page-order guarantee trivial.
//!
//! ## Fallback policy
//!
//! Per PDF page: read the selectable text layer first; only when that text
//! is empty or whitespace-only is the page rasterised and handed to the
//! recognition engine. Pure image inputs have no text layer, so recognition
//! is their only path. A failure on any page aborts extraction for the whole
//! document — no partial text is ever returned.

use crate::config::AnalysisConfig;
use crate::error::DocGleanError;
use crate::output::{ExtractionMethod, ExtractionResult, PageText};
use crate::pipeline::ocr::OcrEngine;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Detected media kind of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Raster image (png, jpg, jpeg). Always a single page.
    Image,
    /// Paginated document (pdf).
    Pdf,
}

impl MediaKind {
    /// Detect the media kind from a file extension, rejecting anything
    /// outside the supported set before extraction begins.
    pub fn from_path(path: &Path) -> Result<Self, DocGleanError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "png" | "jpg" | "jpeg" => Ok(MediaKind::Image),
            "pdf" => Ok(MediaKind::Pdf),
            _ => Err(DocGleanError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    format!(".{extension}")
                },
            }),
        }
    }
}

/// One input file, validated and ready for extraction.
///
/// Immutable once opened; owned exclusively by the pipeline invocation that
/// created it.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    kind: MediaKind,
    page_count: usize,
}

impl Document {
    /// Validate the path and detect the media kind.
    ///
    /// For paginated documents the page count is read up front (without
    /// rendering anything) so callers can size progress reporting.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DocGleanError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(DocGleanError::FileNotFound { path });
        }
        let kind = MediaKind::from_path(&path)?;

        let page_count = match kind {
            MediaKind::Image => 1,
            MediaKind::Pdf => {
                let p = path.clone();
                tokio::task::spawn_blocking(move || count_pdf_pages(&p))
                    .await
                    .map_err(|e| DocGleanError::Internal(format!("page-count task panicked: {e}")))??
            }
        };

        debug!("Opened {} ({:?}, {} pages)", path.display(), kind, page_count);
        Ok(Self {
            path,
            kind,
            page_count,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// ≥ 1 for paginated documents, exactly 1 for images.
    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

/// Extract raw text from a document, page by page.
///
/// Returns a valid (possibly all-blank) [`ExtractionResult`]; a blank
/// result means "nothing to analyse", not failure. Engine failures abort
/// the whole document with [`DocGleanError::Extraction`].
pub async fn extract(
    document: &Document,
    config: &AnalysisConfig,
) -> Result<ExtractionResult, DocGleanError> {
    let path = document.path.clone();
    let ocr = Arc::clone(&config.ocr);
    let max_pixels = config.max_render_pixels;

    let pages = match document.kind {
        MediaKind::Image => {
            tokio::task::spawn_blocking(move || extract_image_blocking(&path, ocr.as_ref()))
        }
        MediaKind::Pdf => tokio::task::spawn_blocking(move || {
            extract_pdf_blocking(&path, ocr.as_ref(), max_pixels)
        }),
    }
    .await
    .map_err(|e| DocGleanError::Internal(format!("extraction task panicked: {e}")))??;

    let result = ExtractionResult { pages };
    info!(
        "Extracted {} pages ({} via recognition) from {}",
        result.pages.len(),
        result.ocr_pages(),
        document.path.display()
    );
    Ok(result)
}

/// Pure images have no text layer: recognition is the only path.
fn extract_image_blocking(
    path: &Path,
    ocr: &dyn OcrEngine,
) -> Result<Vec<PageText>, DocGleanError> {
    let text = ocr
        .recognize(path)
        .map_err(|e| DocGleanError::extraction(path, e))?;
    Ok(vec![PageText {
        page: 1,
        text,
        method: ExtractionMethod::Ocr,
    }])
}

/// Walk every PDF page in order: text layer first, recognition fallback.
fn extract_pdf_blocking(
    path: &Path,
    ocr: &dyn OcrEngine,
    max_pixels: u32,
) -> Result<Vec<PageText>, DocGleanError> {
    let pdfium = bind_pdfium(path)?;
    let doc = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| DocGleanError::extraction(path, format!("failed to open PDF: {e:?}")))?;

    let pages = doc.pages();
    let total = pages.len();
    let mut out = Vec::with_capacity(total as usize);

    // Scratch directory for rasterised pages handed to the OCR engine.
    // Dropped (and cleaned up) when extraction returns, even on error.
    let scratch = tempfile::tempdir()
        .map_err(|e| DocGleanError::extraction(path, format!("scratch dir creation failed: {e}")))?;

    for index in 0..total {
        let page = pages
            .get(index)
            .map_err(|e| DocGleanError::extraction(path, format!("page {} access failed: {e:?}", index + 1)))?;

        let direct = page
            .text()
            .map(|t| t.all())
            .map_err(|e| DocGleanError::extraction(path, format!("page {} text read failed: {e:?}", index + 1)))?;

        if !needs_recognition(&direct) {
            out.push(PageText {
                page: index as usize + 1,
                text: direct,
                method: ExtractionMethod::Direct,
            });
            continue;
        }

        debug!("Page {} has no text layer, falling back to recognition", index + 1);

        let png_path = scratch.path().join(format!("page-{:04}.png", index + 1));
        render_page_to_png(&page, index, max_pixels, &png_path, path)?;

        let text = ocr
            .recognize(&png_path)
            .map_err(|e| DocGleanError::extraction(path, format!("page {}: {e}", index + 1)))?;

        out.push(PageText {
            page: index as usize + 1,
            text,
            method: ExtractionMethod::Ocr,
        });
    }

    Ok(out)
}

/// The fallback gate: a page goes to the recognition engine only when its
/// text layer is empty or whitespace-only. Pages with any selectable text
/// never touch the raster path.
fn needs_recognition(direct_text: &str) -> bool {
    direct_text.trim().is_empty()
}

/// Rasterise one page and write it as PNG for the recognition engine.
///
/// PNG over JPEG: lossless compression keeps rendered glyph edges crisp,
/// which recognition accuracy depends on at moderate resolutions.
fn render_page_to_png(
    page: &PdfPage,
    index: u16,
    max_pixels: u32,
    png_path: &Path,
    doc_path: &Path,
) -> Result<(), DocGleanError> {
    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let bitmap = page.render_with_config(&render_config).map_err(|e| {
        DocGleanError::extraction(doc_path, format!("page {} render failed: {e:?}", index + 1))
    })?;

    let image = bitmap.as_image();
    debug!(
        "Rendered page {} → {}x{} px",
        index + 1,
        image.width(),
        image.height()
    );

    image
        .save_with_format(png_path, image::ImageFormat::Png)
        .map_err(|e| {
            DocGleanError::extraction(doc_path, format!("page {} PNG encode failed: {e}", index + 1))
        })
}

fn bind_pdfium(path: &Path) -> Result<Pdfium, DocGleanError> {
    Ok(Pdfium::new(Pdfium::bind_to_system_library().map_err(
        |e| DocGleanError::extraction(path, format!("pdfium bind failed: {e}")),
    )?))
}

fn count_pdf_pages(path: &Path) -> Result<usize, DocGleanError> {
    let pdfium = bind_pdfium(path)?;
    let doc = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| DocGleanError::extraction(path, format!("failed to open PDF: {e:?}")))?;
    Ok(doc.pages().len() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_accepts_supported_extensions() {
        assert_eq!(
            MediaKind::from_path(Path::new("scan.PNG")).unwrap(),
            MediaKind::Image
        );
        assert_eq!(
            MediaKind::from_path(Path::new("photo.jpeg")).unwrap(),
            MediaKind::Image
        );
        assert_eq!(
            MediaKind::from_path(Path::new("doc.pdf")).unwrap(),
            MediaKind::Pdf
        );
    }

    #[test]
    fn pages_with_any_selectable_text_skip_recognition() {
        assert!(!needs_recognition("Total: $5"));
        assert!(!needs_recognition("  x  "));
        assert!(needs_recognition(""));
        assert!(needs_recognition("  \n\t "));
    }

    #[test]
    fn media_kind_rejects_everything_else() {
        let err = MediaKind::from_path(Path::new("report.docx")).unwrap_err();
        assert!(matches!(err, DocGleanError::UnsupportedFormat { .. }), "got: {err}");

        let err = MediaKind::from_path(Path::new("no_extension")).unwrap_err();
        assert!(err.to_string().contains("(none)"), "got: {err}");
    }

    #[tokio::test]
    async fn open_missing_file_is_file_not_found() {
        let err = Document::open("/definitely/not/here.png").await.unwrap_err();
        assert!(matches!(err, DocGleanError::FileNotFound { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn open_unsupported_extension_is_rejected_before_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        let err = Document::open(&path).await.unwrap_err();
        assert!(matches!(err, DocGleanError::UnsupportedFormat { .. }), "got: {err}");
    }
}
