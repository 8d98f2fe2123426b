//! Optical character recognition port and the default Tesseract adapter.
//!
//! The recognition engine is an external collaborator with a one-method
//! contract: given a raster image on disk, return the recognised text
//! (possibly empty). Putting a trait at this seam keeps the extraction
//! pipeline testable without a system Tesseract install and leaves room
//! for hosted OCR adapters later.
//!
//! The default adapter shells out to the `tesseract` binary rather than
//! binding libtesseract: the subprocess boundary isolates the pipeline
//! from C++ crashes and avoids a build-time dependency on leptonica.

use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// Failures from a recognition engine.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The engine is not installed or not on PATH.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// The engine ran but failed to produce text.
    #[error("OCR failed: {0}")]
    Failed(String),
}

/// A recognition engine that can read text out of a raster image.
///
/// `recognize` is synchronous and CPU-bound; callers are expected to invoke
/// it from a blocking context (`tokio::task::spawn_blocking`).
pub trait OcrEngine: Send + Sync {
    /// Recognise the text in the image at `image`. An empty string is a
    /// valid result (a blank page), not an error.
    fn recognize(&self, image: &Path) -> Result<String, OcrError>;
}

/// Recognition via the system `tesseract` binary.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    /// Binary name or path. Overridable for tests and custom installs.
    pub binary: String,
    /// Tesseract language code, e.g. "eng".
    pub lang: String,
    /// Page segmentation mode. 1 = automatic segmentation with OSD.
    pub psm: u8,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            lang: "eng".to_string(),
            psm: 1,
        }
    }
}

impl TesseractOcr {
    /// Check whether the configured binary can be executed.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary).arg("--version").output().is_ok()
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .arg("--psm")
            .arg(self.psm.to_string())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    OcrError::Unavailable(format!(
                        "'{}' not found — install tesseract-ocr or set a custom binary",
                        self.binary
                    ))
                } else {
                    OcrError::Failed(format!("failed to spawn '{}': {e}", self.binary))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Failed(format!(
                "'{}' exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("OCR produced {} bytes from {}", text.len(), image.display());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_binary_reports_unavailable() {
        let ocr = TesseractOcr {
            binary: "definitely-not-a-real-ocr-binary".to_string(),
            ..TesseractOcr::default()
        };
        let err = ocr
            .recognize(&PathBuf::from("/tmp/whatever.png"))
            .expect_err("nonexistent binary must fail");
        assert!(matches!(err, OcrError::Unavailable(_)), "got: {err}");
    }

    #[test]
    fn missing_binary_is_not_available() {
        let ocr = TesseractOcr {
            binary: "definitely-not-a-real-ocr-binary".to_string(),
            ..TesseractOcr::default()
        };
        assert!(!ocr.is_available());
    }
}
