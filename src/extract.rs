//! Text extraction from `.pdf` and `.txt` files.
//!
//! The format is chosen by file extension (case-insensitive). Any other
//! extension is rejected before the file is touched.
//!
//! PDFs go through two explicit steps:
//!
//! 1. **Text layer**: [`primary_pdf_text`] parses the file with
//!    `pdf-extract` on a blocking thread and returns a [`PrimaryOutcome`].
//!    Parser errors and parser panics both become [`PrimaryOutcome::Failed`].
//! 2. **OCR**: only on `Failed`, the file is handed to an [`OcrEngine`].
//!    The fallback is logged as a warning; only an OCR failure reaches the
//!    caller.
//!
//! OCR runs under a semaphore (bounded concurrent rasterization) and a
//! deadline. The default engine, [`TesseractCli`], shells out to `pdftoppm`
//! and `tesseract`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::Semaphore;

use crate::config::ExtractionConfig;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file format '{0}': please use PDF or TXT")]
    UnsupportedFormat(String),

    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8 text")]
    Decode { path: String },

    #[error("OCR failed for {path}: {reason}")]
    Ocr { path: String, reason: String },

    #[error("OCR timed out for {path} after {secs}s")]
    OcrTimeout { path: String, secs: u64 },
}

impl ExtractError {
    fn ocr(path: &Path, reason: impl Into<String>) -> Self {
        ExtractError::Ocr {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Text,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "txt" => Ok(DocumentFormat::Text),
            "" => Err(ExtractError::UnsupportedFormat(
                path.display().to_string(),
            )),
            other => Err(ExtractError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

/// Result of the text-layer attempt on a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryOutcome {
    Success(String),
    Failed(String),
}

/// Extract the PDF text layer, page by page in order.
pub async fn primary_pdf_text(bytes: Vec<u8>) -> PrimaryOutcome {
    match tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await {
        Ok(Ok(text)) => PrimaryOutcome::Success(text),
        Ok(Err(e)) => PrimaryOutcome::Failed(e.to_string()),
        Err(e) => PrimaryOutcome::Failed(format!("PDF parser panicked: {}", e)),
    }
}

/// Optical recognition of every page of a PDF, concatenated in page order.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize_pdf(&self, path: &Path) -> Result<String, ExtractError>;
}

/// OCR through the poppler `pdftoppm` and `tesseract` command-line tools.
pub struct TesseractCli {
    pdftoppm: String,
    tesseract: String,
    dpi: u32,
}

impl TesseractCli {
    pub fn new(pdftoppm: impl Into<String>, tesseract: impl Into<String>, dpi: u32) -> Self {
        Self {
            pdftoppm: pdftoppm.into(),
            tesseract: tesseract.into(),
            dpi,
        }
    }

    async fn rasterize(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
        let output = Command::new(&self.pdftoppm)
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg(pdf)
            .arg(out_dir.join("page"))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ExtractError::ocr(pdf, format!("failed to run '{}': {}", self.pdftoppm, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::ocr(
                pdf,
                format!("{} failed: {}", self.pdftoppm, stderr.trim()),
            ));
        }

        let mut entries = tokio::fs::read_dir(out_dir)
            .await
            .map_err(|e| ExtractError::ocr(pdf, e.to_string()))?;
        let mut pages = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ExtractError::ocr(pdf, e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("png") {
                pages.push(path);
            }
        }
        // pdftoppm zero-pads page numbers by page count: page-1.png or page-01.png.
        pages.sort_by_key(|p| page_number(p).unwrap_or(u32::MAX));
        Ok(pages)
    }

    async fn recognize_image(&self, pdf: &Path, image: &Path) -> Result<String, ExtractError> {
        let output = Command::new(&self.tesseract)
            .arg(image)
            .arg("stdout")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ExtractError::ocr(pdf, format!("failed to run '{}': {}", self.tesseract, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::ocr(
                pdf,
                format!("{} failed: {}", self.tesseract, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn page_number(image: &Path) -> Option<u32> {
    image
        .file_stem()?
        .to_str()?
        .rsplit('-')
        .next()?
        .parse()
        .ok()
}

#[async_trait]
impl OcrEngine for TesseractCli {
    async fn recognize_pdf(&self, path: &Path) -> Result<String, ExtractError> {
        let scratch = tempfile::tempdir().map_err(|e| ExtractError::ocr(path, e.to_string()))?;
        let pages = self.rasterize(path, scratch.path()).await?;
        tracing::debug!(path = %path.display(), pages = pages.len(), "rasterized PDF for OCR");

        let mut text = String::new();
        for page in &pages {
            text.push_str(&self.recognize_image(path, page).await?);
        }
        Ok(text)
    }
}

/// Turns a file path into trimmed raw text.
pub struct Extractor {
    ocr: Arc<dyn OcrEngine>,
    ocr_permits: Arc<Semaphore>,
    ocr_timeout: Duration,
}

impl Extractor {
    pub fn new(ocr: Arc<dyn OcrEngine>, max_concurrent_ocr: usize, ocr_timeout: Duration) -> Self {
        Self {
            ocr,
            ocr_permits: Arc::new(Semaphore::new(max_concurrent_ocr.max(1))),
            ocr_timeout,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        let engine = TesseractCli::new(&config.pdftoppm, &config.tesseract, config.ocr_dpi);
        Self::new(
            Arc::new(engine),
            config.max_concurrent_ocr,
            Duration::from_secs(config.ocr_timeout_secs),
        )
    }

    /// Extract the text of `path`, trimmed of surrounding whitespace.
    pub async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let text = match DocumentFormat::from_path(path)? {
            DocumentFormat::Text => read_text(path).await?,
            DocumentFormat::Pdf => self.extract_pdf(path).await?,
        };
        Ok(text.trim().to_string())
    }

    async fn extract_pdf(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| ExtractError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        match primary_pdf_text(bytes).await {
            PrimaryOutcome::Success(text) => Ok(text),
            PrimaryOutcome::Failed(reason) => {
                tracing::warn!(
                    path = %path.display(),
                    %reason,
                    "PDF text extraction failed, switching to OCR"
                );
                self.ocr_fallback(path).await
            }
        }
    }

    async fn ocr_fallback(&self, path: &Path) -> Result<String, ExtractError> {
        let work = async {
            let _permit = self
                .ocr_permits
                .acquire()
                .await
                .map_err(|e| ExtractError::ocr(path, e.to_string()))?;
            self.ocr.recognize_pdf(path).await
        };

        tokio::time::timeout(self.ocr_timeout, work)
            .await
            .map_err(|_| ExtractError::OcrTimeout {
                path: path.display().to_string(),
                secs: self.ocr_timeout.as_secs(),
            })?
    }
}

async fn read_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| ExtractError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    String::from_utf8(bytes).map_err(|_| ExtractError::Decode {
        path: path.display().to_string(),
    })
}
