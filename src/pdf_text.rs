use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use crate::cli::ExtractionEngine;
use crate::error::SectionError;

#[derive(Debug, Clone)]
pub struct PdfDocument {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub backend: &'static str,
    pub warnings: Vec<String>,
}

pub trait TextExtractor {
    fn name(&self) -> &'static str;

    /// Full text of the document with line breaks kept.
    fn extract(&self, document: &PdfDocument) -> Result<String>;
}

/// Poppler's `pdftotext`, reading-order text with form feeds between pages.
pub struct Pdftotext;

impl TextExtractor for Pdftotext {
    fn name(&self) -> &'static str {
        "pdftotext"
    }

    fn extract(&self, document: &PdfDocument) -> Result<String> {
        let output = Command::new("pdftotext")
            .arg("-enc")
            .arg("UTF-8")
            .arg(&document.path)
            .arg("-")
            .output()
            .with_context(|| {
                format!("failed to execute pdftotext for {}", document.path.display())
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "pdftotext returned non-zero exit status for {}: {}",
                document.path.display(),
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).replace('\u{0000}', ""))
    }
}

/// Pure-Rust extraction through the `pdf-extract` crate.
pub struct PdfExtract;

impl TextExtractor for PdfExtract {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract(&self, document: &PdfDocument) -> Result<String> {
        // pdf_extract can panic on malformed PDFs
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&document.bytes)
        }));

        let text = match result {
            Ok(extracted) => extracted.with_context(|| {
                format!("pdf-extract failed to read {}", document.path.display())
            })?,
            Err(_) => bail!(
                "pdf-extract panicked on malformed PDF {}",
                document.path.display()
            ),
        };
        Ok(text.replace('\u{0000}', ""))
    }
}

pub fn command_available(program: &str) -> bool {
    Command::new(program).arg("-v").output().is_ok()
}

pub fn non_whitespace_char_count(text: &str) -> usize {
    text.chars()
        .filter(|character| !character.is_whitespace())
        .count()
}

fn backends_for(engine: ExtractionEngine) -> Vec<Box<dyn TextExtractor>> {
    match engine {
        ExtractionEngine::Pdftotext => vec![Box::new(Pdftotext)],
        ExtractionEngine::PdfExtract => vec![Box::new(PdfExtract)],
        ExtractionEngine::Auto => {
            if command_available("pdftotext") {
                vec![Box::new(Pdftotext), Box::new(PdfExtract)]
            } else {
                vec![Box::new(PdfExtract)]
            }
        }
    }
}

/// Tries each backend of `engine` in order and keeps the first result with
/// selectable text.
pub fn extract_text_verbatim(
    document: &PdfDocument,
    engine: ExtractionEngine,
) -> Result<ExtractedText> {
    extract_with_backends(document, &backends_for(engine))
}

pub fn extract_with_backends(
    document: &PdfDocument,
    backends: &[Box<dyn TextExtractor>],
) -> Result<ExtractedText> {
    let mut warnings = Vec::new();

    for backend in backends {
        match backend.extract(document) {
            Ok(text) if non_whitespace_char_count(&text) > 0 => {
                info!(
                    path = %document.path.display(),
                    backend = backend.name(),
                    chars = text.chars().count(),
                    "extracted text"
                );
                return Ok(ExtractedText {
                    text,
                    backend: backend.name(),
                    warnings,
                });
            }
            Ok(_) => {
                let message = format!("{} produced no selectable text", backend.name());
                debug!(path = %document.path.display(), backend = backend.name(), "empty text layer");
                warnings.push(message);
            }
            Err(error) => {
                warn!(
                    path = %document.path.display(),
                    backend = backend.name(),
                    error = %error,
                    "extraction backend failed"
                );
                warnings.push(format!("{} failed: {error:#}", backend.name()));
            }
        }
    }

    let reason = if warnings.is_empty() {
        "no extraction backend available".to_string()
    } else {
        format!("{}; this may be a scanned or image-only PDF", warnings.join("; "))
    };
    Err(SectionError::ExtractionFailure {
        path: document.path.clone(),
        reason,
    }
    .into())
}
