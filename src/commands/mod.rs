use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::annotate::IconAnnotator;
use crate::cli::{ExtractionEngine, IconMode, SourceArgs};
use crate::error::SectionError;
use crate::model::{SectionKey, SectionSpan};
use crate::pdf_text::{PdfDocument, extract_text_verbatim, non_whitespace_char_count};
use crate::sections::{SectionSpans, find_section_spans, require_sections};
use crate::util::sha256_hex;

pub mod extract;
pub mod send;
pub mod spans;

#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub text: String,
    pub sha256: String,
    pub backend: &'static str,
    pub warnings: Vec<String>,
}

pub fn load_source(source: &SourceArgs, engine: ExtractionEngine) -> Result<LoadedSource> {
    if let Some(path) = &source.pdf {
        let document = PdfDocument::open(path)?;
        let extracted = extract_text_verbatim(&document, engine)?;
        return Ok(LoadedSource {
            path: path.clone(),
            text: extracted.text,
            sha256: sha256_hex(&document.bytes),
            backend: extracted.backend,
            warnings: extracted.warnings,
        });
    }

    if let Some(path) = &source.text_file {
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let sha256 = sha256_hex(&bytes);
        let text = String::from_utf8(bytes)
            .with_context(|| format!("text file is not valid UTF-8: {}", path.display()))?;
        if non_whitespace_char_count(&text) == 0 {
            return Err(SectionError::ExtractionFailure {
                path: path.clone(),
                reason: "text file is empty".to_string(),
            }
            .into());
        }
        info!(path = %path.display(), chars = text.chars().count(), "loaded text file");
        return Ok(LoadedSource {
            path: path.clone(),
            text,
            sha256,
            backend: "text-file",
            warnings: Vec::new(),
        });
    }

    bail!("either --pdf or --text-file is required")
}

/// Spans of the sections present in the text, failing when none are.
pub fn locate_sections(source: &LoadedSource) -> Result<SectionSpans> {
    let spans = require_sections(find_section_spans(&source.text)?)?;

    for key in SectionKey::ALL {
        match spans.get(&key) {
            Some(span) => info!(
                section = %key,
                heading_line = span.heading_line,
                end_line = span.end_line,
                bytes = span.end - span.start,
                "located section"
            ),
            None => warn!(section = %key, path = %source.path.display(), "section not found"),
        }
    }

    Ok(spans)
}

#[derive(Debug, Clone)]
pub struct RenderedSection {
    pub key: SectionKey,
    pub span: SectionSpan,
    pub message: String,
}

/// Annotated messages in canonical section order.
pub fn render_sections(
    full_text: &str,
    spans: &SectionSpans,
    icon_mode: IconMode,
) -> Result<Vec<RenderedSection>> {
    let annotator = IconAnnotator::new()?;

    Ok(spans
        .iter()
        .map(|(&key, &span)| RenderedSection {
            key,
            span,
            message: annotator.annotate(icon_mode, key, span.slice(full_text)),
        })
        .collect())
}
