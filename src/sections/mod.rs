use std::collections::BTreeMap;

use anyhow::Result;
use tracing::debug;

use crate::error::SectionError;
use crate::model::{SectionKey, SectionSpan};

mod heading_match;
mod normalize;
mod span_resolve;

pub use heading_match::{HeadingMatcher, LineRecord};
pub use normalize::{normalize, split_lines_inclusive, strip_line_terminator, trim_line};
pub use span_resolve::resolve_spans;

pub type SectionSpans = BTreeMap<SectionKey, SectionSpan>;

/// Locates every target section in `full_text`. Keys without a heading are
/// absent from the result.
pub fn find_section_spans(full_text: &str) -> Result<SectionSpans> {
    let matcher = HeadingMatcher::new()?;
    Ok(find_section_spans_with(&matcher, full_text))
}

pub fn find_section_spans_with(matcher: &HeadingMatcher, full_text: &str) -> SectionSpans {
    let lines = split_lines_inclusive(full_text);
    let records = lines
        .iter()
        .enumerate()
        .map(|(index, raw)| LineRecord::new(index, *raw))
        .collect::<Vec<LineRecord<'_>>>();

    let scan = matcher.scan(&records);
    debug!(
        lines = records.len(),
        targets = scan.targets.len(),
        heading_candidates = scan.heading_candidates.len(),
        "scanned headings"
    );

    resolve_spans(&lines, &scan)
}

/// An empty mapping means none of the sections exist in the document.
pub fn require_sections(spans: SectionSpans) -> Result<SectionSpans, SectionError> {
    if spans.is_empty() {
        return Err(SectionError::NoSectionsFound);
    }
    Ok(spans)
}
