use std::collections::BTreeMap;

use crate::model::{SectionKey, SectionSpan};

use super::heading_match::HeadingScan;

/// Byte offset of the start of every line, with the total length appended.
fn line_offsets(lines: &[&str]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(lines.len() + 1);
    let mut offset = 0usize;
    offsets.push(offset);
    for line in lines {
        offset += line.len();
        offsets.push(offset);
    }
    offsets
}

/// Each resolved section runs from its heading line up to the next
/// heading-candidate line after it, or to the end of the document.
pub fn resolve_spans(lines: &[&str], scan: &HeadingScan) -> BTreeMap<SectionKey, SectionSpan> {
    let offsets = line_offsets(lines);

    scan.targets
        .iter()
        .map(|(&key, &heading_line)| {
            let end_line = scan
                .heading_candidates
                .range(heading_line + 1..)
                .next()
                .copied()
                .unwrap_or(lines.len());

            let span = SectionSpan {
                start: offsets[heading_line],
                end: offsets[end_line],
                heading_line,
                end_line,
            };
            (key, span)
        })
        .collect()
}
