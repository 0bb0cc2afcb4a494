use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::cli::SpansArgs;
use crate::commands::{load_source, locate_sections};
use crate::model::SpanReport;
use crate::sections::SectionSpans;

pub fn run(args: SpansArgs) -> Result<()> {
    let source = load_source(&args.source, args.engine)?;
    let spans = locate_sections(&source)?;

    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, &span_reports(&spans))
        .context("failed to serialize section spans json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn span_reports(spans: &SectionSpans) -> Vec<SpanReport> {
    spans
        .iter()
        .map(|(&key, span)| SpanReport {
            key,
            label: key.label().to_string(),
            heading_line: span.heading_line,
            end_line: span.end_line,
            start: span.start,
            end: span.end,
            text_len: span.end - span.start,
        })
        .collect()
}
