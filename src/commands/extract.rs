use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ExtractArgs;
use crate::commands::{LoadedSource, RenderedSection, load_source, locate_sections, render_sections};
use crate::deliver::{download_file_name, share_link};
use crate::model::{SectionManifestEntry, SectionsManifest};
use crate::util::{now_utc_string, write_json_pretty, write_text_file};

const MANIFEST_FILE_NAME: &str = "sections_manifest.json";

pub fn run(args: ExtractArgs) -> Result<()> {
    let source = load_source(&args.source, args.engine)?;
    let spans = locate_sections(&source)?;
    let sections = render_sections(&source.text, &spans, args.icon_mode)?;

    let mut output = io::BufWriter::new(io::stdout().lock());
    write_sections(&mut output, &sections, args.share_links).context("failed to write sections")?;

    if let Some(output_dir) = &args.output_dir {
        let manifest = write_section_files(output_dir, &source, &sections, args.icon_mode.as_str())?;
        info!(
            dir = %output_dir.display(),
            sections = manifest.sections.len(),
            "wrote section files"
        );
    }

    Ok(())
}

fn write_sections(
    out: &mut impl Write,
    sections: &[RenderedSection],
    share_links: bool,
) -> io::Result<()> {
    for section in sections {
        writeln!(out, "{} {}", section.key.default_icon(), section.key.label())?;
        writeln!(out, "{}", section.message)?;
        if share_links {
            writeln!(out, "{}", share_link(&section.message))?;
        }
        writeln!(out)?;
    }
    out.flush()
}

fn write_section_files(
    output_dir: &Path,
    source: &LoadedSource,
    sections: &[RenderedSection],
    icon_mode: &str,
) -> Result<SectionsManifest> {
    let mut entries = Vec::with_capacity(sections.len());
    for section in sections {
        let label = section.key.label();
        let file_name = download_file_name(label);
        write_text_file(&output_dir.join(&file_name), &section.message)?;

        entries.push(SectionManifestEntry {
            key: section.key,
            label: label.to_string(),
            icon: section.key.default_icon().to_string(),
            heading_line: section.span.heading_line,
            start: section.span.start,
            end: section.span.end,
            file_name,
        });
    }

    let manifest = SectionsManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_path: source.path.display().to_string(),
        source_sha256: source.sha256.clone(),
        extraction_backend: source.backend.to_string(),
        icon_mode: icon_mode.to_string(),
        warnings: source.warnings.clone(),
        sections: entries,
    };
    write_json_pretty(&output_dir.join(MANIFEST_FILE_NAME), &manifest)?;

    Ok(manifest)
}
