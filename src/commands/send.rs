use std::time::Duration;

use anyhow::{Result, bail};
use tracing::{error, info};

use crate::cli::SendArgs;
use crate::commands::{RenderedSection, load_source, locate_sections, render_sections};
use crate::deliver::{DryRunSink, MessageSink, WebhookClient, deliver_section};

pub fn run(args: SendArgs) -> Result<()> {
    let source = load_source(&args.source, args.engine)?;
    let spans = locate_sections(&source)?;
    let sections = render_sections(&source.text, &spans, args.icon_mode)?;

    let sink: Box<dyn MessageSink> = if args.dry_run {
        Box::new(DryRunSink)
    } else {
        let Some(url) = args.webhook_url.as_deref() else {
            bail!("--webhook-url (or DISCORD_WEBHOOK_URL) is required unless --dry-run is set");
        };
        Box::new(WebhookClient::new(url, Duration::from_secs(args.timeout_secs))?)
    };

    let failed = send_sections(sink.as_ref(), &sections, args.chunk_limit as usize);
    if failed > 0 {
        bail!("{failed} of {} sections failed to send", sections.len());
    }

    info!(sections = sections.len(), "sent all sections");
    Ok(())
}

/// Sends each section independently; a failure only stops that section.
/// Returns the number of failed sections.
fn send_sections(sink: &dyn MessageSink, sections: &[RenderedSection], limit: usize) -> usize {
    let mut failed = 0usize;
    for section in sections {
        match deliver_section(sink, section.key, &section.message, limit) {
            Ok(chunks) => info!(section = %section.key, chunks, "sent section"),
            Err(err) => {
                error!(section = %section.key, error = %err, "failed to send section");
                failed += 1;
            }
        }
    }
    failed
}
