use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "pdf-sections",
    version,
    about = "Verbatim section extraction from briefing PDFs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the located sections with icons, optionally writing them to files.
    Extract(ExtractArgs),
    /// Print the located section spans as JSON.
    Spans(SpansArgs),
    /// Post the located sections to a chat webhook.
    Send(SendArgs),
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// PDF to extract text from.
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Already-extracted UTF-8 text, used as-is.
    #[arg(long)]
    pub text_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long, value_enum, default_value_t = ExtractionEngine::Auto)]
    pub engine: ExtractionEngine,

    #[arg(long, value_enum, default_value_t = IconMode::Bullets)]
    pub icon_mode: IconMode,

    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub share_links: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SpansArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long, value_enum, default_value_t = ExtractionEngine::Auto)]
    pub engine: ExtractionEngine,
}

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long, value_enum, default_value_t = ExtractionEngine::Auto)]
    pub engine: ExtractionEngine,

    #[arg(long, value_enum, default_value_t = IconMode::Bullets)]
    pub icon_mode: IconMode,

    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    #[arg(long, default_value_t = 1800, value_parser = clap::value_parser!(u32).range(1..))]
    pub chunk_limit: u32,

    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExtractionEngine {
    Auto,
    Pdftotext,
    PdfExtract,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum IconMode {
    Bullets,
    EveryLine,
    Heading,
}

impl IconMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bullets => "bullets",
            Self::EveryLine => "every-line",
            Self::Heading => "heading",
        }
    }
}
