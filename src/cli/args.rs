//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    check::CheckArgs, completions::CompletionsArgs, config::ConfigCommands, draft::DraftCommands,
    export::ExportArgs, mail::MailArgs, preview::PreviewArgs, print::PrintArgs, set::SetArgs,
    start::StartArgs,
};
use crate::schema::export::ExportFormat;

#[derive(Parser)]
#[command(name = "deed")]
#[command(author, version, about = "Vehicle Sale Deed generator")]
#[command(long_about = "Collects seller, buyer, vehicle and sale details step by step, \
keeps the draft on disk between runs, and renders the signed sale deed as PDF or HTML.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Draft file to use instead of the configured one
    #[arg(long, global = true, value_name = "FILE")]
    pub draft: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill in the deed interactively, resuming the saved draft
    Start(StartArgs),

    /// Set one field of the draft
    Set(SetArgs),

    /// Validate the draft and list missing or invalid fields
    Check(CheckArgs),

    /// Render the draft to stdout
    Preview(PreviewArgs),

    /// Write the finished deed to a file
    Export(ExportArgs),

    /// Export the deed and send it to the printer
    Print(PrintArgs),

    /// Print a mailto: link for sending the deed
    Mail(MailArgs),

    /// Inspect or manage the saved draft
    #[command(subcommand)]
    Draft(DraftCommands),

    /// List the wizard steps and their status
    Steps,

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// File format for `deed export`
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Printable A4 PDF
    #[default]
    Pdf,
    /// Standalone HTML page
    Html,
}

impl From<DocumentFormat> for ExportFormat {
    fn from(format: DocumentFormat) -> Self {
        match format {
            DocumentFormat::Pdf => ExportFormat::Pdf,
            DocumentFormat::Html => ExportFormat::Html,
        }
    }
}

/// Output format for `deed preview`
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PreviewFormat {
    /// Wrapped plain text
    #[default]
    Text,
    /// HTML markup
    Html,
}

/// Output format for data listings
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON, as stored in the draft file
    Json,
    /// YAML
    Yaml,
}
