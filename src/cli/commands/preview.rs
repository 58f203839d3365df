//! `deed preview` command - render the draft to stdout

use miette::{IntoDiagnostic, Result};
use std::io::Write;

use crate::cli::helpers::{open_session, terminal_width};
use crate::cli::{GlobalOpts, PreviewFormat};
use crate::core::config::Config;
use crate::schema::document::DeedDocument;
use crate::schema::template::TemplateGenerator;
use crate::schema::text::render_text;

#[derive(clap::Args, Debug)]
pub struct PreviewArgs {
    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = PreviewFormat::Text)]
    pub format: PreviewFormat,

    /// Wrap text at this many columns (default: terminal width)
    #[arg(long, short = 'w')]
    pub width: Option<usize>,
}

pub fn run(args: PreviewArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let session = open_session(global, &config);
    let doc = DeedDocument::build(session.model());

    let output = match args.format {
        PreviewFormat::Text => {
            let width = args.width.unwrap_or_else(terminal_width);
            render_text(&doc, width, console::colors_enabled())
        }
        PreviewFormat::Html => {
            let generator = TemplateGenerator::new()?;
            generator.render_html(&doc)?
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes()).into_diagnostic()?;
    Ok(())
}
