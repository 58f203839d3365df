//! `deed export` command - write the finished deed to a file

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::open_session;
use crate::cli::{DocumentFormat, GlobalOpts};
use crate::core::config::Config;
use crate::schema::export::export;

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// File format
    #[arg(long, short = 'f', value_enum, default_value_t = DocumentFormat::Pdf)]
    pub format: DocumentFormat,

    /// Directory to write into (default: output_dir from config, else the current directory)
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let session = open_session(global, &config);
    let dir = args.output.unwrap_or_else(|| config.output_dir());

    let path = export(session.model(), args.format.into(), &dir)?;

    if global.quiet {
        println!("{}", path.display());
    } else {
        println!(
            "{} Sale deed written to {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }
    Ok(())
}
