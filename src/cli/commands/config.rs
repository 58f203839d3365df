//! `deed config` command - configuration inspection

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::draft_store;
use crate::cli::GlobalOpts;
use crate::core::config::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show the path to the configuration file
    Path,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show => run_show(global),
        ConfigCommands::Path => run_path(global),
    }
}

fn run_show(global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let effective = Config {
        draft_path: Some(draft_store(global, &config).path().to_path_buf()),
        output_dir: Some(config.output_dir()),
        print_command: Some(config.print_command()),
        mail_to: config.mail_to.clone(),
    };
    print!("{}", serde_yml::to_string(&effective).into_diagnostic()?);
    Ok(())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    match Config::config_file_path() {
        Some(path) => {
            let note = if path.exists() { "" } else { " (not created)" };
            if global.quiet {
                println!("{}", path.display());
            } else {
                println!("{}{}", path.display(), style(note).dim());
            }
        }
        None => {
            return Err(miette::miette!(
                "Could not determine a configuration directory for this platform"
            ))
        }
    }
    Ok(())
}
