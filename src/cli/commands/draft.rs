//! `deed draft` command - inspect or manage the saved draft

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{draft_store, draft_table, open_session, report_save_status};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::session::DeedAction;

#[derive(Subcommand, Debug)]
pub enum DraftCommands {
    /// Show the saved draft
    Show(ShowArgs),

    /// Write the draft to disk now
    Save,

    /// Discard the saved draft
    Clear(ClearArgs),

    /// Print the draft file location
    Path,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct ClearArgs {
    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: DraftCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DraftCommands::Show(args) => run_show(args, global),
        DraftCommands::Save => run_save(global),
        DraftCommands::Clear(args) => run_clear(args, global),
        DraftCommands::Path => {
            let config = Config::load();
            println!("{}", draft_store(global, &config).path().display());
            Ok(())
        }
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let session = open_session(global, &config);
    let model = session.model();

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(model).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(model).into_diagnostic()?);
        }
        OutputFormat::Table => {
            if !global.quiet {
                let store = session.store();
                let origin = if store.exists() {
                    format!("Draft at {}", store.path().display())
                } else {
                    "No saved draft yet".to_string()
                };
                println!("{}", style(origin).dim());
            }
            println!("{}", draft_table(model));
        }
    }
    Ok(())
}

fn run_save(global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut session = open_session(global, &config);
    let _ = session.dispatch(DeedAction::SaveDraft);
    report_save_status(&session);
    if !global.quiet {
        println!(
            "{} Draft saved to {}",
            style("✓").green(),
            style(session.store().path().display()).cyan()
        );
    }
    Ok(())
}

fn run_clear(args: ClearArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut session = open_session(global, &config);
    if !session.store().exists() {
        if !global.quiet {
            println!("No saved draft to clear");
        }
        return Ok(());
    }

    if !args.yes {
        if !console::Term::stderr().is_term() {
            return Err(miette::miette!(
                help = "pass --yes to clear without confirmation",
                "Refusing to clear the draft without confirmation"
            ));
        }
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Discard the saved draft?")
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            return Ok(());
        }
    }

    let _ = session.dispatch(DeedAction::Reset);
    if session.store().exists() {
        return Err(miette::miette!(
            "Could not remove {}",
            session.store().path().display()
        ));
    }
    if !global.quiet {
        println!("{} Draft cleared", style("✓").green());
    }
    Ok(())
}
