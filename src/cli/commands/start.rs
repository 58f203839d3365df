//! `deed start` command - interactive wizard

use console::style;
use miette::Result;

use crate::cli::helpers::{open_session, report_save_status};
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::session::DeedAction;
use crate::core::step::FormStep;
use crate::schema::wizard::{DeedWizard, WizardOutcome};

#[derive(clap::Args, Debug)]
pub struct StartArgs {
    /// Discard the saved draft and start over
    #[arg(long)]
    pub fresh: bool,

    /// Open at this step instead of resuming (e.g. sale-price)
    #[arg(long, value_name = "STEP")]
    pub at: Option<FormStep>,
}

pub fn run(args: StartArgs, global: &GlobalOpts) -> Result<()> {
    if !console::Term::stdout().is_term() {
        return Err(miette::miette!(
            help = "use `deed set <field> <value>` to fill in the draft without prompts",
            "`deed start` needs an interactive terminal"
        ));
    }

    let config = Config::load();
    let mut session = open_session(global, &config);

    if args.fresh {
        let _ = session.dispatch(DeedAction::Reset);
    }

    let resume_at = match args.at {
        Some(step) => Some(step),
        None if !session.model().is_blank() => Some(session.first_incomplete_step()),
        None => None,
    };
    if let Some(step) = resume_at {
        if !global.quiet && args.at.is_none() {
            println!(
                "{} Resuming your draft at {}",
                style("→").cyan(),
                style(step.label()).bold()
            );
        }
        let _ = session.dispatch(DeedAction::GoTo(step));
    }

    let outcome = DeedWizard::new(&mut session, &config).run()?;
    report_save_status(&session);

    if let WizardOutcome::Completed(path) = outcome {
        if global.quiet {
            println!("{}", path.display());
        }
    }
    Ok(())
}
