//! `deed check` command - validate the draft

use console::style;
use miette::Result;

use crate::cli::helpers::{open_session, print_failures};
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::step::FormStep;
use crate::schema::validator::{validate_all, validate_step, StepGateError};

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Check only this step (e.g. seller-cid)
    #[arg(long, value_name = "STEP")]
    pub step: Option<FormStep>,
}

pub fn run(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let session = open_session(global, &config);
    let model = session.model();

    if let Some(step) = args.step {
        let failures = validate_step(step, model);
        if !failures.is_empty() {
            return Err(StepGateError::new(step, &failures).into());
        }
        if !global.quiet {
            println!("{} {} is complete", style("✓").green(), style(step.label()).bold());
        }
        return Ok(());
    }

    let failures = validate_all(model);
    if failures.is_empty() {
        if !global.quiet {
            println!("{} The deed is complete and ready to export", style("✓").green());
        }
        return Ok(());
    }

    if !global.quiet {
        println!("{}", style("Fields that need attention:").bold());
        print_failures(&failures);
        println!();
    }
    Err(miette::miette!(
        help = "run `deed start` to fill them in, or `deed set <field> <value>`",
        "{} field(s) need attention",
        failures.len()
    ))
}
