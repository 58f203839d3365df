//! `deed steps` command - wizard steps and their status

use console::style;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::open_session;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::step::FormStep;
use crate::schema::validator::validate_step;

pub fn run(global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let session = open_session(global, &config);
    let model = session.model();
    let resume = session.first_incomplete_step();

    let mut builder = Builder::default();
    builder.push_record(["", "#", "Step", "Key", "Status"]);
    for step in FormStep::all() {
        let marker = if *step == resume { "→" } else { "" };
        let status = if step.is_terminal() || *step == FormStep::Review {
            "-".to_string()
        } else {
            match validate_step(*step, model).len() {
                0 => "complete".to_string(),
                n => format!("{} missing", n),
            }
        };
        builder.push_record([
            marker.to_string(),
            step.index().to_string(),
            step.label().to_string(),
            step.as_str().to_string(),
            status,
        ]);
    }
    println!("{}", builder.build().with(Style::rounded()));

    if !global.quiet {
        println!(
            "{} `deed start` resumes at {}",
            style("→").cyan(),
            style(resume.label()).bold()
        );
    }
    Ok(())
}
