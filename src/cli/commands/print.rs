//! `deed print` command - export to a temporary PDF and print it

use console::style;
use miette::Result;

use crate::cli::helpers::open_session;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::schema::export::print;

#[derive(clap::Args, Debug)]
pub struct PrintArgs {
    /// Print command to use instead of the configured one (e.g. "lp -d office")
    #[arg(long, short = 'c', value_name = "COMMAND")]
    pub command: Option<String>,
}

pub fn run(args: PrintArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let session = open_session(global, &config);
    let command = args.command.unwrap_or_else(|| config.print_command());
    let dir = std::env::temp_dir().join("vehicle-sale-deed");

    let path = print(session.model(), &command, &dir)?;

    if !global.quiet {
        println!(
            "{} Sent {} to {}",
            style("✓").green(),
            style(path.display()).cyan(),
            style(&command).bold()
        );
    }
    Ok(())
}
