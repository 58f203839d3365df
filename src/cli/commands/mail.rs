//! `deed mail` command - mailto: link for sending the deed

use console::style;
use miette::Result;

use crate::cli::helpers::open_session;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::schema::export::{file_name, mailto_link, ExportFormat};

#[derive(clap::Args, Debug)]
pub struct MailArgs {
    /// Recipient address (default: mail_to from config)
    #[arg(long, value_name = "ADDRESS")]
    pub to: Option<String>,
}

pub fn run(args: MailArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let session = open_session(global, &config);
    let to = args.to.or(config.mail_to);

    println!("{}", mailto_link(session.model(), to.as_deref()));

    if !global.quiet {
        eprintln!(
            "{}",
            style(format!(
                "Attach {} (see `deed export`) to the message.",
                file_name(session.model(), ExportFormat::Pdf)
            ))
            .dim()
        );
    }
    Ok(())
}
