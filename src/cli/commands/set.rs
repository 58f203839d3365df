//! `deed set` command - edit one field of the draft

use chrono::NaiveDate;
use console::style;
use miette::Result;

use crate::cli::helpers::{display_value, open_session, report_save_status};
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::session::DeedAction;
use crate::entities::field::FieldId;
use crate::schema::document::format_long_date;

/// Key accepted for the date of agreement
const DATE_KEY: &str = "date";

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Field key, e.g. seller.fullName, vehicle.registrationNumber, sale.price, date
    pub field: String,

    /// New value; an empty string clears the field
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

pub fn run(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut session = open_session(global, &config);

    if args.field.trim().eq_ignore_ascii_case(DATE_KEY) {
        let date = NaiveDate::parse_from_str(args.value.trim(), "%Y-%m-%d").map_err(|e| {
            miette::miette!(
                help = "use the YYYY-MM-DD form, e.g. 2024-01-15",
                "Invalid date '{}': {}",
                args.value,
                e
            )
        })?;
        let _ = session.dispatch(DeedAction::SetDate(date));
        report_save_status(&session);
        if !global.quiet {
            println!("{} date = {}", style("✓").green(), format_long_date(date));
        }
        return Ok(());
    }

    let field: FieldId = args.field.parse().map_err(miette::Report::new)?;
    session.edit(field, &args.value).map_err(miette::Report::new)?;
    report_save_status(&session);

    if !global.quiet {
        println!(
            "{} {} = {}",
            style("✓").green(),
            style(field.key()).cyan(),
            display_value(field, session.model())
        );
    }
    Ok(())
}
