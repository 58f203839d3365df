//! Shared helper functions for CLI commands

use console::style;
use tabled::{builder::Builder, settings::Style};

use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::draft::FileDraftStore;
use crate::core::session::{DeedSession, SaveStatus};
use crate::entities::deed::DeedModel;
use crate::entities::field::{FieldId, FieldKind};
use crate::schema::document::{format_amount, format_long_date};
use crate::schema::validator::ValidationErrors;

/// Terminal width used when stdout is not a terminal
pub const DEFAULT_WIDTH: usize = 80;

/// Draft store selected by `--draft`, the config, or the default location
pub fn draft_store(global: &GlobalOpts, config: &Config) -> FileDraftStore {
    let path = global.draft.clone().unwrap_or_else(|| config.draft_path());
    FileDraftStore::new(path)
}

/// Open a session on the selected draft
pub fn open_session(global: &GlobalOpts, config: &Config) -> DeedSession<FileDraftStore> {
    DeedSession::open(draft_store(global, config))
}

/// Warn on stderr when the last write-through did not reach the disk
pub fn report_save_status(session: &DeedSession<FileDraftStore>) {
    if session.save_status() == SaveStatus::Failed {
        eprintln!(
            "{} Could not save the draft to {}",
            style("!").yellow(),
            session.store().path().display()
        );
    }
}

/// Width of the attached terminal, or [`DEFAULT_WIDTH`]
pub fn terminal_width() -> usize {
    let term = console::Term::stdout();
    if term.is_term() {
        term.size().1 as usize
    } else {
        DEFAULT_WIDTH
    }
}

/// Value as shown to the user; price gets separators, empty shows a dash
pub fn display_value(field: FieldId, model: &DeedModel) -> String {
    let value = field.get(model);
    if value.is_empty() {
        return "-".to_string();
    }
    match (field.kind(), model.sale.amount()) {
        (FieldKind::Price, Some(amount)) => format!("Nu. {}", format_amount(amount)),
        _ => value,
    }
}

/// Table of every field with its key and value
pub fn draft_table(model: &DeedModel) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Section", "Field", "Key", "Value"]);
    for field in FieldId::all() {
        builder.push_record([
            field.group().label().to_string(),
            field.label().to_string(),
            field.key().to_string(),
            display_value(*field, model),
        ]);
    }
    builder.push_record([
        "Date".to_string(),
        "Date of agreement".to_string(),
        "date".to_string(),
        format_long_date(model.date),
    ]);
    builder.build().with(Style::rounded()).to_string()
}

/// One line per failing field
pub fn print_failures(failures: &ValidationErrors) {
    for (field, message) in failures.iter() {
        println!(
            "  {} {:<28} {}",
            style("✗").red(),
            style(field.key()).yellow(),
            message
        );
    }
}
