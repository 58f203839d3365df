//! Interactive step-by-step wizard for filling in the deed
//!
//! Each data-entry step prompts for its fields, pre-filled from the draft,
//! then offers Next, Back or Save & quit. Every accepted entry is written
//! through to the draft store, so quitting at any point loses nothing.

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::core::config::Config;
use crate::core::draft::DraftStore;
use crate::core::session::{DeedAction, DeedSession};
use crate::core::step::FormStep;
use crate::core::words::amount_in_words;
use crate::entities::deed::{DeedModel, Title};
use crate::entities::field::{FieldId, FieldKind};
use crate::schema::document::{format_amount, format_long_date, DeedDocument};
use crate::schema::export::{self, ExportFormat};
use crate::schema::text::render_text;

/// What the user chose at the end of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nav {
    Next,
    Back,
    Quit,
}

/// What the user chose on the review screen
enum Review {
    Exported(PathBuf),
    /// Left review for another step
    Continue,
    Quit,
}

/// How a wizard run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    /// Left early; the draft keeps the entries
    Saved,
    /// Reached the success screen with an exported file
    Completed(PathBuf),
}

/// Interactive wizard driving a [`DeedSession`]
pub struct DeedWizard<'a, S: DraftStore> {
    session: &'a mut DeedSession<S>,
    config: &'a Config,
    theme: ColorfulTheme,
}

impl<'a, S: DraftStore> DeedWizard<'a, S> {
    pub fn new(session: &'a mut DeedSession<S>, config: &'a Config) -> Self {
        Self {
            session,
            config,
            theme: ColorfulTheme::default(),
        }
    }

    /// Run until the user quits or the deed is generated
    pub fn run(&mut self) -> Result<WizardOutcome> {
        loop {
            let step = self.session.current_step();
            let nav = match step {
                FormStep::Hero => self.hero()?,
                FormStep::Review => match self.review()? {
                    Review::Exported(path) => {
                        let _ = self.session.dispatch(DeedAction::Next);
                        self.success(&path)?;
                        return Ok(WizardOutcome::Completed(path));
                    }
                    Review::Continue => continue,
                    Review::Quit => Nav::Quit,
                },
                // A draft saved after generation reopens on review
                FormStep::Success => {
                    let _ = self.session.dispatch(DeedAction::GoTo(FormStep::Review));
                    continue;
                }
                _ => self.data_step(step)?,
            };

            match nav {
                Nav::Quit => {
                    let _ = self.session.dispatch(DeedAction::SaveDraft);
                    println!(
                        "{} Draft saved. Run {} to continue.",
                        style("✓").green(),
                        style("deed start").cyan()
                    );
                    return Ok(WizardOutcome::Saved);
                }
                Nav::Back => {
                    let _ = self.session.dispatch(DeedAction::Back);
                }
                Nav::Next => {
                    if let Err(gate) = self.session.dispatch(DeedAction::Next) {
                        println!();
                        println!("{} {}", style("✗").red(), style(&gate).red());
                        for violation in gate.violations() {
                            println!("   {} {}", style("•").red(), violation);
                        }
                    }
                }
            }
        }
    }

    fn hero(&self) -> Result<Nav> {
        println!();
        println!("{}", style("Vehicle Sale Deed").bold().underlined());
        println!(
            "{}",
            style("Answer a few questions about the seller, buyer, vehicle and price.").dim()
        );
        println!(
            "{}",
            style("Your answers are saved as you go; you can stop and resume at any time.").dim()
        );
        println!();

        let choice = Select::with_theme(&self.theme)
            .with_prompt("Ready?")
            .items(&["Start", "Quit"])
            .default(0)
            .interact()
            .into_diagnostic()?;
        Ok(if choice == 0 { Nav::Next } else { Nav::Quit })
    }

    fn data_step(&mut self, step: FormStep) -> Result<Nav> {
        println!();
        println!("{}", step_header(step));
        println!("{}", style("─".repeat(50)).dim());

        for field in FieldId::for_step(step) {
            self.prompt_field(*field)?;
        }

        let items = ["Next", "Back", "Save & quit"];
        let choice = Select::with_theme(&self.theme)
            .items(&items)
            .default(0)
            .interact()
            .into_diagnostic()?;
        Ok(match items[choice] {
            "Next" => Nav::Next,
            "Back" => Nav::Back,
            _ => Nav::Quit,
        })
    }

    fn prompt_field(&mut self, field: FieldId) -> Result<()> {
        let current = field.get(self.session.model());
        let prompt = match self.session.errors().get(field) {
            Some(message) => format!("{} ({})", field.label(), style(message).red()),
            None => field.label().to_string(),
        };

        let value = match field.kind() {
            FieldKind::Title => {
                let titles: Vec<&str> = Title::all().iter().map(|t| t.as_str()).collect();
                let default_idx = titles.iter().position(|t| *t == current).unwrap_or(0);
                let choice = Select::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .items(&titles)
                    .default(default_idx)
                    .interact()
                    .into_diagnostic()?;
                titles[choice].to_string()
            }
            FieldKind::Flag => {
                let yes = Confirm::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .default(current == "yes")
                    .interact()
                    .into_diagnostic()?;
                (if yes { "yes" } else { "no" }).to_string()
            }
            FieldKind::Text | FieldKind::UpperText | FieldKind::Cid | FieldKind::Price => {
                let prompt = match field.placeholder() {
                    Some(example) => format!("{} {}", prompt, style(format!("e.g. {}", example)).dim()),
                    None => prompt,
                };
                let mut input = Input::<String>::with_theme(&self.theme)
                    .with_prompt(&prompt)
                    .allow_empty(true)
                    .validate_with(move |raw: &String| -> std::result::Result<(), String> {
                        field.sanitize(raw).map(|_| ()).map_err(|e| e.inline_message())
                    });
                if !current.is_empty() {
                    input = input.default(current.clone());
                }
                input.interact_text().into_diagnostic()?
            }
        };

        // Input was validated by the prompt, so this cannot be rejected
        self.session.edit(field, &value).map_err(miette::Report::new)?;

        if field.kind() == FieldKind::Price {
            if let Some(amount) = self.session.model().sale.amount() {
                println!(
                    "  {} Nu. {} ({} only)",
                    style("=").dim(),
                    format_amount(amount),
                    style(amount_in_words(&amount.to_string())).italic()
                );
            }
        }
        Ok(())
    }

    fn review(&mut self) -> Result<Review> {
        loop {
            println!();
            println!("{}", style("Review your details").bold().underlined());
            for line in review_lines(self.session.model()) {
                println!("{}", line);
            }
            println!();

            let items = [
                "Generate deed (PDF)",
                "Preview",
                "Edit details",
                "Back",
                "Save & quit",
            ];
            let choice = Select::with_theme(&self.theme)
                .items(&items)
                .default(0)
                .interact()
                .into_diagnostic()?;

            match choice {
                0 => {
                    let dir = self.config.output_dir();
                    match export::export(self.session.model(), ExportFormat::Pdf, &dir) {
                        Ok(path) => return Ok(Review::Exported(path)),
                        Err(export::ExportError::Incomplete { step, count }) => {
                            println!(
                                "{} {} field(s) still need attention",
                                style("✗").red(),
                                count
                            );
                            let _ = self.session.dispatch(DeedAction::GoTo(step));
                            return Ok(Review::Continue);
                        }
                        Err(e) => println!("{} {}", style("✗").red(), style(&e).red()),
                    }
                }
                1 => {
                    let width = console::Term::stdout().size().1 as usize;
                    let doc = DeedDocument::build(self.session.model());
                    println!();
                    print!("{}", render_text(&doc, width, console::colors_enabled()));
                }
                2 => {
                    let steps = FormStep::data_entry();
                    let labels: Vec<&str> = steps.iter().map(|s| s.label()).collect();
                    let pick = Select::with_theme(&self.theme)
                        .with_prompt("Which section?")
                        .items(&labels)
                        .default(0)
                        .interact()
                        .into_diagnostic()?;
                    let _ = self.session.dispatch(DeedAction::GoTo(steps[pick]));
                    return Ok(Review::Continue);
                }
                3 => {
                    let _ = self.session.dispatch(DeedAction::Back);
                    return Ok(Review::Continue);
                }
                _ => return Ok(Review::Quit),
            }
        }
    }

    fn success(&mut self, path: &Path) -> Result<()> {
        println!();
        println!(
            "{} Sale deed generated: {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
        loop {
            let items = ["Print", "Show mail link", "Start a new deed", "Done"];
            let choice = Select::with_theme(&self.theme)
                .items(&items)
                .default(3)
                .interact()
                .into_diagnostic()?;
            match choice {
                0 => {
                    let dir = path.parent().map(|p| p.to_path_buf()).unwrap_or_default();
                    match export::print(self.session.model(), &self.config.print_command(), &dir) {
                        Ok(_) => println!("{} Sent to printer", style("✓").green()),
                        Err(e) => println!("{} {}", style("✗").red(), e),
                    }
                }
                1 => {
                    let link = export::mailto_link(self.session.model(), self.config.mail_to.as_deref());
                    println!("{}", link);
                    println!(
                        "{}",
                        style(format!("Attach {} to the message.", path.display())).dim()
                    );
                }
                2 => {
                    let _ = self.session.dispatch(DeedAction::Reset);
                    println!("{} Started a new deed", style("✓").green());
                    return Ok(());
                }
                _ => return Ok(()),
            }
        }
    }
}

/// "Step 3 of 9 · Seller location" style header
pub fn step_header(step: FormStep) -> String {
    match FormStep::data_entry().iter().position(|s| *s == step) {
        Some(i) => format!(
            "{} {}",
            style(format!("Step {} of {}", i + 1, FormStep::data_entry().len())).dim(),
            style(step.label()).bold()
        ),
        None => style(step.label()).bold().to_string(),
    }
}

/// One line per field for the review screen
pub fn review_lines(model: &DeedModel) -> Vec<String> {
    let mut lines = Vec::new();
    let mut group = None;
    for field in FieldId::all() {
        if group != Some(field.group()) {
            group = Some(field.group());
            lines.push(format!("  {}", style(field.group().label()).bold()));
        }
        let value = field.get(model);
        let shown = if value.is_empty() {
            style("(missing)".to_string()).red().to_string()
        } else if field.kind() == FieldKind::Price {
            model
                .sale
                .amount()
                .map(|a| format!("Nu. {}", format_amount(a)))
                .unwrap_or(value)
        } else {
            value
        };
        lines.push(format!("    {:<34} {}", field.label(), shown));
    }
    lines.push(format!("  {}", style("Date").bold()));
    lines.push(format!("    {:<34} {}", "Date of agreement", format_long_date(model.date)));
    lines
}
