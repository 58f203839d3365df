//! Export, print and mail hand-off for the finished deed

use miette::Diagnostic;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::step::FormStep;
use crate::entities::deed::DeedModel;
use crate::schema::document::DeedDocument;
use crate::schema::layout::layout;
use crate::schema::pdf::write_pdf;
use crate::schema::template::{TemplateError, TemplateGenerator};
use crate::schema::validator::validate_all;

/// Stem used when the vehicle has no registration number yet
pub const FALLBACK_STEM: &str = "Document";
pub const FILE_PREFIX: &str = "Vehicle_Sale_Deed_";
pub const MAIL_SUBJECT_PREFIX: &str = "Vehicle Sale Deed - ";
pub const MAIL_BODY: &str = "Please find the Vehicle Sale Deed attached.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Pdf,
    Html,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Html => "html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("The deed is incomplete: {count} field(s) need attention")]
    #[diagnostic(
        code(deed::export::incomplete),
        help("run `deed check` to list them, or `deed start --at {step}` to fill them in")
    )]
    Incomplete { count: usize, step: FormStep },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No print command configured")]
    #[diagnostic(help("set print_command in the config file or DEED_PRINT_COMMAND"))]
    NoPrintCommand,

    #[error("Failed to run print command '{command}': {source}")]
    PrintSpawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Print command '{command}' exited with {status}")]
    PrintFailed { command: String, status: ExitStatus },
}

/// Registration number, or the fallback when none is entered
pub fn document_stem(model: &DeedModel) -> String {
    let reg = model.vehicle.registration_number.trim();
    if reg.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        reg.to_string()
    }
}

/// Output file name, e.g. `Vehicle_Sale_Deed_BP-1-A1234.pdf`
pub fn file_name(model: &DeedModel, format: ExportFormat) -> String {
    let stem: String = document_stem(model)
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("{}{}.{}", FILE_PREFIX, stem, format.extension())
}

/// Render the deed in the requested format, without checking completeness
pub fn render(model: &DeedModel, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let doc = DeedDocument::build(model);
    match format {
        ExportFormat::Pdf => Ok(write_pdf(&layout(&doc))),
        ExportFormat::Html => {
            let generator = TemplateGenerator::new()?;
            Ok(generator.render_html(&doc)?.into_bytes())
        }
    }
}

/// Refuse a deed that does not pass validation of every step
pub fn ensure_complete(model: &DeedModel) -> Result<(), ExportError> {
    let failures = validate_all(model);
    let first = failures.iter().next().map(|(field, _)| field);
    match first {
        None => Ok(()),
        Some(field) => Err(ExportError::Incomplete {
            count: failures.len(),
            step: field.step(),
        }),
    }
}

/// Validate, render and write the deed into `dir`, returning the file path
pub fn export(model: &DeedModel, format: ExportFormat, dir: &Path) -> Result<PathBuf, ExportError> {
    ensure_complete(model)?;
    let bytes = render(model, format)?;

    let io_err = |path: &Path, source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    let path = dir.join(file_name(model, format));
    fs::write(&path, &bytes).map_err(|e| io_err(&path, e))?;

    info!(path = %path.display(), format = %format, bytes = bytes.len(), "deed exported");
    Ok(path)
}

/// Export a PDF into `dir` and hand it to the host print command
///
/// `command` is split on whitespace; the file path is appended as the last
/// argument.
pub fn print(model: &DeedModel, command: &str, dir: &Path) -> Result<PathBuf, ExportError> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or(ExportError::NoPrintCommand)?;
    let args: Vec<&str> = parts.collect();

    let path = export(model, ExportFormat::Pdf, dir)?;
    debug!(program, ?args, path = %path.display(), "invoking print command");

    let status = Command::new(program)
        .args(&args)
        .arg(&path)
        .status()
        .map_err(|source| ExportError::PrintSpawn {
            command: command.to_string(),
            source,
        })?;
    if !status.success() {
        return Err(ExportError::PrintFailed {
            command: command.to_string(),
            status,
        });
    }
    Ok(path)
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Mail subject naming the vehicle
pub fn mail_subject(model: &DeedModel) -> String {
    format!("{}{}", MAIL_SUBJECT_PREFIX, document_stem(model))
}

/// `mailto:` link with the subject and body pre-filled
///
/// The file itself cannot be attached through a link; the user attaches
/// the exported PDF by hand.
pub fn mailto_link(model: &DeedModel, to: Option<&str>) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        to.map(encode_uri_component).unwrap_or_default(),
        encode_uri_component(&mail_subject(model)),
        encode_uri_component(MAIL_BODY)
    )
}
