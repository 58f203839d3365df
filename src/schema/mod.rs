//! Schema system - validation, the deed template and its renderers

pub mod document;
pub mod export;
pub mod layout;
pub mod pdf;
pub mod template;
pub mod text;
pub mod validator;
pub mod wizard;

pub use document::DeedDocument;
pub use export::{ExportError, ExportFormat};
pub use template::{TemplateError, TemplateGenerator};
pub use validator::{StepGateError, ValidationErrors, Validator};
pub use wizard::DeedWizard;
