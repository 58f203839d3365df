//! Markup rendering of the deed through embedded Tera templates

use miette::Diagnostic;
use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::schema::document::DeedDocument;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Name of the printable deed template; the `.html` suffix turns on escaping
pub const DEED_TEMPLATE: &str = "deed.html";

/// Template generator backed by the embedded template folder
pub struct TemplateGenerator {
    tera: Tera,
}

#[derive(Debug, Error, Diagnostic)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    #[diagnostic(code(deed::template::not_found))]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    #[diagnostic(code(deed::template::render))]
    RenderError(String),
}

impl TemplateGenerator {
    /// Create a new template generator with embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render the deed as a standalone printable page
    pub fn render_html(&self, doc: &DeedDocument) -> Result<String, TemplateError> {
        if !self.tera.get_template_names().any(|n| n == DEED_TEMPLATE) {
            return Err(TemplateError::NotFound(DEED_TEMPLATE.to_string()));
        }
        let context = tera::Context::from_serialize(doc)
            .map_err(|e| TemplateError::RenderError(e.to_string()))?;
        self.tera
            .render(DEED_TEMPLATE, &context)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}
