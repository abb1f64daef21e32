//! Page rendering.
//!
//! # Responsibilities
//! - Turn a `PresentationRecord` into the HTML body
//! - Load the built-in template or a configured template file
//!
//! # Design Decisions
//! - Handlebars escapes HTML by default; header values are untrusted
//! - Templates are compiled once at startup, so a broken file fails fast

use handlebars::Handlebars;
use std::path::Path;
use thiserror::Error;

use crate::http::handler::PresentationRecord;

const TEMPLATE_NAME: &str = "index";
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/index.html.hbs");

/// Errors from the presentation layer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read template {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid template: {0}")]
    Template(String),

    #[error("failed to render page: {0}")]
    Render(String),
}

/// Renders presentation records into response bodies.
pub trait Render: Send + Sync {
    fn render(&self, record: &PresentationRecord) -> Result<String, RenderError>;
}

/// Handlebars-backed renderer.
pub struct HandlebarsRenderer {
    handlebars: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Renderer using the built-in page.
    pub fn new() -> Result<Self, RenderError> {
        Self::from_source(DEFAULT_TEMPLATE)
    }

    /// Renderer using a template file from disk.
    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let source = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_source(&source)
    }

    /// Renderer for the configured template, falling back to the built-in page.
    pub fn from_config(template_path: Option<&str>) -> Result<Self, RenderError> {
        match template_path {
            Some(path) => Self::from_file(Path::new(path)),
            None => Self::new(),
        }
    }

    pub fn from_source(source: &str) -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(|e| RenderError::Template(e.to_string()))?;
        Ok(Self { handlebars })
    }
}

impl Render for HandlebarsRenderer {
    fn render(&self, record: &PresentationRecord) -> Result<String, RenderError> {
        self.handlebars
            .render(TEMPLATE_NAME, record)
            .map_err(|e| RenderError::Render(e.to_string()))
    }
}
