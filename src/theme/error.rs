//! Theme engine error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    /// Template failed to parse, or the inheritance chain is broken
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Rendering a parsed template failed
    #[error("Render error: {0}")]
    RenderError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
