//! Error type returned by report generation.

use std::io;

use crate::config::ConfigError;
use crate::record::{FormError, ValidationError};

/// Everything that can stop a report from being produced.
///
/// Translation failures never show up here; they degrade to English text and
/// are listed in [`crate::GeneratedReport::warnings`].
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to load fonts: {0}")]
    FontLoad(#[source] genpdf::error::Error),

    #[error("failed to render PDF: {0}")]
    Render(#[from] genpdf::error::Error),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ReviewError {
    /// Whether the error was caused by missing or unreadable font files.
    pub fn is_font_error(&self) -> bool {
        matches!(self, ReviewError::FontLoad(_))
    }
}
