//! Error types for Astrolabe operations.
//!
//! [`AstrolabeError`] is returned by every fallible entry point of the
//! library. Diagram construction errors from `astrolabe-core` and exporter
//! failures convert into it with `?`.

use std::{io, ops::Range};

use thiserror::Error;

use astrolabe_core::diagram::DiagramError;

use crate::export;

/// The main error type for Astrolabe operations.
///
/// # Diagnostic Variants
///
/// The `Description` variant keeps the offending source text and, when
/// known, the byte span of the problem, so front ends can point at it.
#[derive(Debug, Error)]
pub enum AstrolabeError {
    #[error(transparent)]
    Diagram(#[from] DiagramError),

    #[error("Invalid diagram description: {message}")]
    Description {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Render error: {0}")]
    Render(#[from] export::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl AstrolabeError {
    /// Create a new `Description` error with the associated source text.
    pub fn new_description_error(
        message: impl Into<String>,
        span: Option<Range<usize>>,
        src: impl Into<String>,
    ) -> Self {
        Self::Description {
            message: message.into(),
            span,
            src: src.into(),
        }
    }
}
