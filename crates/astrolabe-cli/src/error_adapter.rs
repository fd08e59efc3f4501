//! Error adapter for converting AstrolabeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use astrolabe::{AstrolabeError, DiagramError, export};

/// Adapter giving an [`AstrolabeError`] a diagnostic code, help text and,
/// for description errors, a labeled source snippet.
pub struct ErrorAdapter<'a>(pub &'a AstrolabeError);

impl ErrorAdapter<'_> {
    /// Stable diagnostic code of the wrapped error.
    pub fn code_str(&self) -> &'static str {
        match self.0 {
            AstrolabeError::Diagram(DiagramError::DuplicateIdentifier { .. }) => {
                "astrolabe::duplicate_identifier"
            }
            AstrolabeError::Diagram(DiagramError::DanglingReference { .. }) => {
                "astrolabe::dangling_reference"
            }
            AstrolabeError::Description { .. } => "astrolabe::description",
            AstrolabeError::Config(_) => "astrolabe::config",
            AstrolabeError::Layout(_) => "astrolabe::layout",
            AstrolabeError::Render(_) => "astrolabe::render",
            AstrolabeError::Io(_) => "astrolabe::io",
        }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            AstrolabeError::Diagram(DiagramError::DuplicateIdentifier { .. }) => {
                "node identifiers must be unique within a diagram"
            }
            AstrolabeError::Diagram(DiagramError::DanglingReference { .. }) => {
                "declare both nodes before adding an edge between them"
            }
            AstrolabeError::Render(export::Error::Write { .. }) => {
                "the output directory must exist before rendering"
            }
            AstrolabeError::Render(export::Error::Graphviz(_)) => {
                "install Graphviz or set `render.backend = \"native\"`"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self.0 {
            AstrolabeError::Description { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let AstrolabeError::Description {
            span: Some(span), ..
        } = self.0
        else {
            return None;
        };

        let span = SourceSpan::from(span.clone());
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some("here".to_string()), span),
        )))
    }
}
