//! Non-fatal annotation problems
//!
//! Every location that cannot be placed as recorded yields one [`Diagnostic`].
//! The rest of the law is rendered regardless.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::anchor::{AnchorParseError, ResolveError};

/// What went wrong with a single location
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    #[error("Invalid anchor: {0}")]
    InvalidAnchor(#[from] AnchorParseError),

    #[error("Anchor did not resolve: {0}")]
    AnchorResolution(#[from] ResolveError),

    #[error("Pattern '{pattern}' not found")]
    SpanNotFound { pattern: String },

    #[error("Malformed pattern '{pattern}': {message}")]
    MalformedPattern { pattern: String, message: String },

    #[error("Pointer without surrounding text is not supported")]
    UnsupportedPointer,
}

impl DiagnosticKind {
    /// Short machine-readable name
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::InvalidAnchor(_) => "invalid-anchor",
            DiagnosticKind::AnchorResolution(_) => "anchor-resolution",
            DiagnosticKind::SpanNotFound { .. } => "span-not-found",
            DiagnosticKind::MalformedPattern { .. } => "malformed-pattern",
            DiagnosticKind::UnsupportedPointer => "unsupported-pointer",
        }
    }

    /// Whether the location was dropped entirely rather than placed in a
    /// degraded form
    pub fn is_skip(&self) -> bool {
        !matches!(self, DiagnosticKind::SpanNotFound { .. })
    }
}

/// A problem with one location of one footnote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub footnote_nr: u32,
    /// Nearest enclosing article of the target, when the anchor names one
    pub article_nr: Option<String>,
    /// Index of the location within its footnote
    pub location_index: usize,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Record the diagnostic through `tracing`
    pub fn log(&self) {
        tracing::warn!(
            footnote = self.footnote_nr,
            article = self.article_nr.as_deref().unwrap_or("-"),
            location = self.location_index,
            code = self.kind.code(),
            "{}",
            self.kind
        );
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "footnote {}", self.footnote_nr)?;
        if let Some(article) = &self.article_nr {
            write!(f, " (art. {})", article)?;
        }
        write!(f, ", location {}: {}", self.location_index, self.kind)
    }
}

/// Flattened form for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticRecord {
    pub footnote_nr: u32,
    pub article_nr: Option<String>,
    pub location_index: usize,
    pub code: &'static str,
    pub message: String,
}

impl From<&Diagnostic> for DiagnosticRecord {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            footnote_nr: diagnostic.footnote_nr,
            article_nr: diagnostic.article_nr.clone(),
            location_index: diagnostic.location_index,
            code: diagnostic.kind.code(),
            message: diagnostic.kind.to_string(),
        }
    }
}
