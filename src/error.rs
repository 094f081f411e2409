//! Error types for the annotation engine
//!
//! Problems with individual footnote locations are not errors; they are
//! collected as [`Diagnostic`](crate::diagnostics::Diagnostic)s. The variants
//! here abort a pass before it starts.

use thiserror::Error;

/// Engine-wide result type
pub type Result<T> = std::result::Result<T, EngineError>;

/// Fatal engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Payload decoding error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document is already annotated (marker for footnote {nr} present)")]
    AlreadyAnnotated { nr: u32 },
}
