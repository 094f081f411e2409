//! Lagasafn Annotate
//!
//! Places amendment markers into consolidated legal texts. Each footnote of a
//! law records where an amendment changed the text; the engine turns those
//! records into `[...] N)` ranges, `… N)` deletions and bare `N)` pointers,
//! renders the footnote blocks and applies the typographic passes the reader
//! expects.
//!
//! # Modules
//!
//! - `document`: The consolidated-text tree and its HTML rendering
//! - `anchor`: Anchor path parsing and resolution against the tree
//! - `footnote`: Footnote and location records, footnote block rendering
//! - `markers`: Range, deletion and pointer placement, and their ordering
//! - `typography`: Post-marker text decorations and collapse handles
//! - `engine`: The annotation pass tying the above together
//! - `interact`: Operations the display layer performs afterwards

pub mod anchor;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod engine;
pub mod error;
pub mod footnote;
pub mod interact;
pub mod markers;
pub mod typography;

pub use config::Config;
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticRecord};
pub use document::{DocumentNode, NodeId, TagKind};
pub use engine::{AnnotatedLaw, Engine, LawDocument};
pub use error::{EngineError, Result};
pub use footnote::{Footnote, Location, LocationType, RenderedFootnote};
pub use interact::{Interactive, ReferenceError};
