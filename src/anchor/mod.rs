//! Anchor paths
//!
//! Parsing and resolution of the paths that tie a footnote location to a
//! node of the consolidated-text tree.
//!
//! # Example path
//!
//! ```text
//! chapter[@nr='2']/art[@nr='7']/subart[2]/sen[1]
//! │                │             │         └── first sentence
//! │                │             └──────────── second sub-article (by position)
//! │                └────────────────────────── article numbered 7
//! └─────────────────────────────────────────── chapter numbered 2
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use crate::anchor::{parse, resolve, Side};
//!
//! let path = parse("art[@nr='3']/sen[2]")?;
//! let resolved = resolve(&law, &path, Side::Start)?;
//! ```

mod parser;
mod resolver;
mod types;

pub use types::{AnchorPath, AnchorSpec, AnchorStep, AttributePredicate, RawStep, Side, StepSelector};

pub use parser::{parse, AnchorParseError};

pub use resolver::{resolve, resolve_or_create, ResolveError, Resolved};
