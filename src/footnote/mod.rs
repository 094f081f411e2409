//! Footnotes
//!
//! Amendment records as delivered with a law, and the rendering of their
//! description blocks.

mod presenter;
mod types;

pub use presenter::{marker, present, render, RenderedFootnote};
pub use types::{Footnote, Location, LocationType, SubAnchor};
