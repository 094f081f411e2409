//! Document model
//!
//! The typed consolidated-text tree and its HTML rendering.

mod html;
mod types;

pub use html::{map_text, strip_tags};
pub use types::{DocumentNode, NodeId, TagKind};
