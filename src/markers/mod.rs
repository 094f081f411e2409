//! Amendment markers
//!
//! Places range brackets, deletion ellipses and pointer superscripts into the
//! content of a law's nodes.
//!
//! Each applier works on one location and either places its marker, possibly
//! in a degraded form, or leaves the tree untouched and reports why.

mod deletion;
mod pointer;
mod range;
mod schedule;
mod span;

pub use schedule::{schedule, ScheduledLocation};
pub use span::{SpanMatch, SpanMode};

use crate::diagnostics::DiagnosticKind;
use crate::document::{DocumentNode, NodeId, TagKind};
use crate::footnote::{Location, LocationType};

/// Configuration for marker placement
#[derive(Debug, Clone)]
pub struct MarkerConfig {
    /// Class of the span wrapping a whole-article deletion
    pub art_deletion_class: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            art_deletion_class: "art-deletion".to_string(),
        }
    }
}

/// A location that was placed
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Applied {
    /// Problems that degraded the marker without preventing it
    pub warnings: Vec<DiagnosticKind>,
}

impl Applied {
    fn warn(&mut self, kind: DiagnosticKind) {
        self.warnings.push(kind);
    }
}

/// `Ok` when the marker was placed, `Err` when the location was skipped
pub type ApplyResult = Result<Applied, DiagnosticKind>;

/// Apply one location of footnote `nr` to the tree
pub fn apply(
    root: &mut DocumentNode,
    nr: u32,
    location: &Location,
    config: &MarkerConfig,
) -> ApplyResult {
    match location.kind {
        LocationType::Range => range::apply(root, nr, location),
        LocationType::Deletion => deletion::apply(root, nr, location, config),
        LocationType::Pointer => pointer::apply(root, nr, location),
    }
}

/// Node whose content receives text prepended to `id`
///
/// A leading number title is skipped so that an opening bracket lands after
/// it.
fn prepend_target(root: &DocumentNode, id: &NodeId) -> NodeId {
    let Some(node) = root.get(id) else {
        return id.clone();
    };
    if !node.content.is_empty() || node.children.is_empty() {
        return id.clone();
    }

    let next = match node.children.iter().position(|c| c.tag == TagKind::NrTitle) {
        Some(title) if title + 1 < node.children.len() => title + 1,
        _ => 0,
    };
    prepend_target(root, &id.child(next))
}

/// Node whose content receives text appended to `id`
fn append_target(root: &DocumentNode, id: &NodeId) -> NodeId {
    root.last_leaf(id)
}

/// The before/after texts kept around a deletion or pointer glyph
#[derive(Debug, PartialEq, Eq)]
struct Surroundings<'a> {
    before: &'a str,
    after: &'a str,
}

/// Extract the texts matched by the location's before/after patterns
///
/// Patterns are compiled first so that a malformed pattern skips the location
/// before anything else is checked. A pattern that does not match yields
/// `SpanNotFound` with the pattern text.
fn surroundings<'a>(
    content: &'a str,
    location: &Location,
) -> Result<Surroundings<'a>, DiagnosticKind> {
    let before_re = location.before_mark.as_deref().map(span::compile).transpose()?;
    let after_re = location.after_mark.as_deref().map(span::compile).transpose()?;

    let extract = |regex: Option<regex::Regex>, pattern: &Option<String>| match regex {
        Some(regex) => span::capture(content, &regex).ok_or_else(|| DiagnosticKind::SpanNotFound {
            pattern: pattern.clone().unwrap_or_default(),
        }),
        None => Ok(""),
    };

    Ok(Surroundings {
        before: extract(before_re, &location.before_mark)?,
        after: extract(after_re, &location.after_mark)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> DocumentNode {
        DocumentNode::new(TagKind::Article)
            .with_child(DocumentNode::new(TagKind::NrTitle).with_content("1. gr."))
            .with_child(
                DocumentNode::new(TagKind::SubArticle)
                    .with_child(DocumentNode::new(TagKind::Sentence).with_content("A."))
                    .with_child(DocumentNode::new(TagKind::Sentence).with_content("B.")),
            )
    }

    #[test]
    fn test_prepend_skips_nr_title() {
        let art = article();
        assert_eq!(prepend_target(&art, &NodeId::root()), NodeId::from(vec![1, 0]));
    }

    #[test]
    fn test_prepend_to_title_only_node() {
        let art = DocumentNode::new(TagKind::Article)
            .with_child(DocumentNode::new(TagKind::NrTitle).with_content("2. gr."));
        assert_eq!(prepend_target(&art, &NodeId::root()), NodeId::from(vec![0]));
    }

    #[test]
    fn test_append_goes_to_last_leaf() {
        let art = article();
        assert_eq!(append_target(&art, &NodeId::root()), NodeId::from(vec![1, 1]));
    }

    #[test]
    fn test_surroundings_capture_and_miss() {
        let location = Location::new(LocationType::Deletion, "sen")
            .with_marks(Some("^Ráðherra"), Some(r"setur reglugerð\.$"));
        let found = surroundings("Ráðherra getur sett reglugerð. setur reglugerð.", &location).unwrap();
        assert_eq!(found.before, "Ráðherra");
        assert_eq!(found.after, "setur reglugerð.");

        let missing = Location::new(LocationType::Deletion, "sen").with_marks(Some("^Nefnd"), None);
        assert_eq!(
            surroundings("Ráðherra.", &missing),
            Err(DiagnosticKind::SpanNotFound {
                pattern: "^Nefnd".to_string()
            })
        );
    }
}
