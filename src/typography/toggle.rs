//! Collapse handles
//!
//! The name (or, lacking one, the number title) of each chapter and article
//! is tagged as the handle that opens and closes the section. The state is
//! recorded on the handle and reflected as a class on the section's other
//! children.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::document::{DocumentNode, NodeId, TagKind};

pub const HANDLE_CLASS: &str = "toggle-button";
pub const HIDDEN_CLASS: &str = "toggle-hidden";
pub const STATE_ATTRIBUTE: &str = "data-state";
pub const NR_ATTRIBUTE: &str = "data-chapter-nr";

/// Whether a section is expanded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleState {
    #[default]
    Open,
    Closed,
}

impl ToggleState {
    pub fn flipped(self) -> Self {
        match self {
            ToggleState::Open => ToggleState::Closed,
            ToggleState::Closed => ToggleState::Open,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToggleState::Open => "open",
            ToggleState::Closed => "closed",
        }
    }
}

impl fmt::Display for ToggleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToggleState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(ToggleState::Open),
            "closed" => Ok(ToggleState::Closed),
            other => Err(format!("unknown toggle state '{}'", other)),
        }
    }
}

/// Handle ids and their current state
pub type Toggles = BTreeMap<NodeId, ToggleState>;

/// Tag the handle of every chapter and article
pub fn tag_handles(root: &mut DocumentNode, initial: ToggleState) -> Toggles {
    let sections = root.ids_where(|n| matches!(n.tag, TagKind::Chapter | TagKind::Article));
    let mut toggles = Toggles::new();

    for section_id in sections {
        let Some(section) = root.get_mut(&section_id) else {
            continue;
        };
        let Some(index) = handle_index(section) else {
            continue;
        };
        let nr = section.nr.clone();
        let handle = &mut section.children[index];
        handle.add_class(HANDLE_CLASS);
        if let Some(nr) = nr {
            handle.attributes.insert(NR_ATTRIBUTE.to_string(), nr);
        }

        let handle_id = section_id.child(index);
        set_state(root, &handle_id, initial);
        toggles.insert(handle_id, initial);
    }
    toggles
}

fn handle_index(section: &DocumentNode) -> Option<usize> {
    section
        .children_of_kind(&TagKind::Name)
        .next()
        .or_else(|| section.children_of_kind(&TagKind::NrTitle).next())
        .map(|(index, _)| index)
}

/// Apply `state` to the handle at `handle` and its siblings
///
/// Returns `false` when `handle` is not a tagged handle.
pub fn set_state(root: &mut DocumentNode, handle: &NodeId, state: ToggleState) -> bool {
    let is_handle = root
        .get(handle)
        .map(|n| n.has_class(HANDLE_CLASS))
        .unwrap_or(false);
    let Some(parent) = handle.parent().and_then(|p| root.get_mut(&p)) else {
        return false;
    };
    if !is_handle {
        return false;
    }

    for child in parent.children.iter_mut() {
        if child.has_class(HANDLE_CLASS) {
            child
                .attributes
                .insert(STATE_ATTRIBUTE.to_string(), state.as_str().to_string());
        }
        if child.tag.is_handle() || state == ToggleState::Open {
            child.remove_class(HIDDEN_CLASS);
        } else {
            child.add_class(HIDDEN_CLASS);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn law() -> DocumentNode {
        DocumentNode::new(TagKind::Law).with_child(
            DocumentNode::new(TagKind::Chapter)
                .with_nr("1")
                .with_child(DocumentNode::new(TagKind::NrTitle).with_content("I. kafli"))
                .with_child(DocumentNode::new(TagKind::Name).with_content("Gildissvið"))
                .with_child(
                    DocumentNode::new(TagKind::Article)
                        .with_nr("1")
                        .with_child(DocumentNode::new(TagKind::NrTitle).with_content("1. gr."))
                        .with_child(DocumentNode::new(TagKind::Sentence).with_content("Texti.")),
                ),
        )
    }

    #[test]
    fn test_handles_prefer_name() {
        let mut law = law();
        let toggles = tag_handles(&mut law, ToggleState::Open);

        assert_eq!(toggles.len(), 2);
        let chapter = &law.children[0];
        assert!(chapter.children[1].has_class(HANDLE_CLASS));
        assert!(!chapter.children[0].has_class(HANDLE_CLASS));
        assert_eq!(chapter.children[1].attributes[NR_ATTRIBUTE], "1");
        assert_eq!(chapter.children[1].attributes[STATE_ATTRIBUTE], "open");

        let article = &chapter.children[2];
        assert!(article.children[0].has_class(HANDLE_CLASS));
    }

    #[test]
    fn test_closed_state_hides_content() {
        let mut law = law();
        tag_handles(&mut law, ToggleState::Closed);

        let article = &law.children[0].children[2];
        assert!(article.children[1].has_class(HIDDEN_CLASS));
        assert!(!article.children[0].has_class(HIDDEN_CLASS));
        assert_eq!(article.children[0].attributes[STATE_ATTRIBUTE], "closed");
    }

    #[test]
    fn test_set_state_rejects_non_handles() {
        let mut law = law();
        tag_handles(&mut law, ToggleState::Open);
        assert!(!set_state(&mut law, &NodeId::from(vec![0, 2, 1]), ToggleState::Closed));
        assert!(!set_state(&mut law, &NodeId::root(), ToggleState::Closed));
    }

    #[test]
    fn test_toggle_state_parsing() {
        assert_eq!("Closed".parse::<ToggleState>(), Ok(ToggleState::Closed));
        assert!("ajar".parse::<ToggleState>().is_err());
        assert_eq!(ToggleState::Open.flipped(), ToggleState::Closed);
    }
}
