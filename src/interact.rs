//! Capabilities offered to the display layer
//!
//! The display layer owns event handling; it calls into an annotated law
//! through [`Interactive`] to open and close sections, look up inner
//! references and show sub-article numbers.

use std::collections::BTreeSet;
use thiserror::Error;

use crate::document::{DocumentNode, NodeId, TagKind};
use crate::engine::AnnotatedLaw;
use crate::typography::{set_state, ToggleState};

/// Reference lookup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Empty reference")]
    Empty,

    #[error("Unknown word in reference: {0}")]
    UnknownWord(String),

    #[error("Missing number after '{0}'")]
    MissingNumber(String),

    #[error("Nothing in this law matches '{0}'")]
    NotFound(String),
}

/// Operations the display layer may perform on an annotated law
pub trait Interactive {
    /// Flip the section behind a collapse handle, returning its new state
    fn toggle(&mut self, handle: &NodeId) -> Option<ToggleState>;

    /// Open or close every section, returning how many handles changed
    fn set_all_toggles(&mut self, state: ToggleState) -> usize;

    /// HTML of the nodes an inner reference such as `2. mgr. 7. gr.` points to
    fn resolve_reference(&self, text: &str) -> Result<String, ReferenceError>;

    /// Add or remove `N mgr.` labels in front of sub-articles
    fn show_subarticle_numbers(&mut self, show: bool) -> usize;
}

/// One level of an inner reference, outermost first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceStep {
    /// Any of these kinds matches
    pub kinds: Vec<TagKind>,
    /// Any of these numbers matches
    pub nrs: Vec<String>,
}

/// Parse an inner reference
///
/// References are written innermost first (`3. tölul. 1. mgr. 5. gr.`); the
/// returned steps start at the outermost level. `eða` joins two numbers of
/// the same level.
pub fn parse_reference(text: &str) -> Result<Vec<ReferenceStep>, ReferenceError> {
    let mut words: Vec<&str> = text
        .split_whitespace()
        .map(|w| w.trim_matches('.'))
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return Err(ReferenceError::Empty);
    }
    words.reverse();

    let mut words = words.into_iter().peekable();
    let mut steps = Vec::new();

    while let Some(word) = words.next() {
        if let Some(nr) = word.strip_suffix("-lið") {
            steps.push(ReferenceStep {
                kinds: vec![TagKind::NumberedArticle, TagKind::ArtChapter],
                nrs: vec![nr.to_string()],
            });
            continue;
        }

        let kind = match word {
            "gr" => TagKind::Article,
            "mgr" => TagKind::SubArticle,
            "tölul" => TagKind::NumberedArticle,
            other => return Err(ReferenceError::UnknownWord(other.to_string())),
        };
        let first = words
            .next()
            .ok_or_else(|| ReferenceError::MissingNumber(word.to_string()))?;
        let mut nrs = vec![first.to_string()];
        if words.peek() == Some(&"eða") {
            words.next();
            let second = words
                .next()
                .ok_or_else(|| ReferenceError::MissingNumber("eða".to_string()))?;
            nrs.push(second.to_string());
        }
        steps.push(ReferenceStep {
            kinds: vec![kind],
            nrs,
        });
    }
    Ok(steps)
}

/// Nodes matching `steps`, each step searched among all descendants of the
/// previous step's matches
pub fn find_reference(root: &DocumentNode, steps: &[ReferenceStep]) -> Vec<NodeId> {
    let mut current: BTreeSet<NodeId> = BTreeSet::from([NodeId::root()]);

    for step in steps {
        let mut next = BTreeSet::new();
        for id in &current {
            let Some(node) = root.get(id) else {
                continue;
            };
            let matches = node.ids_where(|n| {
                step.kinds.contains(&n.tag)
                    && n.nr.as_ref().map(|nr| step.nrs.contains(nr)).unwrap_or(false)
            });
            next.extend(matches.iter().filter(|m| !m.is_root()).map(|m| id.join(m)));
        }
        current = next;
    }
    current.into_iter().collect()
}

const SUBART_LABEL_CLASS: &str = "mgr";

fn subarticle_label(nr: &str) -> String {
    format!("<span class=\"{}\">{} mgr.</span> ", SUBART_LABEL_CLASS, nr)
}

impl Interactive for AnnotatedLaw {
    fn toggle(&mut self, handle: &NodeId) -> Option<ToggleState> {
        let state = self.toggles.get(handle)?.flipped();
        if !set_state(&mut self.root, handle, state) {
            return None;
        }
        self.toggles.insert(handle.clone(), state);
        Some(state)
    }

    fn set_all_toggles(&mut self, state: ToggleState) -> usize {
        let handles: Vec<NodeId> = self
            .toggles
            .iter()
            .filter(|(_, current)| **current != state)
            .map(|(id, _)| id.clone())
            .collect();

        let mut changed = 0;
        for handle in handles {
            if set_state(&mut self.root, &handle, state) {
                self.toggles.insert(handle, state);
                changed += 1;
            }
        }
        changed
    }

    fn resolve_reference(&self, text: &str) -> Result<String, ReferenceError> {
        let steps = parse_reference(text)?;
        let found = find_reference(&self.root, &steps);
        if found.is_empty() {
            return Err(ReferenceError::NotFound(text.trim().to_string()));
        }
        Ok(found
            .iter()
            .filter_map(|id| self.root.get(id))
            .map(DocumentNode::to_html)
            .collect())
    }

    fn show_subarticle_numbers(&mut self, show: bool) -> usize {
        let subarticles = self.root.ids_where(|n| n.tag == TagKind::SubArticle && n.nr.is_some());
        let mut changed = 0;

        for id in subarticles {
            let Some(subart) = self.root.get(&id) else {
                continue;
            };
            let label = subarticle_label(subart.nr.as_deref().unwrap_or_default());
            let Some(sentence) = subart.ids_where(|n| n.tag == TagKind::Sentence).first().map(|s| id.join(s)) else {
                continue;
            };
            let Some(sentence) = self.root.get_mut(&sentence) else {
                continue;
            };

            match (show, sentence.content.starts_with(&label)) {
                (true, false) => {
                    sentence.content.insert_str(0, &label);
                    changed += 1;
                }
                (false, true) => {
                    sentence.content.replace_range(..label.len(), "");
                    changed += 1;
                }
                _ => {}
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn law() -> DocumentNode {
        let subart = |nr: &str, text: &str| {
            DocumentNode::new(TagKind::SubArticle)
                .with_nr(nr)
                .with_child(DocumentNode::new(TagKind::Sentence).with_content(text))
        };
        DocumentNode::new(TagKind::Law).with_child(
            DocumentNode::new(TagKind::Chapter)
                .with_nr("1")
                .with_child(DocumentNode::new(TagKind::Name).with_content("Kafli"))
                .with_child(
                    DocumentNode::new(TagKind::Article)
                        .with_nr("7")
                        .with_child(DocumentNode::new(TagKind::NrTitle).with_content("7. gr."))
                        .with_child(subart("1", "Fyrsta."))
                        .with_child(subart("2", "Önnur.").with_child(
                            DocumentNode::new(TagKind::NumberedArticle)
                                .with_nr("b")
                                .with_child(DocumentNode::new(TagKind::Sentence).with_content("Liður.")),
                        )),
                ),
        )
    }

    fn annotated() -> AnnotatedLaw {
        let mut root = law();
        let toggles = crate::typography::tag_handles(&mut root, ToggleState::Open);
        AnnotatedLaw {
            root,
            footnotes: vec![],
            diagnostics: vec![],
            toggles,
        }
    }

    #[test]
    fn test_parse_reference_levels() {
        let steps = parse_reference("3. tölul. 1. mgr. 5. gr.").unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].kinds, vec![TagKind::Article]);
        assert_eq!(steps[0].nrs, vec!["5"]);
        assert_eq!(steps[1].kinds, vec![TagKind::SubArticle]);
        assert_eq!(steps[2].kinds, vec![TagKind::NumberedArticle]);
        assert_eq!(steps[2].nrs, vec!["3"]);
    }

    #[test]
    fn test_parse_reference_alternatives_and_letters() {
        let steps = parse_reference("1. eða 2. mgr. 7. gr.").unwrap();
        assert_eq!(steps[1].nrs, vec!["2", "1"]);

        let steps = parse_reference("b-lið 4. gr.").unwrap();
        assert_eq!(steps[1].kinds, vec![TagKind::NumberedArticle, TagKind::ArtChapter]);
        assert_eq!(steps[1].nrs, vec!["b"]);
    }

    #[test]
    fn test_parse_reference_errors() {
        assert_eq!(parse_reference("  "), Err(ReferenceError::Empty));
        assert_eq!(
            parse_reference("2. kafli"),
            Err(ReferenceError::UnknownWord("kafli".to_string()))
        );
        assert_eq!(parse_reference("gr."), Err(ReferenceError::MissingNumber("gr".to_string())));
    }

    #[test]
    fn test_resolve_reference_fragment() {
        let law = annotated();
        let html = law.resolve_reference("2. mgr. 7. gr.").unwrap();
        assert!(html.starts_with("<subart nr=\"2\"><sen>Önnur.</sen>"));

        let html = law.resolve_reference("b-lið 7. gr.").unwrap();
        assert_eq!(html, "<numart nr=\"b\"><sen>Liður.</sen></numart>");

        assert_eq!(
            law.resolve_reference("9. gr."),
            Err(ReferenceError::NotFound("9. gr.".to_string()))
        );
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut law = annotated();
        let handle = NodeId::from(vec![0, 1, 0]);

        assert_eq!(law.toggle(&handle), Some(ToggleState::Closed));
        assert!(law.root.get(&NodeId::from(vec![0, 1, 1])).unwrap().has_class("toggle-hidden"));
        assert_eq!(law.toggle(&handle), Some(ToggleState::Open));
        assert!(!law.root.get(&NodeId::from(vec![0, 1, 1])).unwrap().has_class("toggle-hidden"));
        assert_eq!(law.toggle(&NodeId::from(vec![0, 1, 1])), None);
    }

    #[test]
    fn test_set_all_toggles() {
        let mut law = annotated();
        assert_eq!(law.set_all_toggles(ToggleState::Closed), 2);
        assert_eq!(law.set_all_toggles(ToggleState::Closed), 0);
        assert!(law.toggles.values().all(|s| *s == ToggleState::Closed));
    }

    #[test]
    fn test_subarticle_numbers() {
        let mut law = annotated();
        assert_eq!(law.show_subarticle_numbers(true), 2);
        assert_eq!(law.show_subarticle_numbers(true), 0);
        let first = &law.root.children[0].children[1].children[1].children[0];
        assert_eq!(first.content, "<span class=\"mgr\">1 mgr.</span> Fyrsta.");

        assert_eq!(law.show_subarticle_numbers(false), 2);
        let first = &law.root.children[0].children[1].children[1].children[0];
        assert_eq!(first.content, "Fyrsta.");
    }
}
