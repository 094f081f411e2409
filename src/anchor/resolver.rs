//! Anchor resolution
//!
//! Walks an [`AnchorPath`] from the root of a law to the node it designates.

use thiserror::Error;

use super::types::{AnchorPath, AnchorStep, AttributePredicate, Side, StepSelector};
use crate::document::{DocumentNode, NodeId, TagKind};

/// A node found by resolving an anchor path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub id: NodeId,
    pub tag: TagKind,
    /// Kind of the parent node, `None` when the path resolved to the root
    pub parent_tag: Option<TagKind>,
}

/// Anchor resolution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Step {step_index} ({step}) matched nothing under {parent}")]
    StepNotFound {
        step: String,
        step_index: usize,
        parent: NodeId,
    },
}

/// Resolve `path` against the tree rooted at `root`
///
/// Never modifies the tree; resolving the same path against an unchanged
/// tree always yields the same node.
pub fn resolve(root: &DocumentNode, path: &AnchorPath, side: Side) -> Result<Resolved, ResolveError> {
    let mut id = NodeId::root();
    let mut node = root;
    let mut parent_tag = None;

    for (step_index, step) in effective_steps(root, path) {
        let index = select_child(node, step, side).ok_or_else(|| ResolveError::StepNotFound {
            step: step.to_string(),
            step_index,
            parent: id.clone(),
        })?;
        parent_tag = Some(node.tag.clone());
        node = &node.children[index];
        id = id.child(index);
    }

    Ok(Resolved {
        id,
        tag: node.tag.clone(),
        parent_tag,
    })
}

/// Resolve `path`, appending empty nodes for steps that match nothing
///
/// Used for deletion targets only: an amendment may have removed all text of
/// a node, in which case the node is absent from the consolidated tree.
pub fn resolve_or_create(
    root: &mut DocumentNode,
    path: &AnchorPath,
) -> Result<Resolved, ResolveError> {
    let steps: Vec<(usize, AnchorStep)> = effective_steps(root, path)
        .map(|(i, step)| (i, step.clone()))
        .collect();

    let mut id = NodeId::root();
    let mut node = root;
    let mut parent_tag = None;

    for (step_index, step) in &steps {
        let index = match select_child(node, step, Side::Start) {
            Some(index) => index,
            None => {
                let created = synthesize(node, step).ok_or_else(|| ResolveError::StepNotFound {
                    step: step.to_string(),
                    step_index: *step_index,
                    parent: id.clone(),
                })?;
                tracing::debug!(step = %step, parent = %id, "Synthesized empty node for deletion target");
                created
            }
        };
        parent_tag = Some(node.tag.clone());
        node = &mut node.children[index];
        id = id.child(index);
    }

    Ok(Resolved {
        id,
        tag: node.tag.clone(),
        parent_tag,
    })
}

/// Steps to walk, skipping a leading step that names the root itself
fn effective_steps<'a>(
    root: &DocumentNode,
    path: &'a AnchorPath,
) -> impl Iterator<Item = (usize, &'a AnchorStep)> + 'a {
    let skip_root = path
        .steps
        .first()
        .map(|first| first.tag == TagKind::Law && root.tag == TagKind::Law)
        .unwrap_or(false);

    path.steps.iter().enumerate().skip(usize::from(skip_root))
}

/// Pick the child selected by `step`
fn select_child(node: &DocumentNode, step: &AnchorStep, side: Side) -> Option<usize> {
    let mut candidates = node.children_of_kind(&step.tag);
    match &step.selector {
        StepSelector::First => candidates.next().map(|(index, _)| index),
        StepSelector::Position(position) => candidates
            .nth(position.checked_sub(1)?)
            .map(|(index, _)| index),
        StepSelector::Attributes(predicates) => candidates
            .find(|(_, child)| predicates.iter().all(|p| matches_predicate(child, p, side)))
            .map(|(index, _)| index),
    }
}

fn matches_predicate(node: &DocumentNode, predicate: &AttributePredicate, side: Side) -> bool {
    let Some(actual) = node.attribute(&predicate.name) else {
        return false;
    };
    if actual == predicate.value {
        return true;
    }
    match (predicate.name.as_str(), split_range(&predicate.value)) {
        ("nr", Some((start, end))) => match side {
            Side::Start => actual == start,
            Side::End => actual == end,
        },
        _ => false,
    }
}

/// Split an ordinal range such as `1-4`
fn split_range(value: &str) -> Option<(&str, &str)> {
    let (start, end) = value.split_once('-')?;
    let numeric = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    (numeric(start) && numeric(end)).then_some((start, end))
}

/// Append an empty child for a step that matched nothing, returning its index
///
/// Positional steps only create the node directly following the existing
/// ones; anything further away cannot be placed meaningfully.
fn synthesize(node: &mut DocumentNode, step: &AnchorStep) -> Option<usize> {
    let existing = node.children_of_kind(&step.tag).count();
    let mut created = DocumentNode::new(step.tag.clone());

    match &step.selector {
        StepSelector::First if existing == 0 => {}
        StepSelector::Position(position) if *position == existing + 1 => {}
        StepSelector::Attributes(predicates) => {
            for predicate in predicates {
                if predicate.name == "nr" {
                    created.nr = Some(predicate.value.clone());
                } else {
                    created
                        .attributes
                        .insert(predicate.name.clone(), predicate.value.clone());
                }
            }
        }
        _ => return None,
    }

    node.children.push(created);
    Some(node.children.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::parse;

    fn law() -> DocumentNode {
        DocumentNode::new(TagKind::Law).with_child(
            DocumentNode::new(TagKind::Chapter)
                .with_nr("1")
                .with_child(
                    DocumentNode::new(TagKind::Article)
                        .with_nr("1")
                        .with_child(DocumentNode::new(TagKind::NrTitle).with_content("1. gr."))
                        .with_child(
                            DocumentNode::new(TagKind::SubArticle)
                                .with_nr("1")
                                .with_child(DocumentNode::new(TagKind::Sentence).with_content("First."))
                                .with_child(DocumentNode::new(TagKind::Sentence).with_content("Second.")),
                        ),
                )
                .with_child(DocumentNode::new(TagKind::Article).with_nr("2"))
                .with_child(DocumentNode::new(TagKind::Article).with_nr("3")),
        )
    }

    #[test]
    fn test_resolve_explicit_and_positional_steps() {
        let law = law();
        let path = parse("chapter[@nr='1']/art[@nr='1']/subart[@nr='1']/sen[2]").unwrap();
        let resolved = resolve(&law, &path, Side::Start).unwrap();

        assert_eq!(law.get(&resolved.id).unwrap().content, "Second.");
        assert_eq!(resolved.tag, TagKind::Sentence);
        assert_eq!(resolved.parent_tag, Some(TagKind::SubArticle));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let law = law();
        let path = parse("chapter/art[@nr='1']/nr-title").unwrap();
        let a = resolve(&law, &path, Side::Start).unwrap();
        let b = resolve(&law, &path, Side::Start).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_resolve_skips_leading_law_step() {
        let law = law();
        let path = parse("/law/chapter[@nr='1']/art[@nr='2']").unwrap();
        let resolved = resolve(&law, &path, Side::Start).unwrap();
        assert_eq!(resolved.id, NodeId::from(vec![0, 1]));
    }

    #[test]
    fn test_resolve_range_ordinal_by_side() {
        let law = law();
        let path = parse("chapter[@nr='1']/art[@nr='1-3']").unwrap();
        let start = resolve(&law, &path, Side::Start).unwrap();
        let end = resolve(&law, &path, Side::End).unwrap();
        assert_eq!(law.get(&start.id).unwrap().nr.as_deref(), Some("1"));
        assert_eq!(law.get(&end.id).unwrap().nr.as_deref(), Some("3"));
    }

    #[test]
    fn test_resolve_missing_explicit_ordinal_fails() {
        let law = law();
        let path = parse("chapter[@nr='1']/art[@nr='9']/sen").unwrap();
        let err = resolve(&law, &path, Side::Start).unwrap_err();
        assert_eq!(
            err,
            ResolveError::StepNotFound {
                step: "art[@nr='9']".to_string(),
                step_index: 1,
                parent: NodeId::from(vec![0]),
            }
        );
    }

    #[test]
    fn test_resolve_or_create_appends_missing_sentence() {
        let mut law = law();
        let path = parse("chapter[@nr='1']/art[@nr='2']/sen[1]").unwrap();

        assert!(resolve(&law, &path, Side::Start).is_err());
        let resolved = resolve_or_create(&mut law, &path).unwrap();

        let created = law.get(&resolved.id).unwrap();
        assert_eq!(created.tag, TagKind::Sentence);
        assert!(created.content.is_empty());
        assert_eq!(resolved.parent_tag, Some(TagKind::Article));
    }

    #[test]
    fn test_resolve_or_create_uses_existing_nodes() {
        let mut law = law();
        let before = law.clone();
        let path = parse("chapter[@nr='1']/art[@nr='1']/subart[@nr='1']/sen[1]").unwrap();
        resolve_or_create(&mut law, &path).unwrap();
        assert_eq!(law, before);
    }

    #[test]
    fn test_resolve_or_create_refuses_distant_position() {
        let mut law = law();
        let path = parse("chapter[@nr='1']/art[@nr='3']/sen[3]").unwrap();
        assert!(resolve_or_create(&mut law, &path).is_err());
    }
}
