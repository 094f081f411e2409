//! Definition emphasis
//!
//! A paragraph may carry a `definitions` child listing the terms it defines.
//! Every occurrence of such a term in the paragraph's sentences is set in
//! italics, or in bold when the definition asks for it.

use regex::{Captures, Regex};
use std::collections::HashMap;

use crate::document::{map_text, DocumentNode, TagKind};

/// Emphasize defined terms in every paragraph of the tree, returning the
/// number of sentences changed
pub fn apply(root: &mut DocumentNode) -> usize {
    let mut changed = 0;
    root.visit_mut(&mut |node| {
        if node.tag == TagKind::Paragraph {
            changed += emphasize_paragraph(node);
        }
    });
    changed
}

fn emphasize_paragraph(paragraph: &mut DocumentNode) -> usize {
    let terms = collect_terms(paragraph);
    if terms.is_empty() {
        return 0;
    }

    let mut ordered: Vec<&str> = terms.keys().map(String::as_str).collect();
    ordered.sort_by_key(|t| std::cmp::Reverse(t.len()));
    let alternation = ordered.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    let Ok(pattern) = Regex::new(&alternation) else {
        return 0;
    };

    let mut changed = 0;
    for child in paragraph.children.iter_mut() {
        if child.tag == TagKind::Definitions {
            continue;
        }
        child.visit_mut(&mut |node| {
            if node.tag != TagKind::Sentence || !pattern.is_match(&node.content) {
                return;
            }
            node.content = map_text(&node.content, |text| {
                pattern
                    .replace_all(text, |caps: &Captures| {
                        let term = &caps[0];
                        let tag = if terms.get(term).copied().unwrap_or(false) { "b" } else { "i" };
                        format!("<{tag}>{term}</{tag}>")
                    })
                    .into_owned()
            });
            changed += 1;
        });
    }
    changed
}

/// Defined terms of a paragraph, mapped to whether they are set in bold
fn collect_terms(paragraph: &DocumentNode) -> HashMap<String, bool> {
    paragraph
        .children_of_kind(&TagKind::Definitions)
        .flat_map(|(_, definitions)| definitions.children_of_kind(&TagKind::Definition))
        .filter_map(|(_, definition)| {
            let term = definition.plain_text().trim().to_string();
            (!term.is_empty()).then(|| (term, definition.attribute("style") == Some("bold")))
        })
        .collect()
}
