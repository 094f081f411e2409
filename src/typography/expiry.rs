//! Expiry symbol placement
//!
//! A sentence with an `expiry-symbol-offset` attribute gets `…` at that
//! character offset of its tag-free text. Any bare `…` already in the
//! sentence is moved there.
//!
//! Sentences that already carry footnote markers are left alone; the offset
//! refers to unmarked text.

use crate::document::{DocumentNode, TagKind};

pub const OFFSET_ATTRIBUTE: &str = "expiry-symbol-offset";

const SYMBOL: char = '…';

/// Place expiry symbols, returning the number of sentences changed
pub fn apply(root: &mut DocumentNode) -> usize {
    let mut placed = 0;
    root.visit_mut(&mut |node| {
        if node.tag != TagKind::Sentence {
            return;
        }
        let Some(raw) = node.attributes.remove(OFFSET_ATTRIBUTE) else {
            return;
        };
        let Ok(offset) = raw.trim().parse::<usize>() else {
            tracing::debug!(offset = %raw, "Ignoring malformed expiry offset");
            return;
        };
        if node.content.contains("<sup>") {
            tracing::debug!(offset, "Skipping expiry symbol in marked sentence");
            return;
        }
        if let Some(content) = place(&node.content, offset) {
            node.content = content;
            placed += 1;
        }
    });
    placed
}

/// Insert the symbol at `offset` characters of text, skipping tags
fn place(content: &str, offset: usize) -> Option<String> {
    let stripped: String = content.chars().filter(|&c| c != SYMBOL).collect();

    let mut out = String::with_capacity(stripped.len() + SYMBOL.len_utf8());
    let mut seen = 0;
    let mut in_tag = false;
    let mut inserted = false;

    for ch in stripped.chars() {
        if !in_tag && seen == offset && !inserted {
            out.push(SYMBOL);
            inserted = true;
        }
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => seen += 1,
            _ => {}
        }
        out.push(ch);
    }

    if !inserted {
        if seen != offset {
            return None;
        }
        out.push(SYMBOL);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_at_offset() {
        assert_eq!(place("Gildir til 2030.", 10).as_deref(), Some("Gildir til… 2030."));
        assert_eq!(place("Texti", 5).as_deref(), Some("Texti…"));
    }

    #[test]
    fn test_existing_symbol_is_moved() {
        assert_eq!(place("…Texti", 5).as_deref(), Some("Texti…"));
    }

    #[test]
    fn test_offset_counts_text_only() {
        assert_eq!(place("<i>ab</i>cd", 2).as_deref(), Some("<i>ab…</i>cd"));
    }

    #[test]
    fn test_offset_past_end() {
        assert!(place("ab", 5).is_none());
    }

    #[test]
    fn test_apply_skips_marked_sentences() {
        let mut law = DocumentNode::new(TagKind::Law)
            .with_child(
                DocumentNode::new(TagKind::Sentence)
                    .with_content("Texti")
                    .with_attribute(OFFSET_ATTRIBUTE, "5"),
            )
            .with_child(
                DocumentNode::new(TagKind::Sentence)
                    .with_content("[Texti] <sup>1)</sup>")
                    .with_attribute(OFFSET_ATTRIBUTE, "2"),
            );

        assert_eq!(apply(&mut law), 1);
        assert_eq!(law.children[0].content, "Texti…");
        assert_eq!(law.children[1].content, "[Texti] <sup>1)</sup>");
        assert!(law.children[0].attributes.is_empty());
    }
}
