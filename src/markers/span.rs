//! Span matching
//!
//! Author patterns are resolved to a literal text once; occurrences of that
//! literal are then counted to honor `repeat` and `instance-num`.

use regex::Regex;

use crate::diagnostics::DiagnosticKind;
use crate::document::{DocumentNode, NodeId};
use crate::footnote::Location;

/// Which occurrences of a span to mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanMode {
    /// Every non-overlapping occurrence
    Repeat,
    /// Only the k-th occurrence, counted from 1
    Instance(usize),
}

impl SpanMode {
    pub fn for_location(location: &Location) -> Self {
        if location.repeat {
            SpanMode::Repeat
        } else {
            SpanMode::Instance(location.instance_num.unwrap_or(1).max(1))
        }
    }
}

/// First resolution of a pattern against some content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanMatch {
    /// Literal text the pattern resolved to
    pub text: String,
    /// Byte offset of the first match
    pub index: usize,
}

/// Compile an author pattern
pub fn compile(pattern: &str) -> Result<Regex, DiagnosticKind> {
    Regex::new(pattern.trim()).map_err(|e| DiagnosticKind::MalformedPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Resolve `regex` against `content`
///
/// When the whole match is empty but the first group captured text, the group
/// is used instead.
pub fn find(content: &str, regex: &Regex) -> Option<SpanMatch> {
    let captures = regex.captures(content)?;
    let whole = captures.get(0)?;
    if !whole.as_str().is_empty() {
        return Some(SpanMatch {
            text: whole.as_str().to_string(),
            index: whole.start(),
        });
    }

    captures
        .get(1)
        .filter(|group| !group.as_str().is_empty())
        .map(|group| SpanMatch {
            text: group.as_str().to_string(),
            index: group.start(),
        })
}

/// Find the first node under `id` (in document order, `id` included) whose
/// content matches `regex`
pub fn find_in_subtree(
    root: &DocumentNode,
    id: &NodeId,
    regex: &Regex,
) -> Option<(NodeId, SpanMatch)> {
    let node = root.get(id)?;
    node.ids_where(|n| !n.content.is_empty())
        .into_iter()
        .find_map(|relative| {
            let content = &node.get(&relative)?.content;
            find(content, regex).map(|m| (id.join(&relative), m))
        })
}

/// Text matched by a before/after-mark pattern, `None` when it does not match
pub fn capture<'a>(content: &'a str, regex: &Regex) -> Option<&'a str> {
    regex.find(content).map(|m| m.as_str())
}

/// Replace the occurrences of `literal` selected by `mode`
///
/// `replace` receives the content preceding each occurrence and returns the
/// replacement text. Returns `None` when the selected occurrence does not
/// exist.
pub fn replace_span<F>(content: &str, literal: &str, mode: SpanMode, mut replace: F) -> Option<String>
where
    F: FnMut(&str) -> String,
{
    if literal.is_empty() {
        return None;
    }

    let positions: Vec<usize> = match mode {
        SpanMode::Repeat => content.match_indices(literal).map(|(i, _)| i).collect(),
        SpanMode::Instance(k) => content
            .match_indices(literal)
            .nth(k.checked_sub(1)?)
            .map(|(i, _)| vec![i])
            .unwrap_or_default(),
    };
    if positions.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(content.len() + positions.len() * 16);
    let mut last = 0;
    for position in positions {
        out.push_str(&content[last..position]);
        out.push_str(&replace(&content[..position]));
        last = position + literal.len();
    }
    out.push_str(&content[last..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TagKind;

    #[test]
    fn test_find_literal() {
        let regex = compile("bar").unwrap();
        let m = find("foo bar foo bar", &regex).unwrap();
        assert_eq!(m, SpanMatch { text: "bar".into(), index: 4 });
    }

    #[test]
    fn test_find_optional_group_and_empty_match() {
        let regex = compile(r"(ráðherra)?").unwrap();
        let m = find("ráðherra skal", &regex).unwrap();
        assert_eq!(m.text, "ráðherra");

        let empty = compile(r"x?(y?)").unwrap();
        assert!(find("abc", &empty).is_none());
    }

    #[test]
    fn test_compile_rejects_lookaround() {
        let err = compile(r"(?<=foo)bar").unwrap_err();
        assert!(matches!(err, DiagnosticKind::MalformedPattern { .. }));
    }

    #[test]
    fn test_replace_second_instance_only() {
        let out = replace_span("foo bar foo bar foo", "foo", SpanMode::Instance(2), |_| "[foo".into());
        assert_eq!(out.as_deref(), Some("foo bar [foo bar foo"));
    }

    #[test]
    fn test_replace_repeat_sees_preceding_text() {
        let mut seen = Vec::new();
        let out = replace_span("a-b c b", "b", SpanMode::Repeat, |before| {
            seen.push(before.to_string());
            "B".into()
        });
        assert_eq!(out.as_deref(), Some("a-B c B"));
        assert_eq!(seen, vec!["a-", "a-b c "]);
    }

    #[test]
    fn test_replace_missing_instance() {
        assert!(replace_span("foo", "foo", SpanMode::Instance(2), |_| String::new()).is_none());
        assert!(replace_span("foo", "bar", SpanMode::Repeat, |_| String::new()).is_none());
    }

    #[test]
    fn test_find_in_subtree_returns_first_matching_leaf() {
        let art = DocumentNode::new(TagKind::Article).with_child(
            DocumentNode::new(TagKind::SubArticle)
                .with_child(DocumentNode::new(TagKind::Sentence).with_content("Fyrsta."))
                .with_child(DocumentNode::new(TagKind::Sentence).with_content("Önnur setning.")),
        );
        let regex = compile("setning").unwrap();
        let (id, m) = find_in_subtree(&art, &NodeId::root(), &regex).unwrap();
        assert_eq!(id, NodeId::from(vec![0, 1]));
        assert_eq!(m.index, "Önnur ".len());
    }
}
