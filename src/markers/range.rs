//! Range markers: `[` ... `] N)` around inserted or replaced text

use regex::Regex;
use std::sync::LazyLock;

use super::span::{self, SpanMode};
use super::{append_target, prepend_target, Applied, ApplyResult};
use crate::anchor::{resolve, Resolved, Side};
use crate::diagnostics::DiagnosticKind;
use crate::document::{DocumentNode, NodeId, TagKind};
use crate::footnote::{marker, Location};

/// Punctuation that moves in front of a closing superscript
const END_SYMBOLS: [char; 3] = [',', '.', ':'];

/// A sentence already closed by an earlier marker: `.<sup>3)</sup>`
static CLOSED_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.\s*<sup>\d+\)</sup>\s*$").expect("valid closed tail pattern")
});

pub(super) fn apply(root: &mut DocumentNode, nr: u32, location: &Location) -> ApplyResult {
    let (start_path, end_path) = location.range_paths()?;
    let start = resolve(root, &start_path, Side::Start)?;
    let end = resolve(root, &end_path, Side::End)?;

    let start_words = compile_words(location.start_words())?;
    let end_words = compile_words(location.end_words())?;

    let mode = SpanMode::for_location(location);
    let mut applied = Applied::default();

    match &start_words {
        Some((pattern, regex)) => {
            if !open_at_words(root, &start.id, regex, mode) {
                applied.warn(DiagnosticKind::SpanNotFound {
                    pattern: pattern.to_string(),
                });
                open_at_anchor(root, &start.id);
            }
        }
        None => {
            strip_closed_tail(root, &start.id);
            open_at_anchor(root, &start.id);
        }
    }

    let closing = Closing::new(root, nr, location, &end);
    let closed_in = match &end_words {
        Some((pattern, regex)) => match close_at_words(root, &closing.target, regex, mode, &closing) {
            Some(id) => id,
            None => {
                applied.warn(DiagnosticKind::SpanNotFound {
                    pattern: pattern.to_string(),
                });
                close_at_anchor(root, &closing)
            }
        },
        None => close_at_anchor(root, &closing),
    };

    if let Some(node) = root.get_mut(&closed_in) {
        node.content = swap_end_symbols(&node.content, &closing.superscript);
    }

    tracing::debug!(footnote = nr, start = %start.id, end = %closed_in, "Placed range marker");
    Ok(applied)
}

fn compile_words(words: Option<&str>) -> Result<Option<(&str, Regex)>, DiagnosticKind> {
    words
        .map(|pattern| span::compile(pattern).map(|regex| (pattern, regex)))
        .transpose()
}

/// Insert `[` before the selected occurrence(s) of the span
fn open_at_words(root: &mut DocumentNode, id: &NodeId, regex: &Regex, mode: SpanMode) -> bool {
    let Some((target, found)) = span::find_in_subtree(root, id, regex) else {
        return false;
    };
    let Some(node) = root.get_mut(&target) else {
        return false;
    };

    let replaced = span::replace_span(&node.content, &found.text, mode, |before| {
        format!("{}[{}", opening_space(before), found.text)
    });
    match replaced {
        Some(content) => {
            node.content = content;
            true
        }
        None => false,
    }
}

/// Space to put before an opening bracket placed after `before`
fn opening_space(before: &str) -> &'static str {
    match before.chars().last() {
        None => "",
        Some(c) if c.is_whitespace() || c == '[' || is_dash(c) => "",
        Some(_) => " ",
    }
}

fn is_dash(c: char) -> bool {
    matches!(c, '-' | '\u{2010}'..='\u{2015}')
}

/// Insert `[` at the start of the node, after a leading number title
fn open_at_anchor(root: &mut DocumentNode, id: &NodeId) {
    let target = prepend_target(root, id);
    if let Some(node) = root.get_mut(&target) {
        node.content.insert(0, '[');
    }
}

/// Drop a trailing `.` and superscript from the end of the node
fn strip_closed_tail(root: &mut DocumentNode, id: &NodeId) {
    let target = append_target(root, id);
    let Some(node) = root.get_mut(&target) else {
        return;
    };
    if let Some(tail) = CLOSED_TAIL.find(&node.content) {
        let start = tail.start();
        node.content.truncate(start);
    }
}

/// Everything about the closing side that does not depend on the span
struct Closing {
    /// Node the closing marker goes into, after table redirection
    target: NodeId,
    pre_close_space: &'static str,
    post_space: &'static str,
    combined_with_closing: String,
    middle_punctuation: String,
    superscript: String,
}

impl Closing {
    fn new(root: &DocumentNode, nr: u32, location: &Location, end: &Resolved) -> Self {
        let target = table_redirect(root, &end.id).unwrap_or_else(|| end.id.clone());
        let redirected_to_cell = root
            .get(&target)
            .map(|n| n.tag == TagKind::TableCell)
            .unwrap_or(false);

        let parent_is = |tag: TagKind| end.parent_tag.as_ref() == Some(&tag);

        let pre_close_space = if end.tag == TagKind::NrTitle && parent_is(TagKind::NumberedArticle) {
            " "
        } else {
            ""
        };
        let post_space = if end.tag == TagKind::Name
            || (end.tag == TagKind::NrTitle && parent_is(TagKind::Article))
            || end.tag == TagKind::TableCell
            || redirected_to_cell
        {
            ""
        } else {
            " "
        };

        Self {
            target,
            pre_close_space,
            post_space,
            combined_with_closing: location.combined_with_closing.clone().unwrap_or_default(),
            middle_punctuation: location.middle_punctuation.clone().unwrap_or_default(),
            superscript: marker(nr),
        }
    }

    /// `] <sup>N)</sup>` with the configured punctuation and spacing
    fn text(&self) -> String {
        format!(
            "{}]{}{}{}{}",
            self.pre_close_space,
            self.combined_with_closing,
            self.middle_punctuation,
            self.post_space,
            self.superscript
        )
    }
}

/// Last cell of the last row of a table inside `id`, if there is one
fn table_redirect(root: &DocumentNode, id: &NodeId) -> Option<NodeId> {
    let node = root.get(id)?;
    let table = id.join(node.ids_where(|n| n.tag == TagKind::Table).first()?);
    let table_node = root.get(&table)?;
    let row = table.join(table_node.ids_where(|n| n.tag == TagKind::TableRow).last()?);
    let (cell, _) = root.get(&row)?.children_of_kind(&TagKind::TableCell).last()?;
    Some(row.child(cell))
}

/// Close after the selected occurrence(s) of the span, returning the node
/// that was changed
fn close_at_words(
    root: &mut DocumentNode,
    id: &NodeId,
    regex: &Regex,
    mode: SpanMode,
    closing: &Closing,
) -> Option<NodeId> {
    let (target, found) = span::find_in_subtree(root, id, regex)?;
    let node = root.get_mut(&target)?;

    let kept = match closing.middle_punctuation.as_str() {
        "" => found.text.as_str(),
        middle => found.text.strip_suffix(middle).unwrap_or(&found.text),
    };
    let replacement = format!("{}{}", kept, closing.text());

    node.content = span::replace_span(&node.content, &found.text, mode, |_| replacement.clone())?;
    Some(target)
}

/// Append the closing marker to the end of the node
fn close_at_anchor(root: &mut DocumentNode, closing: &Closing) -> NodeId {
    let target = append_target(root, &closing.target);
    if let Some(node) = root.get_mut(&target) {
        let trimmed_len = node.content.trim_end().len();
        node.content.truncate(trimmed_len);
        node.content.push_str(&closing.text());
    }
    target
}

/// Move `,` `.` `:` directly following the superscript in front of it
fn swap_end_symbols(content: &str, superscript: &str) -> String {
    let mut content = content.to_string();
    for symbol in END_SYMBOLS {
        content = content
            .replace(
                &format!(" {}{}", superscript, symbol),
                &format!("{} {}", symbol, superscript),
            )
            .replace(
                &format!("{}{}", superscript, symbol),
                &format!("{}{}", symbol, superscript),
            );
    }
    content
}
