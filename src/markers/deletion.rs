//! Deletion markers: `…` where text was removed

use super::{append_target, surroundings, Applied, ApplyResult, MarkerConfig, Surroundings};
use crate::anchor::resolve_or_create;
use crate::diagnostics::DiagnosticKind;
use crate::document::{DocumentNode, TagKind};
use crate::footnote::{marker, Location};

const ELLIPSIS: char = '…';

pub(super) fn apply(
    root: &mut DocumentNode,
    nr: u32,
    location: &Location,
    config: &MarkerConfig,
) -> ApplyResult {
    let path = location.target_path()?;

    // Compile before resolving: a malformed pattern must not leave a
    // synthesized node behind.
    if let Some(pattern) = &location.before_mark {
        super::span::compile(pattern)?;
    }
    if let Some(pattern) = &location.after_mark {
        super::span::compile(pattern)?;
    }

    let resolved = resolve_or_create(root, &path)?;
    let target = append_target(root, &resolved.id);
    let Some(node) = root.get_mut(&target) else {
        return Ok(Applied::default());
    };

    let mut applied = Applied::default();
    let content = node.content.clone();

    let (before, after, closing) = match surroundings(&content, location) {
        Ok(Surroundings { before, after }) => {
            let closing = before.is_empty() && after.is_empty() && content.trim_end().ends_with(']');
            (before, after, closing)
        }
        Err(kind) => {
            applied.warn(kind);
            keep_content(&content)
        }
    };

    let glyph = Glyph {
        leading_space: !(before.is_empty() || before.ends_with('[') || before.ends_with(char::is_whitespace)),
        middle_punctuation: location.middle_punctuation.as_deref().unwrap_or(""),
        closing_bracket: closing,
        space_before_superscript: !(content.is_empty()
            || (resolved.tag == TagKind::Name && resolved.parent_tag == Some(TagKind::Chapter))),
        space_after_superscript: !(after.is_empty() || after.starts_with(']') || after.starts_with('.')),
        superscript: marker(nr),
    }
    .render();

    let glyph = if resolved.tag == TagKind::NrTitle
        && resolved.parent_tag == Some(TagKind::Article)
        && after.is_empty()
    {
        format!("<span class=\"{}\">{}</span>", config.art_deletion_class, glyph)
    } else {
        glyph
    };

    node.content = format!("{}{}{}", before, glyph, after);
    tracing::debug!(footnote = nr, target = %target, "Placed deletion marker");
    Ok(applied)
}

/// Fallback when a mark pattern does not match: existing content stays in
/// front of the glyph, minus a trailing `]` which moves behind the ellipsis
fn keep_content(content: &str) -> (&str, &str, bool) {
    let trimmed = content.trim_end();
    match trimmed.strip_suffix(']') {
        Some(rest) => (rest.trim_end(), "", true),
        None => (trimmed, "", false),
    }
}

struct Glyph<'a> {
    leading_space: bool,
    middle_punctuation: &'a str,
    closing_bracket: bool,
    space_before_superscript: bool,
    space_after_superscript: bool,
    superscript: String,
}

impl Glyph<'_> {
    fn render(&self) -> String {
        let space = |on: bool| if on { " " } else { "" };
        format!(
            "{}{}{}{}{}{}{}",
            space(self.leading_space),
            ELLIPSIS,
            self.middle_punctuation,
            if self.closing_bracket { "]" } else { "" },
            space(self.space_before_superscript),
            self.superscript,
            space(self.space_after_superscript),
        )
    }
}
