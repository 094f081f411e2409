//! Pointer markers: a bare footnote number, the text is unchanged

use super::{append_target, surroundings, Applied, ApplyResult};
use crate::anchor::{resolve, Side};
use crate::diagnostics::DiagnosticKind;
use crate::document::DocumentNode;
use crate::footnote::{marker, Location};

pub(super) fn apply(root: &mut DocumentNode, nr: u32, location: &Location) -> ApplyResult {
    let path = location.target_path()?;
    let resolved = resolve(root, &path, Side::Start)?;
    let target = append_target(root, &resolved.id);
    let Some(node) = root.get_mut(&target) else {
        return Ok(Applied::default());
    };

    let found = surroundings(&node.content, location)?;
    let before = found.before;
    let mut after = found.after;

    // A pointer with nothing around it would need a combined glyph that
    // has no agreed encoding yet.
    if before.is_empty() && after.is_empty() {
        return Err(DiagnosticKind::UnsupportedPointer);
    }
    if after == "." && before.ends_with('.') {
        after = "";
    }

    node.content = format!("{} {} {}", before, marker(nr), after);

    tracing::debug!(footnote = nr, target = %target, "Placed pointer marker");
    Ok(Applied::default())
}
