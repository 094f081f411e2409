//! Law-level decorations: the source link next to the law's name and the
//! minister clause markup

use crate::document::{DocumentNode, TagKind};

/// Append a link to the law's official source after its top-level name
pub fn append_source_link(root: &mut DocumentNode, href: &str, icon: &str) -> bool {
    let Some(name) = root.children.iter_mut().find(|c| c.tag == TagKind::Name) else {
        return false;
    };
    name.content.push_str(&format!(
        " <a target=\"_blank\" href=\"{}\"><img src=\"{}\" /></a>",
        html_escape::encode_double_quoted_attribute(href),
        html_escape::encode_double_quoted_attribute(icon),
    ));
    true
}

/// The minister clause is stored entity-escaped; make it render as markup
pub fn unescape_minister_clause(root: &mut DocumentNode) -> bool {
    let mut found = false;
    for clause in root
        .children
        .iter_mut()
        .filter(|c| c.tag == TagKind::MinisterClause)
    {
        clause.content = html_escape::decode_html_entities(&clause.content).into_owned();
        found = true;
    }
    found
}
