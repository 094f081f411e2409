//! HTML rendering of the consolidated-text tree
//!
//! Nodes are rendered as custom elements named after their tag kind, which is
//! what the display layer styles. A node's own content comes first, followed
//! by its children.

use std::cell::Cell;
use std::rc::Rc;

use lol_html::html_content::{ContentType, Element, EndTag};
use lol_html::{doc_text, element, rewrite_str, RewriteStrSettings};

use super::types::{DocumentNode, TagKind};

impl DocumentNode {
    /// Render this node and its subtree as HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(self, &mut out);
        out
    }

    /// The node's own content with all markup removed
    pub fn plain_text(&self) -> String {
        strip_tags(&self.content)
    }
}

fn write_node(node: &DocumentNode, out: &mut String) {
    // Definition lists only drive emphasis of their terms and are not displayed.
    if node.tag == TagKind::Definitions {
        return;
    }

    let tag = node.tag.as_str();
    out.push('<');
    out.push_str(tag);
    if let Some(nr) = &node.nr {
        push_attribute(out, "nr", nr);
    }
    for (name, value) in &node.attributes {
        push_attribute(out, name, value);
    }
    out.push('>');
    out.push_str(&node.content);
    for child in &node.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(value));
    out.push('"');
}

/// The text of an HTML fragment with every tag removed
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let result = rewrite_str(
        html,
        RewriteStrSettings {
            document_content_handlers: vec![doc_text!(|t| {
                text.push_str(t.as_str());
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    );

    match result {
        Ok(_) => text,
        Err(e) => {
            tracing::warn!(error = %e, "Could not parse fragment, keeping markup");
            html.to_string()
        }
    }
}

/// Apply `f` to every text run of an HTML fragment, leaving tags untouched
///
/// Text inside `<sup>` and `<sub>` elements is passed through as-is so that
/// typographic rewrites never touch footnote markers or earlier decorations.
/// `f` sees each text node whole and may return markup.
pub fn map_text<F>(html: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let protected = Rc::new(Cell::new(0usize));
    let in_sup = Rc::clone(&protected);
    let in_sub = Rc::clone(&protected);
    let mut run = String::new();

    let result = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("sup", move |el| {
                    enter_protected(el, &in_sup);
                    Ok(())
                }),
                element!("sub", move |el| {
                    enter_protected(el, &in_sub);
                    Ok(())
                }),
            ],
            document_content_handlers: vec![doc_text!(|t| {
                if protected.get() > 0 {
                    return Ok(());
                }
                // Chunks of one text node are gathered and replaced at its last chunk.
                run.push_str(t.as_str());
                if t.last_in_text_node() {
                    t.replace(&f(&run), ContentType::Html);
                    run.clear();
                } else {
                    t.remove();
                }
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    );

    match result {
        Ok(out) => out,
        Err(e) => {
            tracing::warn!(error = %e, "Could not parse fragment, text left as-is");
            html.to_string()
        }
    }
}

fn enter_protected(el: &mut Element<'_, '_>, depth: &Rc<Cell<usize>>) {
    // Self-closing elements have nothing inside to protect.
    if let Some(handlers) = el.end_tag_handlers() {
        depth.set(depth.get() + 1);
        let depth = Rc::clone(depth);
        handlers.push(Box::new(move |_: &mut EndTag<'_>| {
            depth.set(depth.get().saturating_sub(1));
            Ok(())
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested_nodes() {
        let art = DocumentNode::new(TagKind::Article)
            .with_nr("2")
            .with_child(DocumentNode::new(TagKind::NrTitle).with_content("2. gr."))
            .with_child(DocumentNode::new(TagKind::Sentence).with_content("Text."));

        assert_eq!(
            art.to_html(),
            r#"<art nr="2"><nr-title>2. gr.</nr-title><sen>Text.</sen></art>"#
        );
    }

    #[test]
    fn test_render_escapes_attributes_and_skips_definitions() {
        let paragraph = DocumentNode::new(TagKind::Paragraph)
            .with_attribute("title", "a \"b\"")
            .with_child(
                DocumentNode::new(TagKind::Definitions)
                    .with_child(DocumentNode::new(TagKind::Definition).with_content("term")),
            )
            .with_child(DocumentNode::new(TagKind::Sentence).with_content("term."));

        assert_eq!(
            paragraph.to_html(),
            r#"<paragraph title="a &quot;b&quot;"><sen>term.</sen></paragraph>"#
        );
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("a [b] <sup>2)</sup> c"), "a [b] 2) c");
    }

    #[test]
    fn test_map_text_skips_tags_and_superscripts() {
        let html = r#"<a href="/x/1">m2</a> and m2 <sup>12)</sup>"#;
        let out = map_text(html, |t| t.replace('2', "Z"));
        assert_eq!(out, r#"<a href="/x/1">mZ</a> and mZ <sup>12)</sup>"#);
    }

    #[test]
    fn test_map_text_treats_lone_angle_bracket_as_text() {
        let out = map_text("ef a < b þá 1/2 hluti", |t| t.replace("hluti", "HLUTI"));
        assert_eq!(out, "ef a < b þá 1/2 HLUTI");
    }

    #[test]
    fn test_map_text_resumes_after_nested_superscripts() {
        let html = "x2 <sup>a2 <sub>2</sub> 2</sup> y2";
        let out = map_text(html, |t| t.replace('2', "Z"));
        assert_eq!(out, "xZ <sup>a2 <sub>2</sub> 2</sup> yZ");
    }

    #[test]
    fn test_map_text_may_insert_markup() {
        let out = map_text("<i>CO2</i> losun", |t| t.replace("CO2", "CO<sub>2</sub>"));
        assert_eq!(out, "<i>CO<sub>2</sub></i> losun");
    }

    #[test]
    fn test_strip_tags_keeps_lone_angle_bracket() {
        assert_eq!(strip_tags("a < b <i>c</i>"), "a < b c");
    }
}
