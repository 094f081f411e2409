//! Footnote description blocks
//!
//! Renders each footnote's description with its number superscript so that
//! it pairs with the markers placed in the law text.

use serde::Serialize;

use super::types::Footnote;

/// A rendered footnote block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedFootnote {
    pub nr: u32,
    pub html: String,
}

/// The superscript used both in the law text and in the footnote block
pub fn marker(nr: u32) -> String {
    format!("<sup>{})</sup>", nr)
}

/// Render all footnotes in ascending `nr` order
pub fn present(footnotes: &[Footnote]) -> Vec<RenderedFootnote> {
    let mut ordered: Vec<&Footnote> = footnotes.iter().collect();
    ordered.sort_by_key(|f| f.nr);
    ordered.into_iter().map(render).collect()
}

/// Render a single footnote block
pub fn render(footnote: &Footnote) -> RenderedFootnote {
    let mut html = format!("<footnote nr=\"{}\">", footnote.nr);
    html.push_str(&marker(footnote.nr));

    for (i, sentence) in footnote.sentences.iter().enumerate() {
        let text = html_escape::decode_html_entities(sentence);
        html.push_str("<footnote-sen>");
        match (&footnote.href, i) {
            (Some(href), 0) => {
                html.push_str("<a href=\"");
                html.push_str(&html_escape::encode_double_quoted_attribute(href));
                html.push_str("\" target=\"_blank\">");
                html.push_str(&text);
                html.push_str("</a>");
            }
            _ => html.push_str(&text),
        }
        html.push_str("</footnote-sen>");
    }

    html.push_str("</footnote>");
    RenderedFootnote {
        nr: footnote.nr,
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footnote(nr: u32, href: Option<&str>, sentences: &[&str]) -> Footnote {
        Footnote {
            nr,
            href: href.map(str::to_string),
            sentences: sentences.iter().map(|s| s.to_string()).collect(),
            locations: vec![],
        }
    }

    #[test]
    fn test_render_unescapes_and_links_first_sentence() {
        let rendered = render(&footnote(
            4,
            Some("https://example.org/a?b=1&c=2"),
            &["L. 12/2001, 3. gr.", "&lt;i&gt;Sjá&lt;/i&gt; einnig 5. gr."],
        ));

        assert_eq!(
            rendered.html,
            "<footnote nr=\"4\"><sup>4)</sup>\
             <footnote-sen><a href=\"https://example.org/a?b=1&amp;c=2\" target=\"_blank\">L. 12/2001, 3. gr.</a></footnote-sen>\
             <footnote-sen><i>Sjá</i> einnig 5. gr.</footnote-sen></footnote>"
        );
    }

    #[test]
    fn test_render_without_href() {
        let rendered = render(&footnote(1, None, &["L. 1/2000."]));
        assert_eq!(
            rendered.html,
            "<footnote nr=\"1\"><sup>1)</sup><footnote-sen>L. 1/2000.</footnote-sen></footnote>"
        );
    }

    #[test]
    fn test_present_orders_by_nr() {
        let rendered = present(&[
            footnote(3, None, &["c"]),
            footnote(1, None, &["a"]),
            footnote(2, None, &["b"]),
        ]);
        let nrs: Vec<u32> = rendered.iter().map(|r| r.nr).collect();
        assert_eq!(nrs, vec![1, 2, 3]);
    }
}
