//! The annotation pass
//!
//! [`Engine::annotate`] takes a freshly loaded law together with its
//! footnotes and produces the annotated law: markers placed, footnote
//! blocks rendered, typographic passes applied and every location that could
//! not be placed reported as a diagnostic.

use serde::Deserialize;
use std::io::Read;

use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::document::DocumentNode;
use crate::error::{EngineError, Result};
use crate::footnote::{marker, present, Footnote, Location, LocationType, RenderedFootnote};
use crate::markers::{self, schedule, MarkerConfig};
use crate::typography::{append_source_link, unescape_minister_clause, Toggles, Typography};

/// A law as delivered by the server, before annotation
#[derive(Debug, Clone, Deserialize)]
pub struct LawDocument {
    #[serde(rename = "law")]
    pub root: DocumentNode,
    #[serde(default)]
    pub footnotes: Vec<Footnote>,
    /// Link to the law's official source
    #[serde(default)]
    pub href: Option<String>,
}

impl LawDocument {
    pub fn new(root: DocumentNode, footnotes: Vec<Footnote>) -> Self {
        Self {
            root,
            footnotes,
            href: None,
        }
    }

    /// Decode a payload from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a payload from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// The result of one annotation pass
///
/// There is no way back from an `AnnotatedLaw` to a [`LawDocument`]: the
/// engine only ever sees unannotated input.
#[derive(Debug, Clone)]
pub struct AnnotatedLaw {
    pub root: DocumentNode,
    /// Footnote blocks in ascending number order
    pub footnotes: Vec<RenderedFootnote>,
    /// Locations that were skipped or placed in a degraded form
    pub diagnostics: Vec<Diagnostic>,
    /// Collapse handles and their state
    pub toggles: Toggles,
}

impl AnnotatedLaw {
    /// The law text as HTML
    pub fn to_html(&self) -> String {
        self.root.to_html()
    }

    /// All footnote blocks as HTML
    pub fn footnotes_html(&self) -> String {
        let mut html = String::from("<footnotes>");
        for footnote in &self.footnotes {
            html.push_str(&footnote.html);
        }
        html.push_str("</footnotes>");
        html
    }
}

/// Annotation engine
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    markers: MarkerConfig,
    typography: Typography,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            markers: config.markers(),
            typography: Typography::new(&config.typography()),
            config,
        }
    }

    /// Run the annotation pass over `document`
    ///
    /// Fails only when the tree already carries markers for the document's
    /// footnotes; everything else is reported in
    /// [`AnnotatedLaw::diagnostics`].
    ///
    /// The document is consumed, so the same value cannot be annotated twice:
    ///
    /// ```compile_fail
    /// use lagasafn_annotate::{Engine, LawDocument};
    ///
    /// fn twice(engine: &Engine, document: LawDocument) {
    ///     let annotated = engine.annotate(document).unwrap();
    ///     engine.annotate(annotated);
    /// }
    /// ```
    pub fn annotate(&self, document: LawDocument) -> Result<AnnotatedLaw> {
        let LawDocument {
            mut root,
            footnotes,
            href,
        } = document;

        ensure_unannotated(&root, &footnotes)?;

        let mut diagnostics = Vec::new();
        let mut applied = 0;

        for scheduled in schedule(&footnotes) {
            let nr = scheduled.footnote.nr;
            let location = scheduled.location;
            let report = |kind: DiagnosticKind| Diagnostic {
                footnote_nr: nr,
                article_nr: article_of(location),
                location_index: scheduled.location_index,
                kind,
            };

            match markers::apply(&mut root, nr, location, &self.markers) {
                Ok(result) => {
                    applied += 1;
                    diagnostics.extend(result.warnings.into_iter().map(report));
                }
                Err(kind) => diagnostics.push(report(kind)),
            }
        }

        for diagnostic in &diagnostics {
            diagnostic.log();
        }

        if let Some(href) = href.as_deref().filter(|h| !h.is_empty()) {
            append_source_link(&mut root, href, &self.config.law_link_icon);
        }
        unescape_minister_clause(&mut root);

        let typography = self.typography.run(&mut root);
        let rendered = present(&footnotes);

        tracing::info!(
            footnotes = footnotes.len(),
            applied,
            skipped = diagnostics.iter().filter(|d| d.kind.is_skip()).count(),
            degraded = diagnostics.iter().filter(|d| !d.kind.is_skip()).count(),
            "Annotation pass complete"
        );

        Ok(AnnotatedLaw {
            root,
            footnotes: rendered,
            diagnostics,
            toggles: typography.toggles,
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Reject a tree that already carries a marker for one of the footnotes
fn ensure_unannotated(root: &DocumentNode, footnotes: &[Footnote]) -> Result<()> {
    let markers: Vec<(u32, String)> = footnotes.iter().map(|f| (f.nr, marker(f.nr))).collect();
    if markers.is_empty() {
        return Ok(());
    }

    let mut found = None;
    let mut check = |node: &DocumentNode| {
        if found.is_none() {
            found = markers
                .iter()
                .find(|(_, m)| node.content.contains(m.as_str()))
                .map(|(nr, _)| *nr);
        }
    };
    walk(root, &mut check);

    match found {
        Some(nr) => Err(EngineError::AlreadyAnnotated { nr }),
        None => Ok(()),
    }
}

fn walk<F: FnMut(&DocumentNode)>(node: &DocumentNode, f: &mut F) {
    f(node);
    for child in &node.children {
        walk(child, f);
    }
}

/// Article number to tag a location's diagnostics with
fn article_of(location: &Location) -> Option<String> {
    let path = match location.kind {
        LocationType::Range => location.range_paths().ok().map(|(start, _)| start),
        LocationType::Deletion | LocationType::Pointer => location.target_path().ok(),
    }?;
    path.article_nr().map(str::to_string)
}
