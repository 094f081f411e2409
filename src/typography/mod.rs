//! Typographic passes
//!
//! Decorations applied once all amendment markers are in place. None of them
//! touch text inside `<sup>`/`<sub>` elements, so markers survive unchanged.

mod chemistry;
mod definitions;
mod expiry;
mod fractions;
mod law;
mod toggle;
mod units;

pub use chemistry::{Chemistry, DEFAULT_FORMULAS};
pub use expiry::OFFSET_ATTRIBUTE as EXPIRY_OFFSET_ATTRIBUTE;
pub use law::{append_source_link, unescape_minister_clause};
pub use toggle::{
    set_state, tag_handles, ToggleState, Toggles, HANDLE_CLASS, HIDDEN_CLASS, STATE_ATTRIBUTE,
};

use crate::document::{map_text, DocumentNode, TagKind};

/// Typographic pass settings
#[derive(Debug, Clone)]
pub struct TypographyConfig {
    /// Run the text decorations (fractions, formulas, units, definitions,
    /// expiry symbols)
    pub enabled: bool,
    pub chemical_formulas: Vec<String>,
    /// State of collapse handles after loading
    pub toggle_state: ToggleState,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chemical_formulas: DEFAULT_FORMULAS.iter().map(|f| f.to_string()).collect(),
            toggle_state: ToggleState::Open,
        }
    }
}

/// What the passes changed
#[derive(Debug, Default)]
pub struct TypographyReport {
    /// Sentences and cells whose text was decorated
    pub decorated: usize,
    /// Sentences with emphasized defined terms
    pub definitions: usize,
    /// Sentences that received an expiry symbol
    pub expiry_symbols: usize,
    pub toggles: Toggles,
}

/// Compiled typographic passes
#[derive(Debug, Clone)]
pub struct Typography {
    enabled: bool,
    chemistry: Chemistry,
    toggle_state: ToggleState,
}

impl Typography {
    pub fn new(config: &TypographyConfig) -> Self {
        Self {
            enabled: config.enabled,
            chemistry: Chemistry::new(config.chemical_formulas.as_slice()),
            toggle_state: config.toggle_state,
        }
    }

    /// Run every pass over the tree
    pub fn run(&self, root: &mut DocumentNode) -> TypographyReport {
        let mut report = TypographyReport::default();

        if self.enabled {
            root.visit_mut(&mut |node| {
                if !matches!(node.tag, TagKind::Sentence | TagKind::TableCell) || node.content.is_empty() {
                    return;
                }
                let decorated = map_text(&node.content, |text| self.decorate(text));
                if decorated != node.content {
                    node.content = decorated;
                    report.decorated += 1;
                }
            });
            report.definitions = definitions::apply(root);
            report.expiry_symbols = expiry::apply(root);
        }

        report.toggles = tag_handles(root, self.toggle_state);
        tracing::debug!(
            decorated = report.decorated,
            definitions = report.definitions,
            expiry = report.expiry_symbols,
            handles = report.toggles.len(),
            "Typographic passes done"
        );
        report
    }

    fn decorate(&self, text: &str) -> String {
        let text = fractions::format(text);
        let text = self.chemistry.format(&text);
        units::format(&text)
    }
}

impl Default for Typography {
    fn default() -> Self {
        Self::new(&TypographyConfig::default())
    }
}
