//! Footnote and location records
//!
//! These mirror the amendment records delivered alongside a law. Field names
//! follow the payload (`before-mark`, `instance-num`, ...).

use serde::{Deserialize, Serialize};

use crate::anchor::{AnchorParseError, AnchorPath, AnchorSpec};

/// One historical amendment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
    /// Footnote number, unique within a law
    pub nr: u32,
    /// Link to the amending act
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Description fragments, entity-escaped HTML
    #[serde(default)]
    pub sentences: Vec<String>,
    /// Marker instructions
    #[serde(default)]
    pub locations: Vec<Location>,
}

/// Kind of marker a location places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    /// `[...]` around inserted or replaced text
    Range,
    /// `…` where text was removed
    Deletion,
    /// Bare footnote number, no textual change
    Pointer,
}

/// One marker instruction of a footnote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Location {
    #[serde(rename = "type")]
    pub kind: LocationType,

    /// Target node; for ranges also the common prefix of `start`/`end`
    #[serde(default, alias = "xpath", skip_serializing_if = "Option::is_none")]
    pub anchor: Option<AnchorSpec>,

    /// Where a range opens, when it crosses node boundaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<SubAnchor>,

    /// Where a range closes, when it crosses node boundaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<SubAnchor>,

    /// Pattern for the span to bracket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<String>,

    /// Pattern for the text that stays before the marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_mark: Option<String>,

    /// Pattern for the text that stays after the marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_mark: Option<String>,

    /// Mark every occurrence of the span instead of one
    #[serde(default)]
    pub repeat: bool,

    /// Which occurrence to mark (1-based) when not repeating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_num: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_punctuation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_with_closing: Option<String>,

    /// Length of the marked span, used for ordering only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_length: Option<usize>,
}

/// Start or end half of a range location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAnchor {
    #[serde(alias = "xpath")]
    pub anchor: AnchorSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<String>,
}

impl Location {
    /// A location of the given kind targeting `anchor`
    pub fn new(kind: LocationType, anchor: impl Into<String>) -> Self {
        Self {
            kind,
            anchor: Some(AnchorSpec::XPath(anchor.into())),
            start: None,
            end: None,
            words: None,
            before_mark: None,
            after_mark: None,
            repeat: false,
            instance_num: None,
            middle_punctuation: None,
            combined_with_closing: None,
            string_length: None,
        }
    }

    pub fn with_words(mut self, words: impl Into<String>) -> Self {
        self.words = Some(words.into());
        self
    }

    pub fn with_marks(mut self, before: Option<&str>, after: Option<&str>) -> Self {
        self.before_mark = before.map(str::to_string);
        self.after_mark = after.map(str::to_string);
        self
    }

    /// Patterns for the opening and closing side
    pub fn start_words(&self) -> Option<&str> {
        self.start
            .as_ref()
            .and_then(|s| s.words.as_deref())
            .or(self.words.as_deref())
            .filter(|w| !w.is_empty())
    }

    pub fn end_words(&self) -> Option<&str> {
        self.end
            .as_ref()
            .and_then(|e| e.words.as_deref())
            .or(self.words.as_deref())
            .filter(|w| !w.is_empty())
    }

    /// Paths of the opening and closing node
    ///
    /// `start` and `end` extend the location's own anchor when both are
    /// present; either one alone is an absolute path. Without sub-anchors
    /// both sides are the location's anchor.
    pub fn range_paths(&self) -> Result<(AnchorPath, AnchorPath), AnchorParseError> {
        let base = self.anchor.as_ref().map(AnchorSpec::to_path).transpose()?;
        let side = |sub: &Option<SubAnchor>| -> Result<AnchorPath, AnchorParseError> {
            match (sub, &base) {
                (Some(sub), Some(base)) => {
                    let mut steps = base.steps.clone();
                    steps.extend(sub.anchor.to_path()?.steps);
                    Ok(AnchorPath::new(steps))
                }
                (Some(sub), None) => sub.anchor.to_path(),
                (None, Some(base)) => Ok(base.clone()),
                (None, None) => Err(AnchorParseError::Empty),
            }
        };
        Ok((side(&self.start)?, side(&self.end)?))
    }

    /// Path of the target of a deletion or pointer
    pub fn target_path(&self) -> Result<AnchorPath, AnchorParseError> {
        match &self.anchor {
            Some(anchor) => anchor.to_path(),
            None => Err(AnchorParseError::Empty),
        }
    }

    /// Ordering key: length of the marked span, or `usize::MAX` without one
    ///
    /// A location without words has no span, whatever its `string-length`
    /// says.
    pub fn ordering_length(&self) -> usize {
        let Some(words) = self.start_words() else {
            return usize::MAX;
        };
        self.string_length.unwrap_or_else(|| words.chars().count())
    }
}
