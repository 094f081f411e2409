//! Anchor path types
//!
//! An anchor path locates one node in a law by walking from the root through
//! `(tag, ordinal)` steps. Its canonical textual form is an absolute,
//! xpath-like string:
//!
//! ```text
//! chapter[@nr='2']/art[@nr='7']/subart[2]/sen[1]
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::parser::{parse, AnchorParseError};
use crate::document::TagKind;

/// A parsed anchor path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorPath {
    /// Steps from the document root
    pub steps: Vec<AnchorStep>,
}

/// A single step of an anchor path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorStep {
    /// Kind of child to select
    pub tag: TagKind,
    /// How to pick among children of that kind
    pub selector: StepSelector,
}

/// How a step picks a child among those of its kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepSelector {
    /// No predicate: the first child of the kind
    First,
    /// `[n]`: the n-th child of the kind, counted from 1
    Position(usize),
    /// `[@nr='3' and @chapter-type='x']`: the child whose attributes match
    Attributes(Vec<AttributePredicate>),
}

/// `@name='value'`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePredicate {
    pub name: String,
    pub value: String,
}

/// Which end of a range location is being resolved
///
/// A step ordinal such as `nr='1-4'` spans several siblings: the start side
/// resolves the first one and the end side the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Start,
    End,
}

/// Anchor as delivered in a location payload: either the xpath-like string
/// or an explicit list of steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnchorSpec {
    XPath(String),
    Steps(Vec<RawStep>),
}

/// One step of an explicit step list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStep {
    pub tag: TagKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl AnchorPath {
    pub fn new(steps: Vec<AnchorStep>) -> Self {
        Self { steps }
    }

    /// The `nr` of the deepest article step, used to tag diagnostics
    pub fn article_nr(&self) -> Option<&str> {
        self.steps
            .iter()
            .rev()
            .filter(|step| step.tag == TagKind::Article)
            .find_map(|step| step.attribute("nr"))
    }
}

impl AnchorStep {
    /// Step selecting the first child of a kind
    pub fn first(tag: TagKind) -> Self {
        Self {
            tag,
            selector: StepSelector::First,
        }
    }

    /// Step selecting the n-th child of a kind (1-based)
    pub fn position(tag: TagKind, position: usize) -> Self {
        Self {
            tag,
            selector: StepSelector::Position(position),
        }
    }

    /// Step selecting the child with the given `nr`
    pub fn nr(tag: TagKind, nr: impl Into<String>) -> Self {
        Self {
            tag,
            selector: StepSelector::Attributes(vec![AttributePredicate {
                name: "nr".to_string(),
                value: nr.into(),
            }]),
        }
    }

    /// Value of an attribute predicate of this step, if any
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match &self.selector {
            StepSelector::Attributes(predicates) => predicates
                .iter()
                .find(|p| p.name == name)
                .map(|p| p.value.as_str()),
            _ => None,
        }
    }
}

impl AnchorSpec {
    /// Turn the payload form into a parsed path
    pub fn to_path(&self) -> Result<AnchorPath, AnchorParseError> {
        match self {
            AnchorSpec::XPath(xpath) => parse(xpath),
            AnchorSpec::Steps(steps) => {
                if steps.is_empty() {
                    return Err(AnchorParseError::Empty);
                }
                Ok(AnchorPath::new(steps.iter().map(RawStep::to_step).collect()))
            }
        }
    }
}

impl RawStep {
    fn to_step(&self) -> AnchorStep {
        match (&self.nr, self.position) {
            (Some(nr), _) if !nr.trim().is_empty() => AnchorStep::nr(self.tag.clone(), nr.trim()),
            (_, Some(position)) => AnchorStep::position(self.tag.clone(), position),
            _ => AnchorStep::first(self.tag.clone()),
        }
    }
}

impl From<AnchorPath> for AnchorSpec {
    fn from(path: AnchorPath) -> Self {
        AnchorSpec::XPath(path.to_string())
    }
}

impl fmt::Display for AnchorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl fmt::Display for AnchorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        match &self.selector {
            StepSelector::First => Ok(()),
            StepSelector::Position(n) => write!(f, "[{}]", n),
            StepSelector::Attributes(predicates) => {
                write!(f, "[")?;
                for (i, predicate) in predicates.iter().enumerate() {
                    if i > 0 {
                        write!(f, " and ")?;
                    }
                    write!(f, "@{}='{}'", predicate.name, predicate.value)?;
                }
                write!(f, "]")
            }
        }
    }
}
