//! Consolidated-text tree types
//!
//! The tree mirrors the structure of a law as delivered by the server:
//! chapters, articles, sub-articles, sentences, tables and so on. Child order
//! is document order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Kind of a node in the consolidated-text tree
///
/// Serialized with the tag names used by the source documents
/// (`art`, `subart`, `nr-title`, `sen`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TagKind {
    Law,
    SuperChapter,
    Chapter,
    ArtChapter,
    AmbiguousSection,
    Article,
    SubArticle,
    NumberedArticle,
    Paragraph,
    NrTitle,
    Name,
    SenTitle,
    Sentence,
    Table,
    TableBody,
    TableRow,
    TableCell,
    MinisterClause,
    Definitions,
    Definition,
    /// Any tag this crate has no special handling for
    Other(String),
}

impl TagKind {
    /// The tag name used in source documents and rendered HTML
    pub fn as_str(&self) -> &str {
        match self {
            TagKind::Law => "law",
            TagKind::SuperChapter => "superchapter",
            TagKind::Chapter => "chapter",
            TagKind::ArtChapter => "art-chapter",
            TagKind::AmbiguousSection => "ambiguous-section",
            TagKind::Article => "art",
            TagKind::SubArticle => "subart",
            TagKind::NumberedArticle => "numart",
            TagKind::Paragraph => "paragraph",
            TagKind::NrTitle => "nr-title",
            TagKind::Name => "name",
            TagKind::SenTitle => "sen-title",
            TagKind::Sentence => "sen",
            TagKind::Table => "table",
            TagKind::TableBody => "tbody",
            TagKind::TableRow => "tr",
            TagKind::TableCell => "td",
            TagKind::MinisterClause => "minister-clause",
            TagKind::Definitions => "definitions",
            TagKind::Definition => "definition",
            TagKind::Other(name) => name,
        }
    }

    /// Whether the node is the collapse handle of its parent
    pub fn is_handle(&self) -> bool {
        matches!(self, TagKind::Name | TagKind::NrTitle)
    }
}

impl FromStr for TagKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "law" => TagKind::Law,
            "superchapter" | "super-chapter" => TagKind::SuperChapter,
            "chapter" => TagKind::Chapter,
            "art-chapter" => TagKind::ArtChapter,
            "ambiguous-section" => TagKind::AmbiguousSection,
            "art" | "article" => TagKind::Article,
            "subart" => TagKind::SubArticle,
            "numart" => TagKind::NumberedArticle,
            "paragraph" => TagKind::Paragraph,
            "nr-title" => TagKind::NrTitle,
            "name" => TagKind::Name,
            "sen-title" => TagKind::SenTitle,
            "sen" | "sentence" => TagKind::Sentence,
            "table" => TagKind::Table,
            "tbody" => TagKind::TableBody,
            "tr" => TagKind::TableRow,
            "td" => TagKind::TableCell,
            "minister-clause" => TagKind::MinisterClause,
            "definitions" => TagKind::Definitions,
            "definition" => TagKind::Definition,
            other => TagKind::Other(other.to_string()),
        })
    }
}

impl From<String> for TagKind {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(tag) => tag,
            Err(never) => match never {},
        }
    }
}

impl From<TagKind> for String {
    fn from(value: TagKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a node: the child indices walked from the root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(Vec<usize>);

impl NodeId {
    /// The root node
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Id of the `index`-th child of this node
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Id of the parent node, `None` for the root
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// Id of a node given relative to this one
    pub fn join(&self, relative: &NodeId) -> Self {
        let mut indices = self.0.clone();
        indices.extend_from_slice(&relative.0);
        Self(indices)
    }

    /// Child indices from the root
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for NodeId {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

/// A node of the consolidated-text tree
///
/// `content` is the node's own HTML, rendered before its children. The
/// annotation pass only ever rewrites `content` (and appends synthetic empty
/// nodes for deletion targets); parent/child structure is otherwise fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub tag: TagKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nr: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    /// Create an empty node of the given kind
    pub fn new(tag: TagKind) -> Self {
        Self {
            tag,
            nr: None,
            content: String::new(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_nr(mut self, nr: impl Into<String>) -> Self {
        self.nr = Some(nr.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: DocumentNode) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an attribute; `nr` is answered from the node's ordinal
    pub fn attribute(&self, name: &str) -> Option<&str> {
        if name == "nr" {
            return self.nr.as_deref();
        }
        self.attributes.get(name).map(String::as_str)
    }

    /// Get a node by id
    pub fn get(&self, id: &NodeId) -> Option<&DocumentNode> {
        id.indices()
            .iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    /// Get a mutable node by id
    pub fn get_mut(&mut self, id: &NodeId) -> Option<&mut DocumentNode> {
        id.indices()
            .iter()
            .try_fold(self, |node, &index| node.children.get_mut(index))
    }

    /// Children of the given kind with their indices, in document order
    pub fn children_of_kind<'a>(
        &'a self,
        tag: &'a TagKind,
    ) -> impl Iterator<Item = (usize, &'a DocumentNode)> + 'a {
        self.children
            .iter()
            .enumerate()
            .filter(move |(_, child)| &child.tag == tag)
    }

    /// Id of the first leaf under `id` (`id` itself when it has no children)
    pub fn first_leaf(&self, id: &NodeId) -> NodeId {
        let mut current = id.clone();
        while let Some(node) = self.get(&current) {
            if node.children.is_empty() {
                break;
            }
            current = current.child(0);
        }
        current
    }

    /// Id of the last leaf under `id` (`id` itself when it has no children)
    pub fn last_leaf(&self, id: &NodeId) -> NodeId {
        let mut current = id.clone();
        while let Some(node) = self.get(&current) {
            match node.children.len() {
                0 => break,
                n => current = current.child(n - 1),
            }
        }
        current
    }

    /// Ids of every node under (and including) `self` matching `predicate`,
    /// in document order
    pub fn ids_where<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&DocumentNode) -> bool,
    {
        let mut found = Vec::new();
        collect_ids(self, NodeId::root(), &predicate, &mut found);
        found
    }

    /// Visit `self` and every descendant, parents before children
    pub fn visit_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut DocumentNode),
    {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }

    /// Add a CSS class to the `class` attribute if not already present
    pub fn add_class(&mut self, class: &str) {
        let classes = self.attributes.entry("class".to_string()).or_default();
        if classes.split_whitespace().any(|c| c == class) {
            return;
        }
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(class);
    }

    /// Remove a CSS class from the `class` attribute
    pub fn remove_class(&mut self, class: &str) {
        let Some(classes) = self.attributes.get_mut("class") else {
            return;
        };
        let kept: Vec<&str> = classes.split_whitespace().filter(|c| *c != class).collect();
        if kept.is_empty() {
            self.attributes.remove("class");
        } else {
            *classes = kept.join(" ");
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attributes
            .get("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

fn collect_ids<F>(node: &DocumentNode, id: NodeId, predicate: &F, found: &mut Vec<NodeId>)
where
    F: Fn(&DocumentNode) -> bool,
{
    if predicate(node) {
        found.push(id.clone());
    }
    for (index, child) in node.children.iter().enumerate() {
        collect_ids(child, id.child(index), predicate, found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentNode {
        DocumentNode::new(TagKind::Law).with_child(
            DocumentNode::new(TagKind::Chapter).with_nr("1").with_child(
                DocumentNode::new(TagKind::Article)
                    .with_nr("1")
                    .with_child(DocumentNode::new(TagKind::NrTitle).with_content("1. gr."))
                    .with_child(
                        DocumentNode::new(TagKind::SubArticle).with_nr("1").with_child(
                            DocumentNode::new(TagKind::Paragraph)
                                .with_child(DocumentNode::new(TagKind::Sentence).with_content("A."))
                                .with_child(DocumentNode::new(TagKind::Sentence).with_content("B.")),
                        ),
                    ),
            ),
        )
    }

    #[test]
    fn test_tag_kind_round_trip_names() {
        assert_eq!("art".parse::<TagKind>().unwrap(), TagKind::Article);
        assert_eq!("nr-title".parse::<TagKind>().unwrap(), TagKind::NrTitle);
        assert_eq!(TagKind::TableCell.to_string(), "td");
        assert_eq!(
            "footnote-sen".parse::<TagKind>().unwrap(),
            TagKind::Other("footnote-sen".to_string())
        );
    }

    #[test]
    fn test_node_deserializes_from_server_shape() {
        let node: DocumentNode = serde_json::from_str(
            r#"{"tag": "art", "nr": "3", "children": [{"tag": "sen", "content": "Text."}]}"#,
        )
        .unwrap();
        assert_eq!(node.tag, TagKind::Article);
        assert_eq!(node.nr.as_deref(), Some("3"));
        assert_eq!(node.children[0].content, "Text.");
    }

    #[test]
    fn test_get_by_id() {
        let law = sample();
        let id = NodeId::from(vec![0, 0, 1, 0, 1]);
        assert_eq!(law.get(&id).unwrap().content, "B.");
        assert!(law.get(&NodeId::from(vec![0, 5])).is_none());
        assert_eq!(id.to_string(), "/0/0/1/0/1");
        assert_eq!(id.parent(), Some(NodeId::from(vec![0, 0, 1, 0])));
    }

    #[test]
    fn test_first_and_last_leaf() {
        let law = sample();
        let art = NodeId::from(vec![0, 0]);
        assert_eq!(law.first_leaf(&art), NodeId::from(vec![0, 0, 0]));
        assert_eq!(law.last_leaf(&art), NodeId::from(vec![0, 0, 1, 0, 1]));
    }

    #[test]
    fn test_ids_where_in_document_order() {
        let law = sample();
        let sentences = law.ids_where(|n| n.tag == TagKind::Sentence);
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0] < sentences[1]);
    }

    #[test]
    fn test_classes() {
        let mut node = DocumentNode::new(TagKind::Name);
        node.add_class("toggle-button");
        node.add_class("toggle-button");
        node.add_class("toggle-hidden");
        assert_eq!(node.attributes["class"], "toggle-button toggle-hidden");
        node.remove_class("toggle-button");
        assert!(!node.has_class("toggle-button"));
        node.remove_class("toggle-hidden");
        assert!(node.attributes.get("class").is_none());
    }
}
