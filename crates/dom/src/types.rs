//! Core type definitions for the in-memory document tree
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Use SmallVec for child lists (most nodes have few children)
//! 3. Keep the class list inside the `class` attribute, like the real DOM does

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Node identifier (index into arena)
///
/// A handle, not an owner: the arena keeps every node alive.
pub type NodeId = u32;

/// Node type matching the DOM specification numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
    Document = 9,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Element => "element",
            NodeType::Text => "text",
            NodeType::Comment => "comment",
            NodeType::Document => "document",
        }
    }
}

/// Event delivered to listeners by [`crate::DomArena::fire_event`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    pub event_type: String,
    pub target: NodeId,
}

/// Callback registered with `add_event_listener`
pub type EventListener = Box<dyn Fn(&DomEvent)>;

/// The main document tree node structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    pub node_id: NodeId,
    pub node_type: NodeType,

    // Navigation indices
    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>,

    /// Lowercase tag name for elements, `#text` / `#comment` / `#document` otherwise
    pub node_name: String,
    pub node_value: String,
    pub attributes: HashMap<String, String>,

    /// Inline style declarations, in the order they were first set
    pub styles: IndexMap<String, String>,

    /// Live value of a form field; `None` until written
    pub form_value: Option<String>,
}

impl DomNode {
    /// Create a new node with required fields
    pub fn new(node_id: NodeId, node_type: NodeType, node_name: String) -> Self {
        Self {
            node_id,
            node_type,
            parent_id: None,
            children_ids: SmallVec::new(),
            node_name,
            node_value: String::new(),
            attributes: HashMap::new(),
            styles: IndexMap::new(),
            form_value: None,
        }
    }

    pub fn element(tag: &str) -> Self {
        Self::new(0, NodeType::Element, tag.to_ascii_lowercase())
    }

    pub fn text(value: &str) -> Self {
        let mut node = Self::new(0, NodeType::Text, "#text".to_string());
        node.node_value = value.to_string();
        node
    }

    pub fn comment(value: &str) -> Self {
        let mut node = Self::new(0, NodeType::Comment, "#comment".to_string());
        node.node_value = value.to_string();
        node
    }

    pub fn document() -> Self {
        Self::new(0, NodeType::Document, "#document".to_string())
    }

    /// Check if node is an element
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if node is text
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Elements and the document may hold children
    pub fn is_container(&self) -> bool {
        matches!(self.node_type, NodeType::Element | NodeType::Document)
    }

    /// Get attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Class labels from the `class` attribute, in declaration order
    pub fn class_list(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_list().any(|c| c == class)
    }

    /// Current form value: the written value, else the `value` attribute
    pub fn value(&self) -> &str {
        self.form_value
            .as_deref()
            .or_else(|| self.attr("value"))
            .unwrap_or("")
    }
}

/// Attributes rendered when a node is described, in this order
pub const DEFAULT_INCLUDE_ATTRIBUTES: &[&str] = &[
    "id",
    "class",
    "name",
    "type",
    "value",
    "placeholder",
    "href",
    "title",
    "role",
    "aria-label",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_parsing() {
        let mut node = DomNode::element("DIV");
        node.attributes
            .insert("class".to_string(), "  card  active\tmyClass ".to_string());

        assert_eq!(node.node_name, "div");
        assert_eq!(
            node.class_list().collect::<Vec<_>>(),
            vec!["card", "active", "myClass"]
        );
        assert!(node.has_class("active"));
        assert!(!node.has_class("act"));
    }

    #[test]
    fn test_value_falls_back_to_attribute() {
        let mut node = DomNode::element("input");
        assert_eq!(node.value(), "");

        node.attributes
            .insert("value".to_string(), "initial".to_string());
        assert_eq!(node.value(), "initial");

        node.form_value = Some("typed".to_string());
        assert_eq!(node.value(), "typed");
        assert_eq!(node.attr("value"), Some("initial"));
    }
}
