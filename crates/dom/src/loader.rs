//! Page fixture loader - build a document tree from JSON
//!
//! Input format (one element):
//! ```json
//! {
//!   "tag": "div",
//!   "attributes": {"id": "myDiv", "class": "card"},
//!   "style": {"color": "red"},
//!   "children": ["plain text", {"comment": "note"}, {"tag": "span"}]
//! }
//! ```
//!
//! The top-level value is the document element. It is placed under a
//! `#document` node, which becomes the arena root.

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::*;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// One node of a page fixture
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NodeFixture {
    Text(String),
    Comment(CommentFixture),
    Element(ElementFixture),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentFixture {
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementFixture {
    pub tag: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub style: IndexMap<String, String>,
    #[serde(default)]
    pub children: Vec<NodeFixture>,
}

/// Configuration for the loader
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub max_depth: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// Builds a [`DomArena`] from fixtures
#[derive(Debug, Default)]
pub struct DocumentLoader {
    config: LoaderConfig,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn load_str(&self, json: &str) -> Result<DomArena> {
        let fixture: ElementFixture = serde_json::from_str(json)?;
        self.load_fixture(&fixture)
    }

    pub fn load_value(&self, value: &Value) -> Result<DomArena> {
        let fixture = ElementFixture::deserialize(value)?;
        self.load_fixture(&fixture)
    }

    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<DomArena> {
        let json = std::fs::read_to_string(path)?;
        self.load_str(&json)
    }

    /// Build a fresh arena: `#document` root with `fixture` as its element
    pub fn load_fixture(&self, fixture: &ElementFixture) -> Result<DomArena> {
        let mut arena = DomArena::new();
        let document_id = arena.add_node(DomNode::document());
        arena.set_root(document_id)?;

        let element_id = self.build_element(&mut arena, fixture, 1)?;
        arena.append_child(document_id, element_id)?;

        Ok(arena)
    }

    fn build_node(&self, arena: &mut DomArena, fixture: &NodeFixture, depth: usize) -> Result<NodeId> {
        match fixture {
            NodeFixture::Text(text) => Ok(arena.add_node(DomNode::text(text))),
            NodeFixture::Comment(comment) => Ok(arena.add_node(DomNode::comment(&comment.comment))),
            NodeFixture::Element(element) => self.build_element(arena, element, depth),
        }
    }

    fn build_element(
        &self,
        arena: &mut DomArena,
        fixture: &ElementFixture,
        depth: usize,
    ) -> Result<NodeId> {
        if depth > self.config.max_depth {
            return Err(DomError::MaxDepthExceeded {
                current: depth,
                max: self.config.max_depth,
            });
        }
        if fixture.tag.is_empty() {
            return Err(DomError::InvalidNodeType {
                expected: "element with a tag".to_string(),
                actual: "empty tag".to_string(),
            });
        }

        let mut node = DomNode::element(&fixture.tag);
        node.attributes = fixture.attributes.clone();
        node.styles = fixture.style.clone();
        let element_id = arena.add_node(node);

        for child in &fixture.children {
            let child_id = self.build_node(arena, child, depth + 1)?;
            arena.append_child(element_id, child_id)?;
        }

        Ok(element_id)
    }
}

/// Load with the default configuration
pub fn load_str(json: &str) -> Result<DomArena> {
    DocumentLoader::new().load_str(json)
}

/// Load with the default configuration
pub fn load_value(value: &Value) -> Result<DomArena> {
    DocumentLoader::new().load_value(value)
}

/// Load with the default configuration
pub fn load_path(path: impl AsRef<Path>) -> Result<DomArena> {
    DocumentLoader::new().load_path(path)
}
