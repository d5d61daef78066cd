//! Node serializer - render nodes as markup for logs
//!
//! Two forms:
//! - `describe`: one line, opening tag plus capped text, used when an
//!   example logs the node it reached
//! - `serialize`: the whole tree as indented markup

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::*;
use crate::utils::{cap_text_length, escape_attribute, get_text_content};

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct SerializerConfig {
    pub include_attributes: Vec<String>,
    pub include_styles: bool,
    pub max_text_length: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            include_attributes: DEFAULT_INCLUDE_ATTRIBUTES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            include_styles: true,
            max_text_length: 40,
        }
    }
}

/// Document tree serializer
pub struct DomSerializer {
    config: SerializerConfig,
}

impl DomSerializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// One-line description: `<div id="x" class="y">text…</div>`
    pub fn describe(&self, arena: &DomArena, node_id: NodeId) -> Result<String> {
        let node = arena.get(node_id)?;

        match node.node_type {
            NodeType::Element => {
                let mut output = self.opening_tag(node);
                let text = get_text_content(arena, node_id)?;
                output.push_str(&cap_text_length(text.trim(), self.config.max_text_length));
                output.push_str("</");
                output.push_str(&node.node_name);
                output.push('>');
                Ok(output)
            }
            NodeType::Text => Ok(format!(
                "\"{}\"",
                cap_text_length(node.node_value.trim(), self.config.max_text_length)
            )),
            NodeType::Comment => Ok(format!("<!--{}-->", node.node_value)),
            NodeType::Document => Ok(node.node_name.clone()),
        }
    }

    /// Serialize the tree under the root to indented markup
    pub fn serialize(&self, arena: &DomArena) -> Result<String> {
        let mut output = String::with_capacity(4096);

        if let Some(root_id) = arena.root_id() {
            self.serialize_node(arena, root_id, 0, &mut output)?;
        }

        Ok(output)
    }

    fn serialize_node(
        &self,
        arena: &DomArena,
        node_id: NodeId,
        depth: usize,
        output: &mut String,
    ) -> Result<()> {
        let node = arena.get(node_id)?;
        let indent = "  ".repeat(depth);

        match node.node_type {
            NodeType::Element => {
                output.push_str(&indent);
                output.push_str(&self.opening_tag(node));
                output.push('\n');

                for &child_id in &node.children_ids {
                    self.serialize_node(arena, child_id, depth + 1, output)?;
                }

                output.push_str(&indent);
                output.push_str("</");
                output.push_str(&node.node_name);
                output.push_str(">\n");
            }
            NodeType::Text => {
                let text = node.node_value.trim();
                if !text.is_empty() {
                    output.push_str(&indent);
                    output.push_str(text);
                    output.push('\n');
                }
            }
            NodeType::Comment => {
                output.push_str(&indent);
                output.push_str(&format!("<!--{}-->\n", node.node_value));
            }
            NodeType::Document => {
                for &child_id in &node.children_ids {
                    self.serialize_node(arena, child_id, depth, output)?;
                }
            }
        }

        Ok(())
    }

    fn opening_tag(&self, node: &DomNode) -> String {
        let mut tag = format!("<{}", node.node_name);

        for attr_name in &self.config.include_attributes {
            if let Some(attr_value) = node.attr(attr_name) {
                tag.push_str(&format!(" {}=\"{}\"", attr_name, escape_attribute(attr_value)));
            }
        }

        if self.config.include_styles && !node.styles.is_empty() {
            let style = node
                .styles
                .iter()
                .map(|(property, value)| format!("{}: {}", property, value))
                .collect::<Vec<_>>()
                .join("; ");
            tag.push_str(&format!(" style=\"{}\"", escape_attribute(&style)));
        }

        tag.push('>');
        tag
    }
}

impl Default for DomSerializer {
    fn default() -> Self {
        Self::new()
    }
}
