//! Utility functions for document processing

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::NodeId;

/// Cap text length so a logged node stays on one readable line
pub fn cap_text_length(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let capped: String = text.chars().take(max_len).collect();
        format!("{}...", capped)
    }
}

/// Concatenated text of a node and its descendants, whitespace kept
pub fn get_text_content(arena: &DomArena, node_id: NodeId) -> Result<String> {
    let mut text = String::new();

    arena.traverse_df(node_id, |node| {
        if node.is_text() {
            text.push_str(&node.node_value);
        }
        Ok(())
    })?;

    Ok(text)
}

/// Rebuild a `class` attribute value from individual labels
pub fn join_class_list<'a>(classes: impl IntoIterator<Item = &'a str>) -> String {
    classes.into_iter().collect::<Vec<_>>().join(" ")
}

/// Quote an attribute value for markup output
pub fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
