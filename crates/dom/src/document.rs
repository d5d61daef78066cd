//! Document interface - the capability set examples run against
//!
//! Code that reads or mutates a page takes `&D` / `&mut D` where
//! `D: Document`, never a concrete tree. [`DomArena`] is the in-memory
//! implementation; a host-backed document can implement the same trait.
//!
//! Lookups return snapshots: a `Vec<NodeId>` captured at call time does not
//! follow later mutations.

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::serializer::DomSerializer;
use crate::types::{DomNode, EventListener, NodeId};
use crate::utils::{get_text_content, join_class_list};

pub trait Document {
    // Lookup

    /// Zero-or-one element with this `id`, connected to the tree
    fn get_element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Elements carrying the class label, in document order
    fn get_elements_by_class_name(&self, class: &str) -> Vec<NodeId>;

    /// Elements with the tag name (case-insensitive), in document order
    fn get_elements_by_tag_name(&self, tag: &str) -> Vec<NodeId>;

    fn body(&self) -> Option<NodeId>;

    // Creation and structure

    /// Create a detached element
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Attach `child` as the last child of `parent`
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId>;

    /// Detach `child`, which must be a child of `parent`
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId>;

    // Content

    /// Replace every child of `node` with a single text node
    fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<()>;

    fn text_content(&self, node: NodeId) -> Result<String>;

    fn get_attribute(&self, node: NodeId, name: &str) -> Result<Option<String>>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()>;

    // Style and classes

    fn set_style_property(&mut self, node: NodeId, property: &str, value: &str) -> Result<()>;

    fn style_property(&self, node: NodeId, property: &str) -> Result<Option<String>>;

    /// Returns true when the class was added. Every `class_list_*` method
    /// rejects an empty token or one containing whitespace.
    fn class_list_add(&mut self, node: NodeId, class: &str) -> Result<bool>;

    /// Returns true when the class was present
    fn class_list_remove(&mut self, node: NodeId, class: &str) -> Result<bool>;

    /// Returns whether the class is present afterwards
    fn class_list_toggle(&mut self, node: NodeId, class: &str) -> Result<bool> {
        if self.class_list_contains(node, class)? {
            self.class_list_remove(node, class)?;
            Ok(false)
        } else {
            self.class_list_add(node, class)?;
            Ok(true)
        }
    }

    fn class_list_contains(&self, node: NodeId, class: &str) -> Result<bool>;

    // Form fields

    fn value(&self, node: NodeId) -> Result<String>;

    fn set_value(&mut self, node: NodeId, value: &str) -> Result<()>;

    // Events

    /// Fire-and-forget registration; nothing here ever invokes the listener
    fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: EventListener,
    ) -> Result<()>;

    // Navigation (elements only; text and comments are skipped)

    fn parent_element(&self, node: NodeId) -> Result<Option<NodeId>>;

    fn element_children(&self, node: NodeId) -> Result<Vec<NodeId>>;

    fn first_element_child(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.element_children(node)?.first().copied())
    }

    fn last_element_child(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.element_children(node)?.last().copied())
    }

    fn next_element_sibling(&self, node: NodeId) -> Result<Option<NodeId>>;

    fn previous_element_sibling(&self, node: NodeId) -> Result<Option<NodeId>>;

    /// One-line rendering of a node for logs
    fn describe(&self, node: NodeId) -> Result<String>;
}

/// A class token must be non-empty and free of ASCII whitespace
fn validate_class_token(class: &str) -> Result<()> {
    if class.is_empty() || class.contains(|c: char| c.is_ascii_whitespace()) {
        return Err(DomError::InvalidToken(class.to_string()));
    }
    Ok(())
}

impl DomArena {
    /// Element siblings of `node` (including itself) and its position among them
    fn element_siblings(&self, node_id: NodeId) -> Result<Option<(Vec<NodeId>, usize)>> {
        let Some(parent_id) = self.get(node_id)?.parent_id else {
            return Ok(None);
        };
        let siblings = self.element_children(parent_id)?;
        let index = siblings.iter().position(|&id| id == node_id);
        Ok(index.map(|index| (siblings, index)))
    }

    fn rewrite_classes(&mut self, node_id: NodeId, classes: Vec<String>) -> Result<()> {
        let node = self.element_mut(node_id)?;
        node.attributes.insert(
            "class".to_string(),
            join_class_list(classes.iter().map(String::as_str)),
        );
        Ok(())
    }
}

impl Document for DomArena {
    fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_by_id(id)
    }

    fn get_elements_by_class_name(&self, class: &str) -> Vec<NodeId> {
        self.find_by_class(class)
    }

    fn get_elements_by_tag_name(&self, tag: &str) -> Vec<NodeId> {
        self.find_by_tag(tag)
    }

    fn body(&self) -> Option<NodeId> {
        self.find_one(|node| node.is_element() && node.node_name == "body")
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.add_node(DomNode::element(tag))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        DomArena::append_child(self, parent, child)
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        DomArena::remove_child(self, parent, child)
    }

    fn set_text_content(&mut self, node_id: NodeId, text: &str) -> Result<()> {
        let node = self.get_mut(node_id)?;
        if !node.is_container() {
            node.node_value = text.to_string();
            return Ok(());
        }

        self.clear_children(node_id)?;
        if !text.is_empty() {
            let text_id = self.add_node(DomNode::text(text));
            DomArena::append_child(self, node_id, text_id)?;
        }
        Ok(())
    }

    fn text_content(&self, node_id: NodeId) -> Result<String> {
        get_text_content(self, node_id)
    }

    fn get_attribute(&self, node_id: NodeId, name: &str) -> Result<Option<String>> {
        Ok(self.element(node_id)?.attr(name).map(String::from))
    }

    fn set_attribute(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        self.element_mut(node_id)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_style_property(&mut self, node_id: NodeId, property: &str, value: &str) -> Result<()> {
        let styles = &mut self.element_mut(node_id)?.styles;
        if value.is_empty() {
            styles.shift_remove(property);
        } else {
            styles.insert(property.to_string(), value.to_string());
        }
        Ok(())
    }

    fn style_property(&self, node_id: NodeId, property: &str) -> Result<Option<String>> {
        Ok(self.element(node_id)?.styles.get(property).cloned())
    }

    fn class_list_add(&mut self, node_id: NodeId, class: &str) -> Result<bool> {
        validate_class_token(class)?;
        let node = self.element(node_id)?;
        if node.has_class(class) {
            return Ok(false);
        }
        let mut classes: Vec<String> = node.class_list().map(String::from).collect();
        classes.push(class.to_string());
        self.rewrite_classes(node_id, classes)?;
        Ok(true)
    }

    fn class_list_remove(&mut self, node_id: NodeId, class: &str) -> Result<bool> {
        validate_class_token(class)?;
        let node = self.element(node_id)?;
        if !node.has_class(class) {
            return Ok(false);
        }
        let classes: Vec<String> = node
            .class_list()
            .filter(|c| *c != class)
            .map(String::from)
            .collect();
        self.rewrite_classes(node_id, classes)?;
        Ok(true)
    }

    fn class_list_contains(&self, node_id: NodeId, class: &str) -> Result<bool> {
        validate_class_token(class)?;
        Ok(self.element(node_id)?.has_class(class))
    }

    fn value(&self, node_id: NodeId) -> Result<String> {
        Ok(self.element(node_id)?.value().to_string())
    }

    fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        self.element_mut(node_id)?.form_value = Some(value.to_string());
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        node_id: NodeId,
        event_type: &str,
        listener: EventListener,
    ) -> Result<()> {
        self.add_listener(node_id, event_type, listener)
    }

    fn parent_element(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self
            .parent(node_id)?
            .filter(|parent| parent.is_element())
            .map(|parent| parent.node_id))
    }

    fn element_children(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        Ok(self
            .children(node_id)?
            .into_iter()
            .filter(|child| child.is_element())
            .map(|child| child.node_id)
            .collect())
    }

    fn next_element_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self
            .element_siblings(node_id)?
            .and_then(|(siblings, index)| siblings.get(index + 1).copied()))
    }

    fn previous_element_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.element_siblings(node_id)?.and_then(|(siblings, index)| {
            index.checked_sub(1).and_then(|i| siblings.get(i).copied())
        }))
    }

    fn describe(&self, node_id: NodeId) -> Result<String> {
        DomSerializer::new().describe(self, node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_value;
    use crate::types::DomEvent;

    fn page() -> DomArena {
        load_value(&serde_json::json!({
            "tag": "html",
            "children": [{
                "tag": "body",
                "children": [
                    {"tag": "ul", "attributes": {"id": "list"}, "children": [
                        "\n  ",
                        {"tag": "li", "attributes": {"id": "one"}, "children": ["1"]},
                        {"comment": "between"},
                        {"tag": "li", "attributes": {"id": "two", "class": "hot"}, "children": ["2"]},
                        {"tag": "li", "attributes": {"id": "three", "class": "hot cold"}, "children": ["3"]},
                        "\n"
                    ]},
                    {"tag": "input", "attributes": {"id": "field", "value": "start"}}
                ]
            }]
        }))
        .unwrap()
    }

    fn id(doc: &DomArena, id: &str) -> NodeId {
        doc.get_element_by_id(id).unwrap()
    }

    #[test]
    fn test_lookup_by_class_and_tag() {
        let doc = page();
        assert_eq!(
            doc.get_elements_by_class_name("hot"),
            vec![id(&doc, "two"), id(&doc, "three")]
        );
        assert_eq!(doc.get_elements_by_tag_name("LI").len(), 3);
        assert_eq!(doc.get_element_by_id("missing"), None);
        assert!(doc.body().is_some());
    }

    #[test]
    fn test_lookup_result_is_a_snapshot() {
        let mut doc = page();
        let hot = doc.get_elements_by_class_name("hot");

        doc.class_list_remove(hot[0], "hot").unwrap();

        assert_eq!(hot.len(), 2);
        assert_eq!(doc.get_elements_by_class_name("hot").len(), 1);
    }

    #[test]
    fn test_navigation_skips_text_and_comments() {
        let doc = page();
        let list = id(&doc, "list");
        let (one, two, three) = (id(&doc, "one"), id(&doc, "two"), id(&doc, "three"));

        assert_eq!(doc.first_element_child(list).unwrap(), Some(one));
        assert_eq!(doc.last_element_child(list).unwrap(), Some(three));
        assert_eq!(doc.element_children(list).unwrap(), vec![one, two, three]);
        assert_eq!(doc.next_element_sibling(one).unwrap(), Some(two));
        assert_eq!(doc.previous_element_sibling(two).unwrap(), Some(one));
        assert_eq!(doc.previous_element_sibling(one).unwrap(), None);
        assert_eq!(doc.next_element_sibling(three).unwrap(), None);
        assert_eq!(doc.parent_element(one).unwrap(), Some(list));
        assert_eq!(doc.first_element_child(one).unwrap(), None);
    }

    #[test]
    fn test_document_element_has_no_parent_element() {
        let doc = page();
        let html = doc.get_elements_by_tag_name("html")[0];
        assert_eq!(doc.parent_element(html).unwrap(), None);
        assert_eq!(doc.next_element_sibling(html).unwrap(), None);
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut doc = page();
        let three = id(&doc, "three");

        assert!(doc.class_list_toggle(three, "active").unwrap());
        assert_eq!(
            doc.get_attribute(three, "class").unwrap().as_deref(),
            Some("hot cold active")
        );
        assert!(!doc.class_list_toggle(three, "active").unwrap());
        assert_eq!(
            doc.get_attribute(three, "class").unwrap().as_deref(),
            Some("hot cold")
        );
        assert!(!doc.class_list_add(three, "hot").unwrap());
        assert!(!doc.class_list_remove(three, "warm").unwrap());
    }

    #[test]
    fn test_class_list_rejects_bad_tokens() {
        let mut doc = page();
        let two = id(&doc, "two");

        for token in ["a b", "", "tab\tbed"] {
            let err = doc.class_list_toggle(two, token).unwrap_err();
            assert!(matches!(err, DomError::InvalidToken(ref t) if t == token));
            assert!(matches!(
                doc.class_list_add(two, token),
                Err(DomError::InvalidToken(_))
            ));
            assert!(matches!(
                doc.class_list_remove(two, token),
                Err(DomError::InvalidToken(_))
            ));
            assert!(matches!(
                doc.class_list_contains(two, token),
                Err(DomError::InvalidToken(_))
            ));
        }
        assert_eq!(doc.get_attribute(two, "class").unwrap().as_deref(), Some("hot"));
    }

    #[test]
    fn test_set_text_content_replaces_children() {
        let mut doc = page();
        let list = id(&doc, "list");
        let one = id(&doc, "one");

        doc.set_text_content(list, "gone").unwrap();

        assert_eq!(doc.text_content(list).unwrap(), "gone");
        assert!(doc.element_children(list).unwrap().is_empty());
        assert_eq!(doc.get_element_by_id("one"), None);
        assert_eq!(doc.parent_element(one).unwrap(), None);
    }

    #[test]
    fn test_style_and_value() {
        let mut doc = page();
        let field = id(&doc, "field");

        doc.set_style_property(field, "color", "red").unwrap();
        assert_eq!(doc.style_property(field, "color").unwrap().as_deref(), Some("red"));
        doc.set_style_property(field, "color", "").unwrap();
        assert_eq!(doc.style_property(field, "color").unwrap(), None);

        assert_eq!(doc.value(field).unwrap(), "start");
        doc.set_value(field, "New value").unwrap();
        assert_eq!(doc.value(field).unwrap(), "New value");
    }

    #[test]
    fn test_element_operations_reject_text_nodes() {
        let mut doc = page();
        let one = id(&doc, "one");
        let text = doc.get(one).unwrap().children_ids[0];

        let err = doc.set_value(text, "x").unwrap_err();
        assert!(matches!(err, DomError::InvalidNodeType { .. }));
    }

    #[test]
    fn test_create_append_and_listen() {
        let mut doc = page();
        let list = id(&doc, "list");

        let li = doc.create_element("li");
        doc.set_text_content(li, "4").unwrap();
        assert_eq!(doc.get_elements_by_tag_name("li").len(), 3);

        doc.append_child(list, li).unwrap();
        assert_eq!(doc.last_element_child(list).unwrap(), Some(li));
        assert_eq!(doc.describe(li).unwrap(), "<li>4</li>");

        doc.add_event_listener(li, "click", Box::new(|_: &DomEvent| {}))
            .unwrap();
        assert_eq!(doc.fire_event(li, "click").unwrap(), 1);
    }
}
