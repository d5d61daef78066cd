//! Arena-based document tree storage
//!
//! "Bad programmers worry about the code. Good programmers worry about
//! data structures and their relationships."
//!
//! Every node ever created lives in one Vec and is addressed by a 4-byte
//! index. Detaching a node only unlinks it; the slot stays valid so that
//! handles held by callers never dangle.
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [#document][html][head][body]...[detached div]
//!         ↑ root_id                         ↑ parent_id = None
//! ```

use crate::error::{DomError, Result};
use crate::types::{DomEvent, DomNode, EventListener, NodeId, NodeType};
use ahash::AHashMap;
use smallvec::SmallVec;
use std::fmt;

/// Listeners keyed by target node
#[derive(Default)]
struct ListenerRegistry {
    by_node: AHashMap<NodeId, SmallVec<[(String, EventListener); 1]>>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: usize = self.by_node.values().map(|l| l.len()).sum();
        f.debug_struct("ListenerRegistry")
            .field("nodes", &self.by_node.len())
            .field("listeners", &total)
            .finish()
    }
}

/// Arena allocator for document nodes
///
/// Design:
/// - Single Vec<DomNode> for sequential allocation
/// - Lookups walk the tree from the root, so detached nodes are invisible
/// - No Rc/Arc: use indices everywhere
#[derive(Debug, Default)]
pub struct DomArena {
    nodes: Vec<DomNode>,
    root_id: Option<NodeId>,
    listeners: ListenerRegistry,
}

/// Pre-order iterator over a subtree (document order)
pub struct Descendants<'a> {
    arena: &'a DomArena,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a DomNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node_id) = self.stack.pop() {
            // Stacked ids always name arena slots. `traverse_df` reports a
            // dangling one as `NodeNotFound`; this iterator skips it.
            let node = self.arena.get(node_id);
            debug_assert!(node.is_ok(), "dangling node id {}", node_id);
            let Ok(node) = node else {
                continue;
            };
            // Reverse push so children come out left-to-right
            self.stack.extend(node.children_ids.iter().rev());
            return Some(node);
        }
        None
    }
}

impl DomArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root_id: None,
            listeners: ListenerRegistry::default(),
        }
    }

    /// Add a detached node to the arena, returns its ID
    pub fn add_node(&mut self, mut node: DomNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        node.node_id = node_id;
        node.parent_id = None;
        node.children_ids.clear();
        self.nodes.push(node);
        node_id
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID, requiring it to be an element
    pub fn element(&self, node_id: NodeId) -> Result<&DomNode> {
        let node = self.get(node_id)?;
        if node.is_element() {
            Ok(node)
        } else {
            Err(invalid_type(NodeType::Element, node.node_type))
        }
    }

    pub fn element_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        let node = self.get_mut(node_id)?;
        if node.is_element() {
            Ok(node)
        } else {
            Err(invalid_type(NodeType::Element, node.node_type))
        }
    }

    /// Set root node
    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        self.get(node_id)?;
        self.root_id = Some(node_id);
        Ok(())
    }

    /// Get root node ID
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Total number of nodes, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get children of a node (all node types)
    pub fn children(&self, node_id: NodeId) -> Result<Vec<&DomNode>> {
        let node = self.get(node_id)?;
        node.children_ids
            .iter()
            .map(|&child_id| self.get(child_id))
            .collect()
    }

    /// Get parent of a node
    pub fn parent(&self, node_id: NodeId) -> Result<Option<&DomNode>> {
        let node = self.get(node_id)?;
        match node.parent_id {
            Some(parent_id) => Ok(Some(self.get(parent_id)?)),
            None => Ok(None),
        }
    }

    /// Pre-order walk of the subtree rooted at `start_id`, which must exist
    pub fn descendants(&self, start_id: NodeId) -> Descendants<'_> {
        Descendants {
            arena: self,
            stack: vec![start_id],
        }
    }

    /// Traverse tree depth-first (iterative, no recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Whether the node is reachable from the root
    pub fn is_connected(&self, node_id: NodeId) -> bool {
        let Some(root_id) = self.root_id else {
            return false;
        };
        self.ancestors_or_self(node_id).any(|id| id == root_id)
    }

    /// `node_id` followed by its ancestors, nearest first
    fn ancestors_or_self(&self, node_id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(
            self.get(node_id).ok().map(|n| n.node_id),
            move |&id| self.get(id).ok().and_then(|n| n.parent_id),
        )
    }

    /// Find connected nodes matching predicate, in document order
    pub fn find<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        let Some(root_id) = self.root_id else {
            return Vec::new();
        };
        self.descendants(root_id)
            .filter(|node| predicate(node))
            .map(|node| node.node_id)
            .collect()
    }

    /// Find first connected node matching predicate
    pub fn find_one<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        let root_id = self.root_id?;
        self.descendants(root_id)
            .find(|node| predicate(node))
            .map(|node| node.node_id)
    }

    /// Find all elements by tag name (case-insensitive)
    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.find(|node| node.is_element() && node.node_name.eq_ignore_ascii_case(tag))
    }

    /// Find element by ID attribute
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_one(|node| node.is_element() && node.attr("id") == Some(id))
    }

    /// Find all elements carrying a class label
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.find(|node| node.is_element() && node.has_class(class))
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<NodeId> {
        let parent = self.get(parent_id)?;
        if !parent.is_container() {
            return Err(invalid_type(NodeType::Element, parent.node_type));
        }
        if self.get(child_id)?.node_type == NodeType::Document {
            return Err(DomError::HierarchyRequest(
                "a document cannot be inserted".to_string(),
            ));
        }
        if self.ancestors_or_self(parent_id).any(|id| id == child_id) {
            return Err(DomError::HierarchyRequest(format!(
                "node {} is an ancestor of node {}",
                child_id, parent_id
            )));
        }

        self.detach(child_id)?;
        self.get_mut(parent_id)?.children_ids.push(child_id);
        self.get_mut(child_id)?.parent_id = Some(parent_id);
        Ok(child_id)
    }

    /// Detach `child` from `parent`; the node stays in the arena
    pub fn remove_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<NodeId> {
        self.get(parent_id)?;
        if self.get(child_id)?.parent_id != Some(parent_id) {
            return Err(DomError::NotAChild {
                parent: parent_id,
                child: child_id,
            });
        }
        self.detach(child_id)?;
        Ok(child_id)
    }

    /// Unlink a node from whatever parent it has
    fn detach(&mut self, node_id: NodeId) -> Result<()> {
        let Some(parent_id) = self.get_mut(node_id)?.parent_id.take() else {
            return Ok(());
        };
        self.get_mut(parent_id)?
            .children_ids
            .retain(|id| *id != node_id);
        Ok(())
    }

    /// Detach every child of `node_id`
    pub fn clear_children(&mut self, node_id: NodeId) -> Result<()> {
        let children = std::mem::take(&mut self.get_mut(node_id)?.children_ids);
        for child_id in children {
            self.get_mut(child_id)?.parent_id = None;
        }
        Ok(())
    }

    /// Register a listener for `event_type` on `node_id`
    pub fn add_listener(
        &mut self,
        node_id: NodeId,
        event_type: &str,
        listener: EventListener,
    ) -> Result<()> {
        self.get(node_id)?;
        self.listeners
            .by_node
            .entry(node_id)
            .or_default()
            .push((event_type.to_string(), listener));
        Ok(())
    }

    /// Number of listeners registered on a node for an event type
    pub fn listener_count(&self, node_id: NodeId, event_type: &str) -> usize {
        self.listeners
            .by_node
            .get(&node_id)
            .map(|l| l.iter().filter(|(t, _)| t == event_type).count())
            .unwrap_or(0)
    }

    /// Invoke the listeners registered on `node_id` for `event_type`.
    ///
    /// No capture or bubbling: only the target's own listeners run.
    /// Returns how many listeners were invoked.
    pub fn fire_event(&self, node_id: NodeId, event_type: &str) -> Result<usize> {
        self.get(node_id)?;
        let event = DomEvent {
            event_type: event_type.to_string(),
            target: node_id,
        };
        let mut fired = 0;
        if let Some(listeners) = self.listeners.by_node.get(&node_id) {
            for (_, listener) in listeners.iter().filter(|(t, _)| t == event_type) {
                listener(&event);
                fired += 1;
            }
        }
        Ok(fired)
    }

    /// Clear arena (reuse allocation)
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.listeners.by_node.clear();
        self.root_id = None;
    }
}

fn invalid_type(expected: NodeType, actual: NodeType) -> DomError {
    DomError::InvalidNodeType {
        expected: expected.as_str().to_string(),
        actual: actual.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// #document > html > body > [div#a, p, div#b]
    fn sample() -> (DomArena, NodeId, NodeId) {
        let mut arena = DomArena::new();
        let doc = arena.add_node(DomNode::document());
        arena.set_root(doc).unwrap();
        let html = arena.add_node(DomNode::element("html"));
        let body = arena.add_node(DomNode::element("body"));
        arena.append_child(doc, html).unwrap();
        arena.append_child(html, body).unwrap();

        for (tag, id) in [("div", Some("a")), ("p", None), ("div", Some("b"))] {
            let mut node = DomNode::element(tag);
            if let Some(id) = id {
                node.attributes.insert("id".to_string(), id.to_string());
            }
            let node_id = arena.add_node(node);
            arena.append_child(body, node_id).unwrap();
        }
        (arena, html, body)
    }

    #[test]
    fn test_arena_basic() {
        let mut arena = DomArena::new();
        let id = arena.add_node(DomNode::element("div"));
        assert_eq!(id, 0);

        let retrieved = arena.get(id).unwrap();
        assert_eq!(retrieved.node_name, "div");
        assert_eq!(retrieved.node_id, 0);
        assert!(matches!(arena.get(7), Err(DomError::NodeNotFound(7))));
    }

    #[test]
    fn test_traverse_df() {
        let (arena, _, _) = sample();
        let mut visited = Vec::new();
        arena
            .traverse_df(arena.root_id().unwrap(), |node| {
                visited.push(node.node_name.clone());
                Ok(())
            })
            .unwrap();

        assert_eq!(visited, vec!["#document", "html", "body", "div", "p", "div"]);
    }

    #[test]
    fn test_find_in_document_order() {
        let (mut arena, html, _) = sample();

        // A div attached before body in the tree but allocated last
        let late = arena.add_node(DomNode::element("div"));
        arena.get_mut(html).unwrap().children_ids.insert(0, late);
        arena.get_mut(late).unwrap().parent_id = Some(html);

        let divs = arena.find_by_tag("DIV");
        assert_eq!(divs.len(), 3);
        assert_eq!(divs[0], late);
        assert_eq!(arena.get(divs[1]).unwrap().attr("id"), Some("a"));
        assert!(arena.find_by_tag("span").is_empty());
    }

    #[test]
    fn test_detached_nodes_are_invisible() {
        let (mut arena, _, body) = sample();
        let a = arena.find_by_id("a").unwrap();

        arena.remove_child(body, a).unwrap();

        assert_eq!(arena.find_by_id("a"), None);
        assert!(!arena.is_connected(a));
        // The handle is still valid
        assert_eq!(arena.get(a).unwrap().attr("id"), Some("a"));
    }

    #[test]
    fn test_remove_child_requires_parent() {
        let (mut arena, html, body) = sample();
        let a = arena.find_by_id("a").unwrap();

        let err = arena.remove_child(html, a).unwrap_err();
        assert!(matches!(err, DomError::NotAChild { .. }));
        assert_eq!(arena.get(a).unwrap().parent_id, Some(body));
    }

    #[test]
    fn test_append_moves_existing_child() {
        let (mut arena, html, body) = sample();
        let b = arena.find_by_id("b").unwrap();

        arena.append_child(html, b).unwrap();

        assert_eq!(arena.get(b).unwrap().parent_id, Some(html));
        assert!(!arena.get(body).unwrap().children_ids.contains(&b));
        assert_eq!(arena.get(html).unwrap().children_ids.last(), Some(&b));
    }

    #[test]
    fn test_append_rejects_cycles_and_leaf_parents() {
        let (mut arena, html, body) = sample();

        let err = arena.append_child(body, html).unwrap_err();
        assert!(matches!(err, DomError::HierarchyRequest(_)));

        let text = arena.add_node(DomNode::text("hi"));
        let div = arena.add_node(DomNode::element("div"));
        let err = arena.append_child(text, div).unwrap_err();
        assert!(matches!(err, DomError::InvalidNodeType { .. }));
    }

    #[test]
    fn test_clear_resets_nodes_and_listeners() {
        let (mut arena, _, body) = sample();
        arena
            .add_listener(body, "click", Box::new(|_: &DomEvent| {}))
            .unwrap();

        arena.clear();

        assert!(arena.is_empty());
        assert_eq!(arena.root_id(), None);
        assert_eq!(arena.find_by_id("a"), None);
        assert_eq!(arena.listener_count(body, "click"), 0);

        // Ids restart from zero
        let div = arena.add_node(DomNode::element("div"));
        assert_eq!(div, 0);
        assert!(matches!(arena.fire_event(body, "click"), Err(DomError::NodeNotFound(_))));
    }

    #[test]
    fn test_fire_event_runs_only_matching_listeners() {
        let (mut arena, _, _) = sample();
        let a = arena.find_by_id("a").unwrap();
        let clicks = Rc::new(Cell::new(0));

        let counter = clicks.clone();
        arena
            .add_listener(a, "click", Box::new(move |event: &DomEvent| {
                assert_eq!(event.event_type, "click");
                counter.set(counter.get() + 1);
            }))
            .unwrap();
        arena
            .add_listener(a, "focus", Box::new(|_: &DomEvent| {}))
            .unwrap();

        assert_eq!(arena.fire_event(a, "click").unwrap(), 1);
        assert_eq!(arena.fire_event(a, "keydown").unwrap(), 0);
        assert_eq!(clicks.get(), 1);
        assert_eq!(arena.listener_count(a, "focus"), 1);
    }
}
