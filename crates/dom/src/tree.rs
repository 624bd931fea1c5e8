//! DOM tree operations.
//!
//! The [`Dom`] struct owns an `Arena<Node>` and provides safe tree-manipulation
//! methods that keep the intrusive parent/child/sibling links consistent. Every
//! mutation of a connected node is reported to subscribed observers.

use arena::Arena;
use css::Declaration;

use crate::mutation::{MutationObservers, MutationRecord, ObserverId};
use crate::node::{Attr, ElementData, Node, NodeData, NodeId};

// ---------------------------------------------------------------------------
// Dom
// ---------------------------------------------------------------------------

/// The complete DOM tree, rooted at a single document node.
pub struct Dom {
    nodes: Arena<Node>,
    document: NodeId,
    observers: MutationObservers,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Create a DOM holding only a document node.
    pub fn new() -> Self {
        let mut nodes = Arena::new();
        let document = nodes.insert(Node::new(NodeData::Document));
        Self {
            nodes,
            document,
            observers: MutationObservers::default(),
        }
    }

    /// Create `document > html > (head, body)` and return `(dom, html, body)`.
    pub fn with_skeleton() -> (Self, NodeId, NodeId) {
        let mut dom = Self::new();
        let html = dom.create_html_element("html");
        let head = dom.create_html_element("head");
        let body = dom.create_html_element("body");
        dom.append_child(dom.document, html);
        dom.append_child(html, head);
        dom.append_child(html, body);
        (dom, html, body)
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    // =======================================================================
    // Node creation
    // =======================================================================

    /// Create an Element node.
    pub fn create_element(&mut self, tag_name: &str, attrs: Vec<Attr>) -> NodeId {
        let data = ElementData::new(tag_name, attrs);
        self.nodes.insert(Node::new(NodeData::Element(data)))
    }

    /// Convenience: create an element with no attributes.
    pub fn create_html_element(&mut self, tag_name: &str) -> NodeId {
        self.create_element(tag_name, Vec::new())
    }

    /// Convenience: create an element with only a `style` attribute.
    pub fn create_styled_element(&mut self, tag_name: &str, style: &str) -> NodeId {
        self.create_element(tag_name, vec![Attr::new("style", style)])
    }

    /// Create a Text node.
    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.nodes.insert(Node::new(NodeData::Text {
            data: data.to_string(),
        }))
    }

    /// Attach a shadow root to `host`, returning the existing one if the host
    /// already has one. `None` if `host` is not an element.
    pub fn attach_shadow(&mut self, host: NodeId) -> Option<NodeId> {
        let existing = self.element(host)?.shadow_root;
        if existing.is_some() {
            return existing;
        }
        let root = self.nodes.insert(Node::new(NodeData::ShadowRoot { host }));
        if let Some(el) = self.nodes.get_mut(host).and_then(Node::as_element_mut) {
            el.shadow_root = Some(root);
        }
        Some(root)
    }

    // =======================================================================
    // Tree mutation
    // =======================================================================

    /// Append `child` as the last child of `parent`.
    ///
    /// If `child` already has a parent it is first removed from its current
    /// position.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `child` into `parent`'s child list immediately before `reference`.
    ///
    /// If `reference` is `None` (or not a child of `parent`) this appends.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if parent == child || !self.nodes.contains(parent) || !self.nodes.contains(child) {
            return;
        }
        // Refuse to create a cycle.
        if self.ancestors(parent).contains(&child) {
            return;
        }

        if let Some(old_parent) = self.nodes.get(child).and_then(|n| n.parent) {
            self.remove_child(old_parent, child);
        }

        let reference = reference.filter(|r| self.parent(*r) == Some(parent));
        let prev = match reference {
            Some(r) => self.nodes.get(r).and_then(|n| n.prev_sibling),
            None => self.nodes.get(parent).and_then(|n| n.last_child),
        };

        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
            child_node.prev_sibling = prev;
            child_node.next_sibling = reference;
        }
        match prev {
            Some(p) => {
                if let Some(prev_node) = self.nodes.get_mut(p) {
                    prev_node.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(parent_node) = self.nodes.get_mut(parent) {
                    parent_node.first_child = Some(child);
                }
            }
        }
        match reference {
            Some(r) => {
                if let Some(ref_node) = self.nodes.get_mut(r) {
                    ref_node.prev_sibling = Some(child);
                }
            }
            None => {
                if let Some(parent_node) = self.nodes.get_mut(parent) {
                    parent_node.last_child = Some(child);
                }
            }
        }

        self.record(MutationRecord::ChildList {
            target: parent,
            added: vec![child],
            removed: Vec::new(),
        });
    }

    /// Remove `child` from `parent`'s child list.
    ///
    /// The child becomes a detached root (parent = None). Returns `false`
    /// (and does nothing) if `child` is not currently a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        // Connectivity must be sampled before the links are cut.
        let connected = self.is_connected(parent);
        self.detach(child);
        if connected {
            self.observers.notify(MutationRecord::ChildList {
                target: parent,
                added: Vec::new(),
                removed: vec![child],
            });
        }
        true
    }

    /// Detach `node` from wherever it sits. No-op for roots.
    pub fn remove(&mut self, node: NodeId) -> bool {
        match self.parent(node) {
            Some(parent) => self.remove_child(parent, node),
            None => false,
        }
    }

    /// Drop `node` and its whole subtree (shadow content included) from the
    /// arena. Outstanding ids for these nodes stop resolving.
    pub fn destroy(&mut self, node: NodeId) {
        if node == self.document {
            return;
        }
        self.remove(node);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            stack.extend(self.children(id));
            if let Some(shadow) = self.shadow_root(id) {
                stack.push(shadow);
            }
            self.nodes.remove(id);
        }
    }

    /// Internal: detach a node from its parent without deallocating it.
    fn detach(&mut self, node_id: NodeId) {
        let (parent_id, prev, next) = match self.nodes.get(node_id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        // prev.next = next
        if let Some(prev_node) = prev.and_then(|id| self.nodes.get_mut(id)) {
            prev_node.next_sibling = next;
        }

        // next.prev = prev
        if let Some(next_node) = next.and_then(|id| self.nodes.get_mut(id)) {
            next_node.prev_sibling = prev;
        }

        // Update parent's first_child / last_child.
        if let Some(parent_node) = parent_id.and_then(|id| self.nodes.get_mut(id)) {
            if parent_node.first_child == Some(node_id) {
                parent_node.first_child = next;
            }
            if parent_node.last_child == Some(node_id) {
                parent_node.last_child = prev;
            }
        }

        // Clear the node's own links.
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
        }
    }

    // =======================================================================
    // Attributes and inline style
    // =======================================================================

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attr(name)
    }

    /// Set an attribute. Returns `false` if `node` is not an element or the
    /// value was already set.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        let changed = match self.nodes.get_mut(node).and_then(Node::as_element_mut) {
            Some(el) => el.set_attr(name, value),
            None => return false,
        };
        if changed {
            self.record(MutationRecord::Attributes {
                target: node,
                name: name.to_ascii_lowercase(),
            });
        }
        changed
    }

    /// Inline declarations of `node`, in order.
    pub fn inline_style(&self, node: NodeId) -> &[Declaration] {
        self.element(node)
            .map(|el| el.style.as_slice())
            .unwrap_or_default()
    }

    /// Set one inline declaration, keeping the `style` attribute in sync.
    /// Emits an attribute record only when the style actually changed.
    pub fn set_style_property(
        &mut self,
        node: NodeId,
        property: &str,
        value: &str,
        important: bool,
    ) -> bool {
        let changed = match self.nodes.get_mut(node).and_then(Node::as_element_mut) {
            Some(el) => el.set_style_declaration(property, value, important),
            None => return false,
        };
        if changed {
            self.record(MutationRecord::Attributes {
                target: node,
                name: "style".to_string(),
            });
        }
        changed
    }

    // =======================================================================
    // Observers
    // =======================================================================

    /// Start recording mutations for a new observer.
    pub fn observe(&mut self) -> ObserverId {
        self.observers.subscribe()
    }

    pub fn unsubscribe(&mut self, observer: ObserverId) -> bool {
        self.observers.unsubscribe(observer)
    }

    /// Drain the records queued for `observer`.
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers.take(observer)
    }

    pub fn pending_records(&self, observer: ObserverId) -> usize {
        self.observers.pending(observer)
    }

    fn record(&mut self, record: MutationRecord) {
        if !self.observers.is_empty() && self.is_connected(record.target()) {
            self.observers.notify(record);
        }
    }

    // =======================================================================
    // Traversal
    // =======================================================================

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.nodes.get(id).and_then(Node::as_element)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Lower-cased tag name, if `id` is an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag_name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn shadow_root(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).and_then(|el| el.shadow_root)
    }

    /// The parent, or for a shadow root its host. This is the composed-tree
    /// parent used for connectivity and ancestor walks.
    pub fn parent_or_host(&self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        node.parent.or_else(|| node.shadow_host())
    }

    /// Whether following composed-tree parents from `id` reaches the document.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.document {
                return true;
            }
            cursor = self.parent_or_host(current);
        }
        false
    }

    /// Return the immediate children of `parent` in document order.
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.nodes.get(parent).and_then(|n| n.first_child);
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.nodes.get(id).and_then(|n| n.next_sibling);
        }
        out
    }

    /// Return the chain of composed-tree ancestors from `node` up to the
    /// topmost reachable node. The first element is the direct parent.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.parent_or_host(node);
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.parent_or_host(id);
        }
        out
    }

    /// All descendants of `node` in pre-order, shadow content included
    /// (a host's shadow root and its subtree come before its light children).
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = self.composed_children(node);
        stack.reverse();
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut next = self.composed_children(id);
            next.reverse();
            stack.extend(next);
        }
        out
    }

    /// Children in the composed tree: the attached shadow root first, then
    /// the light children.
    pub fn composed_children(&self, node: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self.shadow_root(node).into_iter().collect();
        out.extend(self.children(node));
        out
    }

    // =======================================================================
    // Queries
    // =======================================================================

    /// The root scroll container (`<html>`), i.e. the document's first
    /// element child.
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(self.document)
            .into_iter()
            .find(|id| self.is_element(*id))
    }

    /// The content root (`<body>`) under the document element.
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .into_iter()
            .find(|id| self.tag_name(*id) == Some("body"))
    }

    /// Find the first element with the given `id` attribute in the subtree
    /// rooted at `root` (pre-order, shadow content included).
    pub fn get_element_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        std::iter::once(root)
            .chain(self.descendants(root))
            .find(|n| self.element(*n).and_then(|el| el.id.as_deref()) == Some(id))
    }

    /// Number of live nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
