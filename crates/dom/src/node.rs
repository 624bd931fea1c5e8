//! DOM node model.
//!
//! All nodes live in an `Arena<Node>` and are referenced by `NodeId` (a generational index).
//! The tree structure is encoded via parent/child/sibling links stored directly on each node.
//! A shadow root is an ordinary node whose `parent` is `None`; it points back
//! at its host through [`NodeData::ShadowRoot`], and the host points at it
//! through [`ElementData::shadow_root`].

use css::{Declaration, parse_declarations, serialize_declarations};

/// A handle into the arena that uniquely identifies a DOM node.
pub type NodeId = arena::GenIndex;

// ---------------------------------------------------------------------------
// Attribute
// ---------------------------------------------------------------------------

/// A single attribute on an element (e.g. `class="foo"`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Element data
// ---------------------------------------------------------------------------

/// Data specific to element nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementData {
    /// Lower-cased tag name.
    pub tag_name: String,
    pub attrs: Vec<Attr>,
    /// Cached `id` attribute value for fast lookup.
    pub id: Option<String>,
    /// Cached list of class names (split from the `class` attribute).
    pub classes: Vec<String>,
    /// Parsed `style` attribute, in declaration order.
    pub style: Vec<Declaration>,
    /// Attached shadow root, if any.
    pub shadow_root: Option<NodeId>,
}

impl ElementData {
    pub fn new(tag_name: &str, attrs: Vec<Attr>) -> Self {
        let mut data = Self {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: Vec::new(),
            id: None,
            classes: Vec::new(),
            style: Vec::new(),
            shadow_root: None,
        };
        for attr in attrs {
            data.set_attr(&attr.name, &attr.value);
        }
        data
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Set an attribute and refresh whichever cache it feeds.
    /// Returns `false` if the value was already identical.
    pub fn set_attr(&mut self, name: &str, value: &str) -> bool {
        let name = name.to_ascii_lowercase();
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(existing) if existing.value == value => return false,
            Some(existing) => existing.value = value.to_string(),
            None => self.attrs.push(Attr::new(&name, value)),
        }
        match name.as_str() {
            "id" => self.id = Some(value.to_string()),
            "class" => {
                self.classes = value.split_whitespace().map(String::from).collect();
            }
            "style" => self.style = parse_declarations(value),
            _ => {}
        }
        true
    }

    /// The inline declaration for `property`, if one is set.
    pub fn style_declaration(&self, property: &str) -> Option<&Declaration> {
        self.style
            .iter()
            .rev()
            .find(|d| d.name.eq_ignore_ascii_case(property))
    }

    /// Replace or append one inline declaration and re-serialize the `style`
    /// attribute. Returns `false` when nothing changed.
    pub fn set_style_declaration(&mut self, property: &str, value: &str, important: bool) -> bool {
        let decl = Declaration::new(property, value, important);
        if self
            .style
            .iter()
            .filter(|d| d.name == decl.name)
            .eq(std::iter::once(&decl))
        {
            return false;
        }
        let mut style: Vec<Declaration> = self
            .style
            .iter()
            .filter(|d| d.name != decl.name)
            .cloned()
            .collect();
        style.push(decl);
        self.set_attr("style", &serialize_declarations(&style))
    }
}

// ---------------------------------------------------------------------------
// Node data (variant per node type)
// ---------------------------------------------------------------------------

/// The payload that distinguishes different kinds of DOM nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text { data: String },
    Comment { data: String },
    ShadowRoot { host: NodeId },
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A single node in the DOM tree.
///
/// Tree links (`parent`, `first_child`, …) form an intrusive doubly-linked
/// child list so that insertions and removals are O(1).
#[derive(Clone, Debug)]
pub struct Node {
    pub data: NodeData,

    // -- tree links ----------------------------------------------------------
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

impl Node {
    /// Create a new detached node.
    pub fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }

    /// Returns `true` if this node is an element.
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// If this is an element, return a reference to its [`ElementData`].
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// If this is an element, return a mutable reference to its [`ElementData`].
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// If this is a shadow root, the element it is attached to.
    pub fn shadow_host(&self) -> Option<NodeId> {
        match self.data {
            NodeData::ShadowRoot { host } => Some(host),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attrs_feed_caches() {
        let el = ElementData::new(
            "DIV",
            vec![
                Attr::new("id", "overlay"),
                Attr::new("class", "modal open"),
                Attr::new("style", "z-index: 10; filter: blur(2px)"),
            ],
        );
        assert_eq!(el.tag_name, "div");
        assert_eq!(el.id.as_deref(), Some("overlay"));
        assert_eq!(el.classes, vec!["modal", "open"]);
        assert_eq!(el.style.len(), 2);
        assert_eq!(el.style_declaration("Z-INDEX").map(|d| d.value.as_str()), Some("10"));
    }

    #[test]
    fn set_style_declaration_moves_to_end() {
        let mut el = ElementData::new("div", vec![Attr::new("style", "overflow: hidden; color: red")]);
        assert!(el.set_style_declaration("overflow", "auto", true));
        assert_eq!(el.attr("style"), Some("color: red; overflow: auto !important;"));
        let decl = el.style_declaration("overflow").unwrap();
        assert_eq!(decl.value, "auto");
        assert!(decl.important);
    }

    #[test]
    fn set_style_declaration_unchanged_is_false() {
        let mut el = ElementData::new("div", Vec::new());
        assert!(el.set_style_declaration("filter", "none", true));
        assert!(!el.set_style_declaration("filter", "none", true));
    }

    #[test]
    fn set_attr_same_value_is_false() {
        let mut el = ElementData::new("div", vec![Attr::new("class", "a")]);
        assert!(!el.set_attr("class", "a"));
        assert!(el.set_attr("class", "b"));
        assert_eq!(el.classes, vec!["b"]);
    }
}
