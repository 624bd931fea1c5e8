//! The document context: the root containers every component needs.

use dom::{Dom, NodeId};

/// Root containers of one page, captured once at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentContext {
    /// The document node itself.
    pub document: NodeId,
    /// `<html>`, the root scroll container.
    pub root_scroll: NodeId,
    /// `<body>`, where the content walk starts.
    pub content_root: NodeId,
}

impl DocumentContext {
    /// Capture the roots of `dom`. `None` while the page has no `<html>` or
    /// `<body>` yet.
    pub fn capture(dom: &Dom) -> Option<Self> {
        Some(Self {
            document: dom.document(),
            root_scroll: dom.document_element()?,
            content_root: dom.body()?,
        })
    }

    /// Whether `node` is one of the containers ancestor walks stop at.
    pub fn is_root_container(&self, node: NodeId) -> bool {
        node == self.document || node == self.root_scroll || node == self.content_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_finds_roots() {
        let (dom, html, body) = Dom::with_skeleton();
        let ctx = DocumentContext::capture(&dom).unwrap();
        assert_eq!(ctx.root_scroll, html);
        assert_eq!(ctx.content_root, body);
        assert!(ctx.is_root_container(dom.document()));
        assert!(ctx.is_root_container(body));
    }

    #[test]
    fn capture_needs_a_body() {
        let mut dom = Dom::new();
        let html = dom.create_html_element("html");
        dom.append_child(dom.document(), html);
        assert_eq!(DocumentContext::capture(&dom), None);
    }
}
