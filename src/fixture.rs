//! JSON page fixtures.
//!
//! A fixture describes the document as it stands when the engine starts, the
//! page's stylesheets, and a script: a list of turns, each a list of
//! mutations the page makes before the host gives the engine a turn.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use css::parse_stylesheet;
use dom::{Attr, Dom, NodeData, NodeId};
use serde::Deserialize;
use style::StyleResolver;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageFixture {
    pub host: Option<String>,
    pub stylesheets: Vec<String>,
    /// Children of `<body>`.
    pub body: Vec<NodeSpec>,
    /// `<body>` inline style, for pages that lock scrolling on the body.
    pub body_style: Option<String>,
    /// `<html>` inline style.
    pub html_style: Option<String>,
    pub script: Vec<Vec<Mutation>>,
}

/// One node. Without a `tag` it is a text node holding `text`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    pub tag: Option<String>,
    pub attrs: BTreeMap<String, String>,
    pub style: Option<String>,
    pub children: Vec<NodeSpec>,
    /// Content of an attached shadow root.
    pub shadow: Option<Vec<NodeSpec>>,
    pub text: Option<String>,
}

/// A page-side change. Targets are looked up by `id` attribute; `html` and
/// `body` also name the root containers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    Insert { parent: String, node: NodeSpec },
    SetStyle { target: String, style: String },
    SetAttr { target: String, name: String, value: String },
    Remove { target: String },
}

impl PageFixture {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read page fixture {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("invalid page fixture {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build the initial document and a resolver over the page's sheets.
    pub fn build(&self) -> (Dom, StyleResolver) {
        let (mut dom, html, body) = Dom::with_skeleton();
        if let Some(style) = &self.html_style {
            dom.set_attribute(html, "style", style);
        }
        if let Some(style) = &self.body_style {
            dom.set_attribute(body, "style", style);
        }
        for spec in &self.body {
            let node = build_node(&mut dom, spec);
            dom.append_child(body, node);
        }
        let sheets = self.stylesheets.iter().map(|s| parse_stylesheet(s)).collect();
        (dom, StyleResolver::new(sheets))
    }
}

fn build_node(dom: &mut Dom, spec: &NodeSpec) -> NodeId {
    let Some(tag) = &spec.tag else {
        return dom.create_text(spec.text.as_deref().unwrap_or_default());
    };
    let mut attrs: Vec<Attr> = spec.attrs.iter().map(|(k, v)| Attr::new(k, v)).collect();
    if let Some(style) = &spec.style {
        attrs.retain(|a| a.name != "style");
        attrs.push(Attr::new("style", style));
    }
    let node = dom.create_element(tag, attrs);
    if let Some(shadow) = &spec.shadow
        && let Some(root) = dom.attach_shadow(node)
    {
        for child in shadow {
            let child = build_node(dom, child);
            dom.append_child(root, child);
        }
    }
    if let Some(text) = &spec.text {
        let text = dom.create_text(text);
        dom.append_child(node, text);
    }
    for child in &spec.children {
        let child = build_node(dom, child);
        dom.append_child(node, child);
    }
    node
}

fn find_target(dom: &Dom, name: &str) -> Option<NodeId> {
    dom.get_element_by_id(dom.document(), name).or(match name {
        "html" => dom.document_element(),
        "body" => dom.body(),
        _ => None,
    })
}

/// Apply one script turn. Mutations whose target no longer exists are
/// skipped with a warning, the way a page script's lookup would come back
/// empty. Returns how many were applied.
pub fn apply_turn(dom: &mut Dom, turn: &[Mutation]) -> usize {
    let mut applied = 0;
    for mutation in turn {
        let target = match mutation {
            Mutation::Insert { parent, .. } => parent,
            Mutation::SetStyle { target, .. }
            | Mutation::SetAttr { target, .. }
            | Mutation::Remove { target } => target,
        };
        let Some(node) = find_target(dom, target) else {
            tracing::warn!(target = %target, "script target not found");
            continue;
        };
        match mutation {
            Mutation::Insert { node: spec, .. } => {
                let child = build_node(dom, spec);
                dom.append_child(node, child);
            }
            Mutation::SetStyle { style, .. } => {
                dom.set_attribute(node, "style", style);
            }
            Mutation::SetAttr { name, value, .. } => {
                dom.set_attribute(node, name, value);
            }
            Mutation::Remove { .. } => {
                dom.remove(node);
            }
        }
        applied += 1;
    }
    applied
}

/// Indented outline of the connected tree under `<html>`: tag, id and
/// inline style per element.
pub fn outline(dom: &Dom) -> String {
    let mut out = String::new();
    if let Some(html) = dom.document_element() {
        write_outline(dom, html, 0, &mut out);
    }
    out
}

fn write_outline(dom: &Dom, node: NodeId, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let line = match dom.node(node).map(|n| &n.data) {
        Some(NodeData::Element(el)) => {
            let mut line = format!("{indent}<{}", el.tag_name);
            if let Some(id) = &el.id {
                line.push_str(&format!(" #{id}"));
            }
            if let Some(style) = el.attr("style").filter(|s| !s.is_empty()) {
                line.push_str(&format!(" style=\"{style}\""));
            }
            line.push('>');
            line
        }
        Some(NodeData::ShadowRoot { .. }) => format!("{indent}#shadow-root"),
        Some(NodeData::Text { data }) if !data.trim().is_empty() => {
            format!("{indent}{:?}", data.trim())
        }
        _ => return,
    };
    out.push_str(&line);
    out.push('\n');
    for child in dom.composed_children(node) {
        write_outline(dom, child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PAGE: &str = r#"{
        "host": "news.example.com",
        "stylesheets": [".veil { filter: blur(4px) }"],
        "body_style": "overflow: hidden",
        "body": [
            {"tag": "div", "attrs": {"id": "app", "class": "veil"}, "children": [
                {"tag": "p", "text": "Article text"}
            ]},
            {"tag": "div", "attrs": {"id": "widget"}, "shadow": [
                {"tag": "div", "style": "z-index: 9"}
            ]}
        ],
        "script": [
            [{"insert": {"parent": "body", "node": {"tag": "div", "attrs": {"id": "late"}, "style": "z-index: 50"}}}],
            [{"set_style": {"target": "app", "style": "background-color: rgba(0, 0, 0, 0.5)"}},
             {"remove": {"target": "missing"}}]
        ]
    }"#;

    #[test]
    fn builds_the_initial_tree() {
        let page = PageFixture::from_json(PAGE).unwrap();
        let (dom, _) = page.build();
        let app = dom.get_element_by_id(dom.document(), "app").unwrap();
        assert_eq!(dom.tag_name(app), Some("div"));
        let widget = dom.get_element_by_id(dom.document(), "widget").unwrap();
        assert!(dom.shadow_root(widget).is_some());
        let body = dom.body().unwrap();
        assert_eq!(dom.get_attribute(body, "style"), Some("overflow: hidden"));
        assert_eq!(page.script.len(), 2);
    }

    #[test]
    fn script_turns_apply_and_skip_missing_targets() {
        let page = PageFixture::from_json(PAGE).unwrap();
        let (mut dom, _) = page.build();
        assert_eq!(apply_turn(&mut dom, &page.script[0]), 1);
        assert!(dom.get_element_by_id(dom.document(), "late").is_some());
        assert_eq!(apply_turn(&mut dom, &page.script[1]), 1);
    }

    #[test]
    fn outline_lists_elements_and_shadow_roots() {
        let page = PageFixture::from_json(PAGE).unwrap();
        let (dom, _) = page.build();
        let text = outline(&dom);
        assert!(text.starts_with("<html>\n"));
        assert!(text.contains("  <body style=\"overflow: hidden\">\n"));
        assert!(text.contains("#shadow-root"));
        assert!(text.contains("\"Article text\""));
        assert!(text.contains("    <div #app>\n"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn load_reports_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json").unwrap();
        let err = PageFixture::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid page fixture"));
    }

    #[test]
    fn demo_page_is_decluttered() {
        use engine::{Engine, EngineConfig, NoopOverride, RunMode};

        let page = PageFixture::from_json(include_str!("../demos/modal_page.json")).unwrap();
        let (mut dom, resolver) = page.build();
        let mut running = Engine::new(EngineConfig::default())
            .unwrap()
            .start(RunMode::Enabled, "news.example.com", &mut dom, resolver, &NoopOverride)
            .into_running()
            .unwrap();
        for turn in &page.script {
            apply_turn(&mut dom, turn);
            running.pump(&mut dom);
        }

        let by_id = |dom: &Dom, id: &str| dom.get_element_by_id(dom.document(), id);
        assert!(by_id(&dom, "consent").is_none());
        assert!(by_id(&dom, "newsletter").is_none());
        assert!(by_id(&dom, "top").is_some());
        let article = by_id(&dom, "article").unwrap();
        let filter = dom.element(article).unwrap().style_declaration("filter").unwrap();
        assert_eq!((filter.value.as_str(), filter.important), ("none", true));
        let body = dom.body().unwrap();
        let overflow = dom.element(body).unwrap().style_declaration("overflow").unwrap();
        assert_eq!(overflow.value, "auto");
    }

    #[test]
    fn unknown_mutation_kind_is_rejected() {
        let result = PageFixture::from_json(r#"{"script": [[{"explode": {}}]]}"#);
        assert!(result.is_err());
    }
}
