//! Cascade resolution for the resolved style snapshot.
//!
//! Cascade order (low → high priority):
//!   1. Author normal
//!   2. Inline normal
//!   3. Author !important
//!   4. Inline !important
//!
//! Within each level: higher specificity wins, then later source order wins.
//! Nothing is cached; every call re-reads the tree and the sheets, so a value
//! written a moment ago is visible on the next call.

use css::{Declaration, Specificity, Stylesheet, compute_specificity};
use dom::{Dom, NodeId};

use crate::matching::matches_selector;
use crate::resolved::{ResolvedStyle, StyleProperty};

/// Where a declaration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StyleOrigin {
    Author,
    Inline,
}

/// Sort key of one declaration; the maximum wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct CascadeRank {
    important: bool,
    origin: StyleOrigin,
    specificity: Specificity,
    source_order: usize,
}

/// Resolves [`ResolvedStyle`] snapshots against a fixed set of page sheets.
#[derive(Debug, Clone, Default)]
pub struct StyleResolver {
    stylesheets: Vec<Stylesheet>,
}

impl StyleResolver {
    pub fn new(stylesheets: Vec<Stylesheet>) -> Self {
        Self { stylesheets }
    }

    /// Resolve the snapshot for `node`. `None` if it is not an element.
    pub fn resolve(&self, dom: &Dom, node: NodeId) -> Option<ResolvedStyle> {
        let el = dom.element(node)?;
        let mut winners: [Option<(CascadeRank, String)>; 6] = Default::default();
        let mut source_order = 0usize;

        for sheet in &self.stylesheets {
            for rule in &sheet.rules {
                let best = rule
                    .selectors
                    .iter()
                    .filter(|s| matches_selector(dom, node, s))
                    .map(compute_specificity)
                    .max();
                let Some(specificity) = best else {
                    continue;
                };
                for decl in &rule.declarations {
                    let rank = CascadeRank {
                        important: decl.important,
                        origin: StyleOrigin::Author,
                        specificity,
                        source_order,
                    };
                    source_order += 1;
                    offer(&mut winners, decl, rank);
                }
            }
        }

        for decl in &el.style {
            let rank = CascadeRank {
                important: decl.important,
                origin: StyleOrigin::Inline,
                specificity: Specificity::default(),
                source_order,
            };
            source_order += 1;
            offer(&mut winners, decl, rank);
        }

        let mut style = ResolvedStyle::default();
        for property in StyleProperty::ALL {
            let Some((_, value)) = &winners[property as usize] else {
                continue;
            };
            match value.as_str() {
                "initial" | "unset" | "revert" => {}
                "inherit" => {
                    let inherited = composed_parent_element(dom, node)
                        .and_then(|p| self.resolve(dom, p))
                        .map(|parent| parent.get(property).to_string());
                    if let Some(v) = inherited {
                        style.set(property, v);
                    }
                }
                _ => style.set(property, value.clone()),
            }
        }
        Some(style)
    }
}

/// The element `node` inherits from: its parent, or the shadow host when the
/// parent is a shadow root.
fn composed_parent_element(dom: &Dom, node: NodeId) -> Option<NodeId> {
    let mut cursor = dom.parent_or_host(node)?;
    while !dom.is_element(cursor) {
        cursor = dom.parent_or_host(cursor)?;
    }
    Some(cursor)
}

/// Feed one declaration into the per-property winners, expanding the
/// shorthands this snapshot cares about.
fn offer(winners: &mut [Option<(CascadeRank, String)>; 6], decl: &Declaration, rank: CascadeRank) {
    let value = decl.value.trim().to_ascii_lowercase();
    let mut put = |property: StyleProperty, v: &str| {
        let slot = &mut winners[property as usize];
        if slot.as_ref().is_none_or(|(current, _)| rank >= *current) {
            *slot = Some((rank, v.to_string()));
        }
    };

    match decl.name.as_str() {
        "overflow" => {
            let mut words = value.split_whitespace();
            let Some(x) = words.next() else { return };
            let y = words.next().unwrap_or(x);
            put(StyleProperty::OverflowX, x);
            put(StyleProperty::OverflowY, y);
        }
        "overflow-x" => put(StyleProperty::OverflowX, &value),
        "overflow-y" => put(StyleProperty::OverflowY, &value),
        "position" => put(StyleProperty::Position, &value),
        "filter" => put(StyleProperty::Filter, &value),
        "z-index" => put(StyleProperty::ZIndex, &value),
        "background-color" => put(StyleProperty::BackgroundColor, &value),
        "background" => {
            if let Some(color) = shorthand_color(&value) {
                put(StyleProperty::BackgroundColor, color);
            }
        }
        _ => {}
    }
}

/// Pull the colour layer out of a `background` shorthand: an `rgb()`/`rgba()`
/// function, or the value itself when it is a single bare token.
fn shorthand_color(value: &str) -> Option<&str> {
    if let Some(start) = value.find("rgba(").or_else(|| value.find("rgb(")) {
        let end = value[start..].find(')')?;
        return Some(&value[start..=start + end]);
    }
    let single = !value.contains(char::is_whitespace) && !value.contains('(');
    single.then_some(value)
}
