//! Selector matching: determine whether a DOM element matches a CSS selector.
//!
//! Complex selectors are matched **right-to-left**: we start with the rightmost
//! (subject) compound selector, then walk up the DOM tree following each
//! combinator. Matching never crosses a shadow boundary: a shadow root has no
//! element parent, so page rules do not leak into encapsulated subtrees by way
//! of ancestor selectors.

use css::{Combinator, ComplexSelector, CompoundSelector};
use dom::{Dom, NodeId};

/// Test whether the element `node_id` matches a full complex selector.
///
/// Returns `false` if `node_id` does not refer to an element.
pub fn matches_selector(dom: &Dom, node_id: NodeId, selector: &ComplexSelector) -> bool {
    let Some((subject, mut combinator)) = selector.parts.first().cloned() else {
        return false;
    };
    if !matches_compound(dom, node_id, &subject) {
        return false;
    }

    let mut current = node_id;
    for (compound, next_combinator) in &selector.parts[1..] {
        match combinator {
            Some(Combinator::Child) => match parent_element(dom, current) {
                Some(parent) if matches_compound(dom, parent, compound) => current = parent,
                _ => return false,
            },
            Some(Combinator::Descendant) => {
                let mut ancestor = parent_element(dom, current);
                loop {
                    match ancestor {
                        Some(a) if matches_compound(dom, a, compound) => {
                            current = a;
                            break;
                        }
                        Some(a) => ancestor = parent_element(dom, a),
                        None => return false,
                    }
                }
            }
            None => return false,
        }
        combinator = *next_combinator;
    }
    true
}

/// Test a single compound selector against one element.
pub fn matches_compound(dom: &Dom, node_id: NodeId, compound: &CompoundSelector) -> bool {
    let Some(el) = dom.element(node_id) else {
        return false;
    };
    if compound.tag.as_deref().is_some_and(|t| t != el.tag_name) {
        return false;
    }
    if compound.id.is_some() && compound.id != el.id {
        return false;
    }
    compound.classes.iter().all(|c| el.classes.contains(c))
}

fn parent_element(dom: &Dom, node_id: NodeId) -> Option<NodeId> {
    dom.parent(node_id).filter(|p| dom.is_element(*p))
}
