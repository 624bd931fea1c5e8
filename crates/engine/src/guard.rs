//! Structural vetoes for stacking removals.
//!
//! Both checks are read-only and re-evaluated on every call; the tree may
//! have changed since the last one.

use dom::{Dom, NodeId};

use crate::context::DocumentContext;
use crate::tags::{TagCaps, TagTable};

/// `true` when no ancestor of `node`, up to the root containers, carries a
/// safe-ancestor tag. Shadow roots are crossed through their host.
///
/// A walk that runs off a detached fragment before reaching a root container
/// finds nothing and therefore does not veto.
pub fn ancestor_check(dom: &Dom, ctx: &DocumentContext, tags: &TagTable, node: NodeId) -> bool {
    let mut cursor = dom.parent_or_host(node);
    while let Some(current) = cursor {
        if ctx.is_root_container(current) {
            return true;
        }
        if let Some(tag) = dom.tag_name(current)
            && tags.has(tag, TagCaps::SAFE_ANCESTOR)
        {
            tracing::debug!(tag, "safe ancestor vetoes removal");
            return false;
        }
        cursor = dom.parent_or_host(current);
    }
    true
}

/// `true` when the subtree of `node` (shadow content included) holds no
/// safe-descendant tag. Excluded subtrees are not entered.
pub fn descendant_check(dom: &Dom, tags: &TagTable, node: NodeId) -> bool {
    let mut stack = dom.composed_children(node);
    while let Some(current) = stack.pop() {
        let caps = match dom.tag_name(current) {
            Some(tag) => tags.caps(tag),
            // Shadow roots are transparent; text and comments are leaves.
            None => {
                stack.extend(dom.composed_children(current));
                continue;
            }
        };
        if caps.contains(TagCaps::EXCLUDED) {
            continue;
        }
        if caps.contains(TagCaps::SAFE_DESCENDANT) {
            tracing::debug!(
                tag = dom.tag_name(current).unwrap_or_default(),
                "safe descendant vetoes removal"
            );
            return false;
        }
        stack.extend(dom.composed_children(current));
    }
    true
}
