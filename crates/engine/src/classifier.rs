//! Per-element classification.
//!
//! Order of operations for one element:
//!   0. must resolve to a connected element
//!   1. excluded tag → nothing
//!   2. scroll-lock correction
//!   3. blur correction
//!   4. transparency correction (unless the tag opts out)
//!   5. stacking candidate + both guards pass → remove (unless the tag opts out)
//!
//! Removal supersedes whatever corrections were written in the same call.

use dom::{Dom, NodeId};
use style::{ResolvedStyle, StyleResolver};

use crate::context::DocumentContext;
use crate::guard::{ancestor_check, descendant_check};
use crate::predicates::{Correction, StylePredicates};
use crate::tags::{TagCaps, TagTable};

/// Which corrections fired on one element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Corrections {
    pub scroll_lock: bool,
    pub blur: bool,
    pub transparency: bool,
}

impl Corrections {
    pub fn any(&self) -> bool {
        self.scroll_lock || self.blur || self.transparency
    }
}

/// Result of classifying one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NoAction,
    Corrected(Corrections),
    /// The element was detached; callers must not descend into it.
    Removed,
}

impl Outcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, Outcome::Removed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    tags: TagTable,
    predicates: StylePredicates,
    resolver: StyleResolver,
}

impl Classifier {
    pub fn new(tags: TagTable, resolver: StyleResolver) -> Self {
        Self {
            tags,
            predicates: StylePredicates::new(),
            resolver,
        }
    }

    /// Whether the walkers should skip `node` and everything under it.
    pub fn is_excluded(&self, dom: &Dom, node: NodeId) -> bool {
        dom.tag_name(node).is_some_and(|tag| self.tags.is_excluded(tag))
    }

    pub fn classify_and_correct(
        &self,
        dom: &mut Dom,
        ctx: &DocumentContext,
        node: NodeId,
    ) -> Outcome {
        if !dom.is_element(node) || !dom.is_connected(node) {
            return Outcome::NoAction;
        }
        let Some(tag) = dom.tag_name(node).map(str::to_string) else {
            return Outcome::NoAction;
        };
        let caps = self.tags.caps(&tag);
        if caps.contains(TagCaps::EXCLUDED) {
            return Outcome::NoAction;
        }
        let Some(style) = self.resolver.resolve(dom, node) else {
            return Outcome::NoAction;
        };

        let mut fired = Corrections {
            scroll_lock: self.correct_scroll_lock(dom, node, &style),
            ..Corrections::default()
        };

        if let Some(correction) = self.predicates.blur(&style) {
            fired.blur = apply(dom, node, &correction);
        }

        if !caps.contains(TagCaps::NO_TRANSPARENCY)
            && let Some(correction) = self.predicates.transparency(&style)
        {
            fired.transparency = apply(dom, node, &correction);
        }

        if !caps.contains(TagCaps::NO_STACKING)
            && self.predicates.is_stacking_candidate(&style)
            && ancestor_check(dom, ctx, &self.tags, node)
            && descendant_check(dom, &self.tags, node)
            && dom.is_connected(node)
            && dom.remove(node)
        {
            tracing::debug!(%tag, z_index = style.z_index(), "removed stacking overlay");
            return Outcome::Removed;
        }

        if fired.any() {
            tracing::debug!(%tag, ?fired, "corrected");
            Outcome::Corrected(fired)
        } else {
            Outcome::NoAction
        }
    }

    /// Scroll-lock only; used for the root scroll container and the content
    /// root. Returns whether anything was written.
    pub fn apply_scroll_lock(&self, dom: &mut Dom, node: NodeId) -> bool {
        match self.resolver.resolve(dom, node) {
            Some(style) => self.correct_scroll_lock(dom, node, &style),
            None => false,
        }
    }

    fn correct_scroll_lock(&self, dom: &mut Dom, node: NodeId, style: &ResolvedStyle) -> bool {
        let mut changed = false;
        for correction in self.predicates.scroll_lock(style) {
            changed |= apply(dom, node, &correction);
        }
        if changed {
            tracing::debug!(tag = dom.tag_name(node).unwrap_or_default(), "released scroll lock");
        }
        changed
    }
}

fn apply(dom: &mut Dom, node: NodeId, correction: &Correction) -> bool {
    dom.set_style_property(node, correction.property, &correction.value, true)
}
