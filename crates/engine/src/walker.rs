//! One-shot startup sweep over the existing document.

use dom::{Dom, Node, NodeId};

use crate::classifier::{Classifier, Outcome};
use crate::context::DocumentContext;

/// Counters for one sweep or subtree walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Elements handed to the classifier.
    pub visited: usize,
    pub corrected: usize,
    pub removed: usize,
    /// Excluded subtrees pruned without inspection.
    pub skipped: usize,
}

impl SweepStats {
    pub fn record(&mut self, outcome: Outcome) {
        self.visited += 1;
        match outcome {
            Outcome::NoAction => {}
            Outcome::Corrected(_) => self.corrected += 1,
            Outcome::Removed => self.removed += 1,
        }
    }

    pub fn merge(&mut self, other: SweepStats) {
        self.visited += other.visited;
        self.corrected += other.corrected;
        self.removed += other.removed;
        self.skipped += other.skipped;
    }
}

/// Depth-first, pre-order walker. A node is classified before its children
/// are looked at, so a removal prunes the whole subtree.
pub struct TreeWalker<'a> {
    classifier: &'a Classifier,
    ctx: &'a DocumentContext,
}

impl<'a> TreeWalker<'a> {
    pub fn new(classifier: &'a Classifier, ctx: &'a DocumentContext) -> Self {
        Self { classifier, ctx }
    }

    /// Release scroll locks on `<html>` and `<body>`, then walk everything
    /// under the content root.
    pub fn sweep(&self, dom: &mut Dom) -> SweepStats {
        let mut stats = SweepStats::default();
        for root in [self.ctx.root_scroll, self.ctx.content_root] {
            if self.classifier.apply_scroll_lock(dom, root) {
                stats.corrected += 1;
            }
        }
        for child in dom.composed_children(self.ctx.content_root) {
            self.walk_into(dom, child, &mut stats);
        }
        tracing::info!(
            visited = stats.visited,
            corrected = stats.corrected,
            removed = stats.removed,
            skipped = stats.skipped,
            "initial sweep finished"
        );
        stats
    }

    /// Classify `node` and, unless it was removed, everything below it.
    /// A detached or destroyed `node` yields empty stats.
    pub fn walk_subtree(&self, dom: &mut Dom, node: NodeId) -> SweepStats {
        let mut stats = SweepStats::default();
        if dom.is_connected(node) {
            self.walk_into(dom, node, &mut stats);
        }
        stats
    }

    fn walk_into(&self, dom: &mut Dom, start: NodeId, stats: &mut SweepStats) {
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if !dom.contains(node) {
                continue;
            }
            // Shadow roots are not elements; pass straight through them.
            if dom.is_element(node) {
                if self.classifier.is_excluded(dom, node) {
                    stats.skipped += 1;
                    continue;
                }
                let outcome = self.classifier.classify_and_correct(dom, self.ctx, node);
                tracing::trace!(?node, ?outcome, "visited");
                stats.record(outcome);
                if outcome.is_removed() {
                    continue;
                }
            } else if dom.node(node).and_then(Node::shadow_host).is_none() {
                continue;
            }
            let mut next = dom.composed_children(node);
            next.reverse();
            stack.extend(next);
        }
    }
}
