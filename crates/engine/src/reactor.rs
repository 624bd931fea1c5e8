//! Incremental handling of mutations that arrive after the startup sweep.
//!
//! The reactor owns a FIFO of record batches. Each pull from the DOM's
//! observer queue becomes one batch; batches run to completion in arrival
//! order. Everything is single-threaded: the host decides when to pump.

use std::collections::VecDeque;

use dom::{Dom, MutationRecord, NodeId, ObserverId};

use crate::classifier::Classifier;
use crate::config::ReactorConfig;
use crate::context::DocumentContext;
use crate::walker::{SweepStats, TreeWalker};

/// Running totals across every batch the reactor has processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactorStats {
    pub batches: usize,
    pub records: usize,
    /// Inserted text or comment nodes, which are never classified.
    pub ignored: usize,
    pub outcomes: SweepStats,
}

pub struct MutationReactor {
    observer: ObserverId,
    classifier: Classifier,
    ctx: DocumentContext,
    config: ReactorConfig,
    queue: VecDeque<Vec<MutationRecord>>,
    stats: ReactorStats,
}

impl MutationReactor {
    /// Subscribe to `dom` and return a reactor with an empty queue. Call this
    /// before the startup sweep so nothing inserted during it is missed.
    pub fn install(
        dom: &mut Dom,
        classifier: Classifier,
        ctx: DocumentContext,
        config: ReactorConfig,
    ) -> Self {
        let observer = dom.observe();
        tracing::debug!(?observer, "mutation reactor installed");
        Self {
            observer,
            classifier,
            ctx,
            config,
            queue: VecDeque::new(),
            stats: ReactorStats::default(),
        }
    }

    /// Stop observing. Records still queued are dropped.
    pub fn uninstall(self, dom: &mut Dom) {
        dom.unsubscribe(self.observer);
        tracing::debug!(observer = ?self.observer, dropped = self.queue.len(), "mutation reactor removed");
    }

    pub fn context(&self) -> &DocumentContext {
        &self.ctx
    }

    pub fn walker(&self) -> TreeWalker<'_> {
        TreeWalker::new(&self.classifier, &self.ctx)
    }

    pub fn stats(&self) -> ReactorStats {
        self.stats
    }

    pub fn pending_batches(&self) -> usize {
        self.queue.len()
    }

    /// Move whatever the observer has accumulated into one queued batch.
    /// Returns the number of records collected.
    pub fn collect(&mut self, dom: &mut Dom) -> usize {
        let records = dom.take_records(self.observer);
        let count = records.len();
        if count > 0 {
            self.queue.push_back(records);
        }
        count
    }

    /// Process every queued batch, oldest first. Returns how many ran.
    pub fn run_pending(&mut self, dom: &mut Dom) -> usize {
        let mut ran = 0;
        while let Some(batch) = self.queue.pop_front() {
            tracing::trace!(records = batch.len(), "processing mutation batch");
            self.stats.batches += 1;
            self.stats.records += batch.len();
            for record in batch {
                self.handle(dom, record);
            }
            ran += 1;
        }
        ran
    }

    /// Collect and run until the page is quiet. The engine's own corrections
    /// produce records too, but a corrected element yields no further change,
    /// so this settles; `max_turns_per_pump` bounds it regardless. A pump
    /// always runs at least one turn.
    pub fn pump(&mut self, dom: &mut Dom) -> usize {
        let limit = self.config.max_turns_per_pump.max(1);
        let mut turns = 0;
        while turns < limit {
            if self.collect(dom) == 0 && self.queue.is_empty() {
                return turns;
            }
            self.run_pending(dom);
            turns += 1;
        }
        tracing::warn!(turns, "mutation pump hit its turn limit");
        turns
    }

    fn handle(&mut self, dom: &mut Dom, record: MutationRecord) {
        match record {
            MutationRecord::ChildList { added, .. } => {
                for node in added {
                    self.on_insert(dom, node);
                }
            }
            MutationRecord::Attributes { target, .. } => self.on_attribute(dom, target),
        }
    }

    fn on_insert(&mut self, dom: &mut Dom, node: NodeId) {
        if !dom.is_element(node) {
            self.stats.ignored += 1;
            return;
        }
        if self.config.recurse_into_insertions {
            let walked = self.walker().walk_subtree(dom, node);
            self.stats.outcomes.merge(walked);
        } else {
            let outcome = self.classifier.classify_and_correct(dom, &self.ctx, node);
            self.stats.outcomes.record(outcome);
        }
    }

    fn on_attribute(&mut self, dom: &mut Dom, target: NodeId) {
        if target == self.ctx.root_scroll || target == self.ctx.content_root {
            if self.classifier.apply_scroll_lock(dom, target) {
                self.stats.outcomes.corrected += 1;
            }
            return;
        }
        let outcome = self.classifier.classify_and_correct(dom, &self.ctx, target);
        self.stats.outcomes.record(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(config: ReactorConfig) -> (Dom, MutationReactor) {
        let (mut dom, _, _) = Dom::with_skeleton();
        let ctx = DocumentContext::capture(&dom).unwrap();
        let reactor = MutationReactor::install(&mut dom, Classifier::default(), ctx, config);
        (dom, reactor)
    }

    #[test]
    fn insertion_is_handled_in_one_batch() {
        let (mut dom, mut reactor) = setup(ReactorConfig::default());
        let body = reactor.context().content_root;
        let popup = dom.create_styled_element("div", "z-index: 50");
        dom.append_child(body, popup);

        assert_eq!(reactor.collect(&mut dom), 1);
        assert_eq!(reactor.run_pending(&mut dom), 1);
        assert!(!dom.is_connected(popup));
        assert_eq!(reactor.stats().outcomes.removed, 1);
    }

    #[test]
    fn recursion_on_insert_is_configurable() {
        for (recurse, expect_fixed) in [(true, true), (false, false)] {
            let config = ReactorConfig {
                recurse_into_insertions: recurse,
                ..ReactorConfig::default()
            };
            let (mut dom, mut reactor) = setup(config);
            let body = reactor.context().content_root;
            let wrapper = dom.create_html_element("div");
            let veil = dom.create_styled_element("div", "filter: blur(6px)");
            dom.append_child(wrapper, veil);
            dom.append_child(body, wrapper);

            reactor.pump(&mut dom);
            let filter = dom.element(veil).unwrap().style_declaration("filter").unwrap();
            assert_eq!(filter.value == "none", expect_fixed, "recurse = {recurse}");
        }
    }

    #[test]
    fn text_insertions_are_ignored() {
        let (mut dom, mut reactor) = setup(ReactorConfig::default());
        let body = reactor.context().content_root;
        let text = dom.create_text("late text");
        dom.append_child(body, text);
        reactor.pump(&mut dom);
        assert_eq!(reactor.stats().ignored, 1);
        assert_eq!(reactor.stats().outcomes.visited, 0);
    }

    #[test]
    fn attribute_change_reclassifies_the_target() {
        let (mut dom, mut reactor) = setup(ReactorConfig::default());
        let body = reactor.context().content_root;
        let div = dom.create_html_element("div");
        dom.append_child(body, div);
        reactor.pump(&mut dom);

        dom.set_style_property(div, "background-color", "rgba(0, 0, 0, 0.4)", false);
        reactor.pump(&mut dom);
        let decl = dom.element(div).unwrap().style_declaration("background-color").unwrap();
        assert_eq!(decl.value, "rgba(0,0,0,0)");
        assert!(decl.important);
    }

    #[test]
    fn root_attribute_change_only_releases_scroll_lock() {
        let (mut dom, mut reactor) = setup(ReactorConfig::default());
        let body = reactor.context().content_root;
        dom.set_attribute(body, "style", "overflow: hidden; filter: blur(3px)");
        reactor.pump(&mut dom);

        let el = dom.element(body).unwrap();
        assert_eq!(el.style_declaration("overflow").unwrap().value, "auto");
        assert_eq!(el.style_declaration("filter").unwrap().value, "blur(3px)");
    }

    #[test]
    fn pump_settles_after_engine_writes() {
        let (mut dom, mut reactor) = setup(ReactorConfig::default());
        let body = reactor.context().content_root;
        let div = dom.create_styled_element("div", "overflow: hidden; filter: blur(1px)");
        dom.append_child(body, div);

        let turns = reactor.pump(&mut dom);
        // One turn for the insertion, one for the attribute records it caused.
        assert_eq!(turns, 2);
        assert_eq!(reactor.pending_batches(), 0);
        assert_eq!(dom.pending_records(reactor.observer), 0);
    }

    #[test]
    fn zero_turn_limit_still_handles_insertions() {
        let config = ReactorConfig {
            max_turns_per_pump: 0,
            ..ReactorConfig::default()
        };
        let (mut dom, mut reactor) = setup(config);
        let body = reactor.context().content_root;
        let popup = dom.create_styled_element("div", "z-index: 50");
        dom.append_child(body, popup);

        assert_eq!(reactor.pump(&mut dom), 1);
        assert!(!dom.is_connected(popup));
        assert_eq!(reactor.stats().outcomes.removed, 1);
    }

    #[test]
    fn batches_run_in_arrival_order() {
        let (mut dom, mut reactor) = setup(ReactorConfig::default());
        let body = reactor.context().content_root;
        let first = dom.create_styled_element("div", "z-index: 2");
        dom.append_child(body, first);
        reactor.collect(&mut dom);
        let second = dom.create_styled_element("div", "z-index: 3");
        dom.append_child(body, second);
        reactor.collect(&mut dom);

        assert_eq!(reactor.pending_batches(), 2);
        assert_eq!(reactor.run_pending(&mut dom), 2);
        assert_eq!(reactor.stats().batches, 2);
        assert_eq!(reactor.stats().outcomes.removed, 2);
    }

    #[test]
    fn uninstall_stops_delivery() {
        let (mut dom, reactor) = setup(ReactorConfig::default());
        let body = reactor.context().content_root;
        let observer = reactor.observer;
        reactor.uninstall(&mut dom);

        let popup = dom.create_styled_element("div", "z-index: 50");
        dom.append_child(body, popup);
        assert!(dom.is_connected(popup));
        assert_eq!(dom.pending_records(observer), 0);
    }
}
