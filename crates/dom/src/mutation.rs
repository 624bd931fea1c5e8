//! Mutation records and observer queues.
//!
//! Modelled on `MutationObserver`: every tree or attribute change made while
//! the target is connected produces one record, and a copy is queued for each
//! subscribed observer. Delivery is pull-based; the owner of an observer drains
//! its queue with [`MutationObservers::take`] at whatever turn granularity it
//! likes.

use std::collections::{HashMap, VecDeque};

use crate::node::NodeId;

/// Handle returned by [`crate::Dom::observe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u32);

/// One observed change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationRecord {
    /// Children of `target` were added and/or removed.
    ChildList {
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
    /// Attribute `name` on `target` changed.
    Attributes { target: NodeId, name: String },
}

impl MutationRecord {
    pub fn target(&self) -> NodeId {
        match self {
            MutationRecord::ChildList { target, .. } | MutationRecord::Attributes { target, .. } => {
                *target
            }
        }
    }
}

/// Per-observer pending queues.
#[derive(Debug, Default)]
pub struct MutationObservers {
    queues: HashMap<ObserverId, VecDeque<MutationRecord>>,
    next_id: u32,
}

impl MutationObservers {
    pub fn subscribe(&mut self) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.queues.insert(id, VecDeque::new());
        id
    }

    /// Drop the observer and anything still queued for it.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.queues.remove(&id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub(crate) fn notify(&mut self, record: MutationRecord) {
        for queue in self.queues.values_mut() {
            queue.push_back(record.clone());
        }
    }

    /// Drain the pending records for `id`, oldest first.
    pub fn take(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.queues
            .get_mut(&id)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn pending(&self, id: ObserverId) -> usize {
        self.queues.get(&id).map_or(0, VecDeque::len)
    }
}
