use std::collections::VecDeque;

use crate::containers::KeyedVec;
use crate::propagation::PropagatorId;

/// Propagators waiting for their first full propagation, either because their constraint was
/// posted or because the reification of their constraint was decided.
///
/// Entries are drained before any propagator of the priority queue is run.
#[derive(Clone, Debug, Default)]
pub(crate) struct ActivationQueue {
    queue: VecDeque<PropagatorId>,
    is_queued: KeyedVec<PropagatorId, bool>,
}

impl ActivationQueue {
    pub(crate) fn push(&mut self, propagator: PropagatorId) {
        self.is_queued.accomodate(propagator, false);
        if self.is_queued[propagator] {
            return;
        }

        self.is_queued[propagator] = true;
        self.queue.push_back(propagator);
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let propagator = self.queue.pop_front()?;
        self.is_queued[propagator] = false;

        Some(propagator)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    /// Reorders the pending entries; the sort is stable.
    pub(crate) fn sort_by_key<K: Ord>(&mut self, key: impl FnMut(&PropagatorId) -> K) {
        self.queue.make_contiguous().sort_by_key(key);
    }

    /// Keeps only the entries for which `keep` holds.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(PropagatorId) -> bool) {
        let is_queued = &mut self.is_queued;
        self.queue.retain(|&propagator| {
            let kept = keep(propagator);
            if !kept {
                is_queued[propagator] = false;
            }
            kept
        });
    }
}
