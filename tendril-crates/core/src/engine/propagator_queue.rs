use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::containers::KeyedVec;
use crate::propagation::Priority;
use crate::propagation::PropagatorId;
use crate::tendril_assert_moderate;

/// The pending propagators, one bucket per priority. Within a bucket the propagator with the
/// smallest id is popped first, which makes the order of propagation deterministic.
#[derive(Debug, Clone)]
pub(crate) struct PropagatorQueue {
    queues: Vec<BinaryHeap<Reverse<PropagatorId>>>,
    is_enqueued: KeyedVec<PropagatorId, bool>,
    num_enqueued: usize,
    present_priorities: BinaryHeap<Reverse<u8>>,
}

impl Default for PropagatorQueue {
    fn default() -> Self {
        Self::new(Priority::NUM_BUCKETS)
    }
}

impl PropagatorQueue {
    pub(crate) fn new(num_priority_levels: usize) -> PropagatorQueue {
        PropagatorQueue {
            queues: vec![BinaryHeap::new(); num_priority_levels],
            is_enqueued: KeyedVec::default(),
            num_enqueued: 0,
            present_priorities: BinaryHeap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.num_enqueued == 0
    }

    /// Adds the propagator to the bucket, unless it is already pending.
    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId, bucket: u8) {
        tendril_assert_moderate!((bucket as usize) < self.queues.len());

        if !self.is_propagator_enqueued(propagator_id) {
            self.is_enqueued.accomodate(propagator_id, false);
            self.is_enqueued[propagator_id] = true;
            self.num_enqueued += 1;

            if self.queues[bucket as usize].is_empty() {
                self.present_priorities.push(Reverse(bucket));
            }
            self.queues[bucket as usize].push(Reverse(propagator_id));
        }
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let Reverse(top_priority) = *self.present_priorities.peek()?;
        let top_priority = top_priority as usize;
        tendril_assert_moderate!(!self.queues[top_priority].is_empty());

        let next_propagator_id = self.queues[top_priority]
            .pop()
            .map(|Reverse(propagator_id)| propagator_id);

        if let Some(propagator_id) = next_propagator_id {
            self.is_enqueued[propagator_id] = false;
            self.num_enqueued -= 1;
        }

        if self.queues[top_priority].is_empty() {
            let _ = self.present_priorities.pop();
        }

        next_propagator_id
    }

    pub(crate) fn clear(&mut self) {
        while let Some(Reverse(priority)) = self.present_priorities.pop() {
            self.queues[priority as usize].clear();
        }

        for is_propagator_enqueued in self.is_enqueued.iter_mut() {
            *is_propagator_enqueued = false;
        }

        self.num_enqueued = 0;
    }

    pub(crate) fn is_propagator_enqueued(&self, propagator_id: PropagatorId) -> bool {
        self.is_enqueued
            .get(propagator_id)
            .copied()
            .unwrap_or_default()
    }
}
