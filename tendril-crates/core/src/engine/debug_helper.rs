use log::warn;

use super::ActivationQueue;
use super::Assignments;
use crate::engine::trailed::TrailedValues;
use crate::propagation::PropagationContext;
use crate::propagation::PropagatorStates;
use crate::propagation::PropagatorStore;

#[derive(Debug, Copy, Clone)]
pub(crate) struct DebugHelper {}

impl DebugHelper {
    /// Checks whether the reported fixed point is correct, i.e. whether any propagations or
    /// contradictions were missed.
    ///
    /// Every active propagator is asked to propagate from scratch on a copy of the state; the check
    /// fails if that prunes a value or raises a contradiction. Since the engine does not call a
    /// propagator again after its own changes, this also catches propagators which are not
    /// idempotent.
    ///
    /// Only to be called after propagation reached a fixed point without a contradiction.
    pub(crate) fn debug_fixed_point_propagation(
        assignments: &Assignments,
        trailed_values: &TrailedValues,
        propagators: &PropagatorStore,
        lifecycle: &PropagatorStates,
    ) -> bool {
        let mut assignments_clone = assignments.clone();
        let mut trailed_values_clone = trailed_values.clone();
        let mut lifecycle_clone = lifecycle.clone();
        let mut activation_queue = ActivationQueue::default();

        for propagator_id in propagators.iter_ids() {
            if !lifecycle_clone.is_active(propagator_id) {
                continue;
            }

            let mut propagator = dyn_clone::clone_box(&propagators[propagator_id]);
            let num_pruned_before_propagation = assignments_clone.get_pruned_value_count();

            let mut delayed_full_propagation = false;
            let context = PropagationContext::new(
                &mut assignments_clone,
                &mut trailed_values_clone,
                &mut lifecycle_clone,
                &mut activation_queue,
                &mut delayed_full_propagation,
                propagator_id,
            );
            let status = propagator.propagate(context);

            if let Err(contradiction) = status {
                warn!(
                    "Propagator '{}' with id '{propagator_id}' seems to have missed a contradiction in its regular propagation: {contradiction}",
                    propagator.name()
                );
                return false;
            }

            let num_missed_propagations =
                assignments_clone.get_pruned_value_count() - num_pruned_before_propagation;
            if num_missed_propagations > 0 {
                warn!(
                    "Propagator '{}' with id '{propagator_id}' missed {num_missed_propagations} removals",
                    propagator.name()
                );
                return false;
            }
        }

        true
    }
}
