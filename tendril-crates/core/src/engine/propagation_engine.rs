use enumset::EnumSet;
use log::debug;
use log::trace;

use super::debug_helper::DebugHelper;
use super::ActivationOrder;
use super::ActivationQueue;
use super::Assignments;
use super::DomainEvent;
use super::EngineOptions;
use super::PriorityMode;
use super::PropagatorQueue;
use super::WatchList;
use crate::basic_types::Cause;
use crate::basic_types::PropagationStatus;
use crate::containers::KeyedVec;
use crate::create_statistics_struct;
use crate::engine::trailed::TrailedValues;
use crate::propagation::finalise_scope;
use crate::propagation::Domains;
use crate::propagation::DynPropagatorConstructor;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorState;
use crate::propagation::PropagatorStates;
use crate::propagation::PropagatorStore;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::tendril_assert_extreme;
use crate::tendril_assert_moderate;
use crate::tendril_assert_simple;

create_statistics_struct!(
    /// Counters kept by the [`PropagationEngine`].
    EngineStatistics {
        num_propagator_calls: u64,
        num_full_calls: u64,
        num_fine_calls: u64,
        num_activations: u64,
        num_contradictions: u64,
    }
);

/// The events a fine-grained propagator has not seen yet, per local id.
#[derive(Clone, Debug, Default)]
struct FineEvents {
    masks: KeyedVec<LocalId, EnumSet<DomainEvent>>,
    /// The local ids with a non-empty mask, in the order they were first touched.
    modified: Vec<LocalId>,
    delayed_full_propagation: bool,
}

impl FineEvents {
    fn clear(&mut self) {
        for local_id in self.modified.drain(..) {
            self.masks[local_id] = EnumSet::new();
        }
        self.delayed_full_propagation = false;
    }
}

/// Runs propagators until no propagator can prune any further, or until one of them reports a
/// contradiction.
///
/// Domain changes end up in the event sink of the [`Assignments`]. After every propagator run the
/// sink is drained and every watcher of a changed domain is advised; when the advice is positive
/// the propagator is placed in the bucket of its priority. Propagators of newly posted
/// constraints are kept in a separate activation queue, which is always drained first.
#[derive(Clone, Debug, Default)]
pub(crate) struct PropagationEngine {
    pub(crate) propagators: PropagatorStore,
    pub(crate) lifecycle: PropagatorStates,
    watch_list: WatchList,
    queue: PropagatorQueue,
    fine_events: KeyedVec<PropagatorId, FineEvents>,
    activation_queue: ActivationQueue,
    /// The propagator which is executing right now; propagators cannot reach the engine, so this
    /// is only used to check that dispatch is never re-entered.
    currently_executing: Option<PropagatorId>,
    options: EngineOptions,
    statistics: EngineStatistics,
}

impl PropagationEngine {
    pub(crate) fn new(options: EngineOptions) -> Self {
        PropagationEngine {
            options,
            ..Default::default()
        }
    }

    /// Makes room for a new variable.
    pub(crate) fn grow(&mut self) {
        self.watch_list.grow();
    }

    /// Creates the propagator and registers its watchers. The propagator starts out as
    /// [`PropagatorState::New`] and is not scheduled until it is activated.
    pub(crate) fn add_propagator(
        &mut self,
        constructor: Box<dyn DynPropagatorConstructor>,
        assignments: &Assignments,
        trailed_values: &mut TrailedValues,
    ) -> PropagatorId {
        let propagator_id = self.propagators.next_id();

        let mut scope = Vec::new();
        let context = PropagatorConstructorContext::new(
            propagator_id,
            &mut self.watch_list,
            &mut scope,
            assignments,
            trailed_values,
        );
        let propagator = constructor.create_boxed(context);
        let scope = finalise_scope(propagator_id, scope);

        let mut fine_events = FineEvents::default();
        for _ in 0..scope.len() {
            let _ = fine_events.masks.push(EnumSet::new());
        }
        let _ = self.fine_events.push(fine_events);

        debug!(
            "Created {propagator_id} ({}) over {scope:?}",
            propagator.name()
        );

        let id = self.propagators.add(propagator, scope);
        let lifecycle_id = self.lifecycle.grow();
        tendril_assert_simple!(id == propagator_id && lifecycle_id == propagator_id);

        id
    }

    pub(crate) fn state(&self, propagator: PropagatorId) -> PropagatorState {
        self.lifecycle.get(propagator)
    }

    /// Queues the propagator for its first full propagation. From now on it is activated again
    /// whenever backtracking makes it new.
    pub(crate) fn post(&mut self, propagator: PropagatorId) {
        self.propagators.make_permanent(propagator);
        self.activation_queue.push(propagator);
    }

    /// Queues the propagator for its first full propagation in the current branch only. Once
    /// backtracking makes it new again it stays new.
    pub(crate) fn post_temporary(&mut self, propagator: PropagatorId) {
        self.activation_queue.push(propagator);
    }

    pub(crate) fn set_reified_silent(&mut self, propagator: PropagatorId) {
        self.lifecycle.set_reified_silent(propagator);
    }

    pub(crate) fn is_at_fixed_point(&self) -> bool {
        self.queue.is_empty() && self.activation_queue.is_empty()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.lifecycle.new_checkpoint();
    }

    /// Undoes every lifecycle transition made after `new_checkpoint`; posted propagators which
    /// become new again are queued for activation.
    ///
    /// Propagators of temporary posts which are still waiting for activation were queued after
    /// the last checkpoint, since a checkpoint is only created at a fixed point, so they are
    /// dropped.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        for propagator in self.lifecycle.synchronise(new_checkpoint) {
            if self.propagators.info(propagator).is_permanent {
                self.activation_queue.push(propagator);
            }
        }

        let lifecycle = &self.lifecycle;
        let propagators = &self.propagators;
        self.activation_queue.retain(|propagator| {
            lifecycle.get(propagator) == PropagatorState::New
                && propagators.info(propagator).is_permanent
        });

        self.clear_scheduled();
    }

    /// Propagates until a fixed point is reached or a contradiction is found.
    ///
    /// The pending events of the assignments are treated as decisions. On a contradiction nothing
    /// remains scheduled, apart from posted propagators which have not been activated yet.
    pub(crate) fn propagate(
        &mut self,
        assignments: &mut Assignments,
        trailed_values: &mut TrailedValues,
    ) -> PropagationStatus {
        tendril_assert_simple!(self.currently_executing.is_none());

        self.notify_events(assignments, trailed_values, Cause::Decision);

        if self.options.activation_order == ActivationOrder::Priority {
            let propagators = &self.propagators;
            self.activation_queue.sort_by_key(|&propagator| {
                let info = propagators.info(propagator);
                (info.priority, info.scope.len(), propagator)
            });
        }

        let status = self.propagate_until_fixed_point(assignments, trailed_values);

        match status {
            Ok(()) => {
                tendril_assert_extreme!(DebugHelper::debug_fixed_point_propagation(
                    assignments,
                    trailed_values,
                    &self.propagators,
                    &self.lifecycle,
                ));
            }
            Err(contradiction) => {
                self.statistics.num_contradictions += 1;
                debug!("Propagation stopped: {contradiction}");
                self.flush(assignments);
            }
        }

        status
    }

    fn propagate_until_fixed_point(
        &mut self,
        assignments: &mut Assignments,
        trailed_values: &mut TrailedValues,
    ) -> PropagationStatus {
        loop {
            if let Some(propagator) = self.activation_queue.pop() {
                match self.lifecycle.get(propagator) {
                    PropagatorState::New => self.lifecycle.set_active(propagator),
                    PropagatorState::Active => {}
                    PropagatorState::ReifiedSilent | PropagatorState::Passive => continue,
                }

                self.statistics.num_activations += 1;
                debug!(
                    "Activating {propagator} ({})",
                    self.propagators[propagator].name()
                );

                self.call_propagate(propagator, assignments, trailed_values)?;
                self.notify_events(assignments, trailed_values, Cause::Propagator(propagator));
                continue;
            }

            let Some(propagator) = self.queue.pop() else {
                return Ok(());
            };

            if self.propagators.info(propagator).reacts_to_fine_events {
                self.run_fine(propagator, assignments, trailed_values)?;
            } else if self.lifecycle.is_active(propagator) {
                self.call_propagate(propagator, assignments, trailed_values)?;
            }

            self.notify_events(assignments, trailed_values, Cause::Propagator(propagator));
        }
    }

    /// Delivers the pending fine events of the propagator one local id at a time, followed by a
    /// full propagation if the propagator asked for it.
    fn run_fine(
        &mut self,
        propagator: PropagatorId,
        assignments: &mut Assignments,
        trailed_values: &mut TrailedValues,
    ) -> PropagationStatus {
        let mut modified = std::mem::take(&mut self.fine_events[propagator].modified);

        for (index, &local_id) in modified.iter().enumerate() {
            let events = std::mem::take(&mut self.fine_events[propagator].masks[local_id]);
            if !self.lifecycle.is_active(propagator) {
                continue;
            }

            trace!("Fine call of {propagator} for local id {local_id} with {events:?}");
            self.statistics.num_propagator_calls += 1;
            self.statistics.num_fine_calls += 1;

            self.currently_executing = Some(propagator);
            let context = PropagationContext::new(
                assignments,
                trailed_values,
                &mut self.lifecycle,
                &mut self.activation_queue,
                &mut self.fine_events[propagator].delayed_full_propagation,
                propagator,
            );
            let status = self.propagators[propagator].propagate_fine(context, local_id, events);
            self.currently_executing = None;

            if let Err(contradiction) = status {
                // The masks of the local ids after this one are still set; they have to stay
                // listed so that clearing the fine events resets them.
                self.fine_events[propagator]
                    .modified
                    .extend_from_slice(&modified[index + 1..]);
                return Err(contradiction);
            }
        }

        // Keep the allocation of the buffer.
        modified.clear();
        self.fine_events[propagator].modified = modified;

        if std::mem::take(&mut self.fine_events[propagator].delayed_full_propagation)
            && self.lifecycle.is_active(propagator)
        {
            self.call_propagate(propagator, assignments, trailed_values)?;
        }

        Ok(())
    }

    fn call_propagate(
        &mut self,
        propagator: PropagatorId,
        assignments: &mut Assignments,
        trailed_values: &mut TrailedValues,
    ) -> PropagationStatus {
        trace!("Full call of {propagator}");
        self.statistics.num_propagator_calls += 1;
        self.statistics.num_full_calls += 1;

        // Requests for a delayed full propagation are meaningless during a full propagation.
        let mut delayed_full_propagation = false;

        self.currently_executing = Some(propagator);
        let context = PropagationContext::new(
            assignments,
            trailed_values,
            &mut self.lifecycle,
            &mut self.activation_queue,
            &mut delayed_full_propagation,
            propagator,
        );
        let status = self.propagators[propagator].propagate(context);
        self.currently_executing = None;

        status
    }

    /// Drains the event sink and schedules every active watcher whose interest is hit and whose
    /// advice is positive. The propagator which caused the events is not scheduled again.
    fn notify_events(
        &mut self,
        assignments: &mut Assignments,
        trailed_values: &TrailedValues,
        cause: Cause,
    ) {
        for (domain, events) in assignments.drain_events() {
            for index in 0..self.watch_list.num_watchers(domain) {
                let watcher = self.watch_list.get(domain, index);

                if cause.propagator() == Some(watcher.propagator)
                    || !self.lifecycle.is_active(watcher.propagator)
                {
                    continue;
                }

                let relevant_events = watcher.events & events;
                if relevant_events.is_empty() {
                    continue;
                }

                let domains = Domains::new(assignments, trailed_values);
                if !self.propagators[watcher.propagator].advise(
                    domains,
                    watcher.local_id,
                    relevant_events,
                ) {
                    continue;
                }

                self.schedule(
                    watcher.propagator,
                    watcher.local_id,
                    relevant_events,
                    assignments,
                );
            }
        }
    }

    fn schedule(
        &mut self,
        propagator: PropagatorId,
        local_id: LocalId,
        events: EnumSet<DomainEvent>,
        assignments: &Assignments,
    ) {
        tendril_assert_moderate!(self.currently_executing.is_none());

        if self.propagators.info(propagator).reacts_to_fine_events {
            let fine_events = &mut self.fine_events[propagator];
            if fine_events.masks[local_id].is_empty() {
                fine_events.modified.push(local_id);
            }
            fine_events.masks[local_id].insert_all(events);
        }

        let bucket = self.bucket(propagator, assignments);
        trace!("Scheduling {propagator} in bucket {bucket} for {events:?}");
        self.queue.enqueue_propagator(propagator, bucket);
    }

    fn bucket(&self, propagator: PropagatorId, assignments: &Assignments) -> u8 {
        let info = self.propagators.info(propagator);
        let static_bucket = info.priority.bucket();

        match self.options.priority_mode {
            PriorityMode::Static => static_bucket,
            PriorityMode::Dynamic => {
                let num_unfixed = info
                    .scope
                    .iter()
                    .filter(|&&domain| !assignments.is_domain_assigned(domain))
                    .take(4)
                    .count() as u8;

                if num_unfixed <= 3 {
                    num_unfixed.min(static_bucket)
                } else {
                    static_bucket
                }
            }
        }
    }

    fn clear_scheduled(&mut self) {
        self.queue.clear();
        for fine_events in self.fine_events.iter_mut() {
            fine_events.clear();
        }
    }

    /// Discards everything which is scheduled after a contradiction. Posted propagators which
    /// never got activated stay in the activation queue.
    fn flush(&mut self, assignments: &mut Assignments) {
        self.currently_executing = None;
        self.clear_scheduled();
        assignments.clear_events();

        let lifecycle = &self.lifecycle;
        self.activation_queue
            .retain(|propagator| lifecycle.get(propagator) == PropagatorState::New);
    }

    pub(crate) fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics
            .log(statistic_logger.attach_to_prefix("engine"));

        for propagator_id in self.propagators.iter_ids() {
            let propagator = &self.propagators[propagator_id];
            propagator.log_statistics(StatisticLogger::new([
                "propagator".to_owned(),
                format!("{}", propagator_id.0),
                propagator.name().to_owned(),
            ]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::Entailment;
    use crate::engine::DomainEvents;
    use crate::engine::variables::DomainId;
    use crate::propagation::Priority;
    use crate::propagation::Propagator;
    use crate::propagation::PropagatorConstructor;
    use crate::propagation::ReadDomains;

    /// `x <= bound`.
    #[derive(Clone)]
    struct AtMost {
        x: DomainId,
        bound: i32,
    }

    impl PropagatorConstructor for AtMost {
        type PropagatorImpl = AtMost;

        fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
            context.register(self.x, DomainEvents::BOUNDS, LocalId::from(0));
            self
        }
    }

    impl Propagator for AtMost {
        fn name(&self) -> &str {
            "AtMost"
        }

        fn priority(&self) -> Priority {
            Priority::Unary
        }

        fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
            context.tighten_upper_bound(self.x, self.bound)
        }

        fn is_entailed(&self, domains: Domains) -> Entailment {
            if domains.upper_bound(self.x) <= self.bound {
                Entailment::True
            } else if domains.lower_bound(self.x) > self.bound {
                Entailment::False
            } else {
                Entailment::Unknown
            }
        }
    }

    fn setup() -> (PropagationEngine, Assignments, TrailedValues, DomainId) {
        let mut engine = PropagationEngine::default();
        let mut assignments = Assignments::default();
        let trailed_values = TrailedValues::default();

        let x = assignments.grow(0, 10);
        engine.grow();

        (engine, assignments, trailed_values, x)
    }

    #[test]
    fn a_new_propagator_is_not_scheduled_on_events() {
        let (mut engine, mut assignments, mut trailed_values, x) = setup();
        let propagator = engine.add_propagator(
            Box::new(AtMost { x, bound: 5 }),
            &assignments,
            &mut trailed_values,
        );

        let _ = assignments.tighten_lower_bound(x, 1).expect("non-empty");
        engine
            .propagate(&mut assignments, &mut trailed_values)
            .expect("no contradiction");

        assert_eq!(engine.state(propagator), PropagatorState::New);
        assert_eq!(assignments.get_upper_bound(x), 10);
    }

    #[test]
    fn a_posted_propagator_is_activated_once() {
        let (mut engine, mut assignments, mut trailed_values, x) = setup();
        let propagator = engine.add_propagator(
            Box::new(AtMost { x, bound: 5 }),
            &assignments,
            &mut trailed_values,
        );

        engine.post(propagator);
        engine
            .propagate(&mut assignments, &mut trailed_values)
            .expect("no contradiction");

        assert_eq!(engine.state(propagator), PropagatorState::Active);
        assert_eq!(assignments.get_upper_bound(x), 5);
        assert_eq!(engine.statistics.num_activations, 1);
        assert!(engine.is_at_fixed_point());
    }

    #[test]
    fn a_contradiction_leaves_nothing_scheduled() {
        let (mut engine, mut assignments, mut trailed_values, x) = setup();
        let propagator = engine.add_propagator(
            Box::new(AtMost { x, bound: 5 }),
            &assignments,
            &mut trailed_values,
        );

        assignments.new_checkpoint();
        engine.new_checkpoint();
        let _ = assignments.tighten_lower_bound(x, 6).expect("non-empty");
        engine.post(propagator);

        let contradiction = engine
            .propagate(&mut assignments, &mut trailed_values)
            .expect_err("x >= 6 and x <= 5");

        assert_eq!(contradiction.cause, Cause::Propagator(propagator));
        assert_eq!(contradiction.domain, Some(x));
        assert!(engine.is_at_fixed_point());
        assert!(!assignments.has_pending_events());
        assert_eq!(engine.statistics.num_contradictions, 1);

        assignments.synchronise(0);
        engine.synchronise(0);
        assert!(!engine.is_at_fixed_point());

        engine
            .propagate(&mut assignments, &mut trailed_values)
            .expect("no contradiction");
        assert_eq!(assignments.get_upper_bound(x), 5);
    }

    #[test]
    fn a_temporary_propagator_is_not_activated_again_after_backtracking() {
        let (mut engine, mut assignments, mut trailed_values, x) = setup();
        let activated = engine.add_propagator(
            Box::new(AtMost { x, bound: 5 }),
            &assignments,
            &mut trailed_values,
        );
        let pending = engine.add_propagator(
            Box::new(AtMost { x, bound: 3 }),
            &assignments,
            &mut trailed_values,
        );

        assignments.new_checkpoint();
        engine.new_checkpoint();
        engine.post_temporary(activated);
        engine
            .propagate(&mut assignments, &mut trailed_values)
            .expect("no contradiction");
        assert_eq!(assignments.get_upper_bound(x), 5);

        assignments.new_checkpoint();
        engine.new_checkpoint();
        engine.post_temporary(pending);

        assignments.synchronise(0);
        engine.synchronise(0);
        assert_eq!(engine.state(activated), PropagatorState::New);
        assert_eq!(engine.state(pending), PropagatorState::New);
        assert!(engine.is_at_fixed_point());

        engine
            .propagate(&mut assignments, &mut trailed_values)
            .expect("no contradiction");
        assert_eq!(assignments.get_upper_bound(x), 10);
    }

    #[test]
    fn a_posted_propagator_is_activated_again_after_backtracking() {
        let (mut engine, mut assignments, mut trailed_values, x) = setup();
        let propagator = engine.add_propagator(
            Box::new(AtMost { x, bound: 5 }),
            &assignments,
            &mut trailed_values,
        );

        assignments.new_checkpoint();
        engine.new_checkpoint();
        engine.post(propagator);
        engine
            .propagate(&mut assignments, &mut trailed_values)
            .expect("no contradiction");
        assert_eq!(assignments.get_upper_bound(x), 5);

        assignments.synchronise(0);
        engine.synchronise(0);
        assert_eq!(engine.state(propagator), PropagatorState::New);
        assert_eq!(assignments.get_upper_bound(x), 10);

        engine
            .propagate(&mut assignments, &mut trailed_values)
            .expect("no contradiction");
        assert_eq!(engine.state(propagator), PropagatorState::Active);
        assert_eq!(assignments.get_upper_bound(x), 5);
    }
}
