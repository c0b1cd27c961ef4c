//! Shared setup for the integration tests of the propagation core.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use enumset::EnumSet;
use tendril_core::propagation::Domains;
use tendril_core::propagation::LocalId;
use tendril_core::propagation::PropagationContext;
use tendril_core::propagation::Priority;
use tendril_core::propagation::Propagator;
use tendril_core::propagation::PropagatorConstructor;
use tendril_core::propagation::PropagatorConstructorContext;
use tendril_core::propagation::PropagatorState;
use tendril_core::DomainEvent;
use tendril_core::DomainEvents;
use tendril_core::DomainId;
use tendril_core::Entailment;
use tendril_core::PropagationStatus;
use tendril_core::State;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Everything that is restored on backtracking.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Snapshot {
    pub(crate) domains: Vec<Vec<i32>>,
    pub(crate) lifecycle: Vec<PropagatorState>,
    pub(crate) trail_len: usize,
}

impl Snapshot {
    pub(crate) fn take(state: &State, variables: &[DomainId]) -> Snapshot {
        Snapshot {
            domains: domains(state, variables),
            lifecycle: state
                .propagator_ids()
                .map(|propagator| state.propagator_state(propagator))
                .collect(),
            trail_len: state.trail_len(),
        }
    }
}

pub(crate) fn domains(state: &State, variables: &[DomainId]) -> Vec<Vec<i32>> {
    variables
        .iter()
        .map(|&variable| state.iterate_domain(variable).collect())
        .collect()
}

/// Watches a single variable and counts how often it is advised and propagated; prunes
/// nothing.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CountingArgs {
    pub(crate) x: DomainId,
    pub(crate) events: DomainEvents,
}

impl PropagatorConstructor for CountingArgs {
    type PropagatorImpl = CountingPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.x, self.events, LocalId::from(0));

        CountingPropagator {
            num_advised: 0,
            num_propagations: 0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct CountingPropagator {
    pub(crate) num_advised: usize,
    pub(crate) num_propagations: usize,
}

impl Propagator for CountingPropagator {
    fn name(&self) -> &str {
        "Counting"
    }

    fn priority(&self) -> Priority {
        Priority::Unary
    }

    fn advise(
        &mut self,
        _domains: Domains,
        _local_id: LocalId,
        _events: EnumSet<DomainEvent>,
    ) -> bool {
        self.num_advised += 1;
        true
    }

    fn propagate(&mut self, _context: PropagationContext) -> PropagationStatus {
        self.num_propagations += 1;
        Ok(())
    }

    fn is_entailed(&self, _domains: Domains) -> Entailment {
        Entailment::Unknown
    }
}
