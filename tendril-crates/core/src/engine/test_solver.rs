#![cfg(any(test, doc))]
//! This module exposes helpers that aid testing of propagators. The [`TestSolver`] allows
//! setting up specific scenarios under which to test the various operations of a propagator.
use super::variables::DomainId;
use super::State;
use crate::basic_types::Contradiction;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorState;

/// A container for CP variables, which can be used to test propagators.
#[derive(Debug, Default)]
pub(crate) struct TestSolver {
    pub(crate) state: State,
}

impl TestSolver {
    pub(crate) fn new_variable(&mut self, lb: i32, ub: i32) -> DomainId {
        self.state.new_interval_variable(lb, ub, None)
    }

    /// Adds the propagator as a posted constraint of its own and propagates to a fixed point.
    ///
    /// Unlike [`State::post`], the contradiction of the first propagation is returned as is.
    pub(crate) fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, Contradiction>
    where
        Constructor: PropagatorConstructor + 'static,
    {
        let mut builder = self.state.new_constraint("test");
        let handle = builder.add_propagator(constructor);
        let _ = builder.finish().expect("a propagator was added");

        self.state.engine.post(handle.untyped());
        self.propagate()?;

        Ok(handle)
    }

    pub(crate) fn propagate(&mut self) -> PropagationStatus {
        self.state.propagate_to_fixed_point()
    }

    pub(crate) fn is_entailed(&self, propagator: &impl Propagator) -> Entailment {
        propagator.is_entailed(self.state.domains())
    }

    pub(crate) fn propagator_state(&self, propagator: PropagatorId) -> PropagatorState {
        self.state.propagator_state(propagator)
    }

    pub(crate) fn contains(&self, var: DomainId, value: i32) -> bool {
        self.state.contains(var, value)
    }

    pub(crate) fn lower_bound(&self, var: DomainId) -> i32 {
        self.state.lower_bound(var)
    }

    pub(crate) fn upper_bound(&self, var: DomainId) -> i32 {
        self.state.upper_bound(var)
    }

    pub(crate) fn domain(&self, var: DomainId) -> Vec<i32> {
        self.state.iterate_domain(var).collect()
    }

    pub(crate) fn assert_bounds(&self, var: DomainId, lb: i32, ub: i32) {
        let actual_lb = self.lower_bound(var);
        let actual_ub = self.upper_bound(var);

        assert_eq!(
            (lb, ub), (actual_lb, actual_ub),
            "The expected bounds [{lb}..{ub}] did not match the actual bounds [{actual_lb}..{actual_ub}]"
        );
    }

    pub(crate) fn remove(&mut self, var: DomainId, value: i32) -> PropagationStatus {
        self.state.remove_value(var, value)
    }

    pub(crate) fn set_lower_bound(&mut self, var: DomainId, bound: i32) -> PropagationStatus {
        self.state.tighten_lower_bound(var, bound)
    }

    pub(crate) fn set_upper_bound(&mut self, var: DomainId, bound: i32) -> PropagationStatus {
        self.state.tighten_upper_bound(var, bound)
    }

    pub(crate) fn instantiate(&mut self, var: DomainId, value: i32) -> PropagationStatus {
        self.state.instantiate(var, value)
    }
}
