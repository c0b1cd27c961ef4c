use crate::basic_types::contradiction;
use crate::basic_types::Cause;
use crate::basic_types::Contradiction;
use crate::basic_types::PropagationStatus;
use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;
use crate::engine::variables::DomainId;
use crate::engine::ActivationQueue;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::propagation::domains::private::HasDomains;
use crate::propagation::Domains;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorStates;
#[cfg(doc)]
use crate::propagation::Propagator;
#[cfg(doc)]
use crate::propagation::ReadDomains;

/// Provides information about the state of the solver to a propagator, and is the only way for a
/// propagator to change it.
///
/// Domains can be read through the implementation of [`ReadDomains`]. Every mutator returns a
/// [`PropagationStatus`] which is an error when the change would empty the domain; in that case
/// the domain is left untouched and the error should be returned from
/// [`Propagator::propagate`] with `?`.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    pub(crate) assignments: &'a mut Assignments,
    pub(crate) trailed_values: &'a mut TrailedValues,
    lifecycle: &'a mut PropagatorStates,
    activation_queue: &'a mut ActivationQueue,
    delayed_full_propagation: &'a mut bool,
    propagator_id: PropagatorId,
}

impl HasDomains for PropagationContext<'_> {
    fn read_domains(&self) -> Domains<'_> {
        Domains::new(self.assignments, self.trailed_values)
    }
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        assignments: &'a mut Assignments,
        trailed_values: &'a mut TrailedValues,
        lifecycle: &'a mut PropagatorStates,
        activation_queue: &'a mut ActivationQueue,
        delayed_full_propagation: &'a mut bool,
        propagator_id: PropagatorId,
    ) -> Self {
        PropagationContext {
            assignments,
            trailed_values,
            lifecycle,
            activation_queue,
            delayed_full_propagation,
            propagator_id,
        }
    }

    /// Get the current domain information.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.assignments, self.trailed_values)
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    fn wipeout(&self, domain: DomainId) -> Contradiction {
        contradiction(
            Some(domain),
            Cause::Propagator(self.propagator_id),
            "empty domain",
        )
    }

    fn apply(&self, domain: DomainId, result: Result<bool, EmptyDomain>) -> PropagationStatus {
        match result {
            Ok(_) => Ok(()),
            Err(EmptyDomain) => Err(self.wipeout(domain)),
        }
    }

    /// Removes every value below `bound`.
    pub fn tighten_lower_bound(&mut self, domain: DomainId, bound: i32) -> PropagationStatus {
        let result = self.assignments.tighten_lower_bound(domain, bound);
        self.apply(domain, result)
    }

    /// Removes every value above `bound`.
    pub fn tighten_upper_bound(&mut self, domain: DomainId, bound: i32) -> PropagationStatus {
        let result = self.assignments.tighten_upper_bound(domain, bound);
        self.apply(domain, result)
    }

    pub fn remove_value(&mut self, domain: DomainId, value: i32) -> PropagationStatus {
        let result = self.assignments.remove_value(domain, value);
        self.apply(domain, result)
    }

    /// Reduces the domain to `{value}`.
    pub fn instantiate(&mut self, domain: DomainId, value: i32) -> PropagationStatus {
        let result = self.assignments.instantiate(domain, value);
        self.apply(domain, result)
    }

    /// Creates a contradiction on behalf of the propagator, for when it finds the current domains
    /// inconsistent without any single domain becoming empty.
    pub fn contradiction(&self, domain: Option<DomainId>, message: &'static str) -> Contradiction {
        contradiction(domain, Cause::Propagator(self.propagator_id), message)
    }

    /// Marks the propagator as entailed: it is not scheduled again until backtracking undoes this.
    pub fn set_passive(&mut self) {
        self.lifecycle.set_passive(self.propagator_id);
    }

    pub fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.trailed_values.assign(trailed_integer, value);
    }

    pub fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.trailed_values.add_assign(trailed_integer, addition);
    }

    /// Requests a call to [`Propagator::propagate`] once the current fine-grained event has been
    /// handled. Has no effect when called from [`Propagator::propagate`] itself.
    pub fn force_full_propagation(&mut self) {
        *self.delayed_full_propagation = true;
    }

    /// Switches silent propagators of a reified constraint on and queues them for their first
    /// propagation.
    pub(crate) fn activate_reified(&mut self, propagators: &[PropagatorId]) {
        for &propagator in propagators {
            self.lifecycle.set_reified_true(propagator);
            self.activation_queue.push(propagator);
        }
    }
}
