use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
use dyn_clone::clone_trait_object;
use dyn_clone::DynClone;
use enumset::EnumSet;

use super::DynPropagatorConstructor;
use super::Domains;
use super::LocalId;
use super::PropagationContext;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainEvent;
#[cfg(doc)]
use crate::engine::DomainEvents;
#[cfg(doc)]
use crate::propagation::PropagatorConstructorContext;
use crate::statistics::StatisticLogger;

// Needed to get from `Box<dyn Propagator>` back to the concrete propagator behind a
// `PropagatorHandle`.
impl_downcast!(Propagator);

// Propagators are cloned to serve as entailment probes for negation and reification, and when
// the state is cloned.
clone_trait_object!(Propagator);

/// A propagator removes values from domains which cannot be part of any solution, or reports a
/// contradiction.
///
/// The required functions are [`Propagator::name`], [`Propagator::priority`],
/// [`Propagator::propagate`] and [`Propagator::is_entailed`]; the others have default
/// implementations.
///
/// # Contract
/// - [`Propagator::propagate`] must be idempotent: calling it twice without an external change to
///   the domains in between makes no change the second time.
/// - Domains may only be changed through the mutators of the [`PropagationContext`], never
///   directly.
/// - A propagator which is stateless between runs needs no special care on backtracking. Internal
///   counters that have to follow the search must be stored in trailed integers (see
///   [`PropagatorConstructorContext::new_trailed_integer`]).
/// - The interest registered for a variable must be conservative: if an event could enable further
///   filtering, the propagator must have registered for it.
pub trait Propagator: Downcast + DynClone {
    /// Return the name of the propagator, used for logging and statistics.
    fn name(&self) -> &str;

    /// The static priority class of this propagator, usually derived from its arity with
    /// [`Priority::from_arity`].
    fn priority(&self) -> Priority;

    /// Whether the engine should deliver events per variable through
    /// [`Propagator::propagate_fine`]. When `false`, every event leads to a call of
    /// [`Propagator::propagate`] instead.
    fn reacts_to_fine_events(&self) -> bool {
        false
    }

    /// Decides whether the propagator should be scheduled after `events` happened on the variable
    /// with the given [`LocalId`].
    ///
    /// This is only called for events which intersect the [`DomainEvents`] registered for that
    /// variable, so the default of always scheduling amounts to "the event intersects the declared
    /// interest". Overriding this may only make the decision more precise, never skip an event
    /// that could lead to filtering.
    fn advise(
        &mut self,
        _domains: Domains,
        _local_id: LocalId,
        _events: EnumSet<DomainEvent>,
    ) -> bool {
        true
    }

    /// Re-derives all filtering from the current domains.
    ///
    /// In case no contradiction has been detected this returns [`Result::Ok`], otherwise a
    /// [`Result::Err`] with the [`Contradiction`](crate::basic_types::Contradiction), either
    /// because a mutator would empty a domain or because the propagator found the current
    /// domains to be inconsistent (see [`PropagationContext::contradiction`]).
    fn propagate(&mut self, context: PropagationContext) -> PropagationStatus;

    /// Reacts to `events` on a single variable.
    ///
    /// Only called when [`Propagator::reacts_to_fine_events`] returns `true`, in which case it
    /// must be implemented. The mask is cleared before this is called, so events raised while it
    /// runs are collected anew.
    fn propagate_fine(
        &mut self,
        context: PropagationContext,
        _local_id: LocalId,
        _events: EnumSet<DomainEvent>,
    ) -> PropagationStatus {
        if self.reacts_to_fine_events() {
            panic!(
                "The propagator {} reacts to fine events but does not implement `propagate_fine`",
                self.name()
            );
        }

        self.propagate(context)
    }

    /// Whether the relation of the propagator holds for all, none, or only some of the
    /// assignments left in the current domains.
    fn is_entailed(&self, domains: Domains) -> Entailment;

    /// A constructor for a propagator enforcing exactly the negation of this one.
    ///
    /// Used when the negation of a constraint consisting of only this propagator is requested.
    /// By default [`None`], in which case the negation only fails when this propagator is
    /// entailed, without any filtering of its own.
    fn negation(&self) -> Option<Box<dyn DynPropagatorConstructor>> {
        None
    }

    /// Logs statistics of the propagator using the provided [`StatisticLogger`].
    ///
    /// It is recommended to create a struct through the
    /// [`create_statistics_struct!`](crate::create_statistics_struct) macro!
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// The priority class of a propagator, an estimate of the cost of a call to
/// [`Propagator::propagate`] derived from its arity.
///
/// Propagators with a lower value are run first. Bucket 0 is not a class; it is only reached
/// through dynamic priorities, when every variable of a propagator is instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Priority {
    Unary = 1,
    Binary = 2,
    Ternary = 3,
    Linear = 4,
    Quadratic = 5,
    Cubic = 6,
    VerySlow = 7,
}

impl Priority {
    /// The number of scheduling buckets, including the one reserved for dynamic priorities.
    pub const NUM_BUCKETS: usize = 8;

    pub fn from_arity(arity: usize) -> Priority {
        match arity {
            0 | 1 => Priority::Unary,
            2 => Priority::Binary,
            3 => Priority::Ternary,
            _ => Priority::Linear,
        }
    }

    pub fn bucket(self) -> u8 {
        self as u8
    }
}
