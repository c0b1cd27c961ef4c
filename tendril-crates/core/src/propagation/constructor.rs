use super::Domains;
use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;
use crate::engine::variables::DomainId;
use crate::engine::Assignments;
use crate::engine::DomainEvents;
use crate::engine::WatchList;
use crate::engine::Watcher;

/// A propagator constructor creates a fully initialized instance of a [`Propagator`].
///
/// The constructor is responsible for indicating on which events the propagator should be
/// enqueued. Additionally, the propagator can be initialized with values that come from the state
/// of the solver.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator + Clone;

    /// Create the propagator instance from `Self`.
    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl;
}

/// The object-safe counterpart of [`PropagatorConstructor`], used where the concrete propagator
/// is not known statically, e.g. for [`Propagator::negation`].
pub trait DynPropagatorConstructor {
    fn create_boxed(self: Box<Self>, context: PropagatorConstructorContext) -> Box<dyn Propagator>;
}

impl<Constructor: PropagatorConstructor> DynPropagatorConstructor for Constructor {
    fn create_boxed(self: Box<Self>, context: PropagatorConstructorContext) -> Box<dyn Propagator> {
        Box::new((*self).create(context))
    }
}

/// [`PropagatorConstructorContext`] is used when [`Propagator`]s are initialised after creation.
///
/// Propagators use the [`PropagatorConstructorContext`] to register to domain changes
/// of variables, to allocate trailed integers and to retrieve the current bounds of variables.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    propagator_id: PropagatorId,
    watch_list: &'a mut WatchList,
    /// The variable registered for every [`LocalId`]; together these form the scope.
    scope: &'a mut Vec<Option<DomainId>>,
    assignments: &'a Assignments,
    trailed_values: &'a mut TrailedValues,
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        propagator_id: PropagatorId,
        watch_list: &'a mut WatchList,
        scope: &'a mut Vec<Option<DomainId>>,
        assignments: &'a Assignments,
        trailed_values: &'a mut TrailedValues,
    ) -> Self {
        PropagatorConstructorContext {
            propagator_id,
            watch_list,
            scope,
            assignments,
            trailed_values,
        }
    }

    /// Get domain information.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.assignments, self.trailed_values)
    }

    /// The id the propagator under construction will receive.
    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// Subscribes the propagator to the given [`DomainEvents`].
    ///
    /// The domain events determine when [`Propagator::advise`] is consulted and the propagator is
    /// scheduled. The [`LocalId`] is the position of the variable in the scope of the propagator
    /// and identifies the variable in [`Propagator::advise`] and [`Propagator::propagate_fine`].
    ///
    /// Local ids have to be contiguous starting from 0; the scope may not have gaps. A variable
    /// which occurs twice in the scope is registered under two local ids.
    pub fn register(&mut self, var: DomainId, domain_events: DomainEvents, local_id: LocalId) {
        let index = local_id.unpack() as usize;
        if self.scope.len() <= index {
            self.scope.resize(index + 1, None);
        }

        match self.scope[index] {
            Some(registered) if registered != var => panic!(
                "{} registers {var} under local id {local_id}, which already belongs to {registered}",
                self.propagator_id
            ),
            _ => self.scope[index] = Some(var),
        }

        self.watch_list.watch(
            var,
            Watcher {
                propagator: self.propagator_id,
                local_id,
                events: domain_events.events(),
            },
        );
    }

    /// Allocates an integer which is restored on backtracking.
    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.trailed_values.grow(initial_value)
    }
}

/// Turns the local ids registered during construction into the scope of the propagator.
pub(crate) fn finalise_scope(
    propagator_id: PropagatorId,
    scope: Vec<Option<DomainId>>,
) -> Vec<DomainId> {
    scope
        .into_iter()
        .enumerate()
        .map(|(index, var)| {
            var.unwrap_or_else(|| {
                panic!("{propagator_id} did not register a variable for local id {index}")
            })
        })
        .collect()
}
