use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

use super::Priority;
use super::Propagator;
use super::PropagatorId;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;

/// What the engine keeps about a propagator next to the propagator itself.
#[derive(Clone, Debug)]
pub(crate) struct PropagatorInfo {
    /// The variable behind every local id.
    pub(crate) scope: Vec<DomainId>,
    pub(crate) priority: Priority,
    pub(crate) reacts_to_fine_events: bool,
    /// Set once the propagator belongs to a posted constraint; it then has to be active in every
    /// branch below the checkpoint where it was posted, and is queued for activation again when
    /// backtracking makes it new.
    pub(crate) is_permanent: bool,
}

/// A central store for propagators.
#[derive(Default, Clone)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
    info: KeyedVec<PropagatorId, PropagatorInfo>,
}

/// A typed wrapper around a [`PropagatorId`] that allows retrieving concrete propagators from the
/// [`State`](crate::State).
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PropagatorHandle<P> {
    id: PropagatorId,
    propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    pub(crate) fn new(id: PropagatorId) -> Self {
        PropagatorHandle {
            id,
            propagator: PhantomData,
        }
    }

    /// Get a type-erased handle to the propagator.
    pub fn untyped(self) -> PropagatorId {
        self.id
    }
}

impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}

impl PropagatorStore {
    pub(crate) fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    /// The id the next added propagator will receive.
    pub(crate) fn next_id(&self) -> PropagatorId {
        self.propagators.next_key()
    }

    pub(crate) fn add(
        &mut self,
        propagator: Box<dyn Propagator>,
        scope: Vec<DomainId>,
    ) -> PropagatorId {
        let _ = self.info.push(PropagatorInfo {
            scope,
            priority: propagator.priority(),
            reacts_to_fine_events: propagator.reacts_to_fine_events(),
            is_permanent: false,
        });
        self.propagators.push(propagator)
    }

    pub(crate) fn info(&self, propagator: PropagatorId) -> &PropagatorInfo {
        &self.info[propagator]
    }

    pub(crate) fn make_permanent(&mut self, propagator: PropagatorId) {
        self.info[propagator].is_permanent = true;
    }

    pub(crate) fn iter_ids(&self) -> impl Iterator<Item = PropagatorId> {
        self.propagators.keys()
    }

    /// Get a reference to the propagator identified by the given handle.
    ///
    /// To prevent downcasting, [`PropagatorStore`] implements [`Index`] and [`IndexMut`] with
    /// [`PropagatorId`] as an index.
    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self[handle.id].downcast_ref()
    }
}

impl Index<PropagatorId> for PropagatorStore {
    type Output = dyn Propagator;

    fn index(&self, index: PropagatorId) -> &Self::Output {
        self.propagators[index].as_ref()
    }
}

impl IndexMut<PropagatorId> for PropagatorStore {
    fn index_mut(&mut self, index: PropagatorId) -> &mut Self::Output {
        self.propagators[index].as_mut()
    }
}

impl Debug for PropagatorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.propagators.iter().map(|propagator| propagator.name()))
            .finish()
    }
}
