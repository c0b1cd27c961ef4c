use log::warn;

use super::ConstraintId;
use crate::basic_types::ConstraintOperationError;
use crate::propagation::DynPropagatorConstructor;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::State;

/// Collects the propagators of a new constraint. Obtained through [`State::new_constraint`].
///
/// The propagators are created right away, but they are not run until the constraint is posted
/// with [`State::post`] or its reification is decided.
#[derive(Debug)]
pub struct ConstraintBuilder<'state> {
    state: &'state mut State,
    name: String,
    propagators: Vec<PropagatorId>,
    is_finished: bool,
}

impl<'state> ConstraintBuilder<'state> {
    pub(crate) fn new(state: &'state mut State, name: String) -> Self {
        ConstraintBuilder {
            state,
            name,
            propagators: Vec::new(),
            is_finished: false,
        }
    }

    /// Creates the propagator and makes it part of the constraint.
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> PropagatorHandle<Constructor::PropagatorImpl>
    where
        Constructor: PropagatorConstructor + 'static,
    {
        let propagator_id = self.add_boxed_propagator(Box::new(constructor));
        PropagatorHandle::new(propagator_id)
    }

    pub(crate) fn add_boxed_propagator(
        &mut self,
        constructor: Box<dyn DynPropagatorConstructor>,
    ) -> PropagatorId {
        let propagator_id = self.state.create_propagator(constructor);
        self.propagators.push(propagator_id);
        propagator_id
    }

    /// Builds the constraint. Fails if no propagator was added.
    pub fn finish(mut self) -> Result<ConstraintId, ConstraintOperationError> {
        self.is_finished = true;

        if self.propagators.is_empty() {
            return Err(ConstraintOperationError::EmptyConstraint);
        }

        let name = std::mem::take(&mut self.name);
        let propagators = std::mem::take(&mut self.propagators);
        Ok(self.state.constraints.add(name, propagators))
    }
}

impl Drop for ConstraintBuilder<'_> {
    fn drop(&mut self) {
        if !self.is_finished && !self.propagators.is_empty() {
            warn!(
                "The constraint '{}' was never finished, its {} propagators will never run.",
                self.name,
                self.propagators.len()
            );
        }
    }
}
