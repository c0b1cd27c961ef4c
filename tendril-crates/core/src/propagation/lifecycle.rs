use std::fmt::Display;

use super::PropagatorId;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;

/// The lifecycle state of a propagator.
///
/// ```text
///           post                    propagator is entailed
///   New ------------------> Active ------------------------> Passive
///    |                        ^
///    | reify                  | reification decided
///    v                        |
///   ReifiedSilent ------------+
/// ```
///
/// Only `New`, `Active` and `ReifiedSilent` are reached when the propagator is added; every
/// transition out of `New` or `ReifiedSilent` into `Active`, and into `Passive`, is undone on
/// backtracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropagatorState {
    /// Created, but not yet part of any posted or reified constraint.
    New,
    /// Part of a reified constraint whose truth has not been decided. The propagator is never
    /// scheduled, but it can be asked for its entailment.
    ReifiedSilent,
    /// Scheduled on events.
    Active,
    /// Entailed under the current domains; not scheduled until backtracking revives it.
    Passive,
}

impl Display for PropagatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropagatorState::New => write!(f, "new"),
            PropagatorState::ReifiedSilent => write!(f, "reified-silent"),
            PropagatorState::Active => write!(f, "active"),
            PropagatorState::Passive => write!(f, "passive"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct StateChange {
    propagator: PropagatorId,
    old_state: PropagatorState,
}

/// The lifecycle states of all propagators, trailed together with the domains.
#[derive(Clone, Debug, Default)]
pub(crate) struct PropagatorStates {
    states: KeyedVec<PropagatorId, PropagatorState>,
    trail: Trail<StateChange>,
}

impl PropagatorStates {
    pub(crate) fn grow(&mut self) -> PropagatorId {
        self.states.push(PropagatorState::New)
    }

    pub(crate) fn get(&self, propagator: PropagatorId) -> PropagatorState {
        self.states[propagator]
    }

    pub(crate) fn is_active(&self, propagator: PropagatorId) -> bool {
        self.states[propagator] == PropagatorState::Active
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint();
    }

    pub(crate) fn num_trail_entries(&self) -> usize {
        self.trail.len()
    }

    /// `New -> Active`.
    pub(crate) fn set_active(&mut self, propagator: PropagatorId) {
        self.transition(propagator, PropagatorState::New, PropagatorState::Active);
    }

    /// `ReifiedSilent -> Active`, once the truth of the reified constraint is known.
    pub(crate) fn set_reified_true(&mut self, propagator: PropagatorId) {
        self.transition(
            propagator,
            PropagatorState::ReifiedSilent,
            PropagatorState::Active,
        );
    }

    /// `Active -> Passive`.
    pub(crate) fn set_passive(&mut self, propagator: PropagatorId) {
        self.transition(propagator, PropagatorState::Active, PropagatorState::Passive);
    }

    /// `New -> ReifiedSilent`. Reification is structural rather than part of the search, so
    /// this change is not undone on backtracking. Every propagator belongs to exactly one
    /// constraint, which is reified at most once.
    pub(crate) fn set_reified_silent(&mut self, propagator: PropagatorId) {
        let current = self.states[propagator];
        if current != PropagatorState::New {
            panic!("Cannot reify {propagator}, it is {current}");
        }

        self.states[propagator] = PropagatorState::ReifiedSilent;
    }

    fn transition(&mut self, propagator: PropagatorId, from: PropagatorState, to: PropagatorState) {
        let current = self.states[propagator];
        if current != from {
            panic!("Illegal transition of {propagator} to {to}, it is {current} instead of {from}");
        }

        self.trail.push(StateChange {
            propagator,
            old_state: current,
        });
        self.states[propagator] = to;
    }

    /// Undo every transition made after `new_checkpoint` was created.
    ///
    /// Returns the propagators which went back to [`PropagatorState::New`].
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> Vec<PropagatorId> {
        let mut back_to_new = Vec::new();

        for change in self.trail.synchronise(new_checkpoint) {
            self.states[change.propagator] = change.old_state;

            if change.old_state == PropagatorState::New {
                back_to_new.push(change.propagator);
            }
        }

        back_to_new
    }
}
