use std::ops::Index;
use std::ops::IndexMut;

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::engine::variables::DomainId;
use crate::propagation::PropagatorId;
use crate::tendril_assert_simple;

/// Identifies a constraint in the [`State`](crate::State).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConstraintId(u32);

impl StorageKey for ConstraintId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        ConstraintId(index as u32)
    }
}

impl std::fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// How a constraint is used. A constraint is either posted or reified, never both, and never
/// twice. Reifying a reified constraint again links the reification variables instead, so it is
/// not a status change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintStatus {
    Free,
    Posted,
    Reified,
}

impl ConstraintStatus {
    /// Checks whether a constraint with this status may move to `new_status`.
    pub(crate) fn check_new_status(
        self,
        new_status: ConstraintStatus,
    ) -> Result<(), ConstraintOperationError> {
        tendril_assert_simple!(
            !(self == ConstraintStatus::Reified && new_status == ConstraintStatus::Reified),
            "A reified constraint records its reification variable and is never reified again"
        );

        match (self, new_status) {
            (ConstraintStatus::Free, _) => Ok(()),
            (ConstraintStatus::Posted, ConstraintStatus::Reified) => {
                Err(ConstraintOperationError::ReifyingPostedConstraint)
            }
            (ConstraintStatus::Posted, _) => Err(ConstraintOperationError::AlreadyPosted),
            (ConstraintStatus::Reified, _) => {
                Err(ConstraintOperationError::PostingReifiedConstraint)
            }
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ConstraintData {
    pub(crate) name: String,
    /// Fixed once the constraint is built; never empty.
    pub(crate) propagators: Vec<PropagatorId>,
    pub(crate) status: ConstraintStatus,
    /// The boolean this constraint is reified with, and whether the constraint holds when the
    /// boolean is 1 (`true`) or when it is 0 (`false`).
    pub(crate) reification: Option<(DomainId, bool)>,
    /// The constraint which links this constraint and its opposite to the reification variable.
    pub(crate) reified_by: Option<ConstraintId>,
    pub(crate) opposite: Option<ConstraintId>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ConstraintStore {
    constraints: KeyedVec<ConstraintId, ConstraintData>,
    /// Constraints posted for the current branch only; they become free again on backtracking.
    temporary_posts: Trail<ConstraintId>,
}

impl ConstraintStore {
    pub(crate) fn add(&mut self, name: String, propagators: Vec<PropagatorId>) -> ConstraintId {
        self.constraints.push(ConstraintData {
            name,
            propagators,
            status: ConstraintStatus::Free,
            reification: None,
            reified_by: None,
            opposite: None,
        })
    }

    pub(crate) fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.temporary_posts.new_checkpoint();
    }

    pub(crate) fn num_trail_entries(&self) -> usize {
        self.temporary_posts.len()
    }

    pub(crate) fn record_temporary_post(&mut self, constraint: ConstraintId) {
        self.temporary_posts.push(constraint);
    }

    /// Frees every constraint which was posted temporarily after `new_checkpoint` was created.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        for constraint in self.temporary_posts.synchronise(new_checkpoint) {
            self.constraints[constraint].status = ConstraintStatus::Free;
        }
    }
}

impl Index<ConstraintId> for ConstraintStore {
    type Output = ConstraintData;

    fn index(&self, index: ConstraintId) -> &Self::Output {
        &self.constraints[index]
    }
}

impl IndexMut<ConstraintId> for ConstraintStore {
    fn index_mut(&mut self, index: ConstraintId) -> &mut Self::Output {
        &mut self.constraints[index]
    }
}
