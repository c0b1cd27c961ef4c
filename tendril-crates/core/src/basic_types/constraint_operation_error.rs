use thiserror::Error;

#[cfg(doc)]
use crate::State;

/// Errors related to building, posting and reifying constraints in the [`State`].
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    /// A constraint needs at least one propagator.
    #[error("A constraint must consist of at least one propagator")]
    EmptyConstraint,
    #[error("Try to post a constraint which is already posted")]
    AlreadyPosted,
    #[error("Try to post a constraint which is already reified")]
    PostingReifiedConstraint,
    #[error("Try to reify a constraint which is already posted")]
    ReifyingPostedConstraint,
    /// The reification variable must be a 0-1 variable.
    #[error("The reification variable must have a domain within {{0, 1}}")]
    NonBooleanReification,
    /// Posting the constraint at the root led to a contradiction.
    #[error("Posting the constraint failed because it is infeasible at the root")]
    InfeasibleConstraint,
}
