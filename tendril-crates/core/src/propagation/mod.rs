//! Contains the building blocks for propagators.
//!
//! # Background
//!
//! A propagator takes as input a set of variables (<code>x<sub>i</sub> ∈ X</code>) and for each
//! variable a corresponding domain (<code>D<sub>i</sub> ∈ D</code>); it can then be seen as a
//! function which maps `D ↦ D'` such that <code>D'<sub>i</sub> ⊆ D<sub>i</sub></code> for all
//! variables (i.e. the domain of a variable either remains the same after applying the propagator
//! or it becomes a subset of the domain before applying the propagator).
//!
//! A propagator is said to be at fix-point if <code>D = D'</code>, meaning that no further
//! propagations can take place when applying the propagator. A propagator is said to be
//! "idempotent" if a single call to it will result in it being at fix-point. Unlike many solvers,
//! the engine requires idempotence: a propagator is only called again after an event that it did
//! not cause itself.
//!
//! # Practical
//!
//! Each concrete propagator implements [`Propagator`]. The main function to implement is
//! [`Propagator::propagate`], which performs the domain reduction, together with
//! [`Propagator::is_entailed`] which is used for reification and negation.
//!
//! A propagator is created by a [`PropagatorConstructor`]. The constructor is responsible for
//! registering to domain events, and setting up the state of the propagator. The constructor is
//! provided a [`PropagatorConstructorContext`], which has all the available functions allowing the
//! propagator to hook into the solver state.
//!
//! Propagators are added as part of a constraint through
//! [`State::new_constraint`](crate::State::new_constraint). A propagator only runs once its
//! constraint is posted, or once the reification of its constraint is decided; this is tracked
//! by its [`PropagatorState`].
//!
//! See the [`propagators`](crate::propagators) module for concrete propagator implementations.
//!
//! # Bibliography
//!
//! \[1\] C. Schulte and P. J. Stuckey, ‘Efficient constraint propagation engines’, ACM Transactions
//! on Programming Languages and Systems (TOPLAS), vol. 31, no. 1, pp. 1–43, 2008.

mod constructor;
mod contexts;
pub(crate) mod domains;
mod lifecycle;
mod local_id;
mod propagator;
mod propagator_id;
mod store;

pub use constructor::*;
pub use contexts::*;
pub use domains::Domains;
pub use domains::ReadDomains;
pub use lifecycle::PropagatorState;
pub(crate) use lifecycle::PropagatorStates;
pub use local_id::LocalId;
pub use propagator::*;
pub use propagator_id::PropagatorId;
pub use store::PropagatorHandle;
pub(crate) use store::*;
