//! Constraints bundle one or more propagators into a single relation.
//!
//! A constraint is created through a [`ConstraintBuilder`] (or one of the functions in
//! [`arithmetic`]) and is then either posted with [`State::post`], or linked to a 0-1 variable
//! with [`State::reify_with`]. Every constraint has an opposite, obtained with
//! [`State::get_opposite`], which holds exactly when the constraint does not.
//!
//! [`State::post`]: crate::State::post
//! [`State::reify_with`]: crate::State::reify_with
//! [`State::get_opposite`]: crate::State::get_opposite
pub mod arithmetic;
mod constraint_builder;
mod constraint_store;

pub use constraint_builder::ConstraintBuilder;
pub use constraint_store::ConstraintId;
pub use constraint_store::ConstraintStatus;
pub(crate) use constraint_store::ConstraintStore;
