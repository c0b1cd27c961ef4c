//! The propagation core of the Tendril constraint programming solver.
//!
//! The [`State`] holds integer variables, propagators and constraints. Propagators are grouped
//! into constraints, which are either posted or reified with a 0-1 variable. Decisions are made
//! directly on the [`State`], after which [`State::propagate_to_fixed_point`] runs every
//! affected propagator until nothing changes anymore or a [`Contradiction`] is found. Search
//! moves between branches with [`State::new_checkpoint`] and [`State::restore_to`].
//!
//! # Example
//! ```
//! use tendril_core::constraints::arithmetic;
//! use tendril_core::Entailment;
//! use tendril_core::State;
//!
//! let mut state = State::default();
//! let x = state.new_interval_variable(1, 10, Some("x".into()));
//! let y = state.new_interval_variable(1, 10, Some("y".into()));
//!
//! let x_below_y = arithmetic::less_or_equal(&mut state, x, y, 1);
//! state.post(x_below_y).expect("feasible");
//!
//! let x_is_five = arithmetic::equals_constant(&mut state, x, 5);
//! let b = state.reify(x_is_five).expect("x = 5 is not posted");
//!
//! state.new_checkpoint();
//! state.tighten_lower_bound(y, 10).expect("y can be 10");
//! state.instantiate(b, 1).expect("b is a 0-1 variable");
//! state.propagate_to_fixed_point().expect("x = 5 < y = 10");
//!
//! assert_eq!(state.fixed_value(x), Some(5));
//! assert_eq!(state.is_entailed(x_is_five), Entailment::True);
//!
//! state.restore_to(0);
//! assert_eq!(state.fixed_value(x), None);
//! ```
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;
pub mod propagation;
pub mod propagators;

#[doc(hidden)]
pub mod asserts;

pub mod constraints;
pub mod statistics;

pub use convert_case;

pub use crate::basic_types::contradiction;
pub use crate::basic_types::Cause;
pub use crate::basic_types::ConstraintOperationError;
pub use crate::basic_types::Contradiction;
pub use crate::basic_types::Entailment;
pub use crate::basic_types::PropagationStatus;
pub use crate::constraints::ConstraintId;
pub use crate::constraints::ConstraintStatus;
pub use crate::engine::trailed::TrailedInteger;
pub use crate::engine::variables::DomainId;
pub use crate::engine::ActivationOrder;
pub use crate::engine::DomainEvent;
pub use crate::engine::DomainEvents;
pub use crate::engine::EngineOptions;
pub use crate::engine::PriorityMode;
pub use crate::engine::State;
