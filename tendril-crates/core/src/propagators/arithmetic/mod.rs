//! Propagators over a small number of integer variables.
mod binary_equals;
mod binary_not_equals;
mod equals_constant;
mod less_or_equal;
mod not_equals_constant;

pub use binary_equals::*;
pub use binary_not_equals::*;
pub use equals_constant::*;
pub use less_or_equal::*;
pub use not_equals_constant::*;
