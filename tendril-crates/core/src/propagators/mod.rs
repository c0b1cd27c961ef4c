//! The propagators shipped with the core: a few arithmetic relations, and the propagators which
//! implement the opposite and the reification of arbitrary constraints.
pub mod arithmetic;
pub(crate) mod opposite;
pub(crate) mod reification;
