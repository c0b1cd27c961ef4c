mod constraint_operation_error;
mod entailment;
mod propagation_status;
mod trail;

pub use constraint_operation_error::*;
pub use entailment::*;
pub use propagation_status::*;
pub(crate) use trail::*;
