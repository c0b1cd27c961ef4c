mod trailed_integer;
mod trailed_values;

pub use trailed_integer::*;
pub(crate) use trailed_values::*;
