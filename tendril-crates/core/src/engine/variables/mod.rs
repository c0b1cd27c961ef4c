//! The variables of the engine. Only plain integer domains are supported; views and
//! specialised representations are left to the layers built on top.
mod domain_id;

pub use domain_id::DomainId;
