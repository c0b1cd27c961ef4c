//! The engine holds the state of the solver: the domains of the variables, the trailed integers
//! and the propagators, together with the machinery which runs propagators to a fixed point.
//!
//! Everything is reached through the [`State`].
mod activation_queue;
mod assignments;
mod debug_helper;
mod domain_events;
mod event_sink;
mod options;
mod propagation_engine;
mod propagator_queue;
mod state;
#[cfg(any(test, doc))]
pub(crate) mod test_solver;
pub mod trailed;
mod variable_names;
pub mod variables;
mod watch_list;

pub(crate) use activation_queue::ActivationQueue;
pub(crate) use assignments::Assignments;
pub(crate) use assignments::EmptyDomain;
pub use domain_events::DomainEvent;
pub use domain_events::DomainEvents;
pub(crate) use event_sink::EventSink;
pub use options::ActivationOrder;
pub use options::EngineOptions;
pub use options::PriorityMode;
pub(crate) use propagation_engine::PropagationEngine;
pub(crate) use propagator_queue::PropagatorQueue;
pub use state::State;
pub(crate) use variable_names::VariableNames;
pub(crate) use watch_list::WatchList;
pub(crate) use watch_list::Watcher;
