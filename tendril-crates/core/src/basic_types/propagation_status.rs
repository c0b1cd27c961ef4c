use std::fmt::Display;

use thiserror::Error;

use crate::engine::variables::DomainId;
use crate::propagation::PropagatorId;

/// The result of anything that can narrow domains: either the narrowing succeeded, or the current
/// partial assignment cannot be extended to a solution.
pub type PropagationStatus = Result<(), Contradiction>;

/// The failure signal of the engine.
///
/// A [`Contradiction`] is an ordinary outcome during search: the caller is expected to backtrack
/// with [`State::restore_to`] and try an alternative. It is never swallowed by the engine; the
/// fixpoint loop stops at the first one and hands it back.
///
/// Contradictions are only created through [`contradiction`].
///
/// [`State::restore_to`]: crate::State::restore_to
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("contradiction{}: {message} (cause: {cause})", .domain.map(|domain| format!(" on {domain}")).unwrap_or_default())]
pub struct Contradiction {
    /// The variable whose domain would have become empty, if the failure is a wipeout.
    pub domain: Option<DomainId>,
    /// What was executing when the failure was detected.
    pub cause: Cause,
    pub message: &'static str,
}

/// Who raised a [`Contradiction`] or caused a domain event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cause {
    /// A change made from outside of propagation, e.g. a search decision.
    Decision,
    Propagator(PropagatorId),
}

impl Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cause::Decision => write!(f, "decision"),
            Cause::Propagator(propagator_id) => write!(f, "{propagator_id}"),
        }
    }
}

impl Cause {
    pub fn propagator(&self) -> Option<PropagatorId> {
        match self {
            Cause::Decision => None,
            Cause::Propagator(propagator_id) => Some(*propagator_id),
        }
    }
}

/// Creates the failure signal. Every wipeout and every explicit failure detected by a propagator
/// goes through here.
pub fn contradiction(
    domain: Option<DomainId>,
    cause: Cause,
    message: &'static str,
) -> Contradiction {
    log::trace!(
        "contradiction raised by {cause}{}: {message}",
        domain
            .map(|domain| format!(" on {domain}"))
            .unwrap_or_default()
    );

    Contradiction {
        domain,
        cause,
        message,
    }
}
