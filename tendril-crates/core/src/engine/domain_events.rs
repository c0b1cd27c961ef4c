use std::fmt::Display;

use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

/// A description of the kinds of events that can happen on a domain variable.
///
/// Events compose into masks (`EnumSet<DomainEvent>`) with `|`; a propagator is only advised of
/// a change when the mask intersects the events it registered for.
#[derive(Debug, EnumSetType, Hash)]
pub enum DomainEvent {
    /// The domain collapsed to a single value.
    Instantiate,
    /// The lower bound was tightened.
    LowerBound,
    /// The upper bound was tightened.
    UpperBound,
    /// At least one value was removed. Every change to a domain removes values, so this event
    /// accompanies all others.
    Removal,
}

impl Display for DomainEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainEvent::Instantiate => write!(f, "[Event:Instantiate]"),
            DomainEvent::LowerBound => write!(f, "[Event:LB]"),
            DomainEvent::UpperBound => write!(f, "[Event:UB]"),
            DomainEvent::Removal => write!(f, "[Event:Remove]"),
        }
    }
}

/// The events a propagator registers interest in for one of its variables.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DomainEvents {
    events: EnumSet<DomainEvent>,
}

impl DomainEvents {
    /// Any change to the domain.
    pub const ANY: DomainEvents = DomainEvents::create_with_events(enum_set!(
        DomainEvent::Instantiate
            | DomainEvent::LowerBound
            | DomainEvent::UpperBound
            | DomainEvent::Removal
    ));
    /// Lower and upper bound tightening, which includes instantiation.
    pub const BOUNDS: DomainEvents = DomainEvents::create_with_events(enum_set!(
        DomainEvent::LowerBound | DomainEvent::UpperBound | DomainEvent::Instantiate
    ));
    pub const LOWER_BOUND: DomainEvents =
        DomainEvents::create_with_events(enum_set!(DomainEvent::LowerBound));
    pub const UPPER_BOUND: DomainEvents =
        DomainEvents::create_with_events(enum_set!(DomainEvent::UpperBound));
    pub const INSTANTIATE: DomainEvents =
        DomainEvents::create_with_events(enum_set!(DomainEvent::Instantiate));
    pub const REMOVAL: DomainEvents =
        DomainEvents::create_with_events(enum_set!(DomainEvent::Removal));
    pub const INSTANTIATE_AND_REMOVAL: DomainEvents = DomainEvents::create_with_events(
        enum_set!(DomainEvent::Instantiate | DomainEvent::Removal),
    );

    pub const fn create_with_events(events: EnumSet<DomainEvent>) -> DomainEvents {
        DomainEvents { events }
    }

    pub fn events(&self) -> EnumSet<DomainEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_interest_matches_an_instantiation() {
        let change = DomainEvent::Instantiate | DomainEvent::Removal;

        assert!(!(DomainEvents::BOUNDS.events() & change).is_empty());
        assert!((DomainEvents::LOWER_BOUND.events() & change).is_empty());
    }
}
