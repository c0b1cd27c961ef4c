use enumset::EnumSet;

use super::DomainEvent;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::propagation::LocalId;
use crate::propagation::PropagatorId;

/// The interest of one propagator in one occurrence of a variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Watcher {
    pub(crate) propagator: PropagatorId,
    pub(crate) local_id: LocalId,
    pub(crate) events: EnumSet<DomainEvent>,
}

/// For every variable, the propagators to advise when its domain changes.
#[derive(Clone, Debug, Default)]
pub(crate) struct WatchList {
    watchers: KeyedVec<DomainId, Vec<Watcher>>,
}

impl WatchList {
    pub(crate) fn grow(&mut self) {
        let _ = self.watchers.push(Vec::new());
    }

    /// Adds the watcher to the variable. Watching the same occurrence twice merges the interest.
    pub(crate) fn watch(&mut self, domain: DomainId, watcher: Watcher) {
        let watchers = &mut self.watchers[domain];

        match watchers.iter_mut().find(|existing| {
            existing.propagator == watcher.propagator && existing.local_id == watcher.local_id
        }) {
            Some(existing) => existing.events.insert_all(watcher.events),
            None => watchers.push(watcher),
        }
    }

    pub(crate) fn num_watchers(&self, domain: DomainId) -> usize {
        self.watchers[domain].len()
    }

    /// The watcher at `index` in the list of `domain`.
    ///
    /// Watchers are visited by index so that the engine can consult and schedule propagators
    /// while walking the list.
    pub(crate) fn get(&self, domain: DomainId, index: usize) -> Watcher {
        self.watchers[domain][index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DomainEvents;

    #[test]
    fn watching_the_same_occurrence_twice_merges_the_interest() {
        let mut watch_list = WatchList::default();
        watch_list.grow();
        let domain = DomainId::new(0);
        let propagator = PropagatorId(0);

        watch_list.watch(
            domain,
            Watcher {
                propagator,
                local_id: LocalId::from(0),
                events: DomainEvents::LOWER_BOUND.events(),
            },
        );
        watch_list.watch(
            domain,
            Watcher {
                propagator,
                local_id: LocalId::from(0),
                events: DomainEvents::UPPER_BOUND.events(),
            },
        );
        watch_list.watch(
            domain,
            Watcher {
                propagator,
                local_id: LocalId::from(1),
                events: DomainEvents::REMOVAL.events(),
            },
        );

        assert_eq!(watch_list.num_watchers(domain), 2);
        assert_eq!(
            watch_list.get(domain, 0).events,
            DomainEvent::LowerBound | DomainEvent::UpperBound
        );
    }
}
