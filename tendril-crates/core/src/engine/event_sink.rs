use enumset::EnumSet;

use super::DomainEvent;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;

/// While something mutates domains (a propagator or a decision), the resulting events are
/// captured in the event sink. When the mutator is done, the sink is drained to advise the
/// propagators which watch those domains.
///
/// Events on the same domain are coalesced into a single mask until the next drain.
#[derive(Default, Debug, Clone)]
pub(crate) struct EventSink {
    present: KeyedVec<DomainId, EnumSet<DomainEvent>>,
    touched: Vec<DomainId>,
}

impl EventSink {
    pub(crate) fn grow(&mut self) {
        let _ = self.present.push(EnumSet::new());
    }

    pub(crate) fn event_occurred(&mut self, events: EnumSet<DomainEvent>, domain: DomainId) {
        if events.is_empty() {
            return;
        }

        let present = &mut self.present[domain];
        if present.is_empty() {
            self.touched.push(domain);
        }
        present.insert_all(events);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    /// Takes every pending event. The sink is empty afterwards, regardless of how much of the
    /// returned iterator is consumed.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (DomainId, EnumSet<DomainEvent>)> {
        let drained = self
            .touched
            .drain(..)
            .map(|domain| (domain, std::mem::take(&mut self.present[domain])))
            .collect::<Vec<_>>();

        drained.into_iter()
    }

    /// Forget every event without delivering it.
    pub(crate) fn clear(&mut self) {
        let _ = self.drain();
    }
}
