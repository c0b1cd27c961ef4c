use enumset::EnumSet;
use log::log_enabled;
use log::trace;
use log::Level;

use super::DomainEvent;
use super::EventSink;
use crate::basic_types::Trail;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::tendril_assert_moderate;
use crate::tendril_assert_simple;

/// Stores the domains of all integer variables and the trail used to undo changes to them.
///
/// Every mutator first validates the change against the current domain. A change that would
/// empty the domain is refused with [`EmptyDomain`] and leaves the domain untouched, otherwise
/// the undo information is recorded and the resulting events end up in the event sink.
#[derive(Clone, Debug, Default)]
pub(crate) struct Assignments {
    trail: Trail<DomainChange>,
    domains: KeyedVec<DomainId, IntegerDomain>,
    events: EventSink,
    /// The number of values that have been pruned from domains.
    pruned_values: u64,
}

/// Returned by a mutator which would have wiped out a domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EmptyDomain;

/// An undo record on the assignment trail.
#[derive(Clone, Copy, Debug)]
pub(crate) enum DomainChange {
    LowerBound {
        domain: DomainId,
        old_value: i32,
        old_stamp: u64,
    },
    UpperBound {
        domain: DomainId,
        old_value: i32,
        old_stamp: u64,
    },
    Removal {
        domain: DomainId,
        value: i32,
    },
}

impl Assignments {
    pub(crate) fn grow(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        tendril_assert_simple!(
            lower_bound <= upper_bound,
            "Cannot create a variable with an empty domain [{lower_bound}, {upper_bound}]"
        );

        self.events.grow();
        self.domains.push(IntegerDomain::new(lower_bound, upper_bound))
    }

    pub(crate) fn num_domains(&self) -> usize {
        self.domains.len()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint();
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub(crate) fn num_trail_entries(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn get_pruned_value_count(&self) -> u64 {
        self.pruned_values
    }

    pub(crate) fn get_lower_bound(&self, domain: DomainId) -> i32 {
        self.domains[domain].lower_bound
    }

    pub(crate) fn get_upper_bound(&self, domain: DomainId) -> i32 {
        self.domains[domain].upper_bound
    }

    pub(crate) fn is_value_in_domain(&self, domain: DomainId, value: i32) -> bool {
        self.domains[domain].contains(value)
    }

    pub(crate) fn is_domain_assigned(&self, domain: DomainId) -> bool {
        let domain = &self.domains[domain];
        domain.lower_bound == domain.upper_bound
    }

    pub(crate) fn get_assigned_value(&self, domain: DomainId) -> Option<i32> {
        self.is_domain_assigned(domain)
            .then(|| self.get_lower_bound(domain))
    }

    pub(crate) fn get_domain_iterator(&self, domain: DomainId) -> impl Iterator<Item = i32> + '_ {
        let domain = &self.domains[domain];
        (domain.lower_bound..=domain.upper_bound).filter(|&value| domain.contains(value))
    }

    pub(crate) fn get_domain_size(&self, domain: DomainId) -> usize {
        let domain = &self.domains[domain];
        domain.count_present(domain.lower_bound, domain.upper_bound) as usize
    }

    pub(crate) fn drain_events(
        &mut self,
    ) -> impl Iterator<Item = (DomainId, EnumSet<DomainEvent>)> {
        self.events.drain()
    }

    pub(crate) fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub(crate) fn clear_events(&mut self) {
        self.events.clear();
    }
}

/// The mutators. Each returns whether the domain changed.
impl Assignments {
    pub(crate) fn tighten_lower_bound(
        &mut self,
        domain: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let integer_domain = &self.domains[domain];
        if value <= integer_domain.lower_bound {
            return Ok(false);
        }
        if value > integer_domain.upper_bound {
            return Err(EmptyDomain);
        }

        // The upper bound is always in the domain, so there is a next value.
        let new_lower_bound = integer_domain.first_present_from(value);
        self.pruned_values +=
            integer_domain.count_present(integer_domain.lower_bound, new_lower_bound - 1);
        self.save_lower_bound(domain);

        let integer_domain = &mut self.domains[domain];
        integer_domain.lower_bound = new_lower_bound;

        let mut events = DomainEvent::LowerBound | DomainEvent::Removal;
        if integer_domain.lower_bound == integer_domain.upper_bound {
            events |= DomainEvent::Instantiate;
        }
        self.events.event_occurred(events, domain);

        Ok(true)
    }

    pub(crate) fn tighten_upper_bound(
        &mut self,
        domain: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let integer_domain = &self.domains[domain];
        if value >= integer_domain.upper_bound {
            return Ok(false);
        }
        if value < integer_domain.lower_bound {
            return Err(EmptyDomain);
        }

        let new_upper_bound = integer_domain.last_present_until(value);
        self.pruned_values +=
            integer_domain.count_present(new_upper_bound + 1, integer_domain.upper_bound);
        self.save_upper_bound(domain);

        let integer_domain = &mut self.domains[domain];
        integer_domain.upper_bound = new_upper_bound;

        let mut events = DomainEvent::UpperBound | DomainEvent::Removal;
        if integer_domain.lower_bound == integer_domain.upper_bound {
            events |= DomainEvent::Instantiate;
        }
        self.events.event_occurred(events, domain);

        Ok(true)
    }

    pub(crate) fn remove_value(
        &mut self,
        domain: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let integer_domain = &self.domains[domain];
        if !integer_domain.contains(value) {
            return Ok(false);
        }
        if integer_domain.lower_bound == integer_domain.upper_bound {
            return Err(EmptyDomain);
        }

        if value == integer_domain.lower_bound {
            return self.tighten_lower_bound(domain, value + 1);
        }
        if value == integer_domain.upper_bound {
            return self.tighten_upper_bound(domain, value - 1);
        }

        let _ = self.domains[domain].holes.insert(value);
        self.pruned_values += 1;
        // Changes at the root are never undone.
        if self.trail.get_checkpoint() > 0 {
            self.trail.push(DomainChange::Removal { domain, value });
        }
        self.events.event_occurred(DomainEvent::Removal.into(), domain);

        Ok(true)
    }

    pub(crate) fn instantiate(
        &mut self,
        domain: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        if !self.is_value_in_domain(domain, value) {
            return Err(EmptyDomain);
        }

        let changed_lower_bound = self.tighten_lower_bound(domain, value)?;
        let changed_upper_bound = self.tighten_upper_bound(domain, value)?;

        tendril_assert_moderate!(self.get_assigned_value(domain) == Some(value));

        Ok(changed_lower_bound || changed_upper_bound)
    }

    fn save_lower_bound(&mut self, domain: DomainId) {
        let stamp = self.trail.current_stamp();
        let integer_domain = &mut self.domains[domain];

        if integer_domain.lower_bound_stamp != stamp {
            self.trail.push(DomainChange::LowerBound {
                domain,
                old_value: integer_domain.lower_bound,
                old_stamp: integer_domain.lower_bound_stamp,
            });
            integer_domain.lower_bound_stamp = stamp;
        }
    }

    fn save_upper_bound(&mut self, domain: DomainId) {
        let stamp = self.trail.current_stamp();
        let integer_domain = &mut self.domains[domain];

        if integer_domain.upper_bound_stamp != stamp {
            self.trail.push(DomainChange::UpperBound {
                domain,
                old_value: integer_domain.upper_bound,
                old_stamp: integer_domain.upper_bound_stamp,
            });
            integer_domain.upper_bound_stamp = stamp;
        }
    }

    /// Undo every change made after `new_checkpoint` was created. Pending events are dropped,
    /// they describe changes which no longer exist.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        if log_enabled!(Level::Trace) {
            for checkpoint in new_checkpoint + 1..=self.trail.get_checkpoint() {
                trace!(
                    "Undoing {} domain changes of checkpoint {checkpoint}",
                    self.trail.values_at_checkpoint(checkpoint).len()
                );
            }
        }

        for change in self.trail.synchronise(new_checkpoint) {
            match change {
                DomainChange::LowerBound {
                    domain,
                    old_value,
                    old_stamp,
                } => {
                    let integer_domain = &mut self.domains[domain];
                    integer_domain.lower_bound = old_value;
                    integer_domain.lower_bound_stamp = old_stamp;
                }
                DomainChange::UpperBound {
                    domain,
                    old_value,
                    old_stamp,
                } => {
                    let integer_domain = &mut self.domains[domain];
                    integer_domain.upper_bound = old_value;
                    integer_domain.upper_bound_stamp = old_stamp;
                }
                DomainChange::Removal { domain, value } => {
                    let _ = self.domains[domain].holes.remove(&value);
                }
            }
        }

        self.events.clear();
    }
}

/// An interval with holes. The bounds are always values of the domain.
#[derive(Clone, Debug)]
struct IntegerDomain {
    lower_bound: i32,
    upper_bound: i32,
    /// Values removed strictly between the bounds. A hole may end up outside the bounds when they
    /// are tightened past it; it is kept since backtracking can widen the bounds again.
    holes: HashSet<i32>,
    lower_bound_stamp: u64,
    upper_bound_stamp: u64,
}

impl IntegerDomain {
    fn new(lower_bound: i32, upper_bound: i32) -> IntegerDomain {
        IntegerDomain {
            lower_bound,
            upper_bound,
            holes: HashSet::default(),
            lower_bound_stamp: 0,
            upper_bound_stamp: 0,
        }
    }

    fn contains(&self, value: i32) -> bool {
        self.lower_bound <= value && value <= self.upper_bound && !self.holes.contains(&value)
    }

    /// The smallest value of the domain which is at least `value`, given `value <= upper_bound`.
    fn first_present_from(&self, value: i32) -> i32 {
        let mut candidate = value;
        // The upper bound is never a hole, so this stops there at the latest.
        while self.holes.contains(&candidate) {
            candidate += 1;
        }
        candidate
    }

    /// The largest value of the domain which is at most `value`, given `value >= lower_bound`.
    fn last_present_until(&self, value: i32) -> i32 {
        let mut candidate = value;
        while self.holes.contains(&candidate) {
            candidate -= 1;
        }
        candidate
    }

    /// The number of values in `[from, to]` which are not holes.
    fn count_present(&self, from: i32, to: i32) -> u64 {
        if from > to {
            return 0;
        }

        let width = (i64::from(to) - i64::from(from) + 1) as u64;
        let num_holes = self
            .holes
            .iter()
            .filter(|&&hole| from <= hole && hole <= to)
            .count() as u64;

        width - num_holes
    }
}
