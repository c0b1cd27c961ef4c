use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;
use crate::engine::variables::DomainId;
use crate::engine::Assignments;

/// A read-only view on the domains of all variables and the trailed integers.
///
/// Given to propagators whenever they may inspect but not change the domains, e.g. in
/// [`Propagator::advise`] and [`Propagator::is_entailed`]. The domains can be read through the
/// implementation of [`ReadDomains`].
///
/// [`Propagator::advise`]: crate::propagation::Propagator::advise
/// [`Propagator::is_entailed`]: crate::propagation::Propagator::is_entailed
#[derive(Clone, Copy, Debug)]
pub struct Domains<'a> {
    assignments: &'a Assignments,
    trailed_values: &'a TrailedValues,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(assignments: &'a Assignments, trailed_values: &'a TrailedValues) -> Self {
        Domains {
            assignments,
            trailed_values,
        }
    }
}

pub(crate) mod private {
    use super::Domains;

    pub trait HasDomains {
        fn read_domains(&self) -> Domains<'_>;
    }
}

impl private::HasDomains for Domains<'_> {
    fn read_domains(&self) -> Domains<'_> {
        *self
    }
}

/// Queries on the current domains, available on every context handed to a propagator.
pub trait ReadDomains: private::HasDomains {
    fn lower_bound(&self, domain: DomainId) -> i32 {
        self.read_domains().assignments.get_lower_bound(domain)
    }

    fn upper_bound(&self, domain: DomainId) -> i32 {
        self.read_domains().assignments.get_upper_bound(domain)
    }

    fn contains(&self, domain: DomainId, value: i32) -> bool {
        self.read_domains()
            .assignments
            .is_value_in_domain(domain, value)
    }

    /// Returns `true` if the domain of the given variable is singleton.
    fn is_fixed(&self, domain: DomainId) -> bool {
        self.read_domains().assignments.is_domain_assigned(domain)
    }

    /// The value of the variable if its domain is a singleton.
    fn fixed_value(&self, domain: DomainId) -> Option<i32> {
        self.read_domains().assignments.get_assigned_value(domain)
    }

    fn domain_size(&self, domain: DomainId) -> usize {
        self.read_domains().assignments.get_domain_size(domain)
    }

    /// The values in the domain of the variable, in increasing order.
    fn iterate_domain(&self, domain: DomainId) -> impl Iterator<Item = i32> + '_ {
        self.read_domains()
            .assignments
            .get_domain_iterator(domain)
    }

    /// The current value of a trailed integer.
    fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.read_domains().trailed_values.read(trailed_integer)
    }
}

impl<T: private::HasDomains> ReadDomains for T {}
