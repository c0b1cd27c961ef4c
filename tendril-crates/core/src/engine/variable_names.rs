use std::sync::Arc;

use crate::containers::HashMap;
use crate::engine::variables::DomainId;

/// Optional names of variables, used in logs and to look variables up by name.
#[derive(Clone, Debug, Default)]
pub(crate) struct VariableNames {
    names: HashMap<DomainId, Arc<str>>,
    domain_by_name: HashMap<Arc<str>, DomainId>,
}

impl VariableNames {
    /// Get the name associated with a domain id.
    pub(crate) fn get_name(&self, domain_id: DomainId) -> Option<&str> {
        self.names.get(&domain_id).map(|name| name.as_ref())
    }

    /// Get the [`DomainId`] associated with the given name.
    pub(crate) fn get_domain_by_name(&self, name: &str) -> Option<DomainId> {
        self.domain_by_name.get(name).copied()
    }

    /// Names the variable. Names are unique; reusing one is a programmer error.
    pub(crate) fn add_name(&mut self, domain_id: DomainId, name: Arc<str>) {
        if let Some(existing) = self.domain_by_name.get(&name) {
            panic!("The name '{name}' is already used by {existing}");
        }

        let _ = self.names.insert(domain_id, Arc::clone(&name));
        let _ = self.domain_by_name.insert(name, domain_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_can_be_looked_up_both_ways() {
        let mut variable_names = VariableNames::default();
        let domain = DomainId::new(2);

        variable_names.add_name(domain, "x".into());

        assert_eq!(variable_names.get_name(domain), Some("x"));
        assert_eq!(variable_names.get_domain_by_name("x"), Some(domain));
        assert_eq!(variable_names.get_domain_by_name("y"), None);
    }

    #[test]
    #[should_panic]
    fn a_name_cannot_be_used_twice() {
        let mut variable_names = VariableNames::default();

        variable_names.add_name(DomainId::new(0), "x".into());
        variable_names.add_name(DomainId::new(1), "x".into());
    }
}
