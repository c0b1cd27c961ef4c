use super::NotEqualsConstantArgs;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::engine::variables::DomainId;
use crate::engine::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::DynPropagatorConstructor;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::Priority;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// The [`PropagatorConstructor`] for the [`EqualsConstantPropagator`].
#[derive(Clone, Copy, Debug)]
pub struct EqualsConstantArgs {
    pub x: DomainId,
    pub constant: i32,
}

impl PropagatorConstructor for EqualsConstantArgs {
    type PropagatorImpl = EqualsConstantPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.x, DomainEvents::ANY, LocalId::from(0));

        EqualsConstantPropagator {
            x: self.x,
            constant: self.constant,
        }
    }
}

/// Propagator for the constraint `x = constant`.
#[derive(Clone, Copy, Debug)]
pub struct EqualsConstantPropagator {
    x: DomainId,
    constant: i32,
}

impl Propagator for EqualsConstantPropagator {
    fn name(&self) -> &str {
        "EqualsConstant"
    }

    fn priority(&self) -> Priority {
        Priority::Unary
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        context.instantiate(self.x, self.constant)?;

        // Nothing can change anymore in this branch.
        context.set_passive();

        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        if !domains.contains(self.x, self.constant) {
            Entailment::False
        } else if domains.is_fixed(self.x) {
            Entailment::True
        } else {
            Entailment::Unknown
        }
    }

    fn negation(&self) -> Option<Box<dyn DynPropagatorConstructor>> {
        Some(Box::new(NotEqualsConstantArgs {
            x: self.x,
            constant: self.constant,
        }))
    }
}
