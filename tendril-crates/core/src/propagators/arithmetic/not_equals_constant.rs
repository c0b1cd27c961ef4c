use super::EqualsConstantArgs;
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

/// The [`PropagatorConstructor`] for the [`NotEqualsConstantPropagator`].
#[derive(Clone, Copy, Debug)]
pub struct NotEqualsConstantArgs {
    pub x: DomainId,
    pub constant: i32,
}

impl PropagatorConstructor for NotEqualsConstantArgs {
    type PropagatorImpl = NotEqualsConstantPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.x, DomainEvents::ANY, LocalId::from(0));

        NotEqualsConstantPropagator {
            x: self.x,
            constant: self.constant,
        }
    }
}

/// Propagator for the constraint `x != constant`.
#[derive(Clone, Copy, Debug)]
pub struct NotEqualsConstantPropagator {
    x: DomainId,
    constant: i32,
}

impl Propagator for NotEqualsConstantPropagator {
    fn name(&self) -> &str {
        "NotEqualsConstant"
    }

    fn priority(&self) -> Priority {
        Priority::Unary
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        context.remove_value(self.x, self.constant)?;
        context.set_passive();

        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        if !domains.contains(self.x, self.constant) {
            Entailment::True
        } else if domains.is_fixed(self.x) {
            Entailment::False
        } else {
            Entailment::Unknown
        }
    }

    fn negation(&self) -> Option<Box<dyn DynPropagatorConstructor>> {
        Some(Box::new(EqualsConstantArgs {
            x: self.x,
            constant: self.constant,
        }))
    }
}
