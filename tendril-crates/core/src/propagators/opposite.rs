use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::engine::variables::DomainId;
use crate::engine::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::Priority;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;

/// Constructs the [`OppositePropagator`] of a constraint whose propagators do not provide their
/// own negation.
#[derive(Clone)]
pub(crate) struct OppositeArgs {
    /// Copies of the propagators of the negated constraint, only used to check entailment.
    pub(crate) probes: Vec<Box<dyn Propagator>>,
    /// The union of the scopes of the probes.
    pub(crate) scope: Vec<DomainId>,
}

impl PropagatorConstructor for OppositeArgs {
    type PropagatorImpl = OppositePropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        for (index, &var) in self.scope.iter().enumerate() {
            context.register(var, DomainEvents::ANY, LocalId::from(index as u32));
        }

        let priority = self
            .probes
            .iter()
            .map(|probe| probe.priority())
            .max()
            .unwrap_or(Priority::Unary);

        OppositePropagator {
            probes: self.probes,
            priority,
        }
    }
}

/// Enforces the negation of a conjunction of propagators by checking entailment only.
///
/// It fails as soon as the negated constraint is entailed and becomes passive as soon as it is
/// disentailed. No values are removed.
#[derive(Clone)]
pub(crate) struct OppositePropagator {
    probes: Vec<Box<dyn Propagator>>,
    priority: Priority,
}

impl OppositePropagator {
    fn negated_entailment(&self, domains: Domains) -> Entailment {
        Entailment::conjunction(self.probes.iter().map(|probe| probe.is_entailed(domains)))
    }
}

impl Propagator for OppositePropagator {
    fn name(&self) -> &str {
        "Opposite"
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        match self.negated_entailment(context.domains()) {
            Entailment::True => Err(context.contradiction(None, "negated constraint is entailed")),
            Entailment::False => {
                context.set_passive();
                Ok(())
            }
            Entailment::Unknown => Ok(()),
        }
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        !self.negated_entailment(domains)
    }
}

#[cfg(test)]
mod tests {
    use crate::basic_types::Entailment;
    use crate::propagators::arithmetic::EqualsConstantArgs;
    use crate::propagators::arithmetic::NotEqualsConstantArgs;
    use crate::State;

    #[test]
    fn entailment_is_the_negation_of_the_conjunction() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 10, None);

        let mut builder = state.new_constraint("x = 3 and x != 4");
        let _ = builder.add_propagator(EqualsConstantArgs { x, constant: 3 });
        let _ = builder.add_propagator(NotEqualsConstantArgs { x, constant: 4 });
        let constraint = builder.finish().expect("two propagators");

        let opposite = state.get_opposite(constraint);
        let propagator = state.constraint_propagators(opposite)[0];
        assert_eq!(state.engine.propagators[propagator].name(), "Opposite");

        assert_eq!(state.is_entailed(opposite), Entailment::Unknown);

        state.new_checkpoint();
        state.instantiate(x, 3).expect("x can be 3");
        assert_eq!(state.is_entailed(opposite), Entailment::False);

        state.restore_to(0);
        state.new_checkpoint();
        state.remove_value(x, 3).expect("x has other values");
        assert_eq!(state.is_entailed(opposite), Entailment::True);
    }
}
