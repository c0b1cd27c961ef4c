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
use crate::propagation::PropagatorId;
use crate::propagation::ReadDomains;

/// One side of a reification: the silent propagators of a constraint and copies of them used to
/// decide entailment.
#[derive(Clone)]
pub(crate) struct ReifiedSide {
    pub(crate) propagators: Vec<PropagatorId>,
    pub(crate) probes: Vec<Box<dyn Propagator>>,
}

impl ReifiedSide {
    fn entailment(&self, domains: Domains) -> Entailment {
        Entailment::conjunction(self.probes.iter().map(|probe| probe.is_entailed(domains)))
    }
}

/// Constructs the [`ReificationPropagator`] for `reification <-> c`, where `if_true` holds the
/// propagators of `c` and `if_false` those of its opposite.
#[derive(Clone)]
pub(crate) struct ReificationArgs {
    pub(crate) reification: DomainId,
    pub(crate) if_true: ReifiedSide,
    pub(crate) if_false: ReifiedSide,
    /// The union of the scopes of both sides.
    pub(crate) scope: Vec<DomainId>,
}

impl PropagatorConstructor for ReificationArgs {
    type PropagatorImpl = ReificationPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.reification, DomainEvents::INSTANTIATE, LocalId::from(0));
        for (index, &var) in self.scope.iter().enumerate() {
            context.register(var, DomainEvents::ANY, LocalId::from(index as u32 + 1));
        }

        let priority = self
            .if_true
            .probes
            .iter()
            .chain(&self.if_false.probes)
            .map(|probe| probe.priority())
            .max()
            .unwrap_or(Priority::Unary);

        ReificationPropagator {
            reification: self.reification,
            if_true: self.if_true,
            if_false: self.if_false,
            priority,
        }
    }
}

/// Links a 0-1 variable to a constraint and its opposite.
///
/// While the variable is unfixed, the propagator watches the entailment of both sides and fixes
/// the variable once either side is decided. Once the variable is fixed, the silent propagators
/// of the corresponding side are activated and this propagator becomes passive. The propagators
/// of the other side stay silent.
#[derive(Clone)]
pub(crate) struct ReificationPropagator {
    reification: DomainId,
    if_true: ReifiedSide,
    if_false: ReifiedSide,
    priority: Priority,
}

impl ReificationPropagator {
    fn decide(&self, domains: Domains) -> Option<i32> {
        match self.if_true.entailment(domains) {
            Entailment::True => Some(1),
            Entailment::False => Some(0),
            Entailment::Unknown => match self.if_false.entailment(domains) {
                Entailment::True => Some(0),
                Entailment::False => Some(1),
                Entailment::Unknown => None,
            },
        }
    }
}

impl Propagator for ReificationPropagator {
    fn name(&self) -> &str {
        "Reification"
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        if !context.is_fixed(self.reification) {
            match self.decide(context.domains()) {
                Some(value) => context.instantiate(self.reification, value)?,
                None => return Ok(()),
            }
        }

        let chosen = if context.fixed_value(self.reification) == Some(1) {
            &self.if_true
        } else {
            &self.if_false
        };

        context.activate_reified(&chosen.propagators);
        context.set_passive();

        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        match domains.fixed_value(self.reification) {
            Some(1) => self.if_true.entailment(domains),
            Some(_) => self.if_false.entailment(domains),
            None => Entailment::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::constraints::arithmetic;
    use crate::propagation::PropagatorState;
    use crate::State;

    #[test]
    fn the_unchosen_side_stays_silent() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 10, None);

        let x_is_three = arithmetic::equals_constant(&mut state, x, 3);
        let b = state.reify(x_is_three).expect("free");
        let opposite = state.get_opposite(x_is_three);
        let if_true = state.constraint_propagators(x_is_three)[0];
        let if_false = state.constraint_propagators(opposite)[0];

        state.new_checkpoint();
        state.instantiate(b, 0).expect("b is 0-1");
        state
            .propagate_to_fixed_point()
            .expect("x != 3 is feasible");

        assert!(!state.contains(x, 3));
        assert_eq!(
            state.propagator_state(if_true),
            PropagatorState::ReifiedSilent
        );
        // x != 3 holds as soon as it has run.
        assert_eq!(state.propagator_state(if_false), PropagatorState::Passive);

        state.restore_to(0);
        assert_eq!(
            state.propagator_state(if_false),
            PropagatorState::ReifiedSilent
        );
        assert!(state.contains(x, 3));
    }
}
