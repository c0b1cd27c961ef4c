use super::BinaryEqualsArgs;
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

/// The [`PropagatorConstructor`] for the [`BinaryNotEqualsPropagator`].
#[derive(Clone, Copy, Debug)]
pub struct BinaryNotEqualsArgs {
    pub x: DomainId,
    pub y: DomainId,
}

impl PropagatorConstructor for BinaryNotEqualsArgs {
    type PropagatorImpl = BinaryNotEqualsPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.x, DomainEvents::INSTANTIATE, LocalId::from(0));
        context.register(self.y, DomainEvents::INSTANTIATE, LocalId::from(1));

        BinaryNotEqualsPropagator {
            x: self.x,
            y: self.y,
        }
    }
}

/// Propagator for the constraint `x != y`.
#[derive(Clone, Copy, Debug)]
pub struct BinaryNotEqualsPropagator {
    x: DomainId,
    y: DomainId,
}

impl Propagator for BinaryNotEqualsPropagator {
    fn name(&self) -> &str {
        "BinaryNotEq"
    }

    fn priority(&self) -> Priority {
        Priority::Binary
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        // If the left side is fixed, then we remove its value from the right side
        if let Some(value) = context.fixed_value(self.x) {
            context.remove_value(self.y, value)?;
        }

        // If the right side is fixed, then we remove its value from the left side
        if let Some(value) = context.fixed_value(self.y) {
            context.remove_value(self.x, value)?;
        }

        if self.is_entailed(context.domains()) == Entailment::True {
            context.set_passive();
        }

        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        match (domains.fixed_value(self.x), domains.fixed_value(self.y)) {
            (Some(x), Some(y)) => Entailment::from_bool(x != y),
            (Some(x), None) if !domains.contains(self.y, x) => Entailment::True,
            (None, Some(y)) if !domains.contains(self.x, y) => Entailment::True,
            _ => {
                let disjoint = domains.upper_bound(self.x) < domains.lower_bound(self.y)
                    || domains.upper_bound(self.y) < domains.lower_bound(self.x);

                if disjoint {
                    Entailment::True
                } else {
                    Entailment::Unknown
                }
            }
        }
    }

    fn negation(&self) -> Option<Box<dyn DynPropagatorConstructor>> {
        Some(Box::new(BinaryEqualsArgs {
            x: self.x,
            y: self.y,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;
    use crate::propagation::PropagatorState;

    #[test]
    fn removes_a_fixed_value_from_the_other_side() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 5);
        let y = solver.new_variable(1, 5);

        let handle = solver
            .new_propagator(BinaryNotEqualsArgs { x, y })
            .expect("no contradiction");

        solver.instantiate(x, 5).expect("non-empty");
        solver.propagate().expect("no contradiction");

        solver.assert_bounds(y, 1, 4);
        assert_eq!(
            solver.propagator_state(handle.untyped()),
            PropagatorState::Passive
        );
    }

    #[test]
    fn both_fixed_to_the_same_value_is_a_contradiction() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(2, 2);
        let y = solver.new_variable(2, 2);

        let contradiction = solver
            .new_propagator(BinaryNotEqualsArgs { x, y })
            .expect_err("x = y = 2");

        assert_eq!(contradiction.domain, Some(y));
    }

    #[test]
    fn separated_bounds_are_entailed() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 3);
        let y = solver.new_variable(4, 8);
        let z = solver.new_variable(3, 8);

        let probe = |x, y| BinaryNotEqualsPropagator { x, y };

        assert_eq!(solver.is_entailed(&probe(x, y)), Entailment::True);
        assert_eq!(solver.is_entailed(&probe(x, z)), Entailment::Unknown);
    }
}
