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

/// The [`PropagatorConstructor`] for the [`LessOrEqualPropagator`].
#[derive(Clone, Copy, Debug)]
pub struct LessOrEqualArgs {
    pub x: DomainId,
    pub y: DomainId,
    pub offset: i32,
}

impl PropagatorConstructor for LessOrEqualArgs {
    type PropagatorImpl = LessOrEqualPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.x, DomainEvents::LOWER_BOUND, LocalId::from(0));
        context.register(self.y, DomainEvents::UPPER_BOUND, LocalId::from(1));

        LessOrEqualPropagator {
            x: self.x,
            y: self.y,
            offset: self.offset,
        }
    }
}

/// Bounds consistent propagator for `x + offset <= y`.
#[derive(Clone, Copy, Debug)]
pub struct LessOrEqualPropagator {
    x: DomainId,
    y: DomainId,
    offset: i32,
}

impl Propagator for LessOrEqualPropagator {
    fn name(&self) -> &str {
        "LessOrEqual"
    }

    fn priority(&self) -> Priority {
        Priority::Binary
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        // The two filtering rules read bounds the other one does not write, so a single pass
        // reaches the fixed point.
        let upper_bound_x = context.upper_bound(self.y) - self.offset;
        context.tighten_upper_bound(self.x, upper_bound_x)?;

        let lower_bound_y = context.lower_bound(self.x) + self.offset;
        context.tighten_lower_bound(self.y, lower_bound_y)?;

        if self.is_entailed(context.domains()) == Entailment::True {
            context.set_passive();
        }

        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        if domains.upper_bound(self.x) + self.offset <= domains.lower_bound(self.y) {
            Entailment::True
        } else if domains.lower_bound(self.x) + self.offset > domains.upper_bound(self.y) {
            Entailment::False
        } else {
            Entailment::Unknown
        }
    }

    fn negation(&self) -> Option<Box<dyn DynPropagatorConstructor>> {
        // not(x + c <= y) is y + (1 - c) <= x
        Some(Box::new(LessOrEqualArgs {
            x: self.y,
            y: self.x,
            offset: 1 - self.offset,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn tightens_both_bounds() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);
        let y = solver.new_variable(0, 10);

        let _ = solver
            .new_propagator(LessOrEqualArgs { x, y, offset: 3 })
            .expect("no contradiction");

        solver.assert_bounds(x, 0, 7);
        solver.assert_bounds(y, 3, 10);

        solver.set_lower_bound(x, 5).expect("non-empty");
        solver.propagate().expect("no contradiction");
        solver.assert_bounds(y, 8, 10);
    }

    #[test]
    fn holes_are_skipped() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 10);
        let y = solver.new_variable(0, 6);
        solver.remove(x, 6).expect("non-empty");
        solver.remove(x, 5).expect("non-empty");

        let _ = solver
            .new_propagator(LessOrEqualArgs { x, y, offset: 0 })
            .expect("no contradiction");

        solver.assert_bounds(x, 0, 4);
    }

    #[test]
    fn infeasible_bounds() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(5, 10);
        let y = solver.new_variable(0, 4);

        let _ = solver
            .new_propagator(LessOrEqualArgs { x, y, offset: 0 })
            .expect_err("x > y");
    }
}
