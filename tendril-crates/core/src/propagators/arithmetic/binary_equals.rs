use enumset::EnumSet;

use super::BinaryNotEqualsArgs;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::engine::variables::DomainId;
use crate::engine::DomainEvent;
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

const ID_X: LocalId = LocalId::from(0);
const ID_Y: LocalId = LocalId::from(1);

/// The [`PropagatorConstructor`] for the [`BinaryEqualsPropagator`].
#[derive(Clone, Copy, Debug)]
pub struct BinaryEqualsArgs {
    pub x: DomainId,
    pub y: DomainId,
}

impl PropagatorConstructor for BinaryEqualsArgs {
    type PropagatorImpl = BinaryEqualsPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.x, DomainEvents::ANY, ID_X);
        context.register(self.y, DomainEvents::ANY, ID_Y);

        BinaryEqualsPropagator {
            x: self.x,
            y: self.y,
        }
    }
}

/// Domain consistent propagator for the constraint `x = y`.
///
/// After propagation both variables have the intersection of their domains. The propagator
/// reacts to fine events: a change to one side is copied to the other side without re-reading
/// both domains in the common case.
#[derive(Clone, Copy, Debug)]
pub struct BinaryEqualsPropagator {
    x: DomainId,
    y: DomainId,
}

impl BinaryEqualsPropagator {
    fn sides(&self, local_id: LocalId) -> (DomainId, DomainId) {
        if local_id == ID_X {
            (self.x, self.y)
        } else {
            (self.y, self.x)
        }
    }
}

/// Removes every value from `target` which is not in the domain of `source`.
fn restrict(
    context: &mut PropagationContext,
    source: DomainId,
    target: DomainId,
) -> PropagationStatus {
    context.tighten_lower_bound(target, context.lower_bound(source))?;
    context.tighten_upper_bound(target, context.upper_bound(source))?;

    let to_remove = context
        .iterate_domain(target)
        .filter(|&value| !context.contains(source, value))
        .collect::<Vec<_>>();

    for value in to_remove {
        context.remove_value(target, value)?;
    }

    Ok(())
}

impl Propagator for BinaryEqualsPropagator {
    fn name(&self) -> &str {
        "BinaryEq"
    }

    fn priority(&self) -> Priority {
        Priority::Binary
    }

    fn reacts_to_fine_events(&self) -> bool {
        true
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        restrict(&mut context, self.x, self.y)?;
        restrict(&mut context, self.y, self.x)?;

        Ok(())
    }

    fn propagate_fine(
        &mut self,
        mut context: PropagationContext,
        local_id: LocalId,
        _events: EnumSet<DomainEvent>,
    ) -> PropagationStatus {
        let (changed, other) = self.sides(local_id);

        // The other side may have been smaller than the changed one to begin with, so the
        // intersection has to be copied back as well.
        restrict(&mut context, changed, other)?;
        restrict(&mut context, other, changed)?;

        Ok(())
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        match (domains.fixed_value(self.x), domains.fixed_value(self.y)) {
            (Some(x), Some(y)) => Entailment::from_bool(x == y),
            _ => {
                let overlaps = domains
                    .iterate_domain(self.x)
                    .any(|value| domains.contains(self.y, value));

                if overlaps {
                    Entailment::Unknown
                } else {
                    Entailment::False
                }
            }
        }
    }

    fn negation(&self) -> Option<Box<dyn DynPropagatorConstructor>> {
        Some(Box::new(BinaryNotEqualsArgs {
            x: self.x,
            y: self.y,
        }))
    }
}
