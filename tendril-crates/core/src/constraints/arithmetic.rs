//! Constraints consisting of a single arithmetic propagator.
use super::ConstraintId;
use crate::engine::variables::DomainId;
use crate::propagation::DynPropagatorConstructor;
use crate::propagators::arithmetic::BinaryEqualsArgs;
use crate::propagators::arithmetic::BinaryNotEqualsArgs;
use crate::propagators::arithmetic::EqualsConstantArgs;
use crate::propagators::arithmetic::LessOrEqualArgs;
use crate::propagators::arithmetic::NotEqualsConstantArgs;
use crate::State;

fn single_propagator(
    state: &mut State,
    name: String,
    constructor: Box<dyn DynPropagatorConstructor>,
) -> ConstraintId {
    let propagator = state.create_propagator(constructor);
    state.constraints.add(name, vec![propagator])
}

/// Creates the constraint `x = constant`. The constraint still has to be posted or reified.
pub fn equals_constant(state: &mut State, x: DomainId, constant: i32) -> ConstraintId {
    single_propagator(
        state,
        format!("{x} = {constant}"),
        Box::new(EqualsConstantArgs { x, constant }),
    )
}

/// Creates the constraint `x != constant`.
pub fn not_equals_constant(state: &mut State, x: DomainId, constant: i32) -> ConstraintId {
    single_propagator(
        state,
        format!("{x} != {constant}"),
        Box::new(NotEqualsConstantArgs { x, constant }),
    )
}

/// Creates the constraint `x = y`, propagated to domain consistency.
pub fn binary_equals(state: &mut State, x: DomainId, y: DomainId) -> ConstraintId {
    single_propagator(
        state,
        format!("{x} = {y}"),
        Box::new(BinaryEqualsArgs { x, y }),
    )
}

pub fn binary_not_equals(state: &mut State, x: DomainId, y: DomainId) -> ConstraintId {
    single_propagator(
        state,
        format!("{x} != {y}"),
        Box::new(BinaryNotEqualsArgs { x, y }),
    )
}

/// Creates the constraint `x + offset <= y`, propagated on the bounds only.
pub fn less_or_equal(state: &mut State, x: DomainId, y: DomainId, offset: i32) -> ConstraintId {
    single_propagator(
        state,
        format!("{x} + {offset} <= {y}"),
        Box::new(LessOrEqualArgs { x, y, offset }),
    )
}
