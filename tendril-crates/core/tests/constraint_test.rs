#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::init_logging;
use tendril_core::constraints::arithmetic;
use tendril_core::propagation::PropagatorState;
use tendril_core::propagators::arithmetic::LessOrEqualArgs;
use tendril_core::ConstraintId;
use tendril_core::ConstraintOperationError;
use tendril_core::ConstraintStatus;
use tendril_core::Entailment;
use tendril_core::State;

fn states(state: &State, constraint: ConstraintId) -> Vec<PropagatorState> {
    state
        .constraint_propagators(constraint)
        .iter()
        .map(|&propagator| state.propagator_state(propagator))
        .collect()
}

#[test]
fn fixing_the_reification_activates_exactly_one_side() {
    init_logging();

    let mut state = State::default();
    let x = state.new_interval_variable(1, 10, None);
    let y = state.new_interval_variable(1, 10, None);

    let x_below_y = arithmetic::less_or_equal(&mut state, x, y, 0);
    let b = state.reify(x_below_y).expect("the constraint is free");
    let opposite = state.get_opposite(x_below_y);
    let reification = state
        .reification_constraint(x_below_y)
        .expect("b is not fixed");

    assert_eq!(state.constraint_status(x_below_y), ConstraintStatus::Reified);
    assert_eq!(state.constraint_status(opposite), ConstraintStatus::Reified);
    assert_eq!(states(&state, x_below_y), vec![PropagatorState::ReifiedSilent]);
    assert_eq!(states(&state, opposite), vec![PropagatorState::ReifiedSilent]);
    assert_eq!(state.is_entailed(reification), Entailment::Unknown);

    for (value, active, silent) in [(1, x_below_y, opposite), (0, opposite, x_below_y)] {
        state.new_checkpoint();
        state.instantiate(b, value).expect("b is a 0-1 variable");
        state.propagate_to_fixed_point().expect("both sides are feasible");

        assert_eq!(states(&state, active), vec![PropagatorState::Active]);
        assert_eq!(states(&state, silent), vec![PropagatorState::ReifiedSilent]);

        state.tighten_upper_bound(x, 6).expect("x can be 6");
        state.tighten_lower_bound(y, 6).expect("y can be 6");
        // Violates the opposite of x <= y; entailment is compared either way.
        let _ = state.propagate_to_fixed_point();
        assert_eq!(state.is_entailed(reification), state.is_entailed(active));

        state.restore_to(0);
        assert_eq!(states(&state, x_below_y), vec![PropagatorState::ReifiedSilent]);
        assert_eq!(states(&state, opposite), vec![PropagatorState::ReifiedSilent]);
    }
}

#[test]
fn a_decided_constraint_fixes_its_reification() {
    init_logging();

    let mut state = State::default();
    let x = state.new_interval_variable(1, 10, None);

    let x_is_five = arithmetic::equals_constant(&mut state, x, 5);
    let b = state.reify(x_is_five).expect("the constraint is free");
    assert_eq!(state.get_domain_by_name("REIF_0"), Some(b));

    state.new_checkpoint();
    state.remove_value(x, 5).expect("x has other values");
    state.propagate_to_fixed_point().expect("feasible");
    assert_eq!(state.fixed_value(b), Some(0));

    state.restore_to(0);
    state.new_checkpoint();
    state.instantiate(x, 5).expect("x can be 5");
    state.propagate_to_fixed_point().expect("feasible");
    assert_eq!(state.fixed_value(b), Some(1));
}

#[test]
fn a_reification_fixed_at_the_root_posts_a_side() {
    let mut state = State::default();
    let x = state.new_interval_variable(1, 10, None);
    let b = state.new_interval_variable(0, 0, None);

    let x_is_five = arithmetic::equals_constant(&mut state, x, 5);
    state.reify_with(x_is_five, b).expect("the constraint is free");

    let opposite = state.get_opposite(x_is_five);
    assert_eq!(state.constraint_status(opposite), ConstraintStatus::Posted);
    assert_eq!(state.constraint_status(x_is_five), ConstraintStatus::Free);
    assert!(!state.contains(x, 5));
}

#[test]
fn reifying_twice_links_the_booleans() {
    init_logging();

    let mut state = State::default();
    let x = state.new_interval_variable(1, 10, None);
    let x_is_five = arithmetic::equals_constant(&mut state, x, 5);

    let b = state.reify(x_is_five).expect("the constraint is free");
    let c = state.new_boolean_variable(None);
    let d = state.new_boolean_variable(None);

    assert_eq!(state.reify(x_is_five), Ok(b));
    state.reify_with(x_is_five, b).expect("same boolean");
    state.reify_with(x_is_five, c).expect("links c to b");

    let opposite = state.get_opposite(x_is_five);
    state.reify_with(opposite, d).expect("links d to not b");

    state.new_checkpoint();
    state.instantiate(c, 1).expect("c can be 1");
    state.propagate_to_fixed_point().expect("feasible");

    assert_eq!(state.fixed_value(b), Some(1));
    assert_eq!(state.fixed_value(d), Some(0));
    assert_eq!(state.fixed_value(x), Some(5));
}

#[test]
fn the_opposite_of_the_opposite_is_the_constraint() {
    let mut state = State::default();
    let x = state.new_interval_variable(1, 10, None);

    let x_is_five = arithmetic::equals_constant(&mut state, x, 5);
    let opposite = state.get_opposite(x_is_five);

    assert_eq!(state.get_opposite(opposite), x_is_five);
    assert_eq!(state.get_opposite(x_is_five), opposite);
    assert_eq!(state.constraint_name(opposite), format!("not({x} = 5)"));

    assert_eq!(state.is_entailed(opposite), Entailment::Unknown);

    state.new_checkpoint();
    state.instantiate(x, 5).expect("x can be 5");
    assert_eq!(state.is_entailed(opposite), Entailment::False);
    assert_eq!(state.is_entailed(x_is_five), Entailment::True);

    state.restore_to(0);
    state.new_checkpoint();
    state.remove_value(x, 5).expect("x has other values");
    assert_eq!(state.is_entailed(opposite), Entailment::True);
    assert_eq!(state.is_satisfied(x_is_five), Entailment::False);
}

#[test]
fn the_default_opposite_fails_only_when_the_constraint_is_entailed() {
    init_logging();

    let mut state = State::default();
    let x = state.new_interval_variable(1, 10, None);
    let y = state.new_interval_variable(1, 10, None);

    // x = y as two inequalities, which has no negation of its own.
    let mut builder = state.new_constraint("x = y");
    let _ = builder.add_propagator(LessOrEqualArgs { x, y, offset: 0 });
    let _ = builder.add_propagator(LessOrEqualArgs { x: y, y: x, offset: 0 });
    let equal = builder.finish().expect("two propagators");

    let different = state.get_opposite(equal);
    assert_eq!(state.get_opposite(different), equal);
    state.post(different).expect("x != y is feasible");

    // No filtering: fixing x leaves y untouched.
    state.new_checkpoint();
    state.instantiate(x, 3).expect("x can be 3");
    state.propagate_to_fixed_point().expect("y is not fixed yet");
    assert_eq!(state.domain_size(y), 10);

    state.instantiate(y, 4).expect("y can be 4");
    state.propagate_to_fixed_point().expect("3 != 4");
    assert_eq!(state.is_entailed(different), Entailment::True);

    state.restore_to(0);
    state.new_checkpoint();
    state.instantiate(x, 3).expect("x can be 3");
    state.instantiate(y, 3).expect("y can be 3");
    let _ = state
        .propagate_to_fixed_point()
        .expect_err("x = y = 3 violates x != y");
}

#[test]
fn misuse_of_constraints_is_reported() {
    let mut state = State::default();
    let x = state.new_interval_variable(1, 10, None);
    let y = state.new_interval_variable(1, 10, None);

    let builder = state.new_constraint("empty");
    assert_eq!(
        builder.finish(),
        Err(ConstraintOperationError::EmptyConstraint)
    );

    let posted = arithmetic::binary_not_equals(&mut state, x, y);
    state.post(posted).expect("feasible");
    assert_eq!(state.post(posted), Err(ConstraintOperationError::AlreadyPosted));
    assert_eq!(
        state.reify(posted),
        Err(ConstraintOperationError::ReifyingPostedConstraint)
    );

    let reified = arithmetic::equals_constant(&mut state, x, 3);
    let _ = state.reify(reified).expect("free");
    assert_eq!(
        state.post(reified),
        Err(ConstraintOperationError::PostingReifiedConstraint)
    );

    let other = arithmetic::equals_constant(&mut state, y, 3);
    assert_eq!(
        state.reify_with(other, x),
        Err(ConstraintOperationError::NonBooleanReification)
    );

    let infeasible = arithmetic::equals_constant(&mut state, y, 11);
    assert_eq!(
        state.post(infeasible),
        Err(ConstraintOperationError::InfeasibleConstraint)
    );
}
