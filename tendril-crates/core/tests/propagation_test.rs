#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::domains;
use helpers::init_logging;
use helpers::CountingArgs;
use tendril_core::constraints::arithmetic;
use tendril_core::ActivationOrder;
use tendril_core::Cause;
use tendril_core::DomainEvents;
use tendril_core::DomainId;
use tendril_core::EngineOptions;
use tendril_core::PriorityMode;
use tendril_core::State;

/// x + 2 <= y, y + 3 <= z, x != 4, y = w, w != 9, z != 20 over [0, 20].
fn chain(options: EngineOptions) -> (State, Vec<DomainId>) {
    let mut state = State::new(options);
    let x = state.new_interval_variable(0, 20, Some("x".into()));
    let y = state.new_interval_variable(0, 20, Some("y".into()));
    let z = state.new_interval_variable(0, 20, Some("z".into()));
    let w = state.new_interval_variable(0, 20, Some("w".into()));

    let constraints = [
        arithmetic::less_or_equal(&mut state, x, y, 2),
        arithmetic::less_or_equal(&mut state, y, z, 3),
        arithmetic::not_equals_constant(&mut state, x, 4),
        arithmetic::binary_equals(&mut state, y, w),
        arithmetic::not_equals_constant(&mut state, w, 9),
        arithmetic::not_equals_constant(&mut state, z, 20),
    ];

    for constraint in constraints {
        state.post(constraint).expect("feasible at the root");
    }

    (state, vec![x, y, z, w])
}

#[test]
fn the_fixed_point_does_not_depend_on_the_scheduling_order() {
    init_logging();

    let mut results = Vec::new();

    for priority_mode in [PriorityMode::Static, PriorityMode::Dynamic] {
        for activation_order in [ActivationOrder::Posting, ActivationOrder::Priority] {
            let (mut state, variables) = chain(EngineOptions {
                priority_mode,
                activation_order,
            });

            state.new_checkpoint();
            state.tighten_lower_bound(variables[0], 3).expect("x can be 3");
            state.remove_value(variables[2], 11).expect("z has other values");
            state
                .propagate_to_fixed_point()
                .expect("the chain is feasible");

            results.push(domains(&state, &variables));
        }
    }

    assert_eq!(results[0][0], vec![3, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14]);
    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn propagating_again_changes_nothing() {
    init_logging();

    let (mut state, variables) = chain(EngineOptions::default());
    state.new_checkpoint();
    state.tighten_upper_bound(variables[2], 15).expect("z can be 15");
    state.propagate_to_fixed_point().expect("feasible");

    let before = domains(&state, &variables);
    let trail_len = state.trail_len();

    state.propagate_to_fixed_point().expect("still feasible");

    assert_eq!(domains(&state, &variables), before);
    assert_eq!(state.trail_len(), trail_len);
}

#[test]
fn domains_only_shrink_along_a_branch() {
    init_logging();

    let (mut state, variables) = chain(EngineOptions::default());
    let mut previous = domains(&state, &variables);

    for (index, value) in [(0, 1), (3, 12), (2, 18), (0, 2)] {
        state.new_checkpoint();
        if state.tighten_lower_bound(variables[index], value).is_err()
            || state.propagate_to_fixed_point().is_err()
        {
            break;
        }

        let current = domains(&state, &variables);
        for (now, before) in current.iter().zip(&previous) {
            assert!(now.iter().all(|value| before.contains(value)));
        }
        previous = current;
    }
}

#[test]
fn a_watcher_is_advised_once_per_change_of_another_propagator() {
    init_logging();

    let mut state = State::default();
    let x = state.new_interval_variable(0, 10, None);
    let y = state.new_interval_variable(0, 10, None);

    // y <= x: raising the lower bound of y raises the lower bound of x.
    let y_below_x = arithmetic::less_or_equal(&mut state, y, x, 0);
    state.post(y_below_x).expect("feasible");

    let mut builder = state.new_constraint("counting");
    let counter = builder.add_propagator(CountingArgs {
        x,
        events: DomainEvents::LOWER_BOUND,
    });
    let counting = builder.finish().expect("a propagator was added");
    state.post(counting).expect("counting never fails");

    let count = |state: &State| {
        let propagator = state.get_propagator(counter).expect("counter exists");
        (propagator.num_advised, propagator.num_propagations)
    };
    assert_eq!(count(&state), (0, 1));

    for (round, bound) in [4, 6, 9].into_iter().enumerate() {
        state.new_checkpoint();
        state.tighten_lower_bound(y, bound).expect("y can be raised");
        state.propagate_to_fixed_point().expect("feasible");

        assert_eq!(state.lower_bound(x), bound);
        assert_eq!(count(&state), (round + 1, round + 2));
    }

    // Changes to the upper bound are not of interest.
    state.new_checkpoint();
    state.tighten_upper_bound(x, 9).expect("x can be 9");
    state.propagate_to_fixed_point().expect("feasible");
    assert_eq!(count(&state), (3, 4));
}

#[test]
fn a_contradiction_reports_the_wiped_out_domain() {
    init_logging();

    let mut state = State::default();
    let x = state.new_interval_variable(0, 5, None);
    let y = state.new_interval_variable(0, 5, None);

    let x_below_y = arithmetic::less_or_equal(&mut state, x, y, 1);
    state.post(x_below_y).expect("feasible");

    state.new_checkpoint();
    state.tighten_lower_bound(x, 4).expect("x can be 4");
    state.tighten_upper_bound(y, 4).expect("y can be 4");
    let contradiction = state
        .propagate_to_fixed_point()
        .expect_err("x + 1 <= y is violated");

    assert!(matches!(contradiction.cause, Cause::Propagator(_)));
    assert!(contradiction.domain == Some(x) || contradiction.domain == Some(y));

    // Nothing is left scheduled, so a new branch can be explored right away.
    state.restore_to(0);
    state.new_checkpoint();
    state.tighten_lower_bound(x, 2).expect("x can be 2");
    state.propagate_to_fixed_point().expect("feasible");
    assert_eq!(state.lower_bound(y), 3);
}

#[test]
fn a_decision_which_empties_a_domain_is_refused() {
    let mut state = State::default();
    let x = state.new_interval_variable(0, 5, None);

    let contradiction = state
        .tighten_lower_bound(x, 6)
        .expect_err("no value above 5");

    assert_eq!(contradiction.domain, Some(x));
    assert_eq!(contradiction.cause, Cause::Decision);
    assert_eq!(state.lower_bound(x), 0);
}

#[test]
fn fine_events_pending_at_a_contradiction_do_not_block_later_events() {
    init_logging();

    let mut state = State::default();
    let x = state.new_interval_variable(1, 5, None);
    let y = state.new_interval_variable(1, 5, None);

    let x_equals_y = arithmetic::binary_equals(&mut state, x, y);
    state.post(x_equals_y).expect("feasible");

    // Both variables change before the propagator runs; the first fine call fails while the
    // event on the other variable is still pending.
    state.new_checkpoint();
    state.tighten_upper_bound(x, 2).expect("x can be 2");
    state.tighten_lower_bound(y, 4).expect("y can be 4");
    let _ = state
        .propagate_to_fixed_point()
        .expect_err("x <= 2 and y >= 4 cannot be equal");
    state.restore_to(0);

    state.remove_value(x, 3).expect("x has other values");
    state.propagate_to_fixed_point().expect("feasible");
    assert!(!state.contains(y, 3));

    state.remove_value(y, 4).expect("y has other values");
    state.propagate_to_fixed_point().expect("feasible");
    assert!(!state.contains(x, 4));

    assert_eq!(domains(&state, &[x, y]), vec![vec![1, 2, 5], vec![1, 2, 5]]);
}

#[test]
fn a_variable_can_span_the_full_integer_range() {
    let mut state = State::default();
    let x = state.new_interval_variable(i32::MIN, i32::MAX, None);
    let y = state.new_interval_variable(-10, 10, None);

    let x_equals_y = arithmetic::binary_equals(&mut state, x, y);
    state.post(x_equals_y).expect("feasible");

    assert_eq!(state.lower_bound(x), -10);
    assert_eq!(state.upper_bound(x), 10);
    assert_eq!(state.domain_size(x), 21);

    let z = state.new_interval_variable(i32::MIN, i32::MAX, None);
    state.remove_value(z, 0).expect("z has other values");
    assert_eq!(state.domain_size(z), (1 << 32) - 1);
    assert!(!state.contains(z, 0));
    assert!(state.contains(z, i32::MAX));
}
