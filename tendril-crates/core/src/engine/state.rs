use std::sync::Arc;

use itertools::Itertools;
use log::debug;
use log::warn;

use super::Assignments;
use super::EmptyDomain;
use super::EngineOptions;
use super::PropagationEngine;
use super::VariableNames;
use crate::basic_types::contradiction;
use crate::basic_types::Cause;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
use crate::constraints::ConstraintBuilder;
use crate::constraints::ConstraintId;
use crate::constraints::ConstraintStatus;
use crate::constraints::ConstraintStore;
use crate::create_statistics_struct;
use crate::engine::trailed::TrailedValues;
use crate::engine::variables::DomainId;
use crate::propagation::Domains;
use crate::propagation::DynPropagatorConstructor;
use crate::propagation::Propagator;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::propagation::PropagatorState;
use crate::propagators::arithmetic::BinaryEqualsArgs;
use crate::propagators::arithmetic::BinaryNotEqualsArgs;
use crate::propagators::opposite::OppositeArgs;
use crate::propagators::reification::ReificationArgs;
use crate::propagators::reification::ReifiedSide;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::tendril_assert_simple;

create_statistics_struct!(
    /// Counters kept by the [`State`].
    StateStatistics {
        num_decisions: u64,
        num_fixed_point_calls: u64,
        num_contradictions: u64,
        num_backtracks: u64,
        /// The number of levels which were undone over all backtracks.
        sum_of_backjumps: u64,
        num_posted_constraints: u64,
        num_reified_constraints: u64,
    }
);

/// The [`State`] is the container of variables, propagators and constraints.
///
/// Changes made from the outside (decisions) are not propagated right away; an explicit call to
/// [`State::propagate_to_fixed_point`] runs the engine. Every change made after
/// [`State::new_checkpoint`] is undone by [`State::restore_to`].
///
/// [`State`] implements [`Clone`], and cloning the [`State`] will create a fresh copy of the
/// [`State`]. If the [`State`] is large, this may be extremely expensive.
#[derive(Debug, Clone)]
pub struct State {
    /// Tracks the domains of the integer variables.
    pub(crate) assignments: Assignments,
    /// Keep track of trailed values (i.e. values which automatically backtrack).
    pub(crate) trailed_values: TrailedValues,
    /// The propagators, their lifecycle, and the machinery which schedules them.
    pub(crate) engine: PropagationEngine,
    pub(crate) constraints: ConstraintStore,
    /// The names of the variables in the solver.
    variable_names: VariableNames,
    /// Used to name the booleans created by [`State::reify`].
    num_reification_variables: usize,
    statistics: StateStatistics,
}

impl Default for State {
    fn default() -> Self {
        State::new(EngineOptions::default())
    }
}

impl State {
    pub fn new(options: EngineOptions) -> Self {
        State {
            assignments: Assignments::default(),
            trailed_values: TrailedValues::default(),
            engine: PropagationEngine::new(options),
            constraints: ConstraintStore::default(),
            variable_names: VariableNames::default(),
            num_reification_variables: 0,
            statistics: StateStatistics::default(),
        }
    }

    pub fn log_statistics(&self) {
        let logger = StatisticLogger::default();
        self.statistics.log(logger.attach_to_prefix("state"));
        self.engine.log_statistics(logger);
    }
}

/// Operations to create variables.
impl State {
    /// Creates a new interval variable with the given lower and upper bound.
    ///
    /// The name is used in logs to identify the variable and can be used to retrieve it with
    /// [`State::get_domain_by_name`]. Names are required to be unique; if the state already
    /// contains a variable with the given name, then this function will panic.
    ///
    /// Creation of new variables is not influenced by the current checkpoint of the state. If
    /// a variable is created at a non-zero checkpoint, then it will _not_ 'disappear' when
    /// backtracking past the checkpoint where it was created.
    pub fn new_interval_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<Arc<str>>,
    ) -> DomainId {
        let domain_id = self.assignments.grow(lower_bound, upper_bound);
        self.engine.grow();

        if let Some(name) = name {
            self.variable_names.add_name(domain_id, name);
        }

        domain_id
    }

    /// Creates a new 0-1 variable. See [`State::new_interval_variable`].
    pub fn new_boolean_variable(&mut self, name: Option<Arc<str>>) -> DomainId {
        self.new_interval_variable(0, 1, name)
    }

    pub fn num_variables(&self) -> usize {
        self.assignments.num_domains()
    }

    pub fn get_domain_by_name(&self, name: &str) -> Option<DomainId> {
        self.variable_names.get_domain_by_name(name)
    }

    pub fn variable_name(&self, domain: DomainId) -> Option<&str> {
        self.variable_names.get_name(domain)
    }
}

/// Operations to retrieve information about values.
impl State {
    /// A read-only view of all domains, e.g. for calling [`Propagator::is_entailed`].
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(&self.assignments, &self.trailed_values)
    }

    pub fn lower_bound(&self, domain: DomainId) -> i32 {
        self.assignments.get_lower_bound(domain)
    }

    pub fn upper_bound(&self, domain: DomainId) -> i32 {
        self.assignments.get_upper_bound(domain)
    }

    pub fn contains(&self, domain: DomainId, value: i32) -> bool {
        self.assignments.is_value_in_domain(domain, value)
    }

    pub fn is_fixed(&self, domain: DomainId) -> bool {
        self.assignments.is_domain_assigned(domain)
    }

    /// If the given `domain` is fixed, then [`Some`] containing the assigned value is
    /// returned. Otherwise, [`None`] is returned.
    pub fn fixed_value(&self, domain: DomainId) -> Option<i32> {
        self.assignments.get_assigned_value(domain)
    }

    pub fn domain_size(&self, domain: DomainId) -> usize {
        self.assignments.get_domain_size(domain)
    }

    /// The values in the domain, in increasing order.
    pub fn iterate_domain(&self, domain: DomainId) -> impl Iterator<Item = i32> + '_ {
        self.assignments.get_domain_iterator(domain)
    }

    /// Returns the number of created checkpoints.
    pub fn get_checkpoint(&self) -> usize {
        self.assignments.get_checkpoint()
    }
}

/// Operations for retrieving information about the trail.
impl State {
    /// Returns the combined length of the trails of the domains, the trailed integers, the
    /// propagator lifecycle and the temporary posts.
    pub fn trail_len(&self) -> usize {
        self.assignments.num_trail_entries()
            + self.trailed_values.num_trail_entries()
            + self.engine.lifecycle.num_trail_entries()
            + self.constraints.num_trail_entries()
    }
}

/// Operations for retrieving propagators.
impl State {
    /// Get a reference to the propagator identified by the given handle.
    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.engine.propagators.get_propagator(handle)
    }

    pub fn propagator_state(&self, propagator: PropagatorId) -> PropagatorState {
        self.engine.state(propagator)
    }

    pub fn num_propagators(&self) -> usize {
        self.engine.propagators.num_propagators()
    }

    /// The ids of all propagators, in order of creation.
    pub fn propagator_ids(&self) -> impl Iterator<Item = PropagatorId> {
        self.engine.propagators.iter_ids()
    }

    /// Creates the propagator without scheduling it. It only runs once the constraint it belongs
    /// to is posted or its reification is decided.
    pub(crate) fn create_propagator(
        &mut self,
        constructor: Box<dyn DynPropagatorConstructor>,
    ) -> PropagatorId {
        self.engine
            .add_propagator(constructor, &self.assignments, &mut self.trailed_values)
    }
}

/// Operations for modifying the state.
///
/// The mutators apply a decision. They do _not_ perform any propagation; for that an explicit
/// call to [`State::propagate_to_fixed_point`] is required. This allows applying several
/// decisions before the engine is invoked.
impl State {
    fn decision(
        &mut self,
        domain: DomainId,
        result: Result<bool, EmptyDomain>,
    ) -> PropagationStatus {
        self.statistics.num_decisions += 1;

        match result {
            Ok(_) => Ok(()),
            Err(EmptyDomain) => {
                self.statistics.num_contradictions += 1;
                Err(contradiction(
                    Some(domain),
                    Cause::Decision,
                    "decision empties the domain",
                ))
            }
        }
    }

    pub fn tighten_lower_bound(&mut self, domain: DomainId, bound: i32) -> PropagationStatus {
        let result = self.assignments.tighten_lower_bound(domain, bound);
        self.decision(domain, result)
    }

    pub fn tighten_upper_bound(&mut self, domain: DomainId, bound: i32) -> PropagationStatus {
        let result = self.assignments.tighten_upper_bound(domain, bound);
        self.decision(domain, result)
    }

    pub fn remove_value(&mut self, domain: DomainId, value: i32) -> PropagationStatus {
        let result = self.assignments.remove_value(domain, value);
        self.decision(domain, result)
    }

    pub fn instantiate(&mut self, domain: DomainId, value: i32) -> PropagationStatus {
        let result = self.assignments.instantiate(domain, value);
        self.decision(domain, result)
    }

    /// Create a checkpoint of the current [`State`], that can be returned to with
    /// [`State::restore_to`].
    ///
    /// If the state is not at fixed-point, then this method will panic.
    ///
    /// # Example
    /// ```
    /// use tendril_core::State;
    ///
    /// let mut state = State::default();
    /// let variable = state.new_interval_variable(1, 10, Some("x1".into()));
    ///
    /// assert_eq!(state.get_checkpoint(), 0);
    ///
    /// state.new_checkpoint();
    ///
    /// assert_eq!(state.get_checkpoint(), 1);
    ///
    /// state
    ///     .tighten_upper_bound(variable, 5)
    ///     .expect("The lower bound is 1 so no contradiction");
    /// assert_eq!(state.upper_bound(variable), 5);
    ///
    /// state.restore_to(0);
    ///
    /// assert_eq!(state.get_checkpoint(), 0);
    /// assert_eq!(state.upper_bound(variable), 10);
    /// ```
    pub fn new_checkpoint(&mut self) {
        tendril_assert_simple!(
            self.engine.is_at_fixed_point(),
            "Can only create a new checkpoint when all propagation has occurred"
        );

        self.assignments.new_checkpoint();
        self.trailed_values.new_checkpoint();
        self.engine.new_checkpoint();
        self.constraints.new_checkpoint();
    }

    /// Undo every change made after the given checkpoint was created: domains, trailed integers,
    /// propagator lifecycle states and temporary posts.
    ///
    /// If the provided checkpoint is equal to the current checkpoint, this is a no-op. If
    /// the provided checkpoint is larger than the current checkpoint, this method will
    /// panic.
    ///
    /// See [`State::new_checkpoint`] for an example.
    pub fn restore_to(&mut self, checkpoint: usize) {
        tendril_assert_simple!(checkpoint <= self.get_checkpoint());

        if checkpoint == self.get_checkpoint() {
            return;
        }

        self.statistics.num_backtracks += 1;
        self.statistics.sum_of_backjumps += (self.get_checkpoint() - checkpoint) as u64;

        self.assignments.synchronise(checkpoint);
        self.trailed_values.synchronise(checkpoint);
        self.engine.synchronise(checkpoint);
        self.constraints.synchronise(checkpoint);

        debug!("Restored to checkpoint {checkpoint}");
    }

    /// Runs the propagators until none of them can prune any further, or until a
    /// contradiction is found.
    ///
    /// After a contradiction nothing remains scheduled; the caller is expected to backtrack with
    /// [`State::restore_to`].
    pub fn propagate_to_fixed_point(&mut self) -> PropagationStatus {
        self.statistics.num_fixed_point_calls += 1;

        let status = self
            .engine
            .propagate(&mut self.assignments, &mut self.trailed_values);

        if status.is_err() {
            self.statistics.num_contradictions += 1;
        }

        status
    }
}

/// Operations for adding and inspecting constraints.
impl State {
    /// Starts building a constraint; see [`ConstraintBuilder`].
    ///
    /// # Example
    /// ```
    /// use tendril_core::propagators::arithmetic::LessOrEqualArgs;
    /// use tendril_core::State;
    ///
    /// let mut state = State::default();
    /// let x = state.new_interval_variable(0, 10, None);
    /// let y = state.new_interval_variable(0, 10, None);
    ///
    /// let mut builder = state.new_constraint("x + 2 <= y");
    /// let _ = builder.add_propagator(LessOrEqualArgs { x, y, offset: 2 });
    /// let constraint = builder.finish().expect("a propagator was added");
    ///
    /// state.post(constraint).expect("feasible");
    /// assert_eq!(state.upper_bound(x), 8);
    /// assert_eq!(state.lower_bound(y), 2);
    /// ```
    pub fn new_constraint(&mut self, name: impl Into<String>) -> ConstraintBuilder<'_> {
        ConstraintBuilder::new(self, name.into())
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.num_constraints()
    }

    pub fn constraint_name(&self, constraint: ConstraintId) -> &str {
        &self.constraints[constraint].name
    }

    pub fn constraint_status(&self, constraint: ConstraintId) -> ConstraintStatus {
        self.constraints[constraint].status
    }

    pub fn constraint_propagators(&self, constraint: ConstraintId) -> &[PropagatorId] {
        &self.constraints[constraint].propagators
    }

    /// The boolean the constraint is reified with, and whether the constraint holds when it is 1
    /// (`true`) or when it is 0 (`false`).
    pub fn reification(&self, constraint: ConstraintId) -> Option<(DomainId, bool)> {
        self.constraints[constraint].reification
    }

    /// The constraint which enforces the reification of `constraint`, if it is reified and the
    /// reification variable was not fixed at the root when it was created.
    pub fn reification_constraint(&self, constraint: ConstraintId) -> Option<ConstraintId> {
        self.constraints[constraint].reified_by
    }

    /// Whether the constraint holds for all ([`Entailment::True`]) or none
    /// ([`Entailment::False`]) of the assignments left in the current domains.
    pub fn is_entailed(&self, constraint: ConstraintId) -> Entailment {
        let domains = self.domains();

        Entailment::conjunction(
            self.constraints[constraint]
                .propagators
                .iter()
                .map(|&propagator| self.engine.propagators[propagator].is_entailed(domains)),
        )
    }

    /// Checks the constraint against the current domains, for validating solutions.
    pub fn is_satisfied(&self, constraint: ConstraintId) -> Entailment {
        self.is_entailed(constraint)
    }

    /// Posts the constraint: its propagators are activated in the next call to
    /// [`State::propagate_to_fixed_point`], and again whenever backtracking undoes their
    /// activation.
    ///
    /// At the root the constraint is propagated right away; a contradiction is reported as
    /// [`ConstraintOperationError::InfeasibleConstraint`] and leaves the state infeasible.
    pub fn post(&mut self, constraint: ConstraintId) -> Result<(), ConstraintOperationError> {
        let data = &mut self.constraints[constraint];
        data.status.check_new_status(ConstraintStatus::Posted)?;
        data.status = ConstraintStatus::Posted;

        for &propagator in &data.propagators {
            self.engine.post(propagator);
        }

        self.statistics.num_posted_constraints += 1;
        debug!("Posted {constraint} '{}'", data.name);

        if self.get_checkpoint() == 0 {
            self.propagate_to_fixed_point()
                .map_err(|_| ConstraintOperationError::InfeasibleConstraint)?;
        }

        Ok(())
    }

    /// Posts the constraint for the current branch only: its propagators are activated in the next
    /// call to [`State::propagate_to_fixed_point`], and once [`State::restore_to`] goes back past
    /// the current checkpoint the constraint is free again and its propagators stay new.
    ///
    /// Nothing is undone past the root, so at the root this is the same as [`State::post`].
    pub fn post_temporary(
        &mut self,
        constraint: ConstraintId,
    ) -> Result<(), ConstraintOperationError> {
        if self.get_checkpoint() == 0 {
            return self.post(constraint);
        }

        let data = &mut self.constraints[constraint];
        data.status.check_new_status(ConstraintStatus::Posted)?;
        data.status = ConstraintStatus::Posted;

        for &propagator in &data.propagators {
            self.engine.post_temporary(propagator);
        }
        self.constraints.record_temporary_post(constraint);

        self.statistics.num_posted_constraints += 1;
        debug!(
            "Posted {constraint} '{}' until backtracking past checkpoint {}",
            self.constraints[constraint].name,
            self.get_checkpoint()
        );

        Ok(())
    }

    /// Returns the negation of the constraint, creating it on first use.
    ///
    /// The negation of a single propagator which offers a [`Propagator::negation`] is that
    /// negation. Any other constraint is negated by a propagator which only fails once the
    /// constraint is entailed, without filtering of its own.
    pub fn get_opposite(&mut self, constraint: ConstraintId) -> ConstraintId {
        if let Some(opposite) = self.constraints[constraint].opposite {
            return opposite;
        }

        let name = format!("not({})", self.constraints[constraint].name);
        let propagators = &self.constraints[constraint].propagators;

        let negation = match propagators.as_slice() {
            [propagator] => self.engine.propagators[*propagator].negation(),
            _ => None,
        };

        let constructor: Box<dyn DynPropagatorConstructor> = match negation {
            Some(negation) => negation,
            None => Box::new(OppositeArgs {
                probes: self.probes(propagators),
                scope: self.union_of_scopes(propagators),
            }),
        };

        let propagator = self.create_propagator(constructor);
        let opposite = self.constraints.add(name, vec![propagator]);

        self.constraints[constraint].opposite = Some(opposite);
        self.constraints[opposite].opposite = Some(constraint);

        debug!("Created {opposite} as the opposite of {constraint}");

        opposite
    }

    /// Links the 0-1 variable `reification` to the constraint: the constraint holds exactly
    /// when `reification` is 1.
    ///
    /// At the root a fixed `reification` posts the constraint or its opposite directly. A
    /// constraint is reified at most once; reifying it again with another variable links the
    /// two variables instead.
    pub fn reify_with(
        &mut self,
        constraint: ConstraintId,
        reification: DomainId,
    ) -> Result<(), ConstraintOperationError> {
        if self.assignments.get_lower_bound(reification) < 0
            || self.assignments.get_upper_bound(reification) > 1
        {
            return Err(ConstraintOperationError::NonBooleanReification);
        }

        let opposite = self.get_opposite(constraint);

        if let Some((existing, polarity)) = self.constraints[constraint].reification {
            return self.link_reifications(reification, existing, polarity);
        }

        self.constraints[constraint]
            .status
            .check_new_status(ConstraintStatus::Reified)?;
        self.constraints[opposite]
            .status
            .check_new_status(ConstraintStatus::Reified)?;

        self.constraints[constraint].reification = Some((reification, true));
        self.constraints[opposite].reification = Some((reification, false));

        if self.get_checkpoint() == 0 {
            match self.fixed_value(reification) {
                Some(1) => return self.post(constraint),
                Some(_) => return self.post(opposite),
                None => {}
            }
        }

        self.constraints[constraint].status = ConstraintStatus::Reified;
        self.constraints[opposite].status = ConstraintStatus::Reified;

        let if_true = self.constraints[constraint].propagators.clone();
        let if_false = self.constraints[opposite].propagators.clone();

        for &propagator in if_true.iter().chain(&if_false) {
            self.engine.set_reified_silent(propagator);
        }

        let args = ReificationArgs {
            reification,
            scope: self.union_of_scopes(if_true.iter().chain(&if_false)),
            if_true: ReifiedSide {
                probes: self.probes(&if_true),
                propagators: if_true,
            },
            if_false: ReifiedSide {
                probes: self.probes(&if_false),
                propagators: if_false,
            },
        };

        let name = format!("{reification} <-> {}", self.constraints[constraint].name);
        let propagator = self.create_propagator(Box::new(args));
        let reification_constraint = self.constraints.add(name, vec![propagator]);
        self.constraints[constraint].reified_by = Some(reification_constraint);
        self.constraints[opposite].reified_by = Some(reification_constraint);

        self.statistics.num_reified_constraints += 1;
        debug!("Reified {constraint} with {reification} through {reification_constraint}");

        self.post(reification_constraint)
    }

    /// Returns a 0-1 variable which is 1 exactly when the constraint holds, creating it if
    /// needed.
    pub fn reify(
        &mut self,
        constraint: ConstraintId,
    ) -> Result<DomainId, ConstraintOperationError> {
        if let Some((reification, true)) = self.constraints[constraint].reification {
            return Ok(reification);
        }

        let name = format!("REIF_{}", self.num_reification_variables);
        self.num_reification_variables += 1;

        let reification = self.new_boolean_variable(Some(name.into()));
        self.reify_with(constraint, reification)?;

        Ok(reification)
    }

    /// Makes `reification` equal to `existing` when the constraint holds on `existing = 1`,
    /// and its negation otherwise.
    fn link_reifications(
        &mut self,
        reification: DomainId,
        existing: DomainId,
        polarity: bool,
    ) -> Result<(), ConstraintOperationError> {
        if reification == existing {
            return Ok(());
        }

        warn!("Reifying with {reification} a constraint already reified with {existing}");

        let constraint = if polarity {
            let mut builder = self.new_constraint(format!("{reification} = {existing}"));
            let _ = builder.add_propagator(BinaryEqualsArgs {
                x: reification,
                y: existing,
            });
            builder.finish()?
        } else {
            let mut builder = self.new_constraint(format!("{reification} != {existing}"));
            let _ = builder.add_propagator(BinaryNotEqualsArgs {
                x: reification,
                y: existing,
            });
            builder.finish()?
        };

        self.post(constraint)
    }

    /// Copies of the propagators, used to decide entailment on behalf of other propagators.
    fn probes<'a>(
        &self,
        propagators: impl IntoIterator<Item = &'a PropagatorId>,
    ) -> Vec<Box<dyn Propagator>> {
        propagators
            .into_iter()
            .map(|&propagator| dyn_clone::clone_box(&self.engine.propagators[propagator]))
            .collect()
    }

    fn union_of_scopes<'a>(
        &self,
        propagators: impl IntoIterator<Item = &'a PropagatorId>,
    ) -> Vec<DomainId> {
        propagators
            .into_iter()
            .flat_map(|&propagator| self.engine.propagators.info(propagator).scope.iter().copied())
            .unique()
            .collect()
    }
}
