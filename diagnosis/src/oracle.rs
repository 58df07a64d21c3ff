//! Contract between the diagnosis algorithms and the satisfiability solver they query.

use thiserror::Error;

/// Reason for which an oracle could not provide a definite answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("solver interrupted")]
    Interrupted,
    #[error("solver timed out")]
    Timeout,
    #[error("resource limit reached: {0}")]
    ResourceLimit(String),
    #[error("solver failure: {0}")]
    Failure(String),
    /// The oracle gave answers that contradict each other.
    #[error("inconsistent oracle answers: {0}")]
    Inconsistent(String),
}

/// Result of a satisfiability query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<A> {
    Unsatisfiable,
    Satisfiable(A),
}

impl<A> Outcome<A> {
    pub fn is_sat(&self) -> bool {
        matches!(self, Outcome::Satisfiable(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, Outcome::Unsatisfiable)
    }

    pub fn assignment(&self) -> Option<&A> {
        match self {
            Outcome::Satisfiable(a) => Some(a),
            Outcome::Unsatisfiable => None,
        }
    }
}

/// A black-box satisfiability solver.
///
/// Constraints are opaque tokens for the diagnosis algorithms: they are cloned into candidate
/// sets and given back to the oracle, never inspected.
pub trait Oracle {
    type Constraint: Clone;
    type Assignment;

    /// Decides whether the conjunction of `constraints` is satisfiable.
    ///
    /// Any failure to reach a definite answer (timeout, interruption, internal error)
    /// must be reported as an error and never as [`Outcome::Unsatisfiable`].
    fn solve(&mut self, constraints: &[Self::Constraint]) -> Result<Outcome<Self::Assignment>, OracleError>;
}

impl<O: Oracle + ?Sized> Oracle for &mut O {
    type Constraint = O::Constraint;
    type Assignment = O::Assignment;

    fn solve(&mut self, constraints: &[Self::Constraint]) -> Result<Outcome<Self::Assignment>, OracleError> {
        (**self).solve(constraints)
    }
}

/// A term whose truth value is rewarded by [`OptimizingOracle::solve_maximizing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftTerm<I, C> {
    Indicator(I),
    Constraint(C),
}

/// Result of a maximization query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaxOutcome<A> {
    /// The hard constraints alone have no solution.
    Unsatisfiable,
    /// An assignment maximizing the number of true soft terms.
    /// `satisfied[k]` is the truth value of the k-th soft term under `assignment`.
    Optimal { satisfied: Vec<bool>, assignment: A },
}

/// An oracle that is additionally able to maximize the number of satisfied soft terms.
pub trait OptimizingOracle: Oracle {
    /// A fresh boolean decision variable.
    type Indicator: Clone;

    fn new_indicator(&mut self) -> Self::Indicator;

    /// Builds the half-reification `indicator => constraint`.
    fn implication(&mut self, indicator: &Self::Indicator, constraint: &Self::Constraint) -> Self::Constraint;

    /// Notifies the oracle that the indicators will not be used anymore.
    fn release_indicators(&mut self, _indicators: &[Self::Indicator]) {}

    /// Whether arbitrary constraints (and not only indicators) may be used as [`SoftTerm`]s.
    fn supports_soft_constraints(&self) -> bool {
        false
    }

    /// Finds an assignment that satisfies all `hard` constraints and
    /// maximizes the number of `soft` terms that evaluate to true.
    fn solve_maximizing(
        &mut self,
        hard: &[Self::Constraint],
        soft: &[SoftTerm<Self::Indicator, Self::Constraint>],
    ) -> Result<MaxOutcome<Self::Assignment>, OracleError>;
}

impl<O: OptimizingOracle + ?Sized> OptimizingOracle for &mut O {
    type Indicator = O::Indicator;

    fn new_indicator(&mut self) -> Self::Indicator {
        (**self).new_indicator()
    }

    fn implication(&mut self, indicator: &Self::Indicator, constraint: &Self::Constraint) -> Self::Constraint {
        (**self).implication(indicator, constraint)
    }

    fn release_indicators(&mut self, indicators: &[Self::Indicator]) {
        (**self).release_indicators(indicators)
    }

    fn supports_soft_constraints(&self) -> bool {
        (**self).supports_soft_constraints()
    }

    fn solve_maximizing(
        &mut self,
        hard: &[Self::Constraint],
        soft: &[SoftTerm<Self::Indicator, Self::Constraint>],
    ) -> Result<MaxOutcome<Self::Assignment>, OracleError> {
        (**self).solve_maximizing(hard, soft)
    }
}
