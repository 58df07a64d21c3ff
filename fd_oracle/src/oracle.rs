use std::ops::ControlFlow;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use diagnosis::params::Param;
use diagnosis::{MaxOutcome, OptimizingOracle, Oracle, OracleError, Outcome, SoftTerm};
use itertools::Itertools;

use crate::eval::{Assignment, EvalError};
use crate::expr::{implies, scope, BExpr, Constraint};
use crate::model::{BVar, Model};
use crate::search::Enumeration;

/// Default number of assignments an oracle call may enumerate before giving up.
pub static MAX_ASSIGNMENTS: Param<u64> = Param::new("FD_ORACLE_MAX_ASSIGNMENTS", "10000000");

/// An oracle deciding constraints over a finite-domain [`Model`] by enumerating all assignments of their variables.
///
/// Assignments are visited in lexicographic order of the variables, smallest values first,
/// which makes all answers deterministic.
pub struct FdOracle {
    model: Model,
    max_assignments: u64,
    interrupt: Option<Arc<AtomicBool>>,
    soft_constraints: bool,
    /// Indicators created and not released yet.
    indicators: Vec<BVar>,
}

impl FdOracle {
    pub fn new(model: Model) -> Self {
        FdOracle {
            model,
            max_assignments: MAX_ASSIGNMENTS.get(),
            interrupt: None,
            soft_constraints: true,
            indicators: Vec::new(),
        }
    }

    pub fn with_max_assignments(mut self, max_assignments: u64) -> Self {
        self.max_assignments = max_assignments;
        self
    }

    /// Any ongoing or future call fails with [`OracleError::Interrupted`] once the flag is raised.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Refuses to maximize arbitrary constraints, only indicators are accepted as soft terms.
    pub fn without_soft_constraints(mut self) -> Self {
        self.soft_constraints = false;
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    fn enumeration(&self) -> Enumeration<'_> {
        Enumeration {
            model: &self.model,
            budget: self.max_assignments,
            interrupt: self.interrupt.as_deref(),
        }
    }

    /// Failures in an implication built for an indicator are reported on its target constraint.
    fn failure(&self, err: EvalError, c: &Constraint) -> OracleError {
        let culprit = match c.expr() {
            BExpr::Implies(premise, target) => match premise.expr() {
                BExpr::Lit(b) if self.indicators.contains(b) => target,
                _ => c,
            },
            _ => c,
        };
        OracleError::Failure(format!("{err} in `{}`", self.model.display(culprit)))
    }

    fn eval(&self, assignment: &Assignment, c: &Constraint) -> Result<bool, OracleError> {
        assignment.eval(c).map_err(|e| self.failure(e, c))
    }
}

impl Oracle for FdOracle {
    type Constraint = Constraint;
    type Assignment = Assignment;

    fn solve(&mut self, constraints: &[Constraint]) -> Result<Outcome<Assignment>, OracleError> {
        let mut solution = None;
        let visited = self.enumeration().run(&scope(constraints), |assignment| {
            for c in constraints {
                if !self.eval(assignment, c)? {
                    return Ok(ControlFlow::Continue(()));
                }
            }
            solution = Some(assignment.clone());
            Ok(ControlFlow::Break(()))
        })?;
        tracing::trace!(constraints = constraints.len(), visited, sat = solution.is_some());
        Ok(solution.map_or(Outcome::Unsatisfiable, Outcome::Satisfiable))
    }
}

impl OptimizingOracle for FdOracle {
    type Indicator = BVar;

    fn new_indicator(&mut self) -> BVar {
        let indicator = self.model.new_bvar(format!("_ind{}", self.model.num_vars()));
        self.indicators.push(indicator);
        indicator
    }

    fn implication(&mut self, indicator: &BVar, constraint: &Constraint) -> Constraint {
        implies(*indicator, constraint.clone())
    }

    /// Indicators are removed from the model if they are its last variables.
    fn release_indicators(&mut self, indicators: &[BVar]) {
        self.indicators.retain(|b| !indicators.contains(b));
        let Some(first) = indicators.iter().map(|b| b.var().index()).min() else {
            return;
        };
        if first + indicators.len() == self.model.num_vars() && indicators.iter().map(|b| b.var()).all_unique() {
            self.model.truncate(first);
        }
    }

    fn supports_soft_constraints(&self) -> bool {
        self.soft_constraints
    }

    fn solve_maximizing(
        &mut self,
        hard: &[Constraint],
        soft: &[SoftTerm<BVar, Constraint>],
    ) -> Result<MaxOutcome<Assignment>, OracleError> {
        let soft_constraints = soft
            .iter()
            .filter_map(|term| match term {
                SoftTerm::Constraint(c) => Some(c.clone()),
                SoftTerm::Indicator(_) => None,
            })
            .collect_vec();
        if !self.soft_constraints && !soft_constraints.is_empty() {
            return Err(OracleError::Failure("soft constraints are disabled".to_string()));
        }
        let indicators = soft.iter().filter_map(|term| match term {
            SoftTerm::Indicator(b) => Some(Constraint::from(*b)),
            SoftTerm::Constraint(_) => None,
        });
        let vars = scope(hard.iter().chain(&soft_constraints).chain(&indicators.collect_vec()));

        let mut best: Option<(usize, Vec<bool>, Assignment)> = None;
        let visited = self.enumeration().run(&vars, |assignment| {
            for c in hard {
                if !self.eval(assignment, c)? {
                    return Ok(ControlFlow::Continue(()));
                }
            }
            let satisfied = soft
                .iter()
                .map(|term| match term {
                    SoftTerm::Indicator(b) => Ok(assignment.bool_value(*b)),
                    SoftTerm::Constraint(c) => self.eval(assignment, c),
                })
                .collect::<Result<Vec<bool>, _>>()?;
            let count = satisfied.iter().filter(|&&s| s).count();
            if best.as_ref().is_none_or(|(best_count, _, _)| count > *best_count) {
                best = Some((count, satisfied, assignment.clone()));
            }
            if count == soft.len() {
                // cannot be improved
                Ok(ControlFlow::Break(()))
            } else {
                Ok(ControlFlow::Continue(()))
            }
        })?;
        tracing::trace!(visited, best = best.as_ref().map(|(count, _, _)| *count));

        Ok(match best {
            Some((_, satisfied, assignment)) => MaxOutcome::Optimal { satisfied, assignment },
            None => MaxOutcome::Unsatisfiable,
        })
    }
}
