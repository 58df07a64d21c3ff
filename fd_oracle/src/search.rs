use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};

use diagnosis::OracleError;

use crate::eval::Assignment;
use crate::model::{Model, VarRef};

/// Exhaustive enumeration of the assignments of some variables of a model.
pub(crate) struct Enumeration<'a> {
    pub model: &'a Model,
    /// Maximum number of assignments that may be visited.
    pub budget: u64,
    pub interrupt: Option<&'a AtomicBool>,
}

impl Enumeration<'_> {
    /// Visits all assignments of the variables of `scope` in lexicographic order (the first variable of the
    /// scope being the most significant), until `visit` breaks.
    /// Variables outside of the scope keep their lower bound.
    ///
    /// Returns the number of visited assignments.
    /// Fails if the scope refers to a variable of another model.
    pub fn run(
        &self,
        scope: &[VarRef],
        mut visit: impl FnMut(&Assignment) -> Result<ControlFlow<()>, OracleError>,
    ) -> Result<u64, OracleError> {
        if let Some(var) = scope.iter().find(|v| v.index() >= self.model.num_vars()) {
            return Err(OracleError::Failure(format!(
                "variable {} is not part of the model ({} variables)",
                var.index(),
                self.model.num_vars()
            )));
        }
        let mut assignment = Assignment::lower_bounds(self.model);
        let mut visited: u64 = 0;
        loop {
            if self.interrupt.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                return Err(OracleError::Interrupted);
            }
            if visited >= self.budget {
                return Err(OracleError::ResourceLimit(format!(
                    "more than {} assignments to enumerate",
                    self.budget
                )));
            }
            visited += 1;
            if visit(&assignment)?.is_break() {
                return Ok(visited);
            }
            if !self.advance(scope, &mut assignment) {
                return Ok(visited);
            }
        }
    }

    /// Moves to the next assignment, returning false if all have been visited.
    fn advance(&self, scope: &[VarRef], assignment: &mut Assignment) -> bool {
        for &var in scope.iter().rev() {
            let (lb, ub) = self.model.domain(var);
            let value = assignment.value(var);
            if value < ub {
                assignment.set(var, value + 1);
                return true;
            }
            assignment.set(var, lb);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicographic_enumeration() {
        let mut m = Model::new();
        let x = m.new_ivar(0, 1, "x");
        let y = m.new_ivar(3, 5, "y");
        let z = m.new_ivar(7, 9, "z");
        let enumeration = Enumeration {
            model: &m,
            budget: 100,
            interrupt: None,
        };
        let mut seen = Vec::new();
        let visited = enumeration
            .run(&[x.var(), y.var()], |a| {
                seen.push((a.value(x), a.value(y), a.value(z)));
                Ok(ControlFlow::Continue(()))
            })
            .unwrap();
        assert_eq!(visited, 6);
        assert_eq!(
            seen,
            vec![(0, 3, 7), (0, 4, 7), (0, 5, 7), (1, 3, 7), (1, 4, 7), (1, 5, 7)]
        );
    }

    #[test]
    fn test_budget_and_interrupt() {
        let mut m = Model::new();
        let x = m.new_ivar(0, 9, "x");
        let mut enumeration = Enumeration {
            model: &m,
            budget: 10,
            interrupt: None,
        };
        let continue_ = |_: &Assignment| Ok(ControlFlow::Continue(()));
        assert_eq!(enumeration.run(&[x.var()], continue_), Ok(10));

        enumeration.budget = 9;
        assert!(matches!(
            enumeration.run(&[x.var()], continue_),
            Err(OracleError::ResourceLimit(_))
        ));

        let flag = AtomicBool::new(true);
        enumeration.interrupt = Some(&flag);
        assert_eq!(enumeration.run(&[], continue_), Err(OracleError::Interrupted));
    }

    #[test]
    fn test_variable_outside_the_model() {
        let m = Model::new();
        let enumeration = Enumeration {
            model: &m,
            budget: 10,
            interrupt: None,
        };
        let res = enumeration.run(&[VarRef::from_index(0)], |_| Ok(ControlFlow::Continue(())));
        assert_eq!(
            res,
            Err(OracleError::Failure("variable 0 is not part of the model (0 variables)".to_string()))
        );
    }
}
