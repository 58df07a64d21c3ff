use thiserror::Error;

use crate::expr::{BExpr, BinOp, Constraint, IExpr};
use crate::model::{BVar, IntCst, LongCst, Model, VarRef};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("arithmetic overflow")]
    Overflow,
}

/// A value for every variable of a model.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Assignment {
    values: Vec<IntCst>,
}

impl Assignment {
    /// Assigns every variable to the lower bound of its domain.
    pub(crate) fn lower_bounds(model: &Model) -> Self {
        let values = (0..model.num_vars())
            .map(|i| model.domain(VarRef::from_index(i)).0)
            .collect();
        Assignment { values }
    }

    pub(crate) fn set(&mut self, var: VarRef, value: IntCst) {
        self.values[var.index()] = value;
    }

    pub fn value(&self, var: impl Into<VarRef>) -> IntCst {
        self.values[var.into().index()]
    }

    pub fn bool_value(&self, var: BVar) -> bool {
        self.value(var) != 0
    }

    pub fn eval_int(&self, e: &IExpr) -> Result<LongCst, EvalError> {
        match e {
            IExpr::Cst(c) => Ok(*c as LongCst),
            IExpr::Var(v) => Ok(self.value(*v) as LongCst),
            IExpr::Neg(e) => self.eval_int(e)?.checked_neg().ok_or(EvalError::Overflow),
            IExpr::Bin(op, l, r) => {
                let l = self.eval_int(l)?;
                let r = self.eval_int(r)?;
                let res = match op {
                    BinOp::Add => l.checked_add(r),
                    BinOp::Sub => l.checked_sub(r),
                    BinOp::Mul => l.checked_mul(r),
                    BinOp::Div | BinOp::Rem if r == 0 => return Err(EvalError::DivisionByZero),
                    BinOp::Div => l.checked_div(r),
                    BinOp::Rem => l.checked_rem(r),
                };
                res.ok_or(EvalError::Overflow)
            }
        }
    }

    /// Truth value of the constraint under this assignment.
    /// Conjunctions, disjunctions and implications are evaluated from left to right and stop as soon as the
    /// result is known, so an error in an operand that is not needed is not reported.
    pub fn eval(&self, c: &Constraint) -> Result<bool, EvalError> {
        match c.expr() {
            BExpr::Lit(b) => Ok(self.bool_value(*b)),
            BExpr::Cmp(op, l, r) => Ok(op.holds(self.eval_int(l)?, self.eval_int(r)?)),
            BExpr::And(cs) => {
                for c in cs {
                    if !self.eval(c)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            BExpr::Or(cs) => {
                for c in cs {
                    if self.eval(c)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            BExpr::Not(c) => Ok(!self.eval(c)?),
            BExpr::Implies(a, b) => Ok(!self.eval(a)? || self.eval(b)?),
            BExpr::AllDifferent(es) => {
                let mut values = es.iter().map(|e| self.eval_int(e)).collect::<Result<Vec<_>, _>>()?;
                let n = values.len();
                values.sort_unstable();
                values.dedup();
                Ok(values.len() == n)
            }
        }
    }

    /// Returns true if the constraint is evaluated to true, without error.
    pub fn entails(&self, c: &Constraint) -> bool {
        self.eval(c) == Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::*;

    #[test]
    fn test_eval() {
        let mut m = Model::new();
        let x = m.new_ivar(-2, 5, "x");
        let y = m.new_ivar(0, 3, "y");
        let a = m.new_bvar("a");
        let mut assignment = Assignment::lower_bounds(&m);
        assert_eq!(assignment.value(x), -2);

        assignment.set(x.var(), 3);
        assignment.set(y.var(), 2);
        assignment.set(a.var(), 1);
        assert!(assignment.entails(&eq(x + y, 5)));
        assert!(assignment.entails(&eq(-x % y, -1)));
        assert!(assignment.entails(&eq(x / y, 1)));
        assert!(assignment.entails(&implies(a, gt(x, y))));
        assert!(!assignment.entails(&implies(a, all_different([IExpr::from(x), y.into(), 3.into()]))));
        assert!(assignment.entails(&or([not(a), lt(y, x)])));

        assignment.set(x.var(), 0);
        assert_eq!(assignment.eval(&gt(5 % x, 2)), Err(EvalError::DivisionByZero));
        // short-circuit
        assert_eq!(assignment.eval(&and([not(a), gt(5 % x, 2)])), Ok(false));
    }
}
