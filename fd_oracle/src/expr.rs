//! Arithmetic terms and constraints over the variables of a [`Model`](crate::Model).

use std::collections::BTreeSet;
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};
use std::sync::Arc;

use itertools::Itertools;

use crate::model::{BVar, IVar, IntCst, VarRef};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    /// Integer division, rounding towards zero.
    Div,
    /// Remainder of the division rounding towards zero.
    Rem,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
        }
    }
}

/// An integer term.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum IExpr {
    Cst(IntCst),
    Var(VarRef),
    Neg(Box<IExpr>),
    Bin(BinOp, Box<IExpr>, Box<IExpr>),
}

impl IExpr {
    fn collect_vars(&self, out: &mut BTreeSet<VarRef>) {
        match self {
            IExpr::Cst(_) => {}
            IExpr::Var(v) => {
                out.insert(*v);
            }
            IExpr::Neg(e) => e.collect_vars(out),
            IExpr::Bin(_, l, r) => {
                l.collect_vars(out);
                r.collect_vars(out);
            }
        }
    }
}

impl From<IntCst> for IExpr {
    fn from(value: IntCst) -> Self {
        IExpr::Cst(value)
    }
}

impl From<IVar> for IExpr {
    fn from(v: IVar) -> Self {
        IExpr::Var(v.var())
    }
}

impl From<BVar> for IExpr {
    fn from(v: BVar) -> Self {
        IExpr::Var(v.var())
    }
}

macro_rules! arith_ops {
    ($lhs:ty) => {
        impl<T: Into<IExpr>> Add<T> for $lhs {
            type Output = IExpr;
            fn add(self, rhs: T) -> IExpr {
                IExpr::Bin(BinOp::Add, Box::new(self.into()), Box::new(rhs.into()))
            }
        }
        impl<T: Into<IExpr>> Sub<T> for $lhs {
            type Output = IExpr;
            fn sub(self, rhs: T) -> IExpr {
                IExpr::Bin(BinOp::Sub, Box::new(self.into()), Box::new(rhs.into()))
            }
        }
        impl<T: Into<IExpr>> Mul<T> for $lhs {
            type Output = IExpr;
            fn mul(self, rhs: T) -> IExpr {
                IExpr::Bin(BinOp::Mul, Box::new(self.into()), Box::new(rhs.into()))
            }
        }
        impl<T: Into<IExpr>> Div<T> for $lhs {
            type Output = IExpr;
            fn div(self, rhs: T) -> IExpr {
                IExpr::Bin(BinOp::Div, Box::new(self.into()), Box::new(rhs.into()))
            }
        }
        impl<T: Into<IExpr>> Rem<T> for $lhs {
            type Output = IExpr;
            fn rem(self, rhs: T) -> IExpr {
                IExpr::Bin(BinOp::Rem, Box::new(self.into()), Box::new(rhs.into()))
            }
        }
        impl Neg for $lhs {
            type Output = IExpr;
            fn neg(self) -> IExpr {
                IExpr::Neg(Box::new(self.into()))
            }
        }
    };
}

arith_ops!(IExpr);
arith_ops!(IVar);

macro_rules! cst_lhs_ops {
    ($($op:ident $f:ident $bin:ident),*) => {
        $(
            impl $op<IVar> for IntCst {
                type Output = IExpr;
                fn $f(self, rhs: IVar) -> IExpr {
                    IExpr::Bin(BinOp::$bin, Box::new(self.into()), Box::new(rhs.into()))
                }
            }
            impl $op<IExpr> for IntCst {
                type Output = IExpr;
                fn $f(self, rhs: IExpr) -> IExpr {
                    IExpr::Bin(BinOp::$bin, Box::new(self.into()), Box::new(rhs))
                }
            }
        )*
    };
}

cst_lhs_ops!(Add add Add, Sub sub Sub, Mul mul Mul, Div div Div, Rem rem Rem);

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cmp {
    Eq,
    Neq,
    Lt,
    Leq,
    Gt,
    Geq,
}

impl Cmp {
    pub fn holds<T: Ord>(self, lhs: T, rhs: T) -> bool {
        match self {
            Cmp::Eq => lhs == rhs,
            Cmp::Neq => lhs != rhs,
            Cmp::Lt => lhs < rhs,
            Cmp::Leq => lhs <= rhs,
            Cmp::Gt => lhs > rhs,
            Cmp::Geq => lhs >= rhs,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Cmp::Eq => "==",
            Cmp::Neq => "!=",
            Cmp::Lt => "<",
            Cmp::Leq => "<=",
            Cmp::Gt => ">",
            Cmp::Geq => ">=",
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum BExpr {
    /// The boolean variable is true.
    Lit(BVar),
    Cmp(Cmp, IExpr, IExpr),
    And(Vec<Constraint>),
    Or(Vec<Constraint>),
    Not(Constraint),
    Implies(Constraint, Constraint),
    AllDifferent(Vec<IExpr>),
}

/// A boolean expression over the variables of a model. Cheap to clone.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Constraint(Arc<BExpr>);

impl Constraint {
    pub fn new(expr: BExpr) -> Self {
        Constraint(Arc::new(expr))
    }

    pub fn expr(&self) -> &BExpr {
        &self.0
    }

    /// Variables appearing in the constraint.
    pub fn vars(&self) -> BTreeSet<VarRef> {
        let mut out = BTreeSet::new();
        self.collect_vars(&mut out);
        out
    }

    pub(crate) fn collect_vars(&self, out: &mut BTreeSet<VarRef>) {
        match self.expr() {
            BExpr::Lit(b) => {
                out.insert(b.var());
            }
            BExpr::Cmp(_, l, r) => {
                l.collect_vars(out);
                r.collect_vars(out);
            }
            BExpr::And(cs) | BExpr::Or(cs) => cs.iter().for_each(|c| c.collect_vars(out)),
            BExpr::Not(c) => c.collect_vars(out),
            BExpr::Implies(a, b) => {
                a.collect_vars(out);
                b.collect_vars(out);
            }
            BExpr::AllDifferent(es) => es.iter().for_each(|e| e.collect_vars(out)),
        }
    }
}

impl From<BVar> for Constraint {
    fn from(b: BVar) -> Self {
        Constraint::new(BExpr::Lit(b))
    }
}

fn cmp(op: Cmp, lhs: impl Into<IExpr>, rhs: impl Into<IExpr>) -> Constraint {
    Constraint::new(BExpr::Cmp(op, lhs.into(), rhs.into()))
}

pub fn eq(lhs: impl Into<IExpr>, rhs: impl Into<IExpr>) -> Constraint {
    cmp(Cmp::Eq, lhs, rhs)
}

pub fn neq(lhs: impl Into<IExpr>, rhs: impl Into<IExpr>) -> Constraint {
    cmp(Cmp::Neq, lhs, rhs)
}

pub fn lt(lhs: impl Into<IExpr>, rhs: impl Into<IExpr>) -> Constraint {
    cmp(Cmp::Lt, lhs, rhs)
}

pub fn leq(lhs: impl Into<IExpr>, rhs: impl Into<IExpr>) -> Constraint {
    cmp(Cmp::Leq, lhs, rhs)
}

pub fn gt(lhs: impl Into<IExpr>, rhs: impl Into<IExpr>) -> Constraint {
    cmp(Cmp::Gt, lhs, rhs)
}

pub fn geq(lhs: impl Into<IExpr>, rhs: impl Into<IExpr>) -> Constraint {
    cmp(Cmp::Geq, lhs, rhs)
}

pub fn and(conjuncts: impl IntoIterator<Item = impl Into<Constraint>>) -> Constraint {
    Constraint::new(BExpr::And(conjuncts.into_iter().map(Into::into).collect()))
}

pub fn or(disjuncts: impl IntoIterator<Item = impl Into<Constraint>>) -> Constraint {
    Constraint::new(BExpr::Or(disjuncts.into_iter().map(Into::into).collect()))
}

pub fn not(c: impl Into<Constraint>) -> Constraint {
    Constraint::new(BExpr::Not(c.into()))
}

pub fn implies(a: impl Into<Constraint>, b: impl Into<Constraint>) -> Constraint {
    Constraint::new(BExpr::Implies(a.into(), b.into()))
}

pub fn all_different(terms: impl IntoIterator<Item = impl Into<IExpr>>) -> Constraint {
    Constraint::new(BExpr::AllDifferent(terms.into_iter().map(Into::into).collect()))
}

type VarWriter<'a> = &'a dyn Fn(VarRef, &mut Formatter<'_>) -> std::fmt::Result;

fn write_iexpr(e: &IExpr, f: &mut Formatter<'_>, var: VarWriter) -> std::fmt::Result {
    let write_operand = |e: &IExpr, f: &mut Formatter<'_>| match e {
        IExpr::Bin(..) => {
            write!(f, "(")?;
            write_iexpr(e, f, var)?;
            write!(f, ")")
        }
        _ => write_iexpr(e, f, var),
    };
    match e {
        IExpr::Cst(c) => write!(f, "{c}"),
        IExpr::Var(v) => var(*v, f),
        IExpr::Neg(e) => {
            write!(f, "-")?;
            write_operand(e, f)
        }
        IExpr::Bin(op, l, r) => {
            write_operand(l, f)?;
            write!(f, " {} ", op.symbol())?;
            write_operand(r, f)
        }
    }
}

pub(crate) fn write_constraint(c: &Constraint, f: &mut Formatter<'_>, var: VarWriter) -> std::fmt::Result {
    let write_operand = |c: &Constraint, f: &mut Formatter<'_>| match c.expr() {
        BExpr::And(_) | BExpr::Or(_) | BExpr::Implies(..) => {
            write!(f, "(")?;
            write_constraint(c, f, var)?;
            write!(f, ")")
        }
        _ => write_constraint(c, f, var),
    };
    let write_sequence = |cs: &[Constraint], sep: &str, f: &mut Formatter<'_>| -> std::fmt::Result {
        for (i, c) in cs.iter().enumerate() {
            if i > 0 {
                write!(f, " {sep} ")?;
            }
            write_operand(c, f)?;
        }
        Ok(())
    };
    match c.expr() {
        BExpr::Lit(b) => var(b.var(), f),
        BExpr::Cmp(op, l, r) => {
            write_iexpr(l, f, var)?;
            write!(f, " {} ", op.symbol())?;
            write_iexpr(r, f, var)
        }
        BExpr::And(cs) if cs.is_empty() => write!(f, "true"),
        BExpr::Or(cs) if cs.is_empty() => write!(f, "false"),
        BExpr::And(cs) => write_sequence(cs, "&", f),
        BExpr::Or(cs) => write_sequence(cs, "|", f),
        BExpr::Not(c) => match c.expr() {
            BExpr::Lit(_) => {
                write!(f, "!")?;
                write_constraint(c, f, var)
            }
            _ => {
                write!(f, "!(")?;
                write_constraint(c, f, var)?;
                write!(f, ")")
            }
        },
        BExpr::Implies(a, b) => {
            write_operand(a, f)?;
            write!(f, " -> ")?;
            write_operand(b, f)
        }
        BExpr::AllDifferent(es) => {
            write!(f, "all_different(")?;
            for (i, e) in es.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_iexpr(e, f, var)?;
            }
            write!(f, ")")
        }
    }
}

fn write_var_id(v: VarRef, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "v{}", v.index())
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_constraint(self, f, &write_var_id)
    }
}

impl Debug for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl Display for IExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_iexpr(self, f, &write_var_id)
    }
}

/// Variables appearing in any of the constraints, in increasing order.
pub(crate) fn scope<'a>(constraints: impl IntoIterator<Item = &'a Constraint>) -> Vec<VarRef> {
    let mut vars = BTreeSet::new();
    for c in constraints {
        c.collect_vars(&mut vars);
    }
    vars.into_iter().collect_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Model;

    #[test]
    fn test_display() {
        let mut m = Model::new();
        let x = m.new_ivar(-2, 5, "x");
        let y = m.new_ivar(0, 3, "y");
        let a = m.new_bvar("a");
        let b = m.new_bvar("b");

        assert_eq!(m.display(&gt(5 % x, 2)).to_string(), "5 % x > 2");
        assert_eq!(m.display(&eq(x + y * 2, 3)).to_string(), "x + (y * 2) == 3");
        assert_eq!(m.display(&implies(a, not(b))).to_string(), "a -> !b");
        assert_eq!(
            m.display(&or([and([a, b]), not(eq(x, y))])).to_string(),
            "(a & b) | !(x == y)"
        );
        assert_eq!(m.display(&all_different([x, y])).to_string(), "all_different(x, y)");
        assert_eq!(neq(x, 3).to_string(), "v0 != 3");
    }

    #[test]
    fn test_scope() {
        let mut m = Model::new();
        let x = m.new_ivar(0, 5, "x");
        let _unused = m.new_ivar(0, 5, "unused");
        let a = m.new_bvar("a");
        let cs = [implies(a, eq(x, 1)), neq(x, 3)];
        assert_eq!(scope(&cs), vec![x.var(), a.var()]);
        assert_eq!(cs[0].vars().len(), 2);
    }
}
