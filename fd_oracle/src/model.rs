use std::fmt::{Display, Formatter};

use crate::expr::{write_constraint, Constraint};

/// Type representing an integer constant.
pub type IntCst = i32;

/// Type used to evaluate arithmetic terms, wide enough to avoid overflows on products of `IntCst`.
pub type LongCst = i64;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct VarRef(u32);

impl VarRef {
    pub(crate) fn from_index(index: usize) -> Self {
        VarRef(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An integer variable.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct IVar(VarRef);

/// A boolean variable, represented as an integer variable in `[0, 1]`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct BVar(VarRef);

impl IVar {
    pub fn var(self) -> VarRef {
        self.0
    }
}

impl BVar {
    pub fn var(self) -> VarRef {
        self.0
    }
}

impl From<IVar> for VarRef {
    fn from(v: IVar) -> Self {
        v.0
    }
}

impl From<BVar> for VarRef {
    fn from(v: BVar) -> Self {
        v.0
    }
}

/// Decision variables with a finite domain.
#[derive(Clone, Default, Debug)]
pub struct Model {
    domains: Vec<(IntCst, IntCst)>,
    labels: Vec<String>,
}

impl Model {
    pub fn new() -> Self {
        Model::default()
    }

    fn new_var(&mut self, lb: IntCst, ub: IntCst, label: String) -> VarRef {
        assert!(lb <= ub, "empty domain [{lb}, {ub}] for {label}");
        let var = VarRef::from_index(self.domains.len());
        self.domains.push((lb, ub));
        self.labels.push(label);
        var
    }

    /// Creates a new integer variable with domain `[lb, ub]`.
    pub fn new_ivar(&mut self, lb: IntCst, ub: IntCst, label: impl Into<String>) -> IVar {
        IVar(self.new_var(lb, ub, label.into()))
    }

    pub fn new_bvar(&mut self, label: impl Into<String>) -> BVar {
        BVar(self.new_var(0, 1, label.into()))
    }

    pub fn domain(&self, var: impl Into<VarRef>) -> (IntCst, IntCst) {
        self.domains[var.into().index()]
    }

    pub fn label(&self, var: impl Into<VarRef>) -> &str {
        &self.labels[var.into().index()]
    }

    pub fn num_vars(&self) -> usize {
        self.domains.len()
    }

    /// Removes all variables created after the first `num_vars` ones.
    pub(crate) fn truncate(&mut self, num_vars: usize) {
        self.domains.truncate(num_vars);
        self.labels.truncate(num_vars);
    }

    /// Displays a constraint with the labels of its variables.
    pub fn display<'a>(&'a self, constraint: &'a Constraint) -> impl Display + 'a {
        Labelled {
            model: self,
            constraint,
        }
    }
}

struct Labelled<'a> {
    model: &'a Model,
    constraint: &'a Constraint,
}

impl Display for Labelled<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_constraint(self.constraint, f, &|v, f| write!(f, "{}", self.model.label(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::neq;

    #[test]
    fn test_variables() {
        let mut m = Model::new();
        let x = m.new_ivar(-2, 5, "x");
        let b = m.new_bvar("b");
        assert_eq!(m.num_vars(), 2);
        assert_eq!(m.domain(x), (-2, 5));
        assert_eq!(m.domain(b), (0, 1));
        assert_eq!(m.label(b), "b");
        assert_eq!(m.display(&neq(x, 3)).to_string(), "x != 3");

        m.truncate(1);
        assert_eq!(m.num_vars(), 1);
    }

    #[test]
    #[should_panic]
    fn test_empty_domain() {
        let mut m = Model::new();
        let _ = m.new_ivar(3, 2, "x");
    }
}
