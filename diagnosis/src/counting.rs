use crate::oracle::{MaxOutcome, OptimizingOracle, Oracle, OracleError, Outcome, SoftTerm};

/// Number of queries made to an oracle.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CallCounts {
    pub solve: usize,
    pub maximize: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.solve + self.maximize
    }
}

/// Wraps an oracle and counts the queries going through it.
pub struct CountingOracle<O> {
    inner: O,
    counts: CallCounts,
}

impl<O> CountingOracle<O> {
    pub fn new(inner: O) -> Self {
        CountingOracle {
            inner,
            counts: CallCounts::default(),
        }
    }

    pub fn counts(&self) -> CallCounts {
        self.counts
    }

    pub fn reset(&mut self) {
        self.counts = CallCounts::default();
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: Oracle> Oracle for CountingOracle<O> {
    type Constraint = O::Constraint;
    type Assignment = O::Assignment;

    fn solve(&mut self, constraints: &[Self::Constraint]) -> Result<Outcome<Self::Assignment>, OracleError> {
        self.counts.solve += 1;
        self.inner.solve(constraints)
    }
}

impl<O: OptimizingOracle> OptimizingOracle for CountingOracle<O> {
    type Indicator = O::Indicator;

    fn new_indicator(&mut self) -> Self::Indicator {
        self.inner.new_indicator()
    }

    fn implication(&mut self, indicator: &Self::Indicator, constraint: &Self::Constraint) -> Self::Constraint {
        self.inner.implication(indicator, constraint)
    }

    fn release_indicators(&mut self, indicators: &[Self::Indicator]) {
        self.inner.release_indicators(indicators)
    }

    fn supports_soft_constraints(&self) -> bool {
        self.inner.supports_soft_constraints()
    }

    fn solve_maximizing(
        &mut self,
        hard: &[Self::Constraint],
        soft: &[SoftTerm<Self::Indicator, Self::Constraint>],
    ) -> Result<MaxOutcome<Self::Assignment>, OracleError> {
        self.counts.maximize += 1;
        self.inner.solve_maximizing(hard, soft)
    }
}
