//! A toy oracle over constraint identifiers, used in tests and documentation.
//!
//! Each constraint is an independent proposition designated by a `u32`.
//! A set of constraints is unsatisfiable iff it includes one of the declared conflicts.

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::oracle::{MaxOutcome, OptimizingOracle, Oracle, OracleError, Outcome, SoftTerm};

/// Identifiers at or above this value designate implications built by the oracle.
const FIRST_LINK: u32 = 1 << 30;

/// Number of soft terms above which maximization is refused.
const MAX_SOFT_TERMS: usize = 20;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Indicator(u32);

pub struct ConflictOracle {
    conflicts: Vec<BTreeSet<u32>>,
    /// Implications `indicator => target`, indexed by `id - FIRST_LINK`.
    links: Vec<(Indicator, u32)>,
    next_indicator: u32,
    live_indicators: BTreeSet<Indicator>,
    soft_constraints: bool,
    fail_at: Option<usize>,
    num_calls: usize,
}

impl ConflictOracle {
    pub fn new<C: IntoIterator<Item = u32>>(conflicts: impl IntoIterator<Item = C>) -> Self {
        ConflictOracle {
            conflicts: conflicts.into_iter().map(|c| c.into_iter().collect()).collect(),
            links: Vec::new(),
            next_indicator: 0,
            live_indicators: BTreeSet::new(),
            soft_constraints: true,
            fail_at: None,
            num_calls: 0,
        }
    }

    /// Disables the use of arbitrary constraints as soft terms.
    pub fn without_soft_constraints(mut self) -> Self {
        self.soft_constraints = false;
        self
    }

    /// Makes the `n`-th query (starting at 0) fail with a timeout.
    pub fn failing_at(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    /// Indicators created and not released yet.
    pub fn live_indicators(&self) -> usize {
        self.live_indicators.len()
    }

    pub fn is_consistent(&self, atoms: &BTreeSet<u32>) -> bool {
        self.conflicts.iter().all(|conflict| !conflict.is_subset(atoms))
    }

    fn link(&self, id: u32) -> Option<(Indicator, u32)> {
        id.checked_sub(FIRST_LINK).map(|i| self.links[i as usize])
    }

    fn record_call(&mut self) -> Result<(), OracleError> {
        let call = self.num_calls;
        self.num_calls += 1;
        if self.fail_at == Some(call) {
            Err(OracleError::Timeout)
        } else {
            Ok(())
        }
    }

    /// Atoms that must hold when all `constraints` hold and exactly the `true_indicators` are set.
    fn forced_atoms<'a>(
        &self,
        constraints: impl IntoIterator<Item = &'a u32>,
        true_indicators: &BTreeSet<Indicator>,
    ) -> BTreeSet<u32> {
        constraints
            .into_iter()
            .filter_map(|&c| match self.link(c) {
                Some((indicator, target)) => true_indicators.contains(&indicator).then_some(target),
                None => Some(c),
            })
            .collect()
    }
}

impl Oracle for ConflictOracle {
    type Constraint = u32;
    type Assignment = BTreeSet<u32>;

    fn solve(&mut self, constraints: &[u32]) -> Result<Outcome<BTreeSet<u32>>, OracleError> {
        self.record_call()?;
        // all indicators false, which trivially satisfies every implication
        let atoms = self.forced_atoms(constraints, &BTreeSet::new());
        if self.is_consistent(&atoms) {
            Ok(Outcome::Satisfiable(atoms))
        } else {
            Ok(Outcome::Unsatisfiable)
        }
    }
}

impl OptimizingOracle for ConflictOracle {
    type Indicator = Indicator;

    fn new_indicator(&mut self) -> Indicator {
        let indicator = Indicator(self.next_indicator);
        self.next_indicator += 1;
        self.live_indicators.insert(indicator);
        indicator
    }

    fn implication(&mut self, indicator: &Indicator, constraint: &u32) -> u32 {
        assert!(*constraint < FIRST_LINK, "nested implications are not supported");
        self.links.push((*indicator, *constraint));
        FIRST_LINK + (self.links.len() - 1) as u32
    }

    /// Implications over released indicators are forgotten once no live one was created after them.
    fn release_indicators(&mut self, indicators: &[Indicator]) {
        for i in indicators {
            self.live_indicators.remove(i);
        }
        while self.links.last().is_some_and(|(i, _)| !self.live_indicators.contains(i)) {
            self.links.pop();
        }
    }

    fn supports_soft_constraints(&self) -> bool {
        self.soft_constraints
    }

    fn solve_maximizing(
        &mut self,
        hard: &[u32],
        soft: &[SoftTerm<Indicator, u32>],
    ) -> Result<MaxOutcome<BTreeSet<u32>>, OracleError> {
        self.record_call()?;
        if soft.len() > MAX_SOFT_TERMS {
            return Err(OracleError::ResourceLimit(format!("{} soft terms", soft.len())));
        }
        if !self.soft_constraints && soft.iter().any(|t| matches!(t, SoftTerm::Constraint(_))) {
            return Err(OracleError::Failure("soft constraints are not supported".to_string()));
        }
        // largest subsets first, lexicographic order among subsets of the same size
        for size in (0..=soft.len()).rev() {
            for chosen in (0..soft.len()).combinations(size) {
                let true_indicators: BTreeSet<Indicator> = chosen
                    .iter()
                    .filter_map(|&k| match &soft[k] {
                        SoftTerm::Indicator(i) => Some(*i),
                        SoftTerm::Constraint(_) => None,
                    })
                    .collect();
                let true_constraints = chosen.iter().filter_map(|&k| match &soft[k] {
                    SoftTerm::Constraint(c) => Some(c),
                    SoftTerm::Indicator(_) => None,
                });
                let atoms = self.forced_atoms(hard.iter().chain(true_constraints), &true_indicators);
                if !self.is_consistent(&atoms) {
                    continue;
                }
                let satisfied = soft
                    .iter()
                    .map(|term| match term {
                        SoftTerm::Indicator(i) => true_indicators.contains(i),
                        SoftTerm::Constraint(c) => match self.link(*c) {
                            Some((i, target)) => !true_indicators.contains(&i) || atoms.contains(&target),
                            None => atoms.contains(c),
                        },
                    })
                    .collect();
                return Ok(MaxOutcome::Optimal {
                    satisfied,
                    assignment: atoms,
                });
            }
        }
        Ok(MaxOutcome::Unsatisfiable)
    }
}
