//! Diagnoses re-checked against the oracle, as enabled by `DIAGNOSIS_VERIFY`.
//!
//! The parameter is global to the process, all tests of this file run with verification enabled.

use std::collections::VecDeque;
use std::sync::Once;

use diagnosis::params::VERIFY_RESULTS;
use diagnosis::testing::ConflictOracle;
use diagnosis::{
    direct_mcs, grow_mcs, reified_mcs, shrink_mus, DiagnosisError, MaxOutcome, OptimizingOracle, Oracle,
    OracleError, Outcome, Problem, SoftTerm,
};

fn enable_verification() {
    static ENABLE: Once = Once::new();
    ENABLE.call_once(|| VERIFY_RESULTS.set(true));
}

/// An oracle replaying predefined answers, regardless of the constraints it is given.
struct Scripted {
    /// Answers of the next satisfiability queries, `true` for satisfiable.
    answers: VecDeque<bool>,
    /// Answer once the script is exhausted.
    otherwise: bool,
    /// Returned by every maximization.
    satisfied: Vec<bool>,
    num_indicators: u32,
}

impl Scripted {
    fn new(answers: impl IntoIterator<Item = bool>, otherwise: bool) -> Self {
        Scripted {
            answers: answers.into_iter().collect(),
            otherwise,
            satisfied: Vec::new(),
            num_indicators: 0,
        }
    }

    fn maximizing_to(satisfied: Vec<bool>) -> Self {
        Scripted {
            satisfied,
            ..Scripted::new([], false)
        }
    }
}

impl Oracle for Scripted {
    type Constraint = u32;
    type Assignment = ();

    fn solve(&mut self, _: &[u32]) -> Result<Outcome<()>, OracleError> {
        if self.answers.pop_front().unwrap_or(self.otherwise) {
            Ok(Outcome::Satisfiable(()))
        } else {
            Ok(Outcome::Unsatisfiable)
        }
    }
}

impl OptimizingOracle for Scripted {
    type Indicator = u32;

    fn new_indicator(&mut self) -> u32 {
        self.num_indicators += 1;
        self.num_indicators
    }

    fn implication(&mut self, _: &u32, constraint: &u32) -> u32 {
        *constraint
    }

    fn release_indicators(&mut self, _: &[u32]) {}

    fn supports_soft_constraints(&self) -> bool {
        true
    }

    fn solve_maximizing(&mut self, _: &[u32], _: &[SoftTerm<u32, u32>]) -> Result<MaxOutcome<()>, OracleError> {
        Ok(MaxOutcome::Optimal {
            satisfied: self.satisfied.clone(),
            assignment: (),
        })
    }
}

fn inconsistent(msg: &str) -> Result<Vec<usize>, DiagnosisError> {
    Err(DiagnosisError::OracleUnavailable(OracleError::Inconsistent(msg.to_string())))
}

#[test]
fn test_consistent_oracle_passes_verification() {
    enable_verification();
    let mut oracle = ConflictOracle::new([vec![0, 2], vec![1, 2]]);
    let pb = Problem::new(&[0, 1, 2]);
    assert_eq!(shrink_mus(&mut oracle, pb).unwrap().positions(), &[1, 2]);
    assert_eq!(grow_mcs(&mut oracle, pb).unwrap().positions(), &[2]);
    assert_eq!(reified_mcs(&mut oracle, pb).unwrap().positions(), &[2]);
    assert_eq!(direct_mcs(&mut oracle, pb).unwrap().positions(), &[2]);
}

#[test]
fn test_mus_of_changing_oracle() {
    enable_verification();
    // [0, 1] and [1] are unsatisfiable, [] and then everything else are satisfiable
    let mut oracle = Scripted::new([false, false], true);
    let res = shrink_mus(&mut oracle, Problem::new(&[0, 1])).map(|mus| mus.positions().to_vec());
    assert_eq!(res, inconsistent("[1] is not a MUS"));
}

#[test]
fn test_grown_mcs_of_changing_oracle() {
    enable_verification();
    // [0] is satisfiable, [0, 1] and then everything else are unsatisfiable
    let mut oracle = Scripted::new([true, false], false);
    let res = grow_mcs(&mut oracle, Problem::new(&[0, 1])).map(|mcs| mcs.positions().to_vec());
    assert_eq!(res, inconsistent("[1] is not a MCS"));
}

#[test]
fn test_optimal_mcs_contradicted_by_satisfiability_queries() {
    enable_verification();
    let pb = Problem::new(&[0, 1]);
    let mut oracle = Scripted::maximizing_to(vec![true, false]);
    let res = reified_mcs(&mut oracle, pb).map(|mcs| mcs.positions().to_vec());
    assert_eq!(res, inconsistent("[1] is not a MCS"));

    let mut oracle = Scripted::maximizing_to(vec![true, false]);
    let res = direct_mcs(&mut oracle, pb).map(|mcs| mcs.positions().to_vec());
    assert_eq!(res, inconsistent("[1] is not a MCS"));
}

#[test]
fn test_optimization_with_missing_values() {
    enable_verification();
    let pb = Problem::new(&[0, 1]);
    let mut oracle = Scripted::maximizing_to(vec![false]);
    let res = reified_mcs(&mut oracle, pb).map(|mcs| mcs.positions().to_vec());
    assert_eq!(res, inconsistent("1 values for 2 indicators"));

    let res = direct_mcs(&mut oracle, pb).map(|mcs| mcs.positions().to_vec());
    assert_eq!(res, inconsistent("1 values for 2 soft constraints"));
}
