//! Checks that a diagnosis has the properties it claims, by querying the oracle again.
//!
//! Each check costs one oracle call per element of the diagnosis, plus one.

use itertools::Itertools;

use crate::oracle::{Oracle, OracleError};
use crate::problem::{Diagnosis, Problem};

/// Returns true if `mus` is unsatisfiable (together with the hard constraints) and if removing any
/// of its elements makes it satisfiable.
pub fn check_mus<O: Oracle>(
    oracle: &mut O,
    problem: Problem<O::Constraint>,
    mus: &Diagnosis<O::Constraint>,
) -> Result<bool, OracleError> {
    if oracle.solve(&problem.query(mus.positions().iter().copied()))?.is_sat() {
        return Ok(false);
    }
    for &removed in mus.positions() {
        let rest = mus.positions().iter().copied().filter(|&i| i != removed);
        if oracle.solve(&problem.query(rest))?.is_unsat() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Returns true if removing `mcs` from the soft constraints restores satisfiability,
/// and if putting back any single element of `mcs` breaks it again.
pub fn check_mcs<O: Oracle>(
    oracle: &mut O,
    problem: Problem<O::Constraint>,
    mcs: &Diagnosis<O::Constraint>,
) -> Result<bool, OracleError> {
    let kept = mcs.complement();
    if oracle.solve(&problem.query(kept.iter().copied()))?.is_unsat() {
        return Ok(false);
    }
    for &restored in mcs.positions() {
        let with_restored = kept.iter().copied().merge([restored]);
        if oracle.solve(&problem.query(with_restored))?.is_sat() {
            return Ok(false);
        }
    }
    Ok(true)
}
