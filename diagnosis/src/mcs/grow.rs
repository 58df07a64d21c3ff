use tracing::Level;

use crate::error::{DiagnosisError, InvalidInput};
use crate::oracle::Oracle;
use crate::problem::{Diagnosis, Problem};

/// Finds a MCS by growing a satisfiable subset of the soft constraints, in order.
///
/// Each constraint is tentatively added to the subset: it is kept if the subset remains
/// satisfiable and rejected otherwise. The rejected constraints form the correction set.
/// The result is minimal with respect to inclusion but not necessarily of minimum cardinality,
/// and depends on the order of the soft constraints.
///
/// Requires exactly `|soft|` oracle calls, plus one to check the hard constraints if there are any.
pub fn grow_mcs<'a, O: Oracle>(
    oracle: &mut O,
    problem: Problem<'a, O::Constraint>,
) -> Result<Diagnosis<'a, O::Constraint>, DiagnosisError> {
    let _span = tracing::span!(Level::DEBUG, "MCS-grow").entered();
    problem.check_non_empty()?;

    if !problem.hard.is_empty() && oracle.solve(problem.hard)?.is_unsat() {
        return Err(InvalidInput::HardUnsatisfiable.into());
    }

    let mut kept: Vec<usize> = Vec::with_capacity(problem.soft.len());
    let mut rejected: Vec<usize> = Vec::new();
    for i in 0..problem.soft.len() {
        kept.push(i);
        let outcome = oracle.solve(&problem.query(kept.iter().copied()))?;
        tracing::trace!(position = i, kept = kept.len(), sat = outcome.is_sat());
        if outcome.is_unsat() {
            kept.pop();
            rejected.push(i);
        }
    }

    super::finish(oracle, problem, rejected)
}
