use itertools::Itertools;
use tracing::Level;

use crate::error::{DiagnosisError, InvalidInput};
use crate::oracle::{MaxOutcome, OptimizingOracle, OracleError, SoftTerm};
use crate::problem::{Diagnosis, Problem};

/// Finds a MCS of minimum cardinality with a single optimization query.
///
/// Each soft constraint `c` is associated to a fresh indicator `b` and only the half-reification
/// `b => c` is enforced. Maximizing the number of true indicators yields an assignment where
/// an indicator is false only if its constraint cannot hold together with the others.
/// The constraints with a false indicator form the correction set.
pub fn reified_mcs<'a, O: OptimizingOracle>(
    oracle: &mut O,
    problem: Problem<'a, O::Constraint>,
) -> Result<Diagnosis<'a, O::Constraint>, DiagnosisError> {
    let _span = tracing::span!(Level::DEBUG, "MCS-reified").entered();
    problem.check_non_empty()?;

    let indicators = problem.soft.iter().map(|_| oracle.new_indicator()).collect_vec();
    let links = indicators
        .iter()
        .zip(problem.soft)
        .map(|(b, c)| oracle.implication(b, c))
        .collect_vec();
    let hard = problem.hard.iter().cloned().chain(links).collect_vec();
    let soft = indicators.iter().cloned().map(SoftTerm::Indicator).collect_vec();

    let result = oracle.solve_maximizing(&hard, &soft);
    oracle.release_indicators(&indicators);

    let satisfied = match result? {
        MaxOutcome::Unsatisfiable => return Err(InvalidInput::HardUnsatisfiable.into()),
        MaxOutcome::Optimal { satisfied, .. } => satisfied,
    };
    if satisfied.len() != soft.len() {
        return Err(OracleError::Inconsistent(format!(
            "{} values for {} indicators",
            satisfied.len(),
            soft.len()
        ))
        .into());
    }
    tracing::trace!(satisfied = satisfied.iter().filter(|&&b| b).count());

    let rejected = satisfied.iter().positions(|&b| !b).collect();
    super::finish(oracle, problem, rejected)
}
