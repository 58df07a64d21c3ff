use itertools::Itertools;
use tracing::Level;

use crate::error::{Capability, DiagnosisError, InvalidInput};
use crate::oracle::{MaxOutcome, OptimizingOracle, OracleError, SoftTerm};
use crate::problem::{Diagnosis, Problem};

/// Finds a MCS of minimum cardinality by asking the oracle to maximize the number of satisfied
/// soft constraints directly, without introducing indicators.
///
/// Fails with [`DiagnosisError::UnsupportedCapability`] if the oracle cannot handle constraints as
/// soft terms, in which case [`reified_mcs`](super::reified_mcs) should be used instead.
pub fn direct_mcs<'a, O: OptimizingOracle>(
    oracle: &mut O,
    problem: Problem<'a, O::Constraint>,
) -> Result<Diagnosis<'a, O::Constraint>, DiagnosisError> {
    let _span = tracing::span!(Level::DEBUG, "MCS-direct").entered();
    problem.check_non_empty()?;
    if !oracle.supports_soft_constraints() {
        return Err(DiagnosisError::UnsupportedCapability(Capability::SoftConstraints));
    }

    let soft = problem.soft.iter().cloned().map(SoftTerm::Constraint).collect_vec();
    let satisfied = match oracle.solve_maximizing(problem.hard, &soft)? {
        MaxOutcome::Unsatisfiable => return Err(InvalidInput::HardUnsatisfiable.into()),
        MaxOutcome::Optimal { satisfied, .. } => satisfied,
    };
    if satisfied.len() != soft.len() {
        return Err(OracleError::Inconsistent(format!(
            "{} values for {} soft constraints",
            satisfied.len(),
            soft.len()
        ))
        .into());
    }
    tracing::trace!(satisfied = satisfied.iter().filter(|&&b| b).count());

    let rejected = satisfied.iter().positions(|&b| !b).collect();
    super::finish(oracle, problem, rejected)
}
