//! Localization of constraints that the oracle cannot handle.

use tracing::Level;

use crate::error::{DiagnosisError, InvalidInput};
use crate::oracle::{Oracle, OracleError};

/// A constraint on which the oracle failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultyConstraint {
    /// Position of the constraint in the input sequence.
    pub position: usize,
    pub error: OracleError,
}

/// Solves each constraint in isolation, in order, and returns the first one for which the oracle
/// reports an error. Returns `None` if the oracle gives a definite answer for every constraint.
///
/// Unlike the diagnosis algorithms, oracle errors are the object of the search here and are not
/// propagated.
pub fn isolate_faulty<O: Oracle>(
    oracle: &mut O,
    constraints: &[O::Constraint],
) -> Result<Option<FaultyConstraint>, DiagnosisError> {
    let _span = tracing::span!(Level::DEBUG, "isolate-faulty").entered();
    if constraints.is_empty() {
        return Err(InvalidInput::Empty.into());
    }
    for (position, constraint) in constraints.iter().enumerate() {
        match oracle.solve(std::slice::from_ref(constraint)) {
            Ok(outcome) => tracing::trace!(position, sat = outcome.is_sat()),
            Err(error) => {
                tracing::debug!(position, %error, "faulty constraint");
                return Ok(Some(FaultyConstraint { position, error }));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ConflictOracle;

    #[test]
    fn test_first_failing_constraint() {
        let mut oracle = ConflictOracle::new([vec![1]]).failing_at(2);
        let res = isolate_faulty(&mut oracle, &[0, 1, 2, 3]).unwrap();
        assert_eq!(
            res,
            Some(FaultyConstraint {
                position: 2,
                error: OracleError::Timeout
            })
        );
    }

    #[test]
    fn test_no_failure() {
        // an unsatisfiable constraint is not faulty
        let mut oracle = ConflictOracle::new([vec![1]]);
        assert_eq!(isolate_faulty(&mut oracle, &[0, 1, 2]).unwrap(), None);
        assert_eq!(
            isolate_faulty(&mut oracle, &[]),
            Err(DiagnosisError::InvalidInput(InvalidInput::Empty))
        );
    }
}
