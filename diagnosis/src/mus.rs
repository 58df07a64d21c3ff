//! Deletion-based extraction of a Minimal Unsatisfiable Subset.

use tracing::Level;

use crate::error::{DiagnosisError, InvalidInput};
use crate::oracle::{Oracle, OracleError};
use crate::params::VERIFY_RESULTS;
use crate::problem::{Diagnosis, Problem};
use crate::verify;

/// Finds a MUS of the soft constraints by deleting them one at a time, until deleting any more
/// makes the remaining set satisfiable.
///
/// The problem must be unsatisfiable: this is checked with a first oracle call and reported as
/// [`InvalidInput::Satisfiable`] otherwise. The result depends on the order of the soft constraints
/// (earlier constraints are tried for deletion first) and requires at most `|soft| + 1` oracle calls.
pub fn shrink_mus<'a, O: Oracle>(
    oracle: &mut O,
    problem: Problem<'a, O::Constraint>,
) -> Result<Diagnosis<'a, O::Constraint>, DiagnosisError> {
    let _span = tracing::span!(Level::DEBUG, "MUS").entered();
    problem.check_non_empty()?;

    let all = 0..problem.soft.len();
    if oracle.solve(&problem.query(all.clone()))?.is_sat() {
        return Err(InvalidInput::Satisfiable.into());
    }

    let mut core: Vec<usize> = all.collect();
    let mut i = 0;
    while i < core.len() {
        let candidate = core.iter().copied().filter(|&j| j != core[i]).collect::<Vec<_>>();
        let outcome = oracle.solve(&problem.query(candidate.iter().copied()))?;
        tracing::trace!(position = core[i], size = core.len(), sat = outcome.is_sat());
        if outcome.is_sat() {
            // necessary for unsatisfiability
            i += 1;
        } else {
            // the next constraint shifted to position `i`
            core = candidate;
        }
    }

    if core.is_empty() {
        return Err(InvalidInput::HardUnsatisfiable.into());
    }
    tracing::debug!(size = core.len(), "MUS found");

    let mus = Diagnosis::new(problem.soft, core);
    if VERIFY_RESULTS.get() && !verify::check_mus(oracle, problem, &mus)? {
        return Err(OracleError::Inconsistent(format!("{:?} is not a MUS", mus.positions())).into());
    }
    Ok(mus)
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::testing::ConflictOracle;
    use crate::verify::tests::random_instance;
    use crate::CountingOracle;

    #[test]
    fn test_two_element_core() {
        let mut oracle = ConflictOracle::new([vec![0, 1]]);
        let constraints = [0, 1];
        let mus = shrink_mus(&mut oracle, Problem::new(&constraints)).unwrap();
        assert_eq!(mus.positions(), &[0, 1]);
    }

    #[test]
    fn test_order_dependence() {
        // two disjoint cores, the deletion of earlier constraints is attempted first
        let mut oracle = ConflictOracle::new([vec![0, 1], vec![2, 3]]);
        let constraints = [0, 1, 2, 3];
        let mus = shrink_mus(&mut oracle, Problem::new(&constraints)).unwrap();
        assert_eq!(mus.to_vec(), vec![2, 3]);

        let reversed = [3, 2, 1, 0];
        let mus = shrink_mus(&mut oracle, Problem::new(&reversed)).unwrap();
        assert_eq!(mus.to_vec(), vec![1, 0]);
    }

    #[test]
    fn test_hard_constraints_are_never_part_of_the_mus() {
        let mut oracle = ConflictOracle::new([vec![0, 1, 10]]);
        let constraints = [0, 1, 2];
        let hard = [10];
        let mus = shrink_mus(&mut oracle, Problem::new(&constraints).with_hard(&hard)).unwrap();
        assert_eq!(mus.to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut oracle = CountingOracle::new(ConflictOracle::new([vec![0, 1], vec![10]]));
        assert_eq!(
            shrink_mus(&mut oracle, Problem::new(&[0, 2])),
            Err(DiagnosisError::InvalidInput(InvalidInput::Satisfiable))
        );
        // rejected before any shrinking
        assert_eq!(oracle.counts().solve, 1);

        assert_eq!(
            shrink_mus(&mut oracle, Problem::new(&[])),
            Err(DiagnosisError::InvalidInput(InvalidInput::Empty))
        );
        assert_eq!(
            shrink_mus(&mut oracle, Problem::new(&[2, 3]).with_hard(&[10])),
            Err(DiagnosisError::InvalidInput(InvalidInput::HardUnsatisfiable))
        );
    }

    #[test]
    fn test_oracle_failure_is_propagated() {
        let constraints = [0, 1, 2, 3];
        for failing_call in 0..4 {
            let mut oracle = ConflictOracle::new([vec![1, 3]]).failing_at(failing_call);
            assert_eq!(
                shrink_mus(&mut oracle, Problem::new(&constraints)),
                Err(DiagnosisError::OracleUnavailable(OracleError::Timeout))
            );
        }
    }

    #[test]
    fn test_random_muses_are_irreducible() {
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..200 {
            let (mut oracle, constraints) = random_instance(&mut rng);
            let mut counting = CountingOracle::new(&mut oracle);
            let mus = match shrink_mus(&mut counting, Problem::new(&constraints)) {
                Ok(mus) => mus,
                Err(DiagnosisError::InvalidInput(InvalidInput::Satisfiable)) => continue,
                Err(e) => panic!("{e}"),
            };
            assert!(counting.counts().solve <= constraints.len() + 1);
            assert!(verify::check_mus(&mut oracle, Problem::new(&constraints), &mus).unwrap());

            // same input, same oracle, same result
            let again = shrink_mus(&mut oracle, Problem::new(&constraints)).unwrap();
            assert_eq!(mus, again);
        }
    }
}
