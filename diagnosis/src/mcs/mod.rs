//! Extraction of Minimal Correction Sets.
//!
//! [`grow_mcs`] only needs plain satisfiability queries and returns a set that is minimal with
//! respect to inclusion. [`reified_mcs`] and [`direct_mcs`] rely on a single optimization query and
//! return a correction set of minimum cardinality.

mod direct;
mod grow;
mod reified;

pub use direct::direct_mcs;
pub use grow::grow_mcs;
pub use reified::reified_mcs;

use crate::error::{DiagnosisError, InvalidInput};
use crate::oracle::{Oracle, OracleError};
use crate::params::VERIFY_RESULTS;
use crate::problem::{Diagnosis, Problem};
use crate::verify;

/// Common epilogue of all MCS algorithms: an empty correction set means that there was nothing to diagnose.
fn finish<'a, O: Oracle>(
    oracle: &mut O,
    problem: Problem<'a, O::Constraint>,
    rejected: Vec<usize>,
) -> Result<Diagnosis<'a, O::Constraint>, DiagnosisError> {
    if rejected.is_empty() {
        return Err(InvalidInput::Satisfiable.into());
    }
    tracing::debug!(size = rejected.len(), "MCS found");

    let mcs = Diagnosis::new(problem.soft, rejected);
    if VERIFY_RESULTS.get() && !verify::check_mcs(oracle, problem, &mcs)? {
        return Err(OracleError::Inconsistent(format!("{:?} is not a MCS", mcs.positions())).into());
    }
    Ok(mcs)
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::testing::ConflictOracle;
    use crate::verify::tests::random_instance;

    /// Size of the smallest correction set, by exhaustive search.
    fn minimum_mcs_size(oracle: &mut ConflictOracle, constraints: &[u32]) -> usize {
        let n = constraints.len();
        (0..=n)
            .find(|&size| {
                (0..n).combinations(size).any(|removed| {
                    let kept = (0..n).filter(|i| !removed.contains(i)).map(|i| constraints[i]).collect_vec();
                    oracle.solve(&kept).unwrap().is_sat()
                })
            })
            .unwrap()
    }

    #[test]
    fn test_optimization_variants_agree_on_minimum_cardinality() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..200 {
            let (mut oracle, constraints) = random_instance(&mut rng);
            let pb = Problem::new(&constraints);
            let expected = minimum_mcs_size(&mut oracle, &constraints);

            let grown = grow_mcs(&mut oracle, pb);
            let reified = reified_mcs(&mut oracle, pb);
            let direct = direct_mcs(&mut oracle, pb);
            if expected == 0 {
                for res in [grown, reified, direct] {
                    assert_eq!(res, Err(DiagnosisError::InvalidInput(InvalidInput::Satisfiable)));
                }
                continue;
            }
            let (grown, reified, direct) = (grown.unwrap(), reified.unwrap(), direct.unwrap());
            for mcs in [&grown, &reified, &direct] {
                assert!(verify::check_mcs(&mut oracle, pb, mcs).unwrap());
            }
            assert!(grown.len() >= expected);
            assert_eq!(reified.len(), expected);
            assert_eq!(direct.len(), expected);
            assert_eq!(oracle.live_indicators(), 0);
        }
    }
}
