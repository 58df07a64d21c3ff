//! Diagnosis of infeasible constraint systems.
//!
//! Given an ordered sequence of constraints that admits no solution, the algorithms of this crate
//! explain *why*, either with a Minimal Unsatisfiable Subset (MUS) or with a Minimal Correction
//! Set (MCS).
//!
//!  - [`shrink_mus`]: deletion-based MUS extraction.
//!  - [`grow_mcs`]: greedy growth of a satisfiable subset, the rejected constraints forming the MCS.
//!  - [`reified_mcs`]: minimum-cardinality MCS, each constraint being half-reified behind an indicator
//!    and the number of true indicators being maximized in a single optimization call.
//!  - [`direct_mcs`]: same as above but relying on the oracle's native support for soft constraints.
//!
//! None of the algorithms know anything about the constraints themselves: they are tokens that are
//! handed over to an [`Oracle`], the only thing able to tell whether a set of constraints is
//! satisfiable.
//!
//! ```
//! use diagnosis::testing::ConflictOracle;
//! use diagnosis::{grow_mcs, shrink_mus, Problem};
//!
//! // constraints 0 and 2 cannot hold together
//! let mut oracle = ConflictOracle::new([vec![0, 2]]);
//! let constraints = [0, 1, 2];
//!
//! let mus = shrink_mus(&mut oracle, Problem::new(&constraints)).unwrap();
//! assert_eq!(mus.positions(), &[0, 2]);
//!
//! let mcs = grow_mcs(&mut oracle, Problem::new(&constraints)).unwrap();
//! assert_eq!(mcs.to_vec(), vec![2]);
//! ```

mod counting;
mod error;
pub mod faulty;
pub mod mcs;
pub mod mus;
pub mod oracle;
pub mod params;
mod problem;
pub mod testing;
pub mod verify;

pub use counting::{CallCounts, CountingOracle};
pub use error::{Capability, DiagnosisError, InvalidInput};
pub use faulty::{isolate_faulty, FaultyConstraint};
pub use mcs::{direct_mcs, grow_mcs, reified_mcs};
pub use mus::shrink_mus;
pub use oracle::{MaxOutcome, OptimizingOracle, Oracle, OracleError, Outcome, SoftTerm};
pub use problem::{Diagnosis, Problem};
