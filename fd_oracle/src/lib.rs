//! A reference oracle for the `diagnosis` crate, over finite-domain integer and boolean variables.
//!
//! The oracle decides satisfiability by exhaustive enumeration and is only meant for small models,
//! such as the ones used in tests and demonstrations of the diagnosis algorithms.
//!
//! ```
//! use diagnosis::{grow_mcs, shrink_mus, Problem};
//! use diagnosis_fd::expr::{eq, neq};
//! use diagnosis_fd::{FdOracle, Model};
//!
//! let mut model = Model::new();
//! let x = model.new_ivar(0, 5, "x");
//! let constraints = [neq(x, 3), eq(x, 3)];
//!
//! let mut oracle = FdOracle::new(model);
//! let mus = shrink_mus(&mut oracle, Problem::new(&constraints)).unwrap();
//! assert_eq!(mus.len(), 2);
//! let mcs = grow_mcs(&mut oracle, Problem::new(&constraints)).unwrap();
//! assert_eq!(mcs.to_vec(), vec![eq(x, 3)]);
//! ```

mod eval;
pub mod expr;
mod model;
mod oracle;
mod search;

pub use eval::{Assignment, EvalError};
pub use expr::{Constraint, IExpr};
pub use model::{BVar, IVar, IntCst, LongCst, Model, VarRef};
pub use oracle::{FdOracle, MAX_ASSIGNMENTS};
