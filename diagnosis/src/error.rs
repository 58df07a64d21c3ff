use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::oracle::OracleError;

/// Reason for which a diagnosis could not be computed.
///
/// No partial result is ever attached: a partially shrunk core or a partially grown subset
/// carries no minimality guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosisError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("diagnosis unavailable: {0}")]
    OracleUnavailable(#[from] OracleError),
    #[error("the oracle does not support {0}")]
    UnsupportedCapability(Capability),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("no constraint to diagnose")]
    Empty,
    #[error("the constraints are satisfiable")]
    Satisfiable,
    #[error("the hard constraints are unsatisfiable on their own")]
    HardUnsatisfiable,
}

/// Optional capabilities of an oracle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Capability {
    /// Maximizing the number of satisfied constraints without reifying them.
    SoftConstraints,
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::SoftConstraints => write!(f, "soft constraints"),
        }
    }
}
