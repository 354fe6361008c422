use std::error::Error;
use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// A joint vector or initial guess does not have one entry per link.
    DimensionMismatch { expected: usize, actual: usize },
    EmptyChain,
    MalformedTable(String),
    InvalidMagnitude(f64),
}

impl Error for KinematicsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            KinematicsError::DimensionMismatch { expected, actual } => write!(
                f,
                "Dimension mismatch: chain has {} joints, got {} values",
                expected, actual
            ),
            KinematicsError::EmptyChain => write!(f, "Kinematic chain needs at least one link"),
            KinematicsError::MalformedTable(ref msg) => write!(f, "Malformed DH table: {}", msg),
            KinematicsError::InvalidMagnitude(m) => {
                write!(f, "Impairment magnitude must be finite and non-negative, got {}", m)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, KinematicsError>;
