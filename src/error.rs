use std::fmt::{Display, Formatter};

/// Errors raised by ring construction and by partial ring operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlgebraError {
    /// A ring, term order or relation was configured with invalid parameters.
    InvalidConfiguration(String),
    /// Two operands live in rings of different rank.
    RankMismatch { expected: usize, found: usize },
    /// An inverse was requested for an element that is not a unit.
    NotInvertible(String),
    /// An exact division left a nonzero remainder.
    Inexact(String),
}

impl AlgebraError {
    pub fn invalid_configuration(msg: impl Into<String>) -> AlgebraError {
        AlgebraError::InvalidConfiguration(msg.into())
    }

    pub fn not_invertible(msg: impl Into<String>) -> AlgebraError {
        AlgebraError::NotInvertible(msg.into())
    }

    /// Returns `true` iff the error signals a non-unit, which some callers
    /// treat as an expected outcome.
    pub fn is_not_invertible(&self) -> bool {
        matches!(self, AlgebraError::NotInvertible(_))
    }
}

impl Display for AlgebraError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            AlgebraError::InvalidConfiguration(s) => write!(f, "Invalid configuration: {}", s),
            AlgebraError::RankMismatch { expected, found } => {
                write!(f, "Rank mismatch: expected {}, found {}", expected, found)
            }
            AlgebraError::NotInvertible(s) => write!(f, "Not invertible: {}", s),
            AlgebraError::Inexact(s) => write!(f, "Inexact division: {}", s),
        }
    }
}

impl std::error::Error for AlgebraError {}
