//! Error types shared by the addressing, Hamiltonian and eigensolver layers.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CiError {
    /// Mismatched dimensions, incompatible orbital counts or malformed solver parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A combinatorial count does not fit in the address width
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    /// The Davidson iterations were exhausted without meeting the residual threshold
    #[error("The Davidson algorithm did not converge within {iterations} iterations")]
    NotConverged { iterations: usize },

    /// Results were requested before a successful solve
    #[error("Results are not available: {0}")]
    NotSolved(String),
}

pub type Result<T> = std::result::Result<T, CiError>;

pub(crate) fn invalid<T>(message: impl Into<String>) -> Result<T> {
    Err(CiError::InvalidConfiguration(message.into()))
}
