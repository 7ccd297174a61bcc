use thiserror::Error;

use crate::Key;

#[derive(Debug, Error)]
pub enum LsqpError {
    #[error("Infeasible initial values: inequality {factor} has residual {residual}")]
    InfeasibleInitialValues { factor: usize, residual: f64 },

    #[error("Indeterminant linear system: {0}")]
    IndeterminantLinearSystem(String),

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Key not found: {0}")]
    MissingKey(Key),

    #[error("Invalid factor: {0}")]
    InvalidFactor(String),

    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Convergence failed after {0} iterations")]
    ConvergenceFailed(usize),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, LsqpError>;
