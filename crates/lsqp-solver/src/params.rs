use lsqp_types::{LsqpError, Result};
use serde::{Deserialize, Serialize};

/// Parameters for the active-set solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    /// Emit per-iteration debug events
    pub trace: bool,
    /// Two primal assignments closer than this are the same point
    pub equality_tolerance: f64,
    /// Cold-start residuals within this of zero start active
    pub activation_tolerance: f64,
    /// Optional cap; exceeding it fails with `ConvergenceFailed`
    pub max_iterations: Option<usize>,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            trace: false,
            equality_tolerance: 1e-7,
            activation_tolerance: 1e-7,
            max_iterations: None,
        }
    }
}

impl SolverParams {
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("equality_tolerance", self.equality_tolerance),
            ("activation_tolerance", self.activation_tolerance),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(LsqpError::ConfigError(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if self.max_iterations == Some(0) {
            return Err(LsqpError::ConfigError(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
