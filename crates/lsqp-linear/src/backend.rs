use lsqp_types::{Result, VectorValues};

use crate::GaussianFactorGraph;

/// Trait for linear least-squares backends
pub trait LinearSolver: Send + Sync {
    /// Minimize the sum of `0.5 * ||A x - b||^2` over the soft factors, subject to
    /// the constrained factors holding exactly. Singular or rank-deficient systems
    /// are an `IndeterminantLinearSystem` error.
    fn solve(&self, graph: &GaussianFactorGraph) -> Result<VectorValues>;
}
