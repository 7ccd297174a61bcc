use lsqp_types::VectorValues;

use crate::WorkingSet;

/// One point in the active-set iteration
#[derive(Debug, Clone)]
pub struct QpState {
    pub values: VectorValues,
    pub duals: VectorValues,
    pub working_set: WorkingSet,
    pub converged: bool,
    pub iterations: usize,
}

impl QpState {
    /// Starting state, before any iteration
    pub fn new(values: VectorValues, duals: VectorValues, working_set: WorkingSet) -> Self {
        QpState {
            values,
            duals,
            working_set,
            converged: false,
            iterations: 0,
        }
    }
}

/// Result of a full solve
#[derive(Debug, Clone)]
pub struct QpSolution {
    /// Primal optimum
    pub values: VectorValues,
    /// Multipliers of the equalities and the active inequalities
    pub duals: VectorValues,
    pub working_set: WorkingSet,
    pub iterations: usize,
    pub objective: f64,
}
