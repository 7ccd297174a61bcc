use lsqp_linear::LinearInequality;
use lsqp_types::{Result, VectorValues};

use crate::WorkingSet;

/// Outcome of the ratio test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSize {
    /// Step length in `(0, 1]` for a feasible `x` (may be 0 at a degenerate vertex)
    pub alpha: f64,
    /// Inactive inequality that bounds the step, if the full step is infeasible
    pub blocking: Option<usize>,
}

/// Largest `alpha <= 1` such that `x + alpha * p` keeps every inactive
/// inequality satisfied.
///
/// For an inactive `a x <= b` with `a.p > 0` the bound is
/// `(b - a.x) / (a.p)`; constraints with `a.p <= 0` cannot become violated
/// along `p`. The first constraint reaching the minimum wins.
pub fn compute_step_size(
    inequalities: &[LinearInequality],
    working_set: &WorkingSet,
    x: &VectorValues,
    p: &VectorValues,
) -> Result<StepSize> {
    let mut min_alpha = 1.0;
    let mut blocking = None;

    for (index, constraint) in inequalities.iter().enumerate() {
        if working_set.is_active(index) {
            continue;
        }

        let a_t_p = constraint.dot_row(p)?;
        if a_t_p <= 0.0 {
            continue;
        }

        let a_t_x = constraint.dot_row(x)?;
        let alpha = (constraint.b() - a_t_x) / a_t_p;
        if alpha < min_alpha {
            min_alpha = alpha;
            blocking = Some(index);
        }
    }

    Ok(StepSize {
        alpha: min_alpha,
        blocking,
    })
}
