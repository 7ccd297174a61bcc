use lsqp_linear::{GaussianFactorGraph, JacobianFactor};
use lsqp_types::{Key, Result, VectorValues};
use nalgebra::{DMatrix, DVector};

use crate::{QpSolver, WorkingSet};

impl QpSolver {
    /// Dual graph at `values`: one factor per constrained key `k`,
    ///
    /// `sum_j A_{j,k}^T lambda_j = -grad_k f(values)`
    ///
    /// over the equalities and active inequalities touching `k`. Its least-squares
    /// solution holds the multipliers of the KKT condition
    /// `grad f + sum_j A_j^T lambda_j = 0`.
    pub fn build_dual_graph(
        &self,
        working_set: &WorkingSet,
        values: &VectorValues,
    ) -> Result<GaussianFactorGraph> {
        let mut graph = GaussianFactorGraph::new();
        for key in &self.constrained_keys {
            if let Some(factor) = self.create_dual_factor(*key, working_set, values)? {
                graph.push(factor);
            }
        }
        Ok(graph)
    }

    /// `None` when no equality or active inequality touches the key
    fn create_dual_factor(
        &self,
        key: Key,
        working_set: &WorkingSet,
        values: &VectorValues,
    ) -> Result<Option<JacobianFactor>> {
        let mut terms: Vec<(Key, DMatrix<f64>)> = Vec::new();

        for &index in self.equality_index.factors(key) {
            let constraint = &self.qp.equalities()[index];
            if let Some(a_t) = constraint.dual_jacobian(key) {
                terms.push((constraint.dual_key(), a_t));
            }
        }
        for &index in self.inequality_index.factors(key) {
            if !working_set.is_active(index) {
                continue;
            }
            let constraint = &self.qp.inequalities()[index];
            if let Some(a_t) = constraint.dual_jacobian(key) {
                terms.push((constraint.dual_key(), a_t));
            }
        }

        if terms.is_empty() {
            return Ok(None);
        }

        let mut gradient = DVector::zeros(values.at(key)?.len());
        for &index in self.cost_index.factors(key) {
            gradient += self.qp.cost()[index].gradient(key, values)?;
        }

        Ok(Some(JacobianFactor::new(terms, -gradient)?))
    }

    /// Active inequality whose multiplier most violates `lambda >= 0`
    ///
    /// Multipliers at or above zero are consistent with optimality and never
    /// leave; on equal violations the first inequality wins.
    pub fn identify_leaving_constraint(
        &self,
        working_set: &WorkingSet,
        duals: &VectorValues,
    ) -> Result<Option<usize>> {
        let mut leaving = None;
        let mut max_violation = 0.0;

        for index in working_set.active_indices() {
            let Some(constraint) = self.qp.inequalities().get(index) else {
                continue;
            };
            let lambda = duals.at(constraint.dual_key())?[0];
            let violation = -lambda;
            if violation > max_violation {
                max_violation = violation;
                leaving = Some(index);
            }
        }

        Ok(leaving)
    }
}
