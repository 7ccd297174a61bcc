use lsqp_linear::{JacobianFactor, LinearEquality, LinearInequality};
use lsqp_types::{Key, LsqpError, Result, VectorValues};
use std::collections::{BTreeMap, BTreeSet};

/// Quadratic program over linear factors:
/// minimize sum_i 0.5 * ||A_i x - b_i||^2
/// subject to equalities `A x = b` and inequalities `a x <= b`
#[derive(Debug, Clone, Default)]
pub struct Qp {
    cost: Vec<JacobianFactor>,
    equalities: Vec<LinearEquality>,
    inequalities: Vec<LinearInequality>,
}

impl Qp {
    pub fn new(
        cost: Vec<JacobianFactor>,
        equalities: Vec<LinearEquality>,
        inequalities: Vec<LinearInequality>,
    ) -> Self {
        Qp {
            cost,
            equalities,
            inequalities,
        }
    }

    pub fn push_cost(&mut self, factor: JacobianFactor) {
        self.cost.push(factor);
    }

    pub fn push_equality(&mut self, constraint: LinearEquality) {
        self.equalities.push(constraint);
    }

    pub fn push_inequality(&mut self, constraint: LinearInequality) {
        self.inequalities.push(constraint);
    }

    pub fn cost(&self) -> &[JacobianFactor] {
        &self.cost
    }

    pub fn equalities(&self) -> &[LinearEquality] {
        &self.equalities
    }

    pub fn inequalities(&self) -> &[LinearInequality] {
        &self.inequalities
    }

    /// Keys appearing in any equality or inequality constraint
    pub fn constrained_keys(&self) -> BTreeSet<Key> {
        self.equalities
            .iter()
            .flat_map(|c| c.keys())
            .chain(self.inequalities.iter().flat_map(|c| c.keys()))
            .collect()
    }

    /// Check dimensions and key usage across all factors
    pub fn validate(&self) -> Result<()> {
        if self.cost.iter().any(|f| f.is_constrained()) {
            return Err(LsqpError::InvalidProblem(
                "cost factors must not be hard constraints".to_string(),
            ));
        }

        let mut dims: BTreeMap<Key, usize> = BTreeMap::new();
        let mut record = |key: Key, dim: usize| -> Result<()> {
            match dims.insert(key, dim) {
                Some(previous) if previous != dim => Err(LsqpError::DimensionMismatch(format!(
                    "key {} used with dimensions {} and {}",
                    key, previous, dim
                ))),
                _ => Ok(()),
            }
        };

        for factor in &self.cost {
            for (key, a) in factor.terms() {
                record(*key, a.ncols())?;
            }
        }
        for constraint in &self.equalities {
            for (key, a) in constraint.factor().terms() {
                record(*key, a.ncols())?;
            }
        }
        for constraint in &self.inequalities {
            for (key, a) in constraint.terms() {
                record(*key, a.len())?;
            }
        }

        let mut dual_keys = BTreeSet::new();
        let all_duals = self
            .equalities
            .iter()
            .map(|c| c.dual_key())
            .chain(self.inequalities.iter().map(|c| c.dual_key()));
        for dual in all_duals {
            if !dual_keys.insert(dual) {
                return Err(LsqpError::InvalidProblem(format!(
                    "dual key {} is used by more than one constraint",
                    dual
                )));
            }
            if dims.contains_key(&dual) {
                return Err(LsqpError::InvalidProblem(format!(
                    "dual key {} collides with a primal variable",
                    dual
                )));
            }
        }

        Ok(())
    }

    /// Objective value `sum 0.5 * ||A x - b||^2`
    pub fn objective(&self, values: &VectorValues) -> Result<f64> {
        self.cost.iter().map(|f| f.error(values)).sum()
    }

    /// `a x - b` for every inequality, in order
    pub fn inequality_residuals(&self, values: &VectorValues) -> Result<Vec<f64>> {
        self.inequalities.iter().map(|c| c.residual(values)).collect()
    }

    /// All equalities within `tol` and no inequality violated by more than `tol`
    pub fn is_feasible(&self, values: &VectorValues, tol: f64) -> Result<bool> {
        for constraint in &self.equalities {
            if constraint.residual(values)?.amax() > tol {
                return Ok(false);
            }
        }
        for residual in self.inequality_residuals(values)? {
            if residual > tol {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
