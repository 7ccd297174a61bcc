use lsqp_linear::JacobianFactor;
use lsqp_types::{Key, LsqpError, Result, VectorValues};
use nalgebra::DVector;
use std::sync::Arc;

use crate::MeasurementModel;

/// Measurement with a diagonal Gaussian noise model
#[derive(Clone)]
pub struct NoiseModelFactor {
    model: Arc<dyn MeasurementModel>,
    sigmas: DVector<f64>,
}

impl NoiseModelFactor {
    /// One standard deviation per residual row
    pub fn new(model: Arc<dyn MeasurementModel>, sigmas: DVector<f64>) -> Result<Self> {
        if sigmas.len() != model.dim() {
            return Err(LsqpError::DimensionMismatch(format!(
                "{} sigmas for a measurement of dimension {}",
                sigmas.len(),
                model.dim()
            )));
        }
        if sigmas.iter().any(|s| !(*s > 0.0) || !s.is_finite()) {
            return Err(LsqpError::InvalidFactor(
                "sigmas must be positive and finite".to_string(),
            ));
        }
        Ok(NoiseModelFactor { model, sigmas })
    }

    /// Same standard deviation on every row
    pub fn isotropic(model: Arc<dyn MeasurementModel>, sigma: f64) -> Result<Self> {
        let sigmas = DVector::from_element(model.dim(), sigma);
        Self::new(model, sigmas)
    }

    pub fn keys(&self) -> Vec<Key> {
        self.model.keys()
    }

    pub fn sigmas(&self) -> &DVector<f64> {
        &self.sigmas
    }

    /// Whitened residual `e / sigma`
    pub fn whitened_error(&self, values: &VectorValues) -> Result<DVector<f64>> {
        Ok(self.model.evaluate(values)?.component_div(&self.sigmas))
    }

    /// `0.5 * ||e / sigma||^2`
    pub fn error(&self, values: &VectorValues) -> Result<f64> {
        Ok(0.5 * self.whitened_error(values)?.norm_squared())
    }

    /// Gauss-Newton linearization at `values`
    ///
    /// Returns `A_k = H_k / sigma` and `b = -e / sigma`, so minimizing
    /// `0.5 * ||A delta - b||^2` is the first-order model of `error` around
    /// `values`.
    pub fn linearize(&self, values: &VectorValues) -> Result<JacobianFactor> {
        let (residual, jacobians) = self.model.evaluate_with_jacobians(values)?;
        let keys = self.model.keys();
        if jacobians.len() != keys.len() {
            return Err(LsqpError::InvalidFactor(format!(
                "{} Jacobian blocks for {} keys",
                jacobians.len(),
                keys.len()
            )));
        }
        let terms = keys.into_iter().zip(jacobians).collect();
        JacobianFactor::new(terms, -residual)?.whiten(&self.sigmas)
    }
}

impl std::fmt::Debug for NoiseModelFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseModelFactor")
            .field("keys", &self.model.keys())
            .field("sigmas", &self.sigmas)
            .finish()
    }
}
