use lsqp_linear::JacobianFactor;
use lsqp_types::{Key, LsqpError, Result, VectorValues};
use std::collections::BTreeSet;
use tracing::debug;

use crate::NoiseModelFactor;

/// Sum of noise-model factors, linearized into QP cost factors
#[derive(Debug, Clone, Default)]
pub struct NonlinearFactorGraph {
    factors: Vec<NoiseModelFactor>,
}

impl NonlinearFactorGraph {
    pub fn new() -> Self {
        NonlinearFactorGraph {
            factors: Vec::new(),
        }
    }

    pub fn add(&mut self, factor: NoiseModelFactor) {
        self.factors.push(factor);
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn factors(&self) -> &[NoiseModelFactor] {
        &self.factors
    }

    pub fn keys(&self) -> BTreeSet<Key> {
        self.factors.iter().flat_map(|f| f.keys()).collect()
    }

    /// Total `0.5 * ||e / sigma||^2`
    pub fn error(&self, values: &VectorValues) -> Result<f64> {
        let mut total = 0.0;
        for factor in &self.factors {
            total += factor.error(values)?;
        }
        Ok(total)
    }

    /// Linearize every factor at `values`; the results are over step variables
    pub fn linearize(&self, values: &VectorValues) -> Result<Vec<JacobianFactor>> {
        let linear = self
            .factors
            .iter()
            .map(|f| f.linearize(values))
            .collect::<Result<Vec<_>>>()?;
        debug!(factors = linear.len(), "linearized graph");
        Ok(linear)
    }

    /// `values + delta` on the keys of `delta`; other keys are unchanged
    pub fn retract(&self, values: &VectorValues, delta: &VectorValues) -> Result<VectorValues> {
        let mut updated = values.clone();
        for (key, step) in delta.iter() {
            let current = values.at(key)?;
            if current.len() != step.len() {
                return Err(LsqpError::DimensionMismatch(format!(
                    "step for {} has dimension {}, value has {}",
                    key,
                    step.len(),
                    current.len()
                )));
            }
            updated.insert(key, current + step);
        }
        Ok(updated)
    }
}
