use lsqp_types::{Key, Result, VectorValues};
use std::collections::BTreeSet;

use crate::JacobianFactor;

/// Collection of linear factors handed to a `LinearSolver`
#[derive(Debug, Clone, Default)]
pub struct GaussianFactorGraph {
    factors: Vec<JacobianFactor>,
}

impl GaussianFactorGraph {
    pub fn new() -> Self {
        GaussianFactorGraph {
            factors: Vec::new(),
        }
    }

    pub fn from_factors(factors: Vec<JacobianFactor>) -> Self {
        GaussianFactorGraph { factors }
    }

    pub fn push(&mut self, factor: JacobianFactor) {
        self.factors.push(factor);
    }

    pub fn extend<I: IntoIterator<Item = JacobianFactor>>(&mut self, factors: I) {
        self.factors.extend(factors);
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn factors(&self) -> &[JacobianFactor] {
        &self.factors
    }

    pub fn iter(&self) -> impl Iterator<Item = &JacobianFactor> {
        self.factors.iter()
    }

    /// All keys referenced by any factor, in key order
    pub fn keys(&self) -> BTreeSet<Key> {
        self.factors.iter().flat_map(|f| f.keys()).collect()
    }

    /// Sum of soft-factor errors; hard rows do not contribute
    pub fn error(&self, values: &VectorValues) -> Result<f64> {
        self.factors
            .iter()
            .filter(|f| !f.is_constrained())
            .map(|f| f.error(values))
            .sum()
    }
}
