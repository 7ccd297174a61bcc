use nalgebra::DVector;
use std::collections::BTreeMap;

use crate::{Key, LsqpError, Result};

/// Assignment of vector values to keys, used for primal and dual solutions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorValues {
    values: BTreeMap<Key, DVector<f64>>,
}

impl VectorValues {
    pub fn new() -> Self {
        VectorValues {
            values: BTreeMap::new(),
        }
    }

    pub fn from_map(values: BTreeMap<Key, DVector<f64>>) -> Self {
        VectorValues { values }
    }

    /// Insert or replace the value for a key
    pub fn insert(&mut self, key: Key, value: DVector<f64>) {
        self.values.insert(key, value);
    }

    /// Convenience for scalar unknowns
    pub fn insert_scalar(&mut self, key: Key, value: f64) {
        self.values.insert(key, DVector::from_element(1, value));
    }

    pub fn get(&self, key: Key) -> Option<&DVector<f64>> {
        self.values.get(&key)
    }

    /// Value for a key, or `MissingKey`
    pub fn at(&self, key: Key) -> Result<&DVector<f64>> {
        self.values.get(&key).ok_or(LsqpError::MissingKey(key))
    }

    pub fn contains(&self, key: Key) -> bool {
        self.values.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, &DVector<f64>)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Total scalar dimension across all keys
    pub fn dim(&self) -> usize {
        self.values.values().map(|v| v.len()).sum()
    }

    /// Same keys and every entry within `tol` (absolute)
    pub fn equals(&self, other: &VectorValues, tol: f64) -> bool {
        if self.values.len() != other.values.len() {
            return false;
        }
        self.values.iter().all(|(key, v)| match other.values.get(key) {
            Some(w) => v.len() == w.len() && v.iter().zip(w.iter()).all(|(a, b)| (a - b).abs() <= tol),
            None => false,
        })
    }

    /// `self - other`; both must hold the same keys with matching dimensions
    pub fn sub(&self, other: &VectorValues) -> Result<VectorValues> {
        self.check_same_structure(other)?;
        let values = self
            .values
            .iter()
            .map(|(key, v)| (*key, v - &other.values[key]))
            .collect();
        Ok(VectorValues { values })
    }

    /// `self + alpha * delta`; both must hold the same keys with matching dimensions
    pub fn add_scaled(&self, alpha: f64, delta: &VectorValues) -> Result<VectorValues> {
        self.check_same_structure(delta)?;
        let values = self
            .values
            .iter()
            .map(|(key, v)| (*key, v + &delta.values[key] * alpha))
            .collect();
        Ok(VectorValues { values })
    }

    /// Inner product over shared keys
    pub fn dot(&self, other: &VectorValues) -> Result<f64> {
        self.check_same_structure(other)?;
        Ok(self
            .values
            .iter()
            .map(|(key, v)| v.dot(&other.values[key]))
            .sum())
    }

    pub fn norm(&self) -> f64 {
        self.values
            .values()
            .map(|v| v.norm_squared())
            .sum::<f64>()
            .sqrt()
    }

    /// Same keys and dimensions, all zeros
    pub fn zero_like(&self) -> VectorValues {
        let values = self
            .values
            .iter()
            .map(|(key, v)| (*key, DVector::zeros(v.len())))
            .collect();
        VectorValues { values }
    }

    fn check_same_structure(&self, other: &VectorValues) -> Result<()> {
        if self.values.len() != other.values.len() {
            return Err(LsqpError::DimensionMismatch(format!(
                "assignments hold {} and {} keys",
                self.values.len(),
                other.values.len()
            )));
        }
        for (key, v) in &self.values {
            let w = other.values.get(key).ok_or(LsqpError::MissingKey(*key))?;
            if v.len() != w.len() {
                return Err(LsqpError::DimensionMismatch(format!(
                    "key {} has dimension {} vs {}",
                    key,
                    v.len(),
                    w.len()
                )));
            }
        }
        Ok(())
    }
}

impl FromIterator<(Key, DVector<f64>)> for VectorValues {
    fn from_iter<I: IntoIterator<Item = (Key, DVector<f64>)>>(iter: I) -> Self {
        VectorValues {
            values: iter.into_iter().collect(),
        }
    }
}
