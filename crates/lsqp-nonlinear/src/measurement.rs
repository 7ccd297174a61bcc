use lsqp_types::{Key, LsqpError, Result, VectorValues};
use nalgebra::{DMatrix, DVector};

/// Nonlinear measurement `h(x) - z` over a fixed list of keys
pub trait MeasurementModel: Send + Sync {
    /// Keys in the order of the Jacobian blocks
    fn keys(&self) -> Vec<Key>;

    /// Residual dimension
    fn dim(&self) -> usize;

    /// Residual `h(x) - z`
    fn evaluate(&self, values: &VectorValues) -> Result<DVector<f64>>;

    /// Residual and one Jacobian block per key, in `keys()` order
    fn evaluate_with_jacobians(
        &self,
        values: &VectorValues,
    ) -> Result<(DVector<f64>, Vec<DMatrix<f64>>)>;
}

fn value_with_dim<'a>(values: &'a VectorValues, key: Key, dim: usize) -> Result<&'a DVector<f64>> {
    let value = values.at(key)?;
    if value.len() != dim {
        return Err(LsqpError::DimensionMismatch(format!(
            "{} has dimension {}, measurement expects {}",
            key,
            value.len(),
            dim
        )));
    }
    Ok(value)
}

/// Direct observation of one variable
#[derive(Debug, Clone, PartialEq)]
pub struct PriorMeasurement {
    key: Key,
    prior: DVector<f64>,
}

impl PriorMeasurement {
    pub fn new(key: Key, prior: DVector<f64>) -> Self {
        PriorMeasurement { key, prior }
    }

    pub fn prior(&self) -> &DVector<f64> {
        &self.prior
    }
}

impl MeasurementModel for PriorMeasurement {
    fn keys(&self) -> Vec<Key> {
        vec![self.key]
    }

    fn dim(&self) -> usize {
        self.prior.len()
    }

    fn evaluate(&self, values: &VectorValues) -> Result<DVector<f64>> {
        Ok(value_with_dim(values, self.key, self.dim())? - &self.prior)
    }

    fn evaluate_with_jacobians(
        &self,
        values: &VectorValues,
    ) -> Result<(DVector<f64>, Vec<DMatrix<f64>>)> {
        let residual = self.evaluate(values)?;
        Ok((residual, vec![DMatrix::identity(self.dim(), self.dim())]))
    }
}

/// Relative displacement `x2 - x1`
#[derive(Debug, Clone, PartialEq)]
pub struct BetweenMeasurement {
    key1: Key,
    key2: Key,
    measured: DVector<f64>,
}

impl BetweenMeasurement {
    pub fn new(key1: Key, key2: Key, measured: DVector<f64>) -> Self {
        BetweenMeasurement {
            key1,
            key2,
            measured,
        }
    }

    pub fn measured(&self) -> &DVector<f64> {
        &self.measured
    }
}

impl MeasurementModel for BetweenMeasurement {
    fn keys(&self) -> Vec<Key> {
        vec![self.key1, self.key2]
    }

    fn dim(&self) -> usize {
        self.measured.len()
    }

    fn evaluate(&self, values: &VectorValues) -> Result<DVector<f64>> {
        let x1 = value_with_dim(values, self.key1, self.dim())?;
        let x2 = value_with_dim(values, self.key2, self.dim())?;
        Ok((x2 - x1) - &self.measured)
    }

    fn evaluate_with_jacobians(
        &self,
        values: &VectorValues,
    ) -> Result<(DVector<f64>, Vec<DMatrix<f64>>)> {
        let residual = self.evaluate(values)?;
        let n = self.dim();
        Ok((
            residual,
            vec![-DMatrix::<f64>::identity(n, n), DMatrix::identity(n, n)],
        ))
    }
}

/// Euclidean distance between two points of equal dimension
#[derive(Debug, Clone, PartialEq)]
pub struct RangeMeasurement {
    key1: Key,
    key2: Key,
    range: f64,
}

impl RangeMeasurement {
    pub fn new(key1: Key, key2: Key, range: f64) -> Self {
        RangeMeasurement { key1, key2, range }
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    fn difference(&self, values: &VectorValues) -> Result<DVector<f64>> {
        let x1 = values.at(self.key1)?;
        let x2 = value_with_dim(values, self.key2, x1.len())?;
        Ok(x1 - x2)
    }
}

impl MeasurementModel for RangeMeasurement {
    fn keys(&self) -> Vec<Key> {
        vec![self.key1, self.key2]
    }

    fn dim(&self) -> usize {
        1
    }

    fn evaluate(&self, values: &VectorValues) -> Result<DVector<f64>> {
        let d = self.difference(values)?;
        Ok(DVector::from_element(1, d.norm() - self.range))
    }

    fn evaluate_with_jacobians(
        &self,
        values: &VectorValues,
    ) -> Result<(DVector<f64>, Vec<DMatrix<f64>>)> {
        let d = self.difference(values)?;
        let distance = d.norm();
        // Direction is undefined for coincident points
        if distance == 0.0 {
            return Err(LsqpError::InvalidFactor(format!(
                "range between {} and {} at zero distance",
                self.key1, self.key2
            )));
        }

        let h1 = DMatrix::from_row_slice(1, d.len(), (d.clone() / distance).as_slice());
        let h2 = -&h1;
        Ok((DVector::from_element(1, distance - self.range), vec![h1, h2]))
    }
}
