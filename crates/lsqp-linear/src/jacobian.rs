use lsqp_types::{Key, LsqpError, Result, VectorValues};
use nalgebra::{DMatrix, DVector};

/// Block-sparse linear factor `sum_k A_k x_k - b`
///
/// Soft factors contribute `0.5 * ||A x - b||^2` to the objective. Constrained
/// factors are hard rows `A x = b` eliminated alongside the soft ones.
#[derive(Debug, Clone, PartialEq)]
pub struct JacobianFactor {
    terms: Vec<(Key, DMatrix<f64>)>,
    b: DVector<f64>,
    constrained: bool,
}

impl JacobianFactor {
    /// Create a soft factor; every block must have `b.len()` rows and keys must be distinct
    pub fn new(terms: Vec<(Key, DMatrix<f64>)>, b: DVector<f64>) -> Result<Self> {
        Self::validate_terms(&terms, b.len())?;
        Ok(JacobianFactor {
            terms,
            b,
            constrained: false,
        })
    }

    /// Create a hard-constraint factor `A x = b`
    pub fn constrained(terms: Vec<(Key, DMatrix<f64>)>, b: DVector<f64>) -> Result<Self> {
        let mut factor = Self::new(terms, b)?;
        factor.constrained = true;
        Ok(factor)
    }

    pub fn unary(key: Key, a: DMatrix<f64>, b: DVector<f64>) -> Result<Self> {
        Self::new(vec![(key, a)], b)
    }

    pub fn binary(
        key1: Key,
        a1: DMatrix<f64>,
        key2: Key,
        a2: DMatrix<f64>,
        b: DVector<f64>,
    ) -> Result<Self> {
        Self::new(vec![(key1, a1), (key2, a2)], b)
    }

    fn validate_terms(terms: &[(Key, DMatrix<f64>)], rows: usize) -> Result<()> {
        for (i, (key, a)) in terms.iter().enumerate() {
            if a.nrows() != rows {
                return Err(LsqpError::InvalidFactor(format!(
                    "block for {} has {} rows, rhs has {}",
                    key,
                    a.nrows(),
                    rows
                )));
            }
            if terms[..i].iter().any(|(other, _)| other == key) {
                return Err(LsqpError::InvalidFactor(format!("duplicate key {}", key)));
            }
        }
        Ok(())
    }

    pub fn is_constrained(&self) -> bool {
        self.constrained
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn rows(&self) -> usize {
        self.b.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.terms.iter().map(|(k, _)| *k)
    }

    pub fn terms(&self) -> &[(Key, DMatrix<f64>)] {
        &self.terms
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    /// Coefficient block for a key, if the factor touches it
    pub fn get_a(&self, key: Key) -> Option<&DMatrix<f64>> {
        self.terms.iter().find(|(k, _)| *k == key).map(|(_, a)| a)
    }

    /// `A x - b` at the given values
    pub fn residual(&self, values: &VectorValues) -> Result<DVector<f64>> {
        let mut r = -self.b.clone();
        for (key, a) in &self.terms {
            let x = values.at(*key)?;
            if x.len() != a.ncols() {
                return Err(LsqpError::DimensionMismatch(format!(
                    "key {} has dimension {}, factor expects {}",
                    key,
                    x.len(),
                    a.ncols()
                )));
            }
            r += a * x;
        }
        Ok(r)
    }

    /// `0.5 * ||A x - b||^2`
    pub fn error(&self, values: &VectorValues) -> Result<f64> {
        Ok(0.5 * self.residual(values)?.norm_squared())
    }

    /// Gradient of `0.5 * ||A x - b||^2` with respect to one key: `A_k^T (A x - b)`
    pub fn gradient(&self, key: Key, values: &VectorValues) -> Result<DVector<f64>> {
        let a = self.get_a(key).ok_or(LsqpError::MissingKey(key))?;
        Ok(a.transpose() * self.residual(values)?)
    }

    /// Divide each row by its standard deviation
    pub fn whiten(&self, sigmas: &DVector<f64>) -> Result<JacobianFactor> {
        if sigmas.len() != self.rows() {
            return Err(LsqpError::DimensionMismatch(format!(
                "{} sigmas for a factor with {} rows",
                sigmas.len(),
                self.rows()
            )));
        }
        if sigmas.iter().any(|s| !(*s > 0.0) || !s.is_finite()) {
            return Err(LsqpError::InvalidFactor(
                "sigmas must be positive and finite".to_string(),
            ));
        }
        let terms = self
            .terms
            .iter()
            .map(|(key, a)| {
                let mut w = a.clone();
                for (i, s) in sigmas.iter().enumerate() {
                    w.row_mut(i).scale_mut(1.0 / *s);
                }
                (*key, w)
            })
            .collect();
        Ok(JacobianFactor {
            terms,
            b: self.b.component_div(sigmas),
            constrained: self.constrained,
        })
    }
}
