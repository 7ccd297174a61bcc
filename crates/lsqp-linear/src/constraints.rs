use lsqp_types::{Key, LsqpError, Result, VectorValues};
use nalgebra::{DMatrix, DVector, RowDVector};

use crate::JacobianFactor;

/// Equality constraint `A x = b` with its dual (Lagrange multiplier) key
///
/// The multiplier has one entry per constraint row.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearEquality {
    factor: JacobianFactor,
    dual_key: Key,
}

impl LinearEquality {
    pub fn new(terms: Vec<(Key, DMatrix<f64>)>, b: DVector<f64>, dual_key: Key) -> Result<Self> {
        Ok(LinearEquality {
            factor: JacobianFactor::constrained(terms, b)?,
            dual_key,
        })
    }

    /// Single-row equality `sum_k a_k x_k = b`
    pub fn row(terms: Vec<(Key, RowDVector<f64>)>, b: f64, dual_key: Key) -> Result<Self> {
        let terms = terms
            .into_iter()
            .map(|(key, a)| (key, DMatrix::from_row_slice(1, a.len(), a.as_slice())))
            .collect();
        Self::new(terms, DVector::from_element(1, b), dual_key)
    }

    pub fn dual_key(&self) -> Key {
        self.dual_key
    }

    /// Hard-constraint factor used in the working graph
    pub fn factor(&self) -> &JacobianFactor {
        &self.factor
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.factor.keys()
    }

    pub fn rows(&self) -> usize {
        self.factor.rows()
    }

    /// `A x - b`
    pub fn residual(&self, values: &VectorValues) -> Result<DVector<f64>> {
        self.factor.residual(values)
    }

    /// Transposed coefficient block `A_k^T`, the dual factor's term for this constraint
    pub fn dual_jacobian(&self, key: Key) -> Option<DMatrix<f64>> {
        self.factor.get_a(key).map(|a| a.transpose())
    }
}

/// Single-row inequality constraint `sum_k a_k x_k <= b` with its dual key
///
/// Activation state is not stored here; solvers track it per solve.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInequality {
    terms: Vec<(Key, RowDVector<f64>)>,
    b: f64,
    dual_key: Key,
}

impl LinearInequality {
    pub fn new(terms: Vec<(Key, RowDVector<f64>)>, b: f64, dual_key: Key) -> Result<Self> {
        if terms.is_empty() {
            return Err(LsqpError::InvalidFactor(format!(
                "inequality {} references no variables",
                dual_key
            )));
        }
        for (i, (key, _)) in terms.iter().enumerate() {
            if terms[..i].iter().any(|(other, _)| other == key) {
                return Err(LsqpError::InvalidFactor(format!("duplicate key {}", key)));
            }
        }
        Ok(LinearInequality { terms, b, dual_key })
    }

    /// Scalar bound `coeff * x <= b` on a one-dimensional variable
    pub fn scalar(key: Key, coeff: f64, b: f64, dual_key: Key) -> Result<Self> {
        Self::new(vec![(key, RowDVector::from_element(1, coeff))], b, dual_key)
    }

    pub fn dual_key(&self) -> Key {
        self.dual_key
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.terms.iter().map(|(k, _)| *k)
    }

    pub fn terms(&self) -> &[(Key, RowDVector<f64>)] {
        &self.terms
    }

    pub fn coefficient(&self, key: Key) -> Option<&RowDVector<f64>> {
        self.terms.iter().find(|(k, _)| *k == key).map(|(_, a)| a)
    }

    /// `a . v` for a point or a direction
    pub fn dot_row(&self, values: &VectorValues) -> Result<f64> {
        let mut sum = 0.0;
        for (key, a) in &self.terms {
            let v = values.at(*key)?;
            if v.len() != a.len() {
                return Err(LsqpError::DimensionMismatch(format!(
                    "key {} has dimension {}, inequality expects {}",
                    key,
                    v.len(),
                    a.len()
                )));
            }
            sum += (a * v)[0];
        }
        Ok(sum)
    }

    /// `a . x - b`; positive means violated
    pub fn residual(&self, values: &VectorValues) -> Result<f64> {
        Ok(self.dot_row(values)? - self.b)
    }

    /// The row as a hard constraint `a x = b`, as enforced while active
    pub fn to_constraint(&self) -> Result<JacobianFactor> {
        let terms = self
            .terms
            .iter()
            .map(|(key, a)| (*key, DMatrix::from_row_slice(1, a.len(), a.as_slice())))
            .collect();
        JacobianFactor::constrained(terms, DVector::from_element(1, self.b))
    }

    /// Transposed coefficient row `a_k^T`, the dual factor's term for this constraint
    pub fn dual_jacobian(&self, key: Key) -> Option<DMatrix<f64>> {
        self.coefficient(key)
            .map(|a| DMatrix::from_column_slice(a.len(), 1, a.as_slice()))
    }
}
