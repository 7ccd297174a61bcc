use lsqp_types::{Key, LsqpError, Result, VectorValues};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{GaussianFactorGraph, LinearSolver};

/// Dense least-squares backend
///
/// Stacks soft rows `A, b` and hard rows `C, d` over a key-ordered column layout.
/// Without hard rows it solves `min ||A x - b||` from an SVD of `A` itself. With
/// hard rows it eliminates them first: `x = x_p + Z y`, where `x_p` is the
/// minimum-norm solution of `C x = d` and the columns of `Z` span the null space
/// of `C`, then solves the reduced problem `min ||A Z y - (b - A x_p)||`.
///
/// The rank test runs on `C` and on `A Z` separately: a singular value below
/// `rank_tolerance * sigma_max` of that matrix makes the system indeterminant.
/// Neither matrix is squared, so whitening by small sigmas does not trip it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseSolver {
    rank_tolerance: f64,
}

impl DenseSolver {
    pub fn new() -> Self {
        DenseSolver {
            rank_tolerance: 1e-12,
        }
    }

    pub fn with_rank_tolerance(rank_tolerance: f64) -> Result<Self> {
        if !(rank_tolerance > 0.0) || !rank_tolerance.is_finite() {
            return Err(LsqpError::ConfigError(format!(
                "rank tolerance must be positive and finite, got {}",
                rank_tolerance
            )));
        }
        Ok(DenseSolver { rank_tolerance })
    }

    pub fn rank_tolerance(&self) -> f64 {
        self.rank_tolerance
    }

    /// Cutoff below which a singular value counts as zero
    fn check_rank(&self, singular_values: &DVector<f64>, what: &str) -> Result<f64> {
        let s_max = singular_values.max();
        let s_min = singular_values.min();
        let tol = self.rank_tolerance * s_max.max(f64::MIN_POSITIVE);

        if !s_max.is_finite() || s_min <= tol {
            return Err(LsqpError::IndeterminantLinearSystem(format!(
                "{} are rank deficient, condition estimate {:e}",
                what,
                s_max / s_min
            )));
        }
        Ok(tol)
    }

    /// `min ||m x - rhs||` for an `m` of full column rank
    fn least_squares(
        &self,
        m: DMatrix<f64>,
        rhs: &DVector<f64>,
        what: &str,
    ) -> Result<DVector<f64>> {
        let (rows, cols) = m.shape();
        if rows < cols {
            return Err(LsqpError::IndeterminantLinearSystem(format!(
                "{} give {} rows for {} unknowns",
                what, rows, cols
            )));
        }

        let svd = m.svd(true, true);
        let tol = self.check_rank(&svd.singular_values, what)?;
        svd.solve(rhs, tol)
            .map_err(|e| LsqpError::IndeterminantLinearSystem(e.to_string()))
    }

    /// Particular solution of `C x = d` and an orthonormal basis of the null space of `C`
    fn eliminate_hard_rows(
        &self,
        c: &DMatrix<f64>,
        d: &DVector<f64>,
    ) -> Result<(DVector<f64>, DMatrix<f64>)> {
        let (m, n) = c.shape();
        if m > n {
            return Err(LsqpError::IndeterminantLinearSystem(format!(
                "{} hard rows over {} columns",
                m, n
            )));
        }

        let svd = c.clone().svd(true, true);
        let tol = self.check_rank(&svd.singular_values, "hard rows")?;
        let x_p = svd
            .solve(d, tol)
            .map_err(|e| LsqpError::IndeterminantLinearSystem(e.to_string()))?;

        // Left singular vectors of the square [C^T 0] complete range(C^T) to R^n
        let mut padded = DMatrix::<f64>::zeros(n, n);
        padded.view_mut((0, 0), (n, m)).copy_from(&c.transpose());
        let full = padded.svd(true, false);
        let singular_values = full.singular_values;
        let u = full.u.ok_or_else(|| {
            LsqpError::IndeterminantLinearSystem("missing singular vectors".to_string())
        })?;

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| singular_values[j].total_cmp(&singular_values[i]));
        let z = DMatrix::from_fn(n, n - m, |row, col| u[(row, order[m + col])]);

        Ok((x_p, z))
    }
}

impl Default for DenseSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearSolver for DenseSolver {
    fn solve(&self, graph: &GaussianFactorGraph) -> Result<VectorValues> {
        let layout = ColumnLayout::from_graph(graph)?;
        let n = layout.total;
        if n == 0 {
            return Ok(VectorValues::new());
        }

        let soft_rows: usize = graph
            .iter()
            .filter(|f| !f.is_constrained())
            .map(|f| f.rows())
            .sum();
        let hard_rows: usize = graph
            .iter()
            .filter(|f| f.is_constrained())
            .map(|f| f.rows())
            .sum();

        let (a, b) = stack_rows(graph, &layout, soft_rows, false);

        tracing::trace!(
            variables = layout.offsets.len(),
            columns = n,
            soft_rows,
            hard_rows,
            "dense elimination"
        );

        let x = if hard_rows == 0 {
            self.least_squares(a, &b, "soft rows")?
        } else {
            let (c, d) = stack_rows(graph, &layout, hard_rows, true);
            let (x_p, z) = self.eliminate_hard_rows(&c, &d)?;
            if z.ncols() == 0 {
                x_p
            } else {
                let reduced = &a * &z;
                let residual = &b - &a * &x_p;
                let y = self.least_squares(reduced, &residual, "reduced soft rows")?;
                x_p + z * y
            }
        };

        Ok(layout
            .offsets
            .iter()
            .map(|(key, (offset, dim))| (*key, x.rows(*offset, *dim).into_owned()))
            .collect())
    }
}

/// Column offset and dimension of each key, in key order
struct ColumnLayout {
    offsets: BTreeMap<Key, (usize, usize)>,
    total: usize,
}

impl ColumnLayout {
    fn from_graph(graph: &GaussianFactorGraph) -> Result<Self> {
        let mut dims: BTreeMap<Key, usize> = BTreeMap::new();
        for factor in graph.iter() {
            for (key, a) in factor.terms() {
                match dims.get(key) {
                    Some(&dim) if dim != a.ncols() => {
                        return Err(LsqpError::DimensionMismatch(format!(
                            "key {} appears with dimensions {} and {}",
                            key,
                            dim,
                            a.ncols()
                        )));
                    }
                    Some(_) => {}
                    None => {
                        dims.insert(*key, a.ncols());
                    }
                }
            }
        }

        let mut offsets = BTreeMap::new();
        let mut total = 0;
        for (key, dim) in dims {
            offsets.insert(key, (total, dim));
            total += dim;
        }
        Ok(ColumnLayout { offsets, total })
    }
}

/// Stack the soft (or hard) factors into one dense row block
fn stack_rows(
    graph: &GaussianFactorGraph,
    layout: &ColumnLayout,
    rows: usize,
    constrained: bool,
) -> (DMatrix<f64>, DVector<f64>) {
    let mut a = DMatrix::zeros(rows, layout.total);
    let mut b = DVector::zeros(rows);
    let mut row = 0;

    for factor in graph.iter().filter(|f| f.is_constrained() == constrained) {
        let m = factor.rows();
        for (key, block) in factor.terms() {
            let (offset, dim) = layout.offsets[key];
            a.view_mut((row, offset), (m, dim)).copy_from(block);
        }
        b.rows_mut(row, m).copy_from(factor.b());
        row += m;
    }

    (a, b)
}
