mod jacobian;
mod constraints;
mod graph;
mod variable_index;
mod backend;
mod dense_backend;

pub use jacobian::JacobianFactor;
pub use constraints::{LinearEquality, LinearInequality};
pub use graph::GaussianFactorGraph;
pub use variable_index::VariableIndex;
pub use backend::LinearSolver;
pub use dense_backend::DenseSolver;
