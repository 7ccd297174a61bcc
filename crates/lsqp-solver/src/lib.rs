mod qp;
mod working_set;
mod state;
mod params;
mod step;
mod dual;
mod solver;

pub use qp::Qp;
pub use working_set::WorkingSet;
pub use state::{QpSolution, QpState};
pub use params::SolverParams;
pub use step::{compute_step_size, StepSize};
pub use solver::QpSolver;

#[cfg(test)]
mod tests;
