use lsqp_linear::{JacobianFactor, LinearInequality};
use lsqp_solver::{Qp, QpSolver, SolverParams};
use lsqp_types::{Key, VectorValues};
use nalgebra::{DMatrix, DVector};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug shows every working-set change
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Projecting points onto the unit box");
    println!("===================================");

    let targets = [2.5, -0.3, -4.0, 0.9];
    let mut qp = Qp::default();
    let mut initial = VectorValues::new();
    for (i, target) in targets.iter().enumerate() {
        let key = Key::symbol('x', i as u64);
        qp.push_cost(JacobianFactor::unary(
            key,
            DMatrix::identity(1, 1),
            DVector::from_element(1, *target),
        )?);
        qp.push_inequality(LinearInequality::scalar(key, 1.0, 1.0, Key::symbol('u', i as u64))?);
        qp.push_inequality(LinearInequality::scalar(key, -1.0, 1.0, Key::symbol('l', i as u64))?);
        initial.insert_scalar(key, 0.0);
    }

    let solver = QpSolver::with_params(qp, SolverParams::default().with_trace(true))?;
    let solution = solver.solve(&initial, &VectorValues::new(), false)?;

    println!("\nConverged in {} iterations, objective {:.4}", solution.iterations, solution.objective);
    for (i, target) in targets.iter().enumerate() {
        let key = Key::symbol('x', i as u64);
        println!("   {}: target {:5.2} -> {:5.2}", key, target, solution.values.at(key)?[0]);
    }
    println!("\nMultipliers of the active bounds:");
    for (key, lambda) in solution.duals.iter() {
        println!("   {}: {:.4}", key, lambda[0]);
    }
    Ok(())
}
