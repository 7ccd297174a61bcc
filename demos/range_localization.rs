use lsqp_linear::{LinearEquality, LinearInequality};
use lsqp_nonlinear::{NoiseModelFactor, NonlinearFactorGraph, RangeMeasurement};
use lsqp_solver::{Qp, QpSolver, SolverParams};
use lsqp_types::{Key, VectorValues};
use nalgebra::{DMatrix, DVector, RowDVector};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const TRUST_RADIUS: f64 = 0.5;

/// Solver parameters from an optional JSON file given as the first argument
fn load_params() -> Result<SolverParams, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(SolverParams::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Range localization with trust-region steps");
    println!("===========================================");

    let params = load_params()?;
    let point = Key::symbol('p', 0);
    let beacons = [
        (Key::symbol('b', 0), [0.0, 0.0]),
        (Key::symbol('b', 1), [10.0, 0.0]),
        (Key::symbol('b', 2), [0.0, 10.0]),
        (Key::symbol('b', 3), [10.0, 10.0]),
    ];
    let truth: [f64; 2] = [3.0, 7.0];

    let mut graph = NonlinearFactorGraph::new();
    let mut values = VectorValues::new();
    for (key, coords) in &beacons {
        let range = ((truth[0] - coords[0]).powi(2) + (truth[1] - coords[1]).powi(2)).sqrt();
        graph.add(NoiseModelFactor::isotropic(
            Arc::new(RangeMeasurement::new(point, *key, range)),
            0.05,
        )?);
        values.insert(*key, DVector::from_vec(coords.to_vec()));
        println!("   beacon {} at ({:.1}, {:.1}), range {:.3}", key, coords[0], coords[1], range);
    }
    values.insert(point, DVector::from_vec(vec![5.0, 5.0]));

    for step in 0..20 {
        let mut qp = Qp::default();
        for factor in graph.linearize(&values)? {
            qp.push_cost(factor);
        }
        let mut dual = 0;
        // Beacons are surveyed: their step is zero
        for (key, _) in &beacons {
            qp.push_equality(LinearEquality::new(
                vec![(*key, DMatrix::identity(2, 2))],
                DVector::zeros(2),
                Key::symbol('d', dual),
            )?);
            dual += 1;
        }
        for axis in 0..2 {
            for sign in [1.0, -1.0] {
                let mut row = RowDVector::zeros(2);
                row[axis] = sign;
                qp.push_inequality(LinearInequality::new(
                    vec![(point, row)],
                    TRUST_RADIUS,
                    Key::symbol('d', dual),
                )?);
                dual += 1;
            }
        }

        let solver = QpSolver::with_params(qp, params.clone())?;
        let solution = solver.solve(&values.zero_like(), &VectorValues::new(), false)?;
        values = graph.retract(&values, &solution.values)?;

        let estimate = values.at(point)?;
        println!(
            "   step {:2}: ({:.6}, {:.6})  error {:.3e}  active bounds {}",
            step,
            estimate[0],
            estimate[1],
            graph.error(&values)?,
            solution.working_set.num_active()
        );
        if solution.values.norm() < 1e-10 {
            break;
        }
    }

    let estimate = values.at(point)?;
    println!("\nEstimate: ({:.6}, {:.6}), truth: ({}, {})", estimate[0], estimate[1], truth[0], truth[1]);
    Ok(())
}
