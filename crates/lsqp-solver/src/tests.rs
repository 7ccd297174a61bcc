// Scenario tests for the active-set solver

#[cfg(test)]
mod tests {
    use crate::*;
    use lsqp_linear::{
        DenseSolver, GaussianFactorGraph, JacobianFactor, LinearEquality, LinearInequality,
        LinearSolver,
    };
    use lsqp_types::{Key, LsqpError, Result, VectorValues};
    use nalgebra::{DMatrix, DVector, RowDVector};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn x() -> Key {
        Key::symbol('x', 0)
    }

    fn y() -> Key {
        Key::symbol('y', 0)
    }

    fn dual(i: u64) -> Key {
        Key::symbol('d', i)
    }

    /// 0.5 * (v - center)^2 on a scalar variable
    fn quadratic(key: Key, center: f64) -> JacobianFactor {
        JacobianFactor::unary(key, DMatrix::identity(1, 1), DVector::from_element(1, center))
            .unwrap()
    }

    fn row(entries: &[(Key, f64)]) -> Vec<(Key, RowDVector<f64>)> {
        entries
            .iter()
            .map(|(k, a)| (*k, RowDVector::from_element(1, *a)))
            .collect()
    }

    fn scalars(entries: &[(Key, f64)]) -> VectorValues {
        let mut values = VectorValues::new();
        for (k, v) in entries {
            values.insert_scalar(*k, *v);
        }
        values
    }

    fn scalar(values: &VectorValues, key: Key) -> f64 {
        values.at(key).unwrap()[0]
    }

    /// min 0.5 (x - 2)^2  s.t.  x <= 1
    fn bounded_scalar_qp() -> Qp {
        Qp::new(
            vec![quadratic(x(), 2.0)],
            vec![],
            vec![LinearInequality::scalar(x(), 1.0, 1.0, dual(0)).unwrap()],
        )
    }

    #[test]
    fn test_bound_becomes_active() {
        let solver = QpSolver::new(bounded_scalar_qp()).unwrap();
        let solution = solver
            .solve(&scalars(&[(x(), 0.0)]), &VectorValues::new(), false)
            .unwrap();

        assert!((scalar(&solution.values, x()) - 1.0).abs() < 1e-9);
        assert!(scalar(&solution.duals, dual(0)) > 0.0);
        assert!((scalar(&solution.duals, dual(0)) - 1.0).abs() < 1e-9);
        assert!(solution.working_set.is_active(0));
        assert_eq!(solution.iterations, 2);
        assert!((solution.objective - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_first_iteration_activates_blocking_constraint() {
        let solver = QpSolver::new(bounded_scalar_qp()).unwrap();
        let initial = scalars(&[(x(), 0.0)]);
        let working_set = solver
            .identify_active_constraints(&initial, &VectorValues::new(), false)
            .unwrap();
        assert!(!working_set.is_active(0));

        let state = QpState::new(initial, VectorValues::new(), working_set);
        let next = solver.iterate(&state).unwrap();

        assert!(!next.converged);
        assert_eq!(next.iterations, 1);
        assert!(next.working_set.is_active(0));
        assert!((scalar(&next.values, x()) - 1.0).abs() < 1e-12);
        // The state that was passed in is unchanged
        assert!(!state.working_set.is_active(0));
    }

    #[test]
    fn test_warm_start_on_optimum_converges_immediately() {
        let solver = QpSolver::new(bounded_scalar_qp()).unwrap();
        let (values, duals) = solver
            .optimize(&scalars(&[(x(), 0.0)]), &VectorValues::new(), false)
            .unwrap();

        let again = solver.solve(&values, &duals, true).unwrap();
        assert_eq!(again.iterations, 1);
        assert!(again.values.equals(&values, 1e-9));
        assert!(again.duals.equals(&duals, 1e-9));
    }

    #[test]
    fn test_infeasible_cold_start() {
        let solver = QpSolver::new(bounded_scalar_qp()).unwrap();
        let result = solver.optimize(&scalars(&[(x(), 2.0)]), &VectorValues::new(), false);
        match result {
            Err(LsqpError::InfeasibleInitialValues { factor, residual }) => {
                assert_eq!(factor, 0);
                assert!((residual - 1.0).abs() < 1e-12);
            }
            other => panic!("expected infeasibility, got {:?}", other),
        }
    }

    #[test]
    fn test_warm_start_working_set() {
        let qp = Qp::new(
            vec![quadratic(x(), 0.0)],
            vec![],
            vec![
                LinearInequality::scalar(x(), 1.0, 1.0, dual(0)).unwrap(),
                LinearInequality::scalar(x(), -1.0, 1.0, dual(1)).unwrap(),
            ],
        );
        let solver = QpSolver::new(qp).unwrap();
        // Infeasible point is never evaluated when warm-starting from duals
        let initial = scalars(&[(x(), 5.0)]);
        let duals = scalars(&[(dual(1), 0.3)]);

        let ws = solver.identify_active_constraints(&initial, &duals, true).unwrap();
        assert_eq!(ws, WorkingSet::new(vec![false, true]));

        // Warm start without duals falls back to residuals
        assert!(solver
            .identify_active_constraints(&initial, &VectorValues::new(), true)
            .is_err());
    }

    #[test]
    fn test_equality_only_qp() {
        // min 0.5(x-2)^2 + 0.5(y-2)^2  s.t.  x + y = 1
        let qp = Qp::new(
            vec![quadratic(x(), 2.0), quadratic(y(), 2.0)],
            vec![LinearEquality::row(row(&[(x(), 1.0), (y(), 1.0)]), 1.0, dual(0)).unwrap()],
            vec![],
        );
        let solver = QpSolver::new(qp).unwrap();
        let solution = solver
            .solve(&scalars(&[(x(), 0.0), (y(), 0.0)]), &VectorValues::new(), false)
            .unwrap();

        // One full step, then the convergence check
        assert_eq!(solution.iterations, 2);
        assert!(solution.working_set.is_empty());
        assert!((scalar(&solution.values, x()) - 0.5).abs() < 1e-9);
        assert!((scalar(&solution.values, y()) - 0.5).abs() < 1e-9);
        assert!((scalar(&solution.duals, dual(0)) - 1.5).abs() < 1e-9);

        // Starting at the optimum needs only the check
        let again = solver
            .solve(&solution.values, &VectorValues::new(), false)
            .unwrap();
        assert_eq!(again.iterations, 1);
    }

    #[test]
    fn test_leaving_constraint_has_largest_violation() {
        // min 0.5(x+4)^2 + 0.5(y+3)^2  s.t.  x <= 0,  x + y <= 0, starting on both
        let qp = Qp::new(
            vec![quadratic(x(), -4.0), quadratic(y(), -3.0)],
            vec![],
            vec![
                LinearInequality::scalar(x(), 1.0, 0.0, dual(0)).unwrap(),
                LinearInequality::new(row(&[(x(), 1.0), (y(), 1.0)]), 0.0, dual(1)).unwrap(),
            ],
        );
        let solver = QpSolver::new(qp).unwrap();
        let initial = scalars(&[(x(), 0.0), (y(), 0.0)]);
        let ws = solver
            .identify_active_constraints(&initial, &VectorValues::new(), false)
            .unwrap();
        assert_eq!(ws.num_active(), 2);

        let state = QpState::new(initial.clone(), VectorValues::new(), ws);
        let next = solver.iterate(&state).unwrap();

        assert!((scalar(&next.duals, dual(0)) + 1.0).abs() < 1e-9);
        assert!((scalar(&next.duals, dual(1)) + 3.0).abs() < 1e-9);
        assert!(next.working_set.is_active(0));
        assert!(!next.working_set.is_active(1));
        assert!(!next.converged);

        let solution = solver.solve(&initial, &VectorValues::new(), false).unwrap();
        assert!((scalar(&solution.values, x()) + 4.0).abs() < 1e-9);
        assert!((scalar(&solution.values, y()) + 3.0).abs() < 1e-9);
        assert_eq!(solution.working_set.num_active(), 0);
        assert!(solution.duals.is_empty());
        assert_eq!(solution.iterations, 5);
    }

    #[test]
    fn test_identify_leaving_constraint_ignores_nonnegative() {
        let qp = Qp::new(
            vec![quadratic(x(), 0.0)],
            vec![],
            vec![
                LinearInequality::scalar(x(), 1.0, 1.0, dual(0)).unwrap(),
                LinearInequality::scalar(x(), 1.0, 2.0, dual(1)).unwrap(),
                LinearInequality::scalar(x(), 1.0, 3.0, dual(2)).unwrap(),
            ],
        );
        let solver = QpSolver::new(qp).unwrap();
        let ws = WorkingSet::new(vec![true, true, false]);

        let duals = scalars(&[(dual(0), 0.0), (dual(1), 2.0), (dual(2), -9.0)]);
        assert_eq!(solver.identify_leaving_constraint(&ws, &duals).unwrap(), None);

        let duals = scalars(&[(dual(0), -0.5), (dual(1), -0.5)]);
        assert_eq!(solver.identify_leaving_constraint(&ws, &duals).unwrap(), Some(0));

        let missing = scalars(&[(dual(0), 1.0)]);
        assert!(matches!(
            solver.identify_leaving_constraint(&ws, &missing),
            Err(LsqpError::MissingKey(_))
        ));
    }

    #[test]
    fn test_mixed_equality_and_inequality() {
        // min 0.5(x-3)^2 + 0.5(y-3)^2  s.t.  x - y = 0,  x + y <= 2
        let qp = Qp::new(
            vec![quadratic(x(), 3.0), quadratic(y(), 3.0)],
            vec![LinearEquality::row(row(&[(x(), 1.0), (y(), -1.0)]), 0.0, dual(0)).unwrap()],
            vec![LinearInequality::new(row(&[(x(), 1.0), (y(), 1.0)]), 2.0, dual(1)).unwrap()],
        );
        let solver = QpSolver::new(qp).unwrap();
        let solution = solver
            .solve(&scalars(&[(x(), 0.0), (y(), 0.0)]), &VectorValues::new(), false)
            .unwrap();

        assert!((scalar(&solution.values, x()) - 1.0).abs() < 1e-9);
        assert!((scalar(&solution.values, y()) - 1.0).abs() < 1e-9);
        assert!(scalar(&solution.duals, dual(0)).abs() < 1e-9);
        assert!((scalar(&solution.duals, dual(1)) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_vector_variable_projection() {
        // Project (2, 2) onto x0 + x1 <= 2; a far bound x0 <= 5 stays inactive
        let p = Key::symbol('p', 0);
        let qp = Qp::new(
            vec![JacobianFactor::unary(
                p,
                DMatrix::identity(2, 2),
                DVector::from_vec(vec![2.0, 2.0]),
            )
            .unwrap()],
            vec![],
            vec![
                LinearInequality::new(vec![(p, RowDVector::from_vec(vec![1.0, 1.0]))], 2.0, dual(0))
                    .unwrap(),
                LinearInequality::new(vec![(p, RowDVector::from_vec(vec![1.0, 0.0]))], 5.0, dual(1))
                    .unwrap(),
            ],
        );
        let solver = QpSolver::new(qp).unwrap();
        let mut initial = VectorValues::new();
        initial.insert(p, DVector::zeros(2));

        let solution = solver.solve(&initial, &VectorValues::new(), false).unwrap();
        let v = solution.values.at(p).unwrap();
        assert!((v[0] - 1.0).abs() < 1e-9);
        assert!((v[1] - 1.0).abs() < 1e-9);
        assert!((scalar(&solution.duals, dual(0)) - 1.0).abs() < 1e-9);
        assert!(!solution.duals.contains(dual(1)));
    }

    #[test]
    fn test_optimality_conditions_hold() {
        // Box 0 <= x, y <= 1 around a target outside it
        let bounds = vec![
            LinearInequality::scalar(x(), 1.0, 1.0, dual(0)).unwrap(),
            LinearInequality::scalar(x(), -1.0, 0.0, dual(1)).unwrap(),
            LinearInequality::scalar(y(), 1.0, 1.0, dual(2)).unwrap(),
            LinearInequality::scalar(y(), -1.0, 0.0, dual(3)).unwrap(),
        ];
        let qp = Qp::new(vec![quadratic(x(), 3.0), quadratic(y(), -2.0)], vec![], bounds);
        let solver = QpSolver::new(qp).unwrap();
        let solution = solver
            .solve(&scalars(&[(x(), 0.5), (y(), 0.5)]), &VectorValues::new(), false)
            .unwrap();

        assert!((scalar(&solution.values, x()) - 1.0).abs() < 1e-9);
        assert!(scalar(&solution.values, y()).abs() < 1e-9);

        let residuals = solver.qp().inequality_residuals(&solution.values).unwrap();
        for (index, constraint) in solver.qp().inequalities().iter().enumerate() {
            if solution.working_set.is_active(index) {
                assert!(scalar(&solution.duals, constraint.dual_key()) >= 0.0);
            } else {
                assert!(residuals[index] <= 1e-9);
            }
        }
    }

    #[test]
    fn test_dual_graph_omits_unconstrained_rows() {
        let z = Key::symbol('z', 0);
        let qp = Qp::new(
            vec![quadratic(x(), 2.0), quadratic(z, 0.0)],
            vec![],
            vec![
                LinearInequality::scalar(x(), 1.0, 1.0, dual(0)).unwrap(),
                LinearInequality::scalar(z, 1.0, 1.0, dual(1)).unwrap(),
            ],
        );
        let solver = QpSolver::new(qp).unwrap();
        let values = scalars(&[(x(), 1.0), (z, 0.0)]);

        let graph = solver
            .build_dual_graph(&WorkingSet::new(vec![true, false]), &values)
            .unwrap();
        assert_eq!(graph.len(), 1);
        let factor = &graph.factors()[0];
        assert_eq!(factor.keys().collect::<Vec<_>>(), vec![dual(0)]);
        // -grad at x = 1 for 0.5(x-2)^2
        assert_eq!(factor.b()[0], 1.0);

        let empty = solver
            .build_dual_graph(&WorkingSet::all_inactive(2), &values)
            .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_iteration_cap() {
        let params = SolverParams::default().with_max_iterations(1);
        let solver = QpSolver::with_params(bounded_scalar_qp(), params).unwrap();
        let result = solver.optimize(&scalars(&[(x(), 0.0)]), &VectorValues::new(), false);
        assert!(matches!(result, Err(LsqpError::ConvergenceFailed(1))));
    }

    #[test]
    fn test_trace_does_not_change_result() {
        let params = SolverParams::default().with_trace(true);
        let solver = QpSolver::with_params(bounded_scalar_qp(), params).unwrap();
        let (values, _) = solver
            .optimize(&scalars(&[(x(), 0.0)]), &VectorValues::new(), false)
            .unwrap();
        assert!((scalar(&values, x()) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = SolverParams {
            equality_tolerance: -1.0,
            ..SolverParams::default()
        };
        assert!(matches!(
            QpSolver::with_params(bounded_scalar_qp(), params),
            Err(LsqpError::ConfigError(_))
        ));
    }

    #[test]
    fn test_params_serialization() {
        let params = SolverParams::default().with_trace(true).with_max_iterations(50);
        let json = serde_json::to_string(&params).unwrap();
        let back: SolverParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }

    #[test]
    fn test_singular_working_set_propagates() {
        // Two copies of x <= 1 active together make the KKT system singular
        let qp = Qp::new(
            vec![quadratic(x(), 2.0)],
            vec![],
            vec![
                LinearInequality::scalar(x(), 1.0, 1.0, dual(0)).unwrap(),
                LinearInequality::scalar(x(), 2.0, 2.0, dual(1)).unwrap(),
            ],
        );
        let solver = QpSolver::new(qp).unwrap();
        let result = solver.optimize(&scalars(&[(x(), 1.0)]), &VectorValues::new(), false);
        assert!(matches!(result, Err(LsqpError::IndeterminantLinearSystem(_))));
    }

    #[test]
    fn test_leaving_constraint_on_one_vector_variable() {
        // Both rows act on p = (p0, p1): p0 <= 0 and p0 + p1 <= 0
        let p = Key::symbol('p', 0);
        let qp = Qp::new(
            vec![JacobianFactor::unary(
                p,
                DMatrix::identity(2, 2),
                DVector::from_vec(vec![-4.0, -3.0]),
            )
            .unwrap()],
            vec![],
            vec![
                LinearInequality::new(vec![(p, RowDVector::from_vec(vec![1.0, 0.0]))], 0.0, dual(0))
                    .unwrap(),
                LinearInequality::new(vec![(p, RowDVector::from_vec(vec![1.0, 1.0]))], 0.0, dual(1))
                    .unwrap(),
            ],
        );
        let solver = QpSolver::new(qp).unwrap();
        let mut initial = VectorValues::new();
        initial.insert(p, DVector::zeros(2));

        let ws = solver
            .identify_active_constraints(&initial, &VectorValues::new(), false)
            .unwrap();
        let next = solver
            .iterate(&QpState::new(initial, VectorValues::new(), ws))
            .unwrap();

        // lambda = (-1, -3): the second row violates more and leaves
        assert!((scalar(&next.duals, dual(0)) + 1.0).abs() < 1e-9);
        assert!((scalar(&next.duals, dual(1)) + 3.0).abs() < 1e-9);
        assert_eq!(next.working_set, WorkingSet::new(vec![true, false]));
    }

    #[test]
    fn test_activation_tolerance_is_inclusive() {
        let params = SolverParams {
            activation_tolerance: 0.5,
            ..SolverParams::default()
        };
        let solver = QpSolver::with_params(bounded_scalar_qp(), params).unwrap();
        // Residual is exactly -0.5
        let ws = solver
            .identify_active_constraints(&scalars(&[(x(), 0.5)]), &VectorValues::new(), false)
            .unwrap();
        assert!(ws.is_active(0));
    }

    #[test]
    fn test_whitened_bound() {
        for sigma in [1e-3, 1e-4] {
            let cost = quadratic(x(), 2.0)
                .whiten(&DVector::from_element(1, sigma))
                .unwrap();
            let qp = Qp::new(
                vec![cost],
                vec![],
                vec![LinearInequality::scalar(x(), 1.0, 1.0, dual(0)).unwrap()],
            );
            let solver = QpSolver::new(qp).unwrap();
            let solution = solver
                .solve(&scalars(&[(x(), 0.0)]), &VectorValues::new(), false)
                .unwrap();

            assert!((scalar(&solution.values, x()) - 1.0).abs() < 1e-9);
            // Gradient of 0.5 ((x - 2) / sigma)^2 at x = 1 is -1 / sigma^2
            let expected = (1.0 / sigma).powi(2);
            let lambda = scalar(&solution.duals, dual(0));
            assert!((lambda / expected - 1.0).abs() < 1e-9);
            assert_eq!(solution.iterations, 2);
        }
    }

    #[test]
    fn test_mixed_scale_costs_with_active_coupling() {
        // 0.5((x-2)/1e-3)^2 + 0.5((y-3)/1e2)^2  s.t.  x + y <= 1
        let sigma = |s: f64| DVector::from_element(1, s);
        let qp = Qp::new(
            vec![
                quadratic(x(), 2.0).whiten(&sigma(1e-3)).unwrap(),
                quadratic(y(), 3.0).whiten(&sigma(1e2)).unwrap(),
            ],
            vec![],
            vec![LinearInequality::new(row(&[(x(), 1.0), (y(), 1.0)]), 1.0, dual(0)).unwrap()],
        );
        let solver = QpSolver::new(qp).unwrap();
        let solution = solver
            .solve(&scalars(&[(x(), 0.0), (y(), 0.0)]), &VectorValues::new(), false)
            .unwrap();

        let y_expected = -(1e6 - 3e-4) / (1e6 + 1e-4);
        let x_expected = 1.0 - y_expected;
        let lambda_expected = 1e-4 * (3.0 - y_expected);

        assert!((scalar(&solution.values, x()) - x_expected).abs() < 1e-9);
        assert!((scalar(&solution.values, y()) - y_expected).abs() < 1e-9);
        assert!((scalar(&solution.duals, dual(0)) - lambda_expected).abs() < 1e-9);
        assert!(solution.working_set.is_active(0));
        assert_eq!(solution.iterations, 3);
    }

    struct CountingBackend {
        inner: DenseSolver,
        calls: AtomicUsize,
    }

    impl LinearSolver for CountingBackend {
        fn solve(&self, graph: &GaussianFactorGraph) -> Result<VectorValues> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.solve(graph)
        }
    }

    #[test]
    fn test_custom_backend() {
        let backend = Arc::new(CountingBackend {
            inner: DenseSolver::new(),
            calls: AtomicUsize::new(0),
        });
        let solver =
            QpSolver::with_backend(bounded_scalar_qp(), backend.clone(), SolverParams::default())
                .unwrap();
        solver
            .optimize(&scalars(&[(x(), 0.0)]), &VectorValues::new(), false)
            .unwrap();
        // Two primal solves and one dual solve
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_shared_across_threads() {
        let solver = Arc::new(QpSolver::new(bounded_scalar_qp()).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let solver = Arc::clone(&solver);
                std::thread::spawn(move || {
                    let start = -(i as f64);
                    solver
                        .optimize(&scalars(&[(x(), start)]), &VectorValues::new(), false)
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            let (values, _) = handle.join().unwrap();
            assert!((scalar(&values, x()) - 1.0).abs() < 1e-9);
        }
    }

    proptest! {
        #[test]
        fn prop_ratio_test_single_constraint(
            a in 0.1f64..5.0,
            x0 in -10.0f64..10.0,
            slack in 0.0f64..5.0,
            p in -10.0f64..10.0,
        ) {
            prop_assume!(p.abs() > 1e-3);
            let b = a * x0 + slack;
            let constraints = vec![LinearInequality::scalar(x(), a, b, dual(0)).unwrap()];
            let step = compute_step_size(
                &constraints,
                &WorkingSet::all_inactive(1),
                &scalars(&[(x(), x0)]),
                &scalars(&[(x(), p)]),
            )
            .unwrap();

            let a_t_p = a * p;
            let bound = (b - a * x0) / a_t_p;
            if a_t_p > 0.0 && bound < 1.0 {
                prop_assert!((step.alpha - bound).abs() < 1e-12);
                prop_assert_eq!(step.blocking, Some(0));
            } else {
                prop_assert_eq!(step.alpha, 1.0);
                prop_assert_eq!(step.blocking, None);
            }
            // The stepped point stays feasible
            prop_assert!(a * (x0 + step.alpha * p) - b <= 1e-9);
        }

        #[test]
        fn prop_working_set_updates_are_copies(
            flags in proptest::collection::vec(any::<bool>(), 1..16),
            pick in any::<proptest::sample::Index>(),
        ) {
            let index = pick.index(flags.len());
            let original = WorkingSet::new(flags.clone());

            let activated = original.with_activated(index);
            let deactivated = original.with_deactivated(index);

            prop_assert_eq!(&original, &WorkingSet::new(flags.clone()));
            prop_assert!(activated.is_active(index));
            prop_assert!(!deactivated.is_active(index));
            for other in (0..flags.len()).filter(|i| *i != index) {
                prop_assert_eq!(activated.is_active(other), flags[other]);
                prop_assert_eq!(deactivated.is_active(other), flags[other]);
            }
        }

        #[test]
        fn prop_box_projection(cx in -5.0f64..5.0, cy in -5.0f64..5.0) {
            let bounds = vec![
                LinearInequality::scalar(x(), 1.0, 1.0, dual(0)).unwrap(),
                LinearInequality::scalar(x(), -1.0, 1.0, dual(1)).unwrap(),
                LinearInequality::scalar(y(), 1.0, 1.0, dual(2)).unwrap(),
                LinearInequality::scalar(y(), -1.0, 1.0, dual(3)).unwrap(),
            ];
            let qp = Qp::new(vec![quadratic(x(), cx), quadratic(y(), cy)], vec![], bounds);
            let solver = QpSolver::new(qp).unwrap();
            let (values, _) = solver
                .optimize(&scalars(&[(x(), 0.0), (y(), 0.0)]), &VectorValues::new(), false)
                .unwrap();
            prop_assert!((scalar(&values, x()) - cx.clamp(-1.0, 1.0)).abs() < 1e-7);
            prop_assert!((scalar(&values, y()) - cy.clamp(-1.0, 1.0)).abs() < 1e-7);
        }
    }
}
