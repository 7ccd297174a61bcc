use lsqp_linear::{DenseSolver, GaussianFactorGraph, LinearSolver, VariableIndex};
use lsqp_types::{Key, LsqpError, Result, VectorValues};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::step::{compute_step_size, StepSize};
use crate::{Qp, QpSolution, QpState, SolverParams, WorkingSet};

/// Active-set solver for convex QPs over linear factors
///
/// The QP and its variable indices are fixed at construction, so one solver can
/// serve concurrent `optimize` calls; every call owns its working sets and states.
pub struct QpSolver {
    pub(crate) qp: Qp,
    pub(crate) base_graph: GaussianFactorGraph,
    pub(crate) cost_index: VariableIndex,
    pub(crate) equality_index: VariableIndex,
    pub(crate) inequality_index: VariableIndex,
    pub(crate) constrained_keys: BTreeSet<Key>,
    backend: Arc<dyn LinearSolver>,
    params: SolverParams,
}

impl QpSolver {
    /// Create a solver with default parameters and the dense backend
    pub fn new(qp: Qp) -> Result<Self> {
        Self::with_params(qp, SolverParams::default())
    }

    pub fn with_params(qp: Qp, params: SolverParams) -> Result<Self> {
        Self::with_backend(qp, Arc::new(DenseSolver::new()), params)
    }

    /// Create with a custom linear backend and parameters
    pub fn with_backend(
        qp: Qp,
        backend: Arc<dyn LinearSolver>,
        params: SolverParams,
    ) -> Result<Self> {
        params.validate()?;
        qp.validate()?;

        let mut base_graph = GaussianFactorGraph::from_factors(qp.cost().to_vec());
        base_graph.extend(qp.equalities().iter().map(|c| c.factor().clone()));

        let cost_index = VariableIndex::from_factors(qp.cost());
        let equality_index =
            VariableIndex::new(qp.equalities().iter().map(|c| c.keys().collect::<Vec<_>>()));
        let inequality_index =
            VariableIndex::new(qp.inequalities().iter().map(|c| c.keys().collect::<Vec<_>>()));
        let constrained_keys = qp.constrained_keys();

        Ok(QpSolver {
            qp,
            base_graph,
            cost_index,
            equality_index,
            inequality_index,
            constrained_keys,
            backend,
            params,
        })
    }

    pub fn qp(&self) -> &Qp {
        &self.qp
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Exact solution of the cost subject to the equalities and every active inequality
    pub fn solve_with_working_set(&self, working_set: &WorkingSet) -> Result<VectorValues> {
        let mut graph = self.base_graph.clone();
        for index in working_set.active_indices() {
            if let Some(constraint) = self.qp.inequalities().get(index) {
                graph.push(constraint.to_constraint()?);
            }
        }
        self.backend.solve(&graph)
    }

    /// Solve the dual graph built at `values` for the current multipliers
    pub fn solve_duals(
        &self,
        working_set: &WorkingSet,
        values: &VectorValues,
    ) -> Result<VectorValues> {
        let dual_graph = self.build_dual_graph(working_set, values)?;
        if self.params.trace {
            debug!(factors = dual_graph.len(), "built dual graph");
        }
        self.backend.solve(&dual_graph)
    }

    /// Ratio test along `p` from `x` against the inactive inequalities
    pub fn compute_step_size(
        &self,
        working_set: &WorkingSet,
        x: &VectorValues,
        p: &VectorValues,
    ) -> Result<StepSize> {
        compute_step_size(self.qp.inequalities(), working_set, x, p)
    }

    /// One active-set iteration
    pub fn iterate(&self, state: &QpState) -> Result<QpState> {
        let new_values = self.solve_with_working_set(&state.working_set)?;
        if self.params.trace {
            debug!(iteration = state.iterations, values = ?new_values, "working-set solution");
        }

        if new_values.equals(&state.values, self.params.equality_tolerance) {
            // No progress possible on this working set: check the multipliers
            let duals = self.solve_duals(&state.working_set, &new_values)?;
            let leaving = self.identify_leaving_constraint(&state.working_set, &duals)?;
            if self.params.trace {
                debug!(duals = ?duals, leaving = ?leaving, "dual check");
            }

            return Ok(match leaving {
                None => QpState {
                    values: new_values,
                    duals,
                    working_set: state.working_set.clone(),
                    converged: true,
                    iterations: state.iterations + 1,
                },
                Some(index) => QpState {
                    values: new_values,
                    duals,
                    working_set: state.working_set.with_deactivated(index),
                    converged: false,
                    iterations: state.iterations + 1,
                },
            });
        }

        let p = new_values.sub(&state.values)?;
        let step = self.compute_step_size(&state.working_set, &state.values, &p)?;
        if self.params.trace {
            debug!(alpha = step.alpha, blocking = ?step.blocking, "step size");
        }

        let working_set = match step.blocking {
            Some(index) => state.working_set.with_activated(index),
            None => state.working_set.clone(),
        };

        Ok(QpState {
            values: state.values.add_scaled(step.alpha, &p)?,
            duals: state.duals.clone(),
            working_set,
            converged: false,
            iterations: state.iterations + 1,
        })
    }

    /// Initial working set from warm-start duals or a feasible starting point
    pub fn identify_active_constraints(
        &self,
        initial_values: &VectorValues,
        duals: &VectorValues,
        warm_start: bool,
    ) -> Result<WorkingSet> {
        let mut active = Vec::with_capacity(self.qp.inequalities().len());
        for (index, constraint) in self.qp.inequalities().iter().enumerate() {
            if warm_start && duals.contains(constraint.dual_key()) {
                active.push(true);
            } else if warm_start && !duals.is_empty() {
                active.push(false);
            } else {
                let residual = constraint.residual(initial_values)?;
                // No phase-1 solver: the caller must supply a feasible point
                if residual > 0.0 {
                    return Err(LsqpError::InfeasibleInitialValues {
                        factor: index,
                        residual,
                    });
                }
                active.push(residual.abs() <= self.params.activation_tolerance);
            }
        }
        Ok(WorkingSet::new(active))
    }

    /// Run to convergence and return the primal and dual solutions
    pub fn optimize(
        &self,
        initial_values: &VectorValues,
        duals: &VectorValues,
        warm_start: bool,
    ) -> Result<(VectorValues, VectorValues)> {
        let solution = self.solve(initial_values, duals, warm_start)?;
        Ok((solution.values, solution.duals))
    }

    /// Run to convergence, keeping the diagnostics
    pub fn solve(
        &self,
        initial_values: &VectorValues,
        duals: &VectorValues,
        warm_start: bool,
    ) -> Result<QpSolution> {
        let working_set = self.identify_active_constraints(initial_values, duals, warm_start)?;
        let mut state = QpState::new(initial_values.clone(), duals.clone(), working_set);

        while !state.converged {
            if let Some(max) = self.params.max_iterations {
                if state.iterations >= max {
                    return Err(LsqpError::ConvergenceFailed(max));
                }
            }
            state = self.iterate(&state)?;
        }

        let objective = self.qp.objective(&state.values)?;
        info!(
            iterations = state.iterations,
            active = state.working_set.num_active(),
            objective,
            "QP converged"
        );

        Ok(QpSolution {
            values: state.values,
            duals: state.duals,
            working_set: state.working_set,
            iterations: state.iterations,
            objective,
        })
    }
}
