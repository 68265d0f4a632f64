use microlp::{ComparisonOp, OptimizationDirection, Problem};
use tracing::*;

use crate::model::{Direction, Model, Sense, VarDomain};
use super::{Assignment, MilpSolver, SolverOutcome};

/// Pure Rust branch-and-bound from the `microlp` crate.  It has no time limit, so it only
/// ever reports [`SolverOutcome::Optimal`] for feasible models.
#[derive(Clone, Copy, Debug, Default)]
pub struct MicrolpSolver;

impl MicrolpSolver {
    pub fn new() -> Self { MicrolpSolver }

    fn problem(model: &Model) -> (Problem, Vec<microlp::Variable>) {
        let objective = model.objective();
        let direction = match objective.direction {
            Direction::Minimize => OptimizationDirection::Minimize,
            Direction::Maximize => OptimizationDirection::Maximize,
        };
        let mut obj_coeffs = vec![0.0; model.num_vars()];
        for &(v, c) in &objective.terms {
            obj_coeffs[v.idx()] += c;
        }

        let mut problem = Problem::new(direction);
        let vars: Vec<_> = model.domains().iter().zip(obj_coeffs)
            .map(|(domain, c)| match *domain {
                VarDomain::Binary => problem.add_binary_var(c),
                VarDomain::Integer { lb, ub } => problem.add_integer_var(c, (lb, ub)),
            })
            .collect();

        for c in model.constraints() {
            let op = match c.sense {
                Sense::Le => ComparisonOp::Le,
                Sense::Eq => ComparisonOp::Eq,
                Sense::Ge => ComparisonOp::Ge,
            };
            let terms: Vec<_> = c.terms.iter().map(|&(v, a)| (vars[v.idx()], a)).collect();
            problem.add_constraint(terms, op, c.rhs);
        }
        (problem, vars)
    }
}

impl MilpSolver for MicrolpSolver {
    fn name(&self) -> &str { "microlp" }

    #[instrument(level="debug", skip(self, model), fields(vars=model.num_vars(), constraints=model.constraints().len()))]
    fn solve(&self, model: &Model) -> SolverOutcome {
        let (problem, vars) = Self::problem(model);
        match problem.solve() {
            Ok(sol) => {
                let values = vars.iter().map(|&v| sol[v]).collect();
                debug!(objective=sol.objective(), "solved");
                SolverOutcome::Optimal(Assignment { objective: sol.objective(), values })
            },
            Err(microlp::Error::Infeasible) => SolverOutcome::Infeasible,
            Err(microlp::Error::Unbounded) => SolverOutcome::Unbounded,
            Err(microlp::Error::InternalError(msg)) => {
                error!(%msg, "microlp failed");
                SolverOutcome::Failed(msg)
            },
        }
    }
}
