//! The seam between the model and whatever MILP engine solves it.
use crate::model::Model;

#[cfg(feature = "microlp")]
mod microlp_backend;
#[cfg(feature = "microlp")]
pub use microlp_backend::MicrolpSolver;

/// Objective value and one value per model variable, indexed by [`crate::model::VarId::idx`].
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub objective: f64,
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SolverOutcome {
    /// Proven optimal.
    Optimal(Assignment),
    /// Feasible but not proven optimal, e.g. a limit was hit.
    BestFound(Assignment),
    Infeasible,
    Unbounded,
    Failed(String),
}

impl SolverOutcome {
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            SolverOutcome::Optimal(a) | SolverOutcome::BestFound(a) => Some(a),
            _ => None,
        }
    }
}

pub trait MilpSolver {
    fn name(&self) -> &str;

    /// Solve `model` to optimality or report why that was not possible.  Must not panic on
    /// infeasible or unbounded models.
    fn solve(&self, model: &Model) -> SolverOutcome;
}

impl<S: MilpSolver + ?Sized> MilpSolver for &S {
    fn name(&self) -> &str { (**self).name() }

    fn solve(&self, model: &Model) -> SolverOutcome { (**self).solve(model) }
}

impl<S: MilpSolver + ?Sized> MilpSolver for Box<S> {
    fn name(&self) -> &str { (**self).name() }

    fn solve(&self, model: &Model) -> SolverOutcome { (**self).solve(model) }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::Cell;

    /// Hands back a fixed outcome, whatever the model, and counts calls.
    pub struct Scripted {
        outcome: SolverOutcome,
        pub calls: Cell<usize>,
    }

    impl Scripted {
        pub fn new(outcome: SolverOutcome) -> Self {
            Scripted { outcome, calls: Cell::new(0) }
        }

        /// Returns `values` as an optimal assignment; the objective is evaluated on the model.
        pub fn optimal(values: Vec<f64>) -> Self {
            Scripted::new(SolverOutcome::Optimal(Assignment { objective: f64::NAN, values }))
        }
    }

    impl MilpSolver for Scripted {
        fn name(&self) -> &str { "scripted" }

        fn solve(&self, model: &Model) -> SolverOutcome {
            self.calls.set(self.calls.get() + 1);
            match &self.outcome {
                SolverOutcome::Optimal(a) if a.objective.is_nan() => {
                    let objective = if a.values.len() == model.num_vars() { model.objective().value(&a.values) } else { 0.0 };
                    SolverOutcome::Optimal(Assignment { objective, values: a.values.clone() })
                },
                other => other.clone(),
            }
        }
    }
}
