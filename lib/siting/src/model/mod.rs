//! Solver independent MILP model of the siting problem.
use tracing::*;

use crate::{Result, SitingInstance};

pub mod vars;
pub mod constraints;
pub mod objective;

pub use vars::{VarId, VarDomain, VarRef, Variables};
pub use constraints::{Constraint, ConstraintTag, Sense, generate, validate};
pub use objective::{Objective, Direction, compose};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubtourElimination {
    /// Rank variables `P` with `P[i] - P[j] + n * Y[i][j] <= n - 1`.
    Sequencing,
    /// No elimination at all.  The model is a relaxation and may return disconnected cycles.
    Disabled,
}

impl Default for SubtourElimination {
    fn default() -> Self { SubtourElimination::Sequencing }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelOptions {
    pub subtour_elimination: SubtourElimination,
    /// Sites forced open.
    pub fixed_open: Vec<usize>,
    /// Sites forced closed.
    pub fixed_closed: Vec<usize>,
}

/// Variables, constraints and objective, ready to hand to a [`crate::solver::MilpSolver`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    domains: Vec<VarDomain>,
    constraints: Vec<Constraint>,
    objective: Objective,
}

impl Model {
    pub fn new() -> Self { Model::default() }

    pub fn add_var(&mut self, domain: VarDomain) -> VarId {
        let v = VarId(self.domains.len());
        self.domains.push(domain);
        v
    }

    pub fn add_constraint(&mut self, c: Constraint) {
        debug_assert!(c.terms.iter().all(|&(v, _)| v.idx() < self.domains.len()), "unknown variable in {:?}", c.tag);
        self.constraints.push(c);
    }

    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = objective;
    }

    #[inline]
    pub fn num_vars(&self) -> usize { self.domains.len() }

    #[inline]
    pub fn domain(&self, v: VarId) -> VarDomain { self.domains[v.idx()] }

    pub fn domains(&self) -> &[VarDomain] { &self.domains }

    pub fn constraints(&self) -> &[Constraint] { &self.constraints }

    pub fn objective(&self) -> &Objective { &self.objective }

    /// Constraints violated by `values` by more than `tol`.
    pub fn violated<'a>(&'a self, values: &'a [f64], tol: f64) -> impl Iterator<Item=&'a Constraint> + 'a {
        self.constraints.iter().filter(move |c| !c.is_satisfied(values, tol))
    }
}

/// Builds the complete model for `data`.  Fails before creating anything if the instance is malformed.
#[instrument(level="debug", skip(data, options), fields(instance=%data.id))]
pub fn build(data: &SitingInstance, options: &ModelOptions) -> Result<(Model, Variables)> {
    validate(data, options)?;
    let mut model = Model::new();
    let vars = Variables::create(&mut model, data.n_sites(), data.n_demand(), options.subtour_elimination);
    for c in generate(data, &vars, options)? {
        model.add_constraint(c);
    }
    model.set_objective(compose(data, &vars));
    info!(sites=data.n_sites(), demand=data.n_demand(), vars=model.num_vars(), constraints=model.constraints().len(), "model built");
    Ok((model, vars))
}
