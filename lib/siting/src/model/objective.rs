use crate::SitingInstance;
use super::{VarId, Variables};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Minimize,
    Maximize,
}

/// A linear objective: `sum(coeff * var)` optimised in `direction`.
#[derive(Clone, Debug, PartialEq)]
pub struct Objective {
    pub direction: Direction,
    pub terms: Vec<(VarId, f64)>,
}

impl Objective {
    pub fn minimize(terms: Vec<(VarId, f64)>) -> Self {
        Objective { direction: Direction::Minimize, terms }
    }

    pub fn value(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|&(v, c)| c * values[v.idx()]).sum()
    }
}

impl Default for Objective {
    fn default() -> Self { Objective::minimize(Vec::new()) }
}

/// `construction * sum(X) + penalty * sum(Z) + travel * sum(distance[i][j] * Y[i][j])`.
///
/// Every variable of the three families gets a term, even when its weight is zero.
pub fn compose(data: &SitingInstance, vars: &Variables) -> Objective {
    let w = &data.weights;
    let n_nodes = vars.n_nodes();
    let mut terms = Vec::with_capacity(vars.n_sites() + vars.n_demand() + n_nodes * n_nodes);
    terms.extend((0..vars.n_sites()).map(|i| (vars.open(i), w.construction)));
    terms.extend((0..vars.n_demand()).map(|s| (vars.unserved(s), w.missed_supermarket)));
    for i in 0..n_nodes {
        for j in 0..n_nodes {
            terms.push((vars.route(i, j), w.travel * data.distances[[i, j]]));
        }
    }
    Objective::minimize(terms)
}
