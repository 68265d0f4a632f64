use ndarray::Array2;

use crate::{SitingInstance, SitingSolution};

/// Objective value split into its three weighted components.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CostBreakdown {
    pub construction: f64,
    pub penalty: f64,
    pub travel: f64,
}

impl CostBreakdown {
    /// Recomputes the cost of opening `open` and driving `route`.  A demand point counts as
    /// unserved iff no open site can serve it, whatever a solver set its penalty variable to.
    /// `data` must pass [`crate::model::validate`] and `route` must match its distance matrix.
    pub fn evaluate(data: &SitingInstance, open: &[bool], route: &Array2<bool>) -> CostBreakdown {
        let w = &data.weights;
        let n_open = open.iter().filter(|&&o| o).count();
        let n_unserved = unserved(data, open).count();
        let distance: f64 = route.indexed_iter()
            .filter(|(_, &used)| used)
            .map(|(e, _)| data.distances[e])
            .sum();
        CostBreakdown {
            construction: w.construction * n_open as f64,
            penalty: w.missed_supermarket * n_unserved as f64,
            travel: w.travel * distance,
        }
    }

    pub fn of(data: &SitingInstance, sol: &SitingSolution) -> CostBreakdown {
        CostBreakdown::evaluate(data, &sol.open, &sol.route)
    }

    pub fn total(&self) -> f64 {
        self.construction + self.penalty + self.travel
    }
}

/// Demand points no open site can serve.
pub fn unserved<'a>(data: &'a SitingInstance, open: &'a [bool]) -> impl Iterator<Item=usize> + 'a {
    (0..data.n_demand()).filter(move |&s| !data.serving_sites(s).any(|i| open[i]))
}
