//! Random instances on a square grid.
use rand::Rng;
use ndarray::Array2;

use crate::dataset::siting::{SitingInstance, Weights};
use crate::raw::metrics::{self, Euclidean, Metric};

#[derive(Debug, Clone)]
pub struct GeneratorParams {
  pub n_sites: usize,
  pub n_demand: usize,
  /// Side length of the square points are drawn from.
  pub side: f64,
  /// A site serves every demand point within this Euclidean distance.
  pub service_radius: f64,
  /// Distances are rounded to this many decimal places.
  pub precision: u32,
  pub weights: Weights,
}

impl Default for GeneratorParams {
  fn default() -> Self {
    GeneratorParams {
      n_sites: 5,
      n_demand: 10,
      side: 100.0,
      service_radius: 35.0,
      precision: 0,
      weights: Weights { construction: 50.0, missed_supermarket: 200.0, travel: 1.0 },
    }
  }
}

fn random_point<R: Rng>(rng: &mut R, side: f64) -> (f64, f64) {
  (rng.gen_range(0.0, side), rng.gen_range(0.0, side))
}

/// Draws an instance: depot and sites first (route nodes `0..=n_sites`), then demand points.
/// The same seed always yields the same instance.
pub fn random_instance<R: Rng>(rng: &mut R, params: &GeneratorParams) -> SitingInstance {
  let nodes: Vec<_> = (0..=params.n_sites).map(|_| random_point(rng, params.side)).collect();
  let demand: Vec<_> = (0..params.n_demand).map(|_| random_point(rng, params.side)).collect();

  let scale = 10f64.powi(params.precision as i32);
  let distances = metrics::dist_matrix_pp(Euclidean(), &nodes, |d| (d * scale).round() / scale);

  let service = Array2::from_shape_fn((params.n_sites, params.n_demand), |(i, s)| {
    Euclidean::compute(nodes[i + 1], demand[s]) <= params.service_radius
  });

  SitingInstance {
    id: format!("random-{}-{}", params.n_sites, params.n_demand),
    distances,
    service,
    weights: params.weights,
  }
}
