use super::*;
use crate::parsers::{ParseInstance, InstanceDirFmt};
use crate::raw::{
  FromRaw,
  siting::{CsvMatrix, SitingFiles},
};
use ndarray::Array2;

/// Cost multipliers of the three objective components.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Weights {
  /// Cost per opened site.
  pub construction: f64,
  /// Penalty per unserved demand point.
  pub missed_supermarket: f64,
  /// Cost per unit of travelled distance.
  pub travel: f64,
}

/// One static facility-siting instance.
///
/// Route node `0` is the depot, route node `i + 1` is site `i`.  Dimensions are not checked here:
/// `distances` should be `(n_sites + 1) x (n_sites + 1)` and `service` should be
/// `n_sites x n_demand`, but callers building a model are expected to validate this themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct SitingInstance {
  pub id: String,
  pub distances: Array2<f64>,
  pub service: Array2<bool>,
  pub weights: Weights,
}

impl SitingInstance {
  pub const DEPOT: usize = 0;

  #[inline]
  pub fn n_sites(&self) -> usize { self.service.nrows() }

  #[inline]
  pub fn n_demand(&self) -> usize { self.service.ncols() }

  #[inline]
  pub fn n_nodes(&self) -> usize { self.distances.nrows() }

  /// Route node of site `i`.
  #[inline]
  pub fn site_node(i: usize) -> usize { i + 1 }

  /// Sites able to serve demand point `s`.
  pub fn serving_sites(&self, s: usize) -> impl Iterator<Item=usize> + '_ {
    self.service.column(s)
      .into_iter()
      .enumerate()
      .filter_map(|(i, &can)| if can { Some(i) } else { None })
  }

  /// Demand points no site can serve.  These are always penalised.
  pub fn unservable_demand(&self) -> Vec<usize> {
    (0..self.n_demand())
      .filter(|&s| self.serving_sites(s).next().is_none())
      .collect()
  }
}

fn to_array<T>(m: &CsvMatrix, f: impl Fn(f64) -> T) -> Array2<T> {
  Array2::from_shape_fn((m.nrows, m.ncols), |(i, j)| f(m.get(i, j)))
}

impl FromRaw<SitingFiles> for SitingInstance {
  fn from_raw(raw: SitingFiles, id: Cow<str>) -> SitingInstance {
    SitingInstance {
      id: id.into_owned(),
      distances: to_array(&raw.distances, |d| d),
      service: to_array(&raw.service, |v| v != 0.0),
      weights: Weights {
        construction: raw.construction,
        missed_supermarket: raw.missed_supermarket,
        travel: raw.travel,
      },
    }
  }
}

/// Loads the instance stored in directory `dir`; its id is the directory name.
pub fn load_instance_dir(dir: impl AsRef<Path>) -> Result<SitingInstance> {
  let dir = dir.as_ref();
  let id = dir.file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| dir.to_string_lossy().into_owned());
  let raw = SitingFiles::parse(InstanceDirFmt(dir)).context(format!("failed to load {:?}", dir))?;
  tracing::debug!(id=%id, nodes=raw.distances.nrows, sites=raw.service.nrows, demand=raw.service.ncols, "loaded instance");
  Ok(SitingInstance::from_raw(raw, Cow::Owned(id)))
}

pub enum SitingDir {}

impl Dataset for StdLayout<SitingDir> {
  type Instance = SitingInstance;

  fn load_instance(&self, idx: usize) -> Result<Self::Instance> {
    let instance = self.index_to_name(idx)?;
    let path = self.dir.join(&*instance);
    let raw = SitingFiles::parse(InstanceDirFmt(&path)).context(format!("failed to load {:?}", path))?;
    Ok(SitingInstance::from_raw(raw, instance))
  }
}

impl Dataset for DynLayout<SitingDir> {
  type Instance = SitingInstance;

  fn load_instance(&self, idx: usize) -> Result<Self::Instance> {
    self.check_idx(idx)?;
    load_instance_dir(&self.name_order[idx])
  }
}

/// The default dataset, `$DATA_ROOT/siting`.
pub fn default_dataset() -> Result<StdLayout<SitingDir>> {
  StdLayout::new("siting")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/siting")
  }

  #[test]
  fn load_tiny() -> Result<()> {
    let data = load_instance_dir(data_dir().join("tiny"))?;
    assert_eq!(data.id, "tiny");
    assert_eq!(data.n_sites(), 1);
    assert_eq!(data.n_demand(), 1);
    assert_eq!(data.n_nodes(), 2);
    assert_eq!(data.distances[[0, 1]], 5.0);
    assert!(data.service[[0, 0]]);
    assert_eq!(data.weights, Weights { construction: 10.0, missed_supermarket: 100.0, travel: 1.0 });
    Ok(())
  }

  #[test]
  fn load_through_dataset() -> Result<()> {
    let dset: StdLayout<SitingDir> = StdLayout::with_root(data_dir())?;
    let data = dset.load_instance_by_name("triangle")?;
    assert_eq!(data.id, "triangle");
    assert_eq!(data.n_sites(), 3);
    assert_eq!(data.n_demand(), 4);
    assert_eq!(data.n_nodes(), 4);
    Ok(())
  }

  #[test]
  fn serving_sites_and_unservable() -> Result<()> {
    let data = load_instance_dir(data_dir().join("triangle"))?;
    assert_eq!(data.serving_sites(0).collect::<Vec<_>>(), vec![0]);
    assert_eq!(data.serving_sites(1).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(data.unservable_demand(), vec![3]);
    Ok(())
  }

  #[test]
  fn missing_instance() {
    assert!(load_instance_dir(data_dir().join("non-existent")).is_err());
  }
}
