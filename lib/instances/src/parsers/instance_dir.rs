use std::path::Path;
use crate::Result;
use crate::raw::siting::{CsvMatrix, SitingFiles};
use crate::dataset::siting::Weights;
use super::{ParseInstance, CsvMatrixFmt, WeightsFmt};

pub const DISTANCES_FILE: &str = "distances.csv";
pub const SERVICE_FILE: &str = "service.csv";
pub const WEIGHTS_FILE: &str = "weights.json";

/// An instance directory containing `distances.csv`, `service.csv` and `weights.json`.
#[derive(Debug, Copy, Clone)]
pub struct InstanceDirFmt<P>(pub P);

impl<P: AsRef<Path>> ParseInstance<InstanceDirFmt<P>> for SitingFiles {
  fn parse(dir: InstanceDirFmt<P>) -> Result<SitingFiles> {
    let dir = dir.0.as_ref();
    let distances = CsvMatrix::parse(CsvMatrixFmt(dir.join(DISTANCES_FILE)))?;
    let service = CsvMatrix::parse(CsvMatrixFmt(dir.join(SERVICE_FILE)))?;
    let weights = Weights::parse(WeightsFmt(dir.join(WEIGHTS_FILE)))?;
    Ok(SitingFiles {
      distances,
      service,
      construction: weights.construction,
      missed_supermarket: weights.missed_supermarket,
      travel: weights.travel,
    })
  }
}
