use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;
use anyhow::Context;
use itertools::Itertools;
use ndarray::Array2;

use crate::Result;
use crate::dataset::siting::SitingInstance;
use crate::parsers::{DISTANCES_FILE, SERVICE_FILE, WEIGHTS_FILE};

/// Writes `m` as header-less CSV, one line per row.
pub fn write_csv<T: Display>(mut buf: impl Write, m: &Array2<T>) -> io::Result<()> {
  for row in m.outer_iter() {
    writeln!(buf, "{}", row.iter().join(","))?;
  }
  Ok(())
}

pub fn write_csv_file<T: Display>(path: impl AsRef<Path>, m: &Array2<T>) -> Result<()> {
  let path = path.as_ref();
  let file = std::fs::File::create(path).with_context(|| format!("failed to create {:?}", path))?;
  let mut writer = io::BufWriter::new(file);
  write_csv(&mut writer, m)?;
  writer.flush()?;
  Ok(())
}

/// Writes the instance into `dir` (created if missing) in the layout read by [`crate::load_instance_dir`].
pub fn write_instance(dir: impl AsRef<Path>, data: &SitingInstance) -> Result<()> {
  let dir = dir.as_ref();
  std::fs::create_dir_all(dir).with_context(|| format!("failed to create {:?}", dir))?;
  write_csv_file(dir.join(DISTANCES_FILE), &data.distances)?;
  write_csv_file(dir.join(SERVICE_FILE), &data.service.mapv(|b| b as u8))?;
  let weights = json::object! {
    construction: data.weights.construction,
    missed_supermarket: data.weights.missed_supermarket,
    travel: data.weights.travel,
  };
  let path = dir.join(WEIGHTS_FILE);
  std::fs::write(&path, weights.pretty(2)).with_context(|| format!("failed to write {:?}", path))?;
  Ok(())
}
