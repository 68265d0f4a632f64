/// A dense matrix read from a header-less CSV file, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvMatrix {
  pub nrows: usize,
  pub ncols: usize,
  pub data: Vec<f64>,
}

impl CsvMatrix {
  pub fn get(&self, i: usize, j: usize) -> f64 {
    self.data[i * self.ncols + j]
  }
}

/// The three files of an instance directory, as read from disk.
#[derive(Debug, Clone)]
pub struct SitingFiles {
  pub distances: CsvMatrix,
  pub service: CsvMatrix,
  pub construction: f64,
  pub missed_supermarket: f64,
  pub travel: f64,
}
