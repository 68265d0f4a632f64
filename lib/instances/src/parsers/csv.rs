use std::path::Path;
use anyhow::Context;
use crate::Result;
use crate::raw::siting::CsvMatrix;
use super::{
  ParseInstance,
  nom_prelude::*,
  common,
};

/// A header-less, comma separated numeric matrix file.
#[derive(Debug, Copy, Clone)]
pub struct CsvMatrixFmt<P>(pub P);

impl<P: AsRef<Path>> ParseInstance<CsvMatrixFmt<P>> for CsvMatrix {
  fn parse(path: CsvMatrixFmt<P>) -> Result<CsvMatrix> {
    let path = path.0.as_ref();
    let data = std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    parse_str(&data).with_context(|| format!("failed to parse {:?}", path))
  }
}

pub(crate) fn parse_str(data: &str) -> Result<CsvMatrix> {
  let rows = match context("csv matrix", common::rows)(data).finish() {
    Ok((_, rows)) => rows,
    Err(e) => return Err(anyhow::Error::msg(error::convert_error(data, e))),
  };

  let nrows = rows.len();
  let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
  let mut flat = Vec::with_capacity(nrows * ncols);
  for (i, r) in rows.into_iter().enumerate() {
    if r.len() != ncols {
      anyhow::bail!("row {} has {} columns, expected {}", i, r.len(), ncols);
    }
    flat.extend(r);
  }
  Ok(CsvMatrix { nrows, ncols, data: flat })
}
