use std::path::Path;
use anyhow::Context;
use crate::Result;
use crate::dataset::siting::Weights;
use super::ParseInstance;

/// A JSON object holding the `construction`, `missed_supermarket` and `travel` cost weights.
#[derive(Debug, Copy, Clone)]
pub struct WeightsFmt<P>(pub P);

impl<P: AsRef<Path>> ParseInstance<WeightsFmt<P>> for Weights {
  fn parse(path: WeightsFmt<P>) -> Result<Weights> {
    let path = path.0.as_ref();
    let data = std::fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    parse_str(&data).with_context(|| format!("failed to parse {:?}", path))
  }
}

pub(crate) fn parse_str(data: &str) -> Result<Weights> {
  let root = json::parse(data)?;
  if !root.is_object() {
    anyhow::bail!("expected a JSON object");
  }
  let field = |name: &str| -> Result<f64> {
    root[name].as_f64().ok_or_else(|| anyhow::anyhow!("missing or non-numeric field `{}`", name))
  };
  Ok(Weights {
    construction: field("construction")?,
    missed_supermarket: field("missed_supermarket")?,
    travel: field("travel")?,
  })
}
