use anyhow::Result;
use super::dataset::*;
use super::dataset::siting::{SitingInstance, Weights};
use std::borrow::Cow;

pub trait DSetModify<F>: Sized {
  fn map(self, func: F) -> Mapped<Self, F>;
}

impl<D, F, I, O> DSetModify<F> for D
  where
    D: Dataset<Instance=I>,
    F: Fn(I) -> O + Sync,
{
  fn map(self, func: F) -> Mapped<D, F> { Mapped{ input: self, map: func } }
}

pub struct Mapped<D, F> {
  input: D,
  map: F,
}

impl<D, F, I> IdxNameMap for Mapped<D, F>
  where
    D: Dataset<Instance=I>,
{
  #[inline]
  fn name_to_index(&self, name: &str) -> Result<usize> {
    self.input.name_to_index(name)
  }

  #[inline]
  fn index_to_name(&self, idx: usize) -> Result<Cow<str>> {
    self.input.index_to_name(idx)
  }

  #[inline]
  fn len(&self) -> usize { self.input.len() }
}

impl<D, F, I, O> Dataset for Mapped<D, F>
  where
    D: Dataset<Instance=I>,
    F: Fn(I) -> O + Sync,
{
  type Instance = O;

  fn load_instance(&self, idx: usize) -> Result<O> {
    Ok((self.map)(self.input.load_instance(idx)?))
  }
}

/// Partial override of an instance's cost weights.  `None` fields keep the stored value.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct WeightOverrides {
  pub construction: Option<f64>,
  pub missed_supermarket: Option<f64>,
  pub travel: Option<f64>,
}

impl WeightOverrides {
  pub fn is_empty(&self) -> bool {
    self.construction.is_none() && self.missed_supermarket.is_none() && self.travel.is_none()
  }

  pub fn apply(&self, w: Weights) -> Weights {
    Weights {
      construction: self.construction.unwrap_or(w.construction),
      missed_supermarket: self.missed_supermarket.unwrap_or(w.missed_supermarket),
      travel: self.travel.unwrap_or(w.travel),
    }
  }
}

pub fn override_weights(mut data: SitingInstance, overrides: WeightOverrides) -> SitingInstance {
  data.weights = overrides.apply(data.weights);
  data
}
