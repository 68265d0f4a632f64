use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::{Error, Map};
use std::borrow::Cow;


pub trait IdxNameMap {
  fn index_to_name(&self, idx: usize) -> Result<Cow<str>>;

  fn name_to_index(&self, name: &str) -> Result<usize>;

  fn len(&self) -> usize;

  fn is_empty(&self) -> bool { self.len() == 0 }

  fn check_idx(&self, idx: usize) -> Result<()> {
    if self.len() <= idx {
      Err(Error::IndexOutOfRange.into())
    } else {
      Ok(())
    }
  }
}


impl<'a, D: IdxNameMap> IdxNameMap for &'a D {
  fn index_to_name(&self, idx: usize) -> Result<Cow<str>> {
    D::index_to_name(self, idx)
  }

  fn name_to_index(&self, name: &str) -> Result<usize> {
    D::name_to_index(self, name)
  }

  fn len(&self) -> usize {
    D::len(self)
  }
}

pub trait Dataset: IdxNameMap + Sync {
  type Instance;
  fn load_instance(&self, idx: usize) -> Result<Self::Instance>;

  fn load_instance_by_name(&self, name: &str) -> Result<Self::Instance> {
    self.load_instance(self.name_to_index(name)?)
  }
}


impl<'a, D: Dataset> Dataset for &'a D {
  type Instance = D::Instance;

  fn load_instance(&self, idx: usize) -> Result<Self::Instance> {
    D::load_instance(self, idx)
  }
}

/// Resolves `dir` against the `DATA_ROOT` environment variable.
pub fn data_root_dir(dir: impl AsRef<Path>) -> Result<PathBuf> {
  let root = std::env::var("DATA_ROOT").context("environment variable DATA_ROOT must be defined")?;
  Ok(Path::new(&root).join(dir))
}


/// A Standard Layout Dataset: a directory containing one sub-directory per instance and an `INDEX.txt` index file.
/// The index file contains a new-line separated list of instance names, which acts as a map from index -> name.
/// Each instance lives in the sub-directory `NAME`.
pub struct StdLayout<D> {
  _marker: PhantomData<D>,
  name_order: Vec<String>,
  name_to_idx_map: Map<String, usize>,
  dir: PathBuf,
}


impl<D> StdLayout<D> {
  /// Opens `$DATA_ROOT/dir`.
  pub fn new(dir: impl AsRef<Path>) -> Result<StdLayout<D>> {
    Self::with_root(data_root_dir(dir)?)
  }

  pub fn with_root(dir: impl AsRef<Path>) -> Result<StdLayout<D>> {
    let dir = dir.as_ref();
    let ctx = format!("try read directory {:?}", dir);
    let dir = dir.canonicalize().context(ctx)?;

    let index = dir.join("INDEX.txt");
    let contents = std::fs::read_to_string(&index).with_context(|| format!("failed to read {:?}", index))?;
    let name_order: Vec<String> = contents.split_whitespace().map(|s| s.trim().to_string()).collect();
    let name_to_idx_map: Map<_, _> = name_order.iter().enumerate().map(|(i, s)| (s.clone(), i)).collect();

    Ok(StdLayout {
      _marker: PhantomData {},
      name_order,
      name_to_idx_map,
      dir,
    })
  }

  pub fn dir(&self) -> &Path { &self.dir }
}

impl<D> IdxNameMap for StdLayout<D> {
  fn index_to_name(&self, idx: usize) -> Result<Cow<str>> {
    self.check_idx(idx)?;
    Ok(Cow::Borrowed(&self.name_order[idx]))
  }

  fn name_to_index(&self, name: &str) -> Result<usize> {
    self.name_to_idx_map.get(name)
      .copied()
      .ok_or_else(|| anyhow::Error::from(Error::UnkownInstanceName).context(format!("no instance named `{}`", name)))
  }

  fn len(&self) -> usize { self.name_order.len() }
}


/// A Dynamic Layout Dataset: instance sub-directories are discovered with a glob pattern rather than
/// listed in an index file.  Instances are ordered by path.
pub struct DynLayout<D> {
  _marker: PhantomData<D>,
  name_order: Vec<PathBuf>,
  name_to_idx_map: Map<String, usize>,
}

impl<D> DynLayout<D> {
  /// Opens `$DATA_ROOT/dir` and collects every entry matching `patt`.
  pub fn new(dir: impl AsRef<Path>, patt: &str) -> Result<Self> {
    Self::with_root(data_root_dir(dir)?, patt)
  }

  pub fn with_root(dir: impl AsRef<Path>, patt: &str) -> Result<Self> {
    let mut p = dir.as_ref().to_string_lossy().into_owned();
    p.push('/');
    p.push_str(patt);

    let names : std::result::Result<Vec<PathBuf>, _> = glob::glob(&p)?.collect();
    let mut name_order = names?;
    name_order.retain(|p| p.is_dir());
    name_order.sort();
    let name_to_idx_map: Result<Map<_, _>> = name_order.iter()
      .enumerate()
      .map(|(k, p)| {
        let n = p.file_name().ok_or_else(|| anyhow::anyhow!("missing file name: {:?}", p))?;
        Ok((n.to_string_lossy().into_owned(), k))
      })
      .collect();
    let name_to_idx_map = name_to_idx_map?;
    Ok(DynLayout {
      _marker: Default::default(),
      name_order,
      name_to_idx_map
    })
  }
}

impl<D> IdxNameMap for DynLayout<D> {
  fn index_to_name(&self, idx: usize) -> Result<Cow<str>> {
    self.check_idx(idx)?;
    let name = self.name_order[idx].file_name()
      .ok_or_else(|| anyhow::anyhow!("missing file name for idx {}", idx))?;
    Ok(name.to_string_lossy())
  }

  fn name_to_index(&self, name: &str) -> Result<usize> {
    let idx = *self.name_to_idx_map.get(name).ok_or(Error::UnkownInstanceName)?;
    Ok(idx)
  }

  fn len(&self) -> usize { self.name_order.len() }
}


pub mod siting;
