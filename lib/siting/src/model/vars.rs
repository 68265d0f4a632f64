//! Decision variable schema.
//!
//! For an instance with `n` sites and `m` demand points the schema holds, in creation order:
//!
//! * `X[i]`, `i < n`: binary, site `i` is open.
//! * `Y[i][j]`, `i, j <= n`: binary, the vehicle drives from route node `i` to route node `j`
//!   (node `0` is the depot, node `i + 1` is site `i`).
//! * `Z[s]`, `s < m`: binary, demand point `s` is left unserved and penalised.
//! * `P[i]`, `i < n`: integer in `[1, n]`, rank of site `i` along the route.  Only present with
//!   [`SubtourElimination::Sequencing`].
use std::fmt;
use super::{Model, SubtourElimination};

/// Index of a variable in a [`Model`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    #[inline]
    pub fn idx(&self) -> usize { self.0 }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarDomain {
    Binary,
    /// Integer with inclusive bounds.
    Integer { lb: i32, ub: i32 },
}

impl VarDomain {
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            VarDomain::Binary => (0.0, 1.0),
            VarDomain::Integer { lb, ub } => (lb as f64, ub as f64),
        }
    }
}

/// The decision a variable encodes, keyed by its indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VarRef {
    Open(usize),
    Route(usize, usize),
    Unserved(usize),
    Position(usize),
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            VarRef::Open(i) => write!(f, "X[{}]", i),
            VarRef::Route(i, j) => write!(f, "Y[{}][{}]", i, j),
            VarRef::Unserved(s) => write!(f, "Z[{}]", s),
            VarRef::Position(i) => write!(f, "P[{}]", i),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Variables {
    n_sites: usize,
    n_demand: usize,
    first: usize,
    x: Vec<VarId>,
    y: Vec<VarId>,
    z: Vec<VarId>,
    p: Option<Vec<VarId>>,
}

impl Variables {
    /// Adds every variable of the schema to `model`.  The same sizes always produce the same ids
    /// when `model` starts out identical.
    pub fn create(model: &mut Model, n_sites: usize, n_demand: usize, subtours: SubtourElimination) -> Variables {
        let n_nodes = n_sites + 1;
        let first = model.num_vars();
        let x = (0..n_sites).map(|_| model.add_var(VarDomain::Binary)).collect();
        let y = (0..n_nodes * n_nodes).map(|_| model.add_var(VarDomain::Binary)).collect();
        let z = (0..n_demand).map(|_| model.add_var(VarDomain::Binary)).collect();
        let p = match subtours {
            SubtourElimination::Sequencing => {
                let ub = n_sites as i32;
                Some((0..n_sites).map(|_| model.add_var(VarDomain::Integer { lb: 1, ub })).collect())
            },
            SubtourElimination::Disabled => None,
        };
        Variables { n_sites, n_demand, first, x, y, z, p }
    }

    #[inline]
    pub fn n_sites(&self) -> usize { self.n_sites }

    #[inline]
    pub fn n_nodes(&self) -> usize { self.n_sites + 1 }

    #[inline]
    pub fn n_demand(&self) -> usize { self.n_demand }

    /// Total number of variables in the schema.
    pub fn len(&self) -> usize {
        self.x.len() + self.y.len() + self.z.len() + self.p.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    #[inline]
    pub fn open(&self, i: usize) -> VarId { self.x[i] }

    #[inline]
    pub fn route(&self, i: usize, j: usize) -> VarId {
        assert!(i < self.n_nodes() && j < self.n_nodes(), "route node out of range");
        self.y[i * self.n_nodes() + j]
    }

    #[inline]
    pub fn unserved(&self, s: usize) -> VarId { self.z[s] }

    #[inline]
    pub fn position(&self, i: usize) -> Option<VarId> {
        self.p.as_ref().map(|p| p[i])
    }

    pub fn has_positions(&self) -> bool { self.p.is_some() }

    /// Inverse of the accessors above.
    pub fn var_ref(&self, v: VarId) -> Option<VarRef> {
        let mut k = v.0.checked_sub(self.first)?;
        if k < self.x.len() {
            return Some(VarRef::Open(k));
        }
        k -= self.x.len();
        if k < self.y.len() {
            return Some(VarRef::Route(k / self.n_nodes(), k % self.n_nodes()));
        }
        k -= self.y.len();
        if k < self.z.len() {
            return Some(VarRef::Unserved(k));
        }
        k -= self.z.len();
        match &self.p {
            Some(p) if k < p.len() => Some(VarRef::Position(k)),
            _ => None,
        }
    }

    pub fn var_id(&self, r: VarRef) -> Option<VarId> {
        match r {
            VarRef::Open(i) => self.x.get(i).copied(),
            VarRef::Route(i, j) if i < self.n_nodes() && j < self.n_nodes() => Some(self.route(i, j)),
            VarRef::Route(..) => None,
            VarRef::Unserved(s) => self.z.get(s).copied(),
            VarRef::Position(i) => self.p.as_ref().and_then(|p| p.get(i).copied()),
        }
    }
}
