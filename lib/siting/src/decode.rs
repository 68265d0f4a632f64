//! Translation of a raw solver assignment into open sites, penalties and route edges.
use ndarray::Array2;
use tracing::*;

use crate::model::{VarId, Variables};
use crate::solver::Assignment;
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodeOptions {
    /// A binary variable is accepted if it is exactly 0 or 1, or lies strictly within `tolerance`
    /// of either.  A tolerance of zero accepts exact values only.
    pub tolerance: f64,
}

impl Default for DecodeOptions {
    fn default() -> Self { DecodeOptions { tolerance: 0.5 } }
}

/// Business-level view of an optimised model.
#[derive(Clone, Debug, PartialEq)]
pub struct SitingSolution {
    /// `open[i]` iff site `i` is open.
    pub open: Vec<bool>,
    /// `penalized[s]` iff demand point `s` was left unserved.
    pub penalized: Vec<bool>,
    /// `(n + 1) x (n + 1)` adjacency matrix of used route edges, node `0` is the depot.
    pub route: Array2<bool>,
    pub objective: f64,
}

impl SitingSolution {
    pub fn n_sites(&self) -> usize { self.open.len() }

    pub fn open_sites(&self) -> impl Iterator<Item=usize> + '_ {
        self.open.iter().enumerate().filter_map(|(i, &o)| if o { Some(i) } else { None })
    }

    pub fn route_edges(&self) -> impl Iterator<Item=(usize, usize)> + '_ {
        self.route.indexed_iter().filter_map(|(e, &used)| if used { Some(e) } else { None })
    }
}

fn binary(vars: &Variables, values: &[f64], v: VarId, tol: f64) -> Result<bool> {
    let raw = values[v.idx()];
    let r = raw.round();
    if raw.is_finite() && (raw == r || (raw - r).abs() < tol) && (r == 0.0 || r == 1.0) {
        Ok(r == 1.0)
    } else {
        let var = vars.var_ref(v).expect("variable belongs to the schema");
        Err(Error::NotIntegral { var, value: raw })
    }
}

/// Rounds every `X`, `Z` and `Y` value to 0/1.  Values too far from either are reported as
/// [`Error::NotIntegral`], never coerced.  Feasibility is not re-checked.
pub fn decode(vars: &Variables, assignment: &Assignment, options: &DecodeOptions) -> Result<SitingSolution> {
    let values = &assignment.values;
    if values.len() != vars.len() {
        return Err(Error::AssignmentLength { expected: vars.len(), found: values.len() });
    }
    let tol = options.tolerance;

    let open = (0..vars.n_sites())
        .map(|i| binary(vars, values, vars.open(i), tol))
        .collect::<Result<Vec<_>>>()?;
    let penalized = (0..vars.n_demand())
        .map(|s| binary(vars, values, vars.unserved(s), tol))
        .collect::<Result<Vec<_>>>()?;

    let n_nodes = vars.n_nodes();
    let mut route = Array2::from_elem((n_nodes, n_nodes), false);
    for ((i, j), used) in route.indexed_iter_mut() {
        *used = binary(vars, values, vars.route(i, j), tol)?;
    }

    trace!(open=?open, penalized=?penalized, "decoded");
    Ok(SitingSolution { open, penalized, route, objective: assignment.objective })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Model, SubtourElimination, VarRef};

    fn schema() -> Variables {
        let mut model = Model::new();
        Variables::create(&mut model, 2, 1, SubtourElimination::Sequencing)
    }

    fn assignment(vars: &Variables, ones: &[VarId]) -> Assignment {
        let mut values = vec![0.0; vars.len()];
        for v in ones {
            values[v.idx()] = 1.0;
        }
        Assignment { objective: 42.0, values }
    }

    #[test]
    fn decodes_a_route() {
        let vars = schema();
        let ones = [vars.open(1), vars.route(0, 2), vars.route(2, 0)];
        let mut a = assignment(&vars, &ones);
        a.values[vars.position(1).unwrap().idx()] = 1.0;
        let sol = decode(&vars, &a, &DecodeOptions::default()).unwrap();
        assert_eq!(sol.open, vec![false, true]);
        assert_eq!(sol.penalized, vec![false]);
        assert_eq!(sol.route_edges().collect::<Vec<_>>(), vec![(0, 2), (2, 0)]);
        assert_eq!(sol.open_sites().collect::<Vec<_>>(), vec![1]);
        assert_eq!(sol.objective, 42.0);
        assert_eq!(sol.route.dim(), (3, 3));
    }

    #[test]
    fn rounds_within_tolerance() {
        let vars = schema();
        let mut a = assignment(&vars, &[]);
        a.values[vars.open(0).idx()] = 0.9999997;
        a.values[vars.unserved(0).idx()] = 3e-7;
        a.values[vars.route(1, 0).idx()] = -1e-9;
        let sol = decode(&vars, &a, &DecodeOptions::default()).unwrap();
        assert_eq!(sol.open, vec![true, false]);
        assert_eq!(sol.penalized, vec![false]);
        assert!(!sol.route[[1, 0]]);
    }

    #[test]
    fn flags_fractional_values() {
        let vars = schema();
        let mut a = assignment(&vars, &[]);
        a.values[vars.route(1, 2).idx()] = 0.5;
        assert_eq!(decode(&vars, &a, &DecodeOptions::default()),
                   Err(Error::NotIntegral { var: VarRef::Route(1, 2), value: 0.5 }));

        let mut a = assignment(&vars, &[]);
        a.values[vars.open(0).idx()] = 0.2;
        let strict = DecodeOptions { tolerance: 1e-6 };
        assert_eq!(decode(&vars, &a, &strict), Err(Error::NotIntegral { var: VarRef::Open(0), value: 0.2 }));
        assert!(decode(&vars, &a, &DecodeOptions::default()).is_ok());
    }

    #[test]
    fn zero_tolerance_accepts_exact_values() {
        let vars = schema();
        let exact = DecodeOptions { tolerance: 0.0 };
        let a = assignment(&vars, &[vars.open(0), vars.route(0, 1), vars.route(1, 0)]);
        let sol = decode(&vars, &a, &exact).unwrap();
        assert_eq!(sol.open, vec![true, false]);

        let mut a = assignment(&vars, &[]);
        a.values[vars.open(1).idx()] = 1e-9;
        assert_eq!(decode(&vars, &a, &exact), Err(Error::NotIntegral { var: VarRef::Open(1), value: 1e-9 }));
    }

    #[test]
    fn flags_out_of_range_values() {
        let vars = schema();
        for &bad in &[2.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut a = assignment(&vars, &[]);
            a.values[vars.unserved(0).idx()] = bad;
            match decode(&vars, &a, &DecodeOptions::default()) {
                Err(Error::NotIntegral { var: VarRef::Unserved(0), .. }) => {},
                other => panic!("{} accepted: {:?}", bad, other),
            }
        }
    }

    #[test]
    fn positions_are_not_decoded() {
        let vars = schema();
        let mut a = assignment(&vars, &[]);
        a.values[vars.position(0).unwrap().idx()] = 2.0;
        assert!(decode(&vars, &a, &DecodeOptions::default()).is_ok());
    }

    #[test]
    fn wrong_length() {
        let vars = schema();
        let a = Assignment { objective: 0.0, values: vec![0.0; 3] };
        assert_eq!(decode(&vars, &a, &DecodeOptions::default()),
                   Err(Error::AssignmentLength { expected: vars.len(), found: 3 }));
    }
}
