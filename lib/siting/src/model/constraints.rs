use tracing::*;
use itertools::Itertools;

use crate::{Error, Result, SitingInstance};
use super::{ModelOptions, SubtourElimination, VarId, Variables};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sense {
    Le,
    Eq,
    Ge,
}

/// Identifies which family, and which member of the family, a constraint belongs to.
/// Site and demand indices are 0-based; `node` is a route node (0 = depot).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintTag {
    Coverage { demand: usize },
    DepotOut,
    DepotIn,
    SiteOut { site: usize },
    SiteIn { site: usize },
    Subtour { from: usize, to: usize },
    NoSelfLoop { node: usize },
    FixOpen { site: usize },
    FixClosed { site: usize },
}

/// `sum(coeff * var) <sense> rhs`.  No variable appears twice in `terms`.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub tag: ConstraintTag,
    pub terms: Vec<(VarId, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

impl Constraint {
    fn new(tag: ConstraintTag, terms: Vec<(VarId, f64)>, sense: Sense, rhs: f64) -> Self {
        Constraint { tag, terms, sense, rhs }
    }

    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|&(v, a)| a * values[v.idx()]).sum()
    }

    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        let lhs = self.lhs(values);
        match self.sense {
            Sense::Le => lhs <= self.rhs + tol,
            Sense::Eq => (lhs - self.rhs).abs() <= tol,
            Sense::Ge => lhs >= self.rhs - tol,
        }
    }
}

/// Rejects instances whose matrices cannot describe a depot plus `n` sites, and fixings that
/// name sites which do not exist.
pub fn validate(data: &SitingInstance, options: &ModelOptions) -> Result<()> {
    let (rows, cols) = data.distances.dim();
    if rows == 0 {
        return Err(Error::EmptyDistanceMatrix);
    }
    if rows != cols {
        return Err(Error::DistanceMatrixNotSquare { rows, cols });
    }
    if data.service.nrows() != rows - 1 {
        return Err(Error::ServiceRowMismatch { expected: rows - 1, found: data.service.nrows() });
    }
    if let Some(((from, to), &value)) = data.distances.indexed_iter().find(|(_, d)| !d.is_finite()) {
        return Err(Error::NonFiniteDistance { from, to, value });
    }
    if let Some(((from, to), &value)) = data.distances.indexed_iter().find(|(_, &d)| d < 0.0) {
        return Err(Error::NegativeDistance { from, to, value });
    }
    let w = &data.weights;
    for &(name, value) in &[("construction", w.construction), ("missed_supermarket", w.missed_supermarket), ("travel", w.travel)] {
        if !value.is_finite() {
            return Err(Error::NonFiniteWeight { name, value });
        }
    }
    let n_sites = data.n_sites();
    if let Some(&site) = options.fixed_open.iter().chain(&options.fixed_closed).find(|&&i| i >= n_sites) {
        return Err(Error::SiteOutOfRange { site, n_sites });
    }
    Ok(())
}

fn coverage(data: &SitingInstance, vars: &Variables, out: &mut Vec<Constraint>) {
    for s in 0..vars.n_demand() {
        let mut terms: Vec<_> = data.serving_sites(s).map(|i| (vars.open(i), 1.0)).collect();
        if terms.is_empty() {
            warn!(demand=s, "no site can serve demand point, it will always be penalised");
        }
        terms.push((vars.unserved(s), 1.0));
        out.push(Constraint::new(ConstraintTag::Coverage { demand: s }, terms, Sense::Ge, 1.0));
    }
}

fn depot_degree(vars: &Variables, out: &mut Vec<Constraint>) {
    // With no sites there is nowhere to drive to; the vehicle stays at the depot.
    if vars.n_sites() == 0 {
        debug!("no sites, depot degree constraints omitted");
        return;
    }
    let sites = 1..vars.n_nodes();
    let terms = sites.clone().map(|j| (vars.route(0, j), 1.0)).collect();
    out.push(Constraint::new(ConstraintTag::DepotOut, terms, Sense::Eq, 1.0));
    let terms = sites.map(|i| (vars.route(i, 0), 1.0)).collect();
    out.push(Constraint::new(ConstraintTag::DepotIn, terms, Sense::Eq, 1.0));
}

fn site_degree(vars: &Variables, out: &mut Vec<Constraint>) {
    let n_nodes = vars.n_nodes();
    for site in 0..vars.n_sites() {
        let k = SitingInstance::site_node(site);
        let mut terms: Vec<_> = (0..n_nodes).filter(|&j| j != k).map(|j| (vars.route(k, j), 1.0)).collect();
        terms.push((vars.open(site), -1.0));
        out.push(Constraint::new(ConstraintTag::SiteOut { site }, terms, Sense::Eq, 0.0));

        let mut terms: Vec<_> = (0..n_nodes).filter(|&j| j != k).map(|j| (vars.route(j, k), 1.0)).collect();
        terms.push((vars.open(site), -1.0));
        out.push(Constraint::new(ConstraintTag::SiteIn { site }, terms, Sense::Eq, 0.0));
    }
}

/// `P[i] - P[j] + n * Y[i][j] <= n - 1` for every ordered pair of distinct sites.
fn sequencing(vars: &Variables, out: &mut Vec<Constraint>) {
    let n = vars.n_sites();
    let big_m = n as f64;
    for (from, to) in (0..n).cartesian_product(0..n).filter(|(i, j)| i != j) {
        let (pi, pj) = match (vars.position(from), vars.position(to)) {
            (Some(pi), Some(pj)) => (pi, pj),
            _ => return,
        };
        let y = vars.route(SitingInstance::site_node(from), SitingInstance::site_node(to));
        let terms = vec![(pi, 1.0), (pj, -1.0), (y, big_m)];
        out.push(Constraint::new(ConstraintTag::Subtour { from, to }, terms, Sense::Le, big_m - 1.0));
    }
}

fn no_self_loops(vars: &Variables, out: &mut Vec<Constraint>) {
    for node in 0..vars.n_nodes() {
        out.push(Constraint::new(ConstraintTag::NoSelfLoop { node }, vec![(vars.route(node, node), 1.0)], Sense::Eq, 0.0));
    }
}

fn fixings(vars: &Variables, options: &ModelOptions, out: &mut Vec<Constraint>) {
    for &site in &options.fixed_open {
        out.push(Constraint::new(ConstraintTag::FixOpen { site }, vec![(vars.open(site), 1.0)], Sense::Eq, 1.0));
    }
    for &site in &options.fixed_closed {
        out.push(Constraint::new(ConstraintTag::FixClosed { site }, vec![(vars.open(site), 1.0)], Sense::Eq, 0.0));
    }
}

/// Produces the full constraint set for `data` over the variables in `vars`, after validating
/// the instance.  The output order is fixed: coverage, depot degree, site degree, sequencing,
/// self-loops, fixings.
#[instrument(level="debug", skip(data, vars, options), fields(instance=%data.id))]
pub fn generate(data: &SitingInstance, vars: &Variables, options: &ModelOptions) -> Result<Vec<Constraint>> {
    validate(data, options)?;
    if (vars.n_sites(), vars.n_demand()) != (data.n_sites(), data.n_demand()) {
        return Err(Error::SchemaMismatch {
            expected: (data.n_sites(), data.n_demand()),
            found: (vars.n_sites(), vars.n_demand()),
        });
    }

    let n = vars.n_sites();
    let mut out = Vec::with_capacity(vars.n_demand() + 2 + 2 * n + n * n + n + 1);
    coverage(data, vars, &mut out);
    depot_degree(vars, &mut out);
    site_degree(vars, &mut out);
    match options.subtour_elimination {
        SubtourElimination::Sequencing => sequencing(vars, &mut out),
        SubtourElimination::Disabled => debug!("sub-tour elimination disabled, model is a relaxation"),
    }
    no_self_loops(vars, &mut out);
    fixings(vars, options, &mut out);
    trace!(count=out.len(), "constraints generated");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use crate::Set;
    use instances::Weights;
    use ndarray::{arr2, Array2};

    fn weights() -> Weights {
        Weights { construction: 10.0, missed_supermarket: 100.0, travel: 1.0 }
    }

    fn instance(distances: Array2<f64>, service: Array2<bool>) -> SitingInstance {
        SitingInstance { id: "test".into(), distances, service, weights: weights() }
    }

    fn three_sites() -> SitingInstance {
        instance(
            arr2(&[[0., 4., 6., 8.], [4., 0., 3., 7.], [6., 3., 0., 5.], [8., 7., 5., 0.]]),
            arr2(&[[true, true, false], [false, true, false], [false, false, false]]),
        )
    }

    fn generate_for(data: &SitingInstance, options: &ModelOptions) -> (Variables, Vec<Constraint>) {
        let mut model = Model::new();
        let vars = Variables::create(&mut model, data.n_sites(), data.n_demand(), options.subtour_elimination);
        let cons = generate(data, &vars, options).unwrap();
        (vars, cons)
    }

    fn tagged<'a>(cons: &'a [Constraint], tag: ConstraintTag) -> &'a Constraint {
        cons.iter().find(|c| c.tag == tag).unwrap()
    }

    #[test]
    fn family_sizes() {
        let data = three_sites();
        let (_, cons) = generate_for(&data, &ModelOptions::default());
        let count = |f: fn(&ConstraintTag) -> bool| cons.iter().filter(|c| f(&c.tag)).count();
        assert_eq!(count(|t| matches!(t, ConstraintTag::Coverage{..})), 3);
        assert_eq!(count(|t| matches!(t, ConstraintTag::DepotOut | ConstraintTag::DepotIn)), 2);
        assert_eq!(count(|t| matches!(t, ConstraintTag::SiteOut{..} | ConstraintTag::SiteIn{..})), 6);
        assert_eq!(count(|t| matches!(t, ConstraintTag::Subtour{..})), 6);
        assert_eq!(count(|t| matches!(t, ConstraintTag::NoSelfLoop{..})), 4);
        assert_eq!(cons.len(), 3 + 2 + 6 + 6 + 4);
    }

    #[test]
    fn coverage_uses_only_serving_sites() {
        let data = three_sites();
        let (vars, cons) = generate_for(&data, &ModelOptions::default());
        let c = tagged(&cons, ConstraintTag::Coverage { demand: 1 });
        assert_eq!(c.terms, vec![(vars.open(0), 1.0), (vars.open(1), 1.0), (vars.unserved(1), 1.0)]);
        assert_eq!((c.sense, c.rhs), (Sense::Ge, 1.0));

        // demand point 2 has no serving site: Z[2] >= 1
        let c = tagged(&cons, ConstraintTag::Coverage { demand: 2 });
        assert_eq!(c.terms, vec![(vars.unserved(2), 1.0)]);
    }

    #[test]
    fn depot_and_site_degree() {
        let data = three_sites();
        let (vars, cons) = generate_for(&data, &ModelOptions::default());
        let c = tagged(&cons, ConstraintTag::DepotOut);
        assert_eq!(c.terms, (1..4).map(|j| (vars.route(0, j), 1.0)).collect::<Vec<_>>());
        assert_eq!((c.sense, c.rhs), (Sense::Eq, 1.0));
        let c = tagged(&cons, ConstraintTag::DepotIn);
        assert_eq!(c.terms, (1..4).map(|i| (vars.route(i, 0), 1.0)).collect::<Vec<_>>());

        let c = tagged(&cons, ConstraintTag::SiteOut { site: 1 });
        assert_eq!(c.terms, vec![
            (vars.route(2, 0), 1.0), (vars.route(2, 1), 1.0), (vars.route(2, 3), 1.0), (vars.open(1), -1.0)
        ]);
        assert_eq!((c.sense, c.rhs), (Sense::Eq, 0.0));
        let c = tagged(&cons, ConstraintTag::SiteIn { site: 1 });
        assert_eq!(c.terms, vec![
            (vars.route(0, 2), 1.0), (vars.route(1, 2), 1.0), (vars.route(3, 2), 1.0), (vars.open(1), -1.0)
        ]);
    }

    #[test]
    fn sequencing_coefficients() {
        let data = three_sites();
        let (vars, cons) = generate_for(&data, &ModelOptions::default());
        let c = tagged(&cons, ConstraintTag::Subtour { from: 2, to: 0 });
        assert_eq!(c.terms, vec![
            (vars.position(2).unwrap(), 1.0), (vars.position(0).unwrap(), -1.0), (vars.route(3, 1), 3.0)
        ]);
        assert_eq!((c.sense, c.rhs), (Sense::Le, 2.0));
    }

    #[test]
    fn sequencing_is_vacuous_without_the_edge() {
        let data = three_sites();
        let (vars, cons) = generate_for(&data, &ModelOptions::default());
        let c = tagged(&cons, ConstraintTag::Subtour { from: 0, to: 1 });
        let mut values = vec![0.0; vars.len()];
        // worst case ranks: P[0] = n, P[1] = 1
        values[vars.position(0).unwrap().idx()] = 3.0;
        values[vars.position(1).unwrap().idx()] = 1.0;
        assert!(c.is_satisfied(&values, 1e-9));
        values[vars.route(1, 2).idx()] = 1.0;
        assert!(!c.is_satisfied(&values, 1e-9));
    }

    #[test]
    fn sequencing_disabled() {
        let data = three_sites();
        let options = ModelOptions { subtour_elimination: SubtourElimination::Disabled, ..Default::default() };
        let (_, cons) = generate_for(&data, &options);
        assert!(cons.iter().all(|c| !matches!(c.tag, ConstraintTag::Subtour{..})));
    }

    #[test]
    fn no_variable_twice_in_a_constraint() {
        let data = three_sites();
        let (_, cons) = generate_for(&data, &ModelOptions::default());
        for c in &cons {
            let distinct: Set<_> = c.terms.iter().map(|&(v, _)| v).collect();
            assert_eq!(distinct.len(), c.terms.len(), "{:?}", c.tag);
        }
    }

    #[test]
    fn fixings() {
        let data = three_sites();
        let options = ModelOptions { fixed_open: vec![2], fixed_closed: vec![0], ..Default::default() };
        let (vars, cons) = generate_for(&data, &options);
        let c = tagged(&cons, ConstraintTag::FixOpen { site: 2 });
        assert_eq!((c.terms.clone(), c.rhs), (vec![(vars.open(2), 1.0)], 1.0));
        let c = tagged(&cons, ConstraintTag::FixClosed { site: 0 });
        assert_eq!((c.terms.clone(), c.rhs), (vec![(vars.open(0), 1.0)], 0.0));
    }

    #[test]
    fn no_sites_omits_depot_degree() {
        let data = instance(arr2(&[[0.0]]), Array2::from_elem((0, 1), false));
        let (vars, cons) = generate_for(&data, &ModelOptions::default());
        assert_eq!(cons.len(), 2);
        assert_eq!(cons[0].tag, ConstraintTag::Coverage { demand: 0 });
        assert_eq!(cons[0].terms, vec![(vars.unserved(0), 1.0)]);
        assert_eq!(cons[1].tag, ConstraintTag::NoSelfLoop { node: 0 });
    }

    #[test]
    fn generation_is_idempotent() {
        let data = three_sites();
        let options = ModelOptions { fixed_open: vec![1], ..Default::default() };
        assert_eq!(generate_for(&data, &options), generate_for(&data, &options));
    }

    #[test]
    fn rejects_malformed_instances() {
        let options = ModelOptions::default();
        let data = instance(Array2::zeros((0, 0)), Array2::from_elem((0, 0), false));
        assert_eq!(validate(&data, &options), Err(Error::EmptyDistanceMatrix));

        let data = instance(Array2::zeros((2, 3)), Array2::from_elem((1, 1), true));
        assert_eq!(validate(&data, &options), Err(Error::DistanceMatrixNotSquare { rows: 2, cols: 3 }));

        let data = instance(Array2::zeros((3, 3)), Array2::from_elem((1, 4), true));
        assert_eq!(validate(&data, &options), Err(Error::ServiceRowMismatch { expected: 2, found: 1 }));

        let mut data = three_sites();
        data.distances[[2, 1]] = -0.5;
        assert_eq!(validate(&data, &options), Err(Error::NegativeDistance { from: 2, to: 1, value: -0.5 }));

        let mut data = three_sites();
        data.distances[[0, 3]] = f64::INFINITY;
        assert!(matches!(validate(&data, &options), Err(Error::NonFiniteDistance { from: 0, to: 3, .. })));

        let mut data = three_sites();
        data.weights.travel = f64::NAN;
        assert!(matches!(validate(&data, &options), Err(Error::NonFiniteWeight { name: "travel", .. })));

        let data = three_sites();
        let options = ModelOptions { fixed_closed: vec![3], ..Default::default() };
        assert_eq!(validate(&data, &options), Err(Error::SiteOutOfRange { site: 3, n_sites: 3 }));
    }

    #[test]
    fn generate_fails_fast() {
        let data = instance(Array2::zeros((3, 3)), Array2::from_elem((1, 4), true));
        let mut model = Model::new();
        let vars = Variables::create(&mut model, 1, 4, SubtourElimination::Sequencing);
        assert!(generate(&data, &vars, &ModelOptions::default()).is_err());
    }

    #[test]
    fn variables_of_another_instance() {
        let data = three_sites();
        let mut model = Model::new();
        let vars = Variables::create(&mut model, 2, 3, SubtourElimination::Sequencing);
        assert_eq!(generate(&data, &vars, &ModelOptions::default()),
                   Err(Error::SchemaMismatch { expected: (3, 3), found: (2, 3) }));
    }
}
