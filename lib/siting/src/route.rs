//! Route extraction from an adjacency matrix, and feasibility checks of decoded solutions.
use std::fmt;
use ndarray::Array2;
use itertools::Itertools;

use crate::{SitingInstance, SitingSolution};

const DEPOT: usize = SitingInstance::DEPOT;

/// The single vehicle route: route nodes visited after leaving the depot, in order.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Route {
    pub visits: Vec<usize>,
    /// True if the vehicle makes it back to the depot.
    pub closed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDefect {
    SelfLoop { node: usize },
    OutDegree { node: usize, degree: usize },
    InDegree { node: usize, degree: usize },
    /// Following used edges stops at `node`, which has no outgoing edge.
    DeadEnd { node: usize },
    /// A cycle which does not pass through the depot.
    Subtour { nodes: Vec<usize> },
}

impl fmt::Display for RouteDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteDefect::SelfLoop { node } => write!(f, "self-loop at node {}", node),
            RouteDefect::OutDegree { node, degree } => write!(f, "node {} has {} outgoing edges", node, degree),
            RouteDefect::InDegree { node, degree } => write!(f, "node {} has {} incoming edges", node, degree),
            RouteDefect::DeadEnd { node } => write!(f, "route stops at node {}", node),
            RouteDefect::Subtour { nodes } => write!(f, "sub-tour {}", nodes.iter().join("-")),
        }
    }
}

fn successor(adj: &Array2<bool>, node: usize) -> Option<usize> {
    adj.row(node).iter().enumerate().position(|(j, &used)| used && j != node)
}

impl Route {
    /// Follows used edges out of the depot.  Anything the walk does not explain is returned as
    /// a defect; an empty defect list means `adj` is a single cycle through the depot, or has no
    /// edges at all.
    pub fn from_adjacency(adj: &Array2<bool>) -> (Route, Vec<RouteDefect>) {
        let n = adj.nrows();
        debug_assert_eq!(n, adj.ncols());
        let mut defects = Vec::new();
        if n == 0 {
            return (Route::default(), defects);
        }

        for node in 0..n {
            if adj[[node, node]] {
                defects.push(RouteDefect::SelfLoop { node });
            }
            let degree = (0..n).filter(|&j| j != node && adj[[node, j]]).count();
            if degree > 1 {
                defects.push(RouteDefect::OutDegree { node, degree });
            }
            let degree = (0..n).filter(|&i| i != node && adj[[i, node]]).count();
            if degree > 1 {
                defects.push(RouteDefect::InDegree { node, degree });
            }
        }

        let mut seen = vec![false; n];
        seen[DEPOT] = true;
        let mut route = Route::default();
        let mut cur = DEPOT;
        while let Some(next) = successor(adj, cur) {
            if next == DEPOT {
                route.closed = true;
                break;
            }
            if seen[next] {
                break;
            }
            seen[next] = true;
            route.visits.push(next);
            cur = next;
        }
        if !route.closed && cur != DEPOT && successor(adj, cur).is_none() {
            defects.push(RouteDefect::DeadEnd { node: cur });
        }

        for start in 0..n {
            if seen[start] || successor(adj, start).is_none() {
                continue;
            }
            let mut walk = vec![start];
            seen[start] = true;
            let mut cur = start;
            loop {
                match successor(adj, cur) {
                    None => {
                        defects.push(RouteDefect::DeadEnd { node: cur });
                        break;
                    },
                    Some(next) => {
                        if let Some(k) = walk.iter().position(|&v| v == next) {
                            defects.push(RouteDefect::Subtour { nodes: walk.split_off(k) });
                            break;
                        }
                        if seen[next] {
                            break;
                        }
                        seen[next] = true;
                        walk.push(next);
                        cur = next;
                    }
                }
            }
        }
        (route, defects)
    }

    /// Visited sites, in order.
    pub fn sites(&self) -> impl Iterator<Item=usize> + '_ {
        self.visits.iter().map(|&k| k - 1)
    }

    /// The full tour including the depot at both ends, or just the depot if the vehicle never leaves.
    pub fn tour(&self) -> Vec<usize> {
        let mut tour = Vec::with_capacity(self.visits.len() + 2);
        tour.push(DEPOT);
        tour.extend_from_slice(&self.visits);
        if self.closed {
            tour.push(DEPOT);
        }
        tour
    }
}

/// A broken invariant of a decoded solution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    Shape { what: &'static str, expected: usize, found: usize },
    /// Neither served by an open site nor penalised.
    Uncovered { demand: usize },
    DepotOutDegree { degree: usize },
    DepotInDegree { degree: usize },
    SiteOutDegree { site: usize, degree: usize, open: bool },
    SiteInDegree { site: usize, degree: usize, open: bool },
    SelfLoop { node: usize },
    /// Open site the depot's route never reaches.
    Unvisited { site: usize },
    Route(RouteDefect),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Violation::*;
        match self {
            Shape { what, expected, found } => write!(f, "{} has size {}, expected {}", what, found, expected),
            Uncovered { demand } => write!(f, "demand point {} is neither served nor penalised", demand),
            DepotOutDegree { degree } => write!(f, "depot has out-degree {}", degree),
            DepotInDegree { degree } => write!(f, "depot has in-degree {}", degree),
            SiteOutDegree { site, degree, open } =>
                write!(f, "site {} (open={}) has out-degree {}", site, open, degree),
            SiteInDegree { site, degree, open } =>
                write!(f, "site {} (open={}) has in-degree {}", site, open, degree),
            SelfLoop { node } => write!(f, "self-loop at node {}", node),
            Unvisited { site } => write!(f, "open site {} is not on the route", site),
            Route(d) => d.fmt(f),
        }
    }
}

/// Checks coverage-or-penalty, depot and site degrees, self-loops and that the route is a single
/// cycle through the depot visiting every open site.  Returns every violation found.
///
/// With no sites at all the depot must have degree zero.  If the instance itself has inconsistent
/// dimensions only [`Violation::Shape`]s are reported.
pub fn check_solution(data: &SitingInstance, sol: &SitingSolution) -> Vec<Violation> {
    let n_sites = data.n_sites();
    let n_nodes = data.n_nodes();
    let mut violations = Vec::new();
    let shapes = [
        ("distance rows", n_sites + 1, n_nodes),
        ("distance columns", n_sites + 1, data.distances.ncols()),
        ("open", n_sites, sol.open.len()),
        ("penalized", data.n_demand(), sol.penalized.len()),
        ("route rows", n_nodes, sol.route.nrows()),
        ("route columns", n_nodes, sol.route.ncols()),
    ];
    for &(what, expected, found) in &shapes {
        if expected != found {
            violations.push(Violation::Shape { what, expected, found });
        }
    }
    if !violations.is_empty() {
        return violations;
    }

    for s in 0..data.n_demand() {
        if !sol.penalized[s] && !data.serving_sites(s).any(|i| sol.open[i]) {
            violations.push(Violation::Uncovered { demand: s });
        }
    }

    let adj = &sol.route;
    let out_degree = |k: usize| (0..n_nodes).filter(|&j| j != k && adj[[k, j]]).count();
    let in_degree = |k: usize| (0..n_nodes).filter(|&i| i != k && adj[[i, k]]).count();
    let depot_degree = if n_sites > 0 { 1 } else { 0 };
    if out_degree(DEPOT) != depot_degree {
        violations.push(Violation::DepotOutDegree { degree: out_degree(DEPOT) });
    }
    if in_degree(DEPOT) != depot_degree {
        violations.push(Violation::DepotInDegree { degree: in_degree(DEPOT) });
    }
    for site in 0..n_sites {
        let k = SitingInstance::site_node(site);
        let open = sol.open[site];
        let degree = out_degree(k);
        if degree != open as usize {
            violations.push(Violation::SiteOutDegree { site, degree, open });
        }
        let degree = in_degree(k);
        if degree != open as usize {
            violations.push(Violation::SiteInDegree { site, degree, open });
        }
    }
    for node in 0..n_nodes {
        if adj[[node, node]] {
            violations.push(Violation::SelfLoop { node });
        }
    }

    let (route, defects) = Route::from_adjacency(adj);
    violations.extend(defects.into_iter()
        .filter(|d| matches!(d, RouteDefect::DeadEnd{..} | RouteDefect::Subtour{..}))
        .map(Violation::Route));
    let mut visited = vec![false; n_sites];
    for site in route.sites() {
        visited[site] = true;
    }
    for site in sol.open_sites() {
        if !visited[site] {
            violations.push(Violation::Unvisited { site });
        }
    }
    violations
}
