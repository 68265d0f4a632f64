//! Reading and writing solutions: the `deposit_locations.csv` / `path.csv` result layout and
//! JSON reports.
use std::path::Path;
use anyhow::Context;
use itertools::Itertools;
use ndarray::Array2;
use tracing::*;

use instances::{CsvMatrixFmt, ParseInstance};
use instances::raw::siting::CsvMatrix;
use instances::write::write_csv_file;

use crate::cost::{unserved, CostBreakdown};
use crate::model::{validate, ModelOptions};
use crate::route::{Route, Violation};
use crate::{SitingInstance, SitingSolution};

pub const OPEN_SITES_FILE: &str = "deposit_locations.csv";
pub const ROUTE_FILE: &str = "path.csv";

/// Open sites and route edges as stored on disk.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredSolution {
    pub open: Vec<bool>,
    pub route: Array2<bool>,
}

impl From<&SitingSolution> for StoredSolution {
    fn from(sol: &SitingSolution) -> Self {
        StoredSolution { open: sol.open.clone(), route: sol.route.clone() }
    }
}

/// Writes `deposit_locations.csv` (one 0/1 line per site) and `path.csv` (0/1 adjacency matrix) to `dir`.
pub fn write_solution(dir: impl AsRef<Path>, sol: &SitingSolution) -> anyhow::Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {:?}", dir))?;
    let open = Array2::from_shape_fn((sol.open.len(), 1), |(i, _)| sol.open[i] as u8);
    write_csv_file(dir.join(OPEN_SITES_FILE), &open)?;
    write_csv_file(dir.join(ROUTE_FILE), &sol.route.mapv(|b| b as u8))?;
    info!(?dir, "solution written");
    Ok(())
}

fn to_binary(m: &CsvMatrix, file: &str) -> anyhow::Result<Vec<bool>> {
    m.data.iter().enumerate()
        .map(|(k, &v)| match v {
            v if v == 0.0 => Ok(false),
            v if v == 1.0 => Ok(true),
            v => anyhow::bail!("{}: entry {} is {}, expected 0 or 1", file, k, v),
        })
        .collect()
}

/// Reads a solution written by [`write_solution`] and checks its size against `data`, which
/// must pass [`validate`].  The open sites may be stored as a column or as a single row.
pub fn read_solution(data: &SitingInstance, dir: impl AsRef<Path>) -> anyhow::Result<StoredSolution> {
    validate(data, &ModelOptions::default()).with_context(|| format!("instance {} is malformed", data.id))?;
    let dir = dir.as_ref();
    let open = CsvMatrix::parse(CsvMatrixFmt(dir.join(OPEN_SITES_FILE)))?;
    if open.nrows > 1 && open.ncols > 1 {
        anyhow::bail!("{} must be a single row or column, found {}x{}", OPEN_SITES_FILE, open.nrows, open.ncols);
    }
    let open = to_binary(&open, OPEN_SITES_FILE)?;
    if open.len() != data.n_sites() {
        anyhow::bail!("{} has {} entries but instance {} has {} sites", OPEN_SITES_FILE, open.len(), data.id, data.n_sites());
    }

    let route = CsvMatrix::parse(CsvMatrixFmt(dir.join(ROUTE_FILE)))?;
    let n = data.n_nodes();
    if (route.nrows, route.ncols) != (n, n) {
        anyhow::bail!("{} is {}x{}, expected {}x{}", ROUTE_FILE, route.nrows, route.ncols, n, n);
    }
    let route = Array2::from_shape_vec((n, n), to_binary(&route, ROUTE_FILE)?)?;
    Ok(StoredSolution { open, route })
}

fn cost_json(cost: &CostBreakdown) -> json::JsonValue {
    json::object! {
        construction: cost.construction,
        penalty: cost.penalty,
        travel: cost.travel,
        total: cost.total(),
    }
}

/// Sizes, status and cost of a solve.
pub fn summary_json(data: &SitingInstance, status: &str, sol: &SitingSolution) -> json::JsonValue {
    let cost = CostBreakdown::of(data, sol);
    json::object! {
        instance: data.id.as_str(),
        status: status,
        sites: data.n_sites(),
        demand: data.n_demand(),
        objective: sol.objective,
        open: sol.open_sites().count(),
        penalized: sol.penalized.iter().filter(|&&p| p).count(),
        cost: cost_json(&cost),
    }
}

/// The summary plus open sites, penalised demand, tour and adjacency matrix.
pub fn full_json(data: &SitingInstance, status: &str, sol: &SitingSolution) -> json::JsonValue {
    let mut root = summary_json(data, status, sol);
    let (route, _) = Route::from_adjacency(&sol.route);
    root["open_sites"] = sol.open_sites().collect_vec().into();
    root["penalized_demand"] = sol.penalized.iter().positions(|&p| p).collect_vec().into();
    root["tour"] = route.tour().into();
    root["adjacency"] = sol.route.outer_iter()
        .map(|row| row.iter().map(|&b| b as u8).collect_vec())
        .collect_vec()
        .into();
    root
}

/// Cost and violations of a stored solution.
pub fn evaluation_json(data: &SitingInstance, stored: &StoredSolution, violations: &[Violation]) -> json::JsonValue {
    let cost = CostBreakdown::evaluate(data, &stored.open, &stored.route);
    json::object! {
        instance: data.id.as_str(),
        open: stored.open.iter().filter(|&&o| o).count(),
        unserved: unserved(data, &stored.open).collect_vec(),
        cost: cost_json(&cost),
        feasible: violations.is_empty(),
        violations: violations.iter().map(|v| v.to_string()).collect_vec(),
    }
}
