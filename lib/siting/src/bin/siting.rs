use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use rand::SeedableRng;
use structopt::StructOpt;
use tracing::*;

use instances::dataset::Dataset;
use instances::generate::{random_instance, GeneratorParams};
use instances::modify::{override_weights, DSetModify, WeightOverrides};

use siting::*;
use siting::output::{evaluation_json, full_json, read_solution, summary_json, write_solution, StoredSolution};
use siting::route::{check_solution, Violation};
use siting::solver::MicrolpSolver;

mod common;
use common::*;

#[derive(Debug, StructOpt)]
struct WeightArgs {
    /// Override the construction cost per open site.
    #[structopt(long)]
    construction: Option<f64>,
    /// Override the penalty per unserved demand point.
    #[structopt(long)]
    penalty: Option<f64>,
    /// Override the cost per unit distance.
    #[structopt(long)]
    travel: Option<f64>,
}

impl From<&WeightArgs> for WeightOverrides {
    fn from(w: &WeightArgs) -> Self {
        WeightOverrides { construction: w.construction, missed_supermarket: w.penalty, travel: w.travel }
    }
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Build and solve the siting model for an instance.
    Solve {
        /// Instance directory, or the name of an instance in $DATA_ROOT/siting.
        instance: String,
        /// Drop sub-tour elimination and solve the relaxation.
        #[structopt(long)]
        relax_subtours: bool,
        /// Force a site open (repeatable).
        #[structopt(long="open", number_of_values=1)]
        open: Vec<usize>,
        /// Force a site closed (repeatable).
        #[structopt(long="close", number_of_values=1)]
        close: Vec<usize>,
        #[structopt(flatten)]
        weights: WeightArgs,
        /// Accept binary values within this distance of 0 or 1.
        #[structopt(long, default_value="0.5", validator=clap_range_validator(Some(0.0), Some(0.5)))]
        tolerance: f64,
        /// Write deposit_locations.csv and path.csv to this directory.
        #[structopt(long)]
        write: Option<PathBuf>,
        #[structopt(flatten)]
        output: OutputOptions,
    },
    /// Recompute cost and check feasibility of a stored solution.
    Evaluate {
        instance: String,
        solution: PathBuf,
        #[structopt(flatten)]
        weights: WeightArgs,
        #[structopt(flatten)]
        output: OutputOptions,
    },
    /// Write a random instance.
    Generate {
        #[structopt(long, default_value="5")]
        sites: usize,
        #[structopt(long, default_value="10")]
        demand: usize,
        #[structopt(long, default_value="0")]
        seed: u64,
        #[structopt(long, default_value="35", validator=clap_range_validator(Some(0.0), None))]
        radius: f64,
        dir: PathBuf,
    },
}

#[derive(Debug, StructOpt)]
struct ClArgs {
    /// Also write ndjson logs to this file.
    #[structopt(long)]
    log: Option<PathBuf>,
    #[structopt(subcommand)]
    cmd: Command,
}

fn load_instance(instance: &str, weights: &WeightArgs) -> Result<SitingInstance> {
    let overrides = WeightOverrides::from(weights);
    if !overrides.is_empty() {
        debug!(?overrides, "overriding weights");
    }
    let path = Path::new(instance);
    if path.is_dir() {
        return Ok(override_weights(instances::load_instance_dir(path)?, overrides));
    }
    let dataset = instances::dataset::siting::default_dataset()?
        .map(move |data| override_weights(data, overrides));
    dataset.load_instance_by_name(instance)
        .with_context(|| format!("{} is neither a directory nor a known instance", instance))
}

struct Solved<'a> {
    data: &'a SitingInstance,
    outcome: &'a Outcome,
}

impl Report for Solved<'_> {
    fn json(&self) -> json::JsonValue {
        full_json(self.data, self.outcome.status_str(), self.outcome.solution())
    }

    fn json_summary(&self) -> json::JsonValue {
        summary_json(self.data, self.outcome.status_str(), self.outcome.solution())
    }
}

struct Evaluated<'a> {
    data: &'a SitingInstance,
    stored: StoredSolution,
    violations: Vec<Violation>,
}

impl Report for Evaluated<'_> {
    fn json(&self) -> json::JsonValue {
        let mut root = evaluation_json(self.data, &self.stored, &self.violations);
        root["adjacency"] = self.stored.route.outer_iter()
            .map(|row| row.iter().map(|&b| b as u8).collect::<Vec<_>>())
            .collect::<Vec<_>>()
            .into();
        root
    }

    fn json_summary(&self) -> json::JsonValue {
        evaluation_json(self.data, &self.stored, &self.violations)
    }
}

fn main() -> Result<()> {
    let args: ClArgs = StructOpt::from_args();
    let _g = init_logging(args.log.as_ref())?;
    debug!(?args);

    match &args.cmd {
        Command::Solve { instance, relax_subtours, open, close, weights, tolerance, write, output } => {
            let data = load_instance(instance, weights)?;
            let model_options = ModelOptions {
                subtour_elimination: if *relax_subtours { SubtourElimination::Disabled } else { SubtourElimination::Sequencing },
                fixed_open: open.clone(),
                fixed_closed: close.clone(),
            };
            let decode_options = DecodeOptions { tolerance: *tolerance };
            let outcome = optimize(&data, &MicrolpSolver, &model_options, &decode_options)?;
            if let Some(dir) = write {
                write_solution(dir, outcome.solution())?;
            }
            output_report(output, Solved { data: &data, outcome: &outcome })?;
        },
        Command::Evaluate { instance, solution, weights, output } => {
            let data = load_instance(instance, weights)?;
            let stored = read_solution(&data, solution)?;
            let as_solution = SitingSolution {
                open: stored.open.clone(),
                penalized: siting::cost::unserved(&data, &stored.open)
                    .fold(vec![false; data.n_demand()], |mut p, s| { p[s] = true; p }),
                route: stored.route.clone(),
                objective: f64::NAN,
            };
            let violations = check_solution(&data, &as_solution);
            for v in &violations {
                warn!(violation=%v);
            }
            output_report(output, Evaluated { data: &data, stored, violations })?;
        },
        Command::Generate { sites, demand, seed, radius, dir } => {
            let params = GeneratorParams { n_sites: *sites, n_demand: *demand, service_radius: *radius, ..Default::default() };
            let mut rng = rand::rngs::StdRng::seed_from_u64(*seed);
            let data = random_instance(&mut rng, &params);
            instances::write::write_instance(dir, &data)?;
            info!(?dir, sites, demand, "instance written");
        },
    }
    Ok(())
}
