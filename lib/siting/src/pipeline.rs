use tracing::*;

use crate::decode::{decode, DecodeOptions, SitingSolution};
use crate::model::{build, ModelOptions};
use crate::solver::{MilpSolver, SolverOutcome};
use crate::{Error, Result, SitingInstance};

/// A decoded solution, tagged with whether the solver proved it optimal.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Optimal(SitingSolution),
    /// Feasible, but the solver stopped before proving optimality.
    BestFound(SitingSolution),
}

impl Outcome {
    pub fn solution(&self) -> &SitingSolution {
        match self {
            Outcome::Optimal(s) | Outcome::BestFound(s) => s,
        }
    }

    pub fn into_solution(self) -> SitingSolution {
        match self {
            Outcome::Optimal(s) | Outcome::BestFound(s) => s,
        }
    }

    pub fn is_optimal(&self) -> bool { matches!(self, Outcome::Optimal(_)) }

    pub fn status_str(&self) -> &'static str {
        match self {
            Outcome::Optimal(_) => "optimal",
            Outcome::BestFound(_) => "best-found",
        }
    }
}

/// Validates `data`, builds the model, solves it with `solver` and decodes the result.
///
/// Infeasible, unbounded and failed solves are errors; nothing is decoded from them.
#[instrument(level="info", skip(data, solver, model_options, decode_options), fields(instance=%data.id, solver=solver.name()))]
pub fn optimize<S>(data: &SitingInstance, solver: &S, model_options: &ModelOptions, decode_options: &DecodeOptions) -> Result<Outcome>
    where
        S: MilpSolver + ?Sized
{
    let (model, vars) = build(data, model_options)?;
    let outcome = solver.solve(&model);
    let (assignment, optimal) = match outcome {
        SolverOutcome::Optimal(a) => (a, true),
        SolverOutcome::BestFound(a) => (a, false),
        SolverOutcome::Infeasible => {
            info!("infeasible");
            return Err(Error::Infeasible);
        },
        SolverOutcome::Unbounded => {
            info!("unbounded");
            return Err(Error::Unbounded);
        },
        SolverOutcome::Failed(msg) => return Err(Error::SolverFailed(msg)),
    };
    let solution = decode(&vars, &assignment, decode_options)?;
    if optimal {
        info!(objective=solution.objective, "optimal");
        Ok(Outcome::Optimal(solution))
    } else {
        warn!(objective=solution.objective, "solver did not prove optimality");
        Ok(Outcome::BestFound(solution))
    }
}


#[cfg(all(test, feature = "microlp"))]
mod scenarios {
    use super::*;
    use crate::cost::CostBreakdown;
    use crate::model::SubtourElimination;
    use crate::route::{check_solution, Route, RouteDefect};
    use crate::solver::MicrolpSolver;
    use instances::Weights;
    use ndarray::{arr2, Array2};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
    }

    fn solve(data: &SitingInstance, options: &ModelOptions) -> Result<Outcome> {
        let _g = crate::init_test_logging(None::<&str>);
        optimize(data, &MicrolpSolver, options, &DecodeOptions::default())
    }

    #[test]
    fn no_sites_penalises_everything() {
        let data = SitingInstance {
            id: "A".into(),
            distances: arr2(&[[0.0]]),
            service: Array2::from_elem((0, 1), false),
            weights: Weights { construction: 3.0, missed_supermarket: 7.0, travel: 2.0 },
        };
        let outcome = solve(&data, &ModelOptions::default()).unwrap();
        assert!(outcome.is_optimal());
        let sol = outcome.solution();
        assert!(sol.open.is_empty());
        assert_eq!(sol.penalized, vec![true]);
        assert!(sol.route.iter().all(|&used| !used));
        assert!(approx_eq(sol.objective, 7.0), "{}", sol.objective);
        assert_eq!(check_solution(&data, sol), vec![]);
    }

    #[test]
    fn single_site_is_opened() {
        let data = SitingInstance {
            id: "B".into(),
            distances: arr2(&[[0., 5.], [5., 0.]]),
            service: arr2(&[[true]]),
            weights: Weights { construction: 10.0, missed_supermarket: 100.0, travel: 1.0 },
        };
        let sol = solve(&data, &ModelOptions::default()).unwrap().into_solution();
        assert_eq!(sol.open, vec![true]);
        assert_eq!(sol.penalized, vec![false]);
        assert_eq!(sol.route_edges().collect::<Vec<_>>(), vec![(0, 1), (1, 0)]);
        assert!(approx_eq(sol.objective, 20.0), "{}", sol.objective);
    }

    #[test]
    fn large_penalty_covers_all_demand() {
        let data = SitingInstance {
            id: "C".into(),
            distances: arr2(&[
                [0., 40., 55., 70.],
                [40., 0., 30., 60.],
                [55., 30., 0., 45.],
                [70., 60., 45., 0.],
            ]),
            service: arr2(&[
                [true, false, false],
                [false, true, false],
                [false, false, true],
            ]),
            weights: Weights { construction: 20.0, missed_supermarket: 10_000.0, travel: 1.0 },
        };
        let sol = solve(&data, &ModelOptions::default()).unwrap().into_solution();
        assert_eq!(sol.open, vec![true, true, true]);
        assert_eq!(sol.penalized, vec![false, false, false]);
        assert_eq!(check_solution(&data, &sol), vec![]);
        let (route, _) = Route::from_adjacency(&sol.route);
        assert_eq!(route.visits.len(), 3);
        assert!(approx_eq(sol.objective, CostBreakdown::of(&data, &sol).total()));
        // 0-1-2-3-0 in either direction
        assert!(approx_eq(sol.objective, 60.0 + 40.0 + 30.0 + 45.0 + 70.0));
    }

    #[test]
    fn contradictory_fixings_are_infeasible() {
        let data = SitingInstance {
            id: "D".into(),
            distances: arr2(&[[0., 1., 1.], [1., 0., 1.], [1., 1., 0.]]),
            service: arr2(&[[true], [true]]),
            weights: Weights { construction: 1.0, missed_supermarket: 1.0, travel: 1.0 },
        };
        let options = ModelOptions { fixed_closed: vec![0, 1], ..Default::default() };
        assert_eq!(solve(&data, &options), Err(Error::Infeasible));
        let options = ModelOptions { fixed_open: vec![0], fixed_closed: vec![0], ..Default::default() };
        assert_eq!(solve(&data, &options), Err(Error::Infeasible));
    }

    #[test]
    fn fixed_open_site_is_visited() {
        let data = instances::generate::random_instance(
            &mut <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(11),
            &instances::generate::GeneratorParams { n_sites: 4, n_demand: 5, ..Default::default() },
        );
        let options = ModelOptions { fixed_open: vec![2], fixed_closed: vec![3], ..Default::default() };
        let sol = solve(&data, &options).unwrap().into_solution();
        assert!(sol.open[2]);
        assert!(!sol.open[3]);
        assert_eq!(check_solution(&data, &sol), vec![]);
    }

    #[test]
    fn relaxation_can_produce_subtours() {
        // Sites 1 and 2 are close to each other and far from the depot.
        let data = SitingInstance {
            id: "relax".into(),
            distances: arr2(&[
                [0., 1., 100., 100.],
                [1., 0., 100., 100.],
                [100., 100., 0., 1.],
                [100., 100., 1., 0.],
            ]),
            service: arr2(&[[true, false], [false, true], [false, true]]),
            weights: Weights { construction: 1.0, missed_supermarket: 1000.0, travel: 1.0 },
        };
        let options = ModelOptions { fixed_open: vec![1, 2], ..Default::default() };
        let exact = solve(&data, &options).unwrap().into_solution();
        assert_eq!(check_solution(&data, &exact), vec![]);

        let relaxed = ModelOptions { subtour_elimination: SubtourElimination::Disabled, ..options };
        let sol = solve(&data, &relaxed).unwrap().into_solution();
        assert!(sol.objective < exact.objective);
        let (_, defects) = Route::from_adjacency(&sol.route);
        assert_eq!(defects, vec![RouteDefect::Subtour { nodes: vec![2, 3] }]);
    }

    #[test]
    fn unservable_demand_is_penalised() {
        let data = instances::load_instance_dir(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/siting/triangle")
        ).unwrap();
        assert_eq!(data.unservable_demand(), vec![3]);
        let sol = solve(&data, &ModelOptions::default()).unwrap().into_solution();
        assert!(sol.penalized[3]);
        assert_eq!(check_solution(&data, &sol), vec![]);
        assert!(approx_eq(sol.objective, CostBreakdown::of(&data, &sol).total()));
    }
}
