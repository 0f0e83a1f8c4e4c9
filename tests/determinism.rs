//! Same options and seed give the same run, for every engine.

use tspf::ga::{Crossover, GaConfig, Replacement, Selection};
use tspf::ils::{IlsConfig, Perturbation};
use tspf::sa::{CoolingSchedule, SaConfig};
use tspf::{solve, Algorithm, DistanceModel, InitialSolution, MoveKind, SearchOptions};

fn instance(n: usize) -> DistanceModel {
    // deterministic scatter in a 1000 x 1000 square
    let points: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let x = ((i * 7919) % 1000) as f64;
            let y = ((i * 104_729 + 13) % 997) as f64;
            (x, y)
        })
        .collect();
    DistanceModel::from_coordinates(&points).unwrap()
}

fn options(seed: u64) -> SearchOptions {
    SearchOptions::default()
        .with_seed(seed)
        .with_max_iterations(40)
        .with_max_evaluations(5_000)
        .with_max_time(0.0)
}

fn assert_identical(model: &DistanceModel, algorithm: Algorithm, options: &SearchOptions) {
    let a = solve(model, algorithm, options).unwrap();
    let b = solve(model, algorithm, options).unwrap();
    assert_eq!(a.best, b.best, "{algorithm}: best tours differ");
    assert_eq!(a.iterations, b.iterations, "{algorithm}");
    assert_eq!(a.evaluations, b.evaluations, "{algorithm}");
    assert_eq!(a.stop_reason, b.stop_reason, "{algorithm}");
    assert_eq!(a.trajectory, b.trajectory, "{algorithm}: trajectories differ");
    assert!(a.best.check(model).is_ok());
}

#[test]
fn test_every_engine_is_deterministic() {
    let model = instance(30);
    for algorithm in Algorithm::ALL {
        for seed in [0, 1, 42] {
            assert_identical(&model, algorithm, &options(seed));
        }
    }
}

#[test]
fn test_deterministic_across_operators() {
    let model = instance(25);
    let sa = options(3)
        .with_max_iterations(0)
        .with_move_kind(MoveKind::ThreeOpt)
        .with_sa(
            SaConfig::default()
                .with_initial_temperature(500.0)
                .with_min_temperature(0.0)
                .with_cooling(CoolingSchedule::Logarithmic),
        );
    assert_identical(&model, Algorithm::SimulatedAnnealing, &sa);

    let ga = options(4).with_ga(
        GaConfig::default()
            .with_crossover(Crossover::Pmx)
            .with_replacement(Replacement::MuPlusLambda)
            .with_parent_selection(Selection::Roulette)
            .with_survivor_selection(Selection::Tournament(2)),
    );
    assert_identical(&model, Algorithm::Genetic, &ga);

    let ils = options(5)
        .with_initial_solution(InitialSolution::NearestNeighbour)
        .with_ils(IlsConfig::default().with_perturbation(Perturbation::Random));
    assert_identical(&model, Algorithm::IteratedLocalSearch, &ils);
}

#[test]
fn test_different_seeds_start_differently() {
    let model = instance(30);
    let a = solve(&model, Algorithm::LocalSearch, &options(1)).unwrap();
    let b = solve(&model, Algorithm::LocalSearch, &options(2)).unwrap();
    assert_ne!(
        a.trajectory.records()[0].sequence,
        b.trajectory.records()[0].sequence
    );
}
