//! SA execution loop.

use super::config::CoolingSchedule;
use crate::error::{Result, TspError};
use crate::options::SearchOptions;
use crate::problem::DistanceModel;
use crate::random::{create_rng, resolve_seed};
use crate::search::SearchResult;
use crate::termination::StopReason;
use crate::tour::Tour;
use crate::trajectory::{Trajectory, TrajectoryRecord};
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA from the configured initial solution.
    pub fn run(model: &DistanceModel, options: &SearchOptions) -> Result<SearchResult> {
        Self::run_with_cancel(model, options, None, None)
    }

    /// Runs SA from a caller-supplied tour.
    pub fn run_from(
        model: &DistanceModel,
        options: &SearchOptions,
        initial: Tour,
    ) -> Result<SearchResult> {
        Self::run_with_cancel(model, options, Some(initial), None)
    }

    /// Runs SA with an optional starting tour and cancellation token.
    ///
    /// # Errors
    /// [`TspError::Configuration`] when the options are invalid or no
    /// stopping criterion is active, [`TspError::MalformedTour`] when
    /// `initial` does not belong to `model`.
    pub fn run_with_cancel(
        model: &DistanceModel,
        options: &SearchOptions,
        initial: Option<Tour>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SearchResult> {
        let config = &options.sa;
        options.validate()?;
        config.validate()?;
        if config.cooling == CoolingSchedule::Linear && options.max_evaluations == 0 {
            return Err(TspError::config("linear cooling requires max_evaluations > 0"));
        }
        let mut termination = options.termination();
        if let Some(flag) = cancel {
            termination = termination.with_cancel(flag);
        }
        if !termination.is_bounded() && !config.cools_to_minimum() {
            return Err(TspError::config(
                "simulated annealing needs a positive limit or a reachable min_temperature",
            ));
        }

        let seed = resolve_seed(options.seed);
        let mut rng = create_rng(seed);

        // Initialize
        let mut current = match initial {
            Some(tour) => {
                tour.check(model)?;
                tour
            }
            None => Tour::initial(model, options.initial_solution, &mut rng),
        };
        let mut neighbour = current.clone();
        let mut best = current.clone();

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut evaluations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        let mut trajectory = Trajectory::new();
        trajectory.record(TrajectoryRecord::new(&best, 0, 0).with_temperature(temperature));

        info!(
            nodes = model.node_count(),
            seed,
            initial_cost = best.cost(),
            temperature,
            "simulated annealing started"
        );

        let stop_reason = loop {
            if config.min_temperature > 0.0 && temperature <= config.min_temperature {
                break StopReason::MinTemperature;
            }
            if let Some(reason) = termination.check(iterations, evaluations) {
                break reason;
            }

            neighbour.random_move(model, options.move_kind, &mut rng);
            let delta = neighbour.cost() - current.cost();

            // Metropolis acceptance criterion
            let accept = if delta < 0 {
                improving_moves += 1;
                true
            } else if temperature > 0.0 {
                let probability = (-(delta as f64) / temperature).exp();
                rng.random::<f64>() <= probability
            } else {
                delta == 0
            };

            if accept {
                current.clone_from(&neighbour);
                accepted_moves += 1;
            } else {
                neighbour.clone_from(&current);
            }

            iterations += 1;
            evaluations += 1;

            if current.cost() < best.cost() {
                debug!(
                    from = best.cost(),
                    to = current.cost(),
                    evaluations,
                    temperature,
                    "new best"
                );
                best.clone_from(&current);
                trajectory.record(
                    TrajectoryRecord::new(&best, iterations, evaluations)
                        .with_temperature(temperature),
                );
            }

            temperature = config.cooling.next_temperature(
                temperature,
                evaluations,
                config.initial_temperature,
                config.alpha,
                options.max_evaluations,
            );
            trace!(evaluations, temperature, current = current.cost(), "step");
        };

        trajectory.record(
            TrajectoryRecord::new(&best, iterations, evaluations).with_temperature(temperature),
        );
        let elapsed = termination.elapsed();

        info!(
            best_cost = best.cost(),
            iterations,
            evaluations,
            accepted_moves,
            improving_moves,
            final_temperature = temperature,
            ?stop_reason,
            elapsed_ms = elapsed.as_millis() as u64,
            "simulated annealing finished"
        );

        Ok(SearchResult {
            best,
            trajectory,
            iterations,
            evaluations,
            elapsed,
            final_temperature: Some(temperature),
            stop_reason,
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::tests::{line_model, ring_model};
    use crate::sa::SaConfig;
    use crate::tour::{InitialSolution, MoveKind};

    fn long_run() -> SearchOptions {
        SearchOptions::default()
            .with_max_iterations(0)
            .with_max_evaluations(20_000)
            .with_max_time(0.0)
            .with_seed(42)
            .with_sa(
                SaConfig::default()
                    .with_initial_temperature(100.0)
                    .with_min_temperature(0.01)
                    .with_alpha(0.999),
            )
    }

    #[test]
    fn test_sa_improves_ring() {
        let model = ring_model(20);
        let result = SaRunner::run(&model, &long_run()).unwrap();
        let initial = result.trajectory.records()[0].cost;
        assert!(
            result.best_cost() < initial,
            "expected improvement over {initial}, got {}",
            result.best_cost()
        );
        assert!(result.best.check(&model).is_ok());
    }

    #[test]
    fn test_sa_linear_spends_budget() {
        let model = ring_model(15);
        let mut options = long_run().with_max_evaluations(500);
        options.sa = options.sa.with_min_temperature(0.0).with_cooling(CoolingSchedule::Linear);
        let result = SaRunner::run(&model, &options).unwrap();
        assert_eq!(result.evaluations, 500);
        assert_eq!(result.stop_reason, StopReason::MaxEvaluations);
        assert_eq!(result.final_temperature, Some(0.0));
    }

    #[test]
    fn test_sa_min_temperature_stop() {
        let model = line_model(8);
        // default: 1000 -> 900 with alpha 0.98 takes 6 steps
        let options = SearchOptions::default().with_seed(1);
        let result = SaRunner::run(&model, &options).unwrap();
        assert_eq!(result.stop_reason, StopReason::MinTemperature);
        assert_eq!(result.evaluations, 6);
        assert_eq!(result.iterations, result.evaluations);
        assert!(result.final_temperature.unwrap() <= 900.0);
    }

    #[test]
    fn test_sa_max_iterations_limit() {
        let model = line_model(8);
        let options = long_run().with_max_iterations(100);
        let result = SaRunner::run(&model, &options).unwrap();
        assert_eq!(result.iterations, 100);
        assert_eq!(result.stop_reason, StopReason::MaxIterations);
    }

    #[test]
    fn test_sa_cancellation() {
        let model = line_model(8);
        let cancel = Arc::new(AtomicBool::new(true));
        let result = SaRunner::run_with_cancel(&model, &long_run(), None, Some(cancel)).unwrap();
        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.evaluations, 0);
    }

    #[test]
    fn test_sa_trajectory_non_increasing() {
        let model = ring_model(25);
        let result = SaRunner::run(&model, &long_run()).unwrap();
        let records = result.trajectory.records();
        for window in records.windows(2) {
            assert!(window[1].cost <= window[0].cost);
            assert!(window[1].evaluations >= window[0].evaluations);
            assert!(window[1].temperature.is_some());
        }
        assert_eq!(records.last().map(|r| r.cost), Some(result.best_cost()));
    }

    #[test]
    fn test_sa_run_from_keeps_start() {
        let model = line_model(6);
        let start = Tour::from_sequence(&model, vec![0, 1, 2, 3, 4, 5]).unwrap();
        let options = long_run().with_max_evaluations(200);
        let result = SaRunner::run_from(&model, &options, start.clone()).unwrap();
        assert_eq!(result.trajectory.records()[0].sequence, start.sequence());
        // already optimal on a line
        assert_eq!(result.best_cost(), 10);
    }

    #[test]
    fn test_sa_rejects_unbounded() {
        let model = line_model(6);
        let options = SearchOptions::default()
            .with_max_iterations(0)
            .with_max_evaluations(0)
            .with_max_time(0.0)
            .with_sa(SaConfig::default().with_min_temperature(0.0));
        let err = SaRunner::run(&model, &options).unwrap_err();
        assert!(matches!(err, TspError::Configuration(_)));
    }

    #[test]
    fn test_sa_rejects_linear_without_budget() {
        let model = line_model(6);
        let mut options = SearchOptions::default().with_max_evaluations(0);
        options.sa.cooling = CoolingSchedule::Linear;
        assert!(SaRunner::run(&model, &options).is_err());
    }

    #[test]
    fn test_sa_every_move_kind() {
        let model = ring_model(12);
        for kind in MoveKind::ALL {
            let options = long_run()
                .with_max_evaluations(2_000)
                .with_move_kind(kind)
                .with_initial_solution(InitialSolution::NearestNeighbour);
            let result = SaRunner::run(&model, &options).unwrap();
            assert!(result.best.check(&model).is_ok(), "{kind:?}");
        }
    }
}
