//! ILS execution loop.

use super::config::IlsConfig;
use crate::error::{Result, TspError};
use crate::local_search::LocalSearch;
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

/// Executes Iterated Local Search.
///
/// One iteration is one descent followed by one perturbation. Evaluations
/// are the candidates scanned by the descents plus one per perturbation
/// move.
pub struct IlsRunner;

impl IlsRunner {
    /// Runs ILS from the configured initial solution.
    pub fn run(model: &DistanceModel, options: &SearchOptions) -> Result<SearchResult> {
        Self::run_with_cancel(model, options, None, None)
    }

    /// Runs ILS from a caller-supplied tour.
    pub fn run_from(
        model: &DistanceModel,
        options: &SearchOptions,
        initial: Tour,
    ) -> Result<SearchResult> {
        Self::run_with_cancel(model, options, Some(initial), None)
    }

    /// Runs ILS with an optional starting tour and cancellation token.
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
        let config = &options.ils;
        options.validate()?;
        config.validate()?;
        let mut termination = options.termination();
        if let Some(flag) = cancel {
            termination = termination.with_cancel(flag);
        }
        if !termination.is_bounded() {
            return Err(TspError::config(
                "iterated local search needs at least one positive limit",
            ));
        }

        let seed = resolve_seed(options.seed);
        let mut rng = create_rng(seed);

        let current = match initial {
            Some(tour) => {
                tour.check(model)?;
                tour
            }
            None => Tour::initial(model, options.initial_solution, &mut rng),
        };
        let mut walk = Walk::new(current);

        let mut iterations = 0usize;
        let mut evaluations = 0usize;

        let mut trajectory = Trajectory::new();
        trajectory.record(TrajectoryRecord::new(&walk.best, 0, 0));

        info!(
            nodes = model.node_count(),
            seed,
            initial_cost = walk.best.cost(),
            move_kind = ?options.move_kind,
            perturbation = ?config.perturbation,
            perturbations = config.perturbations,
            "iterated local search started"
        );

        let engine = LocalSearch::new(model, options.move_kind, &options.local_search);

        let stop_reason = loop {
            if let Some(reason) = termination.check(iterations, evaluations) {
                break reason;
            }

            let previous_best = walk.best.cost();
            let round = walk.round(
                &engine,
                model,
                config,
                &mut evaluations,
                |_, evaluations| termination.check(iterations, evaluations),
                &mut rng,
            );

            if round.improved {
                debug!(
                    from = previous_best,
                    to = walk.best.cost(),
                    iteration = iterations + 1,
                    evaluations,
                    "new best"
                );
                trajectory.record(TrajectoryRecord::new(
                    &walk.best,
                    iterations + 1,
                    evaluations,
                ));
            }
            if let Some(reason) = round.interrupted {
                break reason;
            }
            iterations += 1;

            trace!(
                iteration = iterations,
                current = walk.current.cost(),
                best = walk.best.cost(),
                passes = round.passes,
                "iteration"
            );
        };

        let best = walk.best;
        trajectory.record(TrajectoryRecord::new(&best, iterations, evaluations));
        let elapsed = termination.elapsed();

        info!(
            best_cost = best.cost(),
            iterations,
            evaluations,
            ?stop_reason,
            elapsed_ms = elapsed.as_millis() as u64,
            "iterated local search finished"
        );

        Ok(SearchResult {
            best,
            trajectory,
            iterations,
            evaluations,
            elapsed,
            final_temperature: None,
            stop_reason,
            seed,
        })
    }
}

/// Random-walk state of a run: the tour being perturbed and the best
/// local optimum seen so far.
struct Walk {
    current: Tour,
    best: Tour,
}

/// Outcome of one [`Walk::round`].
struct Round {
    /// `best` was replaced by the new local optimum.
    improved: bool,
    /// Limit that interrupted the descent; the tour was not perturbed.
    interrupted: Option<StopReason>,
    passes: usize,
}

impl Walk {
    fn new(initial: Tour) -> Self {
        Self {
            best: initial.clone(),
            current: initial,
        }
    }

    /// Descends `current`, keeps it as `best` when cheaper, then perturbs
    /// `current` in place. `current` is never reset to `best`, so the next
    /// round starts from the perturbed tour even when it is worse.
    fn round<S, R>(
        &mut self,
        engine: &LocalSearch<'_>,
        model: &DistanceModel,
        config: &IlsConfig,
        evaluations: &mut usize,
        stop: S,
        rng: &mut R,
    ) -> Round
    where
        S: Fn(usize, usize) -> Option<StopReason>,
        R: Rng,
    {
        let descent = engine.descend(&mut self.current, evaluations, stop, |_, _, _| {});

        let improved = self.current.cost() < self.best.cost();
        if improved {
            self.best.clone_from(&self.current);
        }
        let interrupted = (descent.stop_reason != StopReason::LocalOptimum)
            .then_some(descent.stop_reason);
        if interrupted.is_none() {
            *evaluations += perturb(&mut self.current, model, config, rng);
        }

        Round {
            improved,
            interrupted,
            passes: descent.passes,
        }
    }
}

/// Applies `config.perturbations` random moves; returns the number applied.
fn perturb<R: Rng>(
    tour: &mut Tour,
    model: &DistanceModel,
    config: &IlsConfig,
    rng: &mut R,
) -> usize {
    for _ in 0..config.perturbations {
        let kind = config.perturbation.move_kind(rng);
        tour.random_move(model, kind, rng);
    }
    config.perturbations
}
