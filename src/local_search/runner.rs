//! LS execution loop.

use super::descent::LocalSearch;
use crate::error::Result;
use crate::options::SearchOptions;
use crate::problem::DistanceModel;
use crate::random::{create_rng, resolve_seed};
use crate::search::SearchResult;
use crate::tour::Tour;
use crate::trajectory::{Trajectory, TrajectoryRecord};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info};

/// Executes Local Search.
///
/// One iteration is one neighbourhood pass. Unlike the other engines the
/// run needs no limit: it always ends at a local optimum.
pub struct LsRunner;

impl LsRunner {
    /// Runs LS from the configured initial solution.
    pub fn run(model: &DistanceModel, options: &SearchOptions) -> Result<SearchResult> {
        Self::run_with_cancel(model, options, None, None)
    }

    /// Runs LS from a caller-supplied tour.
    pub fn run_from(
        model: &DistanceModel,
        options: &SearchOptions,
        initial: Tour,
    ) -> Result<SearchResult> {
        Self::run_with_cancel(model, options, Some(initial), None)
    }

    /// Runs LS with an optional starting tour and cancellation token.
    ///
    /// # Errors
    /// [`TspError::Configuration`](crate::TspError::Configuration) when the
    /// options are invalid, [`TspError::MalformedTour`](crate::TspError::MalformedTour)
    /// when `initial` does not belong to `model`.
    pub fn run_with_cancel(
        model: &DistanceModel,
        options: &SearchOptions,
        initial: Option<Tour>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SearchResult> {
        options.validate()?;
        let mut termination = options.termination();
        if let Some(flag) = cancel {
            termination = termination.with_cancel(flag);
        }

        let seed = resolve_seed(options.seed);
        let mut rng = create_rng(seed);

        let mut tour = match initial {
            Some(tour) => {
                tour.check(model)?;
                tour
            }
            None => Tour::initial(model, options.initial_solution, &mut rng),
        };

        let mut trajectory = Trajectory::new();
        trajectory.record(TrajectoryRecord::new(&tour, 0, 0));

        info!(
            nodes = model.node_count(),
            seed,
            initial_cost = tour.cost(),
            move_kind = ?options.move_kind,
            best_improvement = options.local_search.best_improvement,
            "local search started"
        );

        let engine = LocalSearch::new(model, options.move_kind, &options.local_search);
        let mut evaluations = 0usize;
        let descent = engine.descend(
            &mut tour,
            &mut evaluations,
            |passes, evaluations| termination.check(passes, evaluations),
            |tour, passes, evaluations| {
                debug!(cost = tour.cost(), pass = passes, evaluations, "improving move");
                trajectory.record(TrajectoryRecord::new(tour, passes, evaluations));
            },
        );

        trajectory.record(TrajectoryRecord::new(&tour, descent.passes, evaluations));
        let elapsed = termination.elapsed();

        info!(
            best_cost = tour.cost(),
            passes = descent.passes,
            improvements = descent.improvements,
            evaluations,
            stop_reason = ?descent.stop_reason,
            elapsed_ms = elapsed.as_millis() as u64,
            "local search finished"
        );

        Ok(SearchResult {
            best: tour,
            trajectory,
            iterations: descent.passes,
            evaluations,
            elapsed,
            final_temperature: None,
            stop_reason: descent.stop_reason,
            seed,
        })
    }
}
