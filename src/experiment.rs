//! Repeated seeded runs.
//!
//! [`run_seeds`] solves the same instance once per seed and
//! [`Summary`] aggregates the best costs. Each run owns its RNG, tours
//! and trajectory, so with the `parallel` feature the runs are spread
//! over rayon's thread pool and the results are identical to the
//! sequential path, in seed order.

use crate::error::Result;
use crate::options::SearchOptions;
use crate::problem::{Cost, DistanceModel};
use crate::search::{solve, Algorithm, SearchResult};
use std::time::Duration;
use tracing::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Runs `algorithm` once per seed, overriding `options.seed`.
///
/// # Errors
/// The first configuration or tour error reported by any run.
pub fn run_seeds(
    model: &DistanceModel,
    algorithm: Algorithm,
    options: &SearchOptions,
    seeds: &[u64],
) -> Result<Vec<SearchResult>> {
    info!(%algorithm, runs = seeds.len(), "experiment started");
    let run = |&seed: &u64| solve(model, algorithm, &options.clone().with_seed(seed));

    #[cfg(feature = "parallel")]
    let results: Result<Vec<SearchResult>> = seeds.par_iter().map(run).collect();
    #[cfg(not(feature = "parallel"))]
    let results: Result<Vec<SearchResult>> = seeds.iter().map(run).collect();

    let results = results?;
    if let Some(summary) = Summary::from_results(&results) {
        info!(
            %algorithm,
            best = summary.best,
            worst = summary.worst,
            mean = summary.mean,
            "experiment finished"
        );
    }
    Ok(results)
}

/// Aggregate of the best costs of several runs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    pub runs: usize,
    pub best: Cost,
    pub worst: Cost,
    pub mean: f64,
    /// Sample standard deviation; `0` for a single run.
    pub std_dev: f64,
    /// Seed of the run that produced `best` (first one on ties).
    pub best_seed: u64,
    pub mean_evaluations: f64,
    pub total_elapsed: Duration,
}

impl Summary {
    /// `None` for an empty slice.
    pub fn from_results(results: &[SearchResult]) -> Option<Self> {
        let first = results.first()?;
        let runs = results.len();

        let mut best = first;
        let mut worst = first.best_cost();
        let mut sum = 0.0;
        let mut evaluations = 0.0;
        let mut total_elapsed = Duration::ZERO;
        for result in results {
            if result.best_cost() < best.best_cost() {
                best = result;
            }
            worst = worst.max(result.best_cost());
            sum += result.best_cost() as f64;
            evaluations += result.evaluations as f64;
            total_elapsed += result.elapsed;
        }

        let mean = sum / runs as f64;
        let std_dev = if runs > 1 {
            let variance = results
                .iter()
                .map(|r| (r.best_cost() as f64 - mean).powi(2))
                .sum::<f64>()
                / (runs - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Some(Self {
            runs,
            best: best.best_cost(),
            worst,
            mean,
            std_dev,
            best_seed: best.seed,
            mean_evaluations: evaluations / runs as f64,
            total_elapsed,
        })
    }
}
