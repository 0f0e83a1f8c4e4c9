//! Algorithm dispatch and the common run result.

use crate::error::Result;
use crate::ga::GaRunner;
use crate::ils::IlsRunner;
use crate::local_search::LsRunner;
use crate::options::SearchOptions;
use crate::problem::{Cost, DistanceModel};
use crate::sa::SaRunner;
use crate::termination::StopReason;
use crate::tour::Tour;
use crate::trajectory::Trajectory;
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// The four search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    SimulatedAnnealing,
    Genetic,
    LocalSearch,
    IteratedLocalSearch,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::SimulatedAnnealing,
        Algorithm::Genetic,
        Algorithm::LocalSearch,
        Algorithm::IteratedLocalSearch,
    ];

    /// Short code used in log file names (`SA`, `GA`, `LS`, `ILS`).
    pub fn code(&self) -> &'static str {
        match self {
            Algorithm::SimulatedAnnealing => "SA",
            Algorithm::Genetic => "GA",
            Algorithm::LocalSearch => "LS",
            Algorithm::IteratedLocalSearch => "ILS",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The best tour found.
    pub best: Tour,

    /// Best-so-far snapshots recorded during the run.
    pub trajectory: Trajectory,

    /// Completed iterations.
    pub iterations: usize,

    /// Evaluated candidates.
    pub evaluations: usize,

    /// Wall-clock duration of the run.
    pub elapsed: Duration,

    /// Temperature when the run stopped (SA only).
    pub final_temperature: Option<f64>,

    /// Criterion that ended the run.
    pub stop_reason: StopReason,

    /// Seed the run was started with.
    pub seed: u64,
}

impl SearchResult {
    /// Cost of the best tour.
    pub fn best_cost(&self) -> Cost {
        self.best.cost()
    }
}

/// Runs `algorithm` on `model`.
///
/// # Errors
/// [`TspError::Configuration`](crate::error::TspError::Configuration)
/// when the options are invalid for the chosen algorithm.
///
/// # Examples
///
/// ```
/// use tspf::options::SearchOptions;
/// use tspf::problem::DistanceModel;
/// use tspf::search::{solve, Algorithm};
///
/// let points: Vec<(f64, f64)> = (0..12)
///     .map(|i| ((i as f64).cos() * 10.0, (i as f64).sin() * 10.0))
///     .collect();
/// let model = DistanceModel::from_coordinates(&points).unwrap();
/// let options = SearchOptions::default().with_seed(1);
///
/// let result = solve(&model, Algorithm::LocalSearch, &options).unwrap();
/// assert!(result.best.check(&model).is_ok());
/// ```
pub fn solve(
    model: &DistanceModel,
    algorithm: Algorithm,
    options: &SearchOptions,
) -> Result<SearchResult> {
    solve_with_cancel(model, algorithm, options, None)
}

/// Runs `algorithm` with an optional cancellation flag, checked once per
/// iteration.
pub fn solve_with_cancel(
    model: &DistanceModel,
    algorithm: Algorithm,
    options: &SearchOptions,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<SearchResult> {
    match algorithm {
        Algorithm::SimulatedAnnealing => SaRunner::run_with_cancel(model, options, None, cancel),
        Algorithm::Genetic => GaRunner::run_with_cancel(model, options, cancel),
        Algorithm::LocalSearch => LsRunner::run_with_cancel(model, options, None, cancel),
        Algorithm::IteratedLocalSearch => IlsRunner::run_with_cancel(model, options, None, cancel),
    }
}
