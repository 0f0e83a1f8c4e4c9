//! Search options.
//!
//! [`SearchOptions`] is the single configuration value an embedding
//! application fills in. Common run limits and the initial tour live at
//! the top level; algorithm parameters live in one nested config per
//! algorithm, so switching algorithms never invalidates the others.

use crate::error::{Result, TspError};
use crate::ga::GaConfig;
use crate::ils::IlsConfig;
use crate::local_search::LsConfig;
use crate::sa::SaConfig;
use crate::termination::Termination;
use crate::tour::{InitialSolution, MoveKind};

/// Configuration for one search run.
///
/// Limits compare against completed counts; `0` (or a non-positive
/// `max_time`) disables a limit.
///
/// # Examples
///
/// ```
/// use tspf::options::SearchOptions;
/// use tspf::tour::MoveKind;
///
/// let options = SearchOptions::default()
///     .with_max_evaluations(50_000)
///     .with_max_iterations(0)
///     .with_max_time(5.0)
///     .with_move_kind(MoveKind::TwoOpt)
///     .with_seed(42);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchOptions {
    /// Maximum number of iterations (SA steps, GA generations, LS passes,
    /// ILS rounds).
    pub max_iterations: usize,

    /// Maximum number of candidate evaluations.
    pub max_evaluations: usize,

    /// Wall-clock limit in seconds.
    pub max_time: f64,

    /// Random seed. `None` draws a fresh seed per run.
    pub seed: Option<u64>,

    /// Construction of the first tour (SA, LS, ILS).
    pub initial_solution: InitialSolution,

    /// Neighbour move for SA, neighbourhood for LS and the ILS descent.
    pub move_kind: MoveKind,

    pub sa: SaConfig,
    pub ga: GaConfig,
    pub local_search: LsConfig,
    pub ils: IlsConfig,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            max_evaluations: 1000,
            max_time: 60.0,
            seed: None,
            initial_solution: InitialSolution::Random,
            move_kind: MoveKind::TwoOpt,
            sa: SaConfig::default(),
            ga: GaConfig::default(),
            local_search: LsConfig::default(),
            ils: IlsConfig::default(),
        }
    }
}

impl SearchOptions {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = n;
        self
    }

    /// Sets the wall-clock limit in seconds.
    pub fn with_max_time(mut self, seconds: f64) -> Self {
        self.max_time = seconds;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_initial_solution(mut self, initial: InitialSolution) -> Self {
        self.initial_solution = initial;
        self
    }

    pub fn with_move_kind(mut self, kind: MoveKind) -> Self {
        self.move_kind = kind;
        self
    }

    pub fn with_sa(mut self, sa: SaConfig) -> Self {
        self.sa = sa;
        self
    }

    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    pub fn with_local_search(mut self, local_search: LsConfig) -> Self {
        self.local_search = local_search;
        self
    }

    pub fn with_ils(mut self, ils: IlsConfig) -> Self {
        self.ils = ils;
        self
    }

    /// Validates the common fields. Algorithm configs are validated by
    /// their runners.
    ///
    /// # Errors
    /// [`TspError::Configuration`] when `max_time` is NaN.
    pub fn validate(&self) -> Result<()> {
        if self.max_time.is_nan() {
            return Err(TspError::config("max_time must be a number"));
        }
        Ok(())
    }

    /// Starts a termination clock for these limits.
    pub fn termination(&self) -> Termination {
        Termination::new(self.max_iterations, self.max_evaluations, self.max_time)
    }
}
