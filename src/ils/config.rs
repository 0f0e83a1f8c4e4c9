//! Iterated Local Search configuration.

use crate::error::{Result, TspError};
use crate::tour::MoveKind;
use rand::Rng;

/// Move used to kick the tour out of its local optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Perturbation {
    #[default]
    Swap,
    TwoOpt,
    ThreeOpt,
    /// A uniformly random move kind, drawn per perturbation.
    Random,
}

impl Perturbation {
    /// Move kind for the next perturbation step.
    pub fn move_kind<R: Rng>(&self, rng: &mut R) -> MoveKind {
        match self {
            Perturbation::Swap => MoveKind::Swap,
            Perturbation::TwoOpt => MoveKind::TwoOpt,
            Perturbation::ThreeOpt => MoveKind::ThreeOpt,
            Perturbation::Random => MoveKind::ALL[rng.random_range(0..MoveKind::ALL.len())],
        }
    }
}

/// Configuration parameters for Iterated Local Search.
///
/// # Examples
///
/// ```
/// use tspf::ils::{IlsConfig, Perturbation};
///
/// let config = IlsConfig::default()
///     .with_perturbation(Perturbation::TwoOpt)
///     .with_perturbations(5);
/// assert_eq!(config.perturbations, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IlsConfig {
    /// Kind of perturbation move.
    pub perturbation: Perturbation,
    /// Number of random moves per perturbation.
    pub perturbations: usize,
}

impl Default for IlsConfig {
    fn default() -> Self {
        Self {
            perturbation: Perturbation::Swap,
            perturbations: 3,
        }
    }
}

impl IlsConfig {
    pub fn with_perturbation(mut self, perturbation: Perturbation) -> Self {
        self.perturbation = perturbation;
        self
    }

    pub fn with_perturbations(mut self, n: usize) -> Self {
        self.perturbations = n;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`TspError::Configuration`] when `perturbations` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.perturbations == 0 {
            return Err(TspError::config("perturbations must be at least 1"));
        }
        Ok(())
    }
}
