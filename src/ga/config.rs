//! GA configuration.
//!
//! [`GaConfig`] holds the parameters that control one generation:
//! population and offspring sizes, operators and replacement. Run
//! limits live in [`SearchOptions`](crate::options::SearchOptions).

use super::crossover::Crossover;
use super::selection::Selection;
use crate::error::{Result, TspError};
use crate::tour::MoveKind;

/// How the next generation is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Replacement {
    /// (μ,λ): survivors come from the offspring only.
    #[default]
    MuLambda,
    /// (μ+λ): survivors come from offspring and parents together.
    MuPlusLambda,
}

/// Configuration for the Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use tspf::ga::{Crossover, GaConfig, Replacement};
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 10);
/// assert_eq!(config.offspring_size, 20);
/// assert_eq!(config.crossover, Crossover::Ox);
/// assert_eq!(config.replacement, Replacement::MuLambda);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use tspf::ga::{GaConfig, Replacement, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(50)
///     .with_offspring_size(100)
///     .with_parent_selection(Selection::Tournament(3))
///     .with_replacement(Replacement::MuPlusLambda)
///     .with_mutation_probability(0.1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of members kept between generations (μ).
    pub population_size: usize,

    /// Number of children generated per generation (λ).
    ///
    /// Crossover yields children in pairs; an odd λ drops the last
    /// second child.
    pub offspring_size: usize,

    /// Strategy for picking the two parents of each crossover.
    pub parent_selection: Selection,

    /// Crossover operator.
    pub crossover: Crossover,

    /// Move applied as mutation.
    pub mutation: MoveKind,

    /// Probability that a child receives one mutation move (0.0–1.0).
    pub mutation_probability: f64,

    /// Generation replacement scheme.
    pub replacement: Replacement,

    /// Strategy for picking survivors when shrinking back to μ.
    pub survivor_selection: Selection,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            offspring_size: 20,
            parent_selection: Selection::Random,
            crossover: Crossover::Ox,
            mutation: MoveKind::Swap,
            mutation_probability: 0.2,
            replacement: Replacement::MuLambda,
            survivor_selection: Selection::Random,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_offspring_size(mut self, n: usize) -> Self {
        self.offspring_size = n;
        self
    }

    pub fn with_parent_selection(mut self, selection: Selection) -> Self {
        self.parent_selection = selection;
        self
    }

    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    pub fn with_mutation(mut self, mutation: MoveKind) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the mutation probability, clamped to `[0, 1]`.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = replacement;
        self
    }

    pub fn with_survivor_selection(mut self, selection: Selection) -> Self {
        self.survivor_selection = selection;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`TspError::Configuration`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(TspError::config("population_size must be at least 2"));
        }
        if self.offspring_size < 1 {
            return Err(TspError::config("offspring_size must be at least 1"));
        }
        if self.replacement == Replacement::MuLambda && self.offspring_size < self.population_size
        {
            return Err(TspError::config(format!(
                "(mu, lambda) replacement needs offspring_size >= population_size, got {} < {}",
                self.offspring_size, self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(TspError::config(format!(
                "mutation_probability must be in [0, 1], got {}",
                self.mutation_probability
            )));
        }
        for selection in [self.parent_selection, self.survivor_selection] {
            if selection == Selection::Tournament(0) {
                return Err(TspError::config("tournament size must be at least 1"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 10);
        assert_eq!(config.offspring_size, 20);
        assert_eq!(config.parent_selection, Selection::Random);
        assert_eq!(config.survivor_selection, Selection::Random);
        assert_eq!(config.mutation, MoveKind::Swap);
        assert!((config.mutation_probability - 0.2).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::default().with_population_size(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_mu_lambda_needs_enough_offspring() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_offspring_size(5);
        assert!(config.validate().is_err());
        let plus = config.with_replacement(Replacement::MuPlusLambda);
        assert!(plus.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_tournament() {
        let config = GaConfig::default().with_survivor_selection(Selection::Tournament(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_mutation_probability() {
        let config = GaConfig::default().with_mutation_probability(3.0);
        assert!((config.mutation_probability - 1.0).abs() < 1e-12);
        let mut raw = GaConfig::default();
        raw.mutation_probability = f64::NAN;
        assert!(raw.validate().is_err());
    }
}
