//! SA configuration and cooling schedules.

use crate::error::{Result, TspError};

/// Cooling schedule for temperature reduction.
///
/// `evaluation` is the 1-based index of the step that just finished.
///
/// # References
///
/// - Geometric: standard textbook approach
/// - Linear: fixed-duration cooling over the evaluation budget
/// - Logarithmic: Geman & Geman (1984), scaled by `alpha`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// `T_{k+1} = alpha * T_k`.
    ///
    /// Most widely used. Typical `alpha`: 0.95–0.99.
    #[default]
    Geometric,

    /// `T_e = T_0 * (1 - e / max_evaluations)`, clamped at 0.
    ///
    /// Reaches zero exactly when the evaluation budget is spent.
    Linear,

    /// `T_e = (T_0 * alpha) / (ln(e) + 1)`.
    ///
    /// Cools fast early and very slowly afterwards. `e` is clamped to at
    /// least 1 so the logarithm is always defined.
    Logarithmic,
}

impl CoolingSchedule {
    /// Temperature after step `evaluation`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tspf::sa::CoolingSchedule;
    ///
    /// let t = CoolingSchedule::Geometric.next_temperature(100.0, 1, 100.0, 0.9, 0);
    /// assert!((t - 90.0).abs() < 1e-12);
    ///
    /// let t = CoolingSchedule::Linear.next_temperature(100.0, 25, 100.0, 0.9, 100);
    /// assert!((t - 75.0).abs() < 1e-12);
    /// ```
    pub fn next_temperature(
        &self,
        current: f64,
        evaluation: usize,
        initial: f64,
        alpha: f64,
        max_evaluations: usize,
    ) -> f64 {
        match self {
            CoolingSchedule::Geometric => current * alpha,
            CoolingSchedule::Linear => {
                if max_evaluations == 0 {
                    return 0.0;
                }
                let remaining = 1.0 - evaluation as f64 / max_evaluations as f64;
                (initial * remaining).max(0.0)
            }
            CoolingSchedule::Logarithmic => {
                let e = evaluation.max(1) as f64;
                (initial * alpha) / (e.ln() + 1.0)
            }
        }
    }
}

/// Configuration for Simulated Annealing.
///
/// # Examples
///
/// ```
/// use tspf::sa::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(100.0)
///     .with_min_temperature(0.01)
///     .with_alpha(0.995)
///     .with_cooling(CoolingSchedule::Geometric);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// The run stops once the temperature is at or below this value.
    /// `0` disables the temperature criterion.
    pub min_temperature: f64,

    /// Cooling factor in (0, 1] for geometric and logarithmic cooling.
    pub alpha: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            min_temperature: 900.0,
            alpha: 0.98,
            cooling: CoolingSchedule::Geometric,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    /// Whether cooling alone eventually stops the run.
    pub fn cools_to_minimum(&self) -> bool {
        self.min_temperature > 0.0
            && (self.cooling != CoolingSchedule::Geometric || self.alpha < 1.0)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`TspError::Configuration`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        if self.initial_temperature.is_nan() || self.initial_temperature <= 0.0 {
            return Err(TspError::config("initial_temperature must be positive"));
        }
        if self.min_temperature.is_nan() || self.min_temperature < 0.0 {
            return Err(TspError::config("min_temperature must be non-negative"));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(TspError::config(
                "min_temperature must be less than initial_temperature",
            ));
        }
        if self.alpha.is_nan() || self.alpha <= 0.0 || self.alpha > 1.0 {
            return Err(TspError::config(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}
