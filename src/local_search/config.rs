//! Local search configuration.

/// Configuration parameters for Local Search.
///
/// The neighbourhood itself is
/// [`SearchOptions::move_kind`](crate::options::SearchOptions::move_kind).
///
/// # Examples
///
/// ```
/// use tspf::local_search::LsConfig;
///
/// let config = LsConfig::default().with_best_improvement(true);
/// assert!(config.best_improvement);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LsConfig {
    /// Scan the whole neighbourhood and apply the best improving move
    /// (`true`), or apply the first improving move and restart (`false`).
    pub best_improvement: bool,
}

impl LsConfig {
    /// Sets the pivoting rule.
    pub fn with_best_improvement(mut self, best_improvement: bool) -> Self {
        self.best_improvement = best_improvement;
        self
    }
}
