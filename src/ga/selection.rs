//! Selection strategies for the GA.
//!
//! Selection works on a slice of tour costs and returns indices into it,
//! so the same code picks parents and survivors. All strategies assume
//! **minimization** and return `size` distinct indices.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use crate::error::{Result, TspError};
use crate::problem::Cost;
use rand::seq::index;
use rand::Rng;

/// Selection strategy for parents and survivors.
///
/// # Examples
///
/// ```
/// use tspf::ga::Selection;
///
/// // Tournament with 3 participants
/// let sel = Selection::Tournament(3);
///
/// // Fitness-proportionate, inverted for minimization
/// let sel = Selection::Roulette;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// The `size` cheapest members (elitist).
    Best,

    /// Uniform sample without replacement.
    #[default]
    Random,

    /// Roulette wheel over `(min + max - cost)`.
    ///
    /// Each chosen candidate leaves the wheel before the next draw.
    ///
    /// # Complexity
    /// O(n) per draw (wheel rebuilt after each removal)
    Roulette,

    /// Tournament among `k` distinct random participants.
    ///
    /// Higher `k` = stronger selection pressure.
    ///
    /// # Complexity
    /// O(k) per tournament
    Tournament(usize),
}

impl Selection {
    /// Picks `size` distinct indices into `costs` (parent selection).
    ///
    /// Tournament winners are deduplicated in first-win order; the
    /// tournament size is clamped to `len - size + 1` so that enough
    /// distinct winners always exist.
    ///
    /// # Errors
    /// [`TspError::Configuration`] when `size > costs.len()`.
    pub fn select<R: Rng>(&self, costs: &[Cost], size: usize, rng: &mut R) -> Result<Vec<usize>> {
        let n = check_size(costs, size)?;
        if size == n {
            return Ok((0..n).collect());
        }

        let selected = match self {
            Selection::Best => best(costs, size),
            Selection::Random => index::sample(rng, n, size).into_vec(),
            Selection::Roulette => roulette(costs, size, rng),
            Selection::Tournament(k) => {
                let k = (*k).clamp(1, n - size + 1);
                let mut winners = Vec::with_capacity(size);
                while winners.len() < size {
                    let participants = index::sample(rng, n, k);
                    let winner = participants
                        .iter()
                        .min_by_key(|&i| (costs[i], i))
                        .unwrap_or(0);
                    if !winners.contains(&winner) {
                        winners.push(winner);
                    }
                }
                winners
            }
        };
        Ok(selected)
    }

    /// Picks `size` distinct indices into `costs` that survive into the
    /// next generation.
    ///
    /// Identical to [`Selection::select`] except for tournaments, where
    /// each winner is removed from the pool before the next tournament.
    ///
    /// # Errors
    /// [`TspError::Configuration`] when `size > costs.len()`.
    pub fn select_survivors<R: Rng>(
        &self,
        costs: &[Cost],
        size: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        let n = check_size(costs, size)?;
        match self {
            Selection::Tournament(k) if size < n => {
                let mut pool: Vec<usize> = (0..n).collect();
                let mut survivors = Vec::with_capacity(size);
                for _ in 0..size {
                    let k = (*k).clamp(1, pool.len());
                    let participants = index::sample(rng, pool.len(), k);
                    let slot = participants
                        .iter()
                        .min_by_key(|&p| (costs[pool[p]], pool[p]))
                        .unwrap_or(0);
                    survivors.push(pool.remove(slot));
                }
                Ok(survivors)
            }
            _ => self.select(costs, size, rng),
        }
    }
}

fn check_size(costs: &[Cost], size: usize) -> Result<usize> {
    let n = costs.len();
    if size > n {
        return Err(TspError::config(format!(
            "cannot select {size} members from a population of {n}"
        )));
    }
    Ok(n)
}

/// Indices of the `size` cheapest members, stable on ties.
fn best(costs: &[Cost], size: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..costs.len()).collect();
    order.sort_by_key(|&i| costs[i]);
    order.truncate(size);
    order
}

/// Roulette draws without replacement.
fn roulette<R: Rng>(costs: &[Cost], size: usize, rng: &mut R) -> Vec<usize> {
    let mut candidates: Vec<usize> = (0..costs.len()).collect();
    let mut selected = Vec::with_capacity(size);
    let mut candidate_costs: Vec<Cost> = Vec::with_capacity(costs.len());

    for _ in 0..size {
        candidate_costs.clear();
        candidate_costs.extend(candidates.iter().map(|&i| costs[i]));
        let wheel = roulette_wheel(&candidate_costs);
        let r: f64 = rng.random();
        // floating-point fallback: the last slot may sum to just under 1.0
        let slot = wheel
            .iter()
            .position(|&p| r < p)
            .unwrap_or(candidates.len() - 1);
        selected.push(candidates.remove(slot));
    }
    selected
}

/// Cumulative selection probabilities for minimization.
///
/// Each candidate weighs `min + max - cost`, so the cheapest tour gets
/// the largest slice. The result is non-decreasing and ends at `1.0`.
/// A zero total weight (every cost zero) yields a uniform wheel.
///
/// When the cheapest cost is `0` the most expensive candidates weigh
/// `0` and get an empty slice. [`Selection::Roulette`] rebuilds the
/// wheel after every draw, so they can still be picked later.
///
/// # Examples
///
/// ```
/// use tspf::ga::roulette_wheel;
///
/// let wheel = roulette_wheel(&[10, 20, 30]);
/// assert!((wheel[0] - 0.5).abs() < 1e-12);
/// assert!((wheel[2] - 1.0).abs() < 1e-12);
/// ```
pub fn roulette_wheel(costs: &[Cost]) -> Vec<f64> {
    let Some(&min) = costs.iter().min() else {
        return Vec::new();
    };
    let max = costs.iter().copied().max().unwrap_or(min);

    let weights: Vec<f64> = costs.iter().map(|&c| (min + max - c) as f64).collect();
    let total: f64 = weights.iter().sum();
    let n = costs.len() as f64;

    let mut cumulative = 0.0;
    let mut wheel: Vec<f64> = weights
        .iter()
        .map(|&w| {
            cumulative += if total > 0.0 { w / total } else { 1.0 / n };
            cumulative
        })
        .collect();
    if let Some(last) = wheel.last_mut() {
        *last = 1.0;
    }
    wheel
}
