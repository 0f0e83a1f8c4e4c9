//! Closed-tour representation.
//!
//! A [`Tour`] stores the visiting order as a closed sequence of length
//! `n + 1` (`sequence[0] == sequence[n]`) together with its cached cost.
//! Every constructor validates the permutation, and every move operator
//! in [`moves`] updates the cost incrementally so that it always equals
//! [`DistanceModel::tour_cost`] of the sequence.
//!
//! # Construction
//!
//! | Constructor | Sequence |
//! |---|---|
//! | [`Tour::random`] | uniform shuffle |
//! | [`Tour::nearest_neighbour`] | greedy nearest unvisited node |
//! | [`Tour::deterministic`] | `0, 1, ..., n-1` |
//! | [`Tour::from_sequence`] | caller supplied, validated |
//!
//! Copies are made with `Clone` / `clone_from`.

mod moves;

pub use moves::MoveKind;

use crate::error::{Result, TspError};
use crate::problem::{Cost, DistanceModel};
use rand::seq::SliceRandom;
use rand::Rng;

/// How the first tour of a run is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitialSolution {
    /// Uniformly random permutation.
    #[default]
    Random,
    /// Greedy nearest-neighbour construction from a random start node.
    NearestNeighbour,
    /// Identity order, for reproducible fixtures.
    Deterministic,
}

/// A closed TSP tour with its cached cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    sequence: Vec<usize>,
    cost: Cost,
}

impl Tour {
    /// Random permutation of all nodes.
    pub fn random<R: Rng>(model: &DistanceModel, rng: &mut R) -> Self {
        let mut sequence: Vec<usize> = (0..model.node_count()).collect();
        sequence.shuffle(rng);
        Self::close(model, sequence)
    }

    /// Greedy nearest-neighbour tour.
    ///
    /// Starts at `start` (a random node when `None` or out of range) and
    /// repeatedly moves to the closest unvisited node.
    pub fn nearest_neighbour<R: Rng>(
        model: &DistanceModel,
        start: Option<usize>,
        rng: &mut R,
    ) -> Self {
        let n = model.node_count();
        let start = match start {
            Some(s) if s < n => s,
            _ => rng.random_range(0..n),
        };

        let mut visited = vec![false; n];
        let mut sequence = Vec::with_capacity(n + 1);
        sequence.push(start);
        visited[start] = true;

        let mut last = start;
        for _ in 1..n {
            let next = model
                .neighbours(last)
                .iter()
                .copied()
                .find(|&node| !visited[node]);
            match next {
                Some(node) => {
                    visited[node] = true;
                    sequence.push(node);
                    last = node;
                }
                None => break,
            }
        }

        Self::close(model, sequence)
    }

    /// Identity order `0, 1, ..., n-1`.
    pub fn deterministic(model: &DistanceModel) -> Self {
        Self::close(model, (0..model.node_count()).collect())
    }

    /// Builds the initial tour selected by `kind`.
    pub fn initial<R: Rng>(model: &DistanceModel, kind: InitialSolution, rng: &mut R) -> Self {
        match kind {
            InitialSolution::Random => Self::random(model, rng),
            InitialSolution::NearestNeighbour => Self::nearest_neighbour(model, None, rng),
            InitialSolution::Deterministic => Self::deterministic(model),
        }
    }

    /// Wraps a caller-supplied sequence.
    ///
    /// Accepts either the open form (`n` nodes) or the closed form
    /// (`n + 1` nodes, last equal to first).
    ///
    /// # Errors
    /// [`TspError::MalformedTour`] when the sequence is not a permutation
    /// of all nodes or is not closed.
    pub fn from_sequence(model: &DistanceModel, mut sequence: Vec<usize>) -> Result<Self> {
        let n = model.node_count();
        if sequence.len() == n {
            if let Some(&first) = sequence.first() {
                sequence.push(first);
            }
        }
        check_sequence(n, &sequence)?;
        let cost = model.tour_cost(&sequence);
        Ok(Self { sequence, cost })
    }

    fn close(model: &DistanceModel, mut sequence: Vec<usize>) -> Self {
        if let Some(&first) = sequence.first() {
            sequence.push(first);
        }
        let cost = model.tour_cost(&sequence);
        Self { sequence, cost }
    }

    /// Validates closure, permutation and the cached cost.
    ///
    /// # Errors
    /// [`TspError::MalformedTour`] describing the first violation.
    pub fn check(&self, model: &DistanceModel) -> Result<()> {
        check_sequence(model.node_count(), &self.sequence)?;
        let actual = model.tour_cost(&self.sequence);
        if actual != self.cost {
            return Err(TspError::malformed(format!(
                "cached cost {} differs from recomputed cost {actual}",
                self.cost
            )));
        }
        Ok(())
    }

    /// Closed visiting order (`n + 1` entries).
    #[inline]
    pub fn sequence(&self) -> &[usize] {
        &self.sequence
    }

    /// Visiting order without the closing node.
    #[inline]
    pub fn open_sequence(&self) -> &[usize] {
        &self.sequence[..self.len()]
    }

    /// Total tour length.
    #[inline]
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Number of nodes in the tour.
    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len().saturating_sub(1)
    }

    /// Whether the tour has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Node visited at position `pos`.
    #[inline]
    pub fn node(&self, pos: usize) -> usize {
        self.sequence[pos]
    }

    /// Position of `node` in the open sequence.
    pub fn position(&self, node: usize) -> Option<usize> {
        self.open_sequence().iter().position(|&v| v == node)
    }

    /// Consumes the tour, returning the closed sequence.
    pub fn into_sequence(self) -> Vec<usize> {
        self.sequence
    }
}

fn check_sequence(n: usize, sequence: &[usize]) -> Result<()> {
    if sequence.len() != n + 1 {
        return Err(TspError::malformed(format!(
            "expected {} entries for {n} nodes, got {}",
            n + 1,
            sequence.len()
        )));
    }
    let mut used = vec![false; n];
    for (pos, &node) in sequence[..n].iter().enumerate() {
        if node >= n {
            return Err(TspError::malformed(format!(
                "node {node} at position {pos} is out of range"
            )));
        }
        if used[node] {
            return Err(TspError::malformed(format!(
                "node {node} appears twice (last position {pos})"
            )));
        }
        used[node] = true;
    }
    if sequence[0] != sequence[n] {
        return Err(TspError::malformed("sequence is not a closed tour"));
    }
    Ok(())
}
