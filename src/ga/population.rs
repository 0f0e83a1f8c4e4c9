//! GA population.

use super::selection::Selection;
use crate::error::Result;
use crate::problem::{Cost, DistanceModel};
use crate::tour::{MoveKind, Tour};
use rand::Rng;

/// A set of tours with a cached best member.
///
/// `best_index` is `None` exactly when the population is empty and
/// otherwise points at a member of minimal cost (first on ties). Every
/// mutating method keeps it consistent.
#[derive(Debug, Clone, Default)]
pub struct Population {
    members: Vec<Tour>,
    best_index: Option<usize>,
}

impl Population {
    /// `size` random tours.
    pub fn random<R: Rng>(model: &DistanceModel, size: usize, rng: &mut R) -> Self {
        let members = (0..size).map(|_| Tour::random(model, rng)).collect();
        Self::from_tours(members)
    }

    pub fn from_tours(members: Vec<Tour>) -> Self {
        let mut population = Self {
            members,
            best_index: None,
        };
        population.refresh_best();
        population
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Tour] {
        &self.members
    }

    /// Cheapest member.
    pub fn best(&self) -> Option<&Tour> {
        self.best_index.map(|i| &self.members[i])
    }

    pub fn best_index(&self) -> Option<usize> {
        self.best_index
    }

    /// Most expensive member (last on ties).
    pub fn worst(&self) -> Option<&Tour> {
        self.members.iter().max_by_key(|t| t.cost())
    }

    /// Mean member cost, 0 when empty.
    pub fn average(&self) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        self.members.iter().map(|t| t.cost() as f64).sum::<f64>() / self.members.len() as f64
    }

    /// Sample standard deviation of member costs, 0 for fewer than two
    /// members.
    pub fn std_dev(&self) -> f64 {
        let n = self.members.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.average();
        let sum_sq: f64 = self
            .members
            .iter()
            .map(|t| {
                let d = t.cost() as f64 - mean;
                d * d
            })
            .sum();
        (sum_sq / (n - 1) as f64).sqrt()
    }

    /// Member costs in member order.
    pub fn costs(&self) -> Vec<Cost> {
        self.members.iter().map(Tour::cost).collect()
    }

    pub fn push(&mut self, tour: Tour) {
        let cost = tour.cost();
        self.members.push(tour);
        let improves = match self.best() {
            Some(best) => cost < best.cost(),
            None => true,
        };
        if improves {
            self.best_index = Some(self.members.len() - 1);
        }
    }

    pub fn extend(&mut self, tours: impl IntoIterator<Item = Tour>) {
        for tour in tours {
            self.push(tour);
        }
    }

    /// Moves every member of `other` into this population.
    pub fn join(&mut self, other: Population) {
        self.extend(other.members);
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.best_index = None;
    }

    /// Truncates to the first `len` members.
    pub fn truncate(&mut self, len: usize) {
        if len < self.members.len() {
            self.members.truncate(len);
            self.refresh_best();
        }
    }

    /// Recomputes `best_index` with a full scan.
    pub fn refresh_best(&mut self) {
        self.best_index = self
            .members
            .iter()
            .enumerate()
            .min_by_key(|(i, t)| (t.cost(), *i))
            .map(|(i, _)| i);
    }

    /// Picks two parent indices with `selection`.
    ///
    /// # Errors
    /// [`TspError::Configuration`](crate::error::TspError::Configuration)
    /// when the population has fewer than 2 members.
    pub fn select_parents<R: Rng>(
        &self,
        selection: Selection,
        rng: &mut R,
    ) -> Result<(usize, usize)> {
        let picked = selection.select(&self.costs(), 2, rng)?;
        Ok((picked[0], picked[1]))
    }

    /// Shrinks the population to exactly `size` survivors.
    ///
    /// # Errors
    /// [`TspError::Configuration`](crate::error::TspError::Configuration)
    /// when `size` exceeds the current size.
    pub fn select_population<R: Rng>(
        &mut self,
        size: usize,
        selection: Selection,
        rng: &mut R,
    ) -> Result<()> {
        let survivors = selection.select_survivors(&self.costs(), size, rng)?;
        let mut slots: Vec<Option<Tour>> = std::mem::take(&mut self.members)
            .into_iter()
            .map(Some)
            .collect();
        self.members = survivors
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();
        self.refresh_best();
        Ok(())
    }

    /// Gives each member one random move of `kind` with probability
    /// `probability`. Returns the number of mutated members.
    pub fn mutate<R: Rng>(
        &mut self,
        model: &DistanceModel,
        kind: MoveKind,
        probability: f64,
        rng: &mut R,
    ) -> usize {
        let mut mutated = 0;
        for tour in &mut self.members {
            if rng.random::<f64>() < probability {
                tour.random_move(model, kind, rng);
                mutated += 1;
            }
        }
        if mutated > 0 {
            self.refresh_best();
        }
        mutated
    }
}
