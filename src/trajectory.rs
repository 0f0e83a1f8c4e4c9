//! Search trajectory.
//!
//! Every engine owns one [`Trajectory`] and appends a
//! [`TrajectoryRecord`] at the start of the run, on every new
//! best-so-far and at the end. Records are never modified or removed.

use crate::problem::Cost;
use crate::tour::Tour;

/// Snapshot of the best-so-far tour at one point of a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrajectoryRecord {
    /// Closed visiting order of the recorded tour.
    pub sequence: Vec<usize>,
    /// Tour cost.
    pub cost: Cost,
    /// Iteration counter at the time of recording.
    pub iterations: usize,
    /// Evaluation counter at the time of recording.
    pub evaluations: usize,
    /// Mean population cost (GA only).
    pub average: Option<f64>,
    /// Sample standard deviation of the population cost (GA only).
    pub std_dev: Option<f64>,
    /// Temperature (SA only).
    pub temperature: Option<f64>,
    /// Worst population cost (GA only).
    pub worst: Option<Cost>,
}

impl TrajectoryRecord {
    /// Record of `tour` with no algorithm-specific fields.
    pub fn new(tour: &Tour, iterations: usize, evaluations: usize) -> Self {
        Self {
            sequence: tour.sequence().to_vec(),
            cost: tour.cost(),
            iterations,
            evaluations,
            average: None,
            std_dev: None,
            temperature: None,
            worst: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_population_stats(mut self, average: f64, std_dev: f64, worst: Cost) -> Self {
        self.average = Some(average);
        self.std_dev = Some(std_dev);
        self.worst = Some(worst);
        self
    }
}

/// Append-only list of [`TrajectoryRecord`]s.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trajectory {
    records: Vec<TrajectoryRecord>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn record(&mut self, record: TrajectoryRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TrajectoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&TrajectoryRecord> {
        self.records.last()
    }

    pub fn into_records(self) -> Vec<TrajectoryRecord> {
        self.records
    }
}
