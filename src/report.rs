//! Result persistence.
//!
//! Plain-text and `;`-delimited CSV writers for solutions, trajectories
//! and the long-lived run log. The writers only read in-memory results;
//! a failure here never affects a finished [`SearchResult`].
//!
//! | Output | Format |
//! |---|---|
//! | solution | closed tour, space-separated |
//! | trajectory | `iterations;evaluations;cost;solution` |
//! | run log | `algorithm;instance;timestamp;seed;cost;solution;config` |

use crate::error::Result;
use crate::options::SearchOptions;
use crate::problem::Cost;
use crate::search::{Algorithm, SearchResult};
use crate::tour::Tour;
use crate::trajectory::Trajectory;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Default cap on numbered copies kept by [`available_path`].
pub const DEFAULT_MAX_FILES: usize = 30;

const DELIMITER: u8 = b';';

fn join_nodes(nodes: &[usize]) -> String {
    nodes
        .iter()
        .map(|node| node.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes the closed tour as space-separated node indices.
pub fn write_solution<W: Write>(mut writer: W, tour: &Tour) -> Result<()> {
    writer.write_all(join_nodes(tour.sequence()).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Writes one CSV row per trajectory record.
pub fn write_trajectory<W: Write>(writer: W, trajectory: &Trajectory) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(writer);
    csv.write_record(["iterations", "evaluations", "cost", "solution"])?;
    for record in trajectory.records() {
        csv.write_record([
            record.iterations.to_string(),
            record.evaluations.to_string(),
            record.cost.to_string(),
            join_nodes(&record.sequence),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// One row of the run log.
#[derive(Debug, Clone, PartialEq)]
pub struct RunLogEntry {
    pub algorithm: Algorithm,
    /// Instance name or path, as given by the caller.
    pub instance: String,
    /// Unix seconds.
    pub timestamp: u64,
    pub seed: u64,
    pub cost: Cost,
    /// Closed tour of the best solution.
    pub solution: Vec<usize>,
    /// Parameters of the run, rendered as `key=value` pairs.
    pub config: String,
}

impl RunLogEntry {
    /// Builds the entry for a finished run, stamped with the current time.
    pub fn new(
        algorithm: Algorithm,
        instance: impl Into<String>,
        options: &SearchOptions,
        result: &SearchResult,
    ) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        Self {
            algorithm,
            instance: instance.into(),
            timestamp,
            seed: result.seed,
            cost: result.best_cost(),
            solution: result.best.sequence().to_vec(),
            config: describe_config(algorithm, options),
        }
    }
}

/// Renders the options relevant to `algorithm`.
fn describe_config(algorithm: Algorithm, options: &SearchOptions) -> String {
    let common = format!(
        "max_iterations={} max_evaluations={} max_time={} initial={:?} move={:?}",
        options.max_iterations,
        options.max_evaluations,
        options.max_time,
        options.initial_solution,
        options.move_kind,
    );
    let specific = match algorithm {
        Algorithm::SimulatedAnnealing => {
            let sa = &options.sa;
            format!(
                "t0={} tmin={} alpha={} cooling={:?}",
                sa.initial_temperature, sa.min_temperature, sa.alpha, sa.cooling
            )
        }
        Algorithm::Genetic => {
            let ga = &options.ga;
            format!(
                "population={} offspring={} parents={:?} crossover={:?} mutation={:?} \
                 mutation_probability={} replacement={:?} survivors={:?}",
                ga.population_size,
                ga.offspring_size,
                ga.parent_selection,
                ga.crossover,
                ga.mutation,
                ga.mutation_probability,
                ga.replacement,
                ga.survivor_selection,
            )
        }
        Algorithm::LocalSearch => {
            format!("best_improvement={}", options.local_search.best_improvement)
        }
        Algorithm::IteratedLocalSearch => format!(
            "best_improvement={} perturbation={:?} perturbations={}",
            options.local_search.best_improvement,
            options.ils.perturbation,
            options.ils.perturbations,
        ),
    };
    format!("{common} {specific}")
}

/// Appends `entry` to the run log at `path`, creating the file and
/// writing the header when it is empty.
pub fn append_run_log(path: impl AsRef<Path>, entry: &RunLogEntry) -> Result<()> {
    let path = path.as_ref();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let empty = file.metadata()?.len() == 0;

    let mut csv = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(file);
    if empty {
        csv.write_record([
            "algorithm",
            "instance",
            "timestamp",
            "seed",
            "cost",
            "solution",
            "config",
        ])?;
    }
    csv.write_record([
        entry.algorithm.code().to_string(),
        entry.instance.clone(),
        entry.timestamp.to_string(),
        entry.seed.to_string(),
        entry.cost.to_string(),
        join_nodes(&entry.solution),
        entry.config.clone(),
    ])?;
    csv.flush()?;
    debug!(path = %path.display(), algorithm = %entry.algorithm, "run logged");
    Ok(())
}

/// Path that does not overwrite an existing file.
///
/// Returns `path` when it is free, otherwise the first free
/// `stem_1.ext`, `stem_2.ext`, … up to `max_files`. When all numbered
/// copies exist the least recently modified candidate is reused.
pub fn available_path(path: impl AsRef<Path>, max_files: usize) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(path.to_path_buf());
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut candidates = vec![path.to_path_buf()];
    for number in 1..=max_files {
        let candidate = path.with_file_name(format!("{stem}_{number}{extension}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
        candidates.push(candidate);
    }

    let mut oldest = (path.to_path_buf(), fs::metadata(path)?.modified()?);
    for candidate in candidates.into_iter().skip(1) {
        let modified = fs::metadata(&candidate)?.modified()?;
        if modified < oldest.1 {
            oldest = (candidate, modified);
        }
    }
    warn!(
        path = %oldest.0.display(),
        max_files,
        "file limit reached, reusing the oldest file"
    );
    Ok(oldest.0)
}
