//! GA generational loop.
//!
//! [`GaRunner`] orchestrates the evolutionary process:
//! initialization → parent selection + crossover → mutation →
//! best-so-far update → replacement → repeat.

use super::config::{GaConfig, Replacement};
use super::population::Population;
use crate::error::{Result, TspError};
use crate::options::SearchOptions;
use crate::problem::DistanceModel;
use crate::random::{create_rng, resolve_seed};
use crate::search::SearchResult;
use crate::tour::Tour;
use crate::trajectory::{Trajectory, TrajectoryRecord};
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Executes the GA generational loop.
///
/// One iteration is one generation. The initial population counts as
/// `population_size` evaluations and every generation adds
/// `offspring_size` more.
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA from a random initial population.
    pub fn run(model: &DistanceModel, options: &SearchOptions) -> Result<SearchResult> {
        Self::run_with_cancel(model, options, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before the next generation and returns the best tour found so far.
    ///
    /// # Errors
    /// [`TspError::Configuration`] when the options are invalid or no
    /// stopping criterion is active.
    pub fn run_with_cancel(
        model: &DistanceModel,
        options: &SearchOptions,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SearchResult> {
        let config = &options.ga;
        options.validate()?;
        config.validate()?;
        let mut termination = options.termination();
        if let Some(flag) = cancel {
            termination = termination.with_cancel(flag);
        }
        if !termination.is_bounded() {
            return Err(TspError::config(
                "genetic algorithm needs at least one positive limit",
            ));
        }

        let seed = resolve_seed(options.seed);
        let mut rng = create_rng(seed);

        // 1. Initialize population
        let mut population = Population::random(model, config.population_size, &mut rng);
        let mut best = population_best(&population)?;
        let mut iterations = 0usize;
        let mut evaluations = config.population_size;

        let mut trajectory = Trajectory::new();
        trajectory.record(snapshot(&best, &population, iterations, evaluations));

        info!(
            nodes = model.node_count(),
            seed,
            population = config.population_size,
            offspring = config.offspring_size,
            initial_cost = best.cost(),
            "genetic algorithm started"
        );

        // 2. Generational loop
        let stop_reason = loop {
            if let Some(reason) = termination.check(iterations, evaluations) {
                break reason;
            }

            let mut offspring = Population::default();
            while offspring.len() < config.offspring_size {
                let (a, b) = population.select_parents(config.parent_selection, &mut rng)?;
                let members = population.members();
                let (c1, c2) = config
                    .crossover
                    .apply(model, &members[a], &members[b], &mut rng)?;
                offspring.push(c1);
                if offspring.len() < config.offspring_size {
                    offspring.push(c2);
                }
            }

            offspring.mutate(
                model,
                config.mutation,
                config.mutation_probability,
                &mut rng,
            );

            iterations += 1;
            evaluations += config.offspring_size;

            let generation_best = population_best(&offspring)?;
            if generation_best.cost() < best.cost() {
                debug!(
                    from = best.cost(),
                    to = generation_best.cost(),
                    generation = iterations,
                    "new best"
                );
                best = generation_best;
                trajectory.record(snapshot(&best, &population, iterations, evaluations));
            }

            // 3. Replacement
            population = replace(population, offspring, config, &mut rng)?;

            trace!(
                generation = iterations,
                best = best.cost(),
                average = population.average(),
                std_dev = population.std_dev(),
                "generation"
            );
        };

        trajectory.record(snapshot(&best, &population, iterations, evaluations));
        let elapsed = termination.elapsed();

        info!(
            best_cost = best.cost(),
            generations = iterations,
            evaluations,
            ?stop_reason,
            elapsed_ms = elapsed.as_millis() as u64,
            "genetic algorithm finished"
        );

        Ok(SearchResult {
            best,
            trajectory,
            iterations,
            evaluations,
            elapsed,
            final_temperature: None,
            stop_reason,
            seed,
        })
    }
}

/// Forms the next generation of exactly `population_size` members.
///
/// (μ,λ) keeps offspring only; (μ+λ) selects from offspring and parents.
fn replace<R: Rng>(
    parents: Population,
    mut offspring: Population,
    config: &GaConfig,
    rng: &mut R,
) -> Result<Population> {
    match config.replacement {
        Replacement::MuLambda => {
            if offspring.len() > config.population_size {
                offspring.select_population(
                    config.population_size,
                    config.survivor_selection,
                    rng,
                )?;
            }
        }
        Replacement::MuPlusLambda => {
            offspring.join(parents);
            offspring.select_population(
                config.population_size,
                config.survivor_selection,
                rng,
            )?;
        }
    }
    Ok(offspring)
}

fn population_best(population: &Population) -> Result<Tour> {
    population
        .best()
        .cloned()
        .ok_or_else(|| TspError::config("population must not be empty"))
}

/// Best-so-far record annotated with the statistics of `population`.
fn snapshot(
    best: &Tour,
    population: &Population,
    iterations: usize,
    evaluations: usize,
) -> TrajectoryRecord {
    let worst = population.worst().map_or(best.cost(), Tour::cost);
    TrajectoryRecord::new(best, iterations, evaluations).with_population_stats(
        population.average(),
        population.std_dev(),
        worst,
    )
}
