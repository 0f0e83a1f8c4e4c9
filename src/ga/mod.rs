//! Genetic Algorithm (GA) over permutation tours.
//!
//! A generational GA with (μ,λ) or (μ+λ) replacement. Each generation
//! selects parent pairs from the population, recombines them with a
//! permutation crossover, mutates the offspring with a tour move and
//! selects the next population from the offspring (or offspring and
//! parents).
//!
//! # Key Types
//!
//! - [`GaConfig`]: population sizes, operators and replacement
//! - [`Population`]: tours with cached best index and statistics
//! - [`Selection`] / [`Crossover`] / [`Replacement`]: operator kinds
//! - [`GaRunner`]: executes the generational loop
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem" (PMX)
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains" (OX)
//! - Eiben & Smith (2015), *Introduction to Evolutionary Computing*

mod config;
mod crossover;
mod population;
mod runner;
mod selection;

pub use config::{GaConfig, Replacement};
pub use crossover::Crossover;
pub use population::Population;
pub use runner::GaRunner;
pub use selection::{roulette_wheel, Selection};
