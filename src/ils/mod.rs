//! Iterated Local Search (ILS).
//!
//! Alternates a full local search descent with a random perturbation of
//! the resulting local optimum. The walk always continues from the
//! perturbed tour; only the best-so-far tour is remembered.
//!
//! # References
//!
//! - Lourenço, Martin & Stützle (2003), "Iterated Local Search"
//! - Martin, Otto & Felten (1991), "Large-Step Markov Chains for the
//!   Traveling Salesman Problem"

mod config;
mod runner;

pub use config::{IlsConfig, Perturbation};
pub use runner::IlsRunner;
