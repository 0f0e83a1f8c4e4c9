//! Local Search (LS).
//!
//! Deterministic descent over the swap, 2-opt or 3-opt neighbourhood
//! with either first-improvement or best-improvement pivoting. The
//! search stops at the first local optimum or when a run limit is hit.
//!
//! [`LocalSearch`] is the reusable descent engine; [`LsRunner`] wraps it
//! into a complete run with trajectory and result.
//!
//! # References
//!
//! - Croes (1958), "A Method for Solving Traveling-Salesman Problems"
//! - Lin (1965), "Computer Solutions of the Traveling Salesman Problem"
//! - Hansen & Mladenović (2006), "First vs. best improvement: An empirical study"

mod config;
mod descent;
mod runner;

pub use config::LsConfig;
pub use descent::{Descent, LocalSearch};
pub use runner::LsRunner;
