//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Each step applies one random move to a scratch
//! copy of the current tour and accepts worsening moves with the
//! Metropolis probability `exp(-delta / T)`. The temperature decreases
//! after every evaluation according to a [`CoolingSchedule`].
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod runner;

pub use config::{CoolingSchedule, SaConfig};
pub use runner::SaRunner;
