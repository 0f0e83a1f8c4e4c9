//! Metaheuristic framework for the symmetric Travelling Salesman Problem.
//!
//! Four search engines share one tour representation, one set of move
//! operators and one options object:
//!
//! - **Simulated Annealing (SA)**: Metropolis acceptance of random moves
//!   with geometric, linear or logarithmic cooling.
//! - **Genetic Algorithm (GA)**: Generational (μ,λ) / (μ+λ) evolution with
//!   OX, PMX and one-point crossover and pluggable selection.
//! - **Local Search (LS)**: First- or best-improvement descent over the
//!   swap, 2-opt or 3-opt neighbourhood.
//! - **Iterated Local Search (ILS)**: Local search restarted from random
//!   perturbations of the current local optimum.
//!
//! # Architecture
//!
//! An instance reader builds a [`DistanceModel`]; the engines only read
//! it. [`solve`] dispatches on [`Algorithm`] and returns a
//! [`SearchResult`] with the best tour and its [`Trajectory`]. All
//! randomness flows from one seed, so identical options give identical
//! runs. Engines emit `tracing` events and never install a subscriber.
//!
//! ```
//! use tspf::{solve, Algorithm, DistanceModel, MoveKind, SearchOptions};
//!
//! let model = DistanceModel::new(vec![
//!     vec![0, 1, 2, 1],
//!     vec![1, 0, 1, 2],
//!     vec![2, 1, 0, 1],
//!     vec![1, 2, 1, 0],
//! ]).unwrap();
//! let options = SearchOptions::default()
//!     .with_seed(7)
//!     .with_move_kind(MoveKind::Swap);
//! let result = solve(&model, Algorithm::LocalSearch, &options).unwrap();
//! assert_eq!(result.best_cost(), 4);
//! ```

pub mod error;
pub mod experiment;
pub mod ga;
pub mod ils;
pub mod local_search;
pub mod options;
pub mod problem;
pub mod random;
pub mod report;
pub mod sa;
pub mod search;
pub mod termination;
pub mod tour;
pub mod trajectory;

pub use error::{Result, TspError};
pub use options::SearchOptions;
pub use problem::{Cost, DistanceModel};
pub use search::{solve, solve_with_cancel, Algorithm, SearchResult};
pub use termination::StopReason;
pub use tour::{InitialSolution, MoveKind, Tour};
pub use trajectory::{Trajectory, TrajectoryRecord};
