//! Reusable neighbourhood descent.
//!
//! [`LocalSearch`] repeatedly scans the swap, 2-opt or 3-opt
//! neighbourhood of a tour and applies improving moves until a full
//! pass finds none. It owns no counters or termination state: callers
//! pass their evaluation counter, a stop predicate and an improvement
//! callback, which lets both [`LsRunner`](super::LsRunner) and the
//! iterated local search drive the same code.
//!
//! # Neighbourhoods
//!
//! | Move | Candidates | Delta |
//! |---|---|---|
//! | swap | `(i, j > i)` | O(1) |
//! | 2-opt | `(i, j >= i + 2)`, full reversal excluded | O(1) |
//! | 3-opt | `(i, j >= i + 2, k >= j + 2)`, `k < n + (i > 0)` | best of 7 cases |

use super::config::LsConfig;
use crate::problem::{Cost, DistanceModel};
use crate::termination::StopReason;
use crate::tour::{MoveKind, Tour};

/// Outcome of one call to [`LocalSearch::descend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descent {
    /// Completed neighbourhood passes.
    pub passes: usize,
    /// Applied improving moves.
    pub improvements: usize,
    /// [`StopReason::LocalOptimum`] or the limit reported by the stop
    /// predicate.
    pub stop_reason: StopReason,
}

enum Pass {
    Improved,
    LocalOptimum,
    Stopped(StopReason),
}

/// Descent engine over one neighbourhood.
#[derive(Debug, Clone, Copy)]
pub struct LocalSearch<'a> {
    model: &'a DistanceModel,
    move_kind: MoveKind,
    best_improvement: bool,
}

impl<'a> LocalSearch<'a> {
    pub fn new(model: &'a DistanceModel, move_kind: MoveKind, config: &LsConfig) -> Self {
        Self {
            model,
            move_kind,
            best_improvement: config.best_improvement,
        }
    }

    /// Descends `tour` until a pass finds no improvement or `stop`
    /// reports a limit.
    ///
    /// Every evaluated candidate increments `evaluations`. `stop` receives
    /// the completed passes and current evaluations; it is checked before
    /// each pass and between rows of the scan. `on_improvement` runs after
    /// every applied move with the tour, completed passes and evaluations.
    pub fn descend<S, F>(
        &self,
        tour: &mut Tour,
        evaluations: &mut usize,
        stop: S,
        mut on_improvement: F,
    ) -> Descent
    where
        S: Fn(usize, usize) -> Option<StopReason>,
        F: FnMut(&Tour, usize, usize),
    {
        let mut passes = 0usize;
        let mut improvements = 0usize;

        let stop_reason = loop {
            if let Some(reason) = stop(passes, *evaluations) {
                break reason;
            }
            let outcome = match self.move_kind {
                MoveKind::Swap | MoveKind::TwoOpt => self.pair_pass(
                    tour,
                    evaluations,
                    passes,
                    &stop,
                    &mut improvements,
                    &mut on_improvement,
                ),
                MoveKind::ThreeOpt => self.three_opt_pass(
                    tour,
                    evaluations,
                    passes,
                    &stop,
                    &mut improvements,
                    &mut on_improvement,
                ),
            };
            match outcome {
                Pass::Improved => passes += 1,
                Pass::LocalOptimum => {
                    passes += 1;
                    break StopReason::LocalOptimum;
                }
                Pass::Stopped(reason) => break reason,
            }
        };

        Descent {
            passes,
            improvements,
            stop_reason,
        }
    }

    /// One swap or 2-opt pass. First improvement applies the first
    /// improving candidate; best improvement applies the best one once
    /// the scan ends (or is interrupted).
    fn pair_pass<S, F>(
        &self,
        tour: &mut Tour,
        evaluations: &mut usize,
        passes: usize,
        stop: &S,
        improvements: &mut usize,
        on_improvement: &mut F,
    ) -> Pass
    where
        S: Fn(usize, usize) -> Option<StopReason>,
        F: FnMut(&Tour, usize, usize),
    {
        let n = tour.len();
        let swap = self.move_kind == MoveKind::Swap;
        let gap = if swap { 1 } else { 2 };
        let mut best: Option<(usize, usize, Cost)> = None;
        let mut interrupted = None;

        'scan: for i in 0..n {
            if i > 0 {
                if let Some(reason) = stop(passes, *evaluations) {
                    interrupted = Some(reason);
                    break;
                }
            }
            for j in (i + gap)..n {
                if !swap && i == 0 && j == n - 1 {
                    continue;
                }
                let delta = if swap {
                    tour.swap_delta(self.model, i, j)
                } else {
                    tour.two_opt_delta(self.model, i, j)
                };
                *evaluations += 1;
                if delta < best.map_or(0, |(_, _, d)| d) {
                    best = Some((i, j, delta));
                    if !self.best_improvement {
                        break 'scan;
                    }
                }
            }
        }

        if let Some((i, j, _)) = best {
            if swap {
                tour.swap(self.model, i, j);
            } else {
                tour.two_opt(self.model, i, j);
            }
            *improvements += 1;
            on_improvement(tour, passes, *evaluations);
        }

        match (interrupted, best) {
            (Some(reason), _) => Pass::Stopped(reason),
            (None, Some(_)) => Pass::Improved,
            (None, None) => Pass::LocalOptimum,
        }
    }

    /// One 3-opt pass. Improving triples are applied as they are found;
    /// first improvement ends the pass after the first one.
    fn three_opt_pass<S, F>(
        &self,
        tour: &mut Tour,
        evaluations: &mut usize,
        passes: usize,
        stop: &S,
        improvements: &mut usize,
        on_improvement: &mut F,
    ) -> Pass
    where
        S: Fn(usize, usize) -> Option<StopReason>,
        F: FnMut(&Tour, usize, usize),
    {
        let n = tour.len();
        let mut improved = false;

        for i in 0..n {
            if i > 0 {
                if let Some(reason) = stop(passes, *evaluations) {
                    return Pass::Stopped(reason);
                }
            }
            let k_end = n + usize::from(i > 0);
            for j in (i + 2)..n {
                for k in (j + 2)..k_end {
                    let delta = tour.three_opt(self.model, i, j, k);
                    *evaluations += 1;
                    if delta < 0 {
                        improved = true;
                        *improvements += 1;
                        on_improvement(tour, passes, *evaluations);
                        if !self.best_improvement {
                            return Pass::Improved;
                        }
                    }
                }
            }
        }

        if improved {
            Pass::Improved
        } else {
            Pass::LocalOptimum
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::tests::{line_model, ring_model};
    use crate::random::create_rng;

    fn never(_: usize, _: usize) -> Option<StopReason> {
        None
    }

    /// No candidate of the neighbourhood improves `tour`.
    fn is_local_optimum(model: &DistanceModel, tour: &Tour, kind: MoveKind) -> bool {
        let n = tour.len();
        (0..n).all(|i| match kind {
            MoveKind::Swap => ((i + 1)..n).all(|j| tour.swap_delta(model, i, j) >= 0),
            _ => ((i + 2)..n).all(|j| tour.two_opt_delta(model, i, j) >= 0),
        })
    }

    #[test]
    fn test_descent_reaches_local_optimum() {
        let model = ring_model(14);
        let mut rng = create_rng(3);
        for kind in [MoveKind::Swap, MoveKind::TwoOpt] {
            for best_improvement in [false, true] {
                let config = LsConfig::default().with_best_improvement(best_improvement);
                let ls = LocalSearch::new(&model, kind, &config);
                let mut tour = Tour::random(&model, &mut rng);
                let mut evaluations = 0;
                let descent = ls.descend(&mut tour, &mut evaluations, never, |_, _, _| {});
                assert_eq!(descent.stop_reason, StopReason::LocalOptimum);
                assert!(tour.check(&model).is_ok());
                assert!(is_local_optimum(&model, &tour, kind), "{kind:?}");
                assert_eq!(descent.passes, descent.improvements + 1);
            }
        }
    }

    #[test]
    fn test_best_improvement_takes_steepest_move() {
        let model = ring_model(12);
        let mut rng = create_rng(8);
        let mut tour = Tour::random(&model, &mut rng);
        let n = tour.len();
        let steepest = (0..n)
            .flat_map(|i| ((i + 2)..n).map(move |j| (i, j)))
            .map(|(i, j)| tour.two_opt_delta(&model, i, j))
            .min()
            .unwrap();
        assert!(steepest < 0);

        let start = tour.cost();
        let config = LsConfig::default().with_best_improvement(true);
        let ls = LocalSearch::new(&model, MoveKind::TwoOpt, &config);
        let mut evaluations = 0;
        let descent = ls.descend(
            &mut tour,
            &mut evaluations,
            |p, _| (p >= 1).then_some(StopReason::MaxIterations),
            |_, _, _| {},
        );
        assert_eq!(descent.passes, 1);
        assert_eq!(descent.improvements, 1);
        assert_eq!(tour.cost(), start + steepest);
    }

    #[test]
    fn test_three_opt_descent() {
        let model = ring_model(10);
        let mut rng = create_rng(5);
        for best_improvement in [false, true] {
            let config = LsConfig::default().with_best_improvement(best_improvement);
            let ls = LocalSearch::new(&model, MoveKind::ThreeOpt, &config);
            let mut tour = Tour::random(&model, &mut rng);
            let start = tour.cost();
            let mut evaluations = 0;
            let descent = ls.descend(&mut tour, &mut evaluations, never, |_, _, _| {});
            assert_eq!(descent.stop_reason, StopReason::LocalOptimum);
            assert!(tour.cost() <= start);
            assert!(tour.check(&model).is_ok());
            assert!(evaluations > 0);
        }
    }

    #[test]
    fn test_evaluations_per_pass() {
        // the identity tour on a line is 2-opt optimal: one pass, no moves
        let model = line_model(6);
        let ls = LocalSearch::new(&model, MoveKind::TwoOpt, &LsConfig::default());
        let mut tour = Tour::deterministic(&model);
        let mut evaluations = 0;
        let descent = ls.descend(&mut tour, &mut evaluations, never, |_, _, _| {});
        // pairs (i, j >= i + 2) of 6 positions minus the full reversal
        assert_eq!(evaluations, 10 - 1);
        assert_eq!(descent.passes, 1);
        assert_eq!(descent.improvements, 0);

        let swap = LocalSearch::new(&model, MoveKind::Swap, &LsConfig::default());
        let mut evaluations = 0;
        swap.descend(&mut tour, &mut evaluations, never, |_, _, _| {});
        assert_eq!(evaluations, 15);
    }

    #[test]
    fn test_stop_predicate_interrupts() {
        let model = ring_model(30);
        let mut rng = create_rng(1);
        let ls = LocalSearch::new(&model, MoveKind::TwoOpt, &LsConfig::default());
        let mut tour = Tour::random(&model, &mut rng);
        let mut evaluations = 0;
        let descent = ls.descend(
            &mut tour,
            &mut evaluations,
            |_, e| (e >= 50).then_some(StopReason::MaxEvaluations),
            |_, _, _| {},
        );
        assert_eq!(descent.stop_reason, StopReason::MaxEvaluations);
        // stop is checked between rows, so a row may overshoot
        assert!(evaluations >= 50 && evaluations < 50 + 30);
        assert!(tour.check(&model).is_ok());
    }

    #[test]
    fn test_improvement_callback() {
        let model = ring_model(12);
        let mut rng = create_rng(2);
        let ls = LocalSearch::new(&model, MoveKind::Swap, &LsConfig::default());
        let mut tour = Tour::random(&model, &mut rng);
        let mut costs = vec![tour.cost()];
        let mut evaluations = 0;
        let descent = ls.descend(&mut tour, &mut evaluations, never, |t, _, _| {
            costs.push(t.cost())
        });
        assert_eq!(costs.len(), descent.improvements + 1);
        for window in costs.windows(2) {
            assert!(window[1] < window[0]);
        }
    }
}
