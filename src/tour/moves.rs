//! Move operators with incremental cost updates.
//!
//! Positions index the open part of the tour, `[0, n)`. Out-of-range or
//! coincident positions turn every operator into a no-op instead of an
//! error.
//!
//! # Complexity
//!
//! | Operator | Delta | Apply |
//! |---|---|---|
//! | swap | O(1) | O(1) |
//! | 2-opt | O(1) | O(n) |
//! | 3-opt (best of 7 cases) | O(1) | O(n) |
//!
//! # References
//!
//! - Croes (1958), "A Method for Solving Traveling-Salesman Problems"
//! - Lin (1965), "Computer Solutions of the Traveling Salesman Problem"

use super::Tour;
use crate::problem::{Cost, DistanceModel};
use crate::random::distinct_pair;
use rand::Rng;

/// Neighbourhood move used for SA neighbours, GA mutation, local search
/// and ILS perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveKind {
    /// Exchange the nodes at two positions.
    Swap,
    /// Reverse the segment between two positions.
    #[default]
    TwoOpt,
    /// Cut three edges and reconnect the segments in the best way.
    ThreeOpt,
}

impl MoveKind {
    /// All move kinds, in declaration order.
    pub const ALL: [MoveKind; 3] = [MoveKind::Swap, MoveKind::TwoOpt, MoveKind::ThreeOpt];
}

/// Percent chance (out of 101 draws of `0..=100`) that the randomized
/// 3-opt scan stops at the current triple.
const THREE_OPT_STOP_THRESHOLD: u32 = 1;

impl Tour {
    // ---- swap ----------------------------------------------------------

    /// Cost change of swapping positions `n1` and `n2`, without applying it.
    pub fn swap_delta(&self, model: &DistanceModel, n1: usize, n2: usize) -> Cost {
        let n = self.len();
        if n1 == n2 || n1 >= n || n2 >= n {
            return 0;
        }

        // Edge `p` joins positions `p` and `p + 1` (mod n).
        let prev = |p: usize| (p + n - 1) % n;
        let candidates = [prev(n1), n1, prev(n2), n2];
        let mut edges = [usize::MAX; 4];
        let mut count = 0;
        for edge in candidates {
            if !edges[..count].contains(&edge) {
                edges[count] = edge;
                count += 1;
            }
        }

        let after = |p: usize| {
            if p == n1 {
                self.sequence[n2]
            } else if p == n2 {
                self.sequence[n1]
            } else {
                self.sequence[p]
            }
        };

        edges[..count]
            .iter()
            .map(|&p| {
                let q = (p + 1) % n;
                model.distance(after(p), after(q)) - model.distance(self.sequence[p], self.sequence[q])
            })
            .sum()
    }

    /// Swaps the nodes at positions `n1` and `n2`.
    pub fn swap(&mut self, model: &DistanceModel, n1: usize, n2: usize) {
        let n = self.len();
        if n1 == n2 || n1 >= n || n2 >= n {
            return;
        }
        let delta = self.swap_delta(model, n1, n2);
        self.sequence.swap(n1, n2);
        self.sequence[n] = self.sequence[0];
        self.cost += delta;
    }

    // ---- 2-opt ---------------------------------------------------------

    /// Cost change of reversing the segment between `n1` and `n2`
    /// (inclusive), without applying it.
    pub fn two_opt_delta(&self, model: &DistanceModel, n1: usize, n2: usize) -> Cost {
        let n = self.len();
        if n1 == n2 || n1 >= n || n2 >= n {
            return 0;
        }
        let s = n1.min(n2);
        let e = n1.max(n2);
        if s == 0 && e == n - 1 {
            return 0;
        }

        let seq = &self.sequence;
        let s_prev = seq[(s + n - 1) % n];
        let e_next = seq[e + 1];
        model.distance(s_prev, seq[e]) + model.distance(seq[s], e_next)
            - model.distance(s_prev, seq[s])
            - model.distance(seq[e], e_next)
    }

    /// Reverses the segment between positions `n1` and `n2` (inclusive).
    ///
    /// Reversing the whole tour is a no-op. Applying the same move twice
    /// restores the previous tour.
    pub fn two_opt(&mut self, model: &DistanceModel, n1: usize, n2: usize) {
        let n = self.len();
        if n1 == n2 || n1 >= n || n2 >= n {
            return;
        }
        let s = n1.min(n2);
        let e = n1.max(n2);
        if s == 0 && e == n - 1 {
            return;
        }
        let delta = self.two_opt_delta(model, s, e);
        self.sequence[s..=e].reverse();
        self.sequence[n] = self.sequence[0];
        self.cost += delta;
    }

    // ---- 3-opt ---------------------------------------------------------

    /// Best-of-cases 3-opt on cut positions `i < j < k <= n`.
    ///
    /// The tour is split into `B = [i, j)`, `C = [j, k)` and the rest,
    /// which runs from position `k` around to `i - 1`. The seven
    /// non-identity reconnections of `B` and `C` are evaluated; the
    /// cheapest is applied only when it strictly improves the tour.
    ///
    /// Returns the realized cost change, `0` when nothing was applied or
    /// the triple is invalid.
    pub fn three_opt(&mut self, model: &DistanceModel, i: usize, j: usize, k: usize) -> Cost {
        let n = self.len();
        if !(i < j && j < k && k <= n) || (i == 0 && k == n) {
            return 0;
        }

        let seq = &self.sequence;
        let a = seq[(i + n - 1) % n];
        let b1 = seq[i];
        let b2 = seq[j - 1];
        let c1 = seq[j];
        let c2 = seq[k - 1];
        let d = seq[k];
        let dist = |x: usize, y: usize| model.distance(x, y);

        let old = dist(a, b1) + dist(b2, c1) + dist(c2, d);
        let candidates = [
            // A B C' D
            dist(a, b1) + dist(b2, c2) + dist(c1, d),
            // A B' C D
            dist(a, b2) + dist(b1, c1) + dist(c2, d),
            // A B' C' D
            dist(a, b2) + dist(b1, c2) + dist(c1, d),
            // A C B D
            dist(a, c1) + dist(c2, b1) + dist(b2, d),
            // A C B' D
            dist(a, c1) + dist(c2, b2) + dist(b1, d),
            // A C' B D
            dist(a, c2) + dist(c1, b1) + dist(b2, d),
            // A C' B' D
            dist(a, c2) + dist(c1, b2) + dist(b1, d),
        ];

        let mut best_delta = 0;
        let mut best_case = None;
        for (case, &cost) in candidates.iter().enumerate() {
            let delta = cost - old;
            if delta < best_delta {
                best_delta = delta;
                best_case = Some(case);
            }
        }
        let Some(case) = best_case else {
            return 0;
        };

        let seg_b = &seq[i..j];
        let seg_c = &seq[j..k];
        let mut merged = Vec::with_capacity(k - i);
        match case {
            0 => {
                merged.extend_from_slice(seg_b);
                merged.extend(seg_c.iter().rev());
            }
            1 => {
                merged.extend(seg_b.iter().rev());
                merged.extend_from_slice(seg_c);
            }
            2 => {
                merged.extend(seg_b.iter().rev());
                merged.extend(seg_c.iter().rev());
            }
            3 => {
                merged.extend_from_slice(seg_c);
                merged.extend_from_slice(seg_b);
            }
            4 => {
                merged.extend_from_slice(seg_c);
                merged.extend(seg_b.iter().rev());
            }
            5 => {
                merged.extend(seg_c.iter().rev());
                merged.extend_from_slice(seg_b);
            }
            _ => {
                merged.extend(seg_c.iter().rev());
                merged.extend(seg_b.iter().rev());
            }
        }

        self.sequence[i..k].copy_from_slice(&merged);
        self.sequence[n] = self.sequence[0];
        self.cost += best_delta;
        best_delta
    }

    // ---- random moves --------------------------------------------------

    /// Applies one random move of the given kind.
    ///
    /// Swap and 2-opt use two distinct random positions. 3-opt draws a
    /// triple with [`Tour::random_three_opt_triple`]; tours with fewer
    /// than 5 nodes have no such triple and get a 2-opt move instead.
    pub fn random_move<R: Rng>(&mut self, model: &DistanceModel, kind: MoveKind, rng: &mut R) {
        let n = self.len();
        if n < 2 {
            return;
        }
        match kind {
            MoveKind::Swap => {
                let (a, b) = distinct_pair(n, rng);
                self.swap(model, a, b);
            }
            MoveKind::TwoOpt => {
                let (a, b) = distinct_pair(n, rng);
                self.two_opt(model, a, b);
            }
            MoveKind::ThreeOpt => {
                if n < 5 {
                    let (a, b) = distinct_pair(n, rng);
                    self.two_opt(model, a, b);
                } else {
                    let (i, j, k) = self.random_three_opt_triple(rng);
                    self.three_opt(model, i, j, k);
                }
            }
        }
    }

    /// Randomized early-exit scan over 3-opt triples.
    ///
    /// Walks `i`, `j >= i + 2`, `k >= j + 2` (with `k` reaching `n` when
    /// `i > 0`) and stops at each candidate with probability 2/101.
    /// Falls back to `(0, 2, 4)` when the scan completes.
    pub fn random_three_opt_triple<R: Rng>(&self, rng: &mut R) -> (usize, usize, usize) {
        let n = self.len();
        for i in 0..n {
            for j in (i + 2)..n {
                let k_end = n + usize::from(i > 0);
                for k in (j + 2)..k_end {
                    if rng.random_range(0..=100u32) <= THREE_OPT_STOP_THRESHOLD {
                        return (i, j, k);
                    }
                }
            }
        }
        (0, 2, 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::tests::line_model;
    use crate::random::create_rng;

    fn random_model(n: usize, seed: u64) -> DistanceModel {
        let mut rng = create_rng(seed);
        let points: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();
        DistanceModel::from_coordinates(&points).unwrap()
    }

    #[test]
    fn test_swap_scenario() {
        let model = line_model(5);
        let mut tour = Tour::deterministic(&model);
        assert_eq!(tour.swap_delta(&model, 1, 3), 4);
        tour.swap(&model, 1, 3);
        assert_eq!(tour.sequence(), &[0, 3, 2, 1, 4, 0]);
        assert_eq!(tour.cost(), 12);
        assert!(tour.check(&model).is_ok());
    }

    #[test]
    fn test_swap_adjacent_and_wraparound() {
        let model = random_model(8, 5);
        let mut rng = create_rng(9);
        let base = Tour::random(&model, &mut rng);
        for (a, b) in [(0, 1), (3, 4), (0, 7), (7, 6), (6, 0)] {
            let mut tour = base.clone();
            let delta = tour.swap_delta(&model, a, b);
            tour.swap(&model, a, b);
            assert!(tour.check(&model).is_ok(), "swap({a}, {b}) broke the tour");
            assert_eq!(tour.cost() - base.cost(), delta);
        }
    }

    #[test]
    fn test_swap_out_of_range_is_noop() {
        let model = line_model(5);
        let mut tour = Tour::deterministic(&model);
        tour.swap(&model, 2, 2);
        tour.swap(&model, 1, 9);
        assert_eq!(tour.sequence(), &[0, 1, 2, 3, 4, 0]);
        assert_eq!(tour.swap_delta(&model, 5, 0), 0);
    }

    #[test]
    fn test_two_opt_reverses_segment() {
        let model = line_model(6);
        let mut tour = Tour::deterministic(&model);
        tour.two_opt(&model, 4, 1);
        assert_eq!(tour.sequence(), &[0, 4, 3, 2, 1, 5, 0]);
        assert!(tour.check(&model).is_ok());
    }

    #[test]
    fn test_two_opt_from_position_zero() {
        let model = random_model(7, 2);
        let mut rng = create_rng(4);
        let mut tour = Tour::random(&model, &mut rng);
        tour.two_opt(&model, 0, 3);
        assert!(tour.check(&model).is_ok());
    }

    #[test]
    fn test_two_opt_full_reversal_is_noop() {
        let model = line_model(5);
        let mut tour = Tour::deterministic(&model);
        assert_eq!(tour.two_opt_delta(&model, 0, 4), 0);
        tour.two_opt(&model, 0, 4);
        assert_eq!(tour.sequence(), &[0, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn test_two_opt_is_self_inverse() {
        let model = random_model(12, 8);
        let mut rng = create_rng(11);
        let original = Tour::random(&model, &mut rng);
        let mut tour = original.clone();
        tour.two_opt(&model, 2, 9);
        tour.two_opt(&model, 2, 9);
        assert_eq!(tour, original);
    }

    #[test]
    fn test_three_opt_never_worsens() {
        let model = random_model(10, 21);
        let mut rng = create_rng(5);
        for _ in 0..200 {
            let mut tour = Tour::random(&model, &mut rng);
            let before = tour.cost();
            let (i, j, k) = tour.random_three_opt_triple(&mut rng);
            let delta = tour.three_opt(&model, i, j, k);
            assert!(delta <= 0);
            assert_eq!(tour.cost(), before + delta);
            assert!(tour.check(&model).is_ok());
        }
    }

    #[test]
    fn test_three_opt_fixes_crossing() {
        // 0..6 on a line visited as 0 1 4 3 2 5: reversing [2, 5) is optimal
        let model = line_model(6);
        let mut tour = Tour::from_sequence(&model, vec![0, 1, 4, 3, 2, 5]).unwrap();
        let delta = tour.three_opt(&model, 2, 5, 6);
        assert!(delta < 0);
        assert_eq!(tour.cost(), 10);
        assert!(tour.check(&model).is_ok());
    }

    #[test]
    fn test_three_opt_invalid_triples() {
        let model = line_model(6);
        let mut tour = Tour::from_sequence(&model, vec![0, 3, 1, 4, 2, 5]).unwrap();
        let before = tour.clone();
        assert_eq!(tour.three_opt(&model, 3, 2, 5), 0);
        assert_eq!(tour.three_opt(&model, 0, 2, 6), 0);
        assert_eq!(tour.three_opt(&model, 1, 2, 9), 0);
        assert_eq!(tour, before);
    }

    #[test]
    fn test_random_move_keeps_tour_valid() {
        let model = random_model(9, 13);
        let mut rng = create_rng(17);
        let mut tour = Tour::random(&model, &mut rng);
        for step in 0..300 {
            let kind = MoveKind::ALL[step % 3];
            tour.random_move(&model, kind, &mut rng);
            assert!(tour.check(&model).is_ok(), "{kind:?} broke the tour");
        }
    }

    #[test]
    fn test_random_move_small_tours() {
        for n in 1..5 {
            let model = line_model(n);
            let mut rng = create_rng(n as u64);
            let mut tour = Tour::random(&model, &mut rng);
            for kind in MoveKind::ALL {
                tour.random_move(&model, kind, &mut rng);
                assert!(tour.check(&model).is_ok());
            }
        }
    }

    #[test]
    fn test_random_triple_is_valid() {
        let model = line_model(8);
        let tour = Tour::deterministic(&model);
        let mut rng = create_rng(23);
        for _ in 0..500 {
            let (i, j, k) = tour.random_three_opt_triple(&mut rng);
            assert!(j >= i + 2 && k >= j + 2 && k <= 8);
            assert!(!(i == 0 && k == 8));
        }
    }
}
