//! Property tests for tours, move operators and GA operators.

use proptest::prelude::*;
use tspf::ga::{roulette_wheel, Crossover, Selection};
use tspf::random::create_rng;
use tspf::{DistanceModel, MoveKind, Tour};

fn model_from(points: &[(f64, f64)]) -> DistanceModel {
    DistanceModel::from_coordinates(points).unwrap()
}

fn points(sizes: std::ops::Range<usize>) -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0..1000.0f64, 0.0..1000.0f64), sizes)
}

fn assert_distinct(indices: &[usize], n: usize) -> Result<(), TestCaseError> {
    let mut seen = vec![false; n];
    for &i in indices {
        prop_assert!(i < n);
        prop_assert!(!seen[i]);
        seen[i] = true;
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Swap delta equals the difference of full recomputations.
    #[test]
    fn prop_swap_delta_matches_recompute(
        points in points(4..50),
        seed in any::<u64>(),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let model = model_from(&points);
        let mut rng = create_rng(seed);
        let tour = Tour::random(&model, &mut rng);
        let n = tour.len();
        let (i, j) = (a.index(n), b.index(n));

        let mut swapped = tour.open_sequence().to_vec();
        swapped.swap(i, j);
        let expected = Tour::from_sequence(&model, swapped).unwrap().cost() - tour.cost();
        prop_assert_eq!(tour.swap_delta(&model, i, j), expected);

        let mut moved = tour.clone();
        moved.swap(&model, i, j);
        prop_assert!(moved.check(&model).is_ok());
        prop_assert_eq!(moved.cost(), tour.cost() + expected);
    }

    /// 2-opt delta equals the difference of full recomputations.
    #[test]
    fn prop_two_opt_delta_matches_recompute(
        points in points(4..50),
        seed in any::<u64>(),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let model = model_from(&points);
        let mut rng = create_rng(seed);
        let tour = Tour::random(&model, &mut rng);
        let n = tour.len();
        let (s, e) = {
            let (i, j) = (a.index(n), b.index(n));
            (i.min(j), i.max(j))
        };

        let mut reversed = tour.open_sequence().to_vec();
        reversed[s..=e].reverse();
        let expected = Tour::from_sequence(&model, reversed).unwrap().cost() - tour.cost();
        prop_assert_eq!(tour.two_opt_delta(&model, s, e), expected);

        let mut moved = tour.clone();
        moved.two_opt(&model, s, e);
        prop_assert!(moved.check(&model).is_ok());
        moved.two_opt(&model, s, e);
        prop_assert_eq!(moved.sequence(), tour.sequence());
    }

    /// 3-opt never worsens the tour and keeps the cached cost exact.
    #[test]
    fn prop_three_opt_improves_or_keeps(
        points in points(6..40),
        seed in any::<u64>(),
    ) {
        let model = model_from(&points);
        let mut rng = create_rng(seed);
        let mut tour = Tour::random(&model, &mut rng);
        for _ in 0..20 {
            let before = tour.cost();
            let (i, j, k) = tour.random_three_opt_triple(&mut rng);
            let delta = tour.three_opt(&model, i, j, k);
            prop_assert!(delta <= 0);
            prop_assert_eq!(tour.cost(), before + delta);
            prop_assert!(tour.check(&model).is_ok());
        }
    }

    /// Random moves of every kind keep the tour a valid closed permutation.
    #[test]
    fn prop_random_moves_keep_tour_valid(
        points in points(1..30),
        seed in any::<u64>(),
    ) {
        let model = model_from(&points);
        let mut rng = create_rng(seed);
        let mut tour = Tour::random(&model, &mut rng);
        for step in 0..30 {
            let kind = MoveKind::ALL[step % MoveKind::ALL.len()];
            tour.random_move(&model, kind, &mut rng);
            prop_assert!(tour.check(&model).is_ok());
        }
    }

    /// Every crossover produces two valid children.
    #[test]
    fn prop_crossover_children_valid(
        points in points(2..40),
        seed in any::<u64>(),
    ) {
        let model = model_from(&points);
        let mut rng = create_rng(seed);
        let p1 = Tour::random(&model, &mut rng);
        let p2 = Tour::random(&model, &mut rng);
        for crossover in [Crossover::Ox, Crossover::Pmx, Crossover::Opx] {
            let (c1, c2) = crossover.apply(&model, &p1, &p2, &mut rng).unwrap();
            prop_assert!(c1.check(&model).is_ok());
            prop_assert!(c2.check(&model).is_ok());
        }
    }

    /// Selection returns `size` distinct in-range indices.
    #[test]
    fn prop_selection_postconditions(
        costs in prop::collection::vec(0i64..10_000, 1..40),
        size_frac in 0.0..=1.0f64,
        k in 1usize..8,
        seed in any::<u64>(),
    ) {
        let n = costs.len();
        let size = ((n as f64) * size_frac) as usize;
        let mut rng = create_rng(seed);
        for selection in [
            Selection::Best,
            Selection::Random,
            Selection::Roulette,
            Selection::Tournament(k),
        ] {
            let chosen = selection.select(&costs, size, &mut rng).unwrap();
            prop_assert_eq!(chosen.len(), size);
            assert_distinct(&chosen, n)?;

            let survivors = selection.select_survivors(&costs, size, &mut rng).unwrap();
            prop_assert_eq!(survivors.len(), size);
            assert_distinct(&survivors, n)?;
        }
        prop_assert!(Selection::Random.select(&costs, n + 1, &mut rng).is_err());
    }

    /// The roulette wheel is non-decreasing, ends at 1 and gives every
    /// positive-cost candidate a positive slice.
    #[test]
    fn prop_roulette_wheel_shape(costs in prop::collection::vec(1i64..10_000, 1..60)) {
        let wheel = roulette_wheel(&costs);
        prop_assert_eq!(wheel.len(), costs.len());
        prop_assert_eq!(wheel[wheel.len() - 1], 1.0);
        let mut previous = 0.0;
        for &p in &wheel {
            prop_assert!(p > previous);
            previous = p;
        }
    }

    /// Equal costs give a uniform wheel.
    #[test]
    fn prop_roulette_wheel_uniform(cost in 0i64..10_000, n in 1usize..50) {
        let wheel = roulette_wheel(&vec![cost; n]);
        for (i, &p) in wheel.iter().enumerate() {
            prop_assert!((p - (i + 1) as f64 / n as f64).abs() < 1e-9);
        }
    }
}
