//! Permutation crossover operators.
//!
//! Each operator takes two parent tours and produces two children. The
//! operators work on the open sequences; children are closed and their
//! cost computed through [`Tour::from_sequence`], which also validates
//! the permutation.
//!
//! # Operators
//!
//! | Operator | Cut points | Preserves |
//! |---|---|---|
//! | [`Crossover::Ox`] | 2 | relative order |
//! | [`Crossover::Pmx`] | 1 | absolute position |
//! | [`Crossover::Opx`] | 1 | tail of the other parent |
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"

use crate::error::Result;
use crate::problem::DistanceModel;
use crate::tour::Tour;
use rand::Rng;

/// Crossover operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    /// Partially mapped crossover with a single cut point.
    Pmx,
    /// Order crossover.
    #[default]
    Ox,
    /// One-point order-preserving crossover.
    Opx,
}

impl Crossover {
    /// Recombines two parents into two children.
    ///
    /// Tours with fewer than 2 nodes are copied through.
    ///
    /// # Errors
    /// [`TspError::MalformedTour`](crate::error::TspError::MalformedTour)
    /// when the parents are not permutations of the same node set.
    pub fn apply<R: Rng>(
        &self,
        model: &DistanceModel,
        parent1: &Tour,
        parent2: &Tour,
        rng: &mut R,
    ) -> Result<(Tour, Tour)> {
        let n = parent1.len();
        if n < 2 {
            return Ok((parent1.clone(), parent2.clone()));
        }
        let p1 = parent1.open_sequence();
        let p2 = parent2.open_sequence();

        let (c1, c2) = match self {
            Crossover::Ox => {
                let (r1, r2) = ordered_cut_points(n, rng);
                (ox_child(p1, p2, r1, r2), ox_child(p2, p1, r1, r2))
            }
            Crossover::Pmx => {
                let cut = rng.random_range(0..n);
                pmx_children(p1, p2, cut)
            }
            Crossover::Opx => {
                let cut = rng.random_range(0..n);
                (opx_child(p1, p2, cut), opx_child(p2, p1, cut))
            }
        };

        Ok((Tour::from_sequence(model, c1)?, Tour::from_sequence(model, c2)?))
    }
}

/// Two cut points `r1 < r2` in `[0, n)`.
fn ordered_cut_points<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    loop {
        let r1 = rng.random_range(0..n);
        let r2 = rng.random_range(0..n);
        if r1 < r2 {
            return (r1, r2);
        }
    }
}

/// Keeps `keeper[r1..r2]` in place; `donor`'s remaining nodes, in order,
/// fill `[0, r1)` and then `[r2, n)`.
fn ox_child(keeper: &[usize], donor: &[usize], r1: usize, r2: usize) -> Vec<usize> {
    let segment = &keeper[r1..r2];
    let mut in_segment = vec![false; keeper.len()];
    for &node in segment {
        in_segment[node] = true;
    }
    let mut outside = donor.iter().copied().filter(|&node| !in_segment[node]);

    let mut child = Vec::with_capacity(keeper.len());
    child.extend(outside.by_ref().take(r1));
    child.extend_from_slice(segment);
    child.extend(outside);
    child
}

/// Single-point PMX by successive swaps.
///
/// Child 1 starts as `p1` and, for every position before `cut`, swaps in
/// `p2`'s node; child 2 starts as `p2` and does the same with `p1` from
/// `cut` on.
fn pmx_children(p1: &[usize], p2: &[usize], cut: usize) -> (Vec<usize>, Vec<usize>) {
    let c1 = pmx_swap_in(p1, p2, 0..cut);
    let c2 = pmx_swap_in(p2, p1, cut..p1.len());
    (c1, c2)
}

fn pmx_swap_in(base: &[usize], donor: &[usize], range: std::ops::Range<usize>) -> Vec<usize> {
    let mut child = base.to_vec();
    let mut position = vec![0; base.len()];
    for (pos, &node) in child.iter().enumerate() {
        position[node] = pos;
    }
    for i in range {
        let j = position[donor[i]];
        if i != j {
            let (a, b) = (child[i], child[j]);
            child.swap(i, j);
            position[a] = j;
            position[b] = i;
        }
    }
    child
}

/// `head`'s nodes missing from `tail[cut..]`, in `head` order, followed
/// by `tail[cut..]`.
fn opx_child(head: &[usize], tail: &[usize], cut: usize) -> Vec<usize> {
    let suffix = &tail[cut..];
    let mut in_suffix = vec![false; head.len()];
    for &node in suffix {
        in_suffix[node] = true;
    }
    let mut child: Vec<usize> = head.iter().copied().filter(|&node| !in_suffix[node]).collect();
    child.extend_from_slice(suffix);
    child
}
