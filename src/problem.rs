//! Distance model of a symmetric TSP instance.
//!
//! [`DistanceModel`] is the only thing the search engine needs from an
//! instance reader: the node count, a full integer distance matrix and,
//! for every node, the other nodes ordered by increasing distance.
//! It is immutable once built and shared by reference across tours,
//! populations and runs.

use crate::error::{Result, TspError};

/// Integer tour cost / edge weight.
pub type Cost = i64;

/// Precomputed distances and nearest-neighbour ordering.
///
/// # Examples
///
/// ```
/// use tspf::problem::DistanceModel;
///
/// let model = DistanceModel::new(vec![
///     vec![0, 2, 9],
///     vec![2, 0, 6],
///     vec![9, 6, 0],
/// ]).unwrap();
/// assert_eq!(model.node_count(), 3);
/// assert_eq!(model.neighbours(0), &[1, 2]);
/// assert_eq!(model.tour_cost(&[0, 1, 2, 0]), 17);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceModel {
    n: usize,
    /// Row-major `n * n` matrix.
    distances: Vec<Cost>,
    neighbours: Vec<Vec<usize>>,
}

impl DistanceModel {
    /// Builds a model from a square matrix, computing the neighbour order.
    ///
    /// Ties in the neighbour order are broken by node index.
    ///
    /// # Errors
    /// [`TspError::Configuration`] when the matrix is empty, not square,
    /// asymmetric, has a non-zero diagonal or a negative entry.
    pub fn new(matrix: Vec<Vec<Cost>>) -> Result<Self> {
        let (n, distances) = flatten(matrix)?;
        let neighbours = (0..n)
            .map(|i| {
                let mut order: Vec<usize> = (0..n).filter(|&j| j != i).collect();
                order.sort_by_key(|&j| (distances[i * n + j], j));
                order
            })
            .collect();
        Ok(Self {
            n,
            distances,
            neighbours,
        })
    }

    /// Builds a model from a matrix and a neighbour order supplied by the
    /// instance reader.
    ///
    /// # Errors
    /// [`TspError::Configuration`] when the matrix is invalid (see
    /// [`DistanceModel::new`]) or a neighbour row is not a permutation of
    /// the other nodes.
    pub fn with_neighbours(matrix: Vec<Vec<Cost>>, neighbours: Vec<Vec<usize>>) -> Result<Self> {
        let (n, distances) = flatten(matrix)?;
        if neighbours.len() != n {
            return Err(TspError::config(format!(
                "neighbour order has {} rows, expected {n}",
                neighbours.len()
            )));
        }
        for (i, row) in neighbours.iter().enumerate() {
            if row.len() != n - 1 {
                return Err(TspError::config(format!(
                    "neighbour row {i} has {} entries, expected {}",
                    row.len(),
                    n - 1
                )));
            }
            let mut seen = vec![false; n];
            seen[i] = true;
            for &j in row {
                if j >= n || seen[j] {
                    return Err(TspError::config(format!(
                        "neighbour row {i} is not a permutation of the other nodes"
                    )));
                }
                seen[j] = true;
            }
        }
        Ok(Self {
            n,
            distances,
            neighbours,
        })
    }

    /// Builds a model from planar coordinates with TSPLIB `EUC_2D`
    /// rounding (`nint` of the Euclidean distance).
    ///
    /// # Errors
    /// [`TspError::Configuration`] when `points` is empty.
    pub fn from_coordinates(points: &[(f64, f64)]) -> Result<Self> {
        let matrix = points
            .iter()
            .map(|&(xi, yi)| {
                points
                    .iter()
                    .map(|&(xj, yj)| {
                        let dx = xi - xj;
                        let dy = yi - yj;
                        ((dx * dx + dy * dy).sqrt() + 0.5) as Cost
                    })
                    .collect()
            })
            .collect();
        Self::new(matrix)
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.n
    }

    /// Distance between nodes `i` and `j`.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> Cost {
        self.distances[i * self.n + j]
    }

    /// Other nodes ordered by increasing distance from `node`.
    #[inline]
    pub fn neighbours(&self, node: usize) -> &[usize] {
        &self.neighbours[node]
    }

    /// Full cost of a closed sequence (`sequence[0] == sequence[n]`).
    ///
    /// Sums the `n` consecutive edges; shorter sequences sum what they have.
    pub fn tour_cost(&self, sequence: &[usize]) -> Cost {
        sequence
            .windows(2)
            .take(self.n)
            .map(|w| self.distance(w[0], w[1]))
            .sum()
    }
}

fn flatten(matrix: Vec<Vec<Cost>>) -> Result<(usize, Vec<Cost>)> {
    let n = matrix.len();
    if n == 0 {
        return Err(TspError::config("distance matrix must not be empty"));
    }
    let mut distances = Vec::with_capacity(n * n);
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != n {
            return Err(TspError::config(format!(
                "distance matrix row {i} has {} entries, expected {n}",
                row.len()
            )));
        }
        distances.extend_from_slice(row);
    }
    for i in 0..n {
        if distances[i * n + i] != 0 {
            return Err(TspError::config(format!(
                "distance from node {i} to itself must be 0"
            )));
        }
        for j in (i + 1)..n {
            let d = distances[i * n + j];
            if d < 0 {
                return Err(TspError::config(format!(
                    "negative distance between {i} and {j}"
                )));
            }
            if d != distances[j * n + i] {
                return Err(TspError::config(format!(
                    "distance matrix is not symmetric at ({i}, {j})"
                )));
            }
        }
    }
    Ok((n, distances))
}
