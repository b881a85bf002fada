//! Multi-source breadth-first distance fields over a region grid
//!
//! Every source point is seeded at distance 0. Expansion proceeds in waves:
//! wave `k + 1` assigns distance `k + 1` to the unassigned 4-connected
//! neighbours of the cells assigned in wave `k`. The grid is connected and
//! obstacle free, so the result is the exact Manhattan distance to the
//! nearest source and every cell is reached.

use crate::io::configuration::UNREACHED;
use crate::io::error::{Result, ScoreError, invalid_parameter};
use crate::spatial::mask::PointSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Shortest 4-connected step count from every cell to the nearest source point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceField {
    distances: Array2<u32>,
}

impl DistanceField {
    /// Build the field for a non-empty point set over its grid
    ///
    /// # Errors
    ///
    /// Returns `EmptyPointSet` if `points` is empty
    pub fn build(points: &PointSet) -> Result<Self> {
        if points.is_empty() {
            return Err(ScoreError::EmptyPointSet {
                region: points.region(),
            });
        }

        let mut distances = Array2::from_elem(points.dims(), UNREACHED);
        let mut wave: Vec<[usize; 2]> = Vec::with_capacity(points.len());
        for &point in points {
            if let Some(cell) = distances.get_mut(point) {
                *cell = 0;
                wave.push(point);
            }
        }

        let mut distance: u32 = 0;
        while !wave.is_empty() {
            distance += 1;
            let mut next_wave = Vec::with_capacity(wave.len() * 2);
            for &position in &wave {
                for neighbour in neighbours(position, points.dims()) {
                    if let Some(cell) = distances.get_mut(neighbour) {
                        if *cell == UNREACHED {
                            *cell = distance;
                            next_wave.push(neighbour);
                        }
                    }
                }
            }
            wave = next_wave;
        }

        log::debug!(
            "{} distance field built from {} points, max distance {}",
            points.region(),
            points.len(),
            distance.saturating_sub(1)
        );

        Ok(Self { distances })
    }

    /// Field over `dims` in which every cell is unreached
    ///
    /// Only meaningful as the starting point for [`DistanceField::lower_with`].
    pub fn unreached(dims: (usize, usize)) -> Self {
        Self {
            distances: Array2::from_elem(dims, UNREACHED),
        }
    }

    /// Lower the field in place so that `sources` also count as seeds
    ///
    /// Seeds each new source at 0 and propagates only where the new path is
    /// strictly shorter than the stored distance. The result equals a full
    /// rebuild from the union of the old and new sources. Sources outside the
    /// grid are ignored.
    pub fn lower_with(&mut self, sources: &[[usize; 2]]) {
        let dims = self.dims();
        let mut queue = VecDeque::with_capacity(sources.len() * 4);

        for &source in sources {
            if let Some(cell) = self.distances.get_mut(source) {
                if *cell != 0 {
                    *cell = 0;
                    queue.push_back(source);
                }
            }
        }

        // FIFO order with unit steps pops cells in non-decreasing distance
        while let Some(position) = queue.pop_front() {
            let Some(current) = self.distances.get(position).copied() else {
                continue;
            };
            let candidate = current + 1;
            for neighbour in neighbours(position, dims) {
                if let Some(cell) = self.distances.get_mut(neighbour) {
                    if candidate < *cell {
                        *cell = candidate;
                        queue.push_back(neighbour);
                    }
                }
            }
        }
    }

    /// Grid dimensions (rows, cols)
    pub fn dims(&self) -> (usize, usize) {
        self.distances.dim()
    }

    /// Distance at `[row, col]`, `None` if out of bounds or unreached
    pub fn get(&self, position: [usize; 2]) -> Option<u32> {
        self.distances
            .get(position)
            .copied()
            .filter(|&d| d != UNREACHED)
    }

    /// Distance at `position` for a cross lookup
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the position is outside the grid or the
    /// cell was never reached
    pub fn lookup(&self, position: [usize; 2]) -> Result<u32> {
        self.get(position).ok_or_else(|| {
            invalid_parameter(
                "position",
                &format!("({}, {})", position[0], position[1]),
                &"not covered by the distance field",
            )
        })
    }

    /// Whether every cell holds a finite distance
    pub fn is_complete(&self) -> bool {
        self.distances.iter().all(|&d| d != UNREACHED)
    }

    /// Largest finite distance in the field
    pub fn max_distance(&self) -> Option<u32> {
        self.distances
            .iter()
            .copied()
            .filter(|&d| d != UNREACHED)
            .max()
    }

    /// Borrow the raw distances; unreached cells hold [`UNREACHED`]
    pub const fn as_array(&self) -> &Array2<u32> {
        &self.distances
    }
}

/// In-bounds 4-connected neighbours of `position`
fn neighbours(position: [usize; 2], dims: (usize, usize)) -> impl Iterator<Item = [usize; 2]> {
    let [row, col] = position;
    let up = row.checked_sub(1).map(|r| [r, col]);
    let down = (row + 1 < dims.0).then_some([row + 1, col]);
    let left = col.checked_sub(1).map(|c| [row, c]);
    let right = (col + 1 < dims.1).then_some([row, col + 1]);
    [right, left, down, up].into_iter().flatten()
}
