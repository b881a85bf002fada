//! Coarse cell partition of a region with running per-cell maxima
//!
//! A region is split into `cells x cells` equal partitions. Every distance
//! sample is routed to the cell owning its source pixel, and each cell keeps
//! the largest sample seen.

use crate::io::error::{Result, invalid_parameter};
use ndarray::Array2;

/// Grid of per-cell maximum distances over a region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    maxima: Array2<u32>,
    cell_rows: usize,
    cell_cols: usize,
}

impl CellGrid {
    /// Create an all-zero grid of `cells x cells` partitions over a `region_dims` region
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `cells` is zero or does not evenly divide
    /// both region dimensions
    pub fn new(region_dims: (usize, usize), cells: usize) -> Result<Self> {
        let (cell_rows, cell_cols) = cell_size(region_dims, cells)?;
        Ok(Self {
            maxima: Array2::zeros((cells, cells)),
            cell_rows,
            cell_cols,
        })
    }

    /// Size of one cell in pixels (rows, cols)
    pub const fn cell_size(&self) -> (usize, usize) {
        (self.cell_rows, self.cell_cols)
    }

    /// Cell index owning the pixel `[row, col]`
    pub const fn cell_of(&self, position: [usize; 2]) -> [usize; 2] {
        [position[0] / self.cell_rows, position[1] / self.cell_cols]
    }

    /// Raise the owning cell's maximum to `distance` if larger
    ///
    /// Positions outside the region are ignored.
    pub fn record(&mut self, position: [usize; 2], distance: u32) {
        let cell = self.cell_of(position);
        if let Some(maximum) = self.maxima.get_mut(cell) {
            *maximum = (*maximum).max(distance);
        }
    }

    /// Maximum recorded in `cell`, if in bounds
    pub fn get(&self, cell: [usize; 2]) -> Option<u32> {
        self.maxima.get(cell).copied()
    }

    /// Per-cell maxima in row-major order
    pub fn values(&self) -> Vec<u32> {
        self.maxima.iter().copied().collect()
    }

    /// Consume the grid, returning the maxima array
    pub fn into_array(self) -> Array2<u32> {
        self.maxima
    }
}

/// Size of one cell (rows, cols) for a `cells x cells` partition of `region_dims`
///
/// # Errors
///
/// Returns `InvalidParameter` if `cells` is zero or does not evenly divide
/// both region dimensions
pub fn cell_size(region_dims: (usize, usize), cells: usize) -> Result<(usize, usize)> {
    if cells == 0 {
        return Err(invalid_parameter("grid_cells", &cells, &"must be positive"));
    }
    let (rows, cols) = region_dims;
    if rows % cells != 0 || cols % cells != 0 || rows < cells || cols < cells {
        return Err(invalid_parameter(
            "grid_cells",
            &cells,
            &format!("must evenly divide the {rows}x{cols} region"),
        ));
    }
    Ok((rows / cells, cols / cells))
}
