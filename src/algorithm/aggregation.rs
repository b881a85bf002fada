//! Cross-distance aggregation into normalized error scores

use crate::algorithm::distance::DistanceField;
use crate::analysis::summary::ErrorScore;
use crate::io::configuration::{CELL_SCALE_DIVISOR, GRID_CELLS, NORMALIZATION_BASE, TOP_K};
use crate::io::error::{Result, ScoreError, invalid_parameter};
use crate::math::stats::{mean, percent_of, round_to_tenth, top_k_mean};
use crate::spatial::grid::{CellGrid, cell_size};
use crate::spatial::mask::PointSet;
use serde::{Deserialize, Serialize};

/// Parameters of the coarse grid and score normalization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Cells along each axis of a region
    pub grid_cells: usize,
    /// Number of largest values averaged for the top errors
    pub top_k: usize,
    /// Divisor applied to the averaged top cell maxima
    pub cell_scale_divisor: f64,
    /// Linear dimension percentages are normalized against
    pub normalization_base: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            grid_cells: GRID_CELLS,
            top_k: TOP_K,
            cell_scale_divisor: CELL_SCALE_DIVISOR,
            normalization_base: NORMALIZATION_BASE,
        }
    }
}

impl AggregationConfig {
    /// Check the parameters against a region size
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the grid does not divide the region, `top_k`
    /// is zero, or a divisor is not a positive finite number
    pub fn validate(&self, region_dims: (usize, usize)) -> Result<()> {
        cell_size(region_dims, self.grid_cells)?;
        if self.top_k == 0 {
            return Err(invalid_parameter("top_k", &self.top_k, &"must be positive"));
        }
        if !(self.cell_scale_divisor.is_finite() && self.cell_scale_divisor > 0.0) {
            return Err(invalid_parameter(
                "cell_scale_divisor",
                &self.cell_scale_divisor,
                &"must be a positive finite number",
            ));
        }
        if !(self.normalization_base.is_finite() && self.normalization_base > 0.0) {
            return Err(invalid_parameter(
                "normalization_base",
                &self.normalization_base,
                &"must be a positive finite number",
            ));
        }
        Ok(())
    }
}

/// Distance of one point looked up in the opposite set's field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossSample {
    /// Source pixel in region coordinates
    pub position: [usize; 2],
    /// Distance to the nearest point of the other set
    pub distance: u32,
}

/// Look up every observation point in the reference field, then every
/// reference point in the observation field
///
/// # Errors
///
/// Returns `EmptyPointSet` if either set is empty and `InvalidParameter` if
/// the sets and fields disagree on grid dimensions
pub fn cross_distances(
    reference: &PointSet,
    observation: &PointSet,
    reference_field: &DistanceField,
    observation_field: &DistanceField,
) -> Result<Vec<CrossSample>> {
    for points in [reference, observation] {
        if points.is_empty() {
            return Err(ScoreError::EmptyPointSet {
                region: points.region(),
            });
        }
    }

    let dims = reference.dims();
    for (name, other) in [
        ("observation", observation.dims()),
        ("reference_field", reference_field.dims()),
        ("observation_field", observation_field.dims()),
    ] {
        if other != dims {
            return Err(invalid_parameter(
                name,
                &format!("{}x{}", other.0, other.1),
                &format!("dimensions differ from the {}x{} reference", dims.0, dims.1),
            ));
        }
    }

    let mut samples = Vec::with_capacity(observation.len() + reference.len());
    for (points, field) in [(observation, reference_field), (reference, observation_field)] {
        for &position in points {
            samples.push(CrossSample {
                position,
                distance: field.lookup(position)?,
            });
        }
    }
    Ok(samples)
}

/// Combine both point sets and their distance fields into an [`ErrorScore`]
///
/// The combined cross-distance list drives the mean and top point errors.
/// Each sample also raises the maximum of the grid cell owning its source
/// pixel; the largest cell maxima give the top cell error.
///
/// # Errors
///
/// Returns `EmptyPointSet` if either set is empty and `InvalidParameter` if
/// dimensions disagree or the configuration does not fit the region
pub fn aggregate(
    reference: &PointSet,
    observation: &PointSet,
    reference_field: &DistanceField,
    observation_field: &DistanceField,
    config: &AggregationConfig,
) -> Result<ErrorScore> {
    config.validate(reference.dims())?;
    let samples = cross_distances(reference, observation, reference_field, observation_field)?;

    let mut grid = CellGrid::new(reference.dims(), config.grid_cells)?;
    let mut distances = Vec::with_capacity(samples.len());
    for sample in &samples {
        grid.record(sample.position, sample.distance);
        distances.push(sample.distance);
    }

    // Both sets are non-empty here, so the averages exist
    let mean_distance = mean(&distances).unwrap_or_default();
    let top_points = top_k_mean(&distances, config.top_k).unwrap_or_default();
    let top_cells = top_k_mean(&grid.values(), config.top_k).unwrap_or_default();

    Ok(ErrorScore::new(
        round_to_tenth(top_cells / config.cell_scale_divisor),
        percent_of(top_points, config.normalization_base),
        mean_distance,
        percent_of(mean_distance, config.normalization_base),
        reference.len(),
        observation.len(),
        grid.into_array(),
    ))
}
