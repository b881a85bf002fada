//! Live scoring of an observation that grows stroke by stroke
//!
//! The reference field is built once. Observation points arrive in batches;
//! each batch lowers the observation field in place instead of rebuilding it,
//! and scores are recomputed from the current sets.

use crate::algorithm::aggregation::{AggregationConfig, aggregate};
use crate::algorithm::distance::DistanceField;
use crate::analysis::summary::ErrorScore;
use crate::io::error::{Result, ScoreError, invalid_parameter};
use crate::spatial::mask::{BackgroundMode, Mask, PointSet, Region};
use bitvec::vec::BitVec;
use serde::{Deserialize, Serialize};

/// Serializable snapshot of the expensive reference-side state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingState {
    /// Distance field of the reference points
    pub reference_field: DistanceField,
    /// Reference foreground points
    pub reference_points: PointSet,
    /// Background convention the reference was extracted with
    pub mode: BackgroundMode,
    /// Grid and normalization parameters
    pub aggregation: AggregationConfig,
}

/// Incremental scorer for a drawing in progress
#[derive(Debug, Clone)]
pub struct StreamingScorer {
    reference_field: DistanceField,
    reference_points: PointSet,
    observation_field: DistanceField,
    observed: BitVec,
    observation_count: usize,
    mode: BackgroundMode,
    aggregation: AggregationConfig,
}

impl StreamingScorer {
    /// Build the reference field from a reference mask
    ///
    /// # Errors
    ///
    /// Returns `EmptyPointSet` if the reference has no foreground pixels and
    /// `InvalidParameter` if `aggregation` does not fit the mask size
    pub fn from_reference_mask(
        reference: &Mask,
        mode: BackgroundMode,
        aggregation: AggregationConfig,
    ) -> Result<Self> {
        let points = reference.point_set(Region::Reference, mode.background_value())?;
        Self::from_reference_points(points, mode, aggregation)
    }

    /// Build the reference field from reference points
    ///
    /// # Errors
    ///
    /// Returns `EmptyPointSet` if `points` is empty and `InvalidParameter` if
    /// `aggregation` does not fit the grid
    pub fn from_reference_points(
        points: PointSet,
        mode: BackgroundMode,
        aggregation: AggregationConfig,
    ) -> Result<Self> {
        aggregation.validate(points.dims())?;
        let reference_field = DistanceField::build(&points)?;
        Ok(Self::with_reference(reference_field, points, mode, aggregation))
    }

    /// Restore a scorer from an exported state, skipping the reference build
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the state is inconsistent and
    /// `EmptyPointSet` if it holds no reference points
    pub fn from_state(state: StreamingState) -> Result<Self> {
        let StreamingState {
            reference_field,
            reference_points,
            mode,
            aggregation,
        } = state;

        if reference_points.is_empty() {
            return Err(ScoreError::EmptyPointSet {
                region: Region::Reference,
            });
        }
        if reference_field.dims() != reference_points.dims() {
            return Err(invalid_parameter(
                "reference_field",
                &format!(
                    "{}x{}",
                    reference_field.dims().0,
                    reference_field.dims().1
                ),
                &"dimensions differ from the reference points",
            ));
        }
        if !reference_field.is_complete() {
            return Err(invalid_parameter(
                "reference_field",
                &"incomplete",
                &"every cell must hold a distance",
            ));
        }
        aggregation.validate(reference_points.dims())?;

        // Re-validate points that arrived through deserialization
        let reference_points = PointSet::from_coordinates(
            Region::Reference,
            reference_points.dims(),
            reference_points.points().iter().copied(),
        )?;

        Ok(Self::with_reference(
            reference_field,
            reference_points,
            mode,
            aggregation,
        ))
    }

    fn with_reference(
        reference_field: DistanceField,
        reference_points: PointSet,
        mode: BackgroundMode,
        aggregation: AggregationConfig,
    ) -> Self {
        let dims = reference_points.dims();
        Self {
            reference_field,
            reference_points,
            observation_field: DistanceField::unreached(dims),
            observed: BitVec::repeat(false, dims.0 * dims.1),
            observation_count: 0,
            mode,
            aggregation,
        }
    }

    /// Export the reference-side state for caching
    pub fn export_state(&self) -> StreamingState {
        StreamingState {
            reference_field: self.reference_field.clone(),
            reference_points: self.reference_points.clone(),
            mode: self.mode,
            aggregation: self.aggregation,
        }
    }

    /// Background convention of the reference
    pub const fn mode(&self) -> BackgroundMode {
        self.mode
    }

    /// Number of distinct observation points added so far
    pub const fn observation_count(&self) -> usize {
        self.observation_count
    }

    /// Add a batch of observation points and return the current top cell error
    ///
    /// Points already present are skipped. Returns 0 while the observation is
    /// still empty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a point lies outside the grid; no point
    /// of the batch is added in that case
    pub fn add_observation_points(&mut self, points: &[[usize; 2]]) -> Result<f64> {
        let dims = self.reference_points.dims();
        if let Some(point) = points.iter().find(|p| p[0] >= dims.0 || p[1] >= dims.1) {
            return Err(invalid_parameter(
                "point",
                &format!("({}, {})", point[0], point[1]),
                &format!("outside the {}x{} observation grid", dims.0, dims.1),
            ));
        }

        let mut fresh = Vec::with_capacity(points.len());
        for &point in points {
            let index = point[0] * dims.1 + point[1];
            if self.observed.get(index).is_some_and(|bit| !*bit) {
                self.observed.set(index, true);
                fresh.push(point);
            }
        }

        if !fresh.is_empty() {
            self.observation_count += fresh.len();
            self.observation_field.lower_with(&fresh);
            log::debug!(
                "added {} observation points ({} total)",
                fresh.len(),
                self.observation_count
            );
        }

        if self.observation_count == 0 {
            return Ok(0.0);
        }
        Ok(self.score()?.top5_cell_error())
    }

    /// Forget every observation point, keeping the reference field
    pub fn reset_observation(&mut self) {
        let dims = self.reference_points.dims();
        self.observation_field = DistanceField::unreached(dims);
        self.observed.fill(false);
        self.observation_count = 0;
    }

    /// Current observation points in row-major order
    pub fn observation_points(&self) -> PointSet {
        let dims = self.reference_points.dims();
        let coordinates = self
            .observed
            .iter_ones()
            .map(|index| [index / dims.1, index % dims.1]);
        PointSet::from_coordinates(Region::Observation, dims, coordinates)
            .unwrap_or_else(|_| PointSet::empty(Region::Observation, dims))
    }

    /// Full score of the current observation
    ///
    /// # Errors
    ///
    /// Returns `EmptyPointSet` if no observation point has been added
    pub fn score(&self) -> Result<ErrorScore> {
        let observation = self.observation_points();
        aggregate(
            &self.reference_points,
            &observation,
            &self.reference_field,
            &self.observation_field,
            &self.aggregation,
        )
    }
}
