//! Score records and rendering-ready summaries

use crate::math::stats::round_to_tenth;
use crate::spatial::mask::PointSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized error scores of one observation against its reference
///
/// All percentages are relative to the region's linear dimension and rounded
/// to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorScore {
    top5_cell_error: f64,
    top_point_error: f64,
    mean_error: f64,
    mean_error_pct: f64,
    pixel_count: usize,
    observation_pixel_count: usize,
    grid: Array2<u32>,
}

impl ErrorScore {
    pub(crate) const fn new(
        top5_cell_error: f64,
        top_point_error: f64,
        mean_error: f64,
        mean_error_pct: f64,
        pixel_count: usize,
        observation_pixel_count: usize,
        grid: Array2<u32>,
    ) -> Self {
        Self {
            top5_cell_error,
            top_point_error,
            mean_error,
            mean_error_pct,
            pixel_count,
            observation_pixel_count,
            grid,
        }
    }

    /// Mean of the largest cell maxima, scaled by the cell calibration divisor
    pub const fn top5_cell_error(&self) -> f64 {
        self.top5_cell_error
    }

    /// Mean of the largest cross distances as a percentage
    pub const fn top_point_error(&self) -> f64 {
        self.top_point_error
    }

    /// Unrounded mean cross distance in pixels
    pub const fn mean_error(&self) -> f64 {
        self.mean_error
    }

    /// Mean cross distance as a percentage
    pub const fn mean_error_pct(&self) -> f64 {
        self.mean_error_pct
    }

    /// Number of foreground pixels in the reference region
    pub const fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// Number of foreground pixels in the observation region
    pub const fn observation_pixel_count(&self) -> usize {
        self.observation_pixel_count
    }

    /// Per-cell maximum cross distance
    pub const fn grid(&self) -> &Array2<u32> {
        &self.grid
    }

    /// Human-readable evaluation text
    pub fn evaluation_text(&self) -> String {
        format!(
            "Top 5 error: {:.1}%\nMean error: {:.1}%\nPixel count: {}",
            self.top5_cell_error, self.mean_error_pct, self.pixel_count
        )
    }
}

impl fmt::Display for ErrorScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "top 5: {:.1}% | top point: {:.1}% | mean: {:.1}% | pixels: {}",
            self.top5_cell_error, self.top_point_error, self.mean_error_pct, self.pixel_count
        )
    }
}

/// Data handed to an external renderer, in grid display units
///
/// One display unit is one grid cell, so points and cells share a coordinate
/// system. The engine never produces pixels itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayData {
    /// Cell maxima divided by the cell calibration divisor
    pub cells: Array2<f64>,
    /// Reference points as `[row, col]` in cell units
    pub reference_points: Vec<[f64; 2]>,
    /// Observation points as `[row, col]` in cell units
    pub observation_points: Vec<[f64; 2]>,
}

impl OverlayData {
    /// Scale the score grid and both point sets into cell units
    pub fn new(
        score: &ErrorScore,
        reference: &PointSet,
        observation: &PointSet,
        cell_size: (usize, usize),
        cell_scale_divisor: f64,
    ) -> Self {
        let scale = |points: &PointSet| -> Vec<[f64; 2]> {
            points
                .iter()
                .map(|&[row, col]| {
                    [
                        row as f64 / cell_size.0 as f64,
                        col as f64 / cell_size.1 as f64,
                    ]
                })
                .collect()
        };

        Self {
            cells: score.grid().mapv(|v| f64::from(v) / cell_scale_divisor),
            reference_points: scale(reference),
            observation_points: scale(observation),
        }
    }
}

/// Score together with optional rendering data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Numeric results
    pub score: ErrorScore,
    /// Rendering data, present when requested
    pub overlay: Option<OverlayData>,
}

impl ScoreSummary {
    /// Summary without rendering data
    pub const fn new(score: ErrorScore) -> Self {
        Self {
            score,
            overlay: None,
        }
    }

    /// Attach rendering data
    #[must_use]
    pub fn with_overlay(mut self, overlay: OverlayData) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Largest scaled cell value, rounded for display legends
    pub fn overlay_peak(&self) -> Option<f64> {
        self.overlay.as_ref().map(|overlay| {
            round_to_tenth(overlay.cells.iter().copied().fold(0.0_f64, f64::max))
        })
    }
}
