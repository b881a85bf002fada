//! Fixed composite layout and the split into reference and observation masks

use crate::io::configuration::{
    OBSERVATION_COLUMN_OFFSET, REFERENCE_COLUMN_OFFSET, REGION_ROW_OFFSET, REGION_SIZE,
};
use crate::io::error::{Result, invalid_parameter, malformed_image};
use crate::io::image::CompositeImage;
use crate::spatial::mask::{BackgroundMode, Mask};
use ndarray::{Axis, Slice};
use serde::{Deserialize, Serialize};

/// Placement of the two equally sized regions inside a composite image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionLayout {
    /// Region height in pixels
    pub rows: usize,
    /// Region width in pixels
    pub cols: usize,
    /// First row shared by both regions
    pub row_offset: usize,
    /// First column of the reference region
    pub reference_col_offset: usize,
    /// First column of the observation region
    pub observation_col_offset: usize,
}

impl Default for RegionLayout {
    fn default() -> Self {
        Self {
            rows: REGION_SIZE,
            cols: REGION_SIZE,
            row_offset: REGION_ROW_OFFSET,
            reference_col_offset: REFERENCE_COLUMN_OFFSET,
            observation_col_offset: OBSERVATION_COLUMN_OFFSET,
        }
    }
}

/// Reference and observation masks cut from one composite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPair {
    /// Mask of the ground truth drawing
    pub reference: Mask,
    /// Mask of the drawing being scored
    pub observation: Mask,
}

impl RegionLayout {
    /// Region dimensions (rows, cols)
    pub const fn region_dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Smallest composite (height, width) that contains both regions
    pub fn required_dims(&self) -> (usize, usize) {
        let rightmost = self.reference_col_offset.max(self.observation_col_offset);
        (self.row_offset + self.rows, rightmost + self.cols)
    }

    /// Check that regions are non-empty and do not overlap
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first offending field
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 {
            return Err(invalid_parameter("rows", &self.rows, &"must be positive"));
        }
        if self.cols == 0 {
            return Err(invalid_parameter("cols", &self.cols, &"must be positive"));
        }
        if self.reference_col_offset.abs_diff(self.observation_col_offset) < self.cols {
            return Err(invalid_parameter(
                "observation_col_offset",
                &self.observation_col_offset,
                &format!(
                    "regions of width {} starting at columns {} and {} overlap",
                    self.cols, self.reference_col_offset, self.observation_col_offset
                ),
            ));
        }
        Ok(())
    }

    /// Select the stroke channel for `mode` and cut both regions out of `image`
    ///
    /// # Errors
    ///
    /// Returns `MalformedImage` if the required channel is missing or the
    /// image is smaller than [`RegionLayout::required_dims`]
    pub fn extract_regions(
        &self,
        image: &CompositeImage,
        mode: BackgroundMode,
    ) -> Result<RegionPair> {
        let index = image.channel_index(mode)?;
        let channel = image
            .channel(index)
            .ok_or_else(|| malformed_image(&format!("channel {index} is missing")))?;

        let (height, width) = image.dims();
        let (required_height, required_width) = self.required_dims();
        if height < required_height || width < required_width {
            return Err(malformed_image(&format!(
                "expected at least {required_width}x{required_height}, got {width}x{height}"
            )));
        }

        let rows = self.row_offset..self.row_offset + self.rows;
        let reference_cols = self.reference_col_offset..self.reference_col_offset + self.cols;
        let observation_cols =
            self.observation_col_offset..self.observation_col_offset + self.cols;

        let band = channel.slice_axis(Axis(0), Slice::from(rows));
        let reference = band
            .slice_axis(Axis(1), Slice::from(reference_cols))
            .to_owned();
        let observation = band
            .slice_axis(Axis(1), Slice::from(observation_cols))
            .to_owned();

        log::debug!(
            "extracted {}x{} regions from {width}x{height} image using {mode} channel {index}",
            self.cols,
            self.rows
        );

        Ok(RegionPair {
            reference: Mask::new(reference),
            observation: Mask::new(observation),
        })
    }
}
