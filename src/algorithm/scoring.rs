//! End-to-end scoring pipeline from composite image to error score

use crate::algorithm::aggregation::{AggregationConfig, aggregate};
use crate::algorithm::distance::DistanceField;
use crate::analysis::summary::{ErrorScore, OverlayData, ScoreSummary};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::CompositeImage;
use crate::spatial::grid::cell_size;
use crate::spatial::layout::RegionLayout;
use crate::spatial::mask::{BackgroundMode, Mask, PointSet, Region};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration of a scoring run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Placement of the two regions in the composite
    pub layout: RegionLayout,
    /// Grid and normalization parameters
    pub aggregation: AggregationConfig,
    /// Background convention selecting channel and background value
    pub mode: BackgroundMode,
}

impl ScoringConfig {
    /// Canonical layout and aggregation with the given background mode
    pub fn with_mode(mode: BackgroundMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Check the layout and aggregation parameters together
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for the first inconsistent value
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.aggregation.validate(self.layout.region_dims())
    }
}

/// Outcome of scoring one image in a batch
#[derive(Debug)]
pub struct BatchEntry {
    /// Image that was scored
    pub path: PathBuf,
    /// Score, or the reason the image could not be scored
    pub result: Result<ErrorScore>,
}

/// Stateless scorer bound to a validated configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    /// Create a scorer after validating `config`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the configuration is inconsistent
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Scorer with the canonical configuration for `mode`
    pub fn canonical(mode: BackgroundMode) -> Self {
        Self {
            config: ScoringConfig::with_mode(mode),
        }
    }

    /// Active configuration
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Load and score a composite image file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The image cannot be read or decoded
    /// - The image lacks the mode's channel or is smaller than the layout
    /// - Either region has no foreground pixels
    pub fn score_path<P: AsRef<Path>>(&self, path: P) -> Result<ErrorScore> {
        let image = CompositeImage::open(path)?;
        self.score_image(&image)
    }

    /// Score an in-memory composite image
    ///
    /// # Errors
    ///
    /// Same as [`Scorer::score_path`] minus the file access failures
    pub fn score_image(&self, image: &CompositeImage) -> Result<ErrorScore> {
        let regions = self.config.layout.extract_regions(image, self.config.mode)?;
        self.score_masks(&regions.reference, &regions.observation)
    }

    /// Score two region masks directly
    ///
    /// # Errors
    ///
    /// Returns `EmptyPointSet` if either mask has no foreground pixels and
    /// `InvalidParameter` if the masks do not match the layout's region size
    pub fn score_masks(&self, reference: &Mask, observation: &Mask) -> Result<ErrorScore> {
        let (reference_points, observation_points) = self.point_sets(reference, observation)?;
        self.score_point_sets(&reference_points, &observation_points)
    }

    /// Score two point sets, building both distance fields
    ///
    /// # Errors
    ///
    /// Returns `EmptyPointSet` if either set is empty and `InvalidParameter`
    /// if their dimensions disagree
    pub fn score_point_sets(
        &self,
        reference: &PointSet,
        observation: &PointSet,
    ) -> Result<ErrorScore> {
        let reference_field = DistanceField::build(reference)?;
        let observation_field = DistanceField::build(observation)?;
        aggregate(
            reference,
            observation,
            &reference_field,
            &observation_field,
            &self.config.aggregation,
        )
    }

    /// Score an image file and optionally attach rendering data
    ///
    /// # Errors
    ///
    /// Same as [`Scorer::score_path`]
    pub fn summarize_path<P: AsRef<Path>>(
        &self,
        path: P,
        with_overlay: bool,
    ) -> Result<ScoreSummary> {
        let image = CompositeImage::open(path)?;
        let regions = self.config.layout.extract_regions(&image, self.config.mode)?;
        let (reference, observation) = self.point_sets(&regions.reference, &regions.observation)?;
        let score = self.score_point_sets(&reference, &observation)?;

        if !with_overlay {
            return Ok(ScoreSummary::new(score));
        }

        let cells = cell_size(
            self.config.layout.region_dims(),
            self.config.aggregation.grid_cells,
        )?;
        let overlay = OverlayData::new(
            &score,
            &reference,
            &observation,
            cells,
            self.config.aggregation.cell_scale_divisor,
        );
        Ok(ScoreSummary::new(score).with_overlay(overlay))
    }

    /// Score many images in parallel, preserving input order
    ///
    /// Each image's failure is captured in its entry; one bad image never
    /// stops the batch.
    pub fn score_batch<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<BatchEntry> {
        self.score_batch_with(paths, |_| {})
    }

    /// Like [`Scorer::score_batch`], calling `on_scored` as each image finishes
    ///
    /// `on_scored` runs on worker threads in completion order.
    pub fn score_batch_with<P, F>(&self, paths: &[P], on_scored: F) -> Vec<BatchEntry>
    where
        P: AsRef<Path> + Sync,
        F: Fn(&BatchEntry) + Sync,
    {
        paths
            .par_iter()
            .map(|path| {
                let entry = BatchEntry {
                    path: path.as_ref().to_path_buf(),
                    result: self.score_path(path),
                };
                match &entry.result {
                    Err(e) if e.is_image_specific() => {
                        log::warn!("skipping {}: {e}", entry.path.display());
                    }
                    Err(e) => log::error!("failed on {}: {e}", entry.path.display()),
                    Ok(_) => {}
                }
                on_scored(&entry);
                entry
            })
            .collect()
    }

    fn point_sets(&self, reference: &Mask, observation: &Mask) -> Result<(PointSet, PointSet)> {
        let expected = self.config.layout.region_dims();
        for (name, mask) in [("reference", reference), ("observation", observation)] {
            if mask.dims() != expected {
                return Err(invalid_parameter(
                    name,
                    &format!("{}x{}", mask.dims().1, mask.dims().0),
                    &format!("mask must be {}x{}", expected.1, expected.0),
                ));
            }
        }

        let background = self.config.mode.background_value();
        let reference_points = reference.point_set(Region::Reference, background)?;
        let observation_points = observation.point_set(Region::Observation, background)?;
        log::debug!(
            "{} reference and {} observation points",
            reference_points.len(),
            observation_points.len()
        );
        Ok((reference_points, observation_points))
    }
}
