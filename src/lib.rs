//! Spatial error scoring of observational drawings against a reference drawing
//!
//! A composite image holds the reference and the observation side by side. Each
//! half becomes a set of foreground points, each set gets an exact 4-connected
//! distance field, and the distances of every point into the opposite field are
//! aggregated into normalized error percentages and a coarse per-cell grid.

#![forbid(unsafe_code)]

/// Distance fields, cross-distance aggregation, and the scoring pipelines
pub mod algorithm;
/// Score records, rendering summaries, and batch statistics
pub mod analysis;
/// Input/output operations, configuration constants, and error handling
pub mod io;
/// Rounding and averaging helpers shared by the scoring stages
pub mod math;
/// Region layout, masks, point sets, and the coarse cell grid
pub mod spatial;

pub use algorithm::scoring::{Scorer, ScoringConfig};
pub use algorithm::streaming::StreamingScorer;
pub use analysis::summary::ErrorScore;
pub use io::error::{Result, ScoreError};
pub use spatial::mask::BackgroundMode;
