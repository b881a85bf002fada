//! Spatial data structures for composite images
//!
//! This module contains spatial-related functionality including:
//! - Composite layout and region extraction
//! - Region masks and foreground point sets
//! - Coarse cell partition used for aggregation

/// Coarse cell partition with per-cell maxima
pub mod grid;
/// Composite layout and region extraction
pub mod layout;
/// Region masks and foreground point sets
pub mod mask;

pub use grid::CellGrid;
pub use layout::{RegionLayout, RegionPair};
pub use mask::{BackgroundMode, Mask, PointSet, Region};
