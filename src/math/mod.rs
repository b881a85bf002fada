//! Numeric utilities for score normalization

/// Rounding, means and top-k averaging
pub mod stats;
