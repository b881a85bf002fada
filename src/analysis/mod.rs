//! Result records and batch-level analysis

/// Batch statistics and case selection
pub mod statistics;
/// Score records and rendering-ready summaries
pub mod summary;
