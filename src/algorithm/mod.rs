/// Cross-distance aggregation into error scores
pub mod aggregation;
/// Multi-source breadth-first distance fields
pub mod distance;
/// End-to-end scoring pipeline and batch scoring
pub mod scoring;
/// Incremental scoring of drawings in progress
pub mod streaming;
