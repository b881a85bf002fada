//! Input/output operations, configuration and error handling

/// Command-line interface and file processing
pub mod cli;
/// Layout constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// Composite image loading
pub mod image;
/// Batch progress display
pub mod progress;
