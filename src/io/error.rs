//! Error types for scoring operations

use crate::spatial::mask::Region;
use std::fmt;
use std::path::PathBuf;

/// Main error type for all scoring operations
#[derive(Debug)]
pub enum ScoreError {
    /// Image resource could not be read from the filesystem
    NotFound {
        /// Path to the image file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Image resource was readable but could not be decoded
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Image array lacks a required channel or is smaller than the layout
    MalformedImage {
        /// Description of what's wrong with the image
        reason: String,
    },

    /// A region has no foreground pixels
    ///
    /// Distances to an empty point set are undefined, so scoring stops here
    /// instead of computing on unreached cells.
    EmptyPointSet {
        /// Region that produced the empty set
        region: Region,
    },

    /// Configuration or coordinate validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed
    Serialization {
        /// Underlying serde error
        source: serde_json::Error,
    },
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path, source } => {
                write!(f, "Failed to read image '{}': {source}", path.display())
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to decode image '{}': {source}", path.display())
            }
            Self::MalformedImage { reason } => {
                write!(f, "Malformed image: {reason}")
            }
            Self::EmptyPointSet { region } => {
                write!(f, "The {region} region contains no drawing content")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { source } => {
                write!(f, "Serialization error: {source}")
            }
        }
    }
}

impl std::error::Error for ScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { source, .. } | Self::FileSystem { source, .. } => Some(source),
            Self::ImageLoad { source, .. } => Some(source),
            Self::Serialization { source } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for scoring results
pub type Result<T> = std::result::Result<T, ScoreError>;

impl ScoreError {
    /// Map an image decoding failure for `path`, separating unreadable files from bad data
    pub fn from_image_error(path: impl Into<PathBuf>, err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(source) => Self::NotFound {
                path: path.into(),
                source,
            },
            other => Self::ImageLoad {
                path: path.into(),
                source: other,
            },
        }
    }

    /// Whether the error is a per-image data problem rather than an environment failure
    pub const fn is_image_specific(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::ImageLoad { .. }
                | Self::MalformedImage { .. }
                | Self::EmptyPointSet { .. }
        )
    }
}

impl From<image::ImageError> for ScoreError {
    fn from(err: image::ImageError) -> Self {
        Self::from_image_error("<unknown>", err)
    }
}

impl From<std::io::Error> for ScoreError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_json::Error> for ScoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization { source: err }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> ScoreError {
    ScoreError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a malformed image error
pub fn malformed_image(reason: &impl ToString) -> ScoreError {
    ScoreError::MalformedImage {
        reason: reason.to_string(),
    }
}
