//! Error types for stereogram generation and its file handling

use std::fmt;
use std::path::PathBuf;

/// Main error type for all stereogram operations
#[derive(Debug)]
pub enum StereogramError {
    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// Failed to encode a buffer into an in-memory image stream
    Encode {
        /// Underlying encoder error
        source: image::ImageError,
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

    /// Template cannot be scaled to a tile of non-zero height
    ///
    /// Raised for zero-width or zero-height templates, and for templates so
    /// wide that the scaled height rounds down to nothing.
    DegenerateTemplate {
        /// Template width in pixels
        width: usize,
        /// Template height in pixels
        height: usize,
    },

    /// Coordinate access outside a buffer
    IndexOutOfBounds {
        /// Requested column
        x: usize,
        /// Requested row
        y: usize,
        /// Buffer width
        width: usize,
        /// Buffer height
        height: usize,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A requested depth map or template does not exist
    NotFound {
        /// What was being looked up (e.g. "template", "depth map")
        kind: &'static str,
        /// Name or path that was requested
        name: String,
    },

    /// Worker pool could not be constructed
    ThreadPool {
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for StereogramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::Encode { source } => write!(f, "Failed to encode image: {source}"),
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
            Self::DegenerateTemplate { width, height } => {
                write!(
                    f,
                    "Template of size {width}x{height} cannot be scaled to a non-empty tile"
                )
            }
            Self::IndexOutOfBounds {
                x,
                y,
                width,
                height,
            } => {
                write!(
                    f,
                    "Coordinate ({x}, {y}) is outside the {width}x{height} buffer"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::NotFound { kind, name } => write!(f, "No {kind} found for '{name}'"),
            Self::ThreadPool { reason } => write!(f, "Failed to build worker pool: {reason}"),
        }
    }
}

impl std::error::Error for StereogramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. }
            | Self::ImageExport { source, .. }
            | Self::Encode { source } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for stereogram results
pub type Result<T> = std::result::Result<T, StereogramError>;

impl From<std::io::Error> for StereogramError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> StereogramError {
    StereogramError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a lookup failure error
pub fn not_found(kind: &'static str, name: &impl ToString) -> StereogramError {
    StereogramError::NotFound {
        kind,
        name: name.to_string(),
    }
}
