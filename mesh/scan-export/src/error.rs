//! Error types for scan export operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::{ExportFormat, ScanStatus};

/// Result type for scan export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while exporting a scan.
///
/// Malformed geometry is never an error: meshes and submeshes that cannot
/// be decoded are skipped. Failures come from the destination, the format
/// registry, or the caller's preconditions.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The format cannot be produced from a mesh asset.
    #[error("export format '{format}' is not supported")]
    FormatNotSupported {
        /// The requested format.
        format: ExportFormat,
    },

    /// The asset contains no meshes.
    #[error("asset contains no meshes")]
    EmptyAsset,

    /// The scan has not reached a state that can be exported.
    #[error("scan is {status}, only completed scans can be exported")]
    NotExportable {
        /// Status of the scan.
        status: ScanStatus,
    },

    /// A model file expected on disk does not exist.
    #[error("{format} model file not found: {path}")]
    ModelNotFound {
        /// Format of the missing model.
        format: ExportFormat,
        /// Path that was checked.
        path: PathBuf,
    },

    /// The destination path has no usable parent directory or file name.
    #[error("invalid destination path: {path}")]
    InvalidDestination {
        /// The rejected path.
        path: PathBuf,
    },

    /// Binary STL data is shorter than its header or declared triangle count.
    #[error("truncated STL data: expected {expected} bytes, got {got}")]
    TruncatedStl {
        /// Bytes required by the header and triangle count.
        expected: usize,
        /// Bytes actually present.
        got: usize,
    },

    /// The scan's image directory holds no images to package.
    #[error("no images found in {path}")]
    NoImagesFound {
        /// Directory that was searched.
        path: PathBuf,
    },

    /// Unrecognized scan status name.
    #[error("unknown scan status: {name}")]
    UnknownStatus {
        /// The rejected name.
        name: String,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Create a `FormatNotSupported` error for the given format.
    #[must_use]
    pub const fn format_not_supported(format: ExportFormat) -> Self {
        Self::FormatNotSupported { format }
    }
}

impl From<tempfile::PersistError> for ExportError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}
