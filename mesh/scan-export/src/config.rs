//! Configuration for binary STL export.
//!
//! [`StlExportConfig`] controls the header text written into the file and
//! the normal emitted for zero-area triangles.
//!
//! # Presets
//!
//! - [`StlExportConfig::default()`] - BumpScan header, zero normals for
//!   degenerate triangles
//! - [`StlExportConfig::unguarded()`] - BumpScan header, NaN normals for
//!   degenerate triangles (a plain normalize of a zero vector)
//!
//! # Example
//!
//! ```
//! use scan_export::{DegenerateNormal, StlExportConfig};
//!
//! let config = StlExportConfig::default()
//!     .with_header("Scan 2026-10-17")
//!     .with_degenerate_normal(DegenerateNormal::Zero);
//!
//! assert_eq!(&config.header_bytes()[..4], b"Scan");
//! ```

use crate::stl::HEADER_SIZE;

/// Identification string written at the start of every export.
pub const DEFAULT_HEADER: &str = "BumpScan 3D STL Export";

/// Normal written for a triangle whose edge cross product has zero length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegenerateNormal {
    /// Write `(0, 0, 0)`.
    #[default]
    Zero,

    /// Write `(NaN, NaN, NaN)`, the result of normalizing a zero vector.
    Nan,
}

/// Configuration for binary STL export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StlExportConfig {
    /// Header text. Encoded as UTF-8, truncated to 80 bytes, zero-padded.
    pub header: String,

    /// Normal policy for zero-area triangles.
    pub degenerate_normal: DegenerateNormal,
}

impl Default for StlExportConfig {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            degenerate_normal: DegenerateNormal::Zero,
        }
    }
}

impl StlExportConfig {
    /// Configuration that normalizes degenerate normals without a guard.
    ///
    /// # Example
    ///
    /// ```
    /// use scan_export::{DegenerateNormal, StlExportConfig};
    ///
    /// let config = StlExportConfig::unguarded();
    /// assert_eq!(config.degenerate_normal, DegenerateNormal::Nan);
    /// ```
    #[must_use]
    pub fn unguarded() -> Self {
        Self {
            degenerate_normal: DegenerateNormal::Nan,
            ..Self::default()
        }
    }

    /// Set the header text.
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Set the degenerate normal policy.
    #[must_use]
    pub const fn with_degenerate_normal(mut self, policy: DegenerateNormal) -> Self {
        self.degenerate_normal = policy;
        self
    }

    /// The 80-byte header block: header text, left-justified and
    /// zero-padded, truncated if longer than 80 bytes.
    #[must_use]
    pub fn header_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut block = [0u8; HEADER_SIZE];
        let text = self.header.as_bytes();
        let len = text.len().min(HEADER_SIZE);
        block[..len].copy_from_slice(&text[..len]);
        block
    }
}
