//! Scan lifecycle status.

use std::fmt;
use std::str::FromStr;

use crate::error::ExportError;

/// Where a scan is in its lifecycle.
///
/// `Preparing → Capturing → Reconstructing → Completed`, with `Failed`
/// reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanStatus {
    /// Device checks and subject setup.
    Preparing,
    /// Photos are being captured.
    Capturing,
    /// The photogrammetry engine is building the model.
    Reconstructing,
    /// A model is available.
    Completed,
    /// Capture or reconstruction failed.
    Failed,
}

impl ScanStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Preparing,
        Self::Capturing,
        Self::Reconstructing,
        Self::Completed,
        Self::Failed,
    ];

    /// Stable lowercase identifier, used for persistence.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preparing => "preparing",
            Self::Capturing => "capturing",
            Self::Reconstructing => "reconstructing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// User-facing name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Preparing => "Preparing",
            Self::Capturing => "Capturing",
            Self::Reconstructing => "Reconstructing",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    /// Whether the scan will not change status again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether model files can be exported for the scan.
    #[must_use]
    pub const fn can_export(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanStatus {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ExportError::UnknownStatus { name: s.to_string() })
    }
}
