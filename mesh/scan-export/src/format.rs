//! Export format registry.

use std::fmt;
use std::path::Path;

use scan_asset::AssetSource;

use crate::error::{ExportError, ExportResult};
use crate::obj::export_obj;
use crate::stl::export_binary_stl;

/// Base file name of model files inside a scan folder.
pub const MODEL_FILE_NAME: &str = "model";

/// Formats a finished scan can be shared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Universal Scene Description archive, for AR viewing.
    /// Produced by the reconstruction engine, never written here.
    Usdz,
    /// Wavefront OBJ, for 3D editing and printing.
    Obj,
    /// Binary STL, the 3D printing standard. Geometry only, no color.
    Stl,
}

impl ExportFormat {
    /// All formats, in presentation order.
    pub const ALL: [Self; 3] = [Self::Usdz, Self::Obj, Self::Stl];

    /// Detect format from file extension (case-insensitive).
    ///
    /// # Example
    ///
    /// ```
    /// use scan_export::ExportFormat;
    ///
    /// assert_eq!(ExportFormat::from_path("Models/model.STL"), Some(ExportFormat::Stl));
    /// assert_eq!(ExportFormat::from_path("model.ply"), None);
    /// ```
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "usdz" => Some(Self::Usdz),
            "obj" => Some(Self::Obj),
            "stl" => Some(Self::Stl),
            _ => None,
        }
    }

    /// Canonical file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Usdz => "usdz",
            Self::Obj => "obj",
            Self::Stl => "stl",
        }
    }

    /// Short user-facing name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Usdz => "USDZ",
            Self::Obj => "OBJ",
            Self::Stl => "STL",
        }
    }

    /// One-line description of what the format is for.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Usdz => "Universal Scene Description (AR viewing)",
            Self::Obj => "Wavefront OBJ (3D editing & printing)",
            Self::Stl => "Stereolithography (3D printing standard)",
        }
    }

    /// File name for a model with the given base name.
    ///
    /// # Example
    ///
    /// ```
    /// use scan_export::{ExportFormat, MODEL_FILE_NAME};
    ///
    /// assert_eq!(ExportFormat::Obj.file_name(MODEL_FILE_NAME), "model.obj");
    /// ```
    #[must_use]
    pub fn file_name(self, base: &str) -> String {
        format!("{base}.{}", self.extension())
    }

    /// Whether this crate can write the format from a mesh asset.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::Obj | Self::Stl)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Export an asset in the given format, returning the triangle count.
///
/// # Errors
///
/// Returns [`ExportError::FormatNotSupported`] for formats this crate
/// cannot write, or an I/O error if the file cannot be written.
pub fn export_model<P: AsRef<Path>>(
    asset: &dyn AssetSource,
    format: ExportFormat,
    path: P,
) -> ExportResult<usize> {
    match format {
        ExportFormat::Stl => export_binary_stl(asset, path),
        ExportFormat::Obj => export_obj(asset, path),
        ExportFormat::Usdz => Err(ExportError::format_not_supported(format)),
    }
}
