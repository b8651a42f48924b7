//! Producing the shareable model files of a scan.

use std::path::PathBuf;

use scan_asset::AssetSource;
use tracing::info;

use crate::error::{ExportError, ExportResult};
use crate::format::ExportFormat;
use crate::obj::export_obj;
use crate::paths::ScanFolder;
use crate::status::ScanStatus;
use crate::stl::StlExporter;

/// Model files written by [`ModelConverter::generate_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModels {
    /// Path of the OBJ file.
    pub obj: PathBuf,
    /// Path of the binary STL file.
    pub stl: PathBuf,
    /// Triangles written to the OBJ file.
    pub obj_triangles: usize,
    /// Triangles written to the STL file.
    pub stl_triangles: usize,
}

/// Converts a reconstructed asset into the writable export formats.
///
/// # Example
///
/// ```no_run
/// use scan_asset::Asset;
/// use scan_export::{ModelConverter, ScanFolder};
///
/// # fn load() -> Asset { Asset::new() }
/// let asset = load();
/// let folder = ScanFolder::new("Scans/Scan_1");
/// let models = ModelConverter::default().generate_all(&asset, &folder).unwrap();
/// println!("{} triangles", models.stl_triangles);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelConverter {
    stl: StlExporter,
}

impl ModelConverter {
    /// Create a converter using the given STL exporter.
    #[must_use]
    pub const fn new(stl: StlExporter) -> Self {
        Self { stl }
    }

    /// Write one format into the scan folder's `Models/` directory.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::EmptyAsset`] if the asset has no meshes,
    /// [`ExportError::FormatNotSupported`] for USDZ, or an I/O error.
    pub fn convert(
        &self,
        asset: &dyn AssetSource,
        format: ExportFormat,
        folder: &ScanFolder,
    ) -> ExportResult<(PathBuf, usize)> {
        if asset.mesh_count() == 0 {
            return Err(ExportError::EmptyAsset);
        }

        let path = folder.model_file(format);
        let triangles = match format {
            ExportFormat::Stl => self.stl.export(asset, &path)?,
            ExportFormat::Obj => export_obj(asset, &path)?,
            ExportFormat::Usdz => return Err(ExportError::format_not_supported(format)),
        };
        Ok((path, triangles))
    }

    /// Write `model.obj` and `model.stl` into the scan folder.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::EmptyAsset`] if the asset has no meshes, or
    /// an I/O error if a file cannot be written.
    pub fn generate_all(
        &self,
        asset: &dyn AssetSource,
        folder: &ScanFolder,
    ) -> ExportResult<GeneratedModels> {
        let (obj, obj_triangles) = self.convert(asset, ExportFormat::Obj, folder)?;
        let (stl, stl_triangles) = self.convert(asset, ExportFormat::Stl, folder)?;

        info!(
            root = %folder.root().display(),
            triangles = stl_triangles,
            "Generated model files"
        );
        Ok(GeneratedModels {
            obj,
            stl,
            obj_triangles,
            stl_triangles,
        })
    }

    /// [`Self::generate_all`] for a scan, refusing scans that are not
    /// completed.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NotExportable`] unless `status` is
    /// [`ScanStatus::Completed`], otherwise as [`Self::generate_all`].
    pub fn export_for_status(
        &self,
        status: ScanStatus,
        asset: &dyn AssetSource,
        folder: &ScanFolder,
    ) -> ExportResult<GeneratedModels> {
        if !status.can_export() {
            return Err(ExportError::NotExportable { status });
        }
        self.generate_all(asset, folder)
    }
}

/// Path of an existing model file of the scan, ready to share.
///
/// # Errors
///
/// Returns [`ExportError::ModelNotFound`] if the file does not exist.
pub fn existing_model(folder: &ScanFolder, format: ExportFormat) -> ExportResult<PathBuf> {
    let path = folder.model_file(format);
    if path.is_file() {
        Ok(path)
    } else {
        Err(ExportError::ModelNotFound { format, path })
    }
}
