//! On-disk layout of a scan folder.
//!
//! ```text
//! <root>/
//!   Images/      captured photos
//!   Snapshots/   reconstruction checkpoints
//!   Models/      model.usdz, model.obj, model.stl
//!   Exports/     packages prepared for sharing
//! ```
//!
//! Image packaging, image counts, folder size and deletion also live here.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ExportError, ExportResult};
use crate::format::{ExportFormat, MODEL_FILE_NAME};

/// Directory holding captured images.
pub const IMAGES_DIR: &str = "Images";
/// Directory holding reconstruction snapshots.
pub const SNAPSHOTS_DIR: &str = "Snapshots";
/// Directory holding model files.
pub const MODELS_DIR: &str = "Models";
/// Directory holding share packages.
pub const EXPORTS_DIR: &str = "Exports";

/// Suffix of the image package folder created under `Exports/`.
pub const MAC_EXPORT_SUFFIX: &str = "_MacExport";

/// Extensions counted as captured images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["heic", "jpg", "jpeg", "png"];

/// Whether `path` has one of [`IMAGE_EXTENSIONS`].
#[must_use]
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Paths of one scan folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFolder {
    root: PathBuf,
}

impl ScanFolder {
    /// Describe an existing scan folder without touching the filesystem.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create `<scans_root>/<name>` and its four subdirectories.
    ///
    /// Existing directories are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn create(scans_root: &Path, name: &str) -> ExportResult<Self> {
        let folder = Self::new(scans_root.join(name));
        for dir in [
            folder.images(),
            folder.snapshots(),
            folder.models(),
            folder.exports(),
        ] {
            fs::create_dir_all(&dir)?;
        }
        debug!(root = %folder.root.display(), "Created scan folder");
        Ok(folder)
    }

    /// Root of the scan folder.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `Images/` directory.
    #[must_use]
    pub fn images(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    /// `Snapshots/` directory.
    #[must_use]
    pub fn snapshots(&self) -> PathBuf {
        self.root.join(SNAPSHOTS_DIR)
    }

    /// `Models/` directory.
    #[must_use]
    pub fn models(&self) -> PathBuf {
        self.root.join(MODELS_DIR)
    }

    /// `Exports/` directory.
    #[must_use]
    pub fn exports(&self) -> PathBuf {
        self.root.join(EXPORTS_DIR)
    }

    /// `Models/model.<ext>` for the given format.
    ///
    /// # Example
    ///
    /// ```
    /// use scan_export::{ExportFormat, ScanFolder};
    /// use std::path::Path;
    ///
    /// let folder = ScanFolder::new("/scans/first");
    /// assert_eq!(
    ///     folder.model_file(ExportFormat::Stl),
    ///     Path::new("/scans/first/Models/model.stl")
    /// );
    /// ```
    #[must_use]
    pub fn model_file(&self, format: ExportFormat) -> PathBuf {
        self.models().join(format.file_name(MODEL_FILE_NAME))
    }

    /// Image files directly inside `Images/`, sorted by path.
    ///
    /// # Errors
    ///
    /// Returns an error if `Images/` cannot be read.
    pub fn image_files(&self) -> ExportResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(self.images())? {
            let path = entry?.path();
            if path.is_file() && is_image_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Number of captured images. An unreadable `Images/` counts as empty.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.image_files().map_or(0, |files| files.len())
    }

    /// Total size in bytes of every file below the root, recursively.
    ///
    /// Hidden entries (names starting with `.`) are not counted. A missing
    /// root has size 0.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or file cannot be inspected.
    pub fn folder_size(&self) -> ExportResult<u64> {
        if !self.root.exists() {
            return Ok(0);
        }
        dir_size(&self.root)
    }

    /// Copy the captured images into `Exports/<scan_name>_MacExport`.
    ///
    /// An existing package folder is replaced. Returns the package folder.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NoImagesFound`] if `Images/` holds no images,
    /// or an I/O error if reading or copying fails.
    pub fn package_images_for_mac_export(&self, scan_name: &str) -> ExportResult<PathBuf> {
        let images = self.image_files()?;
        if images.is_empty() {
            return Err(ExportError::NoImagesFound {
                path: self.images(),
            });
        }

        let target = self.exports().join(format!("{scan_name}{MAC_EXPORT_SUFFIX}"));
        if target.exists() {
            fs::remove_dir_all(&target)?;
        }
        fs::create_dir_all(&target)?;

        for image in &images {
            if let Some(name) = image.file_name() {
                fs::copy(image, target.join(name))?;
            }
        }

        info!(
            target = %target.display(),
            images = images.len(),
            "Packaged images for export"
        );
        Ok(target)
    }

    /// Remove the scan folder and everything in it.
    ///
    /// Deleting a folder that does not exist succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder exists but cannot be removed.
    pub fn delete(&self) -> ExportResult<()> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                debug!(root = %self.root.display(), "Deleted scan folder");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn dir_size(dir: &Path) -> ExportResult<u64> {
    let mut total = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            total += dir_size(&entry.path())?;
        } else if file_type.is_file() {
            total += entry.metadata()?.len();
        }
    }
    Ok(total)
}

/// Express `path` relative to `base` when it lies inside it.
///
/// Paths outside `base` are returned unchanged.
#[must_use]
pub fn relative_to(base: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}
