//! Model export for BumpScan.
//!
//! Turns a reconstructed scan asset (see [`scan_asset`]) into files for
//! viewing and 3D printing:
//!
//! - **STL** - binary, with per-triangle face normals
//! - **OBJ** - ASCII, indexed vertices, one group per submesh
//!
//! USDZ is produced by the reconstruction engine and only appears here in
//! the [`ExportFormat`] registry.
//!
//! # Example
//!
//! ```
//! use scan_asset::{Asset, MeshBuilder};
//! use scan_export::{StlExporter, parse_binary_stl};
//!
//! let mesh = MeshBuilder::new(12)
//!     .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
//!     .submesh_u16(&[0, 1, 2])
//!     .build();
//! let asset = Asset::from_meshes(vec![mesh]);
//!
//! let bytes = StlExporter::default().encode(&asset);
//! assert_eq!(bytes.len(), 84 + 50);
//!
//! let parsed = parse_binary_stl(&bytes).unwrap();
//! assert_eq!(parsed.triangles[0].normal.z, 1.0);
//! ```
//!
//! # Failure Model
//!
//! Geometry that cannot be decoded is skipped, never reported: meshes
//! without a vertex buffer, submeshes with 8-bit indices, trailing partial
//! index groups and indices past the end of the vertex buffer. Only the
//! final write can fail, and files are replaced atomically.
//!
//! # Logging
//!
//! Export progress is reported through [`tracing`] events. Install a
//! subscriber in the host application to see them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod atomic;
mod config;
mod convert;
mod error;
mod format;
mod obj;
mod paths;
mod status;
mod stl;

pub use atomic::write_atomic;
pub use config::{DEFAULT_HEADER, DegenerateNormal, StlExportConfig};
pub use convert::{GeneratedModels, ModelConverter, existing_model};
pub use error::{ExportError, ExportResult};
pub use format::{ExportFormat, MODEL_FILE_NAME, export_model};
pub use obj::{export_obj, write_obj};
pub use paths::{
    EXPORTS_DIR, IMAGE_EXTENSIONS, IMAGES_DIR, MAC_EXPORT_SUFFIX, MODELS_DIR, SNAPSHOTS_DIR,
    ScanFolder, is_image_file, relative_to,
};
pub use status::ScanStatus;
pub use stl::{
    HEADER_SIZE, PREFIX_SIZE, ParsedStl, StlExporter, StlTriangle, TRIANGLE_SIZE, binary_stl_len,
    checked_binary_stl_len, collect_triangles, encode_binary_stl, export_binary_stl,
    parse_binary_stl, write_binary_stl,
};
