//! Binary STL export.
//!
//! Walks an asset's meshes and submeshes, decodes triangle positions from
//! raw vertex buffers, computes a face normal per triangle and serializes
//! the result as binary STL.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (zero-padded identification string)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (always 0)
//! end
//! ```
//!
//! All values are little-endian. A file holding `T` triangles is exactly
//! `84 + 50 * T` bytes long.
//!
//! # Ordering
//!
//! Triangles are emitted in mesh order, then submesh order, then index
//! group order. Exports of the same asset are byte-identical.

use std::io::Write;
use std::path::Path;

use nalgebra::{Point3, Vector3};
use scan_asset::{AssetSource, MeshSource, read_position, triangle_indices};
use tracing::{debug, info, warn};

use crate::atomic::write_atomic;
use crate::config::{DegenerateNormal, StlExportConfig};
use crate::error::{ExportError, ExportResult};

/// STL binary header size in bytes.
pub const HEADER_SIZE: usize = 80;

/// Size of the header plus the triangle count.
pub const PREFIX_SIZE: usize = HEADER_SIZE + 4;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
pub const TRIANGLE_SIZE: usize = 50;

/// One exported face: a unit normal and three vertices in winding order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StlTriangle {
    /// Face normal.
    pub normal: Vector3<f32>,
    /// Vertices in input winding order.
    pub vertices: [Point3<f32>; 3],
}

impl StlTriangle {
    /// Build a triangle and compute its normal.
    ///
    /// The normal is `normalize((v2 - v1) x (v3 - v1))`. When the cross
    /// product has zero length, `policy` decides the written normal.
    ///
    /// # Example
    ///
    /// ```
    /// use scan_export::{DegenerateNormal, StlTriangle};
    /// use nalgebra::Point3;
    ///
    /// let tri = StlTriangle::from_vertices(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    ///     DegenerateNormal::Zero,
    /// );
    /// assert!((tri.normal.z - 1.0).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn from_vertices(
        v1: Point3<f32>,
        v2: Point3<f32>,
        v3: Point3<f32>,
        policy: DegenerateNormal,
    ) -> Self {
        Self {
            normal: face_normal(&v1, &v2, &v3, policy),
            vertices: [v1, v2, v3],
        }
    }

    /// Encode as a 50-byte binary STL record.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; TRIANGLE_SIZE] {
        let mut record = [0u8; TRIANGLE_SIZE];
        let values = std::iter::once(self.normal.as_slice())
            .chain(self.vertices.iter().map(|v| v.coords.as_slice()))
            .flatten();

        for (slot, value) in record.chunks_exact_mut(4).zip(values) {
            slot.copy_from_slice(&value.to_le_bytes());
        }
        // bytes 48..50: attribute byte count, left at zero
        record
    }

    /// Decode a 50-byte binary STL record.
    ///
    /// Returns `None` if `bytes` is shorter than a record. The attribute
    /// field is ignored.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let record = bytes.get(..TRIANGLE_SIZE)?;
        let read = |i: usize| -> Option<f32> {
            let raw: [u8; 4] = record.get(i * 4..i * 4 + 4)?.try_into().ok()?;
            Some(f32::from_le_bytes(raw))
        };
        let point = |i: usize| -> Option<Point3<f32>> {
            Some(Point3::new(read(i)?, read(i + 1)?, read(i + 2)?))
        };

        Some(Self {
            normal: Vector3::new(read(0)?, read(1)?, read(2)?),
            vertices: [point(3)?, point(6)?, point(9)?],
        })
    }
}

/// Compute the unit face normal of a triangle.
///
/// Edges, cross product and length are computed in `f64`. Squared cross
/// lengths of finite `f32` coordinates stay within `f64` range, so only an
/// exactly zero cross product falls back to `policy`.
fn face_normal(
    v1: &Point3<f32>,
    v2: &Point3<f32>,
    v3: &Point3<f32>,
    policy: DegenerateNormal,
) -> Vector3<f32> {
    let (v1, v2, v3) = (v1.cast::<f64>(), v2.cast::<f64>(), v3.cast::<f64>());
    let edge1 = v2 - v1;
    let edge2 = v3 - v1;
    let cross = edge1.cross(&edge2);
    let len = cross.norm();

    if len > 0.0 {
        (cross / len).cast::<f32>()
    } else {
        match policy {
            DegenerateNormal::Zero => Vector3::zeros(),
            DegenerateNormal::Nan => Vector3::repeat(f32::NAN),
        }
    }
}

/// Number of bytes a binary STL with `triangle_count` triangles occupies.
#[inline]
#[must_use]
pub const fn binary_stl_len(triangle_count: usize) -> usize {
    PREFIX_SIZE + TRIANGLE_SIZE * triangle_count
}

/// [`binary_stl_len`] for an untrusted count, `None` on overflow.
#[inline]
#[must_use]
pub const fn checked_binary_stl_len(triangle_count: usize) -> Option<usize> {
    match TRIANGLE_SIZE.checked_mul(triangle_count) {
        Some(body) => body.checked_add(PREFIX_SIZE),
        None => None,
    }
}

/// Decode every exportable triangle of an asset.
///
/// Meshes without a vertex buffer and submeshes with unsupported index
/// types are skipped. Index groups referencing a vertex outside the vertex
/// buffer are skipped with a warning.
#[must_use]
pub fn collect_triangles(asset: &dyn AssetSource, config: &StlExportConfig) -> Vec<StlTriangle> {
    let mut triangles = Vec::new();

    for mesh_index in 0..asset.mesh_count() {
        let Some(mesh) = asset.mesh_at(mesh_index) else {
            debug!(mesh = mesh_index, "Skipping entry that is not a mesh");
            continue;
        };
        let Some(vertices) = mesh.vertex_buffer() else {
            debug!(mesh = mesh_index, "Skipping mesh without vertex buffer");
            continue;
        };
        let stride = mesh.vertex_stride();

        collect_mesh_triangles(
            mesh_index,
            mesh,
            vertices,
            stride,
            config.degenerate_normal,
            &mut triangles,
        );
    }

    triangles
}

fn collect_mesh_triangles(
    mesh_index: usize,
    mesh: &dyn MeshSource,
    vertices: &[u8],
    stride: usize,
    policy: DegenerateNormal,
    out: &mut Vec<StlTriangle>,
) {
    for submesh_index in 0..mesh.submesh_count() {
        let Some(submesh) = mesh.submesh_at(submesh_index) else {
            continue;
        };
        let index_type = submesh.index_type();
        if !index_type.is_supported() {
            debug!(
                mesh = mesh_index,
                submesh = submesh_index,
                %index_type,
                "Skipping submesh with unsupported index type"
            );
            continue;
        }

        let groups = triangle_indices(submesh);
        out.reserve(groups.len());

        for [i0, i1, i2] in groups {
            let positions = (
                read_position(vertices, i0 as usize, stride),
                read_position(vertices, i1 as usize, stride),
                read_position(vertices, i2 as usize, stride),
            );
            let (Some(v1), Some(v2), Some(v3)) = positions else {
                warn!(
                    mesh = mesh_index,
                    submesh = submesh_index,
                    indices = ?[i0, i1, i2],
                    "Skipping triangle with vertex index outside vertex buffer"
                );
                continue;
            };
            out.push(StlTriangle::from_vertices(v1, v2, v3, policy));
        }
    }
}

/// Serialize triangles as binary STL.
///
/// # Example
///
/// ```
/// use scan_export::{StlExportConfig, encode_binary_stl};
///
/// let bytes = encode_binary_stl(&[], &StlExportConfig::default());
/// assert_eq!(bytes.len(), 84);
/// assert_eq!(&bytes[..8], b"BumpScan");
/// ```
#[must_use]
pub fn encode_binary_stl(triangles: &[StlTriangle], config: &StlExportConfig) -> Vec<u8> {
    let mut data = Vec::with_capacity(binary_stl_len(triangles.len()));
    data.extend_from_slice(&config.header_bytes());

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: STL counts are u32, larger exports are unsupported
    let count = triangles.len() as u32;
    data.extend_from_slice(&count.to_le_bytes());

    for triangle in triangles {
        data.extend_from_slice(&triangle.to_bytes());
    }
    data
}

/// Export an asset as binary STL into a writer.
///
/// The complete byte buffer is built first and written with a single
/// `write_all`.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_binary_stl<W: Write>(
    asset: &dyn AssetSource,
    mut writer: W,
    config: &StlExportConfig,
) -> ExportResult<usize> {
    let triangles = collect_triangles(asset, config);
    let data = encode_binary_stl(&triangles, config);
    writer.write_all(&data)?;
    writer.flush()?;
    Ok(triangles.len())
}

/// Export an asset as binary STL to a file with the default configuration.
///
/// The file is written atomically: the destination either receives the
/// complete export or is left untouched.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
///
/// # Example
///
/// ```no_run
/// use scan_asset::{Asset, MeshBuilder};
/// use scan_export::export_binary_stl;
///
/// let mesh = MeshBuilder::new(12)
///     .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
///     .submesh_u16(&[0, 1, 2])
///     .build();
/// let asset = Asset::from_meshes(vec![mesh]);
///
/// export_binary_stl(&asset, "model.stl").unwrap();
/// ```
pub fn export_binary_stl<P: AsRef<Path>>(asset: &dyn AssetSource, path: P) -> ExportResult<usize> {
    StlExporter::default().export(asset, path)
}

/// Binary STL exporter with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct StlExporter {
    config: StlExportConfig,
}

impl StlExporter {
    /// Create an exporter with the given configuration.
    #[must_use]
    pub const fn new(config: StlExportConfig) -> Self {
        Self { config }
    }

    /// The exporter's configuration.
    #[must_use]
    pub const fn config(&self) -> &StlExportConfig {
        &self.config
    }

    /// Encode an asset as binary STL bytes.
    #[must_use]
    pub fn encode(&self, asset: &dyn AssetSource) -> Vec<u8> {
        encode_binary_stl(&collect_triangles(asset, &self.config), &self.config)
    }

    /// Export an asset to a file, returning the number of triangles written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn export<P: AsRef<Path>>(&self, asset: &dyn AssetSource, path: P) -> ExportResult<usize> {
        let path = path.as_ref();
        let triangles = collect_triangles(asset, &self.config);
        info!(
            path = %path.display(),
            meshes = asset.mesh_count(),
            triangles = triangles.len(),
            "Exporting binary STL"
        );

        let data = encode_binary_stl(&triangles, &self.config);
        write_atomic(path, &data)?;

        debug!(bytes = data.len(), "Binary STL written");
        Ok(triangles.len())
    }
}

/// A binary STL decoded back into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStl {
    /// Raw 80-byte header.
    pub header: [u8; HEADER_SIZE],
    /// Triangles in file order.
    pub triangles: Vec<StlTriangle>,
}

impl ParsedStl {
    /// Header text up to the first zero byte, lossily decoded.
    #[must_use]
    pub fn header_text(&self) -> String {
        let end = self
            .header
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(HEADER_SIZE);
        String::from_utf8_lossy(&self.header[..end]).into_owned()
    }
}

/// Parse binary STL bytes.
///
/// Trailing bytes after the declared triangles are ignored.
///
/// # Errors
///
/// Returns [`ExportError::TruncatedStl`] if the data is shorter than the
/// header or than the declared triangle count requires.
pub fn parse_binary_stl(bytes: &[u8]) -> ExportResult<ParsedStl> {
    let truncated = |expected: usize| ExportError::TruncatedStl {
        expected,
        got: bytes.len(),
    };

    let header: [u8; HEADER_SIZE] = bytes
        .get(..HEADER_SIZE)
        .and_then(|h| h.try_into().ok())
        .ok_or_else(|| truncated(PREFIX_SIZE))?;
    let count: [u8; 4] = bytes
        .get(HEADER_SIZE..PREFIX_SIZE)
        .and_then(|c| c.try_into().ok())
        .ok_or_else(|| truncated(PREFIX_SIZE))?;
    let count = usize::try_from(u32::from_le_bytes(count)).unwrap_or(usize::MAX);

    let expected = checked_binary_stl_len(count).ok_or_else(|| truncated(usize::MAX))?;
    let body = bytes
        .get(PREFIX_SIZE..expected)
        .ok_or_else(|| truncated(expected))?;

    let triangles = body
        .chunks_exact(TRIANGLE_SIZE)
        .filter_map(StlTriangle::from_bytes)
        .collect();

    Ok(ParsedStl { header, triangles })
}
