//! Owned in-memory meshes and assets.

use crate::buffer::POSITION_SIZE;
use crate::{AssetSource, IndexType, MeshSource, SubmeshSource, VertexBuffer};

/// A triangle list referencing its parent mesh's vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submesh {
    /// Element type of `index_bytes`.
    pub index_type: IndexType,
    /// Declared number of indices.
    pub index_count: usize,
    /// Raw little-endian index bytes.
    pub index_bytes: Vec<u8>,
}

impl Submesh {
    /// Create a submesh from raw parts.
    #[inline]
    #[must_use]
    pub const fn new(index_type: IndexType, index_count: usize, index_bytes: Vec<u8>) -> Self {
        Self {
            index_type,
            index_count,
            index_bytes,
        }
    }

    /// Create a submesh with 16-bit indices.
    #[must_use]
    pub fn from_u16(indices: &[u16]) -> Self {
        let bytes = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        Self::new(IndexType::U16, indices.len(), bytes)
    }

    /// Create a submesh with 32-bit indices.
    #[must_use]
    pub fn from_u32(indices: &[u32]) -> Self {
        let bytes = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        Self::new(IndexType::U32, indices.len(), bytes)
    }
}

impl SubmeshSource for Submesh {
    fn index_type(&self) -> IndexType {
        self.index_type
    }

    fn index_count(&self) -> usize {
        self.index_count
    }

    fn index_bytes(&self) -> &[u8] {
        &self.index_bytes
    }
}

/// A mesh: vertex buffers shared by an ordered list of submeshes.
///
/// Only the first vertex buffer carries positions. Additional buffers
/// (separate attribute streams) are kept but not read by exporters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mesh {
    /// Vertex buffers; positions are read from the first one.
    pub vertex_buffers: Vec<VertexBuffer>,
    /// Submeshes in material order.
    pub submeshes: Vec<Submesh>,
}

impl Mesh {
    /// Create an empty mesh with no vertex buffer and no submeshes.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertex_buffers: Vec::new(),
            submeshes: Vec::new(),
        }
    }

    /// Create a mesh from one vertex buffer and its submeshes.
    #[must_use]
    pub fn from_parts(vertex_buffer: VertexBuffer, submeshes: Vec<Submesh>) -> Self {
        Self {
            vertex_buffers: vec![vertex_buffer],
            submeshes,
        }
    }

    /// Whether the mesh has a vertex buffer to read positions from.
    #[inline]
    #[must_use]
    pub fn has_vertex_buffer(&self) -> bool {
        !self.vertex_buffers.is_empty()
    }
}

impl MeshSource for Mesh {
    fn vertex_buffer(&self) -> Option<&[u8]> {
        self.vertex_buffers.first().map(|b| b.bytes.as_slice())
    }

    fn vertex_stride(&self) -> usize {
        self.vertex_buffers.first().map_or(0, |b| b.stride)
    }

    fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    fn submesh_at(&self, index: usize) -> Option<&dyn SubmeshSource> {
        self.submeshes.get(index).map(|s| s as &dyn SubmeshSource)
    }
}

/// A loaded model: an ordered list of meshes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Asset {
    /// Meshes in asset order.
    pub meshes: Vec<Mesh>,
}

impl Asset {
    /// Create an empty asset.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { meshes: Vec::new() }
    }

    /// Create an asset from meshes.
    #[inline]
    #[must_use]
    pub const fn from_meshes(meshes: Vec<Mesh>) -> Self {
        Self { meshes }
    }

    /// Whether the asset has no meshes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl AssetSource for Asset {
    fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn mesh_at(&self, index: usize) -> Option<&dyn MeshSource> {
        self.meshes.get(index).map(|m| m as &dyn MeshSource)
    }
}

/// Builder that packs positions and indices into raw buffers.
///
/// Positions are written at the start of each `stride`-byte record; the
/// remainder of each record is zero-filled, standing in for attributes a
/// real loader would interleave (normals, texture coordinates).
///
/// # Example
///
/// ```
/// use scan_asset::{MeshBuilder, MeshSource};
///
/// let mesh = MeshBuilder::new(32)
///     .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
///     .submesh_u32(&[0, 1, 2])
///     .build();
///
/// assert_eq!(mesh.vertex_stride(), 32);
/// assert_eq!(mesh.vertex_buffer().map(<[u8]>::len), Some(96));
/// ```
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    stride: usize,
    positions: Vec<[f32; 3]>,
    submeshes: Vec<Submesh>,
}

impl MeshBuilder {
    /// Start a mesh with the given vertex stride.
    ///
    /// Strides smaller than a position (12 bytes) are raised to 12.
    #[must_use]
    pub fn new(stride: usize) -> Self {
        Self {
            stride: stride.max(POSITION_SIZE),
            positions: Vec::new(),
            submeshes: Vec::new(),
        }
    }

    /// Append vertex positions.
    #[must_use]
    pub fn positions(mut self, positions: &[[f32; 3]]) -> Self {
        self.positions.extend_from_slice(positions);
        self
    }

    /// Append a submesh with 16-bit indices.
    #[must_use]
    pub fn submesh_u16(mut self, indices: &[u16]) -> Self {
        self.submeshes.push(Submesh::from_u16(indices));
        self
    }

    /// Append a submesh with 32-bit indices.
    #[must_use]
    pub fn submesh_u32(mut self, indices: &[u32]) -> Self {
        self.submeshes.push(Submesh::from_u32(indices));
        self
    }

    /// Append an already-built submesh.
    #[must_use]
    pub fn submesh(mut self, submesh: Submesh) -> Self {
        self.submeshes.push(submesh);
        self
    }

    /// Pack the vertex buffer and produce the mesh.
    #[must_use]
    pub fn build(self) -> Mesh {
        let mut bytes = vec![0u8; self.positions.len() * self.stride];
        for (record, position) in bytes.chunks_exact_mut(self.stride).zip(&self.positions) {
            for (slot, value) in record.chunks_exact_mut(4).zip(position) {
                slot.copy_from_slice(&value.to_le_bytes());
            }
        }

        Mesh::from_parts(VertexBuffer::new(bytes, self.stride), self.submeshes)
    }
}
