//! Capability traits for mesh assets.
//!
//! These traits describe what an exporter needs from a loaded asset and
//! nothing more. A glTF, OBJ or USD reader can implement them directly
//! over its own buffers without copying into [`crate::Asset`].

use crate::IndexType;

/// An ordered collection of meshes.
pub trait AssetSource {
    /// Number of meshes in the asset.
    fn mesh_count(&self) -> usize;

    /// Get a mesh by position.
    ///
    /// Returns `None` if the index is out of bounds, or if the object at
    /// that position is not a mesh (cameras, lights).
    fn mesh_at(&self, index: usize) -> Option<&dyn MeshSource>;

    /// Iterate over all meshes in asset order.
    fn meshes(&self) -> Box<dyn Iterator<Item = &dyn MeshSource> + '_> {
        Box::new((0..self.mesh_count()).filter_map(move |i| self.mesh_at(i)))
    }
}

/// A mesh with a shared vertex buffer and one or more submeshes.
pub trait MeshSource {
    /// Raw bytes of the first vertex buffer, or `None` if the mesh has none.
    fn vertex_buffer(&self) -> Option<&[u8]>;

    /// Byte stride between vertex records in [`Self::vertex_buffer`].
    fn vertex_stride(&self) -> usize;

    /// Number of submeshes.
    fn submesh_count(&self) -> usize;

    /// Get a submesh by position.
    fn submesh_at(&self, index: usize) -> Option<&dyn SubmeshSource>;

    /// Iterate over all submeshes in order.
    fn submeshes(&self) -> Box<dyn Iterator<Item = &dyn SubmeshSource> + '_> {
        Box::new((0..self.submesh_count()).filter_map(move |i| self.submesh_at(i)))
    }
}

/// A triangle list indexing into its parent mesh's vertex buffer.
pub trait SubmeshSource {
    /// Element type of the index buffer.
    fn index_type(&self) -> IndexType;

    /// Declared number of indices.
    fn index_count(&self) -> usize;

    /// Raw little-endian index bytes.
    fn index_bytes(&self) -> &[u8];
}
