//! Mesh asset contract for BumpScan exports.
//!
//! A reconstructed scan arrives from an asset loader as a list of meshes.
//! Each mesh carries raw vertex buffers (interleaved records with a known
//! stride) and one or more submeshes whose index buffers describe a
//! triangle list. This crate provides:
//!
//! - [`AssetSource`], [`MeshSource`], [`SubmeshSource`] - the capability
//!   traits any model parser can implement
//! - [`Asset`], [`Mesh`], [`Submesh`], [`VertexBuffer`] - owned in-memory
//!   implementations of those traits
//! - [`MeshBuilder`] - packs positions and indices into raw buffers
//! - [`read_position`], [`read_index`], [`triangle_indices`] - bounds-checked
//!   little-endian decoding of raw buffers
//!
//! # Layer 0 Crate
//!
//! This crate has no rendering or platform dependencies. Exporters depend on
//! the traits only, never on a specific parser.
//!
//! # Buffer Layout
//!
//! ```text
//! vertex buffer: [ x:f32 y:f32 z:f32 <other attributes> ] * vertex_count
//!                  ^ offset index * stride
//! index buffer:  [ u16 | u32 ] * index_count, little-endian
//! ```
//!
//! # Example
//!
//! ```
//! use scan_asset::{Asset, MeshBuilder, AssetSource};
//!
//! let mesh = MeshBuilder::new(12)
//!     .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
//!     .submesh_u16(&[0, 1, 2])
//!     .build();
//!
//! let asset = Asset::from_meshes(vec![mesh]);
//! assert_eq!(asset.mesh_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod buffer;
mod index;
mod mesh;
mod traits;

pub use buffer::{POSITION_SIZE, VertexBuffer, read_position};
pub use index::{IndexType, TriangleIndices, read_index, triangle_indices};
pub use mesh::{Asset, Mesh, MeshBuilder, Submesh};
pub use traits::{AssetSource, MeshSource, SubmeshSource};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
