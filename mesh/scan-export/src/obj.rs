//! Wavefront OBJ export.
//!
//! Writes the same geometry the STL exporter sees, but indexed: each mesh
//! becomes an `o` object whose referenced vertices are listed once, and each
//! submesh a `g` group of faces.
//!
//! ```text
//! # BumpScan 3D OBJ Export
//! o mesh_0
//! v x y z
//! ...
//! g submesh_0
//! f a b c
//! ...
//! ```
//!
//! Face indices are 1-based and global across the file. Normals and
//! texture coordinates are not written.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use nalgebra::Point3;
use scan_asset::{AssetSource, MeshSource, read_position, triangle_indices};
use tracing::{debug, info, warn};

use crate::atomic::write_atomic;
use crate::error::ExportResult;

/// Faces of one submesh, as indices into the mesh's emitted vertex list.
struct FaceGroup {
    submesh: usize,
    faces: Vec<[usize; 3]>,
}

/// Vertices referenced by a mesh, in first-use order, plus its face groups.
#[derive(Default)]
struct ObjMesh {
    positions: Vec<Point3<f32>>,
    groups: Vec<FaceGroup>,
}

impl ObjMesh {
    fn triangle_count(&self) -> usize {
        self.groups.iter().map(|g| g.faces.len()).sum()
    }
}

fn decode_mesh(mesh_index: usize, mesh: &dyn MeshSource, vertices: &[u8]) -> ObjMesh {
    let stride = mesh.vertex_stride();
    let mut out = ObjMesh::default();
    let mut remap: HashMap<u32, usize> = HashMap::new();

    for submesh_index in 0..mesh.submesh_count() {
        let Some(submesh) = mesh.submesh_at(submesh_index) else {
            continue;
        };
        if !submesh.index_type().is_supported() {
            debug!(
                mesh = mesh_index,
                submesh = submesh_index,
                "Skipping submesh with unsupported index type"
            );
            continue;
        }

        let mut faces = Vec::new();
        for group in triangle_indices(submesh) {
            let decoded = group.map(|index| read_position(vertices, index as usize, stride));
            let [Some(p0), Some(p1), Some(p2)] = decoded else {
                warn!(
                    mesh = mesh_index,
                    submesh = submesh_index,
                    indices = ?group,
                    "Skipping face with vertex index outside vertex buffer"
                );
                continue;
            };

            let mut face = [0usize; 3];
            for ((slot, index), position) in face.iter_mut().zip(group).zip([p0, p1, p2]) {
                *slot = *remap.entry(index).or_insert_with(|| {
                    out.positions.push(position);
                    out.positions.len() - 1
                });
            }
            faces.push(face);
        }

        out.groups.push(FaceGroup {
            submesh: submesh_index,
            faces,
        });
    }

    out
}

/// Export an asset as OBJ into a writer, returning the triangle count.
///
/// Skip rules match the STL exporter: meshes without a vertex buffer,
/// submeshes with unsupported index types and trailing partial index
/// groups contribute nothing.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_obj<W: Write>(asset: &dyn AssetSource, mut writer: W) -> ExportResult<usize> {
    writeln!(writer, "# BumpScan 3D OBJ Export")?;

    let mut base = 1usize;
    let mut triangles = 0usize;

    for mesh_index in 0..asset.mesh_count() {
        let Some(mesh) = asset.mesh_at(mesh_index) else {
            debug!(mesh = mesh_index, "Skipping entry that is not a mesh");
            continue;
        };
        let Some(vertices) = mesh.vertex_buffer() else {
            debug!(mesh = mesh_index, "Skipping mesh without vertex buffer");
            continue;
        };
        let decoded = decode_mesh(mesh_index, mesh, vertices);

        writeln!(writer, "o mesh_{mesh_index}")?;
        for p in &decoded.positions {
            writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
        }
        for group in &decoded.groups {
            writeln!(writer, "g submesh_{}", group.submesh)?;
            for [a, b, c] in &group.faces {
                writeln!(writer, "f {} {} {}", base + a, base + b, base + c)?;
            }
        }

        base += decoded.positions.len();
        triangles += decoded.triangle_count();
    }

    writer.flush()?;
    Ok(triangles)
}

/// Export an asset as OBJ to a file, returning the triangle count.
///
/// The file is written atomically.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn export_obj<P: AsRef<Path>>(asset: &dyn AssetSource, path: P) -> ExportResult<usize> {
    let path = path.as_ref();
    let mut data = Vec::new();
    let triangles = write_obj(asset, &mut data)?;

    info!(
        path = %path.display(),
        meshes = asset.mesh_count(),
        triangles,
        "Exporting OBJ"
    );
    write_atomic(path, &data)?;
    Ok(triangles)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scan_asset::{Asset, IndexType, Mesh, MeshBuilder, Submesh};

    fn render(asset: &Asset) -> (String, usize) {
        let mut out = Vec::new();
        let count = write_obj(asset, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), count)
    }

    #[test]
    fn single_triangle() {
        let mesh = MeshBuilder::new(12)
            .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.5, 0.0]])
            .submesh_u16(&[0, 1, 2])
            .build();
        let (text, count) = render(&Asset::from_meshes(vec![mesh]));

        assert_eq!(count, 1);
        assert_eq!(
            text,
            "# BumpScan 3D OBJ Export\n\
             o mesh_0\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 0 1.5 0\n\
             g submesh_0\n\
             f 1 2 3\n"
        );
    }

    #[test]
    fn shared_vertices_written_once() {
        let mesh = MeshBuilder::new(12)
            .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]])
            .submesh_u32(&[0, 1, 2, 2, 1, 3])
            .build();
        let (text, count) = render(&Asset::from_meshes(vec![mesh]));

        assert_eq!(count, 2);
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert!(text.contains("f 3 2 4"));
    }

    #[test]
    fn indices_are_global_across_meshes() {
        let mesh = || {
            MeshBuilder::new(12)
                .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
                .submesh_u16(&[0, 1, 2])
                .build()
        };
        let (text, count) = render(&Asset::from_meshes(vec![mesh(), Mesh::new(), mesh()]));

        assert_eq!(count, 2);
        assert!(text.contains("o mesh_2"));
        assert!(!text.contains("o mesh_1"));
        assert!(text.contains("f 4 5 6"));
    }

    #[test]
    fn skip_rules_match_stl() {
        let mesh = MeshBuilder::new(12)
            .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
            .submesh(Submesh::new(IndexType::U8, 3, vec![0, 1, 2]))
            .submesh_u16(&[0, 1, 2, 7, 8, 9, 0])
            .build();
        let (text, count) = render(&Asset::from_meshes(vec![mesh]));

        assert_eq!(count, 1);
        assert!(!text.contains("g submesh_0"));
        assert!(text.contains("g submesh_1"));
    }
}
