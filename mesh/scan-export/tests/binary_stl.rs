//! End-to-end tests of binary STL export.
//!
//! These tests exercise the exporter through its public API only, against
//! in-memory assets and against assets supplied by a foreign loader that
//! implements the asset traits over its own storage.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use approx::assert_relative_eq;
use scan_asset::{
    Asset, AssetSource, IndexType, Mesh, MeshBuilder, MeshSource, Point3, Submesh,
    SubmeshSource,
};
use scan_export::{
    ExportError, StlExportConfig, StlExporter, binary_stl_len, export_binary_stl,
    parse_binary_stl, write_obj,
};
use tempfile::tempdir;

fn triangle_count_field(bytes: &[u8]) -> u32 {
    u32::from_le_bytes(bytes[80..84].try_into().unwrap())
}

fn unit_triangle() -> Mesh {
    MeshBuilder::new(12)
        .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
        .submesh_u16(&[0, 1, 2])
        .build()
}

/// A quad strip: `quads` squares along X, two triangles each.
fn strip(quads: u32, stride: usize) -> Mesh {
    let mut positions = Vec::new();
    for i in 0..=quads {
        #[allow(clippy::cast_precision_loss)]
        let x = i as f32;
        positions.push([x, 0.0, 0.0]);
        positions.push([x, 1.0, 0.0]);
    }
    let mut indices = Vec::new();
    for i in 0..quads {
        let a = i * 2;
        indices.extend_from_slice(&[a, a + 2, a + 1, a + 1, a + 2, a + 3]);
    }
    MeshBuilder::new(stride)
        .positions(&positions)
        .submesh_u32(&indices)
        .build()
}

mod file_layout {
    use super::*;

    #[test]
    fn end_to_end_single_triangle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.stl");
        let asset = Asset::from_meshes(vec![unit_triangle()]);

        let written = export_binary_stl(&asset, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();

        assert_eq!(written, 1);
        assert_eq!(bytes.len(), 134);
        assert_eq!(triangle_count_field(&bytes), 1);

        let parsed = parse_binary_stl(&bytes).unwrap();
        let tri = &parsed.triangles[0];
        assert_relative_eq!(tri.normal.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(tri.normal.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(tri.normal.z, 1.0, epsilon = 1e-5);
        assert_eq!(tri.vertices[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(tri.vertices[1], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(tri.vertices[2], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(&bytes[132..], &[0, 0]);
    }

    #[test]
    fn header_starts_with_identification() {
        let bytes = StlExporter::default().encode(&Asset::new());
        let id = b"BumpScan 3D STL Export";

        assert_eq!(&bytes[..id.len()], id);
        assert!(bytes[id.len()..80].iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_triangle_export_is_84_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.stl");

        export_binary_stl(&Asset::new(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();

        assert_eq!(bytes.len(), 84);
        assert_eq!(triangle_count_field(&bytes), 0);
    }

    #[test]
    fn count_and_size_match_across_meshes() {
        let asset = Asset::from_meshes(vec![strip(10, 32), unit_triangle(), strip(3, 12)]);
        let bytes = StlExporter::default().encode(&asset);

        let expected = 20 + 1 + 6;
        assert_eq!(triangle_count_field(&bytes), expected);
        assert_eq!(bytes.len(), binary_stl_len(expected as usize));
    }

    #[test]
    fn custom_header() {
        let exporter = StlExporter::new(StlExportConfig::default().with_header("belly"));
        let parsed = parse_binary_stl(&exporter.encode(&Asset::new())).unwrap();
        assert_eq!(parsed.header_text(), "belly");
    }
}

mod skipping {
    use super::*;

    #[test]
    fn mesh_without_vertex_buffer_does_not_abort() {
        let mut bare = Mesh::new();
        bare.submeshes.push(Submesh::from_u16(&[0, 1, 2]));
        let asset = Asset::from_meshes(vec![bare, unit_triangle(), Mesh::new()]);

        let bytes = StlExporter::default().encode(&asset);
        assert_eq!(triangle_count_field(&bytes), 1);
    }

    #[test]
    fn u8_submesh_skipped_siblings_kept() {
        let mesh = MeshBuilder::new(12)
            .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
            .submesh_u16(&[0, 1, 2])
            .submesh(Submesh::new(IndexType::U8, 6, vec![0, 1, 2, 2, 1, 0]))
            .submesh_u32(&[2, 1, 0])
            .build();
        let asset = Asset::from_meshes(vec![mesh]);

        let parsed = parse_binary_stl(&StlExporter::default().encode(&asset)).unwrap();
        assert_eq!(parsed.triangles.len(), 2);
        assert_eq!(parsed.triangles[1].normal.z, -1.0);
    }

    #[test]
    fn seven_indices_make_two_triangles() {
        let mesh = MeshBuilder::new(12)
            .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]])
            .submesh_u16(&[0, 1, 2, 2, 1, 3, 0])
            .build();
        let asset = Asset::from_meshes(vec![mesh]);

        let bytes = StlExporter::default().encode(&asset);
        assert_eq!(triangle_count_field(&bytes), 2);
        assert_eq!(bytes.len(), 184);
    }
}

mod determinism {
    use super::*;

    #[test]
    fn repeated_exports_are_identical() {
        let dir = tempdir().unwrap();
        let asset = Asset::from_meshes(vec![strip(50, 24), unit_triangle()]);

        let a = dir.path().join("a.stl");
        let b = dir.path().join("b.stl");
        export_binary_stl(&asset, &a).unwrap();
        export_binary_stl(&asset, &b).unwrap();

        assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
    }

    #[test]
    fn stride_does_not_change_output() {
        let tight = StlExporter::default().encode(&Asset::from_meshes(vec![strip(4, 12)]));
        let padded = StlExporter::default().encode(&Asset::from_meshes(vec![strip(4, 48)]));
        assert_eq!(tight, padded);
    }
}

mod destination {
    use super::*;

    #[test]
    fn unwritable_destination_fails_with_io() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("model.stl");

        let result = export_binary_stl(&Asset::from_meshes(vec![unit_triangle()]), &path);
        assert!(matches!(result, Err(ExportError::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn failed_rename_leaves_destination_untouched() {
        let dir = tempdir().unwrap();

        // A directory at the destination makes the final rename fail.
        let blocked = dir.path().join("blocked.stl");
        std::fs::create_dir(&blocked).unwrap();
        std::fs::write(blocked.join("keep"), b"x").unwrap();
        assert!(export_binary_stl(&Asset::new(), &blocked).is_err());

        assert!(blocked.is_dir());
        assert!(blocked.join("keep").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}

/// An asset loader that stores geometry its own way and exposes it through
/// the asset traits without copying.
mod foreign_loader {
    use super::*;

    struct Node {
        is_mesh: bool,
        vertices: Option<Vec<u8>>,
        stride: usize,
        parts: Vec<Part>,
    }

    struct Part {
        indices: Vec<u8>,
    }

    struct Scene {
        nodes: Vec<Node>,
    }

    impl SubmeshSource for Part {
        fn index_type(&self) -> IndexType {
            IndexType::U32
        }

        fn index_count(&self) -> usize {
            self.indices.len() / 4
        }

        fn index_bytes(&self) -> &[u8] {
            &self.indices
        }
    }

    impl MeshSource for Node {
        fn vertex_buffer(&self) -> Option<&[u8]> {
            self.vertices.as_deref()
        }

        fn vertex_stride(&self) -> usize {
            self.stride
        }

        fn submesh_count(&self) -> usize {
            self.parts.len()
        }

        fn submesh_at(&self, index: usize) -> Option<&dyn SubmeshSource> {
            self.parts.get(index).map(|p| p as &dyn SubmeshSource)
        }
    }

    impl AssetSource for Scene {
        fn mesh_count(&self) -> usize {
            self.nodes.len()
        }

        fn mesh_at(&self, index: usize) -> Option<&dyn MeshSource> {
            self.nodes
                .get(index)
                .filter(|n| n.is_mesh)
                .map(|n| n as &dyn MeshSource)
        }
    }

    fn le_bytes_f32(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn le_bytes_u32(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn non_mesh_nodes_are_skipped() {
        let triangle = || Node {
            is_mesh: true,
            vertices: Some(le_bytes_f32(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])),
            stride: 12,
            parts: vec![Part {
                indices: le_bytes_u32(&[0, 1, 2]),
            }],
        };
        let camera = Node {
            is_mesh: false,
            vertices: None,
            stride: 0,
            parts: Vec::new(),
        };
        let scene = Scene {
            nodes: vec![triangle(), camera, triangle()],
        };

        let bytes = StlExporter::default().encode(&scene);
        assert_eq!(triangle_count_field(&bytes), 2);
    }

    #[test]
    fn obj_objects_named_by_scene_position() {
        let triangle = || Node {
            is_mesh: true,
            vertices: Some(le_bytes_f32(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])),
            stride: 12,
            parts: vec![Part {
                indices: le_bytes_u32(&[0, 1, 2]),
            }],
        };
        let camera = Node {
            is_mesh: false,
            vertices: None,
            stride: 0,
            parts: Vec::new(),
        };
        let scene = Scene {
            nodes: vec![triangle(), camera, triangle()],
        };

        let mut out = Vec::new();
        let count = write_obj(&scene, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(count, 2);
        assert!(text.contains("o mesh_0"));
        assert!(!text.contains("o mesh_1"));
        assert!(text.contains("o mesh_2"));
        assert!(text.contains("f 4 5 6"));
    }

    #[test]
    fn matches_owned_asset_output() {
        let node = Node {
            is_mesh: true,
            vertices: Some(le_bytes_f32(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])),
            stride: 12,
            parts: vec![Part {
                indices: le_bytes_u32(&[0, 1, 2]),
            }],
        };
        let scene = Scene { nodes: vec![node] };
        let owned = Asset::from_meshes(vec![
            MeshBuilder::new(12)
                .positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
                .submesh_u32(&[0, 1, 2])
                .build(),
        ]);

        let exporter = StlExporter::default();
        assert_eq!(exporter.encode(&scene), exporter.encode(&owned));
    }
}
