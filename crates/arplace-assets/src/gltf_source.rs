use crate::loader::{LoadError, LoadResult, ModelSource};
use crate::renderable::{Material, Mesh, Renderable, Vertex};
use anyhow::Context;
use glam::Mat4;
use gltf::buffer::Data;
use std::path::{Path, PathBuf};

/// Loads glTF / GLB files from a resource directory.
pub struct GltfSource {
    root: PathBuf,
}

impl GltfSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ModelSource for GltfSource {
    fn load_model(&self, file_name: &str) -> LoadResult {
        let path = self.root.join(file_name);
        let meshes = import_meshes(&path).map_err(|err| LoadError::Import {
            file: file_name.to_string(),
            reason: format!("{err:#}"),
        })?;

        if meshes.iter().all(|mesh| mesh.indices.is_empty()) {
            return Err(LoadError::Empty(file_name.to_string()));
        }

        let name = Path::new(file_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(file_name);
        Ok(Renderable::new(name, meshes))
    }
}

fn import_meshes(path: &Path) -> anyhow::Result<Vec<Mesh>> {
    let (document, buffers, _images) =
        gltf::import(path).with_context(|| format!("reading {}", path.display()))?;

    let mut meshes = Vec::new();
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                collect_node(&node, Mat4::IDENTITY, &buffers, &mut meshes)?;
            }
        }
        None => {
            for mesh in document.meshes() {
                collect_mesh(&mesh, Mat4::IDENTITY, &buffers, &mut meshes)?;
            }
        }
    }

    Ok(meshes)
}

fn collect_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[Data],
    out: &mut Vec<Mesh>,
) -> anyhow::Result<()> {
    let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        collect_mesh(&mesh, transform, buffers, out)?;
    }
    for child in node.children() {
        collect_node(&child, transform, buffers, out)?;
    }
    Ok(())
}

fn collect_mesh(
    mesh: &gltf::Mesh,
    transform: Mat4,
    buffers: &[Data],
    out: &mut Vec<Mesh>,
) -> anyhow::Result<()> {
    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::debug!(
                "skipping {:?} primitive in mesh {:?}",
                primitive.mode(),
                mesh.name()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .context("primitive has no POSITION attribute")?
            .collect();
        let normals: Vec<[f32; 3]> = reader
            .read_normals()
            .map(|n| n.collect())
            .unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()]);
        let uvs: Vec<[f32; 2]> = reader
            .read_tex_coords(0)
            .map(|uv| uv.into_f32().collect())
            .unwrap_or_else(|| vec![[0.0, 0.0]; positions.len()]);

        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex {
                position: *position,
                normal: normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uv: uvs.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect::<Vec<_>>();

        let indices = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..vertices.len() as u32).collect(),
        };

        let material = primitive.material();
        out.push(Mesh {
            vertices,
            indices,
            material: Material {
                name: material.name().map(str::to_string),
                base_color: material.pbr_metallic_roughness().base_color_factor(),
            },
            transform,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    // One triangle, indexed, under a node translated half a unit up.
    const TRIANGLE_GLTF: &str = r#"{
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [{ "nodes": [0] }],
  "nodes": [{ "mesh": 0, "translation": [0.0, 0.5, 0.0] }],
  "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
  "buffers": [{
    "byteLength": 44,
    "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
  }],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
  ],
  "accessors": [
    { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
    { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
  ]
}"#;

    #[test]
    fn loads_triangle_with_node_transform() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tri.gltf"), TRIANGLE_GLTF).unwrap();

        let model = GltfSource::new(dir.path()).load_model("tri.gltf").unwrap();

        assert_eq!(model.name, "tri");
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.meshes[0].indices, vec![0, 1, 2]);
        let bounds = model.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 1.5, 0.0));
    }

    #[test]
    fn missing_file_is_an_import_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GltfSource::new(dir.path())
            .load_model("ghost.glb")
            .unwrap_err();
        assert!(matches!(err, LoadError::Import { ref file, .. } if file == "ghost.glb"));
    }

    #[test]
    fn garbage_file_is_an_import_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("junk.glb"), b"definitely not a model").unwrap();
        let err = GltfSource::new(dir.path()).load_model("junk.glb").unwrap_err();
        assert!(matches!(err, LoadError::Import { .. }));
    }
}
