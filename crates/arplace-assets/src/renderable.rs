use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    pub base_color: [f32; 4],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: None,
            base_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material: Material,
    /// Node transform from the model's root, baked at load time.
    pub transform: Mat4,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Axis-aligned bounds in model space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// A loaded model ready to be attached to an anchor.
///
/// `Clone` is a deep copy: every placement owns its own meshes and transform,
/// so editing one placed instance never shows up in another.
#[derive(Clone, Debug, PartialEq)]
pub struct Renderable {
    pub name: String,
    pub meshes: Vec<Mesh>,
    /// Local transform relative to the owning anchor.
    pub transform: Mat4,
}

impl Renderable {
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.into(),
            meshes,
            transform: Mat4::IDENTITY,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.meshes.iter().flat_map(|mesh| {
            mesh.vertices
                .iter()
                .map(move |v| mesh.transform.transform_point3(Vec3::from(v.position)))
        });

        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Bounds { min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh {
            vertices: vec![
                Vertex {
                    position: [0.0, 0.0, 0.0],
                    ..Default::default()
                },
                Vertex {
                    position: [1.0, 0.0, 0.0],
                    ..Default::default()
                },
                Vertex {
                    position: [0.0, 2.0, -1.0],
                    ..Default::default()
                },
            ],
            indices: vec![0, 1, 2],
            material: Material::default(),
            transform: Mat4::IDENTITY,
        }
    }

    #[test]
    fn bounds_cover_transformed_vertices() {
        let mut mesh = triangle();
        mesh.transform = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0));
        let model = Renderable::new("tri", vec![mesh]);

        let bounds = model.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(0.0, 1.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 3.0, 0.0));
        assert_eq!(model.triangle_count(), 1);
    }

    #[test]
    fn empty_model_has_no_bounds() {
        assert!(Renderable::new("empty", Vec::new()).bounds().is_none());
    }

    #[test]
    fn clones_do_not_share_state() {
        let original = Renderable::new("tri", vec![triangle()]);
        let mut copy = original.clone();

        copy.transform = Mat4::from_scale(Vec3::splat(2.0));
        copy.meshes[0].vertices[0].position = [9.0, 9.0, 9.0];

        assert_eq!(original.transform, Mat4::IDENTITY);
        assert_eq!(original.meshes[0].vertices[0].position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        let vertex = Vertex::default();
        let bytes: &[u8] = bytemuck::bytes_of(&vertex);
        assert_eq!(bytes.len(), 32);
    }
}
