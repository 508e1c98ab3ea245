use std::collections::BTreeSet;

use anyhow::{bail, Context};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use gltf::buffer;
use id_arena::Id;
use itertools::Itertools;

use crate::math::bounds::AABB;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

pub struct ModelPrimitive {
    pub index: usize,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub bounding_box: AABB,
}

impl ModelPrimitive {
    pub fn new(index: usize, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let bounding_box = AABB::from_points(vertices.iter().map(|vertex| vertex.position));

        Self {
            index,
            vertices,
            indices,
            bounding_box,
        }
    }

    /// Unique triangle edges as a line list, used for wireframe rendering.
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut edges = BTreeSet::new();

        for (a, b, c) in self.indices.iter().copied().tuples() {
            for (start, end) in [(a, b), (b, c), (c, a)] {
                edges.insert((start.min(end), start.max(end)));
            }
        }

        edges
            .into_iter()
            .flat_map(|(start, end)| [start, end])
            .collect()
    }
}

pub type ModelId = Id<Model>;

pub struct Model {
    pub name: String,
    pub primitives: Vec<ModelPrimitive>,
}

pub type Buffers<'a> = &'a [buffer::Data];

impl Model {
    pub fn from_gltf(
        name: impl Into<String>,
        mesh: gltf::Mesh,
        buffers: Buffers,
    ) -> anyhow::Result<Model> {
        let mut model = Model {
            name: name.into(),
            primitives: Vec::new(),
        };

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                bail!("Unsupported primitive mode: {:?}", primitive.mode());
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions = reader
                .read_positions()
                .with_context(|| format!("Primitive without positions in {}", model.name))?
                .map(Vec3::from)
                .collect::<Vec<_>>();

            let indices = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect::<Vec<u32>>(),
                None => (0..positions.len() as u32).collect(),
            };

            let normals = match reader.read_normals() {
                Some(normals) => normals.map(Vec3::from).collect::<Vec<_>>(),
                None => compute_vertex_normals(&positions, &indices),
            };

            let vertices = positions
                .into_iter()
                .zip(normals)
                .map(|(position, normal)| Vertex { position, normal })
                .collect::<Vec<Vertex>>();

            model
                .primitives
                .push(ModelPrimitive::new(primitive.index(), vertices, indices));
        }

        if model.primitives.is_empty() {
            bail!("Mesh without primitives: {}", model.name);
        }

        Ok(model)
    }

    /// Regular icosahedron with flat-shaded faces, circumradius `radius`.
    pub fn icosahedron(name: impl Into<String>, radius: f32) -> Model {
        let t = (1.0 + 5.0f32.sqrt()) / 2.0;

        let corners = [
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ]
        .map(|corner| corner.normalize() * radius);

        #[rustfmt::skip]
        let faces: [u32; 60] = [
            0, 11, 5,   0, 5, 1,    0, 1, 7,    0, 7, 10,   0, 10, 11,
            1, 5, 9,    5, 11, 4,   11, 10, 2,  10, 7, 6,   7, 1, 8,
            3, 9, 4,    3, 4, 2,    3, 2, 6,    3, 6, 8,    3, 8, 9,
            4, 9, 5,    2, 4, 11,   6, 2, 10,   8, 6, 7,    9, 8, 1,
        ];

        let normals = compute_vertex_normals(&corners, &faces);
        let vertices = corners
            .iter()
            .zip(normals)
            .map(|(&position, normal)| Vertex { position, normal })
            .collect();

        Model {
            name: name.into(),
            primitives: vec![ModelPrimitive::new(0, vertices, faces.to_vec())],
        }
    }

    pub fn bounding_box(&self) -> AABB {
        self.primitives
            .iter()
            .fold(AABB::empty(), |bounds, primitive| {
                bounds.union(&primitive.bounding_box)
            })
    }
}

/// Area-weighted vertex normals for an indexed triangle list.
fn compute_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for (a, b, c) in indices.iter().map(|&i| i as usize).tuples() {
        let (Some(&pa), Some(&pb), Some(&pc)) =
            (positions.get(a), positions.get(b), positions.get(c))
        else {
            continue;
        };

        let face_normal = (pb - pa).cross(pc - pa);
        normals[a] += face_normal;
        normals[b] += face_normal;
        normals[c] += face_normal;
    }

    normals
        .into_iter()
        .map(|normal| normal.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icosahedron_has_twelve_vertices_and_thirty_edges() {
        let model = Model::icosahedron("fallback", 1.0);
        let primitive = &model.primitives[0];

        assert_eq!(primitive.vertices.len(), 12);
        assert_eq!(primitive.indices.len(), 60);
        assert_eq!(primitive.edge_indices().len(), 60);
    }

    #[test]
    fn icosahedron_vertices_lie_on_sphere() {
        let model = Model::icosahedron("fallback", 2.5);
        for vertex in &model.primitives[0].vertices {
            assert!((vertex.position.length() - 2.5).abs() < 1e-5);
            assert!((vertex.normal.length() - 1.0).abs() < 1e-5);
            // Outward facing
            assert!(vertex.normal.dot(vertex.position) > 0.0);
        }
    }

    #[test]
    fn icosahedron_is_centered() {
        let bounds = Model::icosahedron("fallback", 1.0).bounding_box();
        assert!(bounds.center().length() < 1e-6);
    }

    #[test]
    fn shared_edges_are_deduplicated() {
        let vertices = (0..4)
            .map(|_| Vertex {
                position: Vec3::ZERO,
                normal: Vec3::Y,
            })
            .collect();
        // Two triangles sharing edge 1-2
        let primitive = ModelPrimitive::new(0, vertices, vec![0, 1, 2, 2, 1, 3]);
        assert_eq!(primitive.edge_indices().len(), 5 * 2);
    }

    #[test]
    fn computed_normals_face_the_winding_side() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let normals = compute_vertex_normals(&positions, &[0, 1, 2]);
        for normal in normals {
            assert!((normal - Vec3::Z).length() < 1e-6);
        }
    }
}
