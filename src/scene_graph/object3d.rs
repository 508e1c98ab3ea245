use glam::Vec4;
use id_arena::Id;

use crate::model::ModelId;
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Vec4,
    pub emissive: f32,
    pub wireframe: bool,
}

impl Material {
    pub fn standard(color: Vec4) -> Self {
        Self {
            color,
            emissive: 0.0,
            wireframe: false,
        }
    }

    pub fn wireframe(color: Vec4, emissive: f32) -> Self {
        Self {
            color,
            emissive,
            wireframe: true,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(Vec4::new(0.8, 0.82, 0.9, 1.0))
    }
}

pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub model_id: Option<ModelId>,
    pub material: Material,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
}

impl Object3D {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: Transform::default(),
            model_id: None,
            material: Material::default(),
            parent_id: None,
            child_ids: Vec::new(),
        }
    }
}
