use anyhow::{bail, Context};
use glam::{Mat4, Quat, Vec3, Vec4};
use id_arena::Arena;
use std::collections::HashMap;

use crate::math::bounds::AABB;
use crate::model::{Buffers, Model, ModelId};
use crate::scene_graph::object3d::{Material, Object3D, ObjectId};
use crate::scene_graph::transform::Transform;

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub models: Arena<Model>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            models: Arena::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    pub fn add_child(&mut self, parent: ObjectId, object: Object3D) -> ObjectId {
        let object_id = self.add_object(object);
        self.set_object_parent(object_id, Some(parent));
        object_id
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut Object3D> {
        self.objects.get_mut(id)
    }

    pub fn add_model(&mut self, model: Model) -> ModelId {
        self.models.alloc(model)
    }

    pub fn get_model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id)
    }

    /// Builds the meshes of `document` and spawns the nodes of `scene` under
    /// a new root object. Nothing is added to the scene if any mesh fails to
    /// convert or if the scene references no mesh.
    pub fn spawn_gltf_scene(
        &mut self,
        document: &gltf::Document,
        buffers: Buffers,
        scene: &gltf::Scene,
        root_name: &str,
    ) -> anyhow::Result<ObjectId> {
        let mesh_count: usize = scene.nodes().map(|node| count_meshes(&node)).sum();
        if mesh_count == 0 {
            bail!("Scene {} references no meshes", scene.index());
        }

        let models = document
            .meshes()
            .map(|mesh| {
                let mesh_name = mesh
                    .name()
                    .map(String::from)
                    .unwrap_or_else(|| format!("Mesh {}", mesh.index()));
                Model::from_gltf(mesh_name.clone(), mesh, buffers)
                    .with_context(|| format!("Failed to build mesh {}", mesh_name))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let model_ids: HashMap<usize, ModelId> = models
            .into_iter()
            .enumerate()
            .map(|(index, model)| (index, self.add_model(model)))
            .collect();

        let root = self.add_object(Object3D::named(root_name));
        for node in scene.nodes() {
            self.spawn_gltf_node(&model_ids, &node, root);
        }

        Ok(root)
    }

    fn spawn_gltf_node(
        &mut self,
        model_ids: &HashMap<usize, ModelId>,
        node: &gltf::Node,
        parent: ObjectId,
    ) -> ObjectId {
        let node_name = node.name().unwrap_or("Unnamed").to_string();
        let mut object = Object3D::named(node_name);
        let (translation, rotation, scale) = node.transform().decomposed();

        object.transform.set_transform(
            translation.into(),
            Quat::from_array(rotation),
            scale.into(),
        );

        if let Some(mesh) = node.mesh() {
            if let Some(primitive) = mesh.primitives().next() {
                let base_color = primitive
                    .material()
                    .pbr_metallic_roughness()
                    .base_color_factor();
                object.material = Material::standard(Vec4::from_array(base_color));
            }

            object.model_id = model_ids.get(&mesh.index()).copied();
        }

        let object_id = self.add_child(parent, object);

        for child in node.children() {
            self.spawn_gltf_node(model_ids, &child, object_id);
        }

        object_id
    }

    /// Updates all object transforms in hierarchical order
    fn update_transforms(&self) {
        let root_objects = self
            .objects
            .iter()
            .filter(|(_, object)| object.parent_id.is_none())
            .map(|(id, _)| id);

        for root_id in root_objects {
            self.update_object_transform_recursive(root_id, Mat4::IDENTITY);
        }
    }

    fn update_object_transform_recursive(&self, object_id: ObjectId, parent_world_matrix: Mat4) {
        if let Some(object) = self.objects.get(object_id) {
            if object.transform.is_world_dirty() {
                let local_matrix = object.transform.local_matrix();
                object
                    .transform
                    .set_world_matrix(parent_world_matrix * local_matrix);
            }

            let world_matrix = object.transform.world_matrix();
            for &child_id in &object.child_ids {
                self.update_object_transform_recursive(child_id, world_matrix);
            }
        }
    }

    /// Invalidates world transforms for an object and all its descendants
    pub fn invalidate_object_hierarchy(&self, object_id: ObjectId) {
        if let Some(object) = self.objects.get(object_id) {
            object.transform.invalidate_world();

            for &child_id in &object.child_ids {
                self.invalidate_object_hierarchy(child_id);
            }
        }
    }

    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        if let Some(old_parent_id) = self.objects.get(child_id).and_then(|child| child.parent_id)
        {
            if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                old_parent.child_ids.retain(|&id| id != child_id);
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;
        }

        if let Some(new_parent) = new_parent_id.and_then(|id| self.objects.get_mut(id)) {
            new_parent.child_ids.push(child_id);
        }

        self.invalidate_object_hierarchy(child_id);
    }

    pub fn set_object_translation(&mut self, object_id: ObjectId, translation: Vec3) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_translation(translation);
        }
        self.invalidate_object_hierarchy(object_id);
    }

    pub fn set_object_rotation(&mut self, object_id: ObjectId, rotation: Quat) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_rotation(rotation);
        }
        self.invalidate_object_hierarchy(object_id);
    }

    pub fn get_object_transform(&self, object_id: ObjectId) -> Option<&Transform> {
        self.objects.get(object_id).map(|object| &object.transform)
    }

    /// World matrix computed from the local transforms up the parent chain,
    /// independent of the cached world matrices.
    pub fn compute_world_matrix(&self, object_id: ObjectId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = self.objects.get(object_id);

        while let Some(object) = current {
            matrix = object.transform.local_matrix() * matrix;
            current = object.parent_id.and_then(|id| self.objects.get(id));
        }

        matrix
    }

    /// World-space bounds of every mesh in the subtree rooted at `object_id`.
    pub fn world_bounds(&self, object_id: ObjectId) -> AABB {
        let parent_matrix = self
            .objects
            .get(object_id)
            .and_then(|object| object.parent_id)
            .map(|parent| self.compute_world_matrix(parent))
            .unwrap_or(Mat4::IDENTITY);

        self.subtree_bounds(object_id, parent_matrix)
    }

    fn subtree_bounds(&self, object_id: ObjectId, parent_world_matrix: Mat4) -> AABB {
        let Some(object) = self.objects.get(object_id) else {
            return AABB::empty();
        };

        let world_matrix = parent_world_matrix * object.transform.local_matrix();

        let own_bounds = object
            .model_id
            .and_then(|model_id| self.models.get(model_id))
            .map(|model| model.bounding_box().transformed(&world_matrix))
            .unwrap_or_else(AABB::empty);

        object
            .child_ids
            .iter()
            .fold(own_bounds, |bounds, &child_id| {
                bounds.union(&self.subtree_bounds(child_id, world_matrix))
            })
    }

    /// Objects that carry a model, with their cached world matrices.
    pub fn drawables(&self) -> impl Iterator<Item = (ObjectId, &Object3D, ModelId, Mat4)> + '_ {
        self.objects.iter().filter_map(|(id, object)| {
            object
                .model_id
                .map(|model_id| (id, object, model_id, object.transform.world_matrix()))
        })
    }

    pub fn late_update(&mut self) {
        self.update_transforms();
    }
}

fn count_meshes(node: &gltf::Node) -> usize {
    let own = usize::from(node.mesh().is_some());
    own + node.children().map(|child| count_meshes(&child)).sum::<usize>()
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
