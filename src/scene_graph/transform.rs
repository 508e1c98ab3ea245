use std::cell::Cell;

use glam::{Mat4, Quat, Vec3};

/// Translation, rotation and scale relative to the parent object, with the
/// local and world matrices cached until the next change.
#[derive(Debug, Clone)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,

    local_cache: Cell<Option<Mat4>>,
    world_matrix: Cell<Mat4>,
    world_dirty: Cell<bool>,
}

impl Transform {
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
            local_cache: Cell::new(None),
            world_matrix: Cell::new(Mat4::IDENTITY),
            world_dirty: Cell::new(true),
        }
    }

    pub fn local_matrix(&self) -> Mat4 {
        if let Some(matrix) = self.local_cache.get() {
            return matrix;
        }

        let matrix =
            Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation);
        self.local_cache.set(Some(matrix));
        matrix
    }

    /// World matrix as of the last hierarchy update.
    pub fn world_matrix(&self) -> Mat4 {
        self.world_matrix.get()
    }

    pub fn set_world_matrix(&self, world_matrix: Mat4) {
        self.world_matrix.set(world_matrix);
        self.world_dirty.set(false);
    }

    pub fn invalidate_world(&self) {
        self.world_dirty.set(true);
    }

    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty.get()
    }

    fn changed(&mut self) {
        self.local_cache.set(None);
        self.world_dirty.set(true);
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.changed();
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.changed();
    }

    pub fn set_transform(&mut self, translation: Vec3, rotation: Quat, scale: Vec3) {
        self.translation = translation;
        self.rotation = rotation;
        self.scale = scale;
        self.changed();
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
    }
}
