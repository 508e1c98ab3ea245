use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;

use crate::{
    rendering::util::bind_group_builder::BindGroupBuilder,
    scene_graph::{Material, ObjectId},
};

/// Must match `Object` in scene.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniformState {
    pub model_matrix: Mat4,
    pub normal_matrix: Mat4,
    pub color: Vec4,
    /// x: emissive strength
    pub emissive: Vec4,
}

impl ObjectUniformState {
    pub fn new(model_matrix: Mat4, material: &Material) -> Self {
        Self {
            model_matrix,
            normal_matrix: model_matrix.inverse().transpose(),
            color: material.color,
            emissive: Vec4::new(material.emissive, 0.0, 0.0, 0.0),
        }
    }
}

const LABEL: &str = "Object uniform";

struct ObjectBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// One small uniform buffer per drawn object, created the first time the
/// object is drawn.
pub struct ObjectUniforms {
    bind_group_layout: wgpu::BindGroupLayout,
    bindings: HashMap<ObjectId, ObjectBinding>,
}

impl ObjectUniforms {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupBuilder::new(LABEL, wgpu::ShaderStages::VERTEX_FRAGMENT)
            .uniform_layout(0)
            .build_layout(device);

        Self {
            bind_group_layout,
            bindings: HashMap::new(),
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        object_id: ObjectId,
        state: ObjectUniformState,
    ) {
        if let Some(binding) = self.bindings.get(&object_id) {
            queue.write_buffer(&binding.buffer, 0, bytemuck::cast_slice(&[state]));
            return;
        }

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object uniform buffer"),
            contents: bytemuck::cast_slice(&[state]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = BindGroupBuilder::new(LABEL, wgpu::ShaderStages::VERTEX_FRAGMENT)
            .uniform(0, buffer.as_entire_binding())
            .build_with_layout(device, &self.bind_group_layout);

        self.bindings
            .insert(object_id, ObjectBinding { buffer, bind_group });
    }

    pub fn bind_group(&self, object_id: ObjectId) -> Option<&wgpu::BindGroup> {
        self.bindings
            .get(&object_id)
            .map(|binding| &binding.bind_group)
    }
}
