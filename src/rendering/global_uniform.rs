use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::{camera::Camera, lights::LightRig, rendering::util::bind_group_builder::BindGroupBuilder};

/// Per-frame camera and light data. Must match `Globals` in scene.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GlobalUniformState {
    pub view_proj: Mat4,
    /// xyz: eye, w: seconds since start
    pub camera_position: Vec4,
    pub resolution: [f32; 2],
    _padding: [f32; 2],
    pub ambient: Vec4,
    pub key_direction: Vec4,
    pub key_radiance: Vec4,
    pub rim_direction: Vec4,
    pub rim_radiance: Vec4,
    /// xyz: position, w: range
    pub point_position: Vec4,
    pub point_radiance: Vec4,
}

impl GlobalUniformState {
    pub fn new(camera: &Camera, lights: &LightRig, resolution: PhysicalSize<u32>, now: f32) -> Self {
        Self {
            view_proj: camera.get_vp_matrix(),
            camera_position: camera.eye.extend(now),
            resolution: [resolution.width as f32, resolution.height as f32],
            _padding: [0.0; 2],
            ambient: lights.ambient.extend(1.0),
            key_direction: lights.key.direction.extend(0.0),
            key_radiance: lights.key.radiance().extend(0.0),
            rim_direction: lights.rim.direction.extend(0.0),
            rim_radiance: lights.rim.radiance().extend(0.0),
            point_position: lights.point.position.extend(lights.point.range),
            point_radiance: lights.point.radiance().extend(0.0),
        }
    }
}

pub struct GlobalUniform {
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl GlobalUniform {
    pub fn new(device: &wgpu::Device, initial_state: GlobalUniformState) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Global uniform buffer"),
            contents: bytemuck::cast_slice(&[initial_state]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let (bind_group_layout, bind_group) =
            BindGroupBuilder::new("Global uniform", wgpu::ShaderStages::VERTEX_FRAGMENT)
                .uniform(0, buffer.as_entire_binding())
                .build(device);

        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, state: GlobalUniformState) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[state]));
    }
}
