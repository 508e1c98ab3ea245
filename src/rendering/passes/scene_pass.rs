use wgpu::{
    DepthBiasState, MultisampleState, PipelineCompilationOptions, RenderPassDescriptor,
    ShaderSource, StencilState,
};

use crate::rendering::{
    object_uniforms::ObjectUniforms,
    render_common::{RenderCommon, CLEAR_COLOR},
    render_model::{RenderModel, RENDER_MODEL_VBL},
    texture::DepthTexture,
};

const SCENE_SHADER: &str = include_str!("../shaders/scene.wgsl");

pub struct SceneTextureViews<'a> {
    pub color: &'a wgpu::TextureView,
    pub depth: &'a wgpu::TextureView,
}

/// One model to draw with the bind group of the object that uses it.
pub struct SceneDraw<'a> {
    pub model: &'a RenderModel,
    pub object: &'a wgpu::BindGroup,
    pub wireframe: bool,
}

/// Clears the target to transparent and draws every object, solid materials
/// as lit triangles and wireframe materials as unlit lines.
pub struct ScenePass {
    solid_pipeline: wgpu::RenderPipeline,
    wireframe_pipeline: wgpu::RenderPipeline,
}

impl ScenePass {
    pub fn create(
        device: &wgpu::Device,
        common: &RenderCommon,
        object_uniforms: &ObjectUniforms,
    ) -> anyhow::Result<Self> {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene shader"),
            source: ShaderSource::Wgsl(SCENE_SHADER.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene pipeline layout"),
            bind_group_layouts: &[
                &common.global_uniform.bind_group_layout,
                object_uniforms.bind_group_layout(),
            ],
            push_constant_ranges: &[],
        });

        let format = common.surface_format();

        let create_pipeline = |label: &str, fragment_entry: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[RENDER_MODEL_VBL],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fragment_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthTexture::DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: StencilState::default(),
                    bias: DepthBiasState::default(),
                }),
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let solid_pipeline = create_pipeline(
            "Scene solid pipeline",
            "fs_main",
            wgpu::PrimitiveTopology::TriangleList,
        );
        let wireframe_pipeline = create_pipeline(
            "Scene wireframe pipeline",
            "fs_wireframe",
            wgpu::PrimitiveTopology::LineList,
        );

        Ok(ScenePass {
            solid_pipeline,
            wireframe_pipeline,
        })
    }

    pub fn render(
        &self,
        texture_views: &SceneTextureViews,
        encoder: &mut wgpu::CommandEncoder,
        globals: &wgpu::BindGroup,
        draws: &[SceneDraw],
    ) {
        let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: texture_views.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: texture_views.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_bind_group(0, globals, &[]);

        for draw in draws {
            let pipeline = if draw.wireframe {
                &self.wireframe_pipeline
            } else {
                &self.solid_pipeline
            };

            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(1, draw.object, &[]);

            for primitive in &draw.model.primitives {
                primitive.draw(&mut render_pass, draw.wireframe);
            }
        }
    }
}
