use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    model::ModelId,
    rendering::{
        global_uniform::GlobalUniformState,
        imgui_renderer::OverlayRenderer,
        object_uniforms::{ObjectUniformState, ObjectUniforms},
        passes::scene_pass::{SceneDraw, ScenePass, SceneTextureViews},
        render_common::RenderCommon,
        render_model::RenderModel,
        texture::DepthTexture,
    },
    scene_manager::SceneManager,
    viewport::Viewport,
};

/// A frame whose scene has been recorded but not yet presented.
pub struct FrameInProgress {
    output: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,

    common: RenderCommon,
    depth_texture: DepthTexture,
    render_models: HashMap<ModelId, RenderModel>,
    object_uniforms: ObjectUniforms,

    scene_pass: ScenePass,
    overlay_renderer: OverlayRenderer,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        viewport: &Viewport,
        scene: &SceneManager,
        imgui: &mut imgui::Context,
    ) -> anyhow::Result<Renderer> {
        let size = viewport.render_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable graphics adapter")?;

        log::info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request device")?;

        let common = RenderCommon::new(
            &device,
            &adapter,
            &surface,
            size,
            GlobalUniformState::new(&scene.camera, &scene.lights, size, 0.0),
        )?;

        let depth_texture = DepthTexture::new(&device, size, "Depth Texture");
        let object_uniforms = ObjectUniforms::new(&device);
        let scene_pass = ScenePass::create(&device, &common, &object_uniforms)?;
        let overlay_renderer =
            OverlayRenderer::new(&device, &queue, common.surface_format(), imgui);

        Ok(Self {
            window,
            size,
            surface,
            device,
            queue,
            common,
            depth_texture,
            render_models: HashMap::new(),
            object_uniforms,
            scene_pass,
            overlay_renderer,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        let mut config = match self.common.output_surface_config.write() {
            Ok(config) => config,
            Err(poisoned) => poisoned.into_inner(),
        };

        self.size = new_size;
        config.width = new_size.width;
        config.height = new_size.height;
        self.depth_texture.resize(&self.device, new_size);
        self.surface.configure(&self.device, &config);
    }

    /// Uploads models the first time they are seen and refreshes the uniforms
    /// of every drawable object.
    fn sync_scene(&mut self, scene: &SceneManager) {
        for (object_id, object, model_id, world_matrix) in scene.scene.drawables() {
            if !self.render_models.contains_key(&model_id) {
                if let Some(model) = scene.scene.get_model(model_id) {
                    self.render_models
                        .insert(model_id, RenderModel::from_model(&self.device, model));
                }
            }

            self.object_uniforms.write(
                &self.device,
                &self.queue,
                object_id,
                ObjectUniformState::new(world_matrix, &object.material),
            );
        }
    }

    pub fn render(
        &mut self,
        scene: &SceneManager,
        now: f32,
    ) -> Result<FrameInProgress, wgpu::SurfaceError> {
        self.sync_scene(scene);

        self.common.global_uniform.update(
            &self.queue,
            GlobalUniformState::new(&scene.camera, &scene.lights, self.size, now),
        );

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let draws = scene
            .scene
            .drawables()
            .filter_map(|(object_id, object, model_id, _)| {
                Some(SceneDraw {
                    model: self.render_models.get(&model_id)?,
                    object: self.object_uniforms.bind_group(object_id)?,
                    wireframe: object.material.wireframe,
                })
            })
            .collect::<Vec<_>>();

        self.scene_pass.render(
            &SceneTextureViews {
                color: &view,
                depth: self.depth_texture.view(),
            },
            &mut encoder,
            &self.common.global_uniform.bind_group,
            &draws,
        );

        Ok(FrameInProgress {
            output,
            view,
            encoder,
        })
    }

    /// Draws the overlay over the recorded scene and presents the frame.
    pub fn finish_frame(&mut self, frame: FrameInProgress, imgui: &mut imgui::Context) {
        let FrameInProgress {
            output,
            view,
            mut encoder,
        } = frame;

        self.overlay_renderer
            .draw(imgui, &view, &mut encoder, &self.device, &self.queue);

        self.queue.submit([encoder.finish()]);
        self.window.pre_present_notify();
        output.present();
    }
}
