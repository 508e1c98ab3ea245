use imgui_wgpu::RendererConfig;

/// Composites the page overlay over the already rendered scene.
pub struct OverlayRenderer {
    renderer: imgui_wgpu::Renderer,
}

impl OverlayRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        imgui: &mut imgui::Context,
    ) -> Self {
        let config = RendererConfig {
            texture_format: surface_format,
            ..Default::default()
        };

        Self {
            renderer: imgui_wgpu::Renderer::new(imgui, device, queue, config),
        }
    }

    pub fn draw(
        &mut self,
        imgui: &mut imgui::Context,
        target: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) {
        let draw_data = imgui.render();

        // Workaround for memory safety related crash in imgui-rs
        // https://github.com/imgui-rs/imgui-rs/issues/325
        if draw_data.draw_lists_count() == 0 {
            return;
        }

        let attachment = wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            // The scene pass already cleared and filled the target
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay pass"),
            color_attachments: &[Some(attachment)],
            ..Default::default()
        });

        if let Err(error) = self.renderer.render(draw_data, queue, device, &mut pass) {
            log::error!("Failed to draw page overlay: {error:?}");
        }
    }
}
