use std::{sync::Arc, time::Instant};

use anyhow::Context;
use glam::Vec2;
use imgui::{FontConfig, FontSource};
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, Event, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::{
    config::ShowcaseConfig, overlay, rendering::renderer::Renderer, showcase::ShowcaseState,
    viewport::Viewport,
};

/// Logical pixels scrolled per wheel line or arrow key press.
const LINE_HEIGHT: f32 = 48.0;
/// Fraction of the viewport height scrolled by Page Up/Down and Space.
const PAGE_FRACTION: f32 = 0.9;

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
}

/// Everything that only exists once the window is up.
struct Session {
    renderer: Renderer,
    imgui: ImguiState,
    showcase: ShowcaseState,
    last_frame: Instant,
}

struct App {
    config: ShowcaseConfig,
    runtime: tokio::runtime::Runtime,
    session: Option<Session>,
}

fn setup_imgui(window: &Window) -> ImguiState {
    let mut context = imgui::Context::create();
    let mut platform = WinitPlatform::new(&mut context);
    platform.attach_window(
        context.io_mut(),
        window,
        imgui_winit_support::HiDpiMode::Default,
    );

    let font_size = 18.0;
    context.fonts().add_font(&[FontSource::DefaultFontData {
        config: Some(FontConfig {
            oversample_h: 1,
            pixel_snap_h: true,
            size_pixels: font_size,
            ..Default::default()
        }),
    }]);

    // Disable INI support because it's broken in the published version of imgui
    context.set_ini_filename(None);

    ImguiState { context, platform }
}

impl App {
    fn new(config: ShowcaseConfig) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;

        Ok(Self {
            config,
            runtime,
            session: None,
        })
    }

    fn start_session(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<Session> {
        let window_attributes = Window::default_attributes()
            .with_title("vitrine")
            .with_inner_size(LogicalSize::new(1280.0, 800.0))
            .with_transparent(true);

        let window = event_loop
            .create_window(window_attributes)
            .context("Failed to create window")?;
        let window = Arc::new(window);

        let viewport = Viewport::from_physical(
            window.inner_size(),
            window.scale_factor(),
            self.config.pixel_ratio_cap,
        );

        let mut imgui = setup_imgui(&window);
        let mut showcase = ShowcaseState::new(self.config.clone(), viewport);

        let renderer = pollster::block_on(Renderer::new(
            window,
            &showcase.viewport,
            &showcase.scene,
            &mut imgui.context,
        ))?;

        showcase.start_loading(self.runtime.handle());

        Ok(Session {
            renderer,
            imgui,
            showcase,
            last_frame: Instant::now(),
        })
    }
}

impl Session {
    fn resize(&mut self) {
        let window = &self.renderer.window;
        self.showcase
            .resize(window.inner_size(), window.scale_factor());
        self.renderer.resize(self.showcase.viewport.render_size());
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }

        let page = self.showcase.viewport.height * PAGE_FRACTION;

        match &event.logical_key {
            Key::Named(NamedKey::ArrowDown) => self.showcase.scroll_by(LINE_HEIGHT),
            Key::Named(NamedKey::ArrowUp) => self.showcase.scroll_by(-LINE_HEIGHT),
            Key::Named(NamedKey::PageDown | NamedKey::Space) => self.showcase.scroll_by(page),
            Key::Named(NamedKey::PageUp) => self.showcase.scroll_by(-page),
            Key::Named(NamedKey::Home) => self.showcase.scroll_to(0.0),
            Key::Named(NamedKey::End) => self.showcase.scroll_to(f32::MAX),
            _ => {}
        }
    }

    fn handle_wheel(&mut self, delta: MouseScrollDelta) {
        let pixels = match delta {
            MouseScrollDelta::LineDelta(_, lines) => lines * LINE_HEIGHT,
            MouseScrollDelta::PixelDelta(position) => {
                (position.y / self.renderer.window.scale_factor()) as f32
            }
        };

        self.showcase.scroll_by(-pixels);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let delta_time = now - self.last_frame;
        self.last_frame = now;

        let imgui = &mut self.imgui;
        imgui.context.io_mut().update_delta_time(delta_time);

        let renderer = &mut self.renderer;
        renderer.window.request_redraw();

        if let Err(error) = imgui
            .platform
            .prepare_frame(imgui.context.io_mut(), &renderer.window)
        {
            log::error!("Failed to prepare Imgui frame: {error}");
            return;
        }

        // The surface is rendered at the capped pixel ratio, not the window's
        let pixel_ratio = self.showcase.viewport.pixel_ratio() as f32;
        imgui.context.io_mut().display_framebuffer_scale = [pixel_ratio, pixel_ratio];

        self.showcase.update(delta_time.as_secs_f32());

        let ui = imgui.context.new_frame();
        overlay::draw_page(
            ui,
            self.showcase.choreographer.layout(),
            self.showcase.choreographer.styles(),
            self.showcase.scroll(),
        );

        let now = self.showcase.start_time.elapsed().as_secs_f32();

        match renderer.render(&self.showcase.scene, now) {
            Ok(frame) => {
                renderer.finish_frame(frame, &mut imgui.context);
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.resize(renderer.size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory");
                event_loop.exit();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timeout");
            }
            Err(other) => {
                log::error!("Unexpected error: {:?}", other);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }

        match self.start_session(event_loop) {
            Ok(session) => self.session = Some(session),
            Err(error) => {
                log::error!("{error:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                session.resize();
            }
            WindowEvent::RedrawRequested => {
                session.redraw(event_loop);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                session.handle_wheel(*delta);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                session.handle_key(event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(session.renderer.window.scale_factor());
                session
                    .showcase
                    .pointer_moved(Vec2::new(logical.x, logical.y));
            }
            _ => (),
        }

        let imgui = &mut session.imgui;
        let window = session.renderer.window.as_ref();
        imgui.platform.handle_event::<()>(
            imgui.context.io_mut(),
            window,
            &Event::WindowEvent { window_id, event },
        );
    }
}

pub async fn run(config: ShowcaseConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
