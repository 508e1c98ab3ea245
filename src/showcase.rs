use std::{rc::Rc, time::Duration, time::Instant};

use glam::Vec2;
use tokio::runtime::Handle;
use winit::dpi::PhysicalSize;

use crate::{
    asset_loader::AssetLoader, choreographer::ScrollChoreographer, config::ShowcaseConfig,
    scene_manager::SceneManager, viewport::Viewport, visual_slot::VisualSlot,
};

/// Everything the window drives once per frame: the 3D scene, the page
/// choreography and the virtual scroll position connecting them.
pub struct ShowcaseState {
    pub config: ShowcaseConfig,
    pub viewport: Viewport,
    pub scene: SceneManager,
    pub choreographer: ScrollChoreographer,
    pub start_time: Instant,
    visual: Rc<VisualSlot>,
    loader: Option<AssetLoader>,
    scroll: f32,
}

impl ShowcaseState {
    pub fn new(config: ShowcaseConfig, viewport: Viewport) -> Self {
        let visual = Rc::new(VisualSlot::new());
        let scene = SceneManager::new(&config, &viewport, visual.clone());
        let choreographer =
            ScrollChoreographer::new(config.choreography.clone(), &viewport, &visual);

        Self {
            config,
            viewport,
            scene,
            choreographer,
            start_time: Instant::now(),
            visual,
            loader: None,
            scroll: 0.0,
        }
    }

    pub fn start_loading(&mut self, runtime: &Handle) {
        let loader = AssetLoader::spawn(runtime, self.config.asset_path.clone());
        self.attach_loader(loader);
    }

    pub fn attach_loader(&mut self, loader: AssetLoader) {
        self.loader = Some(loader);
    }

    pub fn visual(&self) -> &VisualSlot {
        &self.visual
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_to(self.scroll + delta);
    }

    pub fn scroll_to(&mut self, offset: f32) {
        self.scroll = offset.clamp(0.0, self.choreographer.max_scroll());
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.viewport.resize(size, scale_factor);
        self.scene.resize(&self.viewport);
        self.choreographer.resize(&self.viewport);
        self.scroll_to(self.scroll);
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.choreographer.pointer_moved(position);
    }

    pub fn update(&mut self, dt: f32) {
        let elapsed = self.start_time.elapsed();
        self.update_at(elapsed, dt);
    }

    /// Advances one frame at `elapsed` since start.
    pub fn update_at(&mut self, elapsed: Duration, dt: f32) {
        if let Some(loader) = self.loader.as_mut() {
            while let Some(event) = loader.try_next() {
                self.scene.handle_load_event(event, elapsed);
            }
        }

        self.choreographer.update(self.scroll, dt);

        if let Some(tilt) = self.choreographer.visual_rotation_z() {
            self.scene.set_tilt(tilt);
        }

        self.scene.tick(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_is_clamped_to_document() {
        let viewport = Viewport::new(1200.0, 800.0, 1.0, 2.0);
        let mut state = ShowcaseState::new(ShowcaseConfig::default(), viewport);

        state.scroll_by(-100.0);
        assert_eq!(state.scroll(), 0.0);

        state.scroll_to(f32::MAX);
        assert_eq!(state.scroll(), state.choreographer.max_scroll());
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let viewport = Viewport::new(1200.0, 800.0, 1.0, 2.0);
        let mut state = ShowcaseState::new(ShowcaseConfig::default(), viewport);

        state.resize(PhysicalSize::new(0, 0), 1.0);
        assert_eq!(state.viewport, viewport);
    }
}
