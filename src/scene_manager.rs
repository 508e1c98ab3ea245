use std::{f32::consts::TAU, rc::Rc, time::Duration};

use anyhow::Context;
use glam::{Quat, Vec3, Vec4};
use log::{debug, info, warn};

use crate::{
    asset_loader::{LoadEvent, LoadedAsset},
    camera::Camera,
    config::{MotionConfig, ShowcaseConfig},
    lights::LightRig,
    model::Model,
    scene_graph::{Material, Object3D, ObjectId, Scene},
    viewport::Viewport,
    visual_slot::VisualSlot,
};

const FALLBACK_RADIUS: f32 = 1.0;
const FALLBACK_COLOR: Vec4 = Vec4::new(0.0, 0.533, 1.0, 1.0);
const FALLBACK_EMISSIVE: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    Asset,
    Fallback,
}

#[derive(Debug, Clone, Copy)]
struct Spin {
    started_at: Duration,
    period_secs: f32,
}

impl Spin {
    fn angle(&self, elapsed: Duration) -> f32 {
        if self.period_secs <= 0.0 {
            return 0.0;
        }

        let running = elapsed.saturating_sub(self.started_at).as_secs_f32();
        (running / self.period_secs).fract() * TAU
    }
}

/// Owns the camera, lights and scene graph, and turns asset load events into
/// the single visual object the rest of the page animates.
pub struct SceneManager {
    pub camera: Camera,
    pub scene: Scene,
    pub lights: LightRig,
    motion: MotionConfig,
    visual: Rc<VisualSlot>,
    visual_kind: Option<VisualKind>,
    spin: Option<Spin>,
    tilt: f32,
}

impl SceneManager {
    pub fn new(config: &ShowcaseConfig, viewport: &Viewport, visual: Rc<VisualSlot>) -> Self {
        Self {
            camera: Camera::new(&config.camera, viewport.aspect()),
            scene: Scene::new(),
            lights: LightRig::showcase(),
            motion: config.motion.clone(),
            visual,
            visual_kind: None,
            spin: None,
            tilt: 0.0,
        }
    }

    pub fn visual(&self) -> Option<ObjectId> {
        self.visual.get()
    }

    pub fn visual_kind(&self) -> Option<VisualKind> {
        self.visual_kind
    }

    pub fn handle_load_event(&mut self, event: LoadEvent, elapsed: Duration) {
        match event {
            LoadEvent::Progress(fraction) => {
                debug!("Asset {:.0}% loaded", fraction * 100.0);
            }
            LoadEvent::Loaded(asset) if self.visual.is_resolved() => {
                warn!(
                    "Ignoring late asset {}, visual already resolved",
                    asset.path.display()
                );
            }
            LoadEvent::Failed(error) if self.visual.is_resolved() => {
                warn!("Ignoring late load failure: {error:#}");
            }
            LoadEvent::Loaded(asset) => match self.install_asset(&asset) {
                Ok(object_id) => {
                    info!("Loaded asset {}", asset.path.display());
                    self.resolve(object_id, VisualKind::Asset);
                    self.spin = Some(Spin {
                        started_at: elapsed,
                        period_secs: self.motion.spin_period_secs,
                    });
                }
                Err(error) => {
                    warn!("Failed to install asset {}: {error:#}", asset.path.display());
                    self.install_fallback();
                }
            },
            LoadEvent::Failed(error) => {
                warn!("Failed to load asset: {error:#}");
                self.install_fallback();
            }
        }
    }

    /// Spawns the default scene of the asset under a pivot at the origin,
    /// shifted so the centre of its world bounds sits on the pivot.
    fn install_asset(&mut self, asset: &LoadedAsset) -> anyhow::Result<ObjectId> {
        let document = &asset.document;
        let gltf_scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .context("Asset has no scenes")?;

        let asset_root =
            self.scene
                .spawn_gltf_scene(document, &asset.buffers, &gltf_scene, "asset")?;

        let pivot = self.scene.add_object(Object3D::named("visual"));
        self.scene.set_object_parent(asset_root, Some(pivot));
        center_on_parent(&mut self.scene, asset_root);

        Ok(pivot)
    }

    fn install_fallback(&mut self) {
        let model_id = self
            .scene
            .add_model(Model::icosahedron("fallback", FALLBACK_RADIUS));

        let mut object = Object3D::named("fallback");
        object.model_id = Some(model_id);
        object.material = Material::wireframe(FALLBACK_COLOR, FALLBACK_EMISSIVE);

        let object_id = self.scene.add_object(object);
        info!("Showing fallback shape");
        self.resolve(object_id, VisualKind::Fallback);
    }

    fn resolve(&mut self, object_id: ObjectId, kind: VisualKind) {
        match self.visual.resolve(object_id) {
            Ok(()) => self.visual_kind = Some(kind),
            Err(error) => warn!("{error:#}"),
        }
    }

    /// Rotation around the depth axis driven by the page scroll.
    pub fn set_tilt(&mut self, tilt: f32) {
        self.tilt = tilt;
    }

    pub fn tick(&mut self, elapsed: Duration) {
        if let Some(object_id) = self.visual.get() {
            let elapsed_ms = elapsed.as_secs_f32() * 1000.0;
            let float =
                (elapsed_ms * self.motion.float_frequency).sin() * self.motion.float_amplitude;
            let spin = self.spin.map(|spin| spin.angle(elapsed)).unwrap_or(0.0);

            self.scene
                .set_object_translation(object_id, Vec3::new(0.0, float, 0.0));
            self.scene.set_object_rotation(
                object_id,
                Quat::from_rotation_y(spin) * Quat::from_rotation_z(self.tilt),
            );
        }

        self.scene.late_update();
    }

    pub fn resize(&mut self, viewport: &Viewport) {
        if viewport.is_empty() {
            return;
        }

        self.camera.set_aspect(viewport.aspect());
    }
}

/// Translates `object_id` so the centre of its subtree's world bounds lands
/// on its parent's origin.
fn center_on_parent(scene: &mut Scene, object_id: ObjectId) {
    let bounds = scene.world_bounds(object_id);
    if bounds.is_empty() {
        return;
    }

    let parent_origin = scene
        .get_object(object_id)
        .and_then(|object| object.parent_id)
        .map(|parent| scene.compute_world_matrix(parent).transform_point3(Vec3::ZERO))
        .unwrap_or(Vec3::ZERO);

    let current = scene
        .get_object_transform(object_id)
        .map(|transform| transform.translation())
        .unwrap_or(Vec3::ZERO);

    scene.set_object_translation(object_id, current - (bounds.center() - parent_origin));
}
