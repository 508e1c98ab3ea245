use std::{
    f32::consts::FRAC_PI_2,
    path::PathBuf,
    time::{Duration, Instant},
};

use glam::{Vec2, Vec3};
use vitrine::{
    asset_loader::{parse_gltf, AssetLoader, LoadEvent, LoadEventSender, LoadedAsset},
    choreographer::{MOUSE_X_VAR, MOUSE_Y_VAR},
    config::ShowcaseConfig,
    page,
    scene_manager::VisualKind,
    showcase::ShowcaseState,
    viewport::{Breakpoint, Viewport},
};
use winit::dpi::PhysicalSize;

const FRAME: f32 = 1.0 / 60.0;

/// One triangle spanning x 9..11, y 0..2, so its bounds are centred on
/// (10, 1, 0).
const OFF_CENTRE_TRIANGLE: &str = r#"{
    "asset": { "version": "2.0" },
    "scene": 0,
    "scenes": [{ "nodes": [0] }],
    "nodes": [{ "mesh": 0, "name": "Triangle" }],
    "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
    "accessors": [{
        "bufferView": 0,
        "componentType": 5126,
        "count": 3,
        "type": "VEC3",
        "min": [9.0, 0.0, 0.0],
        "max": [11.0, 2.0, 0.0]
    }],
    "bufferViews": [{ "buffer": 0, "byteLength": 36 }],
    "buffers": [{
        "byteLength": 36,
        "uri": "data:application/octet-stream;base64,AAAQQQAAAAAAAAAAAAAwQQAAAAAAAAAAAAAgQQAAAEAAAAAA"
    }]
}"#;

fn loaded_triangle() -> LoadedAsset {
    let (document, buffers) = parse_gltf(OFF_CENTRE_TRIANGLE.as_bytes(), None).unwrap();
    LoadedAsset {
        path: PathBuf::from("triangle.gltf"),
        document,
        buffers,
    }
}

fn showcase(width: f32, height: f32) -> (ShowcaseState, LoadEventSender) {
    let viewport = Viewport::new(width, height, 1.0, 2.0);
    let mut state = ShowcaseState::new(ShowcaseConfig::default(), viewport);
    let (sender, loader) = AssetLoader::channel();
    state.attach_loader(loader);
    (state, sender)
}

fn run_frames(state: &mut ShowcaseState, frames: usize) {
    for _ in 0..frames {
        state.update_at(Duration::ZERO, FRAME);
    }
}

#[test]
fn loaded_asset_is_centred_on_origin() {
    let (mut state, sender) = showcase(1200.0, 800.0);
    sender.send(LoadEvent::Progress(0.5)).unwrap();
    sender.send(LoadEvent::Loaded(loaded_triangle())).unwrap();

    state.update_at(Duration::ZERO, FRAME);

    let visual = state.visual().get().unwrap();
    assert_eq!(state.scene.visual_kind(), Some(VisualKind::Asset));

    let bounds = state.scene.scene.world_bounds(visual);
    assert!(!bounds.is_empty());
    assert!(bounds.center().length() < 1e-4, "centre {:?}", bounds.center());
}

/// Writes the triangle to a file unique to this test process.
fn triangle_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("vitrine-{}-{name}.gltf", std::process::id()));
    std::fs::write(&path, OFF_CENTRE_TRIANGLE).unwrap();
    path
}

fn next_event(loader: &mut AssetLoader) -> LoadEvent {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(event) = loader.try_next() {
            return event;
        }
        assert!(Instant::now() < deadline, "no load event within 5s");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn file_load_reports_progress_before_loaded() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let path = triangle_file("progress");
    let mut loader = AssetLoader::spawn(runtime.handle(), path.clone());

    let mut progress = Vec::new();
    let loaded = loop {
        match next_event(&mut loader) {
            LoadEvent::Progress(fraction) => progress.push(fraction),
            LoadEvent::Loaded(asset) => break asset,
            LoadEvent::Failed(error) => panic!("load failed: {error:#}"),
        }
    };

    assert!(!progress.is_empty());
    assert!(progress.iter().all(|&fraction| fraction > 0.0 && fraction <= 1.0));
    assert_eq!(progress.last(), Some(&1.0));
    assert_eq!(loaded.path, path);
    assert_eq!(loaded.document.meshes().count(), 1);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn started_load_resolves_visual_with_asset() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let path = triangle_file("showcase");

    let mut config = ShowcaseConfig::default();
    config.asset_path = path.clone();
    let mut state = ShowcaseState::new(config, Viewport::new(1200.0, 800.0, 1.0, 2.0));
    state.start_loading(runtime.handle());

    let deadline = Instant::now() + Duration::from_secs(5);
    while state.visual().get().is_none() {
        assert!(Instant::now() < deadline, "visual not resolved within 5s");
        std::thread::sleep(Duration::from_millis(5));
        state.update_at(Duration::ZERO, FRAME);
    }

    assert_eq!(state.scene.visual_kind(), Some(VisualKind::Asset));

    std::fs::remove_file(path).unwrap();
}

#[test]
fn slot_resolves_once_when_success_arrives_first() {
    let (mut state, sender) = showcase(1200.0, 800.0);
    sender.send(LoadEvent::Loaded(loaded_triangle())).unwrap();
    sender
        .send(LoadEvent::Failed(anyhow::anyhow!("late failure")))
        .unwrap();

    state.update_at(Duration::ZERO, FRAME);
    let first = state.visual().get();
    run_frames(&mut state, 3);

    assert!(first.is_some());
    assert_eq!(state.visual().get(), first);
    assert_eq!(state.scene.visual_kind(), Some(VisualKind::Asset));
}

#[test]
fn slot_resolves_once_when_failure_arrives_first() {
    let (mut state, sender) = showcase(1200.0, 800.0);
    state.update_at(Duration::ZERO, FRAME);
    assert!(state.visual().get().is_none());

    sender
        .send(LoadEvent::Failed(anyhow::anyhow!("connection reset")))
        .unwrap();
    sender.send(LoadEvent::Loaded(loaded_triangle())).unwrap();
    state.update_at(Duration::ZERO, FRAME);

    let visual = state.visual().get().unwrap();
    assert_eq!(state.scene.visual_kind(), Some(VisualKind::Fallback));

    let object = state.scene.scene.get_object(visual).unwrap();
    assert!(object.material.wireframe);
    assert_eq!(object.name, "fallback");
}

#[test]
fn scroll_rotation_attaches_on_resolution_frame() {
    let (mut state, sender) = showcase(1200.0, 800.0);
    run_frames(&mut state, 5);
    assert_eq!(state.choreographer.rotation_target(), None);

    sender
        .send(LoadEvent::Failed(anyhow::anyhow!("offline")))
        .unwrap();
    state.update_at(Duration::ZERO, FRAME);

    let visual = state.visual().get();
    assert!(visual.is_some());
    assert_eq!(state.choreographer.rotation_target(), visual);

    // Scroll to the end of the hero and let the scrub catch up
    state.scroll_to(800.0);
    run_frames(&mut state, 900);

    let transform = state
        .scene
        .scene
        .get_object_transform(visual.unwrap())
        .unwrap();
    let tilted = transform.rotation() * Vec3::X;
    assert!((tilted - Vec3::Y).length() < 1e-3, "tilted {tilted:?}");
    assert!((state.choreographer.visual_rotation_z().unwrap() - FRAC_PI_2).abs() < 1e-3);
    assert_eq!(state.choreographer.rotation_target(), visual);
}

#[test]
fn wide_window_pins_horizontal_section() {
    let (state, _sender) = showcase(1200.0, 800.0);

    assert_eq!(state.choreographer.breakpoint(), Breakpoint::Wide);
    let range = state.choreographer.horizontal_range().unwrap();
    assert_eq!(range.length(), 3000.0);
    assert_eq!(state.choreographer.reveal_count(), 0);
}

#[test]
fn compact_window_reveals_cards() {
    let (mut state, _sender) = showcase(800.0, 800.0);

    assert_eq!(state.choreographer.breakpoint(), Breakpoint::Compact);
    assert!(state.choreographer.horizontal_range().is_none());
    assert_eq!(state.choreographer.reveal_count(), 5);

    let first = page::card(0);
    assert_eq!(state.choreographer.styles().style(&first).opacity, 0.0);

    let card_top = state.choreographer.layout().element(&first).unwrap().rect.min.y;
    state.scroll_to(card_top);
    run_frames(&mut state, 120);

    let style = state.choreographer.styles().style(&first);
    assert_eq!(style.opacity, 1.0);
    assert_eq!(style.translate.y, 0.0);
}

#[test]
fn pointer_over_card_publishes_local_position() {
    let (mut state, _sender) = showcase(800.0, 800.0);
    let first = page::card(0);

    let card_top = state.choreographer.layout().element(&first).unwrap().rect.min.y;
    state.scroll_to(card_top);
    run_frames(&mut state, 120);

    let rect = state
        .choreographer
        .layout()
        .screen_rect(&first, state.scroll(), state.choreographer.styles())
        .unwrap();
    state.pointer_moved(rect.min + Vec2::new(50.0, 30.0));

    let styles = state.choreographer.styles();
    assert_eq!(styles.var(&first, MOUSE_X_VAR), Some("50px"));
    assert_eq!(styles.var(&first, MOUSE_Y_VAR), Some("30px"));
}

#[test]
fn resize_updates_aspect_and_render_size() {
    let (mut state, _sender) = showcase(1200.0, 800.0);

    state.resize(PhysicalSize::new(1600, 1000), 2.5);

    assert_eq!(state.viewport.width, 640.0);
    assert_eq!(state.viewport.height, 400.0);
    assert!((state.scene.camera.aspect() - 1.6).abs() < 1e-6);
    assert_eq!(state.viewport.pixel_ratio(), 2.0);
    assert_eq!(state.viewport.render_size(), PhysicalSize::new(1280, 800));
    assert_eq!(state.choreographer.breakpoint(), Breakpoint::Compact);
}
