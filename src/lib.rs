pub mod animation;
pub mod asset_loader;
pub mod camera;
pub mod choreographer;
pub mod cli;
pub mod config;
pub mod lights;
pub mod math;
pub mod model;
pub mod overlay;
pub mod page;
pub mod rendering;
pub mod scene_graph;
pub mod scene_manager;
pub mod showcase;
pub mod viewport;
pub mod visual_slot;
pub mod window;
