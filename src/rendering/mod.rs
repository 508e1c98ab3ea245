pub mod global_uniform;
pub mod imgui_renderer;
pub mod object_uniforms;
pub mod passes;
pub mod render_common;
pub mod render_model;
pub mod renderer;
pub mod texture;
pub mod util;
