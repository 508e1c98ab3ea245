use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "vitrine")]
#[command(about = "Landing page showcase: 3D model viewer with scroll choreography", long_about = None)]
pub struct Cli {
    /// glTF or GLB file to display
    #[arg(long)]
    pub asset: Option<PathBuf>,

    /// Upper bound for the device pixel ratio used by the renderer
    #[arg(long)]
    pub pixel_ratio_cap: Option<f64>,

    /// Vertical float amplitude in world units
    #[arg(long)]
    pub float_amplitude: Option<f32>,

    /// Float angular frequency in radians per millisecond
    #[arg(long)]
    pub float_frequency: Option<f32>,

    /// Seconds per full spin of a loaded model
    #[arg(long)]
    pub spin_period: Option<f32>,

    /// Depth-axis rotation in radians reached at the end of the hero scroll
    #[arg(long)]
    pub scroll_tilt: Option<f32>,

    /// Minimum window width in logical pixels for the horizontal section
    #[arg(long)]
    pub breakpoint: Option<f32>,

    /// Scroll distance in logical pixels of the pinned horizontal section
    #[arg(long)]
    pub horizontal_scroll_length: Option<f32>,

    /// Seconds the scrubbed animations lag behind the scroll position
    #[arg(long)]
    pub scrub_lag: Option<f32>,

    /// Number of cards in the horizontal section
    #[arg(long)]
    pub cards: Option<usize>,
}
