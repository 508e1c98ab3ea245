use std::path::PathBuf;

use glam::Vec3;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            eye: Vec3::new(0.0, 0.0, 5.0),
        }
    }
}

/// Idle motion of the visual object. Values are visual taste, not derived.
#[derive(Debug, Clone)]
pub struct MotionConfig {
    /// Vertical float amplitude in world units.
    pub float_amplitude: f32,
    /// Float angular frequency in radians per millisecond.
    pub float_frequency: f32,
    /// Seconds per full turn around +Y for a loaded asset.
    pub spin_period_secs: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            float_amplitude: 0.1,
            float_frequency: 0.001,
            spin_period_secs: 20.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChoreographyConfig {
    /// Rotation around the depth axis reached at the end of the hero scroll.
    pub scroll_tilt: f32,
    pub hero_lateral_offset: f32,
    pub hero_rise_offset: f32,
    pub hero_scale: f32,
    /// Seconds the scrubbed playhead lags behind the scroll position.
    pub scrub_lag_secs: f32,
    /// Minimum logical width for the wide layout.
    pub breakpoint_width: f32,
    pub horizontal_scroll_length: f32,
    pub reveal_duration_secs: f32,
    pub reveal_offset: f32,
    /// Fraction of the viewport height a card top must cross to reveal.
    pub reveal_threshold: f32,
    pub card_count: usize,
}

impl Default for ChoreographyConfig {
    fn default() -> Self {
        Self {
            scroll_tilt: std::f32::consts::FRAC_PI_2,
            hero_lateral_offset: 300.0,
            hero_rise_offset: 100.0,
            hero_scale: 1.5,
            scrub_lag_secs: 1.0,
            breakpoint_width: 1024.0,
            horizontal_scroll_length: 3000.0,
            reveal_duration_secs: 0.8,
            reveal_offset: 50.0,
            reveal_threshold: 0.85,
            card_count: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShowcaseConfig {
    pub asset_path: PathBuf,
    pub pixel_ratio_cap: f64,
    pub camera: CameraConfig,
    pub motion: MotionConfig,
    pub choreography: ChoreographyConfig,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            asset_path: PathBuf::from("assets/model.glb"),
            pixel_ratio_cap: 2.0,
            camera: CameraConfig::default(),
            motion: MotionConfig::default(),
            choreography: ChoreographyConfig::default(),
        }
    }
}

impl ShowcaseConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = Self::default();

        if let Some(path) = &cli.asset {
            config.asset_path = path.clone();
        }
        if let Some(cap) = cli.pixel_ratio_cap {
            config.pixel_ratio_cap = cap.max(1.0);
        }
        if let Some(amplitude) = cli.float_amplitude {
            config.motion.float_amplitude = amplitude;
        }
        if let Some(frequency) = cli.float_frequency {
            config.motion.float_frequency = frequency;
        }
        if let Some(period) = cli.spin_period {
            config.motion.spin_period_secs = period;
        }
        if let Some(tilt) = cli.scroll_tilt {
            config.choreography.scroll_tilt = tilt;
        }
        if let Some(width) = cli.breakpoint {
            config.choreography.breakpoint_width = width;
        }
        if let Some(length) = cli.horizontal_scroll_length {
            config.choreography.horizontal_scroll_length = length;
        }
        if let Some(lag) = cli.scrub_lag {
            config.choreography.scrub_lag_secs = lag.max(0.0);
        }
        if let Some(cards) = cli.cards {
            config.choreography.card_count = cards;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn defaults_keep_landing_page_values() {
        let config = ShowcaseConfig::default();
        assert_eq!(config.motion.float_amplitude, 0.1);
        assert_eq!(config.motion.float_frequency, 0.001);
        assert_eq!(config.motion.spin_period_secs, 20.0);
        assert_eq!(config.pixel_ratio_cap, 2.0);
    }

    #[test]
    fn cli_overrides_only_given_fields() {
        let cli = Cli::parse_from(["vitrine", "--spin-period", "10", "--cards", "3"]);
        let config = ShowcaseConfig::from_cli(&cli);

        assert_eq!(config.motion.spin_period_secs, 10.0);
        assert_eq!(config.choreography.card_count, 3);
        assert_eq!(config.motion.float_amplitude, 0.1);
        assert_eq!(config.asset_path, PathBuf::from("assets/model.glb"));
    }

    #[test]
    fn pixel_ratio_cap_never_below_one() {
        let cli = Cli::parse_from(["vitrine", "--pixel-ratio-cap", "0.5"]);
        assert_eq!(ShowcaseConfig::from_cli(&cli).pixel_ratio_cap, 1.0);
    }
}
