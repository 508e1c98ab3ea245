use glam::Vec2;
use winit::dpi::PhysicalSize;

/// Window dimensions in logical pixels plus the display scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale_factor: f64,
    pixel_ratio_cap: f64,
}

impl Viewport {
    pub fn new(width: f32, height: f32, scale_factor: f64, pixel_ratio_cap: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
            pixel_ratio_cap,
        }
    }

    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64, pixel_ratio_cap: f64) -> Self {
        let logical = size.to_logical::<f32>(scale_factor);
        Self::new(logical.width, logical.height, scale_factor, pixel_ratio_cap)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.scale_factor.min(self.pixel_ratio_cap)
    }

    /// Size of the render target after clamping the pixel ratio.
    pub fn render_size(&self) -> PhysicalSize<u32> {
        let ratio = self.pixel_ratio();
        let width = (self.width as f64 * ratio).round().max(1.0) as u32;
        let height = (self.height as f64 * ratio).round().max(1.0) as u32;
        PhysicalSize::new(width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        let logical = size.to_logical::<f32>(scale_factor);
        self.width = logical.width;
        self.height = logical.height;
        self.scale_factor = scale_factor;
    }
}

/// Layout strategy selected by the live viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    Compact,
    Wide,
}

impl Breakpoint {
    pub fn for_width(width: f32, min_wide_width: f32) -> Self {
        if width >= min_wide_width {
            Breakpoint::Wide
        } else {
            Breakpoint::Compact
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped() {
        let viewport = Viewport::new(1000.0, 500.0, 3.0, 2.0);
        assert_eq!(viewport.pixel_ratio(), 2.0);
        assert_eq!(viewport.render_size(), PhysicalSize::new(2000, 1000));
    }

    #[test]
    fn pixel_ratio_below_cap_is_kept() {
        let viewport = Viewport::new(800.0, 600.0, 1.5, 2.0);
        assert_eq!(viewport.render_size(), PhysicalSize::new(1200, 900));
    }

    #[test]
    fn resize_converts_to_logical() {
        let mut viewport = Viewport::new(100.0, 100.0, 1.0, 2.0);
        viewport.resize(PhysicalSize::new(1920, 1080), 2.0);
        assert_eq!(viewport.size(), Vec2::new(960.0, 540.0));
        assert!((viewport.aspect() - 960.0 / 540.0).abs() < 1e-6);
    }

    #[test]
    fn breakpoint_boundary_is_inclusive() {
        assert_eq!(Breakpoint::for_width(1024.0, 1024.0), Breakpoint::Wide);
        assert_eq!(Breakpoint::for_width(1023.9, 1024.0), Breakpoint::Compact);
        assert_eq!(Breakpoint::for_width(1200.0, 1024.0), Breakpoint::Wide);
        assert_eq!(Breakpoint::for_width(800.0, 1024.0), Breakpoint::Compact);
    }
}
