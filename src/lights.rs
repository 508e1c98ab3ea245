use glam::Vec3;

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Direction the light travels in, normalized.
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            direction: direction.normalize_or(Vec3::NEG_Z),
            color,
            intensity,
        }
    }

    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    /// Distance at which the contribution reaches zero.
    pub range: f32,
}

impl PointLight {
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

/// Fixed light setup of the viewer: a dim ambient term, a cool key light
/// from the upper right, a blue rim light from behind and a cyan point light
/// near the camera.
#[derive(Debug, Clone)]
pub struct LightRig {
    pub ambient: Vec3,
    pub key: DirectionalLight,
    pub rim: DirectionalLight,
    pub point: PointLight,
}

impl LightRig {
    pub fn showcase() -> Self {
        Self {
            ambient: Vec3::new(0.25, 0.27, 0.35),
            key: DirectionalLight::new(
                Vec3::new(-5.0, -5.0, -5.0),
                Vec3::new(0.85, 0.92, 1.0),
                1.0,
            ),
            rim: DirectionalLight::new(
                Vec3::new(5.0, -3.0, 5.0),
                Vec3::new(0.0, 0.4, 1.0),
                2.0,
            ),
            point: PointLight {
                position: Vec3::new(0.0, 2.0, 3.0),
                color: Vec3::new(0.0, 1.0, 1.0),
                intensity: 1.0,
                range: 10.0,
            },
        }
    }
}

impl Default for LightRig {
    fn default() -> Self {
        Self::showcase()
    }
}
