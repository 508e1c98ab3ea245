use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(point1: Vec3, point2: Vec3) -> AABB {
        let min = point1.min(point2);
        let max = point1.max(point2);
        AABB { min, max }
    }

    /// Inverted box that any point or box extends into a valid one.
    pub fn empty() -> AABB {
        AABB {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> AABB {
        let mut bounds = AABB::empty();
        for point in points {
            bounds.extend(point);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn corners(&self) -> [Vec3; 8] {
        [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Axis-aligned box enclosing this box after `matrix` is applied.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        if self.is_empty() {
            return *self;
        }

        AABB::from_points(
            self.corners()
                .map(|corner| matrix.transform_point3(corner)),
        )
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    #[test]
    fn empty_box_absorbs_first_point() {
        let mut bounds = AABB::empty();
        assert!(bounds.is_empty());

        bounds.extend(Vec3::new(1.0, 2.0, 3.0));

        assert!(!bounds.is_empty());
        assert_eq!(bounds.min, bounds.max);
    }

    #[test]
    fn union_with_empty_is_identity() {
        let bounds = AABB::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(bounds.union(&AABB::empty()), bounds);
    }

    #[test]
    fn translated_box_moves_center() {
        let bounds = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let moved = bounds.transformed(&Mat4::from_translation(Vec3::new(3.0, 0.0, -2.0)));
        assert_eq!(moved.center(), Vec3::new(3.0, 0.0, -2.0));
        assert_eq!(moved.size(), Vec3::splat(2.0));
    }

    #[test]
    fn rotated_box_grows_to_enclose_corners() {
        let bounds = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let rotated = bounds.transformed(&Mat4::from_quat(Quat::from_rotation_y(
            std::f32::consts::FRAC_PI_4,
        )));
        let expected = 2.0f32.sqrt();
        assert!((rotated.max.x - expected).abs() < 1e-5);
        assert!((rotated.max.y - 1.0).abs() < 1e-5);
    }
}
