use glam::{Mat4, Vec3};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given full extents centered on `center`
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Bounds of this box after an affine transform, taken over its corners
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        let first = matrix.transform_point3(corners[0]);
        corners[1..].iter().fold(AABB::new(first, first), |acc, &c| {
            let p = matrix.transform_point3(c);
            AABB::new(acc.min.min(p), acc.max.max(p))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_center_size() {
        let aabb = AABB::from_center_size(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_aabb_union_contained() {
        let aabb1 = AABB::new(Vec3::ZERO, Vec3::splat(5.0));
        let aabb2 = AABB::new(Vec3::ONE, Vec3::splat(2.0));
        let union = aabb1.union(&aabb2);
        assert_eq!(union, aabb1);
    }

    #[test]
    fn test_aabb_transformed_quarter_turn() {
        let aabb = AABB::new(Vec3::new(-2.0, 0.0, -1.0), Vec3::new(2.0, 1.0, 1.0));
        let turned = aabb.transformed(&Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2));
        assert!((turned.size().x - 2.0).abs() < 1e-5);
        assert!((turned.size().z - 4.0).abs() < 1e-5);
    }
}
