use glam::{Mat4, Vec3};

/// Hits closer than this are treated as self-intersections and ignored
pub const RAY_EPSILON: f32 = 1e-4;

/// Half-line used for picking
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Moves the ray into the space described by `inverse`.
    ///
    /// The direction is not renormalized, so a parameter `t` found in the
    /// transformed space addresses the same point as `t` on `self`.
    pub fn transformed(&self, inverse: &Mat4) -> Ray {
        Ray {
            origin: inverse.transform_point3(self.origin),
            direction: inverse.transform_vector3(self.direction),
        }
    }
}

/// Slab test against an axis-aligned box. Returns the exit distance when the
/// origin is inside the box.
pub fn intersect_aabb(ray: &Ray, box_min: Vec3, box_max: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-8;

    // Clamp near-zero components so the slab division stays finite
    let inv_dir = Vec3::new(
        if ray.direction.x.abs() < EPSILON { 1.0 / EPSILON.copysign(ray.direction.x) } else { 1.0 / ray.direction.x },
        if ray.direction.y.abs() < EPSILON { 1.0 / EPSILON.copysign(ray.direction.y) } else { 1.0 / ray.direction.y },
        if ray.direction.z.abs() < EPSILON { 1.0 / EPSILON.copysign(ray.direction.z) } else { 1.0 / ray.direction.z },
    );

    let t_min = (box_min - ray.origin) * inv_dir;
    let t_max = (box_max - ray.origin) * inv_dir;

    let t1 = t_min.min(t_max);
    let t2 = t_min.max(t_max);

    let t_near = t1.x.max(t1.y).max(t1.z);
    let t_far = t2.x.min(t2.y).min(t2.z);

    if t_near > t_far || t_far < 0.0 {
        return None;
    }

    if t_near < 0.0 {
        (t_far > RAY_EPSILON).then_some(t_far)
    } else {
        Some(t_near)
    }
}

/// Nearest positive hit against a sphere.
pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    if a <= f32::EPSILON {
        return None;
    }
    let half_b = oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;

    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t = (-half_b - sqrt_d) / a;
    if t > RAY_EPSILON {
        return Some(t);
    }
    let t = (-half_b + sqrt_d) / a;
    (t > RAY_EPSILON).then_some(t)
}

/// Nearest positive hit against a capped cylinder centered on the origin with
/// its axis along +Y.
pub fn intersect_cylinder(ray: &Ray, radius: f32, half_height: f32) -> Option<f32> {
    let o = ray.origin;
    let d = ray.direction;
    let r2 = radius * radius;
    let mut nearest: Option<f32> = None;
    let mut consider = |t: f32| {
        if t > RAY_EPSILON && nearest.map_or(true, |n| t < n) {
            nearest = Some(t);
        }
    };

    // Side wall
    let a = d.x * d.x + d.z * d.z;
    if a > f32::EPSILON {
        let b = 2.0 * (o.x * d.x + o.z * d.z);
        let c = o.x * o.x + o.z * o.z - r2;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant >= 0.0 {
            let sqrt_d = discriminant.sqrt();
            for t in [(-b - sqrt_d) / (2.0 * a), (-b + sqrt_d) / (2.0 * a)] {
                let y = o.y + t * d.y;
                if y.abs() <= half_height {
                    consider(t);
                }
            }
        }
    }

    // End caps
    if d.y.abs() > f32::EPSILON {
        for cap in [half_height, -half_height] {
            let t = (cap - o.y) / d.y;
            let x = o.x + t * d.x;
            let z = o.z + t * d.z;
            if x * x + z * z <= r2 {
                consider(t);
            }
        }
    }

    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_aabb_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let t = intersect_aabb(&ray, Vec3::new(5.0, -1.0, -1.0), Vec3::new(10.0, 1.0, 1.0));
        assert!((t.unwrap() - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_intersect_aabb_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let t = intersect_aabb(&ray, Vec3::new(5.0, 2.0, 2.0), Vec3::new(10.0, 3.0, 3.0));
        assert!(t.is_none());
    }

    #[test]
    fn test_intersect_aabb_inside() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::X);
        let t = intersect_aabb(&ray, Vec3::new(0.0, -1.0, -1.0), Vec3::new(10.0, 1.0, 1.0));
        assert!((t.unwrap() - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_intersect_sphere_front_face() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let t = intersect_sphere(&ray, Vec3::new(0.0, 0.0, -5.0), 1.0);
        assert!((t.unwrap() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_intersect_sphere_behind_origin() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(intersect_sphere(&ray, Vec3::new(0.0, 0.0, -5.0), 1.0).is_none());
    }

    #[test]
    fn test_intersect_cylinder_side() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        let t = intersect_cylinder(&ray, 0.5, 1.0);
        assert!((t.unwrap() - 4.5).abs() < 1e-4);
    }

    #[test]
    fn test_intersect_cylinder_cap_from_above() {
        let ray = Ray::new(Vec3::new(0.1, 10.0, 0.0), Vec3::NEG_Y);
        let t = intersect_cylinder(&ray, 0.5, 1.0);
        assert!((t.unwrap() - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_intersect_cylinder_passes_over_top() {
        let ray = Ray::new(Vec3::new(-5.0, 1.5, 0.0), Vec3::X);
        assert!(intersect_cylinder(&ray, 0.5, 1.0).is_none());
    }

    #[test]
    fn test_transformed_ray_keeps_parameter() {
        let world = Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let local = ray.transformed(&world.inverse());
        let t = intersect_sphere(&local, Vec3::ZERO, 1.0).unwrap();
        assert!((ray.at(t).z + 9.0).abs() < 1e-4);
    }
}
