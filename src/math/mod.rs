mod aabb;
mod color;
mod ray;

pub use aabb::AABB;
pub use color::{desaturate, hex_to_rgb, hsv_to_rgb, label_hue};
pub use ray::{intersect_aabb, intersect_cylinder, intersect_sphere, Ray, RAY_EPSILON};
