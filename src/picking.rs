//! Resolves a pointer position to the domain entity under it.

use glam::Vec2;
use log::trace;

use crate::camera::OrbitCamera;
use crate::core::display_context::ViewportSize;
use crate::math::{intersect_aabb, intersect_cylinder, intersect_sphere, Ray};
use crate::scene::{DomainKind, DomainTag, NodeId, SceneGraph, Shape};

#[derive(Debug, Clone, PartialEq)]
pub struct PickResult {
    pub tag: DomainTag,
    /// World-space distance from the eye to the hit
    pub distance: f32,
    /// The tagged group node
    pub node: NodeId,
}

impl PickResult {
    pub fn kind(&self) -> DomainKind {
        self.tag.kind()
    }

    pub fn domain_id(&self) -> String {
        self.tag.domain_id()
    }
}

/// Nearest positive hit of a mesh-local ray against a primitive
pub fn intersect_shape(ray: &Ray, shape: &Shape) -> Option<f32> {
    match *shape {
        Shape::Cuboid { size } => intersect_aabb(ray, -size / 2.0, size / 2.0),
        Shape::Cylinder { radius, height } => intersect_cylinder(ray, radius, height / 2.0),
        Shape::Sphere { radius } => intersect_sphere(ray, glam::Vec3::ZERO, radius),
    }
}

fn kind_rank(kind: DomainKind) -> u8 {
    match kind {
        DomainKind::Agent => 0,
        DomainKind::Kiosk => 1,
    }
}

pub fn pick(pointer: Vec2, viewport: ViewportSize, camera: &OrbitCamera, scene: &SceneGraph) -> Option<PickResult> {
    if !pointer.is_finite() {
        return None;
    }
    let ndc = viewport.to_ndc(pointer)?;
    let ray = camera.ray_through(ndc, viewport.aspect());
    let hit = pick_ray(&ray, scene);
    trace!("pick at {pointer} -> {hit:?}");
    hit
}

/// Single pass over every mesh below a tagged group. Untagged geometry is
/// skipped entirely, so furniture never hides an avatar or kiosk. Nearest
/// hit wins; equal distances prefer agents, then the earlier node.
pub fn pick_ray(ray: &Ray, scene: &SceneGraph) -> Option<PickResult> {
    let mut best: Option<PickResult> = None;

    for (id, mesh) in scene.mesh_nodes() {
        let Some((group, tag)) = scene.tagged_ancestor(id) else {
            continue;
        };
        let local = ray.transformed(&scene.world_matrix(id).inverse());
        let Some(distance) = intersect_shape(&local, &mesh.shape) else {
            continue;
        };

        let closer = best.as_ref().map_or(true, |b| {
            distance
                .total_cmp(&b.distance)
                .then(kind_rank(tag.kind()).cmp(&kind_rank(b.kind())))
                .then(group.cmp(&b.node))
                .is_lt()
        });
        if closer {
            best = Some(PickResult {
                tag: tag.clone(),
                distance,
                node: group,
            });
        }
    }
    best
}
