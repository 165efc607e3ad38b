use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::scene::Shape;

pub const CYLINDER_SEGMENTS: u32 = 16;
pub const SPHERE_RINGS: u32 = 10;
pub const SPHERE_SEGMENTS: u32 = 16;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Indexed triangle list, counter-clockwise front faces
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(corners.iter().map(|&c| Vertex::new(c, normal)));
        self.indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

pub fn tessellate(shape: &Shape) -> MeshData {
    match *shape {
        Shape::Cuboid { size } => cuboid(size / 2.0),
        Shape::Cylinder { radius, height } => cylinder(radius, height / 2.0),
        Shape::Sphere { radius } => sphere(radius),
    }
}

fn cuboid(h: Vec3) -> MeshData {
    let mut mesh = MeshData::default();
    // (normal, tangent u, tangent v) with u x v = normal
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    for (n, u, v) in faces {
        let center = n * h;
        let du = u * h;
        let dv = v * h;
        mesh.push_quad(
            [center - du - dv, center + du - dv, center + du + dv, center - du + dv],
            n,
        );
    }
    mesh
}

fn cylinder(radius: f32, half_height: f32) -> MeshData {
    let mut mesh = MeshData::default();
    let ring = |i: u32| {
        let a = i as f32 / CYLINDER_SEGMENTS as f32 * TAU;
        Vec3::new(a.sin(), 0.0, a.cos())
    };

    for i in 0..CYLINDER_SEGMENTS {
        let (d0, d1) = (ring(i), ring(i + 1));
        let bottom0 = d0 * radius - Vec3::Y * half_height;
        let bottom1 = d1 * radius - Vec3::Y * half_height;
        let top0 = d0 * radius + Vec3::Y * half_height;
        let top1 = d1 * radius + Vec3::Y * half_height;

        let base = mesh.vertices.len() as u32;
        mesh.vertices.extend([
            Vertex::new(bottom0, d0),
            Vertex::new(bottom1, d1),
            Vertex::new(top1, d1),
            Vertex::new(top0, d0),
        ]);
        mesh.indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);

        for (y, normal) in [(half_height, Vec3::Y), (-half_height, Vec3::NEG_Y)] {
            let base = mesh.vertices.len() as u32;
            let center = Vec3::Y * y;
            let (a, b) = (d0 * radius + center, d1 * radius + center);
            mesh.vertices.extend([Vertex::new(center, normal), Vertex::new(a, normal), Vertex::new(b, normal)]);
            if y > 0.0 {
                mesh.indices.extend([base, base + 1, base + 2]);
            } else {
                mesh.indices.extend([base, base + 2, base + 1]);
            }
        }
    }
    mesh
}

fn sphere(radius: f32) -> MeshData {
    let mut mesh = MeshData::default();
    for ring in 0..=SPHERE_RINGS {
        let polar = ring as f32 / SPHERE_RINGS as f32 * PI;
        for seg in 0..=SPHERE_SEGMENTS {
            let azimuth = seg as f32 / SPHERE_SEGMENTS as f32 * TAU;
            let normal = Vec3::new(polar.sin() * azimuth.sin(), polar.cos(), polar.sin() * azimuth.cos());
            mesh.vertices.push(Vertex::new(normal * radius, normal));
        }
    }

    let stride = SPHERE_SEGMENTS + 1;
    for ring in 0..SPHERE_RINGS {
        for seg in 0..SPHERE_SEGMENTS {
            let a = ring * stride + seg;
            let b = a + stride;
            mesh.indices.extend([a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    mesh
}
