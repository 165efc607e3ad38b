use crate::types::{FurnitureKind, FurniturePlacement};

pub const WALL_HEIGHT: f32 = 3.0;
pub const WALL_THICKNESS: f32 = 0.2;
pub const FLOOR_THICKNESS: f32 = 0.1;

/// Chair sits this far in front of its desk
pub const CHAIR_OFFSET: f32 = 1.5;

/// Floor plus back and side walls. The front stays open toward the default
/// camera.
pub fn enclosure(width: f32, depth: f32) -> Vec<FurniturePlacement> {
    vec![
        FurniturePlacement::new(FurnitureKind::Floor, 0.0, 0.0).sized(width, FLOOR_THICKNESS, depth),
        FurniturePlacement::new(FurnitureKind::Wall, 0.0, -depth / 2.0).sized(width, WALL_HEIGHT, WALL_THICKNESS),
        FurniturePlacement::new(FurnitureKind::Wall, -width / 2.0, 0.0).sized(WALL_THICKNESS, WALL_HEIGHT, depth),
        FurniturePlacement::new(FurnitureKind::Wall, width / 2.0, 0.0).sized(WALL_THICKNESS, WALL_HEIGHT, depth),
    ]
}

/// Desk with its chair pulled up on the +Z side
pub fn workstation(x: f32, z: f32) -> [FurniturePlacement; 2] {
    [
        FurniturePlacement::new(FurnitureKind::Desk, x, z),
        FurniturePlacement::new(FurnitureKind::Chair, x, z + CHAIR_OFFSET),
    ]
}

pub fn plant(x: f32, z: f32) -> FurniturePlacement {
    FurniturePlacement::new(FurnitureKind::Plant, x, z)
}
