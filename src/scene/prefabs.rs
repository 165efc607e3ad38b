//! Primitive compositions for each placeable thing. A prefab is a group node
//! with untagged mesh children; only avatars and kiosks tag their group.

use glam::Vec3;

use super::graph::{DomainTag, Material, NodeId, NodeKind, SceneGraph, SceneNode, Shape, Transform};
use crate::math::{desaturate, hex_to_rgb, hsv_to_rgb, label_hue};
use crate::types::{AgentRecord, AgentStatus, DepartmentZone, FurnitureKind, FurniturePlacement, Partner};

pub const DESK_COLOR: u32 = 0x8b4513;
pub const CHAIR_COLOR: u32 = 0x2b2b2b;
pub const COMPUTER_COLOR: u32 = 0x333333;
pub const POT_COLOR: u32 = 0x8b4513;
pub const PLANT_COLOR: u32 = 0x228b22;
pub const KIOSK_COLOR: u32 = 0x1976d2;
pub const SKIN_COLOR: u32 = 0xffdbca;

pub const AVATAR_BODY_RADIUS: f32 = 0.3;
pub const AVATAR_BODY_HEIGHT: f32 = 1.5;
pub const AVATAR_HEAD_RADIUS: f32 = 0.25;
pub const AVATAR_HEAD_Y: f32 = 1.75;

const ZONE_PANEL_THICKNESS: f32 = 0.02;
const ZONE_OPACITY: f32 = 0.35;

fn default_color(kind: FurnitureKind) -> u32 {
    match kind {
        FurnitureKind::Desk => DESK_COLOR,
        FurnitureKind::Chair => CHAIR_COLOR,
        FurnitureKind::Plant => PLANT_COLOR,
        FurnitureKind::Partition => 0xb0b0b0,
        FurnitureKind::Wall => 0xe0e0e0,
        FurnitureKind::Kiosk => KIOSK_COLOR,
        FurnitureKind::Floor => 0xcccccc,
        FurnitureKind::Table => 0x654321,
        FurnitureKind::Sofa => 0x4169e1,
        FurnitureKind::Shelf => 0xd2691e,
        FurnitureKind::Reception => 0x4a90e2,
        FurnitureKind::GlassRoom => 0x87ceeb,
        FurnitureKind::Sign => COMPUTER_COLOR,
    }
}

fn default_opacity(kind: FurnitureKind) -> f32 {
    match kind {
        FurnitureKind::Partition => 0.8,
        FurnitureKind::GlassRoom => 0.3,
        _ => 1.0,
    }
}

fn default_size(kind: FurnitureKind) -> Vec3 {
    match kind {
        FurnitureKind::Partition => Vec3::new(0.1, 1.5, 2.0),
        FurnitureKind::Wall => Vec3::new(4.0, 3.0, 0.2),
        FurnitureKind::Floor => Vec3::new(10.0, 0.1, 10.0),
        FurnitureKind::Table => Vec3::new(2.0, 0.75, 1.0),
        FurnitureKind::Sofa => Vec3::new(2.0, 0.6, 0.9),
        FurnitureKind::Shelf => Vec3::new(0.3, 2.0, 2.0),
        FurnitureKind::Reception => Vec3::new(3.0, 0.8, 1.5),
        FurnitureKind::GlassRoom => Vec3::new(4.0, 2.5, 4.0),
        FurnitureKind::Sign => Vec3::new(3.0, 0.5, 0.1),
        _ => Vec3::ONE,
    }
}

fn cuboid(size: Vec3) -> Shape {
    Shape::Cuboid { size }
}

pub fn furniture(graph: &mut SceneGraph, parent: NodeId, placement: &FurniturePlacement) -> NodeId {
    let kind = placement.kind;
    let metadata = placement.metadata.unwrap_or_default();
    let material = Material::solid(metadata.color.unwrap_or_else(|| default_color(kind)))
        .with_opacity(metadata.opacity.unwrap_or_else(|| default_opacity(kind)));
    let size = metadata.size.unwrap_or_else(|| default_size(kind));

    let group = graph.add_child(
        parent,
        SceneNode::group(
            NodeKind::Furniture(kind),
            Transform::at(placement.position).with_yaw(placement.rotation),
        ),
    );

    match kind {
        FurnitureKind::Desk => desk_parts(graph, group, material),
        FurnitureKind::Chair => chair_parts(graph, group, material),
        FurnitureKind::Plant => plant_parts(graph, group, material),
        FurnitureKind::Kiosk => kiosk_parts(graph, group, material, Material::solid(COMPUTER_COLOR)),
        FurnitureKind::Table => {
            let top = 0.1;
            graph.add_child(
                group,
                SceneNode::part(cuboid(Vec3::new(size.x, top, size.z)), material, Vec3::Y * (size.y - top / 2.0)),
            );
            let radius = size.x.min(size.z) * 0.15;
            graph.add_child(
                group,
                SceneNode::part(
                    Shape::Cylinder { radius, height: size.y - top },
                    material,
                    Vec3::Y * ((size.y - top) / 2.0),
                ),
            );
        }
        // Floor top sits flush with y = 0
        FurnitureKind::Floor => {
            graph.add_child(group, SceneNode::part(cuboid(size), material, Vec3::Y * (-size.y / 2.0)));
        }
        // Signs hang at their placement height
        FurnitureKind::Sign => {
            graph.add_child(group, SceneNode::part(cuboid(size), material, Vec3::ZERO));
        }
        FurnitureKind::Partition
        | FurnitureKind::Wall
        | FurnitureKind::Sofa
        | FurnitureKind::Shelf
        | FurnitureKind::Reception
        | FurnitureKind::GlassRoom => {
            graph.add_child(group, SceneNode::part(cuboid(size), material, Vec3::Y * (size.y / 2.0)));
        }
    }
    group
}

fn desk_parts(graph: &mut SceneGraph, group: NodeId, material: Material) {
    graph.add_child(group, SceneNode::part(cuboid(Vec3::new(2.0, 0.1, 1.0)), material, Vec3::new(0.0, 0.75, 0.0)));
    for (x, z) in [(-0.9, -0.4), (0.9, -0.4), (-0.9, 0.4), (0.9, 0.4)] {
        graph.add_child(
            group,
            SceneNode::part(cuboid(Vec3::new(0.1, 0.7, 0.1)), material, Vec3::new(x, 0.35, z)),
        );
    }
    graph.add_child(
        group,
        SceneNode::part(
            cuboid(Vec3::new(0.8, 0.5, 0.05)),
            Material::solid(COMPUTER_COLOR),
            Vec3::new(0.0, 1.1, -0.3),
        ),
    );
}

fn chair_parts(graph: &mut SceneGraph, group: NodeId, material: Material) {
    graph.add_child(group, SceneNode::part(cuboid(Vec3::new(0.6, 0.1, 0.6)), material, Vec3::new(0.0, 0.5, 0.0)));
    graph.add_child(group, SceneNode::part(cuboid(Vec3::new(0.6, 0.6, 0.1)), material, Vec3::new(0.0, 0.8, 0.25)));
    graph.add_child(
        group,
        SceneNode::part(Shape::Cylinder { radius: 0.05, height: 0.45 }, material, Vec3::new(0.0, 0.225, 0.0)),
    );
}

fn plant_parts(graph: &mut SceneGraph, group: NodeId, foliage: Material) {
    graph.add_child(
        group,
        SceneNode::part(Shape::Cylinder { radius: 0.3, height: 0.5 }, Material::solid(POT_COLOR), Vec3::Y * 0.25),
    );
    graph.add_child(group, SceneNode::part(Shape::Sphere { radius: 0.5 }, foliage, Vec3::Y * 0.9));
}

fn kiosk_parts(graph: &mut SceneGraph, group: NodeId, cabinet: Material, screen: Material) {
    graph.add_child(group, SceneNode::part(cuboid(Vec3::new(2.0, 2.0, 0.5)), cabinet, Vec3::Y));
    graph.add_child(group, SceneNode::part(cuboid(Vec3::new(1.5, 1.0, 0.1)), screen, Vec3::new(0.0, 1.3, 0.3)));
}

/// Tinted floor panel plus an optional hanging sign
pub fn zone(graph: &mut SceneGraph, parent: NodeId, zone: &DepartmentZone) -> NodeId {
    let group = graph.add_child(parent, SceneNode::group(NodeKind::Zone, Transform::at(zone.center)));
    let panel = Material::solid(zone.color).with_opacity(ZONE_OPACITY);
    graph.add_child(
        group,
        SceneNode::part(
            cuboid(Vec3::new(zone.width, ZONE_PANEL_THICKNESS, zone.depth)),
            panel,
            Vec3::Y * (ZONE_PANEL_THICKNESS / 2.0),
        ),
    );
    if let Some(sign) = zone.sign {
        let width = 0.4 * zone.label.len() as f32 + 0.8;
        graph.add_child(
            group,
            SceneNode::part(cuboid(Vec3::new(width, 0.5, 0.1)), Material::solid(zone.color), sign - zone.center),
        );
    }
    group
}

/// Body color for an agent: explicit hint, else a stable department hue,
/// then modulated by status.
pub fn avatar_material(agent: &AgentRecord) -> Material {
    let base = agent
        .color_hint
        .map(hex_to_rgb)
        .unwrap_or_else(|| hsv_to_rgb(label_hue(&agent.department), 0.6, 0.85));

    match agent.status {
        AgentStatus::Working => Material::from_rgb(base).with_emissive(base.map(|c| c * 0.35)),
        AgentStatus::Offline => Material::from_rgb(desaturate(base, 0.85)),
        AgentStatus::Available | AgentStatus::Unknown => Material::from_rgb(base),
    }
}

pub fn avatar(graph: &mut SceneGraph, parent: NodeId, agent: &AgentRecord, position: Vec3) -> NodeId {
    let group = graph.add_child(
        parent,
        SceneNode::group(NodeKind::Avatar, Transform::at(position)).tagged(DomainTag::Agent { id: agent.id.clone() }),
    );
    graph.add_child(
        group,
        SceneNode::part(
            Shape::Cylinder {
                radius: AVATAR_BODY_RADIUS,
                height: AVATAR_BODY_HEIGHT,
            },
            avatar_material(agent),
            Vec3::Y * (AVATAR_BODY_HEIGHT / 2.0),
        ),
    );
    graph.add_child(
        group,
        SceneNode::part(
            Shape::Sphere {
                radius: AVATAR_HEAD_RADIUS,
            },
            Material::solid(SKIN_COLOR),
            Vec3::Y * AVATAR_HEAD_Y,
        ),
    );
    group
}

pub fn kiosk(graph: &mut SceneGraph, parent: NodeId, index: usize, partner: &Partner, position: Vec3) -> NodeId {
    let group = graph.add_child(
        parent,
        SceneNode::group(NodeKind::Kiosk, Transform::at(position)).tagged(DomainTag::Kiosk { index }),
    );
    let screen = hex_to_rgb(partner.icon_kind.screen_color());
    kiosk_parts(
        graph,
        group,
        Material::solid(KIOSK_COLOR),
        Material::from_rgb(screen).with_emissive(screen.map(|c| c * 0.4)),
    );
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IconKind;

    #[test]
    fn test_avatar_is_tagged_group_with_two_parts() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let agent = AgentRecord::new("a1", "buyer", "agent");
        let id = avatar(&mut graph, root, &agent, Vec3::new(1.0, 0.0, 2.0));
        let node = graph.node(id).unwrap();
        assert_eq!(node.tag, Some(DomainTag::Agent { id: "a1".into() }));
        assert_eq!(node.children().len(), 2);
        for child in node.children() {
            assert!(graph.node(*child).unwrap().tag.is_none(), "parts must stay untagged");
        }
    }

    #[test]
    fn test_avatar_color_hint_wins() {
        let agent = AgentRecord::new("a1", "buyer", "agent").with_color(0xff0000);
        assert_eq!(avatar_material(&agent).color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_department_hue_is_deterministic() {
        let a = AgentRecord::new("a1", "listing", "agent");
        let b = AgentRecord::new("b2", "listing", "agent");
        assert_eq!(avatar_material(&a).color, avatar_material(&b).color);
    }

    #[test]
    fn test_status_modulation() {
        let base = AgentRecord::new("a1", "buyer", "agent").with_color(0x2e7d32);
        let working = avatar_material(&base.clone().with_status(AgentStatus::Working));
        assert!(working.emissive.iter().any(|c| *c > 0.0));

        let offline = avatar_material(&base.clone().with_status(AgentStatus::Offline));
        let spread = |c: [f32; 3]| c.iter().cloned().fold(f32::MIN, f32::max) - c.iter().cloned().fold(f32::MAX, f32::min);
        assert!(spread(offline.color) < spread(avatar_material(&base).color));
    }

    #[test]
    fn test_kiosk_screen_tint_follows_icon() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let partner = Partner::new("Movers", "10%", IconKind::LocalShipping);
        let id = kiosk(&mut graph, root, 3, &partner, Vec3::ZERO);
        let screen = graph.node(id).unwrap().children()[1];
        let material = graph.node(screen).unwrap().mesh.unwrap().material;
        assert_eq!(material.color, hex_to_rgb(IconKind::LocalShipping.screen_color()));
        assert_eq!(graph.node(id).unwrap().tag, Some(DomainTag::Kiosk { index: 3 }));
    }

    #[test]
    fn test_floor_top_is_flush() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let floor = FurniturePlacement::new(FurnitureKind::Floor, 0.0, 0.0).sized(4.0, 0.1, 4.0);
        let id = furniture(&mut graph, root, &floor);
        let part = graph.node(id).unwrap().children()[0];
        let bounds = graph
            .node(part)
            .unwrap()
            .mesh
            .unwrap()
            .shape
            .local_bounds()
            .transformed(&graph.world_matrix(part));
        assert!(bounds.max.y.abs() < 1e-6);
    }
}
