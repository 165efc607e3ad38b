use std::f32::consts::PI;

use glam::Vec3;

use super::common::{enclosure, plant, workstation};
use super::TemplateId;
use crate::types::{
    AgentMatcher, AgentSlotRule, DepartmentZone, Footprint, FurnitureKind, FurniturePlacement, OfficeTemplate,
    SlotOverflow,
};

const WIDTH: f32 = 20.0;
const DEPTH: f32 = 16.0;
const SPECIALIST_Z: f32 = -5.0;
const SPECIALIST_X: [f32; 3] = [-8.0, 0.0, 8.0];

const GLASS: u32 = 0x87ceeb;

pub fn template() -> OfficeTemplate {
    let mut furniture = enclosure(WIDTH, DEPTH);

    // Glass-walled manager office in the middle of the floor
    furniture.extend([
        FurniturePlacement::new(FurnitureKind::Partition, -6.0, 0.0)
            .sized(0.1, 2.5, 6.0)
            .colored(GLASS)
            .translucent(0.3),
        FurniturePlacement::new(FurnitureKind::Partition, 6.0, 0.0)
            .sized(0.1, 2.5, 6.0)
            .colored(GLASS)
            .translucent(0.3),
        FurniturePlacement::new(FurnitureKind::Partition, 0.0, -3.0)
            .sized(12.0, 2.5, 0.1)
            .colored(GLASS)
            .translucent(0.3),
    ]);
    furniture.extend(workstation(0.0, 0.0));

    for x in SPECIALIST_X {
        furniture.extend(workstation(x, SPECIALIST_Z));
    }
    for x in [-4.0, 4.0] {
        furniture.push(FurniturePlacement::new(FurnitureKind::Partition, x, SPECIALIST_Z).sized(0.1, 1.5, 3.0));
    }

    // Collaboration table with four seats
    furniture.push(FurniturePlacement::new(FurnitureKind::Table, 0.0, 5.0).sized(3.0, 0.75, 1.5));
    for x in [-0.8, 0.8] {
        furniture.push(FurniturePlacement::new(FurnitureKind::Chair, x, 6.2));
        furniture.push(FurniturePlacement::new(FurnitureKind::Chair, x, 3.8).rotated(PI));
    }
    furniture.extend([plant(-9.0, 7.0), plant(9.0, 7.0)]);

    let specialist_slots = SPECIALIST_X.iter().map(|&x| Vec3::new(x, 0.0, SPECIALIST_Z)).collect();

    OfficeTemplate {
        id: TemplateId::AiTeam,
        name: "AI Team Office",
        description: "Manager office with a row of specialist desks",
        footprint: Footprint { width: WIDTH, depth: DEPTH },
        accent: 0x9c27b0,
        furniture,
        zones: vec![
            DepartmentZone {
                department: "management",
                label: "MANAGER",
                center: Vec3::ZERO,
                width: 12.0,
                depth: 6.0,
                color: 0x9c27b0,
                sign: None,
            },
            DepartmentZone {
                department: "support",
                label: "SPECIALISTS",
                center: Vec3::new(0.0, 0.0, SPECIALIST_Z),
                width: 19.6,
                depth: 3.6,
                color: 0x7e57c2,
                sign: Some(Vec3::new(0.0, 2.6, -7.6)),
            },
        ],
        slot_rules: vec![
            AgentSlotRule {
                name: "manager-desk",
                matcher: AgentMatcher::role("manager"),
                slots: vec![Vec3::ZERO],
                overflow: SlotOverflow::Wrap,
            },
            AgentSlotRule {
                name: "management-desk",
                matcher: AgentMatcher::department("management"),
                slots: vec![Vec3::ZERO],
                overflow: SlotOverflow::Wrap,
            },
            AgentSlotRule {
                name: "specialist-desks",
                matcher: AgentMatcher::department("support"),
                slots: specialist_slots,
                overflow: SlotOverflow::Wrap,
            },
        ],
        kiosk_slots: None,
    }
}
