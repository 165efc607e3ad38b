use std::f32::consts::PI;

use glam::Vec3;

use super::common::{enclosure, plant, workstation, WALL_HEIGHT, WALL_THICKNESS};
use super::TemplateId;
use crate::types::{
    AgentMatcher, AgentSlotRule, DepartmentZone, Footprint, FurnitureKind, FurniturePlacement, OfficeTemplate,
    SlotOverflow,
};

const WIDTH: f32 = 36.0;
const DEPTH: f32 = 24.0;

const RECEPTION_Z: f32 = 10.0;
const MANAGER_Z: f32 = -8.0;
const OPEN_ROWS: [f32; 2] = [-2.0, 2.0];
const OPEN_COLUMNS: [f32; 3] = [-3.0, 0.0, 3.0];
const KIOSK_Z: f32 = 10.5;
const KIOSK_X: [f32; 8] = [-16.0, -12.5, -9.0, -5.5, 5.5, 9.0, 12.5, 16.0];

struct Department {
    key: &'static str,
    label: &'static str,
    manager_rule: &'static str,
    desks_rule: &'static str,
    x: f32,
    color: u32,
}

const DEPARTMENTS: [Department; 3] = [
    Department {
        key: "buyer",
        label: "BUYERS",
        manager_rule: "buyer-manager-desk",
        desks_rule: "buyer-open-desks",
        x: -12.0,
        color: 0x2e7d32,
    },
    Department {
        key: "listing",
        label: "LISTINGS",
        manager_rule: "listing-manager-desk",
        desks_rule: "listing-open-desks",
        x: 0.0,
        color: 0xed6c02,
    },
    Department {
        key: "operations",
        label: "OPERATIONS",
        manager_rule: "operations-manager-desk",
        desks_rule: "operations-open-desks",
        x: 12.0,
        color: 0x9c27b0,
    },
];

pub fn template() -> OfficeTemplate {
    let mut furniture = enclosure(WIDTH, DEPTH);
    let mut zones = Vec::with_capacity(DEPARTMENTS.len());
    let mut slot_rules = vec![AgentSlotRule {
        name: "reception",
        matcher: AgentMatcher::agent_id("executive_assistant"),
        slots: vec![Vec3::new(0.0, 0.0, RECEPTION_Z - 1.5)],
        overflow: SlotOverflow::Omit,
    }];

    furniture.push(
        FurniturePlacement::new(FurnitureKind::Reception, 0.0, RECEPTION_Z)
            .sized(4.0, 0.8, 2.0)
            .colored(0x4a90e2),
    );
    furniture.push(FurniturePlacement::new(FurnitureKind::Chair, 0.0, RECEPTION_Z - 1.5).rotated(PI));

    for (i, dept) in DEPARTMENTS.iter().enumerate() {
        let x = dept.x;

        if i > 0 {
            furniture.push(
                FurniturePlacement::new(FurnitureKind::Wall, x - 6.0, -2.0).sized(WALL_THICKNESS, WALL_HEIGHT, 20.0),
            );
        }

        furniture.push(
            FurniturePlacement::new(FurnitureKind::GlassRoom, x, MANAGER_Z)
                .sized(5.0, 2.5, 5.0)
                .colored(dept.color)
                .translucent(0.25),
        );
        furniture.extend(workstation(x, MANAGER_Z));

        let mut open_desks = Vec::with_capacity(OPEN_ROWS.len() * OPEN_COLUMNS.len());
        for z in OPEN_ROWS {
            for dx in OPEN_COLUMNS {
                furniture.extend(workstation(x + dx, z));
                open_desks.push(Vec3::new(x + dx, 0.0, z));
            }
        }
        furniture.extend([plant(x - 5.0, 5.0), plant(x + 5.0, 5.0)]);

        zones.push(DepartmentZone {
            department: dept.key,
            label: dept.label,
            center: Vec3::new(x, 0.0, -2.0),
            width: 11.6,
            depth: 20.0,
            color: dept.color,
            sign: Some(Vec3::new(x, 2.5, 8.0)),
        });

        slot_rules.push(AgentSlotRule {
            name: dept.manager_rule,
            matcher: AgentMatcher::role("manager").in_department(dept.key),
            slots: vec![Vec3::new(x, 0.0, MANAGER_Z)],
            overflow: SlotOverflow::Wrap,
        });
        slot_rules.push(AgentSlotRule {
            name: dept.desks_rule,
            matcher: AgentMatcher::department(dept.key),
            slots: open_desks,
            overflow: SlotOverflow::Wrap,
        });
    }

    OfficeTemplate {
        id: TemplateId::Corporate,
        name: "Corporate Office",
        description: "Reception, three department floors and a partner kiosk row",
        footprint: Footprint { width: WIDTH, depth: DEPTH },
        accent: 0x2e7d32,
        furniture,
        zones,
        slot_rules,
        kiosk_slots: Some(KIOSK_X.iter().map(|&x| Vec3::new(x, 0.0, KIOSK_Z)).collect()),
    }
}
