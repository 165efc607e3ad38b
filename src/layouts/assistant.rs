use glam::Vec3;

use super::common::{enclosure, plant, workstation};
use super::TemplateId;
use crate::types::{
    AgentMatcher, AgentSlotRule, DepartmentZone, Footprint, FurnitureKind, FurniturePlacement, OfficeTemplate,
    SlotOverflow,
};

const WIDTH: f32 = 12.0;
const DEPTH: f32 = 10.0;
const DESK: (f32, f32) = (0.0, -2.0);

pub fn template() -> OfficeTemplate {
    let mut furniture = enclosure(WIDTH, DEPTH);
    furniture.extend(workstation(DESK.0, DESK.1));
    furniture.extend([
        // Lounge corner
        FurniturePlacement::new(FurnitureKind::Sofa, -3.0, 2.0).sized(3.0, 0.6, 1.0),
        FurniturePlacement::new(FurnitureKind::Table, -3.0, 3.5).sized(1.5, 0.4, 0.8),
        FurniturePlacement::new(FurnitureKind::Shelf, 5.5, 0.0).sized(0.3, 2.5, 4.0),
        plant(4.0, -4.0),
        plant(-5.0, -4.0),
    ]);

    OfficeTemplate {
        id: TemplateId::Assistant,
        name: "Executive Office",
        description: "Compact single office for one executive",
        footprint: Footprint { width: WIDTH, depth: DEPTH },
        accent: 0x1976d2,
        furniture,
        zones: vec![DepartmentZone {
            department: "management",
            label: "EXECUTIVE",
            center: Vec3::new(DESK.0, 0.0, DESK.1),
            width: 6.0,
            depth: 5.0,
            color: 0x1976d2,
            sign: None,
        }],
        slot_rules: vec![AgentSlotRule {
            name: "manager-desk",
            matcher: AgentMatcher::department("management"),
            slots: vec![Vec3::new(DESK.0, 0.0, DESK.1)],
            overflow: SlotOverflow::Omit,
        }],
        kiosk_slots: None,
    }
}
