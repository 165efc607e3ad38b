use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::layouts::TemplateId;

/// Floor extents of a template in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Footprint {
    pub width: f32,
    pub depth: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnitureKind {
    Desk,
    Chair,
    Plant,
    Partition,
    Wall,
    Kiosk,
    Floor,
    Table,
    Sofa,
    Shelf,
    Reception,
    GlassRoom,
    Sign,
}

/// Optional per-placement overrides
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlacementMetadata {
    /// Full extents of sized kinds
    pub size: Option<Vec3>,
    /// 0xRRGGBB
    pub color: Option<u32>,
    pub opacity: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FurniturePlacement {
    pub kind: FurnitureKind,
    /// Floor anchor of the piece; `y` lifts the whole piece
    pub position: Vec3,
    /// Yaw in radians
    pub rotation: f32,
    pub metadata: Option<PlacementMetadata>,
}

impl FurniturePlacement {
    pub fn new(kind: FurnitureKind, x: f32, z: f32) -> Self {
        Self {
            kind,
            position: Vec3::new(x, 0.0, z),
            rotation: 0.0,
            metadata: None,
        }
    }

    pub fn rotated(mut self, yaw: f32) -> Self {
        self.rotation = yaw;
        self
    }

    pub fn sized(mut self, width: f32, height: f32, depth: f32) -> Self {
        self.metadata.get_or_insert_with(PlacementMetadata::default).size =
            Some(Vec3::new(width, height, depth));
        self
    }

    pub fn colored(mut self, hex: u32) -> Self {
        self.metadata.get_or_insert_with(PlacementMetadata::default).color = Some(hex);
        self
    }

    pub fn translucent(mut self, opacity: f32) -> Self {
        self.metadata.get_or_insert_with(PlacementMetadata::default).opacity = Some(opacity);
        self
    }
}

/// Floor area owned by one department
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentZone {
    pub department: &'static str,
    pub label: &'static str,
    pub center: Vec3,
    pub width: f32,
    pub depth: f32,
    pub color: u32,
    /// Hanging sign above the zone entrance
    pub sign: Option<Vec3>,
}

/// Selects agents by any combination of role, department and id. Unset
/// fields match everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AgentMatcher {
    pub role: Option<&'static str>,
    pub department: Option<&'static str>,
    pub agent_id: Option<&'static str>,
}

impl AgentMatcher {
    pub fn any() -> Self {
        Self {
            role: None,
            department: None,
            agent_id: None,
        }
    }

    pub fn role(role: &'static str) -> Self {
        Self {
            role: Some(role),
            ..Self::any()
        }
    }

    pub fn department(department: &'static str) -> Self {
        Self {
            department: Some(department),
            ..Self::any()
        }
    }

    pub fn agent_id(agent_id: &'static str) -> Self {
        Self {
            agent_id: Some(agent_id),
            ..Self::any()
        }
    }

    pub fn in_department(mut self, department: &'static str) -> Self {
        self.department = Some(department);
        self
    }

    pub fn matches(&self, agent: &AgentRecord) -> bool {
        self.role.map_or(true, |r| agent.role == r)
            && self.department.map_or(true, |d| agent.department == d)
            && self.agent_id.map_or(true, |id| agent.id == id)
    }
}

/// What happens to matched agents once every slot of a rule is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlotOverflow {
    /// Reuse slots from the start (index modulo slot count)
    Wrap,
    /// Leave the extra agents out of the scene
    Omit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSlotRule {
    pub name: &'static str,
    pub matcher: AgentMatcher,
    pub slots: Vec<Vec3>,
    pub overflow: SlotOverflow,
}

impl AgentSlotRule {
    /// Slot for the `index`-th agent claimed by this rule
    pub fn slot_for(&self, index: usize) -> Option<Vec3> {
        if self.slots.is_empty() {
            return None;
        }
        match self.overflow {
            SlotOverflow::Wrap => Some(self.slots[index % self.slots.len()]),
            SlotOverflow::Omit => self.slots.get(index).copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfficeTemplate {
    pub id: TemplateId,
    pub name: &'static str,
    pub description: &'static str,
    pub footprint: Footprint,
    /// 0xRRGGBB used by overlays
    pub accent: u32,
    pub furniture: Vec<FurniturePlacement>,
    pub zones: Vec<DepartmentZone>,
    pub slot_rules: Vec<AgentSlotRule>,
    pub kiosk_slots: Option<Vec<Vec3>>,
}

impl OfficeTemplate {
    pub fn supports_kiosks(&self) -> bool {
        self.kiosk_slots.as_ref().is_some_and(|slots| !slots.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Working,
    #[default]
    Available,
    Offline,
    #[serde(other)]
    Unknown,
}

/// Agent as delivered by the roster service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
    pub id: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub role: String,
    /// 0xRRGGBB
    #[serde(default)]
    pub color_hint: Option<u32>,
    #[serde(default)]
    pub status: AgentStatus,
}

impl AgentRecord {
    pub fn new(id: impl Into<String>, department: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            department: department.into(),
            role: role.into(),
            color_hint: None,
            status: AgentStatus::default(),
        }
    }

    pub fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_color(mut self, hex: u32) -> Self {
        self.color_hint = Some(hex);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    Gavel,
    Assessment,
    Build,
    AccountBalance,
    #[default]
    Business,
    Home,
    PhotoCamera,
    LocalShipping,
    Engineering,
    Psychology,
}

impl IconKind {
    /// Kiosk screen tint for this partner category
    pub fn screen_color(&self) -> u32 {
        match self {
            Self::Gavel => 0x5d4037,
            Self::Assessment => 0x00897b,
            Self::Build => 0xf9a825,
            Self::AccountBalance => 0x2e7d32,
            Self::Business => 0x1565c0,
            Self::Home => 0xad1457,
            Self::PhotoCamera => 0x6a1b9a,
            Self::LocalShipping => 0xef6c00,
            Self::Engineering => 0x37474f,
            Self::Psychology => 0x7b1fa2,
        }
    }
}

/// Referral partner shown on a kiosk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub name: String,
    pub fee: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub icon_kind: IconKind,
}

impl Partner {
    pub fn new(name: impl Into<String>, fee: impl Into<String>, icon_kind: IconKind) -> Self {
        Self {
            name: name.into(),
            fee: fee.into(),
            category: None,
            icon_kind,
        }
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}
