mod builder;
mod graph;
pub mod prefabs;

pub use builder::{assign_slots, build, SlotAssignment};
pub use graph::{DomainKind, DomainTag, Material, Mesh, NodeId, NodeKind, SceneGraph, SceneNode, Shape, Transform};
