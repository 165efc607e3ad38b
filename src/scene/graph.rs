use glam::{Mat4, Quat, Vec3};

use crate::math::{hex_to_rgb, AABB};
use crate::types::FurnitureKind;

/// Index of a node inside its [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Furniture(FurnitureKind),
    Zone,
    Avatar,
    Kiosk,
    /// Mesh-carrying child of a group
    Part,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    Agent,
    Kiosk,
}

/// Links a pickable group back to the entity it represents
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainTag {
    Agent { id: String },
    Kiosk { index: usize },
}

impl DomainTag {
    pub fn kind(&self) -> DomainKind {
        match self {
            Self::Agent { .. } => DomainKind::Agent,
            Self::Kiosk { .. } => DomainKind::Kiosk,
        }
    }

    /// Agent id, or the kiosk index rendered as a string
    pub fn domain_id(&self) -> String {
        match self {
            Self::Agent { id } => id.clone(),
            Self::Kiosk { index } => index.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.rotation = Quat::from_rotation_y(yaw);
        self
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }
}

/// Primitive geometry, centered on the mesh-local origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Cuboid { size: Vec3 },
    /// Axis along local +Y
    Cylinder { radius: f32, height: f32 },
    Sphere { radius: f32 },
}

impl Shape {
    pub fn local_bounds(&self) -> AABB {
        match *self {
            Shape::Cuboid { size } => AABB::from_center_size(Vec3::ZERO, size),
            Shape::Cylinder { radius, height } => {
                AABB::from_center_size(Vec3::ZERO, Vec3::new(radius * 2.0, height, radius * 2.0))
            }
            Shape::Sphere { radius } => AABB::from_center_size(Vec3::ZERO, Vec3::splat(radius * 2.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub emissive: [f32; 3],
    pub opacity: f32,
}

impl Material {
    pub fn solid(hex: u32) -> Self {
        Self::from_rgb(hex_to_rgb(hex))
    }

    pub fn from_rgb(color: [f32; 3]) -> Self {
        Self {
            color,
            emissive: [0.0; 3],
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_emissive(mut self, emissive: [f32; 3]) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    pub shape: Shape,
    pub material: Material,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub transform: Transform,
    pub tag: Option<DomainTag>,
    pub mesh: Option<Mesh>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(kind: NodeKind, transform: Transform) -> Self {
        Self {
            kind,
            transform,
            tag: None,
            mesh: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group(kind: NodeKind, transform: Transform) -> Self {
        Self::new(kind, transform)
    }

    pub fn part(shape: Shape, material: Material, translation: Vec3) -> Self {
        Self {
            mesh: Some(Mesh { shape, material }),
            ..Self::new(NodeKind::Part, Transform::at(translation))
        }
    }

    pub fn tagged(mut self, tag: DomainTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed node tree. Node 0 is always the root; every other node has
/// exactly one parent, so dropping the graph or walking it post-order visits
/// each node once.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::new(NodeKind::Root, Transform::default())],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root is present
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Local-to-world matrix, composed from the root down
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.node(c)) {
            matrix = node.transform.to_matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// Closest node at or above `id` carrying a domain tag
    pub fn tagged_ancestor(&self, id: NodeId) -> Option<(NodeId, &DomainTag)> {
        let mut current = Some(id);
        while let Some(cid) = current {
            let node = self.node(cid)?;
            if let Some(tag) = &node.tag {
                return Some((cid, tag));
            }
            current = node.parent;
        }
        None
    }

    pub fn pickable_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.tag.is_some()).count()
    }

    pub fn count_tagged(&self, kind: DomainKind) -> usize {
        self.nodes
            .iter()
            .filter_map(|n| n.tag.as_ref())
            .filter(|t| t.kind() == kind)
            .count()
    }

    pub fn find_tag(&self, tag: &DomainTag) -> Option<NodeId> {
        self.iter().find(|(_, n)| n.tag.as_ref() == Some(tag)).map(|(id, _)| id)
    }

    pub fn mesh_nodes(&self) -> impl Iterator<Item = (NodeId, &Mesh)> {
        self.iter().filter_map(|(id, n)| n.mesh.as_ref().map(|m| (id, m)))
    }

    /// Children before parents, siblings in insertion order
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root(), false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            stack.push((id, true));
            if let Some(node) = self.node(id) {
                for &child in node.children.iter().rev() {
                    stack.push((child, false));
                }
            }
        }
        order
    }

    /// World-space bounds of every mesh
    pub fn bounds(&self) -> Option<AABB> {
        self.mesh_nodes()
            .map(|(id, mesh)| mesh.shape.local_bounds().transformed(&self.world_matrix(id)))
            .reduce(|a, b| a.union(&b))
    }
}
