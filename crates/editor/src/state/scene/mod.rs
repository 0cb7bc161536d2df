//! Scene state: the node forest, world transforms and the shared
//! geometry store.

mod display;
mod node_ops;
mod persistence;
mod transform_ops;

pub use display::{node_display_name, short_id};

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};
use shared::{MaterialDescription, NodeId};

use crate::viewport::mesh::Geometry;

/// Display material of a node. The selection highlight swaps the whole
/// material list out and the clear path restores it.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    /// RGB in [0, 1]
    pub color: [f32; 3],
    pub wireframe: bool,
}

impl Material {
    pub fn standard(color: [f32; 3]) -> Self {
        Self {
            name: None,
            color,
            wireframe: false,
        }
    }

    /// The shared selection highlight: grey wireframe
    pub fn selected(color: [f32; 3]) -> Self {
        Self {
            name: Some("selected".to_string()),
            color,
            wireframe: true,
        }
    }

    pub fn from_description(desc: &MaterialDescription) -> Self {
        Self {
            name: desc.name.clone(),
            color: desc.color,
            wireframe: false,
        }
    }

    pub fn to_description(&self) -> MaterialDescription {
        MaterialDescription {
            name: self.name.clone(),
            color: self.color,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(MaterialDescription::default().color)
    }
}

/// Handle into the geometry store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryId(u64);

struct GeometryEntry {
    geometry: Geometry,
    refs: usize,
}

/// Owns every geometry in the scene with an explicit reference count per
/// entry. Nodes hold `GeometryId`s; a buffer is freed when the last
/// reference is released, so disposal never needs a scene scan.
#[derive(Default)]
pub struct GeometryStore {
    entries: HashMap<u64, GeometryEntry>,
    next_id: u64,
}

impl GeometryStore {
    /// Insert a geometry with one reference (the caller's)
    pub fn add(&mut self, geometry: Geometry) -> GeometryId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(id, GeometryEntry { geometry, refs: 1 });
        GeometryId(id)
    }

    pub fn get(&self, id: GeometryId) -> Option<&Geometry> {
        self.entries.get(&id.0).map(|e| &e.geometry)
    }

    pub fn get_mut(&mut self, id: GeometryId) -> Option<&mut Geometry> {
        self.entries.get_mut(&id.0).map(|e| &mut e.geometry)
    }

    /// Add a reference (a second node starts sharing the buffer)
    pub fn retain(&mut self, id: GeometryId) {
        if let Some(entry) = self.entries.get_mut(&id.0) {
            entry.refs += 1;
        }
    }

    /// Drop a reference; frees the buffers when it was the last one.
    /// Returns whether the entry was actually freed.
    pub fn release(&mut self, id: GeometryId) -> bool {
        match self.entries.get_mut(&id.0) {
            Some(entry) if entry.refs > 1 => {
                entry.refs -= 1;
                false
            }
            Some(_) => {
                self.entries.remove(&id.0);
                true
            }
            None => false,
        }
    }

    pub fn ref_count(&self, id: GeometryId) -> usize {
        self.entries.get(&id.0).map(|e| e.refs).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A transformable entity of the scene hierarchy, optionally holding a
/// geometry and the materials its triangles are rendered with.
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Derived; kept current by `update_world_transforms`
    pub world: Mat4,
    pub geometry: Option<GeometryId>,
    /// Usually one slot; join produces two, addressed via geometry groups
    pub materials: Vec<Material>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn material(&self) -> Option<&Material> {
        self.materials.first()
    }
}

/// The scene: nodes keyed by id, the root list, and the geometry store.
/// `version` increments on every mutation so external caches (renderer,
/// overlays) can invalidate.
#[derive(Default)]
pub struct SceneState {
    pub(crate) nodes: HashMap<NodeId, Node>,
    pub(crate) roots: Vec<NodeId>,
    pub geometries: GeometryStore,
    pub(crate) version: u64,
}

impl SceneState {
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Bump version without any structural change
    pub fn notify_mutated(&mut self) {
        self.version += 1;
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Geometry of a node, if it has one
    pub fn node_geometry(&self, id: &NodeId) -> Option<&Geometry> {
        self.get_node(id)
            .and_then(|n| n.geometry)
            .and_then(|gid| self.geometries.get(gid))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.geometries.clear();
        self.version += 1;
    }
}
