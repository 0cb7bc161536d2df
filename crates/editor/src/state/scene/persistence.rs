//! Scene description load/save and autosave

use glam::{EulerRot, Quat, Vec3};
use shared::{NodeDescription, NodeId, SceneDescription, Transform};

use super::{Material, Node, SceneState};
use crate::viewport::mesh::Geometry;

impl SceneState {
    /// Replace the scene with the content of a description. Nodes without
    /// an id get a fresh uuid.
    pub fn load_description(&mut self, desc: &SceneDescription) {
        self.clear();
        for node in &desc.nodes {
            self.spawn_described(node, None);
        }
        self.update_world_transforms();
        tracing::info!(
            nodes = self.node_count(),
            geometries = self.geometries.len(),
            "scene loaded"
        );
    }

    fn spawn_described(&mut self, desc: &NodeDescription, parent: Option<&NodeId>) {
        let id = desc
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let geometry = desc
            .mesh
            .as_ref()
            .map(|m| self.geometries.add(Geometry::from_description(m)));
        let materials = match (&desc.material, &desc.mesh) {
            (Some(mat), _) => vec![Material::from_description(mat)],
            (None, Some(_)) => vec![Material::default()],
            (None, None) => Vec::new(),
        };

        let id = self.insert_node_with_id(
            id,
            desc.name.clone(),
            parent.cloned(),
            geometry,
            materials,
        );
        self.apply_described_transform(&id, &desc.transform);

        for child in &desc.children {
            self.spawn_described(child, Some(&id));
        }
    }

    fn apply_described_transform(&mut self, id: &NodeId, t: &Transform) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.translation = Vec3::new(
                t.position[0] as f32,
                t.position[1] as f32,
                t.position[2] as f32,
            );
            node.rotation = Quat::from_euler(
                EulerRot::XYZ,
                t.rotation[0] as f32,
                t.rotation[1] as f32,
                t.rotation[2] as f32,
            );
            node.scale = Vec3::new(t.scale[0] as f32, t.scale[1] as f32, t.scale[2] as f32);
        }
    }

    /// Serialize the scene back to a description
    pub fn to_description(&self) -> SceneDescription {
        SceneDescription {
            nodes: self
                .roots
                .iter()
                .filter_map(|id| self.describe_node(id))
                .collect(),
        }
    }

    fn describe_node(&self, id: &NodeId) -> Option<NodeDescription> {
        let node = self.get_node(id)?;
        Some(NodeDescription {
            id: Some(node.id.clone()),
            name: node.name.clone(),
            transform: describe_transform(node),
            mesh: node
                .geometry
                .and_then(|gid| self.geometries.get(gid))
                .map(|g| g.to_description()),
            material: node.material().map(|m| m.to_description()),
            children: node
                .children
                .iter()
                .filter_map(|c| self.describe_node(c))
                .collect(),
        })
    }

    // ── Autosave ─────────────────────────────────────────────

    fn autosave_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "meshedit", "meshedit")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Save the scene to the autosave file; failures are logged, not fatal
    pub fn autosave(&self) {
        if let Some(path) = Self::autosave_path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match serde_json::to_string_pretty(&self.to_description()) {
                Ok(json) => {
                    if let Err(e) = std::fs::write(&path, json) {
                        tracing::warn!("autosave failed: {e}");
                    }
                }
                Err(e) => tracing::warn!("autosave serialization failed: {e}"),
            }
        }
    }

    /// Load the autosaved scene, if any
    pub fn load_autosave() -> Option<SceneDescription> {
        let path = Self::autosave_path()?;
        let json = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&json).ok()
    }

    pub fn has_autosave() -> bool {
        Self::autosave_path().map(|p| p.exists()).unwrap_or(false)
    }
}

fn describe_transform(node: &Node) -> Transform {
    let (rx, ry, rz) = node.rotation.to_euler(EulerRot::XYZ);
    Transform {
        position: [
            node.translation.x as f64,
            node.translation.y as f64,
            node.translation.z as f64,
        ],
        rotation: [rx as f64, ry as f64, rz as f64],
        scale: [node.scale.x as f64, node.scale.y as f64, node.scale.z as f64],
    }
}
