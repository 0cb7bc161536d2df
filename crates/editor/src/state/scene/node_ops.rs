//! Node creation and destruction

use glam::{Mat4, Quat, Vec3};
use shared::NodeId;

use super::{Material, Node, SceneState};
use crate::viewport::mesh::Geometry;

impl SceneState {
    /// Create a root-level node holding a mesh. Returns the new node id.
    pub fn add_mesh_node(
        &mut self,
        name: &str,
        geometry: Geometry,
        material: Option<Material>,
    ) -> NodeId {
        let gid = self.geometries.add(geometry);
        self.insert_node(
            name.to_string(),
            None,
            Some(gid),
            vec![material.unwrap_or_default()],
        )
    }

    /// Create an empty group node (no geometry)
    pub fn add_group_node(&mut self, name: &str, parent: Option<&NodeId>) -> NodeId {
        self.insert_node(name.to_string(), parent.cloned(), None, Vec::new())
    }

    /// Create a child node holding a mesh under `parent`
    pub fn add_child_mesh_node(
        &mut self,
        parent: &NodeId,
        name: &str,
        geometry: Geometry,
        material: Option<Material>,
    ) -> NodeId {
        let gid = self.geometries.add(geometry);
        self.insert_node(
            name.to_string(),
            Some(parent.clone()),
            Some(gid),
            vec![material.unwrap_or_default()],
        )
    }

    /// Create a sibling of `of` (same parent, same local transform)
    /// holding `geometry` with `materials`. Used by the split operation.
    pub fn add_sibling_node(
        &mut self,
        of: &NodeId,
        geometry: Geometry,
        materials: Vec<Material>,
    ) -> Option<NodeId> {
        let (name, parent, translation, rotation, scale) = {
            let node = self.get_node(of)?;
            (
                node.name.clone(),
                node.parent.clone(),
                node.translation,
                node.rotation,
                node.scale,
            )
        };

        let gid = self.geometries.add(geometry);
        let id = self.insert_node(name, parent, Some(gid), materials);
        if let Some(node) = self.get_node_mut(&id) {
            node.translation = translation;
            node.rotation = rotation;
            node.scale = scale;
        }
        self.update_world_transforms();
        Some(id)
    }

    pub(crate) fn insert_node(
        &mut self,
        name: String,
        parent: Option<NodeId>,
        geometry: Option<super::GeometryId>,
        materials: Vec<Material>,
    ) -> NodeId {
        self.insert_node_with_id(uuid::Uuid::new_v4().to_string(), name, parent, geometry, materials)
    }

    pub(crate) fn insert_node_with_id(
        &mut self,
        id: NodeId,
        name: String,
        parent: Option<NodeId>,
        geometry: Option<super::GeometryId>,
        materials: Vec<Material>,
    ) -> NodeId {
        let node = Node {
            id: id.clone(),
            name,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            world: Mat4::IDENTITY,
            geometry,
            materials,
            parent: parent.clone(),
            children: Vec::new(),
        };
        self.nodes.insert(id.clone(), node);

        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent_node) => parent_node.children.push(id.clone()),
            None => self.roots.push(id.clone()),
        }

        self.version += 1;
        id
    }

    /// Destroy a node and its whole subtree, releasing every geometry
    /// reference held by the removed nodes.
    pub fn remove_node(&mut self, id: &NodeId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }

        // detach from parent or root list
        let parent = self.nodes.get(id).and_then(|n| n.parent.clone());
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent_node) => parent_node.children.retain(|c| c != id),
            None => self.roots.retain(|r| r != id),
        }

        self.remove_subtree(id);
        self.version += 1;
        true
    }

    fn remove_subtree(&mut self, id: &NodeId) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        if let Some(gid) = node.geometry {
            self.geometries.release(gid);
        }
        for child in node.children {
            self.remove_subtree(&child);
        }
    }

    /// Swap a node's geometry for a freshly built one, releasing the old
    /// reference. Returns false when the node does not exist.
    pub fn replace_node_geometry(&mut self, id: &NodeId, geometry: Geometry) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        let gid = self.geometries.add(geometry);
        let old = {
            let node = self.nodes.get_mut(id).expect("checked above");
            std::mem::replace(&mut node.geometry, Some(gid))
        };
        if let Some(old) = old {
            self.geometries.release(old);
        }
        self.version += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_add_and_remove_mesh_node() {
        let mut scene = SceneState::default();
        let id = scene.add_mesh_node("sq", fixtures::unit_square_geometry(), None);
        assert_eq!(scene.node_count(), 1);
        assert_eq!(scene.geometries.len(), 1);
        assert_eq!(scene.roots(), &[id.clone()]);

        assert!(scene.remove_node(&id));
        assert_eq!(scene.node_count(), 0);
        assert!(scene.geometries.is_empty());
        assert!(scene.roots().is_empty());
    }

    #[test]
    fn test_remove_node_removes_subtree() {
        let mut scene = SceneState::default();
        let group = scene.add_group_node("group", None);
        scene.add_child_mesh_node(&group, "leaf", fixtures::unit_square_geometry(), None);

        assert!(scene.remove_node(&group));
        assert_eq!(scene.node_count(), 0);
        assert!(scene.geometries.is_empty());
    }

    #[test]
    fn test_shared_geometry_survives_one_removal() {
        let mut scene = SceneState::default();
        let a = scene.add_mesh_node("a", fixtures::unit_square_geometry(), None);
        let gid = scene.get_node(&a).unwrap().geometry.unwrap();

        // second node sharing the same buffer
        scene.geometries.retain(gid);
        let b = scene.insert_node("b".to_string(), None, Some(gid), vec![Material::default()]);

        scene.remove_node(&a);
        assert!(scene.geometries.get(gid).is_some());

        scene.remove_node(&b);
        assert!(scene.geometries.get(gid).is_none());
    }

    #[test]
    fn test_add_sibling_copies_transform_and_parent() {
        let mut scene = SceneState::default();
        let group = scene.add_group_node("group", None);
        let a = scene.add_child_mesh_node(&group, "a", fixtures::unit_square_geometry(), None);
        scene.set_translation(&a, Vec3::new(1.0, 2.0, 3.0));

        let b = scene
            .add_sibling_node(&a, fixtures::unit_square_geometry(), vec![Material::default()])
            .unwrap();

        let b_node = scene.get_node(&b).unwrap();
        assert_eq!(b_node.parent, Some(group.clone()));
        assert_eq!(b_node.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.get_node(&group).unwrap().children.len(), 2);
    }

    #[test]
    fn test_replace_node_geometry_releases_old() {
        let mut scene = SceneState::default();
        let a = scene.add_mesh_node("a", fixtures::unit_square_geometry(), None);
        let old_gid = scene.get_node(&a).unwrap().geometry.unwrap();

        assert!(scene.replace_node_geometry(&a, fixtures::triangle_geometry()));
        assert!(scene.geometries.get(old_gid).is_none());
        assert_eq!(scene.node_geometry(&a).unwrap().vertex_count(), 3);
    }

    #[test]
    fn test_remove_unknown_node() {
        let mut scene = SceneState::default();
        assert!(!scene.remove_node(&"nope".to_string()));
    }
}
