//! Local transform setters and world matrix recomputation

use glam::{Mat4, Quat, Vec3};
use shared::NodeId;

use super::SceneState;

impl SceneState {
    pub fn set_translation(&mut self, id: &NodeId, translation: Vec3) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.translation = translation;
            self.version += 1;
        }
    }

    pub fn set_rotation(&mut self, id: &NodeId, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.rotation = rotation;
            self.version += 1;
        }
    }

    pub fn set_scale(&mut self, id: &NodeId, scale: Vec3) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.scale = scale;
            self.version += 1;
        }
    }

    /// World matrix of a node's parent (identity for roots)
    pub fn parent_world(&self, id: &NodeId) -> Mat4 {
        self.get_node(id)
            .and_then(|n| n.parent.as_ref())
            .and_then(|p| self.get_node(p))
            .map(|p| p.world)
            .unwrap_or(Mat4::IDENTITY)
    }

    /// Recompute every node's world matrix top-down. Called after any
    /// hierarchy or transform mutation before world-space queries.
    pub fn update_world_transforms(&mut self) {
        let roots = self.roots.clone();
        for id in roots {
            self.update_world_recursive(&id, Mat4::IDENTITY);
        }
    }

    fn update_world_recursive(&mut self, id: &NodeId, parent_world: Mat4) {
        let (world, children) = match self.nodes.get_mut(id) {
            Some(node) => {
                node.world = parent_world * node.local_matrix();
                (node.world, node.children.clone())
            }
            None => return,
        };
        for child in children {
            self.update_world_recursive(&child, world);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use approx::assert_relative_eq;

    #[test]
    fn test_world_transform_composes_down_the_tree() {
        let mut scene = SceneState::default();
        let group = scene.add_group_node("group", None);
        let leaf = scene.add_child_mesh_node(&group, "leaf", fixtures::triangle_geometry(), None);

        scene.set_translation(&group, Vec3::new(1.0, 0.0, 0.0));
        scene.set_translation(&leaf, Vec3::new(0.0, 2.0, 0.0));
        scene.update_world_transforms();

        let world = scene.get_node(&leaf).unwrap().world;
        let origin = world.transform_point3(Vec3::ZERO);
        assert_relative_eq!(origin.x, 1.0);
        assert_relative_eq!(origin.y, 2.0);
    }

    #[test]
    fn test_parent_scale_applies_to_child() {
        let mut scene = SceneState::default();
        let group = scene.add_group_node("group", None);
        let leaf = scene.add_child_mesh_node(&group, "leaf", fixtures::triangle_geometry(), None);

        scene.set_scale(&group, Vec3::splat(2.0));
        scene.set_translation(&leaf, Vec3::new(1.0, 0.0, 0.0));
        scene.update_world_transforms();

        let origin = scene.get_node(&leaf).unwrap().world.transform_point3(Vec3::ZERO);
        assert_relative_eq!(origin.x, 2.0);
    }

    #[test]
    fn test_parent_world_of_root_is_identity() {
        let mut scene = SceneState::default();
        let a = scene.add_mesh_node("a", fixtures::triangle_geometry(), None);
        scene.set_translation(&a, Vec3::new(5.0, 0.0, 0.0));
        scene.update_world_transforms();
        assert_eq!(scene.parent_world(&a), Mat4::IDENTITY);
    }

    #[test]
    fn test_parent_world_of_child() {
        let mut scene = SceneState::default();
        let group = scene.add_group_node("group", None);
        let leaf = scene.add_child_mesh_node(&group, "leaf", fixtures::triangle_geometry(), None);
        scene.set_translation(&group, Vec3::new(0.0, 0.0, 7.0));
        scene.update_world_transforms();

        let pw = scene.parent_world(&leaf);
        assert_relative_eq!(pw.transform_point3(Vec3::ZERO).z, 7.0);
    }
}
