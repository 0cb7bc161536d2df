//! Split a node's mesh along its selected vertex set

use std::collections::HashSet;

use shared::NodeId;

use super::extract_submesh;
use crate::state::scene::{Material, SceneState};

/// Partition the node's triangles by the selected vertex set and split the
/// mesh in two: triangles whose three vertices are all selected move to a
/// new sibling node (carrying `material`, the node's pre-selection
/// material); everything else stays. A triangle straddling the selection
/// boundary is kept whole on the original node; the split never clips
/// triangles at the boundary.
///
/// Returns the id of the new sibling node.
pub fn split_node(
    scene: &mut SceneState,
    id: &NodeId,
    selected: &[u32],
    material: Material,
) -> Result<NodeId, &'static str> {
    if selected.len() < 3 {
        return Err("split requires at least 3 selected vertices");
    }
    let Some(geometry) = scene.node_geometry(id) else {
        return Err("split target has no geometry");
    };
    let Some(indices) = geometry.indices.as_ref() else {
        return Err("split does not support non-indexed geometry");
    };

    let selected_set: HashSet<u32> = selected.iter().copied().collect();

    let mut new_tris: Vec<u32> = Vec::new();
    let mut old_tris: Vec<u32> = Vec::new();
    for tri in indices.chunks_exact(3) {
        if tri.iter().all(|v| selected_set.contains(v)) {
            new_tris.extend_from_slice(tri);
        } else {
            old_tris.extend_from_slice(tri);
        }
    }

    let geo_new = extract_submesh(geometry, &new_tris);
    let geo_old = extract_submesh(geometry, &old_tris);

    tracing::info!(
        node = %id,
        new_triangles = geo_new.triangle_count(),
        old_triangles = geo_old.triangle_count(),
        "split"
    );

    // the original keeps the "old" partition; its previous buffer is
    // released by the store
    scene.replace_node_geometry(id, geo_old);

    scene
        .add_sibling_node(id, geo_new, vec![material])
        .ok_or("split target disappeared")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_split_unit_square() {
        // spec scenario: unit square, two triangles, selection {0,1,2}
        let mut scene = SceneState::default();
        let id = scene.add_mesh_node("sq", fixtures::unit_square_geometry(), None);
        scene.update_world_transforms();

        let new_id = split_node(&mut scene, &id, &[0, 1, 2], Material::default()).unwrap();

        let old_geo = scene.node_geometry(&id).unwrap();
        let new_geo = scene.node_geometry(&new_id).unwrap();

        assert_eq!(new_geo.triangle_count(), 1);
        assert_eq!(new_geo.vertex_count(), 3);
        // vertices 0 and 2 end up duplicated across both partitions
        assert_eq!(old_geo.triangle_count(), 1);
        assert_eq!(old_geo.vertex_count(), 3);
    }

    #[test]
    fn test_split_partition_conservation() {
        let mut scene = SceneState::default();
        let id = scene.add_mesh_node("cube", fixtures::cube_geometry(2.0), None);
        scene.update_world_transforms();
        let total = scene.node_geometry(&id).unwrap().triangle_count();

        // select the +Z face's four vertices (ids 0..3 in the fixture)
        let new_id = split_node(&mut scene, &id, &[0, 1, 2, 3], Material::default()).unwrap();

        let old = scene.node_geometry(&id).unwrap().triangle_count();
        let new = scene.node_geometry(&new_id).unwrap().triangle_count();
        assert_eq!(old + new, total);
        assert_eq!(new, 2);
    }

    #[test]
    fn test_split_straddling_triangle_stays_old() {
        let mut scene = SceneState::default();
        let id = scene.add_mesh_node("sq", fixtures::unit_square_geometry(), None);
        scene.update_world_transforms();

        // {0, 1, 3} covers no triangle completely: [0,1,2] and [0,2,3]
        // both straddle and must stay whole on the original
        let new_id = split_node(&mut scene, &id, &[0, 1, 3], Material::default()).unwrap();
        assert_eq!(scene.node_geometry(&id).unwrap().triangle_count(), 2);
        assert_eq!(scene.node_geometry(&new_id).unwrap().triangle_count(), 0);
    }

    #[test]
    fn test_split_releases_original_geometry() {
        let mut scene = SceneState::default();
        let id = scene.add_mesh_node("sq", fixtures::unit_square_geometry(), None);
        let original_gid = scene.get_node(&id).unwrap().geometry.unwrap();
        scene.update_world_transforms();

        split_node(&mut scene, &id, &[0, 1, 2], Material::default()).unwrap();
        assert!(scene.geometries.get(original_gid).is_none());
        // two live geometries: old partition + new partition
        assert_eq!(scene.geometries.len(), 2);
    }

    #[test]
    fn test_split_rejects_too_few_vertices() {
        let mut scene = SceneState::default();
        let id = scene.add_mesh_node("sq", fixtures::unit_square_geometry(), None);
        let before = scene.version();

        assert!(split_node(&mut scene, &id, &[0, 1], Material::default()).is_err());
        assert_eq!(scene.node_count(), 1);
        assert_eq!(scene.version(), before);
    }

    #[test]
    fn test_split_rejects_non_indexed() {
        let mut scene = SceneState::default();
        let id = scene.add_mesh_node("raw", fixtures::non_indexed_triangle_geometry(), None);

        assert_eq!(
            split_node(&mut scene, &id, &[0, 1, 2], Material::default()),
            Err("split does not support non-indexed geometry")
        );
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn test_split_sibling_shares_parent() {
        let mut scene = SceneState::default();
        let group = scene.add_group_node("group", None);
        let id = scene.add_child_mesh_node(
            &group,
            "sq",
            fixtures::unit_square_geometry(),
            None,
        );
        scene.update_world_transforms();

        let new_id = split_node(&mut scene, &id, &[0, 1, 2], Material::default()).unwrap();
        assert_eq!(scene.get_node(&new_id).unwrap().parent, Some(group));
    }
}
