//! Join two nodes' meshes into one world-space mesh

use shared::NodeId;

use crate::state::scene::{Material, SceneState};
use crate::viewport::mesh::{Geometry, GeometryGroup};

/// Merge the geometries of two nodes into a new root-level node. Each
/// source geometry is cloned and its node's world transform baked in, so
/// the merged mesh lives in the world frame regardless of where the
/// originals sat in the hierarchy. The second node's indices are offset by
/// the first node's vertex count, and two material groups keep each
/// source's original material over its own triangles.
///
/// The caller clears the selection and destroys the source nodes
/// afterwards; this function only builds the merged node.
pub fn join_nodes(
    scene: &mut SceneState,
    first: &NodeId,
    second: &NodeId,
    materials: [Material; 2],
) -> Result<NodeId, &'static str> {
    let (mut geo_a, world_a) = match (scene.node_geometry(first), scene.get_node(first)) {
        (Some(g), Some(n)) => (g.clone(), n.world),
        _ => return Err("join source has no geometry"),
    };
    let (mut geo_b, world_b) = match (scene.node_geometry(second), scene.get_node(second)) {
        (Some(g), Some(n)) => (g.clone(), n.world),
        _ => return Err("join source has no geometry"),
    };
    if geo_a.is_indexed() != geo_b.is_indexed() {
        return Err("join sources must both be indexed or both non-indexed");
    }

    geo_a.apply_transform(&world_a);
    geo_b.apply_transform(&world_b);

    let merged = merge_geometries(&geo_a, &geo_b);

    tracing::info!(
        vertices = merged.vertex_count(),
        triangles = merged.triangle_count(),
        "join"
    );

    let name = {
        let a = scene.get_node(first).map(|n| n.name.as_str()).unwrap_or("");
        format!("{a} joined")
    };
    let gid = scene.geometries.add(merged);
    let id = scene.insert_node(name, None, Some(gid), materials.to_vec());
    scene.update_world_transforms();
    Ok(id)
}

/// Concatenate two world-space geometries. Optional attributes survive
/// only when both sides carry them.
fn merge_geometries(a: &Geometry, b: &Geometry) -> Geometry {
    let mut positions = a.positions.clone();
    positions.extend_from_slice(&b.positions);

    let normals = match (&a.normals, &b.normals) {
        (Some(na), Some(nb)) => {
            let mut out = na.clone();
            out.extend_from_slice(nb);
            Some(out)
        }
        _ => None,
    };
    let uvs = match (&a.uvs, &b.uvs) {
        (Some(ua), Some(ub)) => {
            let mut out = ua.clone();
            out.extend_from_slice(ub);
            Some(out)
        }
        _ => None,
    };

    let offset = a.vertex_count() as u32;
    let (indices, group_a_len, group_b_len) = match (&a.indices, &b.indices) {
        (Some(ia), Some(ib)) => {
            let mut out = ia.clone();
            out.extend(ib.iter().map(|i| i + offset));
            (Some(out), ia.len(), ib.len())
        }
        // both non-indexed: groups address vertex ranges instead
        _ => (None, a.positions.len() / 3, b.positions.len() / 3),
    };

    let mut merged = Geometry::new(positions, normals, uvs, indices);
    merged.groups = vec![
        GeometryGroup {
            start: 0,
            count: group_a_len,
            material_slot: 0,
        },
        GeometryGroup {
            start: group_a_len,
            count: group_b_len,
            material_slot: 1,
        },
    ];
    merged
}
