//! Weld: alias one vertex index to another

use shared::NodeId;

use crate::state::scene::SceneState;

/// Rewrite every occurrence of `from` in the node's triangle index buffer
/// to `into`. The vertex buffer is left uncompacted, so `from`'s attribute
/// data becomes unreferenced. No attribute interpolation happens; the
/// surviving vertex's position wins.
pub fn weld_vertices(
    scene: &mut SceneState,
    id: &NodeId,
    from: u32,
    into: u32,
) -> Result<(), &'static str> {
    let Some(gid) = scene.get_node(id).and_then(|n| n.geometry) else {
        return Err("weld target has no geometry");
    };
    let geometry = scene
        .geometries
        .get_mut(gid)
        .ok_or("weld target geometry is gone")?;

    let vertex_count = geometry.vertex_count() as u32;
    if from >= vertex_count || into >= vertex_count {
        return Err("weld indices out of range");
    }

    let Some(indices) = geometry.indices.as_mut() else {
        return Err("weld does not support non-indexed geometry");
    };

    for entry in indices.iter_mut() {
        if *entry == from {
            *entry = into;
        }
    }

    scene.notify_mutated();
    tracing::info!(node = %id, from, into, "weld");
    Ok(())
}
