//! Topology editing operations: split a mesh along a vertex selection,
//! join two meshes into one, weld two vertices.
//!
//! Every operation validates its preconditions up front and returns an
//! error without touching any state when they fail.

mod join;
mod split;
mod weld;

pub use join::join_nodes;
pub use split::split_node;
pub use weld::weld_vertices;

use std::collections::HashMap;

use crate::viewport::mesh::Geometry;

/// Rebuild a compact geometry from a flat triangle id list referencing the
/// source. Referenced vertex ids are deduplicated in first-appearance
/// order and densely remapped; position/normal/uv attributes follow the
/// surviving ids and the indices are rewritten against the remap.
pub(crate) fn extract_submesh(source: &Geometry, triangle_ids: &[u32]) -> Geometry {
    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut unique: Vec<u32> = Vec::new();

    for &id in triangle_ids {
        if !remap.contains_key(&id) {
            remap.insert(id, unique.len() as u32);
            unique.push(id);
        }
    }

    let mut positions = Vec::with_capacity(unique.len() * 3);
    for &old in &unique {
        let base = old as usize * 3;
        positions.extend_from_slice(&source.positions[base..base + 3]);
    }

    let normals = source.normals.as_ref().map(|src| {
        let mut out = Vec::with_capacity(unique.len() * 3);
        for &old in &unique {
            let base = old as usize * 3;
            out.extend_from_slice(&src[base..base + 3]);
        }
        out
    });

    let uvs = source.uvs.as_ref().map(|src| {
        let mut out = Vec::with_capacity(unique.len() * 2);
        for &old in &unique {
            let base = old as usize * 2;
            out.extend_from_slice(&src[base..base + 2]);
        }
        out
    });

    let indices = triangle_ids.iter().map(|id| remap[id]).collect();

    Geometry::new(positions, normals, uvs, Some(indices))
}
