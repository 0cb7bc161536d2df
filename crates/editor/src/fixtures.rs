//! Factory functions for test data: geometries, scene descriptions and
//! gesture paths. Used by unit tests, the integration suites and the
//! command interface examples.

use shared::{
    MaterialDescription, MeshDescription, NodeDescription, SceneDescription, Transform,
};

use crate::viewport::mesh::Geometry;

// ── Geometry factories ──────────────────────────────────────────

/// Unit square in the XY plane: 4 vertices, triangles [0,1,2] and [0,2,3]
pub fn unit_square_geometry() -> Geometry {
    Geometry::new(
        vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 1.0, 0.0,
        ],
        Some(vec![
            0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0,
        ]),
        Some(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]),
        Some(vec![0, 1, 2, 0, 2, 3]),
    )
}

/// Single triangle in the XY plane
pub fn triangle_geometry() -> Geometry {
    Geometry::new(
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        Some(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]),
        None,
        Some(vec![0, 1, 2]),
    )
}

/// Triangle without an index buffer (unsupported by split/weld)
pub fn non_indexed_triangle_geometry() -> Geometry {
    Geometry::new(
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        None,
        None,
        None,
    )
}

/// Axis-aligned cube centered at the origin: 24 vertices (4 per face),
/// 12 triangles. The +Z face comes first, so its vertex ids are 0..3.
pub fn cube_geometry(size: f32) -> Geometry {
    let h = size * 0.5;

    // (quad corners, normal) per face
    let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
        // Front (+Z)
        (
            [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
            [0.0, 0.0, 1.0],
        ),
        // Back (-Z)
        (
            [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]],
            [0.0, 0.0, -1.0],
        ),
        // Right (+X)
        (
            [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]],
            [1.0, 0.0, 0.0],
        ),
        // Left (-X)
        (
            [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]],
            [-1.0, 0.0, 0.0],
        ),
        // Top (+Y)
        (
            [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]],
            [0.0, 1.0, 0.0],
        ),
        // Bottom (-Y)
        (
            [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
            [0.0, -1.0, 0.0],
        ),
    ];

    let mut positions = Vec::with_capacity(24 * 3);
    let mut normals = Vec::with_capacity(24 * 3);
    let mut uvs = Vec::with_capacity(24 * 2);
    let mut indices = Vec::with_capacity(36);

    for (quad, normal) in &faces {
        let base = (positions.len() / 3) as u32;
        for corner in quad {
            positions.extend_from_slice(corner);
            normals.extend_from_slice(normal);
        }
        uvs.extend_from_slice(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Geometry::new(positions, Some(normals), Some(uvs), Some(indices))
}

// ── Scene description factories ─────────────────────────────────

/// A root node holding the unit square mesh
pub fn single_square_scene_description(id: &str) -> SceneDescription {
    SceneDescription {
        nodes: vec![square_node_description(id, [0.0, 0.0, 0.0])],
    }
}

/// One root node with a unit square at a position
pub fn square_node_description(id: &str, position: [f64; 3]) -> NodeDescription {
    NodeDescription {
        id: Some(id.to_string()),
        name: id.to_string(),
        transform: Transform::at(position),
        mesh: Some(unit_square_geometry().to_description()),
        material: Some(MaterialDescription::default()),
        children: vec![],
    }
}

/// Two unit squares side by side
pub fn two_squares_scene_description() -> SceneDescription {
    SceneDescription {
        nodes: vec![
            square_node_description("left", [0.0, 0.0, 0.0]),
            square_node_description("right", [3.0, 0.0, 0.0]),
        ],
    }
}

/// A group with two child squares plus one root-level square
pub fn nested_scene_description() -> SceneDescription {
    SceneDescription {
        nodes: vec![
            NodeDescription {
                id: Some("group".to_string()),
                name: "group".to_string(),
                transform: Transform::new(),
                mesh: None,
                material: None,
                children: vec![
                    square_node_description("child_a", [0.0, 0.0, 0.0]),
                    square_node_description("child_b", [2.0, 0.0, 0.0]),
                ],
            },
            square_node_description("loose", [-3.0, 0.0, 0.0]),
        ],
    }
}

/// Mesh description without indices
pub fn non_indexed_mesh_description() -> MeshDescription {
    non_indexed_triangle_geometry().to_description()
}

// ── Gesture paths ───────────────────────────────────────────────

/// Square pointer path around a viewport center point, corner spacing
/// comfortably above the lasso's point distance threshold.
pub fn square_path(cx: f32, cy: f32, half: f32) -> Vec<(f32, f32)> {
    vec![
        (cx - half, cy - half),
        (cx + half, cy - half),
        (cx + half, cy + half),
        (cx - half, cy + half),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_square_factory() {
        let g = unit_square_geometry();
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.triangle_count(), 2);
        assert!(g.is_indexed());
    }

    #[test]
    fn test_cube_factory() {
        let g = cube_geometry(2.0);
        assert_eq!(g.vertex_count(), 24);
        assert_eq!(g.triangle_count(), 12);
        assert_eq!(g.bounds.min, glam::Vec3::splat(-1.0));
        assert_eq!(g.bounds.max, glam::Vec3::splat(1.0));
        // +Z face occupies ids 0..3
        assert_eq!(g.position(0).z, 1.0);
        assert_eq!(g.position(3).z, 1.0);
    }

    #[test]
    fn test_scene_description_factories() {
        assert_eq!(single_square_scene_description("a").node_count(), 1);
        assert_eq!(two_squares_scene_description().node_count(), 2);
        assert_eq!(nested_scene_description().node_count(), 4);
    }
}
