//! Lasso selection over the scene hierarchy: a cheap projected-bounding-box
//! broad phase that prunes whole subtrees, followed by a per-vertex
//! containment pass on the nodes that survive.

use glam::{Mat4, Vec4};
use shared::NodeId;

use crate::state::scene::SceneState;
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::lasso::{Box2, Lasso};
use crate::viewport::mesh::{Aabb, Geometry};
use crate::viewport::projection::{self, Viewport};

/// Indices of geometry vertices that project inside the lasso, traversal
/// order. `quick` stops at the first hit (object-selection hit test);
/// vertices failing the near/far clip test never match.
pub fn vertices_in_lasso(
    scene: &SceneState,
    id: &NodeId,
    camera: &ArcBallCamera,
    vp: &Viewport,
    lasso: &Lasso,
    quick: bool,
) -> Vec<u32> {
    let Some(node) = scene.get_node(id) else {
        return Vec::new();
    };
    let Some(geometry) = node.geometry.and_then(|gid| scene.geometries.get(gid)) else {
        return Vec::new();
    };

    let model_to_clip = projection::model_to_clip(
        &camera.projection_matrix(vp.aspect()),
        &camera.view_matrix(),
        &node.world,
    );
    geometry_vertices_in_lasso(geometry, &model_to_clip, vp, lasso, quick)
}

/// The vertex pass against an explicit model-to-clip matrix
pub fn geometry_vertices_in_lasso(
    geometry: &Geometry,
    model_to_clip: &Mat4,
    vp: &Viewport,
    lasso: &Lasso,
    quick: bool,
) -> Vec<u32> {
    let mut indices = Vec::new();

    for vi in 0..geometry.vertex_count() {
        let p = geometry.position(vi);
        let clip = *model_to_clip * Vec4::new(p.x, p.y, p.z, 1.0);
        let Some(pt) = projection::clip_to_viewport(clip, vp) else {
            continue;
        };
        if lasso.contains(pt.truncate()) {
            indices.push(vi as u32);
            if quick {
                break;
            }
        }
    }

    indices
}

/// Every node with at least one vertex inside the lasso, depth-first
/// traversal order. The lasso must already be closed with ≥3 points.
pub fn nodes_in_lasso(
    scene: &SceneState,
    camera: &ArcBallCamera,
    vp: &Viewport,
    lasso: &Lasso,
) -> Vec<NodeId> {
    let mut hits = Vec::new();
    if lasso.point_count() < 3 {
        return hits;
    }
    for root in scene.roots() {
        visit(scene, root, camera, vp, lasso, &mut hits);
    }
    hits
}

fn visit(
    scene: &SceneState,
    id: &NodeId,
    camera: &ArcBallCamera,
    vp: &Viewport,
    lasso: &Lasso,
    hits: &mut Vec<NodeId>,
) {
    let Some(node) = scene.get_node(id) else {
        return;
    };

    // Broad phase: project the subtree's world box to a viewport box.
    // A miss prunes the node and everything below it. A child can only
    // escape its subtree box through non-rigid deformation (skinning,
    // morphing), which this scene model does not have.
    let subtree_bounds = subtree_world_aabb(scene, id);
    if subtree_bounds.is_empty() {
        // no geometry anywhere below, nothing selectable
        return;
    }
    let projected = projected_box(&subtree_bounds, camera, vp);
    if !projected.intersects(&lasso.bbox) {
        tracing::debug!(node = %node.name, "broad-phase prune");
        return;
    }

    if !vertices_in_lasso(scene, id, camera, vp, lasso, true).is_empty() {
        hits.push(id.clone());
    }

    // group nodes without geometry still get traversed
    for child in &node.children {
        visit(scene, child, camera, vp, lasso, hits);
    }
}

/// World-space box of a node and all its descendants
pub fn subtree_world_aabb(scene: &SceneState, id: &NodeId) -> Aabb {
    let mut aabb = Aabb::empty();
    let Some(node) = scene.get_node(id) else {
        return aabb;
    };
    if let Some(geometry) = node.geometry.and_then(|gid| scene.geometries.get(gid)) {
        aabb.union(&geometry.bounds.transformed(&node.world));
    }
    for child in &node.children {
        aabb.union(&subtree_world_aabb(scene, child));
    }
    aabb
}

fn projected_box(aabb: &Aabb, camera: &ArcBallCamera, vp: &Viewport) -> Box2 {
    Box2::from_points(
        aabb.corners()
            .into_iter()
            .map(|c| camera.world_to_viewport(c, vp)),
    )
}
