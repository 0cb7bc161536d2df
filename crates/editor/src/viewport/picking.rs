use glam::Vec3;
use shared::NodeId;

use super::mesh::{Aabb, Geometry};
use crate::state::scene::SceneState;

/// A ray in world space
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns the distance along the ray if hit, or None if no intersection.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// One raycast hit: the node, the world-space hit point, the vertex ids of
/// the hit triangle and its geometric normal in the node's local frame.
#[derive(Clone, Debug)]
pub struct RayHit {
    pub node: NodeId,
    /// Distance from the ray origin, world units
    pub distance: f32,
    /// Hit point in world space
    pub point: Vec3,
    /// Vertex indices of the hit triangle
    pub triangle: [u32; 3],
    /// Geometric triangle normal in the node's local space
    pub normal: Vec3,
}

/// Vertex ids and local positions of triangle `tri` of a geometry.
/// Non-indexed lists address vertices sequentially.
pub fn triangle_at(geometry: &Geometry, tri: usize) -> ([u32; 3], [Vec3; 3]) {
    let ids = match &geometry.indices {
        Some(indices) => [
            indices[tri * 3],
            indices[tri * 3 + 1],
            indices[tri * 3 + 2],
        ],
        None => [tri as u32 * 3, tri as u32 * 3 + 1, tri as u32 * 3 + 2],
    };
    let pos = [
        geometry.position(ids[0] as usize),
        geometry.position(ids[1] as usize),
        geometry.position(ids[2] as usize),
    ];
    (ids, pos)
}

/// Cast a ray against every geometry-bearing node of the scene and return
/// hits ordered nearest-first. `exclude` skips one node (snap never targets
/// the node being moved).
pub fn raycast_scene(scene: &SceneState, ray: &Ray, exclude: Option<&NodeId>) -> Vec<RayHit> {
    let mut hits = Vec::new();

    for (id, node) in scene.iter_nodes() {
        if exclude == Some(id) {
            continue;
        }
        let Some(geometry) = node.geometry.and_then(|gid| scene.geometries.get(gid)) else {
            continue;
        };

        // cheap world-space box rejection before per-triangle tests
        let world_bounds = geometry.bounds.transformed(&node.world);
        if ray_aabb(ray, &world_bounds).is_none() {
            continue;
        }

        // transform the ray into the node's local frame; the direction is
        // left unnormalized so `t` stays valid under non-uniform scale
        let inv = node.world.inverse();
        let local_ray = Ray {
            origin: inv.transform_point3(ray.origin),
            direction: inv.transform_vector3(ray.direction),
        };

        for tri in 0..geometry.triangle_count() {
            let (ids, [v0, v1, v2]) = triangle_at(geometry, tri);
            if let Some(t) = ray_triangle_intersect(&local_ray, v0, v1, v2) {
                let local_point = local_ray.origin + local_ray.direction * t;
                let point = node.world.transform_point3(local_point);
                hits.push(RayHit {
                    node: id.clone(),
                    distance: (point - ray.origin).length(),
                    point,
                    triangle: ids,
                    normal: (v1 - v0).cross(v2 - v0).normalize_or_zero(),
                });
            }
        }
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use approx::assert_relative_eq;

    fn z_ray() -> Ray {
        // (0.75, 0.25) lies strictly inside the first triangle of the
        // unit square fixture
        Ray {
            origin: Vec3::new(0.75, 0.25, 5.0),
            direction: Vec3::NEG_Z,
        }
    }

    #[test]
    fn test_ray_aabb_hit_and_miss() {
        let aabb = Aabb {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        let hit = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
        };
        let miss = Ray {
            origin: Vec3::new(5.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
        };
        assert_relative_eq!(ray_aabb(&hit, &aabb).unwrap(), 4.0);
        assert!(ray_aabb(&miss, &aabb).is_none());
    }

    #[test]
    fn test_ray_triangle_hit() {
        let ray = Ray {
            origin: Vec3::new(0.25, 0.25, 5.0),
            direction: Vec3::NEG_Z,
        };
        let t = ray_triangle_intersect(
            &ray,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(t.unwrap(), 5.0);
    }

    #[test]
    fn test_ray_triangle_behind_origin() {
        let ray = Ray {
            origin: Vec3::new(0.25, 0.25, -5.0),
            direction: Vec3::NEG_Z,
        };
        assert!(ray_triangle_intersect(
            &ray,
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0)
        )
        .is_none());
    }

    #[test]
    fn test_raycast_scene_orders_hits() {
        let mut scene = SceneState::default();
        let near = scene.add_mesh_node("near", fixtures::unit_square_geometry(), None);
        let far = scene.add_mesh_node("far", fixtures::unit_square_geometry(), None);
        scene.set_translation(&far, Vec3::new(0.0, 0.0, -3.0));
        scene.update_world_transforms();

        let hits = raycast_scene(&scene, &z_ray(), None);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, near);
        assert_eq!(hits[1].node, far);
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn test_raycast_scene_exclude() {
        let mut scene = SceneState::default();
        let a = scene.add_mesh_node("a", fixtures::unit_square_geometry(), None);
        scene.update_world_transforms();

        let hits = raycast_scene(&scene, &z_ray(), Some(&a));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_raycast_reports_triangle_and_point() {
        let mut scene = SceneState::default();
        scene.add_mesh_node("sq", fixtures::unit_square_geometry(), None);
        scene.update_world_transforms();

        let hits = raycast_scene(&scene, &z_ray(), None);
        let hit = &hits[0];
        assert_relative_eq!(hit.point.z, 0.0, epsilon = 1e-5);
        assert_eq!(hit.triangle, [0, 1, 2]);
        assert_relative_eq!(hit.normal.z, 1.0, epsilon = 1e-5);
    }
}
