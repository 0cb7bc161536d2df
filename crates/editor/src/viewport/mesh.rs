use glam::{Mat3, Mat4, Vec3};
use shared::MeshDescription;

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Empty box: expanding it with any point makes it that point.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    /// Compute AABB from a flat position buffer (3 floats per vertex)
    pub fn from_positions(positions: &[f32]) -> Self {
        let mut aabb = Self::empty();
        for p in positions.chunks_exact(3) {
            aabb.expand(Vec3::new(p[0], p[1], p[2]));
        }
        aabb
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn expand(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&mut self, other: &Aabb) {
        if !other.is_empty() {
            self.expand(other.min);
            self.expand(other.max);
        }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// The 8 corner points
    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min, self.max);
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(max.x, max.y, max.z),
        ]
    }

    /// Transform all 8 corners and take their box
    pub fn transformed(&self, m: &Mat4) -> Aabb {
        let mut out = Aabb::empty();
        if self.is_empty() {
            return out;
        }
        for c in self.corners() {
            out.expand(m.transform_point3(c));
        }
        out
    }
}

/// A contiguous run of the index buffer rendered with one material slot.
/// Produced by the join operation so a merged mesh keeps each source's
/// original material over its own triangles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeometryGroup {
    /// Offset into the index buffer
    pub start: usize,
    /// Number of indices in the run
    pub count: usize,
    pub material_slot: usize,
}

/// CPU-side triangle mesh: separate attribute buffers (position mandatory,
/// normal/uv optional) plus an optional triangle index buffer. Absent
/// indices mean a non-indexed triangle list, which split/weld reject.
#[derive(Clone, Debug)]
pub struct Geometry {
    /// 3 floats per vertex
    pub positions: Vec<f32>,
    /// 3 floats per vertex, same vertex count as positions
    pub normals: Option<Vec<f32>>,
    /// 2 floats per vertex
    pub uvs: Option<Vec<f32>>,
    pub indices: Option<Vec<u32>>,
    pub groups: Vec<GeometryGroup>,
    /// Model-space bounds; recomputed after any buffer rebuild
    pub bounds: Aabb,
}

impl Geometry {
    pub fn new(
        positions: Vec<f32>,
        normals: Option<Vec<f32>>,
        uvs: Option<Vec<f32>>,
        indices: Option<Vec<u32>>,
    ) -> Self {
        let bounds = Aabb::from_positions(&positions);
        Self {
            positions,
            normals,
            uvs,
            indices,
            groups: Vec::new(),
            bounds,
        }
    }

    pub fn from_description(desc: &MeshDescription) -> Self {
        Self::new(
            desc.positions.clone(),
            desc.normals.clone(),
            desc.uvs.clone(),
            desc.indices.clone(),
        )
    }

    pub fn to_description(&self) -> MeshDescription {
        MeshDescription {
            positions: self.positions.clone(),
            normals: self.normals.clone(),
            uvs: self.uvs.clone(),
            indices: self.indices.clone(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertex_count() / 3,
        }
    }

    /// Position of vertex `i`
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(
            self.positions[i * 3],
            self.positions[i * 3 + 1],
            self.positions[i * 3 + 2],
        )
    }

    /// Recompute bounds from the current position buffer
    pub fn compute_bounds(&mut self) {
        self.bounds = Aabb::from_positions(&self.positions);
    }

    /// Bake a transform into the buffers: positions by the full matrix,
    /// normals by the inverse-transpose, renormalized.
    pub fn apply_transform(&mut self, m: &Mat4) {
        for p in self.positions.chunks_exact_mut(3) {
            let v = m.transform_point3(Vec3::new(p[0], p[1], p[2]));
            p.copy_from_slice(&[v.x, v.y, v.z]);
        }

        if let Some(normals) = &mut self.normals {
            let normal_matrix = Mat3::from_mat4(*m).inverse().transpose();
            for n in normals.chunks_exact_mut(3) {
                let v = (normal_matrix * Vec3::new(n[0], n[1], n[2])).normalize_or_zero();
                n.copy_from_slice(&[v.x, v.y, v.z]);
            }
        }

        self.compute_bounds();
    }
}
