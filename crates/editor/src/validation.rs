//! Mesh validation utilities.
//!
//! `MeshValidator` provides integrity checks for `Geometry` buffers:
//! attribute strides, in-range indices, normalized normals, AABB
//! dimensions. Used heavily by the editing-operation tests.

use crate::viewport::mesh::{Aabb, Geometry};

/// Validator for `Geometry` integrity checks.
pub struct MeshValidator<'a> {
    geometry: &'a Geometry,
}

impl<'a> MeshValidator<'a> {
    pub fn new(geometry: &'a Geometry) -> Self {
        Self { geometry }
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.geometry.triangle_count()
    }

    /// Position buffer length is a multiple of 3
    pub fn is_stride_valid(&self) -> bool {
        self.geometry.positions.len() % 3 == 0
    }

    /// Index buffer length is a multiple of 3 (vacuously true without one)
    pub fn is_index_stride_valid(&self) -> bool {
        self.geometry
            .indices
            .as_ref()
            .map(|i| i.len() % 3 == 0)
            .unwrap_or(true)
    }

    /// Optional attribute buffers match the position buffer's vertex count
    pub fn are_attribute_counts_consistent(&self) -> bool {
        let count = self.vertex_count();
        let normals_ok = self
            .geometry
            .normals
            .as_ref()
            .map(|n| n.len() == count * 3)
            .unwrap_or(true);
        let uvs_ok = self
            .geometry
            .uvs
            .as_ref()
            .map(|u| u.len() == count * 2)
            .unwrap_or(true);
        normals_ok && uvs_ok
    }

    /// Every index addresses an existing vertex
    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.geometry
            .indices
            .as_ref()
            .map(|indices| indices.iter().all(|&i| i < max_idx))
            .unwrap_or(true)
    }

    /// All vertex normals have unit length (within epsilon)
    pub fn are_normals_normalized(&self, epsilon: f32) -> bool {
        let Some(normals) = &self.geometry.normals else {
            return true;
        };
        for n in normals.chunks_exact(3) {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            if (len - 1.0).abs() > epsilon {
                return false;
            }
        }
        true
    }

    pub fn aabb(&self) -> Aabb {
        self.geometry.bounds
    }

    /// Bounding box dimensions (width, height, depth)
    pub fn dimensions(&self) -> [f32; 3] {
        let aabb = self.aabb();
        [
            aabb.max.x - aabb.min.x,
            aabb.max.y - aabb.min.y,
            aabb.max.z - aabb.min.z,
        ]
    }

    pub fn assert_dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        let dims = self.dimensions();
        (dims[0] - expected[0]).abs() < tolerance
            && (dims[1] - expected[1]).abs() < tolerance
            && (dims[2] - expected[2]).abs() < tolerance
    }

    /// Run all checks; an empty list means the geometry is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.is_stride_valid() {
            errors.push(format!(
                "Position buffer length {} is not a multiple of 3",
                self.geometry.positions.len()
            ));
        }

        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.geometry.indices.as_ref().map(|i| i.len()).unwrap_or(0)
            ));
        }

        if !self.are_attribute_counts_consistent() {
            errors.push("Attribute buffer counts do not match vertex count".to_string());
        }

        if !self.are_indices_in_range() {
            errors.push(format!(
                "Indices out of range (vertex_count={})",
                self.vertex_count()
            ));
        }

        if self.vertex_count() > 0 && !self.are_normals_normalized(0.1) {
            errors.push("Some normals are not unit-length (epsilon=0.1)".to_string());
        }

        errors
    }
}
