//! Selection state: which nodes are selected (in pick order), their
//! remembered materials, per-node selected vertex indices and the vertex
//! highlight overlays.
//!
//! All of this lives in a side table keyed by node id rather than on the
//! nodes themselves, so a node is selected if and only if it is a member
//! of the ordered list.

use std::collections::HashMap;

use shared::NodeId;

use crate::state::scene::{Material, SceneState};

/// Base color of overlay points
pub const VERT_BASE_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
/// Color of selected/highlighted overlay points
pub const VERT_HIGHLIGHT_COLOR: [f32; 3] = [1.0, 1.0, 0.0];

/// Point cloud drawn on top of a node's mesh while in vertex-edit mode:
/// a cloned position buffer plus a per-vertex color buffer. Not part of
/// the scene graph, so it never participates in hit-testing.
#[derive(Clone, Debug)]
pub struct VertexOverlay {
    /// 3 floats per vertex, cloned from the node's geometry
    pub positions: Vec<f32>,
    /// 3 floats per vertex
    pub colors: Vec<f32>,
}

impl VertexOverlay {
    fn new(positions: Vec<f32>) -> Self {
        let vertex_count = positions.len() / 3;
        let mut colors = Vec::with_capacity(vertex_count * 3);
        for _ in 0..vertex_count {
            colors.extend_from_slice(&VERT_BASE_COLOR);
        }
        Self { positions, colors }
    }
}

/// Per-node selection bookkeeping
pub struct NodeSelection {
    /// Materials to restore when the node is deselected
    pub original_materials: Vec<Material>,
    /// Selected vertex ids, discovery order; `Some` only in vertex-edit
    /// or merge-pick flows
    pub vertex_indices: Option<Vec<u32>>,
    pub overlay: Option<VertexOverlay>,
}

/// Ordered multi-selection of scene nodes
#[derive(Default)]
pub struct SelectionState {
    /// Selected node ids, in order of selection
    selected: Vec<NodeId>,
    records: HashMap<NodeId, NodeSelection>,
    /// Version counter for cache invalidation
    version: u64,
}

impl SelectionState {
    pub fn version(&self) -> u64 {
        self.version
    }

    /// First selected node
    pub fn primary(&self) -> Option<&NodeId> {
        self.selected.first()
    }

    /// All selected nodes, selection order
    pub fn all(&self) -> &[NodeId] {
        &self.selected
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.records.contains_key(id)
    }

    pub fn record(&self, id: &NodeId) -> Option<&NodeSelection> {
        self.records.get(id)
    }

    /// Select a node: remember its materials, swap in the highlight
    /// material, append to the list. Idempotent; returns whether the node
    /// was newly selected.
    pub fn select(&mut self, scene: &mut SceneState, id: &NodeId, highlight: &Material) -> bool {
        if self.is_selected(id) {
            return false;
        }
        let Some(node) = scene.get_node_mut(id) else {
            return false;
        };

        let original_materials = std::mem::replace(&mut node.materials, vec![highlight.clone()]);
        scene.notify_mutated();

        self.records.insert(
            id.clone(),
            NodeSelection {
                original_materials,
                vertex_indices: None,
                overlay: None,
            },
        );
        self.selected.push(id.clone());
        self.version += 1;
        true
    }

    /// Deselect everything: restore materials, drop overlays and vertex
    /// lists, empty the list.
    pub fn clear(&mut self, scene: &mut SceneState) {
        for id in self.selected.drain(..) {
            if let Some(record) = self.records.remove(&id) {
                if let Some(node) = scene.get_node_mut(&id) {
                    node.materials = record.original_materials;
                }
            }
        }
        scene.notify_mutated();
        self.records.clear();
        self.version += 1;
    }

    /// Forget a node without touching the scene (used when the node is
    /// about to be destroyed by an editing op).
    pub fn forget(&mut self, id: &NodeId) {
        if self.records.remove(id).is_some() {
            self.selected.retain(|s| s != id);
            self.version += 1;
        }
    }

    // ── Vertex selection ─────────────────────────────────────

    pub fn vertex_indices(&self, id: &NodeId) -> Option<&[u32]> {
        self.records
            .get(id)
            .and_then(|r| r.vertex_indices.as_deref())
    }

    pub fn set_vertex_indices(&mut self, id: &NodeId, indices: Vec<u32>) {
        if let Some(record) = self.records.get_mut(id) {
            record.vertex_indices = Some(indices);
            self.version += 1;
        }
    }

    /// Extend the vertex list (the two-step merge pick accumulates)
    pub fn append_vertex_indices(&mut self, id: &NodeId, indices: &[u32]) {
        if let Some(record) = self.records.get_mut(id) {
            record
                .vertex_indices
                .get_or_insert_with(Vec::new)
                .extend_from_slice(indices);
            self.version += 1;
        }
    }

    pub fn clear_vertex_state(&mut self, id: &NodeId) {
        if let Some(record) = self.records.get_mut(id) {
            record.vertex_indices = None;
            record.overlay = None;
            self.version += 1;
        }
    }

    /// Total selected vertices across all selected nodes
    pub fn count_selected_verts(&self) -> usize {
        self.selected
            .iter()
            .filter_map(|id| self.vertex_indices(id))
            .map(|v| v.len())
            .sum()
    }

    // ── Vertex overlay ───────────────────────────────────────

    /// Create (or recreate) the point overlay for a node from its current
    /// geometry, all points at the base color.
    pub fn create_overlay(&mut self, scene: &SceneState, id: &NodeId) {
        let Some(positions) = scene.node_geometry(id).map(|g| g.positions.clone()) else {
            return;
        };
        if let Some(record) = self.records.get_mut(id) {
            record.overlay = Some(VertexOverlay::new(positions));
            self.version += 1;
        }
    }

    pub fn destroy_overlay(&mut self, id: &NodeId) {
        if let Some(record) = self.records.get_mut(id) {
            if record.overlay.take().is_some() {
                self.version += 1;
            }
        }
    }

    pub fn overlay(&self, id: &NodeId) -> Option<&VertexOverlay> {
        self.records.get(id).and_then(|r| r.overlay.as_ref())
    }

    /// Recolor the listed vertices in a node's overlay to the highlight
    /// color. No-op when the node has no overlay.
    pub fn highlight_verts(&mut self, id: &NodeId, indices: &[u32]) {
        let Some(overlay) = self
            .records
            .get_mut(id)
            .and_then(|r| r.overlay.as_mut())
        else {
            return;
        };
        for &vi in indices {
            let base = vi as usize * 3;
            if base + 2 < overlay.colors.len() {
                overlay.colors[base..base + 3].copy_from_slice(&VERT_HIGHLIGHT_COLOR);
            }
        }
        self.version += 1;
    }
}
