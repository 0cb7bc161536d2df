//! Headless harness for programmatic editor use: loads scenes, drives
//! pointer gestures through the interaction state machine, and exposes
//! counts for assertions. Powers the integration tests and the command
//! interface.

use glam::{Vec2, Vec3};
use shared::{NodeId, SceneDescription};

use crate::editor::Editor;
use crate::validation::MeshValidator;
use crate::viewport::projection::Viewport;

/// Fixed viewport used by the harness
pub const HARNESS_VIEWPORT: Viewport = Viewport {
    width: 800.0,
    height: 600.0,
};

/// Headless editor harness
pub struct Harness {
    pub editor: Editor,
}

impl Harness {
    /// New harness with a straight-on camera so world-space XY planes
    /// project predictably.
    pub fn new() -> Self {
        let mut editor = Editor::new(HARNESS_VIEWPORT);
        editor.camera.yaw = 0.0;
        editor.camera.pitch = 0.0;
        Self { editor }
    }

    /// Harness backed by the user's persisted settings (binary entry)
    pub fn with_loaded_settings() -> Self {
        let mut editor = Editor::with_loaded_settings(HARNESS_VIEWPORT);
        editor.camera.yaw = 0.0;
        editor.camera.pitch = 0.0;
        Self { editor }
    }

    // ── Scene management ─────────────────────────────────────

    pub fn load_scene(&mut self, desc: &SceneDescription) {
        self.editor.load_scene(desc);
    }

    pub fn load_scene_json(&mut self, json: &str) -> Result<(), String> {
        let desc: SceneDescription =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        self.load_scene(&desc);
        Ok(())
    }

    pub fn export_scene_json(&self) -> String {
        serde_json::to_string_pretty(&self.editor.state.scene.to_description())
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.editor.state.scene.node_count()
    }

    /// All node ids, sorted for deterministic assertions
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .editor
            .state
            .scene
            .iter_nodes()
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn validate_node(&self, id: &NodeId) -> Option<MeshValidator<'_>> {
        self.editor.state.scene.node_geometry(id).map(MeshValidator::new)
    }

    // ── Selection inspection ─────────────────────────────────

    pub fn selected_count(&self) -> usize {
        self.editor.state.selection.count()
    }

    pub fn selected_vert_count(&self) -> usize {
        self.editor.count_selected_verts()
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.editor.state.selection.is_selected(id)
    }

    // ── Gesture driving ──────────────────────────────────────

    /// Viewport position of a world point under the harness camera
    pub fn project(&self, world: Vec3) -> Vec2 {
        self.editor.camera.world_to_viewport(world, &HARNESS_VIEWPORT)
    }

    /// Full pointer gesture: down at the first point, move through all,
    /// up at the end.
    pub fn drag(&mut self, path: &[(f32, f32)]) {
        let Some(&(x0, y0)) = path.first() else {
            return;
        };
        self.editor.on_pointer_down(Vec2::new(x0, y0));
        for &(x, y) in path {
            self.editor.on_pointer_move(Vec2::new(x, y));
        }
        self.editor.on_pointer_up();
    }

    /// Click (down + up) at a viewport position
    pub fn click(&mut self, x: f32, y: f32) {
        self.editor.on_pointer_down(Vec2::new(x, y));
        self.editor.on_pointer_up();
    }

    /// Click on the projection of a world point
    pub fn click_world(&mut self, world: Vec3) {
        let p = self.project(world);
        self.click(p.x, p.y);
    }

    /// Drive a square lasso gesture around the projection of a world
    /// point. The editor must already be in lasso mode or one of the
    /// vertex-pick states for the gesture to capture points.
    pub fn lasso_around_world(&mut self, world: Vec3, half_px: f32) {
        let c = self.project(world);
        let path = crate::fixtures::square_path(c.x, c.y, half_px);
        self.drag(&path);
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_new_harness_empty() {
        let h = Harness::new();
        assert_eq!(h.node_count(), 0);
        assert_eq!(h.selected_count(), 0);
    }

    #[test]
    fn test_load_export_roundtrip() {
        let mut h = Harness::new();
        h.load_scene(&fixtures::two_squares_scene_description());
        assert_eq!(h.node_count(), 2);

        let json = h.export_scene_json();
        let mut h2 = Harness::new();
        h2.load_scene_json(&json).unwrap();
        assert_eq!(h2.node_count(), 2);
        assert_eq!(h2.node_ids(), h.node_ids());
    }

    #[test]
    fn test_load_invalid_json() {
        let mut h = Harness::new();
        assert!(h.load_scene_json("not json").is_err());
    }

    #[test]
    fn test_click_selects() {
        let mut h = Harness::new();
        h.load_scene(&fixtures::single_square_scene_description("sq"));
        h.click_world(Vec3::new(0.25, 0.75, 0.0));
        assert_eq!(h.selected_count(), 1);
        assert!(h.is_selected(&"sq".to_string()));
    }

    #[test]
    fn test_lasso_gesture_via_harness() {
        let mut h = Harness::new();
        h.load_scene(&fixtures::single_square_scene_description("sq"));
        h.editor.setup_lasso_mode();
        h.lasso_around_world(Vec3::new(0.5, 0.5, 0.0), 120.0);
        assert_eq!(h.selected_count(), 1);
    }

    #[test]
    fn test_validate_node() {
        let mut h = Harness::new();
        h.load_scene(&fixtures::single_square_scene_description("sq"));
        let v = h.validate_node(&"sq".to_string()).unwrap();
        assert!(v.validate_all().is_empty());
        assert_eq!(v.vertex_count(), 4);
    }
}
