//! The editor context: owns the scene, selection, camera, lasso and gizmo
//! state, and sequences pointer events into selection and topology
//! operations. Everything runs synchronously inside the event call that
//! triggered it; a dirty flag coalesces redraw requests.

use glam::{Quat, Vec2, Vec3};
use shared::{NodeId, SceneDescription};

use crate::edit;
use crate::select;
use crate::state::scene::Material;
use crate::state::{AppState, SnapTarget};
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::gizmo::GizmoState;
use crate::viewport::lasso::Lasso;
use crate::viewport::picking::{self, RayHit};
use crate::viewport::projection::Viewport;

/// Top-level interaction state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Select,
    Snap,
    JoinSelectVertex1,
    JoinSelectVertex2,
}

/// How pointer-up selects in the `Select` state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    PointPick,
    Lasso,
}

/// Selection granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Object,
    Vertex,
}

pub struct Editor {
    pub state: AppState,
    pub camera: ArcBallCamera,
    pub gizmo: GizmoState,
    pub lasso: Lasso,
    viewport: Viewport,

    interaction: InteractionState,
    select_mode: SelectMode,
    edit_mode: EditMode,

    pub snap_target: SnapTarget,
    pub snap_align_rotation: bool,
    /// World orientation of the selected node captured at snap start
    snap_baseline: Option<Quat>,

    /// Whether the external orbit controller may react to drags
    camera_enabled: bool,
    mouse: Vec2,
    needs_redraw: bool,
}

impl Editor {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_state(AppState::with_default_settings(), viewport)
    }

    /// Like `new`, but loading persisted settings from the config dir
    pub fn with_loaded_settings(viewport: Viewport) -> Self {
        Self::with_state(AppState::new(), viewport)
    }

    fn with_state(state: AppState, viewport: Viewport) -> Self {
        let snap_target = state.settings.snap.target;
        let snap_align_rotation = state.settings.snap.align_rotation;
        Self {
            state,
            camera: ArcBallCamera::new(),
            gizmo: GizmoState::default(),
            lasso: Lasso::new(),
            viewport,
            interaction: InteractionState::Select,
            select_mode: SelectMode::PointPick,
            edit_mode: EditMode::Object,
            snap_target,
            snap_align_rotation,
            snap_baseline: None,
            camera_enabled: true,
            mouse: Vec2::ZERO,
            needs_redraw: false,
        }
    }

    // ── State reflection for the UI ──────────────────────────

    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    pub fn select_mode(&self) -> SelectMode {
        self.select_mode
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    pub fn camera_enabled(&self) -> bool {
        self.camera_enabled
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.request_redraw();
    }

    pub fn count_selected_verts(&self) -> usize {
        self.state.selection.count_selected_verts()
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Consume the pending redraw request
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    fn highlight_material(&self) -> Material {
        Material::selected(self.state.settings.highlight.selection_color)
    }

    // ── Scene loading ────────────────────────────────────────

    pub fn load_scene(&mut self, desc: &SceneDescription) {
        self.clear_selected();
        self.state.scene.load_description(desc);
        self.interaction = InteractionState::Select;
        self.select_mode = SelectMode::PointPick;
        self.request_redraw();
    }

    // ── Selection ────────────────────────────────────────────

    /// Select a node; exactly one selected node keeps the gizmo attached.
    pub fn select_node(&mut self, id: &NodeId) {
        let highlight = self.highlight_material();
        if self
            .state
            .selection
            .select(&mut self.state.scene, id, &highlight)
        {
            self.sync_gizmo();
        }
    }

    /// Deselect everything and drop back to object-level editing
    pub fn clear_selected(&mut self) {
        self.gizmo.detach();
        self.state.selection.clear(&mut self.state.scene);
        self.edit_mode = EditMode::Object;
        self.request_redraw();
    }

    fn sync_gizmo(&mut self) {
        match (self.state.selection.count(), self.state.selection.primary()) {
            (1, Some(id)) => self.gizmo.attach(id.clone()),
            _ => self.gizmo.detach(),
        }
    }

    // ── Mode switching ───────────────────────────────────────

    pub fn setup_select_mode(&mut self) {
        self.interaction = InteractionState::Select;
        self.select_mode = SelectMode::PointPick;
        self.camera_enabled = true;
    }

    pub fn setup_lasso_mode(&mut self) {
        self.interaction = InteractionState::Select;
        self.select_mode = SelectMode::Lasso;
        self.camera_enabled = false;
        self.gizmo.detach();
    }

    /// Enter vertex-level editing on the primary selected node
    pub fn setup_vertex_mode(&mut self) {
        if self.state.selection.count() == 0 {
            tracing::warn!("vertex edit requires a selected object");
            self.edit_mode = EditMode::Object;
            return;
        }
        self.edit_mode = EditMode::Vertex;

        let primary = self.state.selection.primary().cloned();
        if let Some(id) = primary {
            self.state.selection.create_overlay(&self.state.scene, &id);
        }
        self.gizmo.detach();
        self.request_redraw();
    }

    pub fn switch_to_object_mode(&mut self) {
        if self.edit_mode == EditMode::Vertex {
            for id in self.state.selection.all().to_vec() {
                self.state.selection.destroy_overlay(&id);
            }
        }
        self.edit_mode = EditMode::Object;
        self.sync_gizmo();
        self.request_redraw();
    }

    // ── Vertex merge (weld) flow ─────────────────────────────

    /// Start the two-step vertex pick that ends in a weld
    pub fn begin_merge_vertex_mode(&mut self) {
        if self.state.selection.count() != 1 {
            tracing::warn!("vertex merge requires exactly one selected object");
            self.edit_mode = EditMode::Object;
            return;
        }

        self.interaction = InteractionState::JoinSelectVertex1;

        let id = self.state.selection.primary().cloned().expect("count == 1");
        self.state.selection.clear_vertex_state(&id);
        self.state.selection.create_overlay(&self.state.scene, &id);
        self.gizmo.detach();
        self.camera_enabled = false;
        self.request_redraw();
    }

    fn end_merge_vertex_mode(&mut self) {
        self.interaction = InteractionState::Select;
        self.sync_gizmo();
        self.camera_enabled = true;
    }

    fn merge_selected_verts(&mut self) {
        let Some(id) = self.state.selection.primary().cloned() else {
            return;
        };
        let picked: Vec<u32> = self
            .state
            .selection
            .vertex_indices(&id)
            .map(<[u32]>::to_vec)
            .unwrap_or_default();
        if picked.len() != 2 {
            tracing::warn!("vertex merge requires exactly 2 picked vertices");
            return;
        }

        if let Err(e) = edit::weld_vertices(&mut self.state.scene, &id, picked[0], picked[1]) {
            tracing::warn!("{e}");
        }
        self.state.selection.clear_vertex_state(&id);
    }

    // ── Snap flow ────────────────────────────────────────────

    /// Enter snap mode: the selected node follows the surface under the
    /// pointer until pointer-up.
    pub fn begin_snap(&mut self) {
        if self.state.selection.count() != 1 {
            tracing::warn!("snap requires exactly one selected object");
            self.interaction = InteractionState::Select;
            return;
        }

        self.interaction = InteractionState::Snap;
        self.gizmo.detach();
        self.camera_enabled = false;

        let id = self.state.selection.primary().expect("count == 1");
        self.snap_baseline = self
            .state
            .scene
            .get_node(id)
            .map(|n| n.world.to_scale_rotation_translation().1);
    }

    fn end_snap(&mut self) {
        self.interaction = InteractionState::Select;
        self.sync_gizmo();
        self.camera_enabled = true;
        self.snap_baseline = None;
    }

    fn snap_move(&mut self) {
        let Some(target_id) = self.state.selection.primary().cloned() else {
            return;
        };

        let ray = self.camera.screen_ray(self.mouse, &self.viewport);
        let hits = picking::raycast_scene(&self.state.scene, &ray, None);

        for hit in &hits {
            // never snap the node to itself
            if hit.node == target_id {
                continue;
            }

            let world_pos = match self.snap_target {
                SnapTarget::Face => hit.point,
                SnapTarget::Vertex => self.nearest_triangle_corner(hit),
            };

            // node position is relative to its parent
            let local = self
                .state
                .scene
                .parent_world(&target_id)
                .inverse()
                .transform_point3(world_pos);
            self.state.scene.set_translation(&target_id, local);

            if self.snap_align_rotation {
                // hit normal is in the hit node's local space
                let normal_ws = self
                    .state
                    .scene
                    .get_node(&hit.node)
                    .map(|n| n.world.transform_vector3(hit.normal).normalize_or_zero());
                if let (Some(baseline), Some(normal_ws)) = (self.snap_baseline, normal_ws) {
                    let align = Quat::from_rotation_arc(Vec3::Y, normal_ws);
                    self.state
                        .scene
                        .set_rotation(&target_id, (align * baseline).normalize());
                }
            }

            self.state.scene.update_world_transforms();
            self.request_redraw();
            break;
        }
    }

    /// World position of the hit triangle's corner nearest to the hit
    /// point (squared distance).
    fn nearest_triangle_corner(&self, hit: &RayHit) -> Vec3 {
        let Some(node) = self.state.scene.get_node(&hit.node) else {
            return hit.point;
        };
        let Some(geometry) = self.state.scene.node_geometry(&hit.node) else {
            return hit.point;
        };

        let mut best = hit.point;
        let mut best_dist = f32::MAX;
        for &vi in &hit.triangle {
            let world = node.world.transform_point3(geometry.position(vi as usize));
            let dist = world.distance_squared(hit.point);
            if dist < best_dist {
                best_dist = dist;
                best = world;
            }
        }
        best
    }

    // ── Editing operations ───────────────────────────────────

    /// Split the selected node's mesh along its selected vertices
    pub fn split_selected(&mut self) -> bool {
        if self.state.selection.count() != 1 {
            tracing::warn!("split requires exactly one selected object");
            return false;
        }
        let id = self.state.selection.primary().expect("count == 1").clone();
        let selected: Vec<u32> = self
            .state
            .selection
            .vertex_indices(&id)
            .map(<[u32]>::to_vec)
            .unwrap_or_default();
        let material = self
            .state
            .selection
            .record(&id)
            .and_then(|r| r.original_materials.first().cloned())
            .unwrap_or_default();

        match edit::split_node(&mut self.state.scene, &id, &selected, material) {
            Ok(_) => {
                self.state.selection.clear_vertex_state(&id);
                self.clear_selected();
                true
            }
            Err(e) => {
                tracing::warn!("{e}");
                false
            }
        }
    }

    /// Join the two selected nodes into a new root-level node
    pub fn join_selected(&mut self) -> bool {
        if self.state.selection.count() != 2 {
            tracing::warn!("join requires exactly two selected objects");
            return false;
        }
        let first = self.state.selection.all()[0].clone();
        let second = self.state.selection.all()[1].clone();

        let mat_first = self
            .state
            .selection
            .record(&first)
            .and_then(|r| r.original_materials.first().cloned())
            .unwrap_or_default();
        let mat_second = self
            .state
            .selection
            .record(&second)
            .and_then(|r| r.original_materials.first().cloned())
            .unwrap_or_default();
        let materials = [mat_first, mat_second];

        match edit::join_nodes(&mut self.state.scene, &first, &second, materials) {
            Ok(_) => {
                // restore materials before the originals go away
                self.clear_selected();
                self.state.scene.remove_node(&first);
                self.state.scene.remove_node(&second);
                self.request_redraw();
                true
            }
            Err(e) => {
                tracing::warn!("{e}");
                false
            }
        }
    }

    // ── Pointer events ───────────────────────────────────────

    pub fn on_pointer_down(&mut self, pos: Vec2) {
        self.mouse = pos;
        match self.interaction {
            InteractionState::Snap => {}
            InteractionState::Select => {
                if self.select_mode == SelectMode::Lasso {
                    self.camera_enabled = false;
                    self.gizmo.detach();
                    self.lasso.begin();
                }
            }
            InteractionState::JoinSelectVertex1 | InteractionState::JoinSelectVertex2 => {
                self.lasso.begin();
            }
        }
        self.request_redraw();
    }

    pub fn on_pointer_move(&mut self, pos: Vec2) {
        self.mouse = pos;
        match self.interaction {
            InteractionState::Snap => self.snap_move(),
            InteractionState::Select => {
                if self.select_mode == SelectMode::Lasso
                    && self.lasso.is_drawing
                    && self.lasso.add_point(pos)
                {
                    self.request_redraw();
                }
            }
            InteractionState::JoinSelectVertex1 | InteractionState::JoinSelectVertex2 => {
                if self.lasso.is_drawing && self.lasso.add_point(pos) {
                    self.request_redraw();
                }
            }
        }
    }

    pub fn on_pointer_up(&mut self) {
        match self.interaction {
            InteractionState::Snap => self.end_snap(),
            InteractionState::Select => match self.select_mode {
                SelectMode::Lasso => {
                    self.process_lasso_region();
                    self.lasso.end();
                    self.setup_select_mode();
                }
                SelectMode::PointPick => {
                    if self.edit_mode == EditMode::Object {
                        self.point_pick();
                    }
                }
            },
            InteractionState::JoinSelectVertex1 | InteractionState::JoinSelectVertex2 => {
                self.process_lasso_region();
                self.lasso.end();

                let Some(id) = self.state.selection.primary().cloned() else {
                    return;
                };
                let picked = self
                    .state
                    .selection
                    .vertex_indices(&id)
                    .map(|v| v.len())
                    .unwrap_or(0);

                if self.interaction == InteractionState::JoinSelectVertex2 {
                    if picked == 2 {
                        self.merge_selected_verts();
                        self.end_merge_vertex_mode();
                    }
                } else if picked == 1 {
                    self.interaction = InteractionState::JoinSelectVertex2;
                }
            }
        }
        self.request_redraw();
    }

    /// Single nearest-hit ray pick at the stored pointer position
    fn point_pick(&mut self) {
        let ray = self.camera.screen_ray(self.mouse, &self.viewport);
        let hits = picking::raycast_scene(&self.state.scene, &ray, None);
        if let Some(hit) = hits.first() {
            let id = hit.node.clone();
            self.select_node(&id);
        }
    }

    /// Evaluate the completed lasso against the scene, per current mode
    fn process_lasso_region(&mut self) {
        if self.lasso.point_count() < 3 {
            return;
        }

        match self.interaction {
            InteractionState::JoinSelectVertex1 | InteractionState::JoinSelectVertex2 => {
                let Some(id) = self.state.selection.primary().cloned() else {
                    return;
                };
                // only the first vertex found counts
                let found = select::vertices_in_lasso(
                    &self.state.scene,
                    &id,
                    &self.camera,
                    &self.viewport,
                    &self.lasso,
                    true,
                );
                self.state.selection.append_vertex_indices(&id, &found);
                let all: Vec<u32> = self
                    .state
                    .selection
                    .vertex_indices(&id)
                    .map(<[u32]>::to_vec)
                    .unwrap_or_default();
                self.state.selection.highlight_verts(&id, &all);
            }
            _ => {
                if self.edit_mode == EditMode::Object {
                    let hits = select::nodes_in_lasso(
                        &self.state.scene,
                        &self.camera,
                        &self.viewport,
                        &self.lasso,
                    );
                    for id in hits {
                        self.select_node(&id);
                    }
                } else {
                    let Some(id) = self.state.selection.primary().cloned() else {
                        return;
                    };
                    let found = select::vertices_in_lasso(
                        &self.state.scene,
                        &id,
                        &self.camera,
                        &self.viewport,
                        &self.lasso,
                        false,
                    );
                    self.state.selection.set_vertex_indices(&id, found.clone());
                    self.state.selection.highlight_verts(&id, &found);
                }
            }
        }
    }
}
