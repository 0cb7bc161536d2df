//! JSON command protocol for driving the editor headlessly (scripting,
//! the binary's stdin loop, integration tests).

use serde::{Deserialize, Serialize};
use shared::SceneDescription;

use crate::editor::{EditMode, InteractionState, SelectMode};
use crate::harness::Harness;
use crate::state::scene::node_display_name;

/// A command the host can execute
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Replace the scene
    LoadScene { scene: SceneDescription },
    /// List nodes and selection state
    Inspect,
    /// Select nodes by id (adds to the current selection, in order)
    Select { ids: Vec<String> },
    ClearSelection,
    /// Switch pointer-up handling to lasso selection
    LassoMode,
    /// Switch back to point-pick selection
    SelectMode,
    /// Drive a full lasso gesture over the given viewport points
    Lasso { points: Vec<[f32; 2]> },
    /// Click at a viewport position
    Click { x: f32, y: f32 },
    /// Enter vertex-level editing on the selected node
    VertexMode,
    ObjectMode,
    /// Start the two-step vertex pick that ends in a weld
    BeginMergeVertex,
    Split,
    Join,
    BeginSnap,
    ExportScene,
}

/// Response from executing a command
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn interaction_name(state: InteractionState) -> &'static str {
    match state {
        InteractionState::Select => "select",
        InteractionState::Snap => "snap",
        InteractionState::JoinSelectVertex1 => "join_select_vertex_1",
        InteractionState::JoinSelectVertex2 => "join_select_vertex_2",
    }
}

/// Execute a single command on the harness
pub fn execute_command(harness: &mut Harness, cmd: EditorCommand) -> CommandResponse {
    match cmd {
        EditorCommand::LoadScene { scene } => {
            harness.load_scene(&scene);
            CommandResponse::ok_with_data(serde_json::json!({
                "node_count": harness.node_count(),
            }))
        }

        EditorCommand::Inspect => {
            let editor = &harness.editor;
            let mut nodes: Vec<serde_json::Value> = editor
                .state
                .scene
                .iter_nodes()
                .map(|(id, node)| {
                    let geometry = editor.state.scene.node_geometry(id);
                    serde_json::json!({
                        "id": id,
                        "name": node_display_name(node),
                        "vertex_count": geometry.map(|g| g.vertex_count()).unwrap_or(0),
                        "triangle_count": geometry.map(|g| g.triangle_count()).unwrap_or(0),
                        "selected": editor.state.selection.is_selected(id),
                    })
                })
                .collect();
            nodes.sort_by_key(|n| n["id"].as_str().map(str::to_string));

            CommandResponse::ok_with_data(serde_json::json!({
                "node_count": harness.node_count(),
                "selected_count": harness.selected_count(),
                "selected_verts": harness.selected_vert_count(),
                "state": interaction_name(editor.interaction()),
                "lasso_mode": editor.select_mode() == SelectMode::Lasso,
                "vertex_mode": editor.edit_mode() == EditMode::Vertex,
                "nodes": nodes,
            }))
        }

        EditorCommand::Select { ids } => {
            let mut missing = Vec::new();
            for id in &ids {
                if harness.editor.state.scene.contains_node(id) {
                    harness.editor.select_node(id);
                } else {
                    missing.push(id.clone());
                }
            }
            if missing.is_empty() {
                CommandResponse::ok_with_data(serde_json::json!({ "selected": ids }))
            } else {
                CommandResponse::err(format!("unknown nodes: {missing:?}"))
            }
        }

        EditorCommand::ClearSelection => {
            harness.editor.clear_selected();
            CommandResponse::ok()
        }

        EditorCommand::LassoMode => {
            harness.editor.setup_lasso_mode();
            CommandResponse::ok()
        }

        EditorCommand::SelectMode => {
            harness.editor.setup_select_mode();
            CommandResponse::ok()
        }

        EditorCommand::Lasso { points } => {
            if points.len() < 3 {
                return CommandResponse::err("lasso needs at least 3 points");
            }
            let path: Vec<(f32, f32)> = points.iter().map(|p| (p[0], p[1])).collect();
            harness.drag(&path);
            CommandResponse::ok_with_data(serde_json::json!({
                "selected_count": harness.selected_count(),
                "selected_verts": harness.selected_vert_count(),
            }))
        }

        EditorCommand::Click { x, y } => {
            harness.click(x, y);
            CommandResponse::ok_with_data(serde_json::json!({
                "selected_count": harness.selected_count(),
            }))
        }

        EditorCommand::VertexMode => {
            harness.editor.setup_vertex_mode();
            CommandResponse::ok()
        }

        EditorCommand::ObjectMode => {
            harness.editor.switch_to_object_mode();
            CommandResponse::ok()
        }

        EditorCommand::BeginMergeVertex => {
            harness.editor.begin_merge_vertex_mode();
            CommandResponse::ok_with_data(serde_json::json!({
                "state": interaction_name(harness.editor.interaction()),
            }))
        }

        EditorCommand::Split => {
            if harness.editor.split_selected() {
                CommandResponse::ok_with_data(serde_json::json!({
                    "node_count": harness.node_count(),
                }))
            } else {
                CommandResponse::err("split preconditions not met")
            }
        }

        EditorCommand::Join => {
            if harness.editor.join_selected() {
                CommandResponse::ok_with_data(serde_json::json!({
                    "node_count": harness.node_count(),
                }))
            } else {
                CommandResponse::err("join preconditions not met")
            }
        }

        EditorCommand::BeginSnap => {
            harness.editor.begin_snap();
            CommandResponse::ok_with_data(serde_json::json!({
                "state": interaction_name(harness.editor.interaction()),
            }))
        }

        EditorCommand::ExportScene => {
            CommandResponse::ok_with_data(serde_json::json!({
                "scene_json": harness.export_scene_json(),
            }))
        }
    }
}

/// Parse and execute a single JSON command string
pub fn execute_json(harness: &mut Harness, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array)
pub fn execute_json_batch(
    harness: &mut Harness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
