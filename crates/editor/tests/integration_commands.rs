//! Integration tests for the JSON command protocol.

use meshedit_lib::command::{execute_json, execute_json_batch};
use meshedit_lib::fixtures;
use meshedit_lib::harness::Harness;

fn load_two_squares(h: &mut Harness) {
    let scene = serde_json::to_value(fixtures::two_squares_scene_description()).unwrap();
    let cmd = serde_json::json!({ "command": "load_scene", "scene": scene }).to_string();
    let resp = execute_json(h, &cmd).unwrap();
    assert!(resp.success);
}

#[test]
fn test_load_scene_command() {
    let mut h = Harness::new();
    load_two_squares(&mut h);
    assert_eq!(h.node_count(), 2);
}

#[test]
fn test_full_join_session() {
    let mut h = Harness::new();
    load_two_squares(&mut h);

    let responses = execute_json_batch(
        &mut h,
        r#"[
            {"command": "select", "ids": ["left", "right"]},
            {"command": "join"},
            {"command": "inspect"}
        ]"#,
    )
    .unwrap();
    assert!(responses.iter().all(|r| r.success));

    let inspect = responses[2].data.as_ref().unwrap();
    assert_eq!(inspect["node_count"], 1);
    assert_eq!(inspect["selected_count"], 0);
    let merged = &inspect["nodes"][0];
    assert_eq!(merged["vertex_count"], 8);
    assert_eq!(merged["triangle_count"], 4);
}

#[test]
fn test_lasso_command_selects_objects() {
    let mut h = Harness::new();
    load_two_squares(&mut h);

    // big viewport-space lasso over the whole scene
    execute_json(&mut h, r#"{"command": "lasso_mode"}"#).unwrap();
    let resp = execute_json(
        &mut h,
        r#"{"command": "lasso", "points": [[100,100],[700,100],[700,500],[100,500]]}"#,
    )
    .unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["selected_count"], 2);
}

#[test]
fn test_lasso_command_needs_three_points() {
    let mut h = Harness::new();
    load_two_squares(&mut h);
    let resp = execute_json(&mut h, r#"{"command": "lasso", "points": [[0,0],[10,10]]}"#).unwrap();
    assert!(!resp.success);
}

#[test]
fn test_split_session_via_commands() {
    let mut h = Harness::new();
    load_two_squares(&mut h);

    execute_json(&mut h, r#"{"command": "select", "ids": ["left"]}"#).unwrap();
    execute_json(&mut h, r#"{"command": "vertex_mode"}"#).unwrap();

    // select 3 vertices programmatically, then split
    h.editor
        .state
        .selection
        .set_vertex_indices(&"left".to_string(), vec![0, 1, 2]);
    let resp = execute_json(&mut h, r#"{"command": "split"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["node_count"], 3);
}

#[test]
fn test_split_precondition_error_is_reported() {
    let mut h = Harness::new();
    load_two_squares(&mut h);

    // nothing selected
    let resp = execute_json(&mut h, r#"{"command": "split"}"#).unwrap();
    assert!(!resp.success);
    assert!(resp.error.is_some());
    assert_eq!(h.node_count(), 2);
}

#[test]
fn test_begin_merge_vertex_reports_state() {
    let mut h = Harness::new();
    load_two_squares(&mut h);
    execute_json(&mut h, r#"{"command": "select", "ids": ["left"]}"#).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "begin_merge_vertex"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["state"], "join_select_vertex_1");
}

#[test]
fn test_begin_snap_requires_single_selection() {
    let mut h = Harness::new();
    load_two_squares(&mut h);

    // no selection: snap falls straight back to select
    let resp = execute_json(&mut h, r#"{"command": "begin_snap"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["state"], "select");

    execute_json(&mut h, r#"{"command": "select", "ids": ["left"]}"#).unwrap();
    let resp = execute_json(&mut h, r#"{"command": "begin_snap"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["state"], "snap");
}

#[test]
fn test_click_command() {
    let mut h = Harness::new();
    load_two_squares(&mut h);

    let center = h.project(glam::Vec3::new(0.5, 0.25, 0.0));
    let cmd = serde_json::json!({
        "command": "click", "x": center.x, "y": center.y
    })
    .to_string();
    let resp = execute_json(&mut h, &cmd).unwrap();
    assert_eq!(resp.data.unwrap()["selected_count"], 1);
}

#[test]
fn test_export_roundtrip_via_commands() {
    let mut h = Harness::new();
    load_two_squares(&mut h);

    let resp = execute_json(&mut h, r#"{"command": "export_scene"}"#).unwrap();
    let json = resp.data.unwrap()["scene_json"].as_str().unwrap().to_string();

    let mut h2 = Harness::new();
    h2.load_scene_json(&json).unwrap();
    assert_eq!(h2.node_count(), 2);
}
