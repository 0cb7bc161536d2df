//! End-to-end topology editing through the editor: split, join, weld.

use glam::Vec3;
use meshedit_lib::editor::InteractionState;
use meshedit_lib::fixtures;
use meshedit_lib::harness::Harness;

#[test]
fn test_split_via_vertex_lasso() {
    let mut h = Harness::new();
    h.load_scene(&fixtures::single_square_scene_description("sq"));
    let id = "sq".to_string();

    // select the square, enter vertex mode, lasso vertices 0, 1, 2
    h.click_world(Vec3::new(0.5, 0.25, 0.0));
    h.editor.setup_vertex_mode();
    h.editor.setup_lasso_mode();

    // a quad hugging the square's lower-right diagonal half: it encloses
    // vertices 0 (0,0), 1 (1,0) and 2 (1,1) but not 3 (0,1)
    let p0 = h.project(Vec3::new(0.0, 0.0, 0.0));
    let p2 = h.project(Vec3::new(1.0, 1.0, 0.0));
    let p3 = h.project(Vec3::new(0.0, 1.0, 0.0));
    h.drag(&[
        (p0.x - 40.0, p0.y + 20.0),
        (p2.x + 50.0, p3.y - 50.0),
        (p2.x + 70.0, p0.y + 40.0),
        (p0.x - 40.0, p0.y + 40.0),
    ]);

    assert_eq!(
        h.editor.state.selection.vertex_indices(&id).unwrap(),
        &[0, 1, 2]
    );

    assert!(h.editor.split_selected());

    // one triangle stayed, one moved to the new sibling
    assert_eq!(h.node_count(), 2);
    let old_v = h.validate_node(&id).unwrap();
    assert_eq!(old_v.triangle_count(), 1);
    assert_eq!(old_v.vertex_count(), 3);
    assert!(old_v.validate_all().is_empty());

    let new_id = h
        .node_ids()
        .into_iter()
        .find(|n| *n != id)
        .expect("sibling exists");
    let new_v = h.validate_node(&new_id).unwrap();
    assert_eq!(new_v.triangle_count(), 1);
    assert_eq!(new_v.vertex_count(), 3);
    assert!(new_v.validate_all().is_empty());

    // selection fully cleared after the split
    assert_eq!(h.selected_count(), 0);
    assert_eq!(h.selected_vert_count(), 0);
}

#[test]
fn test_split_cube_partition_conservation() {
    let mut h = Harness::new();
    let mut scene = fixtures::single_square_scene_description("cube");
    scene.nodes[0].mesh = Some(fixtures::cube_geometry(1.0).to_description());
    h.load_scene(&scene);
    let id = "cube".to_string();

    h.editor.select_node(&id);
    h.editor.setup_vertex_mode();
    // +Z face vertex ids
    h.editor
        .state
        .selection
        .set_vertex_indices(&id, vec![0, 1, 2, 3]);

    assert!(h.editor.split_selected());

    let ids = h.node_ids();
    let total: usize = ids
        .iter()
        .map(|n| h.validate_node(n).unwrap().triangle_count())
        .sum();
    assert_eq!(total, 12);

    for n in &ids {
        let v = h.validate_node(n).unwrap();
        assert!(v.validate_all().is_empty(), "{n}: {:?}", v.validate_all());
    }
}

#[test]
fn test_join_two_squares_conserves_vertices() {
    let mut h = Harness::new();
    h.load_scene(&fixtures::two_squares_scene_description());

    h.editor.select_node(&"left".to_string());
    h.editor.select_node(&"right".to_string());
    assert!(h.editor.join_selected());

    assert_eq!(h.node_count(), 1);
    let merged = h.node_ids().pop().unwrap();
    let v = h.validate_node(&merged).unwrap();
    assert_eq!(v.vertex_count(), 8);
    assert_eq!(v.triangle_count(), 4);
    assert!(v.are_indices_in_range());
    assert!(v.validate_all().is_empty());

    // the right square's world offset got baked in
    assert!(v.assert_dimensions_approx([4.0, 1.0, 0.0], 1e-4));
}

#[test]
fn test_join_order_matters_for_materials() {
    let mut h = Harness::new();
    let mut desc = fixtures::two_squares_scene_description();
    desc.nodes[0].material = Some(shared::MaterialDescription {
        name: Some("red".to_string()),
        color: [1.0, 0.0, 0.0],
    });
    desc.nodes[1].material = Some(shared::MaterialDescription {
        name: Some("green".to_string()),
        color: [0.0, 1.0, 0.0],
    });
    h.load_scene(&desc);

    // selection order: right first, then left
    h.editor.select_node(&"right".to_string());
    h.editor.select_node(&"left".to_string());
    assert!(h.editor.join_selected());

    let merged = h.node_ids().pop().unwrap();
    let node = h.editor.state.scene.get_node(&merged).unwrap();
    assert_eq!(node.materials[0].color, [0.0, 1.0, 0.0]);
    assert_eq!(node.materials[1].color, [1.0, 0.0, 0.0]);
}

#[test]
fn test_weld_via_two_lasso_picks() {
    let mut h = Harness::new();
    h.load_scene(&fixtures::single_square_scene_description("sq"));
    let id = "sq".to_string();

    h.click_world(Vec3::new(0.5, 0.25, 0.0));
    h.editor.begin_merge_vertex_mode();
    assert_eq!(h.editor.interaction(), InteractionState::JoinSelectVertex1);

    // pick vertex 1 at (1,0), then vertex 3 at (0,1)
    h.lasso_around_world(Vec3::new(1.0, 0.0, 0.0), 25.0);
    assert_eq!(h.editor.interaction(), InteractionState::JoinSelectVertex2);

    h.lasso_around_world(Vec3::new(0.0, 1.0, 0.0), 25.0);
    assert_eq!(h.editor.interaction(), InteractionState::Select);

    let v = h.validate_node(&id).unwrap();
    // buffer length unchanged, vertex count unchanged, index 1 gone
    assert_eq!(v.vertex_count(), 4);
    let geo = h.editor.state.scene.node_geometry(&id).unwrap();
    let indices = geo.indices.as_ref().unwrap();
    assert_eq!(indices.len(), 6);
    assert!(indices.iter().all(|&i| i != 1));
    assert!(v.are_indices_in_range());
}

#[test]
fn test_weld_rejected_on_non_indexed_mesh() {
    let mut h = Harness::new();
    let desc = shared::SceneDescription {
        nodes: vec![shared::NodeDescription {
            id: Some("raw".to_string()),
            name: "raw".to_string(),
            mesh: Some(fixtures::non_indexed_mesh_description()),
            ..Default::default()
        }],
    };
    h.load_scene(&desc);
    let id = "raw".to_string();

    h.editor.select_node(&id);
    h.editor.begin_merge_vertex_mode();
    h.lasso_around_world(Vec3::new(1.0, 0.0, 0.0), 25.0);
    h.lasso_around_world(Vec3::new(0.0, 1.0, 0.0), 25.0);

    // the weld no-ops; the mesh stays non-indexed and untouched
    let geo = h.editor.state.scene.node_geometry(&id).unwrap();
    assert!(geo.indices.is_none());
    assert_eq!(geo.vertex_count(), 3);
    // and the editor returned to the select state
    assert_eq!(h.editor.interaction(), InteractionState::Select);
}

#[test]
fn test_split_then_join_restores_triangle_count() {
    let mut h = Harness::new();
    h.load_scene(&fixtures::single_square_scene_description("sq"));
    let id = "sq".to_string();

    h.editor.select_node(&id);
    h.editor.setup_vertex_mode();
    h.editor.state.selection.set_vertex_indices(&id, vec![0, 1, 2]);
    assert!(h.editor.split_selected());
    assert_eq!(h.node_count(), 2);

    let ids = h.node_ids();
    h.editor.select_node(&ids[0]);
    h.editor.select_node(&ids[1]);
    assert!(h.editor.join_selected());

    assert_eq!(h.node_count(), 1);
    let merged = h.node_ids().pop().unwrap();
    let v = h.validate_node(&merged).unwrap();
    assert_eq!(v.triangle_count(), 2);
    assert_eq!(v.vertex_count(), 6);
}
