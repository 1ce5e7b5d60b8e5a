//! Scene Integration Tests
//!
//! Tests for:
//! - Node creation, naming and hierarchy (add_to_parent, attach, cycles)
//! - Depth-first traversal and lookups by name / tag
//! - Ancestor chains with a stop node
//! - Material sharing and copy-on-first-mutation
//! - Draw suppression
//! - World matrix propagation and world bounds

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3, Vec4};
use vitrine::core::{GeometryHandle, MaterialHandle, NodeHandle};
use vitrine::scene::{Geometry, Material, Mesh, Node, Scene};

fn cube(scene: &mut Scene) -> GeometryHandle {
    scene.add_geometry(Geometry::cuboid(Vec3::ONE))
}

fn mesh_node(name: &str, geometry: GeometryHandle, material: MaterialHandle) -> Node {
    Node::with_name(name)
        .with_tag(name)
        .with_mesh(Mesh::new(geometry, [material]))
}

/// Root
/// ├── A
/// │   ├── A1
/// │   └── A2
/// └── B
///     └── B1
fn sample_tree(scene: &mut Scene) -> [NodeHandle; 6] {
    let root = scene.create_node_with_name("Root");
    let a = scene.add_to_parent(Node::with_name("A").with_tag("id-a"), root);
    let a1 = scene.add_to_parent(Node::with_name("A1"), a);
    let a2 = scene.add_to_parent(Node::with_name("A2"), a);
    let b = scene.add_to_parent(Node::with_name("B").with_tag("id-b"), root);
    let b1 = scene.add_to_parent(Node::with_name("B1"), b);
    [root, a, a1, a2, b, b1]
}

// ============================================================================
// Node Creation & Hierarchy
// ============================================================================

#[test]
fn scene_create_node_with_name() {
    let mut scene = Scene::new();
    let handle = scene.create_node_with_name("TestNode");
    assert_eq!(scene.get_name(handle), Some("TestNode"));
    assert!(scene.root_nodes.contains(&handle));
}

#[test]
fn scene_set_name() {
    let mut scene = Scene::new();
    let handle = scene.create_node();
    scene.set_name(handle, "Renamed");
    assert_eq!(scene.get_name(handle), Some("Renamed"));
}

#[test]
fn scene_add_to_parent_links_both_ways() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let child = scene.add_to_parent(Node::new(), parent);

    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
    assert_eq!(scene.get_node(parent).unwrap().children(), &[child]);
    assert!(!scene.root_nodes.contains(&child));
}

#[test]
fn scene_attach_moves_subtree() {
    let mut scene = Scene::new();
    let [root, a, _a1, _a2, b, _b1] = sample_tree(&mut scene);

    scene.attach(a, b);

    assert_eq!(scene.get_node(a).unwrap().parent(), Some(b));
    assert!(!scene.get_node(root).unwrap().children().contains(&a));
    assert!(scene.get_node(b).unwrap().children().contains(&a));
}

#[test]
fn scene_attach_top_level_node_leaves_root_list() {
    let mut scene = Scene::new();
    let model = scene.create_node_with_name("Model");
    let wrapper = scene.create_node_with_name("Wrapper");

    scene.attach(model, wrapper);

    assert_eq!(scene.root_nodes, vec![wrapper]);
}

#[test]
fn scene_attach_refuses_cycles() {
    let mut scene = Scene::new();
    let [root, a, a1, ..] = sample_tree(&mut scene);

    scene.attach(a, a1);
    scene.attach(root, root);

    assert_eq!(scene.get_node(a).unwrap().parent(), Some(root));
    assert_eq!(scene.get_node(root).unwrap().parent(), None);
}

// ============================================================================
// Traversal & Queries
// ============================================================================

#[test]
fn traverse_parent_first_in_child_order() {
    let mut scene = Scene::new();
    let [root, a, a1, a2, b, b1] = sample_tree(&mut scene);

    assert_eq!(scene.descendants(root), vec![root, a, a1, a2, b, b1]);
}

#[test]
fn traverse_visits_each_node_once_with_shared_materials() {
    let mut scene = Scene::new();
    let geometry = cube(&mut scene);
    let shared = scene.add_material(Material::default());

    let root = scene.create_node();
    for i in 0..5 {
        scene.add_to_parent(mesh_node(&format!("m{i}"), geometry, shared), root);
    }

    let mut visited = Vec::new();
    scene.traverse(root, |handle, _| visited.push(handle));

    let mut unique = visited.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(visited.len(), 6);
    assert_eq!(unique.len(), visited.len());
}

#[test]
fn find_by_name_and_tag() {
    let mut scene = Scene::new();
    let [root, a, _a1, _a2, b, b1] = sample_tree(&mut scene);

    assert_eq!(scene.find_by_name(root, "B1"), Some(b1));
    assert_eq!(scene.find_by_tag(root, "id-a"), Some(a));
    assert_eq!(scene.find_by_name(root, "nope"), None);

    // Searches are scoped to the subtree.
    assert_eq!(scene.find_by_tag(b, "id-a"), None);
}

#[test]
fn ancestors_nearest_first_until_stop() {
    let mut scene = Scene::new();
    let [root, a, a1, ..] = sample_tree(&mut scene);

    assert_eq!(scene.ancestors(a1, None), vec![a, root]);
    assert_eq!(scene.ancestors(a1, Some(root)), vec![a]);
    assert!(scene.ancestors(root, None).is_empty());
}

#[test]
fn renderables_and_cameras_in_subtree() {
    let mut scene = Scene::new();
    let geometry = cube(&mut scene);
    let material = scene.add_material(Material::default());

    let root = scene.create_node();
    let m = scene.add_to_parent(mesh_node("M", geometry, material), root);
    let cam_key = scene.add_camera(vitrine::scene::Camera::new_perspective(50.0, 1.0, 0.1, 100.0));
    let cam = scene.add_to_parent(Node::with_name("Cam"), root);
    scene.set_camera(cam, cam_key);

    assert_eq!(scene.renderables_in_subtree(root), vec![m]);
    assert_eq!(scene.cameras_in_subtree(root), vec![cam]);
}

// ============================================================================
// Material Ownership
// ============================================================================

#[test]
fn ensure_unique_materials_clones_shared() {
    let mut scene = Scene::new();
    let geometry = cube(&mut scene);
    let shared = scene.add_material(Material::new(Vec4::new(1.0, 0.0, 0.0, 1.0)));

    let root = scene.create_node();
    let a = scene.add_to_parent(mesh_node("A", geometry, shared), root);
    let b = scene.add_to_parent(mesh_node("B", geometry, shared), root);
    assert_eq!(scene.material_users(shared), 2);

    assert_eq!(scene.ensure_unique_materials(a), 1);

    let a_mat = scene.node_materials(a)[0];
    let b_mat = scene.node_materials(b)[0];
    assert_ne!(a_mat, b_mat);
    assert_eq!(b_mat, shared);
    assert_ne!(scene.material(a_mat).unwrap().uuid, scene.material(b_mat).unwrap().uuid);
    assert_eq!(scene.material(a_mat).unwrap().color, Vec4::new(1.0, 0.0, 0.0, 1.0));
}

#[test]
fn ensure_unique_materials_is_idempotent() {
    let mut scene = Scene::new();
    let geometry = cube(&mut scene);
    let shared = scene.add_material(Material::default());

    let a = scene.add_node(mesh_node("A", geometry, shared));
    scene.add_node(mesh_node("B", geometry, shared));

    assert_eq!(scene.ensure_unique_materials(a), 1);
    let first = scene.node_materials(a)[0];
    assert_eq!(scene.ensure_unique_materials(a), 0);
    assert_eq!(scene.node_materials(a)[0], first);
}

#[test]
fn suppress_draw_does_not_leak_to_sharers() {
    let mut scene = Scene::new();
    let geometry = cube(&mut scene);
    let shared = scene.add_material(Material::default());

    let a = scene.add_node(mesh_node("A", geometry, shared));
    let b = scene.add_node(mesh_node("B", geometry, shared));

    assert!(scene.suppress_draw(a));

    let a_node = scene.get_node(a).unwrap();
    assert!(a_node.is_draw_suppressed());
    assert!(a_node.visible);
    assert!(!a_node.is_drawn());
    assert!(!a_node.cast_shadow && !a_node.receive_shadow);

    let a_mat = scene.material(scene.node_materials(a)[0]).unwrap();
    assert_eq!(a_mat.opacity(), 0.0);
    assert!(a_mat.settings().transparent);
    assert!(!a_mat.settings().depth_write);
    assert!(!a_mat.settings().color_write);

    let b_mat = scene.material(scene.node_materials(b)[0]).unwrap();
    assert_eq!(b_mat.opacity(), 1.0);
    assert!(b_mat.settings().color_write);
    assert!(!scene.get_node(b).unwrap().is_draw_suppressed());
}

#[test]
fn suppress_draw_ignores_nodes_without_geometry() {
    let mut scene = Scene::new();
    let group = scene.create_node();
    assert!(!scene.suppress_draw(group));
    assert!(!scene.get_node(group).unwrap().is_draw_suppressed());
}

// ============================================================================
// Transforms
// ============================================================================

#[test]
fn world_matrix_composes_parent_chain() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let child = scene.add_to_parent(Node::new(), parent);

    scene.get_node_mut(parent).unwrap().transform.position = Vec3::new(1.0, 0.0, 0.0);
    scene.get_node_mut(parent).unwrap().transform.rotation = Quat::from_rotation_z(FRAC_PI_2);
    scene.get_node_mut(child).unwrap().transform.position = Vec3::new(1.0, 0.0, 0.0);
    scene.update_matrix_world();

    let world: Vec3 = scene.get_node(child).unwrap().transform.world_matrix().translation.into();
    assert!((world - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5, "got {world}");
}

#[test]
fn world_matrix_follows_later_changes() {
    let mut scene = Scene::new();
    let parent = scene.create_node();
    let child = scene.add_to_parent(Node::new(), parent);
    scene.update_matrix_world();

    scene.get_node_mut(parent).unwrap().transform.position = Vec3::new(0.0, 5.0, 0.0);
    scene.update_matrix_world();

    let world: Vec3 = scene.get_node(child).unwrap().transform.world_matrix().translation.into();
    assert_eq!(world, Vec3::new(0.0, 5.0, 0.0));
}

#[test]
fn world_bounding_box_covers_meshes() {
    let mut scene = Scene::new();
    let geometry = cube(&mut scene);
    let material = scene.add_material(Material::default());

    let root = scene.create_node();
    let a = scene.add_to_parent(mesh_node("A", geometry, material), root);
    let b = scene.add_to_parent(mesh_node("B", geometry, material), root);
    scene.get_node_mut(a).unwrap().transform.position = Vec3::new(-2.0, 0.0, 0.0);
    scene.get_node_mut(b).unwrap().transform.position = Vec3::new(2.0, 0.0, 0.0);
    scene.update_matrix_world();

    let bounds = scene.world_bounding_box(root).unwrap();
    assert!((bounds.min - Vec3::new(-2.5, -0.5, -0.5)).length() < 1e-5);
    assert!((bounds.max - Vec3::new(2.5, 0.5, 0.5)).length() < 1e-5);

    let empty = scene.create_node();
    assert!(scene.world_bounding_box(empty).is_none());
}
