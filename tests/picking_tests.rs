//! Picking Tests
//!
//! Tests for:
//! - Ray / BoundingBox / Geometry intersection
//! - Candidate generation (hidden and draw-suppressed meshes excluded)
//! - Nearest-hit resolution
//! - Precise vs Branch selection
//! - Camera rays from screen coordinates

use glam::{Vec2, Vec3};
use vitrine::core::NodeHandle;
use vitrine::scene::{
    BoundingBox, Camera, Geometry, Material, Mesh, Node, PickMode, PickResolver, Ray, Scene,
    Selection, screen_to_ndc,
};

/// Model
/// ├── P
/// │   ├── L1 (cube at x = 0)
/// │   └── L2 (cube at x = 3)
/// └── Q
///     └── R (cube at x = -3)
struct Fixture {
    scene: Scene,
    model: NodeHandle,
    p: NodeHandle,
    l1: NodeHandle,
    l2: NodeHandle,
    r: NodeHandle,
}

fn fixture() -> Fixture {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(Geometry::cuboid(Vec3::ONE));
    let material = scene.add_material(Material::default());
    let cube_at = |name: &str, x: f32| {
        let mut node = Node::with_name(name).with_tag(name).with_mesh(Mesh::new(geometry, [material]));
        node.transform.position = Vec3::new(x, 0.0, 0.0);
        node
    };

    let model = scene.create_node_with_name("Model");
    let p = scene.add_to_parent(Node::with_name("P"), model);
    let l1 = scene.add_to_parent(cube_at("L1", 0.0), p);
    let l2 = scene.add_to_parent(cube_at("L2", 3.0), p);
    let q = scene.add_to_parent(Node::with_name("Q"), model);
    let r = scene.add_to_parent(cube_at("R", -3.0), q);
    scene.update_matrix_world();

    Fixture {
        scene,
        model,
        p,
        l1,
        l2,
        r,
    }
}

fn ray_down_z_at(x: f32) -> Ray {
    Ray::new(Vec3::new(x, 0.0, 10.0), Vec3::NEG_Z)
}

// ============================================================================
// Intersection primitives
// ============================================================================

#[test]
fn bounding_box_slab_test() {
    let bbox = BoundingBox::from_points([Vec3::splat(-1.0), Vec3::splat(1.0)]).unwrap();

    let t = bbox.intersect_ray(&Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z)).unwrap();
    assert!((t - 4.0).abs() < 1e-5);

    assert!(bbox.intersect_ray(&Ray::new(Vec3::new(0.0, 3.0, 5.0), Vec3::NEG_Z)).is_none());
    // Pointing away
    assert!(bbox.intersect_ray(&Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z)).is_none());
}

#[test]
fn geometry_hits_nearest_triangle() {
    let cube = Geometry::cuboid(Vec3::splat(2.0));
    let t = cube.intersect_ray(&Ray::new(Vec3::new(0.2, 0.3, 5.0), Vec3::NEG_Z)).unwrap();
    assert!((t - 4.0).abs() < 1e-5, "got {t}");
}

#[test]
fn ray_direction_is_normalized() {
    let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0));
    assert!((ray.direction.length() - 1.0).abs() < 1e-6);
    assert_eq!(ray.at(2.0), Vec3::new(0.0, 0.0, -2.0));
}

// ============================================================================
// Candidates & Raycast
// ============================================================================

#[test]
fn candidates_are_drawn_meshes() {
    let f = fixture();
    let picker = PickResolver::new(f.model);
    assert_eq!(picker.candidates(&f.scene), vec![f.l1, f.l2, f.r]);
}

#[test]
fn raycast_reports_world_distance() {
    let f = fixture();
    let picker = PickResolver::new(f.model);

    let (hit, _) = picker.pick(&f.scene, &ray_down_z_at(3.0), PickMode::Precise);
    let hit = hit.unwrap();
    assert_eq!(hit.node, f.l2);
    assert!((hit.distance - 9.5).abs() < 1e-4, "got {}", hit.distance);
    assert!((hit.point - Vec3::new(3.0, 0.0, 0.5)).length() < 1e-4);
}

#[test]
fn raycast_picks_nearest_candidate() {
    let mut f = fixture();
    // Move L2 right behind L1.
    f.scene.get_node_mut(f.l2).unwrap().transform.position = Vec3::new(0.0, 0.0, -3.0);
    f.scene.update_matrix_world();

    let picker = PickResolver::new(f.model);
    let (hit, _) = picker.pick(&f.scene, &ray_down_z_at(0.0), PickMode::Precise);
    assert_eq!(hit.unwrap().node, f.l1);
}

#[test]
fn draw_suppressed_meshes_are_not_pickable() {
    let mut f = fixture();
    f.scene.get_node_mut(f.l2).unwrap().transform.position = Vec3::new(0.0, 0.0, -3.0);
    f.scene.update_matrix_world();
    f.scene.suppress_draw(f.l1);

    let picker = PickResolver::new(f.model);
    assert!(f.scene.get_node(f.l1).unwrap().visible);
    assert!(!picker.candidates(&f.scene).contains(&f.l1));

    let (hit, _) = picker.pick(&f.scene, &ray_down_z_at(0.0), PickMode::Precise);
    assert_eq!(hit.unwrap().node, f.l2);
}

#[test]
fn hidden_meshes_are_not_pickable() {
    let mut f = fixture();
    f.scene.get_node_mut(f.l1).unwrap().visible = false;

    let picker = PickResolver::new(f.model);
    let (hit, selection) = picker.pick(&f.scene, &ray_down_z_at(0.0), PickMode::Precise);
    assert!(hit.is_none());
    assert!(selection.is_empty());
}

#[test]
fn miss_yields_empty_selection() {
    let f = fixture();
    let picker = PickResolver::new(f.model);
    let (hit, selection) = picker.pick(&f.scene, &ray_down_z_at(50.0), PickMode::Branch);
    assert!(hit.is_none());
    assert_eq!(selection, Selection::new());
}

// ============================================================================
// Selection Modes
// ============================================================================

#[test]
fn precise_selects_hit_node_only() {
    let f = fixture();
    let picker = PickResolver::new(f.model);
    let (_, selection) = picker.pick(&f.scene, &ray_down_z_at(0.0), PickMode::Precise);
    assert_eq!(selection.nodes(), &[f.l1]);
}

#[test]
fn branch_selects_renderables_under_nearest_branching_ancestor() {
    let f = fixture();
    let picker = PickResolver::new(f.model);

    assert_eq!(picker.branch_root(&f.scene, f.l1), f.p);

    let (_, selection) = picker.pick(&f.scene, &ray_down_z_at(0.0), PickMode::Branch);
    assert_eq!(selection.len(), 2);
    assert!(selection.contains(f.l1));
    assert!(selection.contains(f.l2));
    assert!(!selection.contains(f.r));
}

#[test]
fn branch_without_branching_ancestor_selects_hit_node() {
    let f = fixture();
    let picker = PickResolver::new(f.model);

    // Q has a single child and the model root itself is never a branch.
    assert_eq!(picker.branch_root(&f.scene, f.r), f.r);

    let (_, selection) = picker.pick(&f.scene, &ray_down_z_at(-3.0), PickMode::Branch);
    assert_eq!(selection.nodes(), &[f.r]);
}

#[test]
fn branch_selection_includes_hidden_siblings() {
    let mut f = fixture();
    f.scene.get_node_mut(f.l2).unwrap().visible = false;

    let picker = PickResolver::new(f.model);
    let (_, selection) = picker.pick(&f.scene, &ray_down_z_at(0.0), PickMode::Branch);
    assert!(selection.contains(f.l2));
}

#[test]
fn picking_does_not_touch_scene_state() {
    let f = fixture();
    let picker = PickResolver::new(f.model);
    let before: Vec<bool> = f.scene.nodes.values().map(|n| n.visible).collect();

    let _ = picker.pick(&f.scene, &ray_down_z_at(0.0), PickMode::Branch);

    let after: Vec<bool> = f.scene.nodes.values().map(|n| n.visible).collect();
    assert_eq!(before, after);
    let material = f.scene.node_materials(f.l1)[0];
    assert_eq!(f.scene.material(material).unwrap().opacity(), 1.0);
}

// ============================================================================
// Camera rays
// ============================================================================

#[test]
fn screen_center_maps_to_ndc_origin() {
    let viewport = Vec2::new(800.0, 600.0);
    assert_eq!(screen_to_ndc(Vec2::new(400.0, 300.0), viewport), Vec2::ZERO);
    assert_eq!(screen_to_ndc(Vec2::ZERO, viewport), Vec2::new(-1.0, 1.0));
    assert_eq!(screen_to_ndc(viewport, viewport), Vec2::new(1.0, -1.0));
}

#[test]
fn camera_ray_through_center_hits_model() {
    let mut f = fixture();
    let key = f.scene.add_camera(Camera::new_perspective(50.0, 4.0 / 3.0, 0.1, 100.0));
    let mut camera_node = Node::with_name("Camera");
    camera_node.camera = Some(key);
    camera_node.transform.position = Vec3::new(0.0, 0.0, 10.0);
    let camera = f.scene.add_node(camera_node);
    f.scene.update_matrix_world();

    let ray = f.scene.camera_of(camera).unwrap().ray_from_ndc(Vec2::ZERO);
    assert!((ray.origin - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-4);
    assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);

    let picker = PickResolver::new(f.model);
    let (hit, _) = picker.pick(&f.scene, &ray, PickMode::Precise);
    assert_eq!(hit.unwrap().node, f.l1);
}
