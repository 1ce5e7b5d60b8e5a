//! Asset Tests
//!
//! Tests for:
//! - AnimationDescription parsing, lenient per-entry handling
//! - Visibility policy and caption parsing
//! - SceneDocument hierarchy population (tags, materials, cameras)
//! - Loading through AssetReaderVariant

use glam::Vec3;
use serde_json::json;
use vitrine::animation::{TargetPath, TrackData};
use vitrine::assets::{
    AnimationDescription, AssetReaderVariant, MemoryAssetReader, SceneDocument, SceneProvider,
    TrackKind, active_captions, load_description, load_scene_document,
};
use vitrine::core::VitrineError;
use vitrine::scene::{Scene, VisibilityMode};

fn description(value: &serde_json::Value) -> AnimationDescription {
    AnimationDescription::from_value("anim.json", value).expect("valid description")
}

// ============================================================================
// AnimationDescription
// ============================================================================

#[test]
fn description_parses_tracks_and_alpha_tracks() {
    let desc = description(&json!({
        "name": "Assembly",
        "duration": 4.0,
        "tracks": [
            { "type": "vector", "name": "Cube.position", "times": [0, 1], "values": [0, 0, 0, 1, 2, 3] },
            { "type": "quaternion", "name": "Cube.quaternion", "times": [0], "values": [0, 0, 0, 1] }
        ],
        "alpha_tracks": [
            { "node": "Cube", "times": [0, 1], "values": [1, 0] }
        ]
    }));

    assert_eq!(desc.name, "Assembly");
    assert_eq!(desc.duration, 4.0);
    assert_eq!(desc.tracks.len(), 2);
    assert_eq!(desc.tracks[0].kind, TrackKind::Vector);
    assert_eq!(desc.alpha_tracks.len(), 1);

    let clip = desc.build_clip();
    assert_eq!(clip.duration, 4.0);
    assert_eq!(clip.tracks.len(), 2);
    assert_eq!(clip.tracks[0].meta.node_name, "Cube");
    assert_eq!(clip.tracks[0].meta.target, TargetPath::Translation);
    let TrackData::Vector3(track) = &clip.tracks[0].data else {
        panic!("expected a vector track");
    };
    assert_eq!(track.values[1], Vec3::new(1.0, 2.0, 3.0));

    let opacity = desc.opacity_tracks();
    assert_eq!(opacity.len(), 1);
    assert_eq!(opacity[0].0, "Cube");
    assert_eq!(opacity[0].1.sample(0.5), Some(0.5));
}

#[test]
fn description_skips_malformed_entries() {
    let desc = description(&json!({
        "tracks": [
            { "name": "NoType.position", "times": [0], "values": [0, 0, 0] },
            { "type": "vector", "name": "BadTimes.position", "times": "nope", "values": [] },
            { "type": "vector", "name": "Ok.position", "times": [0, 1], "values": [0, 0, 0, 1, 1, 1] },
            { "type": "vector", "name": "ShortValues.position", "times": [0, 1], "values": [0, 0, 0] },
            { "type": "number", "name": "nodot", "times": [0], "values": [1] },
            "not even an object"
        ],
        "alpha_tracks": [
            { "times": [0], "values": [1] },
            { "node": "", "times": [0], "values": [1] },
            { "node": "Mismatch", "times": [0, 1], "values": [1] },
            { "node": "Fine", "times": [0, 1], "values": [1, 0] }
        ]
    }));

    // Three entries parse; two of them cannot become clip tracks.
    assert_eq!(desc.tracks.len(), 3);
    let clip = desc.build_clip();
    assert_eq!(clip.tracks.len(), 1);
    assert_eq!(clip.tracks[0].meta.node_name, "Ok");

    let opacity = desc.opacity_tracks();
    assert_eq!(opacity.len(), 1);
    assert_eq!(opacity[0].0, "Fine");
}

#[test]
fn description_derives_duration_when_missing() {
    let desc = description(&json!({
        "tracks": [
            { "type": "number", "name": "Lid.userData.glow", "times": [0, 2.5], "values": [0, 1] }
        ]
    }));
    assert_eq!(desc.name, "clip");
    assert_eq!(desc.build_clip().duration, 2.5);
}

#[test]
fn description_keeps_only_usable_frame_rates() {
    assert_eq!(description(&json!({ "fps": 24 })).fps, Some(24.0));
    assert_eq!(description(&json!({})).fps, None);
    assert_eq!(description(&json!({ "fps": 0 })).fps, None);
    assert_eq!(description(&json!({ "fps": -30 })).fps, None);
    assert_eq!(description(&json!({ "fps": "fast" })).fps, None);
}

#[test]
fn description_requires_an_object() {
    let err = AnimationDescription::from_value("anim.json", &json!([1, 2, 3])).unwrap_err();
    assert!(matches!(err, VitrineError::InvalidDocument { .. }));

    let err = AnimationDescription::from_slice("anim.json", b"{ not json").unwrap_err();
    assert!(matches!(err, VitrineError::Json(_)));
}

#[test]
fn visibility_defaults_to_all() {
    let desc = description(&json!({ "visible_nodes": ["a"] }));
    assert_eq!(desc.visibility.mode, VisibilityMode::All);

    let desc = description(&json!({ "visible_nodes_mode": "ALL", "visible_nodes": ["a"] }));
    assert_eq!(desc.visibility.mode, VisibilityMode::All);
}

#[test]
fn visibility_selected_accepts_strings_and_numbers() {
    let desc = description(&json!({
        "visible_nodes_mode": "SELECTED",
        "visible_nodes": ["12", 7, null, { "id": 3 }]
    }));
    assert_eq!(desc.visibility.mode, VisibilityMode::Selected);
    assert_eq!(desc.visibility.targets.len(), 2);
    assert!(desc.visibility.targets.contains("12"));
    assert!(desc.visibility.targets.contains("7"));
}

// ============================================================================
// Captions
// ============================================================================

#[test]
fn captions_resolve_nested_chain() {
    let desc = description(&json!({
        "markers_text": [
            { "id": "1.", "start": 0.0, "end": 2.0, "text": "Intro", "children": [
                { "id": "1.1.", "start": 0.0, "end": 1.0, "text": "Open lid" },
                { "id": "1.2.", "start": 1.0, "end": 2.0, "text": "Remove screws" }
            ]},
            { "id": "2.", "start": 2.0, "end": 5.0, "text": "Assembly" },
            { "id": "broken" }
        ]
    }));
    assert_eq!(desc.captions.len(), 2);

    let ids = |t: f32| -> Vec<String> {
        active_captions(&desc.captions, t)
            .into_iter()
            .map(|c| c.id.clone())
            .collect()
    };

    assert_eq!(ids(0.5), vec!["1.", "1.1."]);
    assert_eq!(ids(1.0), vec!["1.", "1.2."]);
    assert_eq!(ids(2.0), vec!["2."]);
    assert!(ids(7.0).is_empty());
}

// ============================================================================
// SceneDocument
// ============================================================================

fn scene_json() -> serde_json::Value {
    json!({
        "materials": [ { "name": "steel", "color": [0.5, 0.5, 0.5, 1.0] } ],
        "geometries": [ { "positions": [-1, -1, -1, 1, 1, 1] } ],
        "root": {
            "name": "Scene",
            "gltf_id": "root",
            "children": [
                { "name": "Cube", "gltf_id": 12, "translation": [1, 2, 3],
                  "mesh": { "geometry": 0, "materials": [0] } },
                { "name": "Twin", "gltf_id": "twin",
                  "mesh": { "geometry": 0, "materials": [0, 9] } },
                { "name": "Broken", "mesh": { "geometry": 4, "materials": [0] } },
                { "name": "Camera", "camera": { "type": "perspective", "fov": 40 } },
                { "name": "Helper", "visible": false }
            ]
        }
    })
}

#[test]
fn scene_document_builds_hierarchy() {
    let doc = SceneDocument::from_slice("model.json", scene_json().to_string().as_bytes()).unwrap();
    let mut scene = Scene::new();
    let model = doc.populate(&mut scene).unwrap();

    let children = scene.get_node(model.root).unwrap().children().to_vec();
    assert_eq!(children.len(), 5);
    assert_eq!(scene.get_node(model.root).unwrap().tag.as_deref(), Some("root"));

    let cube = scene.find_by_name(model.root, "Cube").unwrap();
    let cube_node = scene.get_node(cube).unwrap();
    assert_eq!(cube_node.tag.as_deref(), Some("12"));
    assert_eq!(cube_node.transform.position, Vec3::new(1.0, 2.0, 3.0));
    assert!(cube_node.is_renderable());

    let helper = scene.find_by_name(model.root, "Helper").unwrap();
    assert!(!scene.get_node(helper).unwrap().visible);
    assert!(scene.get_node(helper).unwrap().tag.is_none());
}

#[test]
fn scene_document_shares_materials_by_index() {
    let doc = SceneDocument::from_slice("model.json", scene_json().to_string().as_bytes()).unwrap();
    let mut scene = Scene::new();
    let model = doc.populate(&mut scene).unwrap();

    let cube = scene.find_by_name(model.root, "Cube").unwrap();
    let twin = scene.find_by_name(model.root, "Twin").unwrap();

    // The out-of-range material slot is dropped.
    assert_eq!(scene.node_materials(twin).len(), 1);
    assert_eq!(scene.node_materials(cube)[0], scene.node_materials(twin)[0]);
    assert_eq!(scene.material_users(scene.node_materials(cube)[0]), 2);
}

#[test]
fn scene_document_drops_meshes_with_missing_geometry() {
    let doc = SceneDocument::from_slice("model.json", scene_json().to_string().as_bytes()).unwrap();
    let mut scene = Scene::new();
    let model = doc.populate(&mut scene).unwrap();

    let broken = scene.find_by_name(model.root, "Broken").unwrap();
    assert!(!scene.get_node(broken).unwrap().is_renderable());
}

#[test]
fn scene_document_collects_cameras() {
    let doc = SceneDocument::from_slice("model.json", scene_json().to_string().as_bytes()).unwrap();
    let mut scene = Scene::new();
    let model = doc.populate(&mut scene).unwrap();

    assert_eq!(model.cameras.len(), 1);
    let camera = scene.camera_of(model.cameras[0]).unwrap();
    assert!((camera.fov - 40.0_f32.to_radians()).abs() < 1e-6);
}

#[test]
fn scene_document_requires_root() {
    let err = SceneDocument::from_slice("model.json", br#"{ "materials": [] }"#).unwrap_err();
    assert!(matches!(err, VitrineError::InvalidDocument { .. }));
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn load_from_memory_reader() {
    let reader = AssetReaderVariant::from_memory(
        MemoryAssetReader::new()
            .with_file("model/model.json", scene_json().to_string())
            .with_file("anim/a.json", json!({ "name": "A" }).to_string()),
    );

    let doc = pollster::block_on(load_scene_document(&reader, "model/model.json")).unwrap();
    assert_eq!(doc.root.name, "Scene");

    let desc = pollster::block_on(load_description(&reader, "anim/a.json")).unwrap();
    assert_eq!(desc.name, "A");
}

#[test]
fn load_missing_asset_is_not_found() {
    let reader = AssetReaderVariant::from_memory(MemoryAssetReader::new());
    let err = pollster::block_on(load_description(&reader, "anim/missing.json")).unwrap_err();
    assert!(matches!(err, VitrineError::AssetNotFound(_)));
}
