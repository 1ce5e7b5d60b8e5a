//! Scene hierarchy documents.
//!
//! The loader that turns a binary model into a node tree is outside this
//! crate; it hands over a [`SceneDocument`] (or any other
//! [`SceneProvider`]). Material and geometry entries are referenced by index,
//! so several meshes can share one material, as they do in the source asset.

use glam::{Quat, Vec3, Vec4};
use serde::Deserialize;
use serde_json::Value;
use smallvec::SmallVec;
use vitrine_core::{GeometryHandle, MaterialHandle, NodeHandle, Result, VitrineError};
use vitrine_scene::{Camera, Geometry, Material, Mesh, Node, Scene, Transform};

/// What a provider adds to the scene.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub root: NodeHandle,
    /// Camera nodes embedded in the model, in traversal order.
    pub cameras: Vec<NodeHandle>,
}

/// Source of a node hierarchy.
pub trait SceneProvider {
    fn populate(&self, scene: &mut Scene) -> Result<LoadedModel>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeometryDocument {
    pub positions: Vec<f32>,
    #[serde(default)]
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeshDocument {
    pub geometry: usize,
    #[serde(default)]
    pub materials: Vec<usize>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraKind {
    #[default]
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraDocument {
    #[serde(rename = "type", default)]
    pub kind: CameraKind,
    /// Vertical field of view, degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default)]
    pub aspect: Option<f32>,
    #[serde(default = "default_ortho_size")]
    pub ortho_size: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeDocument {
    #[serde(default)]
    pub name: String,
    /// Asset-level identity; strings and numbers are accepted.
    #[serde(default)]
    pub gltf_id: Option<Value>,
    #[serde(default)]
    pub translation: Option<[f32; 3]>,
    /// `x, y, z, w`
    #[serde(default)]
    pub rotation: Option<[f32; 4]>,
    #[serde(default)]
    pub scale: Option<[f32; 3]>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub mesh: Option<MeshDocument>,
    #[serde(default)]
    pub camera: Option<CameraDocument>,
    #[serde(default)]
    pub children: Vec<NodeDocument>,
}

impl NodeDocument {
    /// The node's tag. Empty strings and non-scalar ids are ignored.
    #[must_use]
    pub fn tag(&self) -> Option<String> {
        match self.gltf_id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn transform(&self) -> Transform {
        Transform::from_trs(
            self.translation.map_or(Vec3::ZERO, Vec3::from),
            self.rotation
                .map_or(Quat::IDENTITY, |r| Quat::from_array(r).normalize()),
            self.scale.map_or(Vec3::ONE, Vec3::from),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub materials: Vec<MaterialDocument>,
    #[serde(default)]
    pub geometries: Vec<GeometryDocument>,
    pub root: NodeDocument,
}

impl SceneDocument {
    pub fn from_slice(uri: &str, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| VitrineError::InvalidDocument {
            uri: uri.to_string(),
            reason: e.to_string(),
        })
    }
}

struct Resources {
    materials: Vec<MaterialHandle>,
    geometries: Vec<Option<GeometryHandle>>,
}

impl SceneProvider for SceneDocument {
    fn populate(&self, scene: &mut Scene) -> Result<LoadedModel> {
        let materials = self
            .materials
            .iter()
            .map(|doc| {
                let mut material = Material::new(Vec4::from_array(doc.color)).with_name(&doc.name);
                material.set_opacity(doc.opacity);
                scene.add_material(material)
            })
            .collect();

        let geometries = self
            .geometries
            .iter()
            .enumerate()
            .map(|(i, doc)| {
                if doc.positions.len() % 3 != 0 {
                    log::warn!("Geometry {i}: position count is not a multiple of 3, skipped");
                    return None;
                }
                let positions = doc
                    .positions
                    .chunks_exact(3)
                    .map(Vec3::from_slice)
                    .collect();
                Some(scene.add_geometry(Geometry::new(positions, doc.indices.clone())))
            })
            .collect();

        let resources = Resources { materials, geometries };

        let root_node = build_node(scene, &resources, &self.root);
        let root = scene.add_node(root_node);
        let mut pending: Vec<(NodeHandle, &NodeDocument)> = vec![(root, &self.root)];
        while let Some((parent, doc)) = pending.pop() {
            for child_doc in &doc.children {
                let child = build_node(scene, &resources, child_doc);
                let handle = scene.add_to_parent(child, parent);
                pending.push((handle, child_doc));
            }
        }

        let cameras = scene.cameras_in_subtree(root);
        log::info!(
            "Scene document: {} nodes, {} materials, {} cameras",
            scene.descendants(root).len(),
            resources.materials.len(),
            cameras.len()
        );

        Ok(LoadedModel { root, cameras })
    }
}

fn build_node(scene: &mut Scene, resources: &Resources, doc: &NodeDocument) -> Node {
    let mut node = Node::with_name(&doc.name);
    node.tag = doc.tag();
    node.transform = doc.transform();
    if let Some(visible) = doc.visible {
        node.visible = visible;
    }

    if let Some(mesh_doc) = &doc.mesh {
        node.mesh = build_mesh(resources, mesh_doc, &doc.name);
    }

    if let Some(cam) = &doc.camera {
        let aspect = cam.aspect.unwrap_or(1.0);
        let mut camera = match cam.kind {
            CameraKind::Perspective => Camera::new_perspective(cam.fov, aspect, cam.near, cam.far),
            CameraKind::Orthographic => {
                Camera::new_orthographic(cam.ortho_size, aspect, cam.near, cam.far)
            }
        };
        camera.name.clone_from(&doc.name);
        node.camera = Some(scene.add_camera(camera));
    }

    node
}

fn build_mesh(resources: &Resources, doc: &MeshDocument, node_name: &str) -> Option<Mesh> {
    let Some(geometry) = resources.geometries.get(doc.geometry).copied().flatten() else {
        log::warn!("Node '{node_name}': geometry {} missing, mesh dropped", doc.geometry);
        return None;
    };

    let materials: SmallVec<[MaterialHandle; 2]> = doc
        .materials
        .iter()
        .filter_map(|&i| {
            let handle = resources.materials.get(i).copied();
            if handle.is_none() {
                log::warn!("Node '{node_name}': material {i} missing, slot dropped");
            }
            handle
        })
        .collect();

    Some(Mesh::new(geometry, materials))
}

fn default_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_opacity() -> f32 {
    1.0
}

fn default_fov() -> f32 {
    50.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_ortho_size() -> f32 {
    10.0
}
