use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use vitrine_core::{CameraKey, GeometryHandle, MaterialHandle, NodeHandle};

use crate::transform::Transform;

/// Renderable geometry attached to a node.
///
/// `materials` may alias handles used by other meshes until the node is
/// given exclusive copies (see [`crate::Scene::ensure_unique_materials`]).
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: GeometryHandle,
    pub materials: SmallVec<[MaterialHandle; 2]>,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: GeometryHandle, materials: impl IntoIterator<Item = MaterialHandle>) -> Self {
        Self {
            geometry,
            materials: materials.into_iter().collect(),
        }
    }
}

/// One entry of the scene hierarchy.
#[derive(Debug, Clone)]
pub struct Node {
    // === Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    // === Identity ===
    /// Mutable display name.
    pub name: String,
    /// Stable asset-level identity. Untagged nodes are structural helpers.
    pub tag: Option<String>,

    pub transform: Transform,

    // === Render state ===
    pub visible: bool,
    /// Structurally present but contributes no pixels. Only meaningful with a mesh.
    pub(crate) draw_suppressed: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,

    // === Components ===
    pub mesh: Option<Mesh>,
    pub camera: Option<CameraKey>,

    /// Scalar properties written by number tracks (`userData.*`).
    pub properties: FxHashMap<String, f32>,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("")
    }

    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            name: name.into(),
            tag: None,
            transform: Transform::new(),
            visible: true,
            draw_suppressed: false,
            cast_shadow: true,
            receive_shadow: true,
            mesh: None,
            camera: None,
            properties: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        self.mesh.is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_camera(&self) -> bool {
        self.camera.is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_draw_suppressed(&self) -> bool {
        self.draw_suppressed
    }

    /// Visible and actually drawn: what the renderer and the picker consider.
    #[inline]
    #[must_use]
    pub fn is_drawn(&self) -> bool {
        self.visible && self.is_renderable() && !self.draw_suppressed
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<f32> {
        self.properties.get(name).copied()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
