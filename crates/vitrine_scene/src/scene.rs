use glam::{Quat, Vec3};
use slotmap::SlotMap;
use vitrine_animation::AnimationTarget;
use vitrine_core::{CameraKey, GeometryHandle, MaterialHandle, NodeHandle};

use crate::camera::Camera;
use crate::geometry::{BoundingBox, Geometry};
use crate::material::Material;
use crate::node::{Mesh, Node};
use crate::transform_system;

/// Scene graph container.
///
/// Nodes form a forest: every node has at most one parent and parents are
/// stored as non-owning handles. Components (materials, geometry, cameras)
/// live in their own arenas and are referenced by key.
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    // ==== Component pools ====
    pub materials: SlotMap<MaterialHandle, Material>,
    pub geometries: SlotMap<GeometryHandle, Geometry>,
    pub cameras: SlotMap<CameraKey, Camera>,

    pub active_camera: Option<NodeHandle>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Creates an empty top-level node.
    pub fn create_node(&mut self) -> NodeHandle {
        self.add_node(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::with_name(name))
    }

    /// Adds a node at the top level.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Adds a node as the last child of `parent`.
    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> NodeHandle {
        if !self.nodes.contains_key(parent) {
            log::warn!("add_to_parent: parent {parent:?} not found, adding at top level");
            return self.add_node(child);
        }

        child.parent = Some(parent);
        child.children.clear();
        let handle = self.nodes.insert(child);
        self.nodes[parent].children.push(handle);
        handle
    }

    /// Re-parents `child` under `parent`.
    ///
    /// Refuses moves that would create a cycle.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            log::error!("attach: node not found");
            return;
        }
        if child == parent || self.is_ancestor_of(child, parent) {
            log::warn!("attach: {child:?} is an ancestor of {parent:?}, ignored");
            return;
        }

        // 1. Detach from old
        match self.nodes[child].parent {
            Some(old) => {
                if let Some(n) = self.nodes.get_mut(old) {
                    n.children.retain(|&x| x != child);
                }
            }
            None => self.root_nodes.retain(|&x| x != child),
        }

        // 2. Attach to new
        self.nodes[parent].children.push(child);
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.transform.mark_dirty();
    }

    /// Whether `ancestor` lies on the parent chain of `node`.
    #[must_use]
    pub fn is_ancestor_of(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(Node::parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(Node::parent);
        }
        false
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.nodes.get(handle).map(|n| n.name.as_str())
    }

    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.name = name.to_string();
        }
    }

    // ========================================================================
    // Traversal & Queries
    // ========================================================================

    /// Depth-first, parent before children, children in insertion order.
    /// Every node of the subtree is visited exactly once.
    pub fn traverse<F>(&self, root: NodeHandle, mut visitor: F)
    where
        F: FnMut(NodeHandle, &Node),
    {
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            visitor(handle, node);
            stack.extend(node.children.iter().rev());
        }
    }

    /// `root` and all its descendants, in [`Scene::traverse`] order.
    #[must_use]
    pub fn descendants(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        self.traverse(root, |handle, _| out.push(handle));
        out
    }

    fn find_in_subtree<P>(&self, root: NodeHandle, mut predicate: P) -> Option<NodeHandle>
    where
        P: FnMut(&Node) -> bool,
    {
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let node = self.nodes.get(handle)?;
            if predicate(node) {
                return Some(handle);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// First node named `name` in `root`'s subtree.
    #[must_use]
    pub fn find_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.find_in_subtree(root, |n| n.name == name)
    }

    /// First node tagged `tag` in `root`'s subtree.
    #[must_use]
    pub fn find_by_tag(&self, root: NodeHandle, tag: &str) -> Option<NodeHandle> {
        self.find_in_subtree(root, |n| n.tag.as_deref() == Some(tag))
    }

    /// Parent chain of `node`, nearest first, ending before `stop`
    /// (or at the top of the tree when `stop` is never reached).
    #[must_use]
    pub fn ancestors(&self, node: NodeHandle, stop: Option<NodeHandle>) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(node).and_then(Node::parent);
        while let Some(handle) = current {
            if Some(handle) == stop {
                break;
            }
            out.push(handle);
            current = self.nodes.get(handle).and_then(Node::parent);
        }
        out
    }

    /// Every node with geometry in `root`'s subtree, regardless of visibility.
    #[must_use]
    pub fn renderables_in_subtree(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        self.traverse(root, |handle, node| {
            if node.is_renderable() {
                out.push(handle);
            }
        });
        out
    }

    /// Camera nodes in `root`'s subtree.
    #[must_use]
    pub fn cameras_in_subtree(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        self.traverse(root, |handle, node| {
            if node.is_camera() {
                out.push(handle);
            }
        });
        out
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        self.materials.insert(material)
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryHandle {
        self.geometries.insert(geometry)
    }

    pub fn add_camera(&mut self, camera: Camera) -> CameraKey {
        self.cameras.insert(camera)
    }

    pub fn set_mesh(&mut self, handle: NodeHandle, mesh: Mesh) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.mesh = Some(mesh);
        }
    }

    pub fn set_camera(&mut self, handle: NodeHandle, camera: CameraKey) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.camera = Some(camera);
        }
    }

    #[must_use]
    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle)
    }

    /// Direct access to a material. Writes affect every mesh sharing it.
    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(handle)
    }

    /// Materials of a node's mesh (empty for non-renderable nodes).
    #[must_use]
    pub fn node_materials(&self, handle: NodeHandle) -> &[MaterialHandle] {
        self.nodes
            .get(handle)
            .and_then(|n| n.mesh.as_ref())
            .map(|m| m.materials.as_slice())
            .unwrap_or_default()
    }

    /// Camera component attached to `handle`.
    #[must_use]
    pub fn camera_of(&self, handle: NodeHandle) -> Option<&Camera> {
        let key = self.nodes.get(handle)?.camera?;
        self.cameras.get(key)
    }

    pub fn camera_of_mut(&mut self, handle: NodeHandle) -> Option<&mut Camera> {
        let key = self.nodes.get(handle)?.camera?;
        self.cameras.get_mut(key)
    }

    #[must_use]
    pub fn active_camera(&self) -> Option<&Camera> {
        self.camera_of(self.active_camera?)
    }

    // ========================================================================
    // Material ownership
    // ========================================================================

    /// Number of mesh material slots referencing `material` across the scene.
    #[must_use]
    pub fn material_users(&self, material: MaterialHandle) -> usize {
        self.nodes
            .values()
            .filter_map(|n| n.mesh.as_ref())
            .map(|m| m.materials.iter().filter(|&&h| h == material).count())
            .sum()
    }

    /// Gives `node` exclusive copies of every material it shares with any
    /// other slot. Must run before any per-node material mutation.
    ///
    /// Returns the number of materials duplicated.
    pub fn ensure_unique_materials(&mut self, handle: NodeHandle) -> usize {
        let slots: Vec<MaterialHandle> = self.node_materials(handle).to_vec();
        let mut duplicated = 0;

        for (slot, material) in slots.into_iter().enumerate() {
            if self.material_users(material) <= 1 {
                continue;
            }
            let Some(copy) = self.materials.get(material).map(Material::duplicate) else {
                continue;
            };
            let copy = self.materials.insert(copy);
            if let Some(mesh) = self.nodes.get_mut(handle).and_then(|n| n.mesh.as_mut()) {
                mesh.materials[slot] = copy;
                duplicated += 1;
            }
        }

        duplicated
    }

    /// [`Scene::ensure_unique_materials`] for every node of a subtree.
    pub fn ensure_unique_materials_for_subtree(&mut self, root: NodeHandle) -> usize {
        self.renderables_in_subtree(root)
            .into_iter()
            .map(|handle| self.ensure_unique_materials(handle))
            .sum()
    }

    /// Keeps a renderable node in the hierarchy but stops it from producing
    /// pixels or shadows. Its materials are made exclusive first.
    ///
    /// Returns `false` for nodes without geometry, which are left untouched.
    pub fn suppress_draw(&mut self, handle: NodeHandle) -> bool {
        if !self.nodes.get(handle).is_some_and(Node::is_renderable) {
            return false;
        }

        self.ensure_unique_materials(handle);
        for material in self.node_materials(handle).to_vec() {
            if let Some(m) = self.materials.get_mut(material) {
                m.suppress_draw();
            }
        }

        let node = &mut self.nodes[handle];
        node.draw_suppressed = true;
        node.cast_shadow = false;
        node.receive_shadow = false;
        true
    }

    // ========================================================================
    // Transforms & Bounds
    // ========================================================================

    /// Propagates local transforms to world matrices and refreshes cameras.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(
            &mut self.nodes,
            &mut self.cameras,
            &self.root_nodes,
        );
    }

    /// World-space bounds of every mesh under `root`. Uses the cached world
    /// matrices, so call [`Scene::update_matrix_world`] first.
    #[must_use]
    pub fn world_bounding_box(&self, root: NodeHandle) -> Option<BoundingBox> {
        self.renderables_in_subtree(root)
            .into_iter()
            .filter_map(|handle| {
                let node = &self.nodes[handle];
                let geometry = self.geometries.get(node.mesh.as_ref()?.geometry)?;
                Some(geometry.bounding_box()?.transform(node.transform.world_matrix()))
            })
            .reduce(|a, b| a.union(&b))
    }
}

impl AnimationTarget for Scene {
    fn set_translation(&mut self, node: NodeHandle, value: Vec3) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.transform.position = value;
        }
    }

    fn set_rotation(&mut self, node: NodeHandle, value: Quat) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.transform.rotation = value;
        }
    }

    fn set_scale(&mut self, node: NodeHandle, value: Vec3) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.transform.scale = value;
        }
    }

    fn set_property(&mut self, node: NodeHandle, name: &str, value: f32) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.properties.insert(name.to_string(), value);
        }
    }
}
