//! Cursor picking and selection.
//!
//! Hit-testing only considers meshes that are actually drawn (visible and
//! not draw-suppressed). A hit becomes a [`Selection`] either as-is
//! ([`PickMode::Precise`]) or expanded to the nearest branching ancestor
//! ([`PickMode::Branch`]). Selection never writes back into the scene.

use glam::Vec3;
use vitrine_core::NodeHandle;

use crate::geometry::Ray;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickMode {
    /// Select the hit mesh only.
    #[default]
    Precise,
    /// Select every mesh under the hit's nearest ancestor with several children.
    Branch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub node: NodeHandle,
    /// World-space distance from the ray origin.
    pub distance: f32,
    pub point: Vec3,
}

/// The set of highlighted nodes. Replaced wholesale on every pick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: Vec<NodeHandle>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_nodes(nodes: Vec<NodeHandle>) -> Self {
        Self { nodes }
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeHandle] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, node: NodeHandle) -> bool {
        self.nodes.contains(&node)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

/// Picking scoped to one loaded model.
#[derive(Debug, Clone, Copy)]
pub struct PickResolver {
    model_root: NodeHandle,
}

impl PickResolver {
    #[must_use]
    pub fn new(model_root: NodeHandle) -> Self {
        Self { model_root }
    }

    #[must_use]
    pub fn model_root(&self) -> NodeHandle {
        self.model_root
    }

    /// Drawn meshes under the model root, in traversal order.
    #[must_use]
    pub fn candidates(&self, scene: &Scene) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        scene.traverse(self.model_root, |handle, node| {
            if node.is_drawn() {
                out.push(handle);
            }
        });
        out
    }

    /// Nearest intersection among `candidates`. Exact ties resolve to the
    /// candidate that comes first.
    #[must_use]
    pub fn raycast(&self, scene: &Scene, ray: &Ray, candidates: &[NodeHandle]) -> Option<Hit> {
        let mut nearest: Option<Hit> = None;

        for &handle in candidates {
            let Some(hit) = intersect_node(scene, handle, ray) else {
                continue;
            };
            if nearest.is_none_or(|n| hit.distance < n.distance) {
                nearest = Some(hit);
            }
        }
        nearest
    }

    /// Nearest ancestor of `node` with more than one child, searching up to
    /// (but excluding) the model root. Falls back to `node` itself.
    #[must_use]
    pub fn branch_root(&self, scene: &Scene, node: NodeHandle) -> NodeHandle {
        scene
            .ancestors(node, Some(self.model_root))
            .into_iter()
            .find(|&a| scene.nodes[a].children().len() > 1)
            .unwrap_or(node)
    }

    /// Turns a hit node into a selection according to `mode`.
    #[must_use]
    pub fn expand(&self, scene: &Scene, node: NodeHandle, mode: PickMode) -> Selection {
        match mode {
            PickMode::Precise => Selection::from_nodes(vec![node]),
            PickMode::Branch => {
                let branch = self.branch_root(scene, node);
                if branch == node {
                    Selection::from_nodes(vec![node])
                } else {
                    Selection::from_nodes(scene.renderables_in_subtree(branch))
                }
            }
        }
    }

    /// Full pick: candidates, nearest hit, expansion. A miss yields an
    /// empty selection.
    #[must_use]
    pub fn pick(&self, scene: &Scene, ray: &Ray, mode: PickMode) -> (Option<Hit>, Selection) {
        let candidates = self.candidates(scene);
        match self.raycast(scene, ray, &candidates) {
            Some(hit) => (Some(hit), self.expand(scene, hit.node, mode)),
            None => (None, Selection::new()),
        }
    }
}

fn intersect_node(scene: &Scene, handle: NodeHandle, ray: &Ray) -> Option<Hit> {
    let node = scene.get_node(handle)?;
    let geometry = scene.geometries.get(node.mesh.as_ref()?.geometry)?;

    let world = *node.transform.world_matrix();
    let local_ray = ray.transform(&world.inverse());
    let t = geometry.intersect_ray(&local_ray)?;

    let point = world.transform_point3(local_ray.at(t));
    Some(Hit {
        node: handle,
        distance: (point - ray.origin).length(),
        point,
    })
}
