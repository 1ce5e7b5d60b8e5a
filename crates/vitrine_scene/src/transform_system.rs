//! Hierarchical matrix update, decoupled from [`crate::Scene`] so that it
//! only borrows the node and camera arenas.

use glam::Affine3A;
use slotmap::SlotMap;
use vitrine_core::{CameraKey, NodeHandle};

use crate::camera::Camera;
use crate::node::Node;

/// Recomputes world matrices for every node reachable from `roots`,
/// parent before child, and refreshes the view matrices of attached cameras.
///
/// Subtrees whose local matrices did not change keep their cached world
/// matrices unless an ancestor changed.
pub fn update_hierarchy_iterative(
    nodes: &mut SlotMap<NodeHandle, Node>,
    cameras: &mut SlotMap<CameraKey, Camera>,
    roots: &[NodeHandle],
) {
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = roots
        .iter()
        .rev()
        .map(|&root| (root, Affine3A::IDENTITY, false))
        .collect();

    while let Some((handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let changed = local_changed || parent_changed;

        if changed {
            let world = parent_world * node.transform.local_matrix;
            node.transform.set_world_matrix(world);

            if let Some(camera) = node.camera.and_then(|key| cameras.get_mut(key)) {
                camera.update_view_projection(&world);
            }
        }

        let world = node.transform.world_matrix;
        for &child in node.children.iter().rev() {
            stack.push((child, world, changed));
        }
    }
}
