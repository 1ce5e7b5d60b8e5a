use vitrine_animation::{KeyframeTrack, OpacityTrack};
use vitrine_core::NodeHandle;

use crate::scene::Scene;

/// Band below 1.0 still treated as fully opaque.
pub const OPACITY_EPSILON: f32 = 1e-4;

/// Applies opacity tracks to whole subtrees, once per frame, after the
/// transform mixer has advanced.
#[derive(Debug)]
pub struct OpacityDriver {
    tracks: Vec<OpacityTrack>,
    epsilon: f32,
}

impl Default for OpacityDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl OpacityDriver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            epsilon: OPACITY_EPSILON,
        }
    }

    #[must_use]
    pub fn tracks(&self) -> &[OpacityTrack] {
        &self.tracks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Registers a track. Every mesh under the bound node gets exclusive
    /// materials now, so later writes never reach a shared material.
    pub fn bind(&mut self, scene: &mut Scene, track: OpacityTrack) {
        let duplicated = scene.ensure_unique_materials_for_subtree(track.node);
        log::debug!(
            "Opacity track bound to {:?} ({} materials duplicated)",
            track.node,
            duplicated
        );
        self.tracks.push(track);
    }

    /// Resolves `node_name` inside `model_root` (display name first, then
    /// tag) and binds. Returns `false` when the node does not exist.
    pub fn bind_by_name(
        &mut self,
        scene: &mut Scene,
        model_root: NodeHandle,
        node_name: &str,
        track: KeyframeTrack<f32>,
    ) -> bool {
        let node = scene
            .find_by_name(model_root, node_name)
            .or_else(|| scene.find_by_tag(model_root, node_name));

        match node {
            Some(node) => {
                self.bind(scene, OpacityTrack::new(node, track));
                true
            }
            None => {
                log::warn!("Opacity track for '{node_name}': node not found, skipped");
                false
            }
        }
    }

    /// Samples every track at `time` and writes the result.
    ///
    /// `time` must be the transform mixer's time for this frame.
    pub fn apply(&self, scene: &mut Scene, time: f32) {
        for track in &self.tracks {
            let alpha = track.sample(time);
            apply_opacity_to_subtree(scene, track.node, alpha, self.epsilon);
        }
    }
}

/// Writes `alpha` (clamped to `[0, 1]`) into every material of every mesh
/// under `root`, inclusive. Draw suppression lives in `color_write` and the
/// node flags, which this never touches.
pub fn apply_opacity_to_subtree(scene: &mut Scene, root: NodeHandle, alpha: f32, epsilon: f32) {
    for handle in scene.renderables_in_subtree(root) {
        for material in scene.node_materials(handle).to_vec() {
            if let Some(m) = scene.material_mut(material) {
                m.apply_alpha(alpha, epsilon);
            }
        }
    }
}
