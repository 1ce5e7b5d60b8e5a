use vitrine_core::NodeHandle;

use crate::binding::PropertyBinding;
use crate::clip::AnimationClip;

pub struct Binder;

impl Binder {
    /// Resolves every track of `clip` to a node via `resolve`.
    ///
    /// Tracks whose node cannot be found, or whose data type does not fit
    /// the addressed channel, are dropped with a warning.
    pub fn bind<F>(clip: &AnimationClip, mut resolve: F) -> Vec<PropertyBinding>
    where
        F: FnMut(&str) -> Option<NodeHandle>,
    {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_index, track) in clip.tracks.iter().enumerate() {
            let meta = &track.meta;

            if !track.data.fits(&meta.target) {
                log::warn!(
                    "Clip '{}': track {} has data incompatible with {:?}, skipped",
                    clip.name,
                    track_index,
                    meta.target
                );
                continue;
            }

            let Some(node) = resolve(&meta.node_name) else {
                log::warn!(
                    "Clip '{}': node '{}' not found, track {} skipped",
                    clip.name,
                    meta.node_name,
                    track_index
                );
                continue;
            };

            bindings.push(PropertyBinding {
                track_index,
                node,
                target: meta.target.clone(),
            });
        }

        bindings
    }
}
