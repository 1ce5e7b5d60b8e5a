use vitrine_core::NodeHandle;

use crate::tracks::KeyframeTrack;

/// Opacity used when a track holds no samples.
pub const DEFAULT_OPACITY: f32 = 1.0;

/// A scalar opacity track bound to one node.
///
/// The node is resolved once, when the track is bound. Opacity tracks are
/// not part of a clip: they are sampled manually at the mixer's time.
#[derive(Debug, Clone)]
pub struct OpacityTrack {
    pub node: NodeHandle,
    pub track: KeyframeTrack<f32>,
}

impl OpacityTrack {
    #[must_use]
    pub fn new(node: NodeHandle, track: KeyframeTrack<f32>) -> Self {
        Self { node, track }
    }

    /// Samples the raw (unclamped) opacity at `time`.
    #[must_use]
    pub fn sample(&self, time: f32) -> f32 {
        self.track.sample(time).unwrap_or(DEFAULT_OPACITY)
    }
}
