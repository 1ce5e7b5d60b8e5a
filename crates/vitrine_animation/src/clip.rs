use glam::{Quat, Vec3};

use crate::binding::TargetPath;
use crate::tracks::KeyframeTrack;

/// Sentinel duration asking the clip to derive its length from its tracks.
pub const DURATION_FROM_TRACKS: f32 = -1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TrackMeta {
    pub node_name: String,
    pub target: TargetPath,
}

impl TrackMeta {
    /// Parses a `"<node>.<property>"` track name.
    ///
    /// A `userData.` path is split at its start; anything else is split at
    /// the last dot, so node names may themselves contain dots.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let (node, path) = if let Some(pos) = name.find(".userData.") {
            (&name[..pos], &name[pos + 1..])
        } else {
            name.rsplit_once('.')?
        };

        if node.is_empty() || path.is_empty() {
            return None;
        }

        Some(Self {
            node_name: node.to_string(),
            target: TargetPath::from_property_path(path),
        })
    }
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
    Scalar(KeyframeTrack<f32>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            Self::Vector3(t) => t.end_time(),
            Self::Quaternion(t) => t.end_time(),
            Self::Scalar(t) => t.end_time(),
        }
    }

    /// Whether this data can drive `target`.
    #[must_use]
    pub fn fits(&self, target: &TargetPath) -> bool {
        matches!(
            (self, target),
            (Self::Vector3(_), TargetPath::Translation | TargetPath::Scale)
                | (Self::Quaternion(_), TargetPath::Rotation)
                | (Self::Scalar(_), TargetPath::Property(_))
        )
    }
}

/// Complete track definition: metadata and keyframe data.
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Creates a clip. A negative `duration` (see [`DURATION_FROM_TRACKS`])
    /// is replaced by the latest key time across all tracks.
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32, tracks: Vec<Track>) -> Self {
        let duration = if duration < 0.0 {
            tracks.iter().map(|t| t.data.end_time()).fold(0.0_f32, f32::max)
        } else {
            duration
        };

        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }
}
