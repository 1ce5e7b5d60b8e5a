//! Animation description document.
//!
//! ```json
//! {
//!   "name": "clip", "duration": 4.0,
//!   "tracks": [{ "type": "vector", "name": "Cube.position", "times": [0, 1], "values": [0,0,0, 1,2,3] }],
//!   "alpha_tracks": [{ "node": "Cube", "times": [0, 1], "values": [1, 0] }],
//!   "visible_nodes_mode": "SELECTED",
//!   "visible_nodes": ["Cube"],
//!   "markers_text": [{ "id": "1.", "start": 0.0, "end": 2.0, "text": "Intro", "children": [] }]
//! }
//! ```
//!
//! Only a non-object top level is an error. Each list entry is parsed on its
//! own and dropped with a warning when malformed.

use glam::{Quat, Vec3};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use vitrine_animation::{AnimationClip, DURATION_FROM_TRACKS, KeyframeTrack, Track, TrackData, TrackMeta};
use vitrine_core::{Result, VitrineError};
use vitrine_scene::VisibilityPolicy;

use crate::captions::Caption;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Vector,
    Quaternion,
    Number,
}

/// A transform-mixer track as written in the document.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackDescription {
    #[serde(rename = "type")]
    pub kind: TrackKind,
    pub name: String,
    #[serde(default)]
    pub times: Vec<f32>,
    #[serde(default)]
    pub values: Vec<f32>,
}

/// A manually sampled opacity track.
#[derive(Debug, Clone, Deserialize)]
pub struct AlphaTrackDescription {
    pub node: String,
    pub times: Vec<f32>,
    pub values: Vec<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct AnimationDescription {
    pub name: String,
    /// Negative when the document gives no duration.
    pub duration: f32,
    /// Authored playback rate; absent or non-positive values are dropped.
    pub fps: Option<f32>,
    pub tracks: Vec<TrackDescription>,
    pub alpha_tracks: Vec<AlphaTrackDescription>,
    pub visibility: VisibilityPolicy,
    pub captions: Vec<Caption>,
}

impl AnimationDescription {
    pub fn from_slice(uri: &str, bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(uri, &value)
    }

    pub fn from_value(uri: &str, value: &Value) -> Result<Self> {
        let Some(doc) = value.as_object() else {
            return Err(VitrineError::InvalidDocument {
                uri: uri.to_string(),
                reason: "top level is not an object".to_string(),
            });
        };

        let name = doc
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or("clip")
            .to_string();

        let duration = doc
            .get("duration")
            .and_then(Value::as_f64)
            .map_or(DURATION_FROM_TRACKS, |d| d as f32);

        let fps = doc
            .get("fps")
            .and_then(Value::as_f64)
            .map(|f| f as f32)
            .filter(|f| f.is_finite() && *f > 0.0);

        let tracks = parse_entries::<TrackDescription>(doc.get("tracks"), "tracks")
            .into_iter()
            .filter(|t| !t.name.is_empty())
            .collect();

        let alpha_tracks = parse_entries::<AlphaTrackDescription>(doc.get("alpha_tracks"), "alpha_tracks")
            .into_iter()
            .filter(|t| !t.node.is_empty())
            .collect();

        let visibility = parse_visibility(doc.get("visible_nodes_mode"), doc.get("visible_nodes"));
        let captions = parse_entries::<Caption>(doc.get("markers_text"), "markers_text");

        Ok(Self {
            name,
            duration,
            fps,
            tracks,
            alpha_tracks,
            visibility,
            captions,
        })
    }

    /// Builds the transform clip. Tracks with unparsable names or value
    /// arrays of the wrong length are dropped.
    #[must_use]
    pub fn build_clip(&self) -> AnimationClip {
        let tracks = self
            .tracks
            .iter()
            .filter_map(|desc| {
                let track = build_track(desc);
                if track.is_none() {
                    log::warn!("Track '{}' is malformed, skipped", desc.name);
                }
                track
            })
            .collect();

        AnimationClip::new(self.name.clone(), self.duration, tracks)
    }

    /// Opacity tracks as `(node name, track)` pairs. Malformed ones are dropped.
    #[must_use]
    pub fn opacity_tracks(&self) -> Vec<(String, KeyframeTrack<f32>)> {
        self.alpha_tracks
            .iter()
            .filter_map(|desc| {
                match KeyframeTrack::new(desc.times.clone(), desc.values.clone()) {
                    Some(track) => Some((desc.node.clone(), track)),
                    None => {
                        log::warn!("Alpha track for '{}' is malformed, skipped", desc.node);
                        None
                    }
                }
            })
            .collect()
    }
}

fn build_track(desc: &TrackDescription) -> Option<Track> {
    let meta = TrackMeta::parse(&desc.name)?;
    let times = desc.times.clone();
    let data = match desc.kind {
        TrackKind::Vector => TrackData::Vector3(KeyframeTrack::<Vec3>::from_flat(times, &desc.values)?),
        TrackKind::Quaternion => {
            TrackData::Quaternion(KeyframeTrack::<Quat>::from_flat(times, &desc.values)?)
        }
        TrackKind::Number => TrackData::Scalar(KeyframeTrack::<f32>::from_flat(times, &desc.values)?),
    };
    Some(Track { meta, data })
}

fn parse_entries<T: DeserializeOwned>(value: Option<&Value>, field: &str) -> Vec<T> {
    let Some(value) = value else {
        return Vec::new();
    };
    let Some(entries) = value.as_array() else {
        log::warn!("'{field}' is not an array, ignored");
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| match T::deserialize(entry) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("{field}[{i}] skipped: {e}");
                None
            }
        })
        .collect()
}

fn parse_visibility(mode: Option<&Value>, nodes: Option<&Value>) -> VisibilityPolicy {
    if mode.and_then(Value::as_str) != Some("SELECTED") {
        return VisibilityPolicy::all();
    }

    let ids = nodes
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    VisibilityPolicy::selected(ids)
}
