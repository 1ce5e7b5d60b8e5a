use std::path::Path;

use serde::Deserialize;
use vitrine_animation::LoopMode;
use vitrine_core::Result;

/// Camera used when the model embeds none.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FallbackCameraSettings {
    /// Vertical field of view, degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FallbackCameraSettings {
    fn default() -> Self {
        Self {
            fov: 55.0,
            near: 0.01,
            far: 5000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackLoop {
    Once,
    #[default]
    Loop,
    PingPong,
}

impl From<PlaybackLoop> for LoopMode {
    fn from(value: PlaybackLoop) -> Self {
        match value {
            PlaybackLoop::Once => LoopMode::Once,
            PlaybackLoop::Loop => LoopMode::Loop,
            PlaybackLoop::PingPong => LoopMode::PingPong,
        }
    }
}

/// Viewer configuration. Every field has a default, so a settings file only
/// needs the entries it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Scene hierarchy document, relative to the asset reader root.
    pub model_uri: String,
    /// Animation description document, relative to the asset reader root.
    pub animation_uri: String,
    /// Rotation about X applied to a wrapper around the model root (radians).
    pub model_axis_fix_x: f32,
    /// Name of the embedded camera to render through.
    pub camera_name: String,
    pub fallback_camera: FallbackCameraSettings,
    pub loop_mode: PlaybackLoop,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            model_uri: "model/model.json".to_string(),
            animation_uri: "anim/three_animation1.json".to_string(),
            model_axis_fix_x: -std::f32::consts::FRAC_PI_2,
            camera_name: "Camera".to_string(),
            fallback_camera: FallbackCameraSettings::default(),
            loop_mode: PlaybackLoop::Loop,
        }
    }
}

impl ViewerSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
