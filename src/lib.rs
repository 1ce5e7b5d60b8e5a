//! # Vitrine
//!
//! Interactive viewer core for animated, selectively visible models.
//!
//! The workspace is split into focused crates, re-exported here:
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`core`] | Handles, errors, frame clock |
//! | [`animation`] | Keyframe tracks, clips, actions, mixer, opacity tracks |
//! | [`scene`] | Scene graph, visibility, opacity driver, picking |
//! | [`assets`] | Asset readers, scene documents, animation descriptions |
//! | [`viewer`] | Viewer session: load gate, frame step, input |
//!
//! Most applications only need the [`prelude`].

pub use vitrine_animation as animation;
pub use vitrine_assets as assets;
pub use vitrine_core as core;
pub use vitrine_scene as scene;
pub use vitrine_viewer as viewer;

pub use vitrine_core::{NodeHandle, Result, VitrineError};
pub use vitrine_scene::{Node, Scene};
pub use vitrine_viewer::{ViewerSession, ViewerSettings};

pub use glam;

pub mod prelude {
    pub use vitrine_animation::{
        AnimationAction, AnimationClip, AnimationMixer, KeyframeTrack, LoopMode,
    };
    pub use vitrine_assets::{AnimationDescription, AssetReaderVariant, SceneDocument};
    pub use vitrine_core::{FrameClock, NodeHandle, Result, VitrineError};
    pub use vitrine_scene::{
        Camera, Material, Node, OpacityDriver, PickMode, PickResolver, Scene, Selection,
        VisibilityPolicy,
    };
    pub use vitrine_viewer::{
        Modifiers, PointerEvent, RenderableFrame, ViewerSession, ViewerSettings, Viewport,
    };

    pub use glam::{Quat, Vec2, Vec3};
}
