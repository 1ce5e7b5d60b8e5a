//! Animation system: keyframe tracks, clips, actions and the mixer.
//!
//! Transform channels are driven by [`AnimationMixer`] through the
//! [`AnimationTarget`] seam. Opacity channels use the same
//! [`KeyframeTrack`] sampler via [`OpacityTrack`] but are sampled by the
//! caller, after the mixer, at [`AnimationMixer::time`].

pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod mixer;
pub mod opacity;
pub mod target;
pub mod tracks;
pub mod values;

pub use action::{AnimationAction, LoopMode, TrackValue};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, DURATION_FROM_TRACKS, Track, TrackData, TrackMeta};
pub use mixer::AnimationMixer;
pub use opacity::{DEFAULT_OPACITY, OpacityTrack};
pub use target::AnimationTarget;
pub use tracks::{KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
