//! Vitrine Core
//!
//! Foundational types shared by every Vitrine crate:
//! - Handle key types for the scene arenas ([`NodeHandle`], [`MaterialHandle`], ...)
//! - The error taxonomy ([`VitrineError`]) and [`Result`] alias
//! - Frame stepping ([`FrameClock`])

pub mod errors;
pub mod time;

pub use errors::{Result, VitrineError};
pub use time::{ClockMode, DEFAULT_FPS, FrameClock, MAX_FRAME_DT};

use slotmap::new_key_type;

new_key_type! {
    /// Non-owning reference to a node stored in a scene arena.
    pub struct NodeHandle;
    /// Reference to a material instance. Several meshes may share one.
    pub struct MaterialHandle;
    /// Reference to a geometry (vertex/index data).
    pub struct GeometryHandle;
    /// Reference to a camera component.
    pub struct CameraKey;
}
