//! Frame-driven viewer built on the Vitrine crates.
//!
//! [`ViewerSession`] owns the scene and every per-session system. Hosts
//! create it with [`ViewerSettings`], await [`ViewerSession::load`], then call
//! [`ViewerSession::step`] every frame.

pub mod input;
pub mod session;
pub mod settings;

pub use input::{Modifiers, PointerEvent, Viewport};
pub use session::{FrameView, RenderableFrame, SessionState, Stage, ViewerSession};
pub use settings::{FallbackCameraSettings, PlaybackLoop, ViewerSettings};
