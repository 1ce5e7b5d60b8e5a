//! Scene graph model and the per-node systems that operate on it:
//!
//! - [`Scene`]: node arena, hierarchy queries, material ownership
//! - [`visibility`]: load-time selective visibility with ancestor preservation
//! - [`opacity`]: per-frame opacity tracks applied to node subtrees
//! - [`picking`]: ray hit-testing and precise/branch selection

pub mod camera;
pub mod geometry;
pub mod material;
pub mod node;
pub mod opacity;
pub mod picking;
pub mod scene;
pub mod transform;
pub mod transform_system;
pub mod visibility;

pub use camera::{Camera, ProjectionType, screen_to_ndc};
pub use geometry::{BoundingBox, Geometry, Ray};
pub use material::{Material, MaterialSettings};
pub use node::{Mesh, Node};
pub use opacity::{OPACITY_EPSILON, OpacityDriver, apply_opacity_to_subtree};
pub use picking::{Hit, PickMode, PickResolver, Selection};
pub use scene::Scene;
pub use transform::Transform;
pub use visibility::{VisibilityMode, VisibilityPolicy, VisibilityReport};
