use glam::{Quat, Vec3};
use vitrine_core::NodeHandle;

/// Whatever the mixer writes sampled values into (normally the scene graph).
pub trait AnimationTarget {
    fn set_translation(&mut self, node: NodeHandle, value: Vec3);
    fn set_rotation(&mut self, node: NodeHandle, value: Quat);
    fn set_scale(&mut self, node: NodeHandle, value: Vec3);
    fn set_property(&mut self, node: NodeHandle, name: &str, value: f32);
}
