use glam::{Quat, Vec3};

/// A keyframe value type.
///
/// `ARITY` is the number of `f32` components one sample occupies in a
/// flat value array: `[x0, y0, z0, x1, y1, z1, ...]`.
pub trait Interpolatable: Copy + Clone + Sized {
    const ARITY: usize;

    /// Builds a value from exactly `ARITY` components.
    fn from_components(components: &[f32]) -> Self;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    const ARITY: usize = 1;

    fn from_components(components: &[f32]) -> Self {
        components[0]
    }

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    const ARITY: usize = 3;

    fn from_components(components: &[f32]) -> Self {
        Vec3::new(components[0], components[1], components[2])
    }

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

/// Quaternions are stored `x, y, z, w`.
impl Interpolatable for Quat {
    const ARITY: usize = 4;

    fn from_components(components: &[f32]) -> Self {
        Quat::from_xyzw(components[0], components[1], components[2], components[3]).normalize()
    }

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }
}
