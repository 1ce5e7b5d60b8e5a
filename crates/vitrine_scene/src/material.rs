use glam::Vec4;
use uuid::Uuid;

/// Blending/depth state consumed by the renderer's pipeline selection.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MaterialSettings {
    pub transparent: bool,
    pub depth_write: bool,
    pub depth_test: bool,
    pub color_write: bool,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            transparent: false,
            depth_write: true,
            depth_test: true,
            color_write: true,
        }
    }
}

/// Surface appearance of a mesh.
///
/// Materials live in the scene's material arena and may be shared by many
/// meshes. Per-node changes (opacity animation, draw suppression) must only
/// happen on exclusive copies made by [`crate::Scene::ensure_unique_materials`].
#[derive(Debug)]
pub struct Material {
    pub uuid: Uuid,
    pub name: String,
    pub color: Vec4,
    opacity: f32,
    settings: MaterialSettings,
    /// Bumped on every state change so renderers can detect updates.
    version: u64,
}

impl Material {
    #[must_use]
    pub fn new(color: Vec4) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: String::new(),
            color,
            opacity: 1.0,
            settings: MaterialSettings::default(),
            version: 0,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Copies every attribute into a new instance with its own identity.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: self.name.clone(),
            color: self.color,
            opacity: self.opacity,
            settings: self.settings.clone(),
            version: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &MaterialSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sets the base opacity without touching blending state.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        self.version = self.version.wrapping_add(1);
    }

    /// Applies an animated opacity.
    ///
    /// `alpha` is clamped to `[0, 1]`. Values within `epsilon` of 1 are
    /// treated as opaque so the blending mode does not flicker.
    pub fn apply_alpha(&mut self, alpha: f32, epsilon: f32) {
        let a = alpha.clamp(0.0, 1.0);
        self.opacity = a;
        self.settings.transparent = a < 1.0 - epsilon;
        self.settings.depth_write = a >= 1.0 - epsilon;
        self.version = self.version.wrapping_add(1);
    }

    /// Makes the material contribute nothing to the frame, even under blending.
    pub fn suppress_draw(&mut self) {
        self.opacity = 0.0;
        self.settings.transparent = true;
        self.settings.depth_write = false;
        self.settings.color_write = false;
        self.version = self.version.wrapping_add(1);
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Vec4::ONE)
    }
}
