use bitflags::bitflags;
use glam::Vec2;
use vitrine_scene::PickMode;

bitflags! {
    /// Keyboard modifiers held during a pointer event.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT   = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT     = 1 << 2;
        const SUPER   = 1 << 3;
    }
}

/// A click in window pixels (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub position: Vec2,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    #[must_use]
    pub fn click(position: Vec2) -> Self {
        Self {
            position,
            modifiers: Modifiers::empty(),
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Shift selects the whole branch, a plain click the single mesh.
    #[must_use]
    pub fn pick_mode(&self) -> PickMode {
        if self.modifiers.contains(Modifiers::SHIFT) {
            PickMode::Branch
        } else {
            PickMode::Precise
        }
    }
}

/// Output surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}
