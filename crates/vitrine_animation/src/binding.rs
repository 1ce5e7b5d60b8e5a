use vitrine_core::NodeHandle;

/// Defines the target property for animation data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation, // Maps to transform.position
    Rotation,    // Maps to transform.rotation
    Scale,       // Maps to transform.scale
    /// A named scalar stored on the node (e.g. `userData.fade`).
    Property(Box<str>),
}

impl TargetPath {
    /// Maps the property part of a track name to a target.
    #[must_use]
    pub fn from_property_path(path: &str) -> Self {
        match path {
            "position" | "translation" => Self::Translation,
            "quaternion" | "rotation" => Self::Rotation,
            "scale" => Self::Scale,
            other => Self::Property(other.into()),
        }
    }
}

/// Binding relationship: maps track `track_index` from a clip to the target
/// property of `node` in the scene.
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node: NodeHandle,
    pub target: TargetPath,
}
