//! Asset input for the viewer: readers, the scene hierarchy document and the
//! animation description document.

pub mod captions;
pub mod description;
pub mod hierarchy;
pub mod io;
pub mod loader;

pub use captions::{Caption, active_captions};
pub use description::{AlphaTrackDescription, AnimationDescription, TrackDescription, TrackKind};
pub use hierarchy::{LoadedModel, NodeDocument, SceneDocument, SceneProvider};
pub use io::{AssetReader, AssetReaderVariant, FileAssetReader, MemoryAssetReader};
pub use loader::{load_description, load_scene_document};
