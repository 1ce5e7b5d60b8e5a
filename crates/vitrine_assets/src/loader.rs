use vitrine_core::{Result, VitrineError};

use crate::description::AnimationDescription;
use crate::hierarchy::SceneDocument;
use crate::io::AssetReaderVariant;

async fn read(reader: &AssetReaderVariant, uri: &str) -> Result<Vec<u8>> {
    reader
        .read_bytes(uri)
        .await
        .map_err(|e| VitrineError::AssetNotFound(format!("{uri}: {e}")))
}

/// Fetches and parses a scene hierarchy document.
pub async fn load_scene_document(reader: &AssetReaderVariant, uri: &str) -> Result<SceneDocument> {
    let bytes = read(reader, uri).await?;
    SceneDocument::from_slice(uri, &bytes)
}

/// Fetches and parses an animation description.
pub async fn load_description(
    reader: &AssetReaderVariant,
    uri: &str,
) -> Result<AnimationDescription> {
    let bytes = read(reader, uri).await?;
    AnimationDescription::from_slice(uri, &bytes)
}
