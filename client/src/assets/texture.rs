use bevy::asset::RenderAssetUsages;
use bevy::image::{CompressedImageFormats, ImageSampler, ImageType};
use bevy::prelude::*;

use super::error::AssetError;

/// Turns downloaded image bytes into something drawable.
pub trait TextureStore {
    type Handle: Clone + Send + Sync + 'static;

    fn upload(&mut self, key: &str, bytes: Vec<u8>) -> Result<Self::Handle, AssetError>;
}

impl TextureStore for Assets<Image> {
    type Handle = Handle<Image>;

    fn upload(&mut self, key: &str, bytes: Vec<u8>) -> Result<Handle<Image>, AssetError> {
        let image = Image::from_buffer(
            &bytes,
            ImageType::Extension("png"),
            CompressedImageFormats::NONE,
            true,
            ImageSampler::nearest(),
            RenderAssetUsages::default(),
        )
        .map_err(|e| AssetError::Decode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.add(image))
    }
}
