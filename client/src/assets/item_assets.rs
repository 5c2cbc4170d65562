use std::sync::Arc;

use bevy::prelude::*;
use gridsync_protocol::assets::{first_result, AtlasMetadata, DirectionKey, FrameRect, ItemMetadata};
use serde::de::DeserializeOwned;

use super::cache::{CacheStatus, FetchCache};
use super::error::AssetError;
use super::fetch::Fetcher;
use super::texture::TextureStore;
use crate::config::ClientConfig;

/// Everything needed to draw an item, resolved lazily in three steps:
/// item metadata, then atlas metadata, then the atlas image.
///
/// Each step is its own cache, so a key is fetched at most once no matter
/// how many entities wear the item.
#[derive(Resource)]
pub struct ItemAssets<H: Send + Sync + 'static> {
    config: ClientConfig,
    items: FetchCache<Arc<ItemMetadata>>,
    atlases: FetchCache<Arc<AtlasMetadata>>,
    textures: FetchCache<H>,
}

pub type ImageAssets = ItemAssets<Handle<Image>>;

fn parse_first<T: DeserializeOwned>(key: &str, body: &[u8]) -> Result<Arc<T>, AssetError> {
    first_result(body)
        .map_err(|source| AssetError::Metadata {
            key: key.to_string(),
            source,
        })?
        .map(Arc::new)
        .ok_or_else(|| AssetError::EmptyResult {
            key: key.to_string(),
        })
}

impl<H: Clone + Send + Sync + 'static> ItemAssets<H> {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            config: config.clone(),
            items: FetchCache::with_capacity("item", config.cache_capacity),
            atlases: FetchCache::with_capacity("atlas", config.cache_capacity),
            textures: FetchCache::with_capacity("texture", config.cache_capacity),
        }
    }

    pub fn item_metadata(&mut self, item_id: &str, fetcher: &dyn Fetcher) -> Option<Arc<ItemMetadata>> {
        let url = &self.config;
        self.items.request(
            item_id,
            || fetcher.fetch(&url.item_metadata_url(item_id)),
            |body| parse_first(item_id, &body),
        )
    }

    /// Atlas of `item_id`. Requested only once its item metadata is known,
    /// which may name a different atlas key.
    pub fn atlas(&mut self, item_id: &str, fetcher: &dyn Fetcher) -> Option<Arc<AtlasMetadata>> {
        let item = self.item_metadata(item_id, fetcher)?;
        let key = item.atlas_key.as_deref().unwrap_or(item_id);
        let url = &self.config;
        self.atlases.request(
            key,
            || fetcher.fetch(&url.atlas_metadata_url(key)),
            |body| parse_first(key, &body),
        )
    }

    /// Texture of the atlas backing `item_id`, keyed by its blob id.
    pub fn texture_handle<S>(&mut self, item_id: &str, fetcher: &dyn Fetcher, store: &mut S) -> Option<H>
    where
        S: TextureStore<Handle = H>,
    {
        let atlas = self.atlas(item_id, fetcher)?;
        let file_id = atlas.file_id.as_str();
        let url = &self.config;
        self.textures.request(
            file_id,
            || fetcher.fetch(&url.blob_url(file_id)),
            |bytes| store.upload(file_id, bytes),
        )
    }

    pub fn cached_item(&self, item_id: &str) -> Option<&Arc<ItemMetadata>> {
        self.items.get(item_id)
    }

    pub fn cached_atlas(&self, item_id: &str) -> Option<&Arc<AtlasMetadata>> {
        let item = self.cached_item(item_id)?;
        self.atlases.get(item.atlas_key.as_deref().unwrap_or(item_id))
    }

    pub fn cached_texture(&self, item_id: &str) -> Option<&H> {
        self.textures.get(&self.cached_atlas(item_id)?.file_id)
    }

    /// Source rectangle of one frame, if the atlas is loaded.
    pub fn frame_rect(&self, item_id: &str, key: DirectionKey, frame_index: usize) -> Option<Rect> {
        let atlas = self.cached_atlas(item_id)?;
        let frames = atlas.frames_for(key);
        if frames.is_empty() {
            return None;
        }
        Some(to_rect(&frames[frame_index % frames.len()]))
    }

    /// Furthest-along status of the chain for `item_id`. `Failed` if any
    /// step failed.
    pub fn status(&self, item_id: &str) -> CacheStatus {
        let item = self.items.status(item_id);
        if item != CacheStatus::Ready {
            return item;
        }
        let Some(meta) = self.cached_item(item_id) else {
            return CacheStatus::Loading;
        };
        let key = meta.atlas_key.as_deref().unwrap_or(item_id);
        match self.atlases.status(key) {
            CacheStatus::Ready => match self.cached_atlas(item_id) {
                Some(atlas) => match self.textures.status(&atlas.file_id) {
                    CacheStatus::NotRequested => CacheStatus::Loading,
                    other => other,
                },
                None => CacheStatus::Loading,
            },
            CacheStatus::NotRequested => CacheStatus::Loading,
            other => other,
        }
    }

    /// Fetches started so far per step: items, atlases, textures.
    pub fn tokens_issued(&self) -> (u64, u64, u64) {
        (
            self.items.tokens_issued(),
            self.atlases.tokens_issued(),
            self.textures.tokens_issued(),
        )
    }
}

/// Atlas pixels to a `Rect`. Summed in `f32` so out-of-range values from the
/// API cannot overflow.
pub fn to_rect(frame: &FrameRect) -> Rect {
    let (x, y) = (frame.x as f32, frame.y as f32);
    Rect::new(x, y, x + frame.width as f32, y + frame.height as f32)
}
