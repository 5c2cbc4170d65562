//! Asynchronous asset pipeline: item id in, drawable frames out.

mod cache;
mod error;
mod fetch;
mod item_assets;
mod texture;

pub use cache::{CacheStatus, FetchCache, LoadState};
pub use error::{AssetError, FetchError};
pub use fetch::{AssetFetcher, Fetcher, HttpFetcher, PendingFetch};
pub use item_assets::{to_rect, ImageAssets, ItemAssets};
pub use texture::TextureStore;
