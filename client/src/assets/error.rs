use thiserror::Error;

/// Transport-level failure of one asset request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} was dropped before completing")]
    Cancelled { url: String },
}

/// Why a cache entry ended up `Failed`.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Image bytes that could not be turned into a texture.
    #[error("cannot decode image {key}: {reason}")]
    Decode { key: String, reason: String },

    /// Metadata body that is not the expected JSON envelope.
    #[error("invalid metadata for {key}: {source}")]
    Metadata {
        key: String,
        source: serde_json::Error,
    },

    /// Well-formed envelope with nothing in it.
    #[error("no metadata found for {key}")]
    EmptyResult { key: String },
}
