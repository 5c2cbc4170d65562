#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bevy::tasks::futures_lite::future;
use gridsync_client::assets::{AssetError, FetchError, Fetcher, PendingFetch, TextureStore};
use gridsync_client::ClientConfig;

/// Serves canned bodies by URL and records every request.
#[derive(Clone, Default)]
pub struct MapFetcher {
    pub bodies: HashMap<String, Vec<u8>>,
    /// URLs that never complete.
    pub stalled: Vec<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MapFetcher {
    pub fn with(mut self, url: String, body: &str) -> Self {
        self.bodies.insert(url, body.as_bytes().to_vec());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Fetcher for MapFetcher {
    fn fetch(&self, url: &str) -> PendingFetch {
        self.calls.lock().unwrap().push(url.to_string());
        if self.stalled.iter().any(|u| u == url) {
            return Box::pin(future::pending::<Result<Vec<u8>, FetchError>>());
        }
        let result = match self.bodies.get(url) {
            Some(body) => Ok(body.clone()),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        };
        Box::pin(future::ready(result))
    }
}

/// Texture store handing out the blob key as handle. Empty bodies fail.
#[derive(Default)]
pub struct FakeStore {
    pub uploads: usize,
}

impl TextureStore for FakeStore {
    type Handle = String;

    fn upload(&mut self, key: &str, bytes: Vec<u8>) -> Result<String, AssetError> {
        if bytes.is_empty() {
            return Err(AssetError::Decode {
                key: key.to_string(),
                reason: "empty image".into(),
            });
        }
        self.uploads += 1;
        Ok(format!("tex:{key}"))
    }
}

pub fn item_body(id: &str, item_type: &str) -> String {
    format!(r#"{{"status":"success","data":{{"data":[{{"id":"{id}","type":"{item_type}","frameDuration":100}}],"total":1}}}}"#)
}

/// Atlas with two `down_idle` frames and one `up_walking` frame.
pub fn atlas_body(key: &str, file_id: &str) -> String {
    format!(
        r#"{{"status":"success","data":{{"data":[{{"itemKey":"{key}","fileId":"{file_id}","width":64,"height":64,"cellSize":32,
        "frames":{{
            "down_idle":[{{"x":0,"y":0,"width":32,"height":32,"frameIndex":0}},{{"x":32,"y":0,"width":32,"height":32,"frameIndex":1}}],
            "up_walking":[{{"x":0,"y":32,"width":32,"height":32,"frameIndex":0}}]
        }}}}],"total":1}}}}"#
    )
}

/// Fetcher serving a complete item: metadata, atlas and a non-empty blob.
pub fn serve_item(fetcher: MapFetcher, config: &ClientConfig, id: &str, item_type: &str) -> MapFetcher {
    let file_id = format!("{id}-file");
    fetcher
        .with(config.item_metadata_url(id), &item_body(id, item_type))
        .with(config.atlas_metadata_url(id), &atlas_body(id, &file_id))
        .with(config.blob_url(&file_id), "png-bytes")
}
