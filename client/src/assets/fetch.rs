use std::future::Future;
use std::pin::Pin;

use bevy::prelude::*;

use super::error::FetchError;

/// In-flight request. The caches poll it once per tick and never wait on it.
pub type PendingFetch = Pin<Box<dyn Future<Output = Result<Vec<u8>, FetchError>> + Send + Sync>>;

/// Source of asset bytes. Starting a fetch must return immediately.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> PendingFetch;
}

#[derive(Resource)]
pub struct AssetFetcher(pub Box<dyn Fetcher>);

impl AssetFetcher {
    pub fn new(fetcher: impl Fetcher) -> Self {
        Self(Box::new(fetcher))
    }
}

/// HTTP fetcher running requests on a small tokio runtime it owns.
pub struct HttpFetcher {
    runtime: tokio::runtime::Runtime,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(workers: usize) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers.max(1))
            .thread_name("gridsync-fetch")
            .enable_all()
            .build()?;
        Ok(Self {
            runtime,
            client: reqwest::Client::new(),
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> PendingFetch {
        let client = self.client.clone();
        let target = url.to_string();
        let task = self.runtime.spawn(async move { get_bytes(&client, &target).await });
        let url = url.to_string();
        Box::pin(async move {
            match task.await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Cancelled { url }),
            }
        })
    }
}

async fn get_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let transport = |e: reqwest::Error| FetchError::Transport {
        url: url.to_string(),
        reason: e.to_string(),
    };
    let response = client.get(url).send().await.map_err(transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await.map_err(transport)?;
    Ok(body.to_vec())
}
