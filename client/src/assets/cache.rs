use std::collections::HashMap;

use bevy::prelude::*;
use bevy::tasks::block_on;
use bevy::tasks::futures_lite::future::poll_once;

use super::error::AssetError;
use super::fetch::PendingFetch;

/// Load state of one key. `Failed` is terminal.
pub enum LoadState<V> {
    Loading { token: u64, pending: PendingFetch },
    Ready(V),
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    NotRequested,
    Loading,
    Ready,
    Failed,
}

/// Keyed cache whose values arrive asynchronously.
///
/// [`request`](FetchCache::request) never blocks: the first call for a key
/// starts exactly one fetch and returns `None`; later calls poll it once and
/// return the value when it is ready. Tokens count the fetches started.
pub struct FetchCache<V> {
    name: &'static str,
    entries: HashMap<String, LoadState<V>>,
    next_token: u64,
}

impl<V: Clone> FetchCache<V> {
    pub fn with_capacity(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            entries: HashMap::with_capacity(capacity),
            next_token: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fetches ever started.
    pub fn tokens_issued(&self) -> u64 {
        self.next_token
    }

    pub fn status(&self, key: &str) -> CacheStatus {
        match self.entries.get(key) {
            None => CacheStatus::NotRequested,
            Some(LoadState::Loading { .. }) => CacheStatus::Loading,
            Some(LoadState::Ready(_)) => CacheStatus::Ready,
            Some(LoadState::Failed) => CacheStatus::Failed,
        }
    }

    /// The value for `key` if it is ready. Never starts a fetch.
    pub fn get(&self, key: &str) -> Option<&V> {
        match self.entries.get(key) {
            Some(LoadState::Ready(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the value for `key`, starting or polling its fetch as needed.
    ///
    /// `start` runs only for a key never seen before. `finish` turns the
    /// fetched bytes into a value; an error from it, or from the fetch, marks
    /// the key failed for good.
    pub fn request(
        &mut self,
        key: &str,
        start: impl FnOnce() -> PendingFetch,
        finish: impl FnOnce(Vec<u8>) -> Result<V, AssetError>,
    ) -> Option<V> {
        let Some(entry) = self.entries.get_mut(key) else {
            let token = self.next_token;
            self.next_token += 1;
            debug!("{} cache: fetching {key} (token {token})", self.name);
            self.entries.insert(
                key.to_string(),
                LoadState::Loading {
                    token,
                    pending: start(),
                },
            );
            return None;
        };

        let (token, polled) = match &mut *entry {
            LoadState::Ready(value) => return Some(value.clone()),
            LoadState::Failed => return None,
            LoadState::Loading { token, pending } => (*token, block_on(poll_once(pending.as_mut()))),
        };
        let result = polled?;

        match result.map_err(AssetError::from).and_then(finish) {
            Ok(value) => {
                debug!("{} cache: {key} ready (token {token})", self.name);
                *entry = LoadState::Ready(value.clone());
                Some(value)
            }
            Err(err) => {
                warn!("{} cache: {key} failed (token {token}): {err}", self.name);
                *entry = LoadState::Failed;
                None
            }
        }
    }
}
