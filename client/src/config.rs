use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bevy::prelude::*;
use gridsync_protocol::messages::InitData;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a JSON file with a [`ClientConfig`].
pub const CONFIG_ENV: &str = "GRIDSYNC_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Local settings of the client, as opposed to [`GameConfig`] which the
/// server sends.
///
/// Endpoint paths are templates; `{id}` is replaced by the item id, item key
/// or blob id being fetched.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Game server address, used by the `quinnet` transport.
    pub server_addr: String,
    pub asset_base_url: String,
    pub item_metadata_path: String,
    pub atlas_metadata_path: String,
    pub blob_path: String,
    pub max_players: usize,
    pub max_bots: usize,
    pub max_objects: usize,
    /// Initial size of each asset cache. Caches grow past it.
    pub cache_capacity: usize,
    pub fetch_workers: usize,
    pub error_banner_secs: f32,
    pub ping_interval_secs: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:6000".into(),
            asset_base_url: "http://localhost:4005".into(),
            item_metadata_path: "/api/object-layer?item_id={id}".into(),
            atlas_metadata_path: "/api/atlas-sprite-sheet?item_key={id}".into(),
            blob_path: "/api/file/blob/{id}".into(),
            max_players: 256,
            max_bots: 256,
            max_objects: 4096,
            cache_capacity: 512,
            fetch_workers: 2,
            error_banner_secs: 4.0,
            ping_interval_secs: 1.0,
        }
    }
}

impl ClientConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    /// Loads the file named by [`CONFIG_ENV`], or the defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::load(path),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn item_metadata_url(&self, item_id: &str) -> String {
        self.endpoint(&self.item_metadata_path, item_id)
    }

    pub fn atlas_metadata_url(&self, item_key: &str) -> String {
        self.endpoint(&self.atlas_metadata_path, item_key)
    }

    pub fn blob_url(&self, file_id: &str) -> String {
        self.endpoint(&self.blob_path, file_id)
    }

    fn endpoint(&self, template: &str, id: &str) -> String {
        format!(
            "{}{}",
            self.asset_base_url.trim_end_matches('/'),
            template.replace("{id}", id)
        )
    }
}

/// World settings from the server's `init_data`.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub grid_size: UVec2,
    pub cell_size: f32,
    pub fps: u32,
    pub interpolation_ms: f32,
    pub aoi_radius: f32,
    pub default_object_dims: Vec2,
    pub camera_smoothing: f32,
    pub camera_zoom: f32,
    pub dev_ui: bool,
    pub sum_stats_limit: u32,
    pub colors: HashMap<String, Color>,
    /// Set once the server has sent `init_data`.
    pub initialized: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        let mut config = Self::from(InitData::default());
        config.initialized = false;
        config
    }
}

impl From<InitData> for GameConfig {
    fn from(init: InitData) -> Self {
        Self {
            grid_size: UVec2::new(init.grid_w, init.grid_h),
            cell_size: init.cell_size,
            fps: init.fps,
            interpolation_ms: init.interpolation_ms,
            aoi_radius: init.aoi_radius,
            default_object_dims: Vec2::new(init.default_object_width, init.default_object_height),
            camera_smoothing: init.camera_smoothing,
            camera_zoom: init.camera_zoom,
            dev_ui: init.dev_ui,
            sum_stats_limit: init.sum_stats_limit,
            colors: init
                .colors
                .into_iter()
                .map(|(name, c)| (name, Color::srgba_u8(c.r, c.g, c.b, c.a)))
                .collect(),
            initialized: true,
        }
    }
}

impl GameConfig {
    pub fn color(&self, name: &str) -> Option<Color> {
        self.colors.get(name).copied()
    }

    /// Grid coordinates to world pixels. Grid y grows downwards.
    pub fn to_pixels(&self, grid: Vec2) -> Vec2 {
        Vec2::new(grid.x, -grid.y) * self.cell_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_substitute_ids() {
        let config = ClientConfig {
            asset_base_url: "http://assets.local/".into(),
            ..Default::default()
        };
        assert_eq!(
            config.blob_url("f-9"),
            "http://assets.local/api/file/blob/f-9"
        );
        assert_eq!(
            config.atlas_metadata_url("sword"),
            "http://assets.local/api/atlas-sprite-sheet?item_key=sword"
        );
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"max_players": 8}"#).unwrap();
        assert_eq!(config.max_players, 8);
        assert_eq!(config.max_bots, ClientConfig::default().max_bots);
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let err = ClientConfig::load("/nonexistent/gridsync.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn game_config_defaults_until_init() {
        let config = GameConfig::default();
        assert!(!config.initialized);
        assert_eq!(config.cell_size, 12.0);
        assert_eq!(config.interpolation_ms, 200.0);
        assert_eq!(config.to_pixels(Vec2::new(2.0, 3.0)), Vec2::new(24.0, -36.0));
    }
}
