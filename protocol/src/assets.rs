//! Wire types of the asset endpoints: per-item metadata, atlas metadata and
//! the paginated envelope both are wrapped in.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_FRAME_DURATION_MS;
use crate::messages::{de_id, de_opt_id, Direction};

/// Direction/mode keys an atlas carries frame lists for: eight idle
/// directions, the default and none idles, and eight walking directions.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DirectionKey {
    UpIdle,
    UpRightIdle,
    RightIdle,
    DownRightIdle,
    DownIdle,
    DownLeftIdle,
    LeftIdle,
    UpLeftIdle,
    DefaultIdle,
    NoneIdle,
    UpWalking,
    UpRightWalking,
    RightWalking,
    DownRightWalking,
    DownWalking,
    DownLeftWalking,
    LeftWalking,
    UpLeftWalking,
}

impl DirectionKey {
    pub const ALL: [DirectionKey; 18] = [
        DirectionKey::UpIdle,
        DirectionKey::UpRightIdle,
        DirectionKey::RightIdle,
        DirectionKey::DownRightIdle,
        DirectionKey::DownIdle,
        DirectionKey::DownLeftIdle,
        DirectionKey::LeftIdle,
        DirectionKey::UpLeftIdle,
        DirectionKey::DefaultIdle,
        DirectionKey::NoneIdle,
        DirectionKey::UpWalking,
        DirectionKey::UpRightWalking,
        DirectionKey::RightWalking,
        DirectionKey::DownRightWalking,
        DirectionKey::DownWalking,
        DirectionKey::DownLeftWalking,
        DirectionKey::LeftWalking,
        DirectionKey::UpLeftWalking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DirectionKey::UpIdle => "up_idle",
            DirectionKey::UpRightIdle => "up_right_idle",
            DirectionKey::RightIdle => "right_idle",
            DirectionKey::DownRightIdle => "down_right_idle",
            DirectionKey::DownIdle => "down_idle",
            DirectionKey::DownLeftIdle => "down_left_idle",
            DirectionKey::LeftIdle => "left_idle",
            DirectionKey::UpLeftIdle => "up_left_idle",
            DirectionKey::DefaultIdle => "default_idle",
            DirectionKey::NoneIdle => "none_idle",
            DirectionKey::UpWalking => "up_walking",
            DirectionKey::UpRightWalking => "up_right_walking",
            DirectionKey::RightWalking => "right_walking",
            DirectionKey::DownRightWalking => "down_right_walking",
            DirectionKey::DownWalking => "down_walking",
            DirectionKey::DownLeftWalking => "down_left_walking",
            DirectionKey::LeftWalking => "left_walking",
            DirectionKey::UpLeftWalking => "up_left_walking",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    /// Idle key for a facing direction; `None` has its own key.
    pub fn idle(direction: Direction) -> Self {
        match direction {
            Direction::Up => DirectionKey::UpIdle,
            Direction::UpRight => DirectionKey::UpRightIdle,
            Direction::Right => DirectionKey::RightIdle,
            Direction::DownRight => DirectionKey::DownRightIdle,
            Direction::Down => DirectionKey::DownIdle,
            Direction::DownLeft => DirectionKey::DownLeftIdle,
            Direction::Left => DirectionKey::LeftIdle,
            Direction::UpLeft => DirectionKey::UpLeftIdle,
            Direction::None => DirectionKey::NoneIdle,
        }
    }

    /// Walking key for a compass direction. There is no walking key without
    /// a direction.
    pub fn walking(direction: Direction) -> Option<Self> {
        Some(match direction {
            Direction::Up => DirectionKey::UpWalking,
            Direction::UpRight => DirectionKey::UpRightWalking,
            Direction::Right => DirectionKey::RightWalking,
            Direction::DownRight => DirectionKey::DownRightWalking,
            Direction::Down => DirectionKey::DownWalking,
            Direction::DownLeft => DirectionKey::DownLeftWalking,
            Direction::Left => DirectionKey::LeftWalking,
            Direction::UpLeft => DirectionKey::UpLeftWalking,
            Direction::None => return None,
        })
    }
}

/// Region of the atlas image holding one animation frame, in pixels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default, rename = "frameIndex", alias = "index")]
    pub index: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AtlasMetadata {
    #[serde(alias = "key", alias = "itemId", deserialize_with = "de_id")]
    pub item_key: String,
    /// Blob id of the backing image.
    #[serde(alias = "file", deserialize_with = "de_id")]
    pub file_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default, alias = "cellPixelDim")]
    pub cell_size: u32,
    /// Frame lists keyed by [`DirectionKey::as_str`]. Unknown keys are kept
    /// but never looked up.
    #[serde(default)]
    pub frames: BTreeMap<String, Vec<FrameRect>>,
}

impl AtlasMetadata {
    pub fn frames_for(&self, key: DirectionKey) -> &[FrameRect] {
        self.frames.get(key.as_str()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn frame(&self, key: DirectionKey, index: usize) -> Option<&FrameRect> {
        self.frames_for(key).get(index)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Stats {
    pub effect: i32,
    pub resistance: i32,
    pub agility: i32,
    pub range: i32,
    pub intelligence: i32,
    pub utility: i32,
}

fn default_frame_duration() -> u32 {
    DEFAULT_FRAME_DURATION_MS
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemMetadata {
    #[serde(alias = "itemId", deserialize_with = "de_id")]
    pub id: String,
    #[serde(default, rename = "type", alias = "itemType")]
    pub item_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub activable: bool,
    #[serde(default)]
    pub stats: Stats,
    /// Milliseconds each frame stays on screen.
    #[serde(default = "default_frame_duration")]
    pub frame_duration: u32,
    /// One idle animation regardless of facing.
    #[serde(default, alias = "isStateless")]
    pub stateless: bool,
    /// Legacy inline frame counts, keyed like atlas frame lists.
    #[serde(default)]
    pub frame_counts: BTreeMap<String, u32>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub atlas_key: Option<String>,
}

impl ItemMetadata {
    pub fn inline_frame_count(&self, key: DirectionKey) -> Option<usize> {
        self.frame_counts
            .get(key.as_str())
            .map(|&n| n as usize)
            .filter(|&n| n > 0)
    }
}

/// `{"status": .., "data": ..}` wrapper of the asset API. `data` is either a
/// page `{"data": [..], "total": n}`, a bare list, or a single record.
#[derive(Deserialize, Debug)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    pub data: ApiData<T>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum ApiData<T> {
    Page {
        data: Vec<T>,
        #[serde(default)]
        total: Option<u64>,
    },
    List(Vec<T>),
    Single(T),
}

impl<T> ApiEnvelope<T> {
    /// First record of a successful response.
    pub fn into_first(self) -> Option<T> {
        if self.status.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("error")) {
            return None;
        }
        match self.data {
            ApiData::Page { data, .. } | ApiData::List(data) => data.into_iter().next(),
            ApiData::Single(item) => Some(item),
        }
    }
}

/// Parses an API response body and extracts its first record.
pub fn first_result<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, serde_json::Error> {
    let envelope: ApiEnvelope<T> = serde_json::from_slice(body)?;
    Ok(envelope.into_first())
}
