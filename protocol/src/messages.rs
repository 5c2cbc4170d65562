use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::*;

// ----- Shared wire types -----

/// Grid position as the server writes it: `{"X": .., "Y": ..}`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct WirePos {
    #[serde(rename = "X", alias = "x")]
    pub x: f32,
    #[serde(rename = "Y", alias = "y")]
    pub y: f32,
}

impl From<WirePos> for Vec2 {
    fn from(p: WirePos) -> Self {
        Vec2::new(p.x, p.y)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct WireDims {
    #[serde(rename = "Width", alias = "width")]
    pub width: f32,
    #[serde(rename = "Height", alias = "height")]
    pub height: f32,
}

impl From<WireDims> for Vec2 {
    fn from(d: WireDims) -> Self {
        Vec2::new(d.width, d.height)
    }
}

/// Facing direction. On the wire either a name (`"UP_RIGHT"`, `"up_right"`)
/// or its index in declaration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    #[default]
    None,
}

impl Direction {
    pub const COMPASS: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::UpRight => "up_right",
            Direction::Right => "right",
            Direction::DownRight => "down_right",
            Direction::Down => "down",
            Direction::DownLeft => "down_left",
            Direction::Left => "left",
            Direction::UpLeft => "up_left",
            Direction::None => "none",
        }
    }

    fn from_index(i: u64) -> Option<Self> {
        match i {
            0..=7 => Some(Self::COMPASS[i as usize]),
            8 => Some(Direction::None),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let folded: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::COMPASS
            .iter()
            .copied()
            .chain(std::iter::once(Direction::None))
            .find(|d| d.as_str().replace('_', "") == folded)
    }
}

/// Locomotion mode, by name or index like [`Direction`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Idle,
    Walking,
    Teleporting,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Walking => "walking",
            Mode::Teleporting => "teleporting",
        }
    }
}

/// Enum-ish wire value: a name or a numeric index.
#[derive(Deserialize)]
#[serde(untagged)]
enum NameOrIndex {
    Index(u64),
    Name(String),
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let parsed = match NameOrIndex::deserialize(d)? {
            NameOrIndex::Index(i) => Direction::from_index(i),
            NameOrIndex::Name(s) => Direction::from_name(&s),
        };
        parsed.ok_or_else(|| serde::de::Error::custom("unknown direction"))
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let parsed = match NameOrIndex::deserialize(d)? {
            NameOrIndex::Index(0) => Some(Mode::Idle),
            NameOrIndex::Index(1) => Some(Mode::Walking),
            NameOrIndex::Index(2) => Some(Mode::Teleporting),
            NameOrIndex::Index(_) => None,
            NameOrIndex::Name(s) => match s.to_ascii_lowercase().as_str() {
                "idle" => Some(Mode::Idle),
                "walking" => Some(Mode::Walking),
                "teleporting" => Some(Mode::Teleporting),
                _ => None,
            },
        };
        parsed.ok_or_else(|| serde::de::Error::custom("unknown mode"))
    }
}

impl Serialize for Mode {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Ids arrive as strings from most endpoints and as integers from a few.
pub(crate) fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    RawId::deserialize(d).map(String::from)
}

pub(crate) fn de_opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(d).map(|raw| raw.map(String::from))
}

fn one() -> u32 {
    1
}

// ----- Server → Client -----

/// One equip/visual slot of an entity.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ObjectLayerSnapshot {
    #[serde(
        rename = "itemId",
        alias = "ItemID",
        alias = "itemID",
        deserialize_with = "de_id"
    )]
    pub item_id: String,
    #[serde(default, alias = "Active")]
    pub active: bool,
    #[serde(default = "one", alias = "Quantity")]
    pub quantity: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EntitySnapshot {
    #[serde(default, alias = "ID", alias = "Id", deserialize_with = "de_id")]
    pub id: String,
    #[serde(rename = "Pos", alias = "pos")]
    pub pos: WirePos,
    #[serde(rename = "Dims", alias = "dims", default)]
    pub dims: Option<WireDims>,
    #[serde(default, alias = "Direction")]
    pub direction: Direction,
    #[serde(default, alias = "Mode")]
    pub mode: Mode,
    #[serde(default, alias = "Life")]
    pub life: f32,
    #[serde(default, rename = "maxLife", alias = "MaxLife")]
    pub max_life: f32,
    #[serde(default, rename = "respawnIn", alias = "RespawnIn")]
    pub respawn_in: Option<f32>,
    #[serde(default, rename = "objectLayers", alias = "ObjectLayers")]
    pub object_layers: Vec<ObjectLayerSnapshot>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PlayerSnapshot {
    #[serde(flatten)]
    pub entity: EntitySnapshot,
    #[serde(
        default,
        rename = "mapId",
        alias = "MapID",
        alias = "mapID",
        deserialize_with = "de_opt_id"
    )]
    pub map_id: Option<String>,
    #[serde(default, alias = "Path")]
    pub path: Vec<WirePos>,
    #[serde(default, rename = "targetPos", alias = "TargetPos")]
    pub target_pos: Option<WirePos>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GridObjectKind {
    Obstacle,
    Foreground,
    Portal,
    Floor,
    Bot,
    #[serde(other)]
    Unknown,
}

/// One entry of `visibleGridObjects`; `kind` picks the target collection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GridObjectSnapshot {
    #[serde(rename = "Type", alias = "type")]
    pub kind: GridObjectKind,
    #[serde(default, rename = "PortalLabel", alias = "portalLabel")]
    pub portal_label: Option<String>,
    #[serde(flatten)]
    pub entity: EntitySnapshot,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AoiUpdate {
    pub player: PlayerSnapshot,
    #[serde(default)]
    pub visible_players: BTreeMap<String, PlayerSnapshot>,
    #[serde(default)]
    pub visible_grid_objects: BTreeMap<String, GridObjectSnapshot>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

/// `init_data` payload. Every field is optional on the wire.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct InitData {
    pub grid_w: u32,
    pub grid_h: u32,
    pub cell_size: f32,
    pub fps: u32,
    pub interpolation_ms: f32,
    pub aoi_radius: f32,
    pub default_object_width: f32,
    pub default_object_height: f32,
    pub camera_smoothing: f32,
    pub camera_zoom: f32,
    pub dev_ui: bool,
    pub sum_stats_limit: u32,
    pub colors: BTreeMap<String, Rgba>,
}

impl Default for InitData {
    fn default() -> Self {
        Self {
            grid_w: DEFAULT_GRID_W,
            grid_h: DEFAULT_GRID_H,
            cell_size: DEFAULT_CELL_SIZE,
            fps: DEFAULT_FPS,
            interpolation_ms: DEFAULT_INTERPOLATION_MS,
            aoi_radius: DEFAULT_AOI_RADIUS,
            default_object_width: DEFAULT_OBJECT_WIDTH,
            default_object_height: DEFAULT_OBJECT_HEIGHT,
            camera_smoothing: DEFAULT_CAMERA_SMOOTHING,
            camera_zoom: DEFAULT_CAMERA_ZOOM,
            dev_ui: false,
            sum_stats_limit: DEFAULT_SUM_STATS_LIMIT,
            colors: BTreeMap::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillItemIds {
    #[serde(deserialize_with = "de_id")]
    pub requested_item_id: String,
    #[serde(default)]
    pub associated_item_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerError {
    #[serde(default)]
    pub message: String,
}

/// Discriminant of an inbound frame, as written in its `type` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    InitData,
    AoiUpdate,
    SkillItemIds,
    Error,
    Ping,
    Pong,
}

impl MessageKind {
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "init_data" => Some(MessageKind::InitData),
            "aoi_update" => Some(MessageKind::AoiUpdate),
            "skill_item_ids" => Some(MessageKind::SkillItemIds),
            "error" => Some(MessageKind::Error),
            "ping" => Some(MessageKind::Ping),
            "pong" => Some(MessageKind::Pong),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::InitData => "init_data",
            MessageKind::AoiUpdate => "aoi_update",
            MessageKind::SkillItemIds => "skill_item_ids",
            MessageKind::Error => "error",
            MessageKind::Ping => "ping",
            MessageKind::Pong => "pong",
        }
    }

    /// Whether a frame of this kind is meaningless without a payload.
    pub fn needs_payload(self) -> bool {
        !matches!(self, MessageKind::Ping | MessageKind::Pong)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum S2C {
    InitData(InitData),
    AoiUpdate(Box<AoiUpdate>),
    SkillItemIds(SkillItemIds),
    Error(ServerError),
    Ping,
    Pong,
}

impl S2C {
    pub fn kind(&self) -> MessageKind {
        match self {
            S2C::InitData(_) => MessageKind::InitData,
            S2C::AoiUpdate(_) => MessageKind::AoiUpdate,
            S2C::SkillItemIds(_) => MessageKind::SkillItemIds,
            S2C::Error(_) => MessageKind::Error,
            S2C::Ping => MessageKind::Ping,
            S2C::Pong => MessageKind::Pong,
        }
    }
}

// ----- Client → Server -----

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum C2S {
    PlayerAction(PlayerAction),
    ItemAction(ItemAction),
    Ping,
    Pong,
}

/// Move intent in grid cells, never pixels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAction {
    pub target_x: i32,
    pub target_y: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemAction {
    pub item_id: String,
    pub activate: bool,
}
