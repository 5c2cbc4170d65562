//! Local mirror of everything the server says is visible to the player.

mod entity;
mod error;
mod table;

use std::collections::HashMap;

use bevy::prelude::*;
use gridsync_protocol::constants::MAX_OBJECT_LAYERS;
use gridsync_protocol::messages::{GridObjectKind, GridObjectSnapshot, ObjectLayerSnapshot};

pub use entity::{BotState, EntityState, PlayerState, Tracked};
pub use error::WorldError;
pub use table::EntityTable;

use crate::config::ClientConfig;
use crate::interpolate::interpolation_factor;

/// Static grid object: obstacle, portal, floor or foreground tile.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldObject {
    pub id: String,
    pub kind: GridObjectKind,
    pub pos: Vec2,
    pub dims: Vec2,
    pub portal_label: Option<String>,
    pub layers: Vec<ObjectLayerSnapshot>,
}

impl WorldObject {
    pub fn from_snapshot(id: String, snap: &GridObjectSnapshot, default_dims: Vec2) -> Self {
        Self {
            id,
            kind: snap.kind,
            pos: snap.entity.pos.into(),
            dims: snap.entity.dims.map(Vec2::from).unwrap_or(default_dims),
            portal_label: snap.portal_label.clone(),
            layers: snap
                .entity
                .object_layers
                .iter()
                .take(MAX_OBJECT_LAYERS)
                .cloned()
                .collect(),
        }
    }
}

/// Grid objects of one snapshot, split by type. Replaced as a whole on every
/// update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldObjects {
    pub obstacles: Vec<WorldObject>,
    pub portals: Vec<WorldObject>,
    pub floors: Vec<WorldObject>,
    pub foregrounds: Vec<WorldObject>,
}

impl WorldObjects {
    pub fn len(&self) -> usize {
        self.obstacles.len() + self.portals.len() + self.floors.len() + self.foregrounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorldObject> {
        self.floors
            .iter()
            .chain(&self.obstacles)
            .chain(&self.portals)
            .chain(&self.foregrounds)
    }

    pub fn of_kind(&self, kind: GridObjectKind) -> &[WorldObject] {
        match kind {
            GridObjectKind::Obstacle => &self.obstacles,
            GridObjectKind::Portal => &self.portals,
            GridObjectKind::Floor => &self.floors,
            GridObjectKind::Foreground => &self.foregrounds,
            GridObjectKind::Bot | GridObjectKind::Unknown => &[],
        }
    }

    pub fn find(&self, id: &str) -> Option<&WorldObject> {
        self.iter().find(|o| o.id == id)
    }

    /// Files `object` under its kind. Bots and unknown kinds are not static
    /// objects and are handed back.
    pub fn insert(&mut self, object: WorldObject) -> Result<(), WorldObject> {
        let list = match object.kind {
            GridObjectKind::Obstacle => &mut self.obstacles,
            GridObjectKind::Portal => &mut self.portals,
            GridObjectKind::Floor => &mut self.floors,
            GridObjectKind::Foreground => &mut self.foregrounds,
            GridObjectKind::Bot | GridObjectKind::Unknown => return Err(object),
        };
        list.push(object);
        Ok(())
    }
}

#[derive(Resource, Debug)]
pub struct WorldState {
    pub main_player: Option<PlayerState>,
    pub players: EntityTable<PlayerState>,
    pub bots: EntityTable<BotState>,
    pub objects: WorldObjects,
    pub max_objects: usize,
    /// `Time::elapsed_secs_f64` of the last applied AOI update.
    pub last_update: Option<f64>,
    /// Requested skill item -> items it brings along.
    pub skill_items: HashMap<String, Vec<String>>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl WorldState {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            main_player: None,
            players: EntityTable::new("players", config.max_players),
            bots: EntityTable::new("bots", config.max_bots),
            objects: WorldObjects::default(),
            max_objects: config.max_objects,
            last_update: None,
            skill_items: HashMap::new(),
        }
    }

    pub fn main_player_id(&self) -> Option<&str> {
        self.main_player.as_ref().map(|p| p.entity.id.as_str())
    }

    pub fn find(&self, id: &str) -> Option<&EntityState> {
        if let Some(main) = self.main_player.as_ref().filter(|p| p.entity.id == id) {
            return Some(&main.entity);
        }
        self.players
            .find(id)
            .map(|t| t.entity())
            .or_else(|| self.bots.find(id).map(|t| t.entity()))
    }

    /// Where `id` should be drawn this frame, in grid units.
    pub fn display_position(&self, id: &str) -> Option<Vec2> {
        self.find(id)
            .map(|e| e.interp_pos)
            .or_else(|| self.objects.find(id).map(|o| o.pos))
    }

    pub fn active_layers(&self, id: &str) -> Vec<&ObjectLayerSnapshot> {
        match self.find(id) {
            Some(e) => e.active_layers().collect(),
            None => self
                .objects
                .find(id)
                .map(|o| o.layers.iter().filter(|l| l.active).collect())
                .unwrap_or_default(),
        }
    }

    /// Every moving entity, main player first.
    pub fn entities(&self) -> impl Iterator<Item = &EntityState> {
        self.main_player
            .iter()
            .map(|t| t.entity())
            .chain(self.players.iter().map(|t| t.entity()))
            .chain(self.bots.iter().map(|t| t.entity()))
    }

    pub fn tracked_ids(&self) -> Vec<&str> {
        self.entities().map(|e| e.id.as_str()).collect()
    }

    /// Moves every `interp_pos` towards its server position. Safe to call any
    /// number of times per frame.
    pub fn interpolate(&mut self, now: f64, window_ms: f32) {
        let factor = match self.last_update {
            Some(last) => interpolation_factor(now, last, window_ms),
            None => 1.0,
        };
        if let Some(main) = self.main_player.as_mut() {
            main.entity.interpolate(factor);
        }
        for p in self.players.iter_mut() {
            p.entity_mut().interpolate(factor);
        }
        for b in self.bots.iter_mut() {
            b.entity_mut().interpolate(factor);
        }
    }

    pub fn clear(&mut self) {
        self.main_player = None;
        self.players.clear();
        self.bots.clear();
        self.objects = WorldObjects::default();
        self.last_update = None;
    }
}
