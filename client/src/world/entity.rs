use bevy::prelude::*;
use gridsync_protocol::constants::{MAX_OBJECT_LAYERS, MAX_PATH_POINTS};
use gridsync_protocol::messages::{
    Direction, EntitySnapshot, Mode, ObjectLayerSnapshot, PlayerSnapshot,
};

/// Local mirror of one moving entity.
///
/// `interp_pos` is what gets drawn. It always lies on the segment between
/// `pos_prev` and `pos_server`.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityState {
    pub id: String,
    pub pos_server: Vec2,
    pub pos_prev: Vec2,
    pub interp_pos: Vec2,
    pub dims: Vec2,
    pub direction: Direction,
    pub mode: Mode,
    pub life: f32,
    pub max_life: f32,
    pub respawn_in: Option<f32>,
    pub layers: Vec<ObjectLayerSnapshot>,
}

impl EntityState {
    pub fn from_snapshot(id: String, snap: &EntitySnapshot, default_dims: Vec2) -> Self {
        let pos = Vec2::from(snap.pos);
        let mut state = Self {
            id,
            pos_server: pos,
            pos_prev: pos,
            interp_pos: pos,
            dims: default_dims,
            direction: Direction::None,
            mode: Mode::Idle,
            life: 0.0,
            max_life: 0.0,
            respawn_in: None,
            layers: Vec::new(),
        };
        state.copy_fields(snap, default_dims);
        state
    }

    /// Takes a newer snapshot. Motion restarts from wherever the entity is
    /// currently drawn, so there is no jump.
    pub fn apply_snapshot(&mut self, snap: &EntitySnapshot, default_dims: Vec2) {
        self.pos_prev = self.interp_pos;
        self.pos_server = Vec2::from(snap.pos);
        self.copy_fields(snap, default_dims);
    }

    pub fn interpolate(&mut self, factor: f32) {
        self.interp_pos = if factor <= 0.0 {
            self.pos_prev
        } else if factor >= 1.0 {
            self.pos_server
        } else {
            self.pos_prev.lerp(self.pos_server, factor)
        };
    }

    pub fn active_layers(&self) -> impl Iterator<Item = &ObjectLayerSnapshot> {
        self.layers.iter().filter(|l| l.active)
    }

    fn copy_fields(&mut self, snap: &EntitySnapshot, default_dims: Vec2) {
        self.dims = snap.dims.map(Vec2::from).unwrap_or(default_dims);
        self.direction = snap.direction;
        self.mode = snap.mode;
        self.life = snap.life;
        self.max_life = snap.max_life;
        self.respawn_in = snap.respawn_in;
        self.layers.clear();
        self.layers
            .extend(snap.object_layers.iter().take(MAX_OBJECT_LAYERS).cloned());
    }
}

/// Anything kept in an [`EntityTable`](super::EntityTable).
pub trait Tracked {
    type Snapshot;

    fn create(id: String, snap: &Self::Snapshot, default_dims: Vec2) -> Self;
    fn update(&mut self, snap: &Self::Snapshot, default_dims: Vec2);
    fn entity(&self) -> &EntityState;
    fn entity_mut(&mut self) -> &mut EntityState;

    fn id(&self) -> &str {
        &self.entity().id
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub entity: EntityState,
    pub map_id: Option<String>,
    pub path: Vec<Vec2>,
    /// Grid cell the player was last asked to walk to.
    pub target: Option<Vec2>,
}

impl PlayerState {
    fn copy_player_fields(&mut self, snap: &PlayerSnapshot) {
        self.map_id = snap.map_id.clone();
        self.path.clear();
        self.path
            .extend(snap.path.iter().take(MAX_PATH_POINTS).map(|&p| Vec2::from(p)));
        if let Some(target) = snap.target_pos {
            self.target = Some(target.into());
        }
        if self.target == Some(self.entity.pos_server) {
            self.target = None;
        }
    }
}

impl Tracked for PlayerState {
    type Snapshot = PlayerSnapshot;

    fn create(id: String, snap: &PlayerSnapshot, default_dims: Vec2) -> Self {
        let mut player = Self {
            entity: EntityState::from_snapshot(id, &snap.entity, default_dims),
            map_id: None,
            path: Vec::new(),
            target: None,
        };
        player.copy_player_fields(snap);
        player
    }

    fn update(&mut self, snap: &PlayerSnapshot, default_dims: Vec2) {
        self.entity.apply_snapshot(&snap.entity, default_dims);
        self.copy_player_fields(snap);
    }

    fn entity(&self) -> &EntityState {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut EntityState {
        &mut self.entity
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BotState {
    pub entity: EntityState,
}

impl Tracked for BotState {
    type Snapshot = EntitySnapshot;

    fn create(id: String, snap: &EntitySnapshot, default_dims: Vec2) -> Self {
        Self {
            entity: EntityState::from_snapshot(id, snap, default_dims),
        }
    }

    fn update(&mut self, snap: &EntitySnapshot, default_dims: Vec2) {
        self.entity.apply_snapshot(snap, default_dims);
    }

    fn entity(&self) -> &EntityState {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut EntityState {
        &mut self.entity
    }
}
