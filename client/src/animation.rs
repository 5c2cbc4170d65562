//! Per (entity, item) animation playback.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use gridsync_protocol::assets::{AtlasMetadata, DirectionKey, ItemMetadata};
use gridsync_protocol::constants::DEFAULT_FRAME_DURATION_MS;
use gridsync_protocol::messages::{Direction, Mode};

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    pub key: DirectionKey,
    /// Seconds, on the same clock as `Time::elapsed_secs_f64`.
    pub last_advance: f64,
    pub frame_index: usize,
    /// Last direction that was not `None`. Walking without a direction keeps
    /// facing this way.
    pub last_facing: Direction,
}

/// Frame to draw for one layer this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationFrame {
    pub key: DirectionKey,
    pub index: usize,
}

/// Entities and grid objects have separate id spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OwnerKind {
    Entity,
    Object,
}

/// Whose layers an animation belongs to. A bare `&str` is an entity id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Owner<'a> {
    pub kind: OwnerKind,
    pub id: &'a str,
}

impl<'a> Owner<'a> {
    pub fn entity(id: &'a str) -> Self {
        Self {
            kind: OwnerKind::Entity,
            id,
        }
    }

    pub fn object(id: &'a str) -> Self {
        Self {
            kind: OwnerKind::Object,
            id,
        }
    }
}

impl<'a> From<&'a str> for Owner<'a> {
    fn from(id: &'a str) -> Self {
        Owner::entity(id)
    }
}

#[derive(Resource, Default, Debug)]
pub struct AnimationTracker {
    states: HashMap<(OwnerKind, String), HashMap<String, AnimationState>>,
}

pub fn state_key(stateless: bool, direction: Direction, mode: Mode, last_facing: Direction) -> DirectionKey {
    if stateless {
        return DirectionKey::DefaultIdle;
    }
    match mode {
        Mode::Walking => DirectionKey::walking(direction)
            .or_else(|| DirectionKey::walking(last_facing))
            .unwrap_or(DirectionKey::DownWalking),
        Mode::Idle | Mode::Teleporting => match direction {
            Direction::None => DirectionKey::DownIdle,
            facing => DirectionKey::idle(facing),
        },
    }
}

/// Frames available for `key`: the atlas list when loaded, else the item's
/// inline count, else a single frame.
pub fn frame_count(item: Option<&ItemMetadata>, atlas: Option<&AtlasMetadata>, key: DirectionKey) -> usize {
    atlas
        .map(|a| a.frames_for(key).len())
        .filter(|&n| n > 0)
        .or_else(|| item.and_then(|i| i.inline_frame_count(key)))
        .unwrap_or(1)
}

/// Draw order of an item category. Lower is drawn first.
pub fn layer_priority(category: &str) -> u8 {
    match category.to_ascii_lowercase().as_str() {
        "skin" | "body" => 10,
        "eyes" => 11,
        "hair" => 12,
        "clothing" | "breastplate" | "armor" => 20,
        "headgear" | "helmet" | "hat" => 30,
        "weapon" => 40,
        "shield" => 41,
        _ => 50,
    }
}

impl AnimationTracker {
    /// Advances the animation of `item_id` on `owner` to `now` and returns
    /// the frame to show.
    #[allow(clippy::too_many_arguments)]
    pub fn advance<'o>(
        &mut self,
        owner: impl Into<Owner<'o>>,
        item_id: &str,
        direction: Direction,
        mode: Mode,
        now: f64,
        item: Option<&ItemMetadata>,
        atlas: Option<&AtlasMetadata>,
    ) -> AnimationFrame {
        let stateless = item.is_some_and(|i| i.stateless);
        let duration_ms = item.map_or(DEFAULT_FRAME_DURATION_MS, |i| i.frame_duration).max(1);

        let owner = owner.into();
        let per_owner = self
            .states
            .entry((owner.kind, owner.id.to_string()))
            .or_default();
        let Some(state) = per_owner.get_mut(item_id) else {
            let facing = if direction == Direction::None {
                Direction::Down
            } else {
                direction
            };
            let key = state_key(stateless, direction, mode, facing);
            per_owner.insert(
                item_id.to_string(),
                AnimationState {
                    key,
                    last_advance: now,
                    frame_index: 0,
                    last_facing: facing,
                },
            );
            return AnimationFrame { key, index: 0 };
        };

        if direction != Direction::None {
            state.last_facing = direction;
        }
        let key = state_key(stateless, direction, mode, state.last_facing);
        if key != state.key {
            state.key = key;
            state.frame_index = 0;
            state.last_advance = now;
        } else if (now - state.last_advance) * 1000.0 >= duration_ms as f64 {
            let count = frame_count(item, atlas, key);
            state.frame_index = (state.frame_index + 1) % count;
            state.last_advance = now;
        }
        AnimationFrame {
            key,
            index: state.frame_index,
        }
    }

    pub fn state<'o>(&self, owner: impl Into<Owner<'o>>, item_id: &str) -> Option<&AnimationState> {
        let owner = owner.into();
        self.states
            .get(&(owner.kind, owner.id.to_string()))?
            .get(item_id)
    }

    /// Forgets owners that are no longer tracked.
    pub fn prune<'a, O: Into<Owner<'a>>>(&mut self, alive: impl IntoIterator<Item = O>) {
        let alive: HashSet<(OwnerKind, String)> = alive
            .into_iter()
            .map(|owner| {
                let owner = owner.into();
                (owner.kind, owner.id.to_string())
            })
            .collect();
        self.states.retain(|key, _| alive.contains(key));
    }

    pub fn len(&self) -> usize {
        self.states.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
