//! Applies decoded server frames to the world mirror.

use bevy::prelude::*;
use gridsync_protocol::messages::{AoiUpdate, GridObjectKind, SkillItemIds, S2C};
use gridsync_protocol::{decode_server_message, DecodeError};

use crate::config::GameConfig;
use crate::world::{PlayerState, Tracked, WorldError, WorldObject, WorldObjects, WorldState};

/// What a successfully applied frame did.
#[derive(Clone, Debug, PartialEq)]
pub enum Decoded {
    Initialized,
    WorldUpdated {
        /// Players and bots that left the area of interest.
        pruned: usize,
        /// Entities dropped because a table was full.
        rejected: usize,
    },
    SkillItems(SkillItemIds),
    ServerError(String),
    Ping,
    Pong,
}

/// Decodes `raw` and applies it. On error nothing has been modified.
pub fn decode(
    raw: &str,
    world: &mut WorldState,
    config: &mut GameConfig,
    now: f64,
) -> Result<Decoded, DecodeError> {
    let msg = decode_server_message(raw)?;
    apply(msg, world, config, now)
}

pub fn apply(
    msg: S2C,
    world: &mut WorldState,
    config: &mut GameConfig,
    now: f64,
) -> Result<Decoded, DecodeError> {
    match msg {
        S2C::InitData(init) => {
            *config = GameConfig::from(init);
            info!(
                "world {}x{} cells of {}px, interpolation {}ms",
                config.grid_size.x, config.grid_size.y, config.cell_size, config.interpolation_ms
            );
            Ok(Decoded::Initialized)
        }
        S2C::AoiUpdate(aoi) => apply_aoi(*aoi, world, config, now),
        S2C::SkillItemIds(ids) => {
            world
                .skill_items
                .insert(ids.requested_item_id.clone(), ids.associated_item_ids.clone());
            Ok(Decoded::SkillItems(ids))
        }
        S2C::Error(err) => Ok(Decoded::ServerError(err.message)),
        S2C::Ping => Ok(Decoded::Ping),
        S2C::Pong => Ok(Decoded::Pong),
    }
}

/// Map entries may omit their own id; the key is the id then.
fn entity_id<'a>(key: &'a str, own: &'a str) -> &'a str {
    if own.is_empty() {
        key
    } else {
        own
    }
}

fn apply_aoi(
    aoi: AoiUpdate,
    world: &mut WorldState,
    config: &GameConfig,
    now: f64,
) -> Result<Decoded, DecodeError> {
    let main_id = aoi.player.entity.id.clone();
    if main_id.is_empty() {
        return Err(DecodeError::MissingField("player.id"));
    }
    let dims = config.default_object_dims;
    let mut rejected: Vec<WorldError> = Vec::new();

    match world.main_player.as_mut() {
        Some(main) if main.entity.id == main_id => main.update(&aoi.player, dims),
        _ => {
            if let Some(old) = world.main_player_id() {
                info!("main player changed from {old} to {main_id}");
            }
            world.players.remove(&main_id);
            world.main_player = Some(PlayerState::create(main_id.clone(), &aoi.player, dims));
        }
    }

    world.players.begin_cycle();
    for (key, snap) in &aoi.visible_players {
        let id = entity_id(key, &snap.entity.id);
        if id == main_id {
            continue;
        }
        if let Err(e) = world.players.upsert(id, snap, dims) {
            rejected.push(e);
        }
    }
    let mut pruned = world.players.sweep();

    let mut objects = WorldObjects::default();
    world.bots.begin_cycle();
    for (key, obj) in &aoi.visible_grid_objects {
        let id = entity_id(key, &obj.entity.id);
        match obj.kind {
            GridObjectKind::Bot => {
                if let Err(e) = world.bots.upsert(id, &obj.entity, dims) {
                    rejected.push(e);
                }
            }
            _ if objects.len() >= world.max_objects => rejected.push(WorldError::Capacity {
                table: "objects",
                capacity: world.max_objects,
                id: id.to_string(),
            }),
            _ => {
                if let Err(skipped) =
                    objects.insert(WorldObject::from_snapshot(id.to_string(), obj, dims))
                {
                    debug!("skipping grid object {} of unknown type", skipped.id);
                }
            }
        }
    }
    pruned += world.bots.sweep();
    world.objects = objects;

    for err in &rejected {
        warn!("{err}");
    }
    world.last_update = Some(now);
    Ok(Decoded::WorldUpdated {
        pruned,
        rejected: rejected.len(),
    })
}
