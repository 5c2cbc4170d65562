use bevy::prelude::*;

use crate::components::{LocalPlayer, NetEntity, NetKind};
use crate::config::GameConfig;
use crate::resources::SpawnedEntities;
use crate::world::WorldState;

/// Spawns, moves and despawns one ECS entity per tracked entity.
pub fn sync_net_entities(
    mut commands: Commands,
    world: Res<WorldState>,
    game: Res<GameConfig>,
    mut spawned: ResMut<SpawnedEntities>,
    mut q: Query<(&mut Transform, &mut NetEntity)>,
) {
    let main_id = world.main_player_id();
    for e in world.entities() {
        let translation = game.to_pixels(e.interp_pos).extend(1.0);
        let kind = if main_id == Some(e.id.as_str()) {
            NetKind::MainPlayer
        } else if world.players.contains(&e.id) {
            NetKind::Player
        } else {
            NetKind::Bot
        };

        if let Some(&entity) = spawned.0.get(&e.id) {
            if let Ok((mut t, mut net)) = q.get_mut(entity) {
                t.translation = translation;
                // the main player can change id onto an already spawned player
                if net.kind != kind {
                    if kind == NetKind::MainPlayer {
                        commands.entity(entity).insert(LocalPlayer);
                    } else if net.kind == NetKind::MainPlayer {
                        commands.entity(entity).remove::<LocalPlayer>();
                    }
                    debug!("{} is now {:?}", e.id, kind);
                    net.kind = kind;
                }
            }
            continue;
        }

        let mut cmd = commands.spawn((
            Transform::from_translation(translation),
            NetEntity {
                id: e.id.clone(),
                kind,
            },
        ));
        if kind == NetKind::MainPlayer {
            cmd.insert(LocalPlayer);
        }
        spawned.0.insert(e.id.clone(), cmd.id());
        debug!("spawned {:?} {}", kind, e.id);
    }

    spawned.0.retain(|id, entity| {
        let alive = world.find(id).is_some();
        if !alive {
            commands.entity(*entity).despawn();
        }
        alive
    });
}
