use bevy::prelude::*;

use crate::components::NetEntity;
use crate::config::GameConfig;
use crate::resources::CameraFollow;
use crate::world::WorldState;

/// Keeps the 2D camera on the main player's drawn position.
pub fn follow_main_player(
    world: Res<WorldState>,
    game: Res<GameConfig>,
    mut follow: ResMut<CameraFollow>,
    mut q_cam: Query<&mut Transform, (With<Camera2d>, Without<NetEntity>)>,
) {
    let Some(target) = world
        .main_player_id()
        .and_then(|id| world.display_position(id))
    else {
        return;
    };
    follow.update(game.to_pixels(target), game.camera_smoothing, game.camera_zoom);

    for mut t in q_cam.iter_mut() {
        t.translation.x = follow.center.x;
        t.translation.y = follow.center.y;
        t.scale = Vec3::splat(1.0 / follow.zoom);
    }
}
