use bevy::prelude::*;

use crate::config::GameConfig;
use crate::world::WorldState;

pub fn interpolate_entities(time: Res<Time>, game: Res<GameConfig>, mut world: ResMut<WorldState>) {
    world.interpolate(time.elapsed_secs_f64(), game.interpolation_ms);
}
