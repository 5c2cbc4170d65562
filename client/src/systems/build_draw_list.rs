use bevy::prelude::*;
use gridsync_protocol::messages::GridObjectKind;

use crate::animation::{AnimationTracker, Owner};
use crate::assets::{AssetFetcher, ImageAssets};
use crate::config::GameConfig;
use crate::resources::DrawList;
use crate::view::DrawContext;
use crate::world::WorldState;

/// Drives the asset caches and animations and rebuilds the draw list.
/// Floors go first, foregrounds last.
#[allow(clippy::too_many_arguments)]
pub fn build_draw_list(
    time: Res<Time>,
    game: Res<GameConfig>,
    world: Res<WorldState>,
    fetcher: Res<AssetFetcher>,
    mut tracker: ResMut<AnimationTracker>,
    mut assets: ResMut<ImageAssets>,
    mut images: ResMut<Assets<Image>>,
    mut draw_list: ResMut<DrawList>,
) {
    draw_list.0.clear();
    let mut ctx = DrawContext {
        now: time.elapsed_secs_f64(),
        config: &*game,
        tracker: &mut *tracker,
        assets: &mut *assets,
        fetcher: fetcher.0.as_ref(),
        store: &mut *images,
    };

    for kind in [GridObjectKind::Floor, GridObjectKind::Obstacle, GridObjectKind::Portal] {
        for object in world.objects.of_kind(kind) {
            draw_list.0.extend(ctx.compose_object(object));
        }
    }
    for entity in world.entities() {
        draw_list.0.extend(ctx.compose_entity(entity));
    }
    for object in world.objects.of_kind(GridObjectKind::Foreground) {
        draw_list.0.extend(ctx.compose_object(object));
    }

    let alive = world
        .entities()
        .map(|e| Owner::entity(&e.id))
        .chain(world.objects.iter().map(|o| Owner::object(&o.id)));
    tracker.prune(alive);
}
