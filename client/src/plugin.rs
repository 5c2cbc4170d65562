use bevy::prelude::*;

use crate::animation::AnimationTracker;
use crate::assets::{AssetFetcher, HttpFetcher, ImageAssets};
use crate::config::{ClientConfig, GameConfig};
use crate::events::{ServerErrorEvent, SkillItemsEvent, WorldInitialized};
use crate::resources::{
    CameraFollow, DrawList, ErrorBanner, Inbox, Outbox, PingTimer, SpawnedEntities,
};
use crate::systems::{
    build_draw_list::build_draw_list, camera::follow_main_player, error_banner::tick_error_banner,
    interpolate_entities::interpolate_entities, network::receive_server_messages, ping::send_ping,
    sync_net_entities::sync_net_entities,
};
use crate::world::WorldState;

/// Per-frame order: apply server frames, move entities, then present.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SyncSet {
    Receive,
    Interpolate,
    Present,
}

/// Installs the world mirror, asset pipeline and their systems.
///
/// Uses an [`AssetFetcher`] already in the app if there is one, otherwise
/// starts an HTTP fetcher. Drawing needs `Assets<Image>`, so the draw list
/// stays empty in apps without it.
#[derive(Default)]
pub struct WorldSyncPlugin {
    pub config: ClientConfig,
}

impl Plugin for WorldSyncPlugin {
    fn build(&self, app: &mut App) {
        let config = self.config.clone();

        if !app.world().contains_resource::<AssetFetcher>() {
            match HttpFetcher::new(config.fetch_workers) {
                Ok(fetcher) => {
                    app.insert_resource(AssetFetcher::new(fetcher));
                }
                Err(e) => error!("asset fetching disabled: {e}"),
            }
        }

        app.insert_resource(WorldState::new(&config))
            .init_resource::<GameConfig>()
            .insert_resource(ImageAssets::new(&config))
            .init_resource::<AnimationTracker>()
            .init_resource::<Inbox>()
            .init_resource::<Outbox>()
            .insert_resource(ErrorBanner::new(config.error_banner_secs))
            .insert_resource(PingTimer::new(config.ping_interval_secs))
            .init_resource::<CameraFollow>()
            .init_resource::<DrawList>()
            .init_resource::<SpawnedEntities>()
            .add_event::<WorldInitialized>()
            .add_event::<ServerErrorEvent>()
            .add_event::<SkillItemsEvent>()
            .configure_sets(
                Update,
                (SyncSet::Receive, SyncSet::Interpolate, SyncSet::Present).chain(),
            )
            .add_systems(
                Update,
                (receive_server_messages, send_ping)
                    .chain()
                    .in_set(SyncSet::Receive),
            )
            .add_systems(Update, interpolate_entities.in_set(SyncSet::Interpolate))
            .add_systems(
                Update,
                (
                    follow_main_player,
                    sync_net_entities,
                    tick_error_banner,
                    build_draw_list.run_if(
                        resource_exists::<AssetFetcher>.and(resource_exists::<Assets<Image>>),
                    ),
                )
                    .in_set(SyncSet::Present),
            );

        #[cfg(feature = "quinnet")]
        {
            use crate::systems::transport::{open_server_connection, pump_connection};
            use bevy_quinnet::client::QuinnetClient;

            app.add_systems(
                Startup,
                open_server_connection.run_if(resource_exists::<QuinnetClient>),
            )
            .add_systems(
                Update,
                pump_connection
                    .run_if(resource_exists::<QuinnetClient>)
                    .in_set(SyncSet::Receive)
                    .before(receive_server_messages),
            );
        }

        app.insert_resource(config);
        info!("world sync installed");
    }
}
