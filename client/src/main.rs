use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::asset::AssetPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use gridsync_client::systems::replay::{feed_replay, print_outbox, ReplayFeed};
use gridsync_client::{ClientConfig, SyncSet, WorldSyncPlugin};

const TICK: f64 = 1.0 / 60.0;
const REPLAY_INTERVAL_SECS: f32 = 0.1;

fn main() {
    ctrlc::set_handler(|| {
        println!("client shutting down");
        std::process::exit(0);
    })
    .expect("Error setting Ctrl-C handler");

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(TICK))),
    )
    .add_plugins(LogPlugin::default())
    .add_plugins(AssetPlugin::default())
    .init_asset::<Image>();

    #[cfg(feature = "quinnet")]
    app.add_plugins(bevy_quinnet::client::QuinnetClientPlugin::default());

    app.add_plugins(WorldSyncPlugin { config });

    // replay a recorded session instead of a live connection
    if let Some(path) = std::env::args().nth(1) {
        match ReplayFeed::load(&path, REPLAY_INTERVAL_SECS) {
            Ok(feed) => {
                info!("replaying {} frames from {path}", feed.frames.len());
                app.insert_resource(feed).add_systems(
                    Update,
                    (
                        feed_replay.before(SyncSet::Receive),
                        print_outbox.after(SyncSet::Receive),
                    ),
                );
            }
            Err(e) => {
                eprintln!("cannot read {path}: {e}");
                std::process::exit(1);
            }
        }
    }

    app.run();
}
