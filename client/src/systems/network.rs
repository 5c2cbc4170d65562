use bevy::prelude::*;
use gridsync_protocol::messages::C2S;

use crate::config::GameConfig;
use crate::decode::{decode, Decoded};
use crate::events::{ServerErrorEvent, SkillItemsEvent, WorldInitialized};
use crate::resources::{ErrorBanner, Inbox, Outbox};
use crate::world::WorldState;

/// Drains the inbox into the world mirror. A bad frame is logged and shown
/// on the banner; the next one is processed as usual.
#[allow(clippy::too_many_arguments)]
pub fn receive_server_messages(
    time: Res<Time>,
    mut inbox: ResMut<Inbox>,
    mut outbox: ResMut<Outbox>,
    mut world: ResMut<WorldState>,
    mut game: ResMut<GameConfig>,
    mut banner: ResMut<ErrorBanner>,
    mut ev_init: EventWriter<WorldInitialized>,
    mut ev_error: EventWriter<ServerErrorEvent>,
    mut ev_skills: EventWriter<SkillItemsEvent>,
) {
    let now = time.elapsed_secs_f64();
    while let Some(raw) = inbox.0.pop_front() {
        match decode(&raw, &mut world, &mut game, now) {
            Ok(Decoded::Initialized) => {
                ev_init.write(WorldInitialized);
            }
            Ok(Decoded::WorldUpdated { pruned, rejected }) => {
                if pruned > 0 {
                    debug!("{pruned} entities left the area of interest");
                }
                if rejected > 0 {
                    banner.show(format!("{rejected} entities dropped, tables full"));
                }
            }
            Ok(Decoded::SkillItems(ids)) => {
                ev_skills.write(SkillItemsEvent {
                    requested_item_id: ids.requested_item_id,
                    associated_item_ids: ids.associated_item_ids,
                });
            }
            Ok(Decoded::ServerError(message)) => {
                warn!("server error: {message}");
                banner.show(message.clone());
                ev_error.write(ServerErrorEvent { message });
            }
            Ok(Decoded::Ping) => {
                if let Err(e) = outbox.push(&C2S::Pong) {
                    error!("cannot encode pong: {e}");
                }
            }
            Ok(Decoded::Pong) => debug!("pong"),
            Err(e) => {
                warn!("dropping server frame: {e}");
                banner.show(e.to_string());
            }
        }
    }
}
