use bevy::prelude::*;
use gridsync_protocol::messages::C2S;

use crate::resources::{Outbox, PingTimer};

pub fn send_ping(time: Res<Time>, mut timer: ResMut<PingTimer>, mut outbox: ResMut<Outbox>) {
    if timer.0.tick(time.delta()).just_finished() {
        if let Err(e) = outbox.push(&C2S::Ping) {
            error!("cannot encode ping: {e}");
        }
    }
}
