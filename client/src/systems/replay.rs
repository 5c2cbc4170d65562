use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;

use bevy::prelude::*;

use crate::resources::{Inbox, Outbox};

/// Recorded server session, one JSON frame per line, fed to the inbox at a
/// fixed rate.
#[derive(Resource)]
pub struct ReplayFeed {
    pub frames: VecDeque<String>,
    pub timer: Timer,
    /// Exit once every frame has been fed.
    pub exit_when_done: bool,
}

impl ReplayFeed {
    pub fn from_lines(text: &str, interval_secs: f32) -> Self {
        Self {
            frames: text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
            timer: Timer::from_seconds(interval_secs, TimerMode::Repeating),
            exit_when_done: true,
        }
    }

    pub fn load(path: impl AsRef<Path>, interval_secs: f32) -> io::Result<Self> {
        Ok(Self::from_lines(&fs::read_to_string(path)?, interval_secs))
    }
}

pub fn feed_replay(
    time: Res<Time>,
    mut feed: ResMut<ReplayFeed>,
    mut inbox: ResMut<Inbox>,
    mut exit: EventWriter<AppExit>,
) {
    if !feed.timer.tick(time.delta()).just_finished() {
        return;
    }
    match feed.frames.pop_front() {
        Some(frame) => inbox.push(frame),
        None if feed.exit_when_done && inbox.0.is_empty() => {
            info!("replay finished");
            exit.write(AppExit::Success);
        }
        None => {}
    }
}

/// Prints outbound frames; the replay has no server to send them to.
pub fn print_outbox(mut outbox: ResMut<Outbox>) {
    for frame in outbox.drain() {
        info!("-> {frame}");
    }
}
