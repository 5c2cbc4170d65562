use std::collections::{HashMap, VecDeque};

use bevy::prelude::*;
use gridsync_protocol::encode_client_message;
use gridsync_protocol::messages::C2S;

use crate::view::LayerSprite;

/// Raw frames received from the server, oldest first.
#[derive(Resource, Default)]
pub struct Inbox(pub VecDeque<String>);

impl Inbox {
    pub fn push(&mut self, frame: impl Into<String>) {
        self.0.push_back(frame.into());
    }
}

/// Encoded frames waiting for the transport, oldest first.
#[derive(Resource, Default)]
pub struct Outbox(pub VecDeque<String>);

impl Outbox {
    pub fn push(&mut self, msg: &C2S) -> Result<(), serde_json::Error> {
        self.0.push_back(encode_client_message(msg)?);
        Ok(())
    }

    pub fn drain(&mut self) -> impl Iterator<Item = String> + '_ {
        self.0.drain(..)
    }
}

#[derive(Resource)]
pub struct PingTimer(pub Timer);

impl PingTimer {
    pub fn new(secs: f32) -> Self {
        PingTimer(Timer::from_seconds(secs, TimerMode::Repeating))
    }
}

impl Default for PingTimer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// ECS entity mirroring each tracked id.
#[derive(Resource, Default)]
pub struct SpawnedEntities(pub HashMap<String, Entity>);

/// Last decode or server error, shown for a while then cleared.
#[derive(Resource)]
pub struct ErrorBanner {
    pub text: Option<String>,
    pub timer: Timer,
}

impl ErrorBanner {
    pub fn new(secs: f32) -> Self {
        Self {
            text: None,
            timer: Timer::from_seconds(secs, TimerMode::Once),
        }
    }

    pub fn show(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
        self.timer.reset();
    }

    pub fn tick(&mut self, delta: std::time::Duration) {
        if self.text.is_some() && self.timer.tick(delta).finished() {
            self.text = None;
        }
    }
}

impl Default for ErrorBanner {
    fn default() -> Self {
        Self::new(4.0)
    }
}

/// Smoothed camera centre in world pixels.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct CameraFollow {
    pub center: Vec2,
    pub zoom: f32,
    pub snapped: bool,
}

impl CameraFollow {
    /// Moves `smoothing` of the way to `target`. The first call jumps there.
    pub fn update(&mut self, target: Vec2, smoothing: f32, zoom: f32) {
        if self.snapped {
            self.center = self.center.lerp(target, smoothing.clamp(0.0, 1.0));
        } else {
            self.center = target;
            self.snapped = true;
        }
        self.zoom = if zoom > 0.0 { zoom } else { 1.0 };
    }
}

/// Sprite regions to draw this frame, back to front.
#[derive(Resource, Default)]
pub struct DrawList(pub Vec<LayerSprite<Handle<Image>>>);

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn banner_clears_after_its_duration() {
        let mut banner = ErrorBanner::new(2.0);
        banner.show("boom");
        banner.tick(Duration::from_secs(1));
        assert_eq!(banner.text.as_deref(), Some("boom"));
        banner.tick(Duration::from_secs(1));
        assert_eq!(banner.text, None);
    }

    #[test]
    fn camera_snaps_then_smooths() {
        let mut cam = CameraFollow::default();
        cam.update(Vec2::new(100.0, 0.0), 0.5, 1.0);
        assert_eq!(cam.center, Vec2::new(100.0, 0.0));
        cam.update(Vec2::new(200.0, 0.0), 0.5, 0.0);
        assert_eq!(cam.center, Vec2::new(150.0, 0.0));
        assert_eq!(cam.zoom, 1.0);
    }

    #[test]
    fn outbox_holds_encoded_frames() {
        let mut outbox = Outbox::default();
        outbox.push(&C2S::Ping).unwrap();
        let frames: Vec<String> = outbox.drain().collect();
        assert_eq!(frames, vec![r#"{"type":"ping"}"#.to_string()]);
        assert!(outbox.0.is_empty());
    }
}
