//! Tests for animation playback and layer composition

mod common;

use bevy::prelude::*;
use common::{serve_item, FakeStore, MapFetcher};
use gridsync_client::animation::AnimationTracker;
use gridsync_client::assets::ItemAssets;
use gridsync_client::view::DrawContext;
use gridsync_client::world::EntityState;
use gridsync_client::{ClientConfig, GameConfig};
use gridsync_protocol::assets::{AtlasMetadata, DirectionKey, ItemMetadata};
use gridsync_protocol::messages::{Direction, EntitySnapshot, Mode, ObjectLayerSnapshot, WirePos};

fn item(stateless: bool) -> ItemMetadata {
    serde_json::from_value(serde_json::json!({
        "id": "cape", "type": "clothing", "frameDuration": 100, "stateless": stateless
    }))
    .unwrap()
}

fn atlas() -> AtlasMetadata {
    serde_json::from_value(serde_json::json!({
        "itemKey": "cape", "fileId": "f",
        "frames": {
            "down_idle": [
                {"x": 0, "y": 0, "width": 8, "height": 8},
                {"x": 8, "y": 0, "width": 8, "height": 8},
                {"x": 16, "y": 0, "width": 8, "height": 8}
            ],
            "right_walking": [
                {"x": 0, "y": 8, "width": 8, "height": 8},
                {"x": 8, "y": 8, "width": 8, "height": 8}
            ],
            "default_idle": [{"x": 0, "y": 16, "width": 8, "height": 8}]
        }
    }))
    .unwrap()
}

#[test]
fn frames_advance_after_the_frame_duration() {
    let (meta, atlas) = (item(false), atlas());
    let mut tracker = AnimationTracker::default();
    let mut step = |now| {
        tracker
            .advance("e", "cape", Direction::Down, Mode::Idle, now, Some(&meta), Some(&atlas))
            .index
    };
    assert_eq!(step(0.0), 0);
    assert_eq!(step(0.05), 0);
    assert_eq!(step(0.11), 1);
    assert_eq!(step(0.22), 2);
    assert_eq!(step(0.33), 0);
}

#[test]
fn inline_frame_counts_drive_playback_until_the_atlas_arrives() {
    let meta: ItemMetadata = serde_json::from_value(serde_json::json!({
        "id": "cape", "type": "clothing", "frameDuration": 100,
        "frameCounts": {"down_idle": 3}
    }))
    .unwrap();
    let mut tracker = AnimationTracker::default();
    let indices: Vec<usize> = (0..5)
        .map(|i| {
            tracker
                .advance("e", "cape", Direction::Down, Mode::Idle, i as f64 * 0.11, Some(&meta), None)
                .index
        })
        .collect();
    assert_eq!(indices, [0, 1, 2, 0, 1]);

    // without inline counts either, only the first frame is shown
    let plain = item(false);
    let mut tracker = AnimationTracker::default();
    for i in 0..4 {
        let f = tracker.advance("e", "cape", Direction::Down, Mode::Idle, i as f64 * 0.11, Some(&plain), None);
        assert_eq!(f.index, 0);
    }
}

#[test]
fn key_change_restarts_the_animation() {
    let (meta, atlas) = (item(false), atlas());
    let mut tracker = AnimationTracker::default();
    tracker.advance("e", "cape", Direction::Down, Mode::Idle, 0.0, Some(&meta), Some(&atlas));
    let f = tracker.advance("e", "cape", Direction::Down, Mode::Idle, 0.12, Some(&meta), Some(&atlas));
    assert_eq!(f.index, 1);

    let f = tracker.advance("e", "cape", Direction::Right, Mode::Walking, 0.15, Some(&meta), Some(&atlas));
    assert_eq!(f.key, DirectionKey::RightWalking);
    assert_eq!(f.index, 0);
    let state = tracker.state("e", "cape").unwrap();
    assert_eq!(state.last_advance, 0.15);
    assert_eq!(state.last_facing, Direction::Right);

    // walking on without a direction keeps facing right
    let f = tracker.advance("e", "cape", Direction::None, Mode::Walking, 0.2, Some(&meta), Some(&atlas));
    assert_eq!(f.key, DirectionKey::RightWalking);
}

#[test]
fn stateless_items_always_use_default_idle() {
    let (meta, atlas) = (item(true), atlas());
    let mut tracker = AnimationTracker::default();
    for (dir, mode) in [
        (Direction::Up, Mode::Walking),
        (Direction::Left, Mode::Idle),
        (Direction::None, Mode::Teleporting),
    ] {
        let f = tracker.advance("e", "cape", dir, mode, 0.0, Some(&meta), Some(&atlas));
        assert_eq!(f.key, DirectionKey::DefaultIdle);
    }
}

#[test]
fn pruning_forgets_gone_entities() {
    let mut tracker = AnimationTracker::default();
    tracker.advance("a", "cape", Direction::Up, Mode::Idle, 0.0, None, None);
    tracker.advance("b", "cape", Direction::Up, Mode::Idle, 0.0, None, None);
    tracker.prune(["b"]);
    assert!(tracker.state("a", "cape").is_none());
    assert!(tracker.state("b", "cape").is_some());
    assert_eq!(tracker.len(), 1);
}

fn layer(id: &str) -> ObjectLayerSnapshot {
    ObjectLayerSnapshot {
        item_id: id.into(),
        active: true,
        quantity: 1,
    }
}

#[test]
fn layers_are_drawn_in_category_order() {
    let config = ClientConfig::default();
    let mut fetcher = MapFetcher::default();
    for (id, category) in [("sword", "weapon"), ("skin", "skin"), ("hat", "headgear")] {
        fetcher = serve_item(fetcher, &config, id, category);
    }

    let mut snap = EntitySnapshot {
        id: "p1".into(),
        pos: WirePos { x: 2.0, y: 3.0 },
        ..Default::default()
    };
    snap.object_layers = vec![layer("sword"), layer("skin"), layer("hat"), {
        let mut off = layer("skin");
        off.active = false;
        off
    }];
    let entity = EntityState::from_snapshot("p1".into(), &snap, Vec2::ONE);

    let game = GameConfig::default();
    let mut tracker = AnimationTracker::default();
    let mut assets: ItemAssets<String> = ItemAssets::new(&config);
    let mut store = FakeStore::default();

    let mut sprites = Vec::new();
    for tick in 0..6 {
        let mut ctx = DrawContext {
            now: tick as f64 * 0.016,
            config: &game,
            tracker: &mut tracker,
            assets: &mut assets,
            fetcher: &fetcher,
            store: &mut store,
        };
        sprites = ctx.compose_entity(&entity);
    }

    let order: Vec<&str> = sprites.iter().map(|s| s.item_id.as_str()).collect();
    assert_eq!(order, ["skin", "hat", "sword"]);
    let first = &sprites[0];
    assert_eq!(first.texture, "tex:skin-file");
    assert_eq!(first.key, DirectionKey::DownIdle);
    assert_eq!(first.position, game.to_pixels(Vec2::new(2.0, 3.0)));
    assert_eq!(first.size, Vec2::splat(game.cell_size));
}

#[test]
fn unavailable_layers_are_skipped() {
    let config = ClientConfig::default();
    // only the skin is served; the cape answers 404
    let fetcher = serve_item(MapFetcher::default(), &config, "skin", "skin");

    let snap = EntitySnapshot {
        id: "p1".into(),
        object_layers: vec![layer("cape"), layer("skin")],
        ..Default::default()
    };
    let entity = EntityState::from_snapshot("p1".into(), &snap, Vec2::ONE);
    let game = GameConfig::default();
    let mut tracker = AnimationTracker::default();
    let mut assets: ItemAssets<String> = ItemAssets::new(&config);
    let mut store = FakeStore::default();

    let mut counts = Vec::new();
    for _ in 0..6 {
        let mut ctx = DrawContext {
            now: 0.0,
            config: &game,
            tracker: &mut tracker,
            assets: &mut assets,
            fetcher: &fetcher,
            store: &mut store,
        };
        counts.push(ctx.compose_entity(&entity).len());
    }
    // nothing drawn while loading, then the skin alone
    assert_eq!(counts[0], 0);
    assert_eq!(*counts.last().unwrap(), 1);
}
