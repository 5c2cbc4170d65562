//! Tests for applying server frames to the world mirror
//! Covers grid object dispatch, bots and frames that must leave state untouched

use bevy::prelude::*;
use gridsync_client::decode::{decode, Decoded};
use gridsync_client::{GameConfig, WorldState};
use gridsync_protocol::messages::{Direction, GridObjectKind, Mode};
use gridsync_protocol::DecodeError;

const WITH_PORTAL: &str = r#"{
    "type": "aoi_update",
    "payload": {
        "player": {"id": "p1", "Pos": {"X": 5, "Y": 5}},
        "visiblePlayers": {},
        "visibleGridObjects": {
            "g1": {"Type": "portal", "id": "g1", "Pos": {"X": 1, "Y": 2},
                   "Dims": {"Width": 1, "Height": 1}, "PortalLabel": "Town"}
        }
    }
}"#;

fn world_after(frames: &[&str]) -> (WorldState, GameConfig) {
    let mut world = WorldState::default();
    let mut config = GameConfig::default();
    for (i, raw) in frames.iter().enumerate() {
        decode(raw, &mut world, &mut config, i as f64).unwrap();
    }
    (world, config)
}

#[test]
fn portal_lands_only_in_portals() {
    let (world, _) = world_after(&[WITH_PORTAL]);
    assert_eq!(world.objects.portals.len(), 1);
    let portal = &world.objects.portals[0];
    assert_eq!(portal.id, "g1");
    assert_eq!(portal.portal_label.as_deref(), Some("Town"));
    assert_eq!(portal.pos, Vec2::new(1.0, 2.0));

    assert!(world.objects.obstacles.is_empty());
    assert!(world.objects.floors.is_empty());
    assert!(world.objects.foregrounds.is_empty());
    assert!(world.bots.is_empty());
}

#[test]
fn aoi_without_payload_changes_nothing() {
    let (mut world, mut config) = world_after(&[WITH_PORTAL]);
    let before_main = world.main_player.clone();
    let before_objects = world.objects.clone();

    let err = decode(r#"{"type":"aoi_update"}"#, &mut world, &mut config, 9.0).unwrap_err();
    assert!(matches!(err, DecodeError::MissingPayload(_)));
    assert_eq!(world.main_player, before_main);
    assert_eq!(world.objects, before_objects);
    assert_eq!(world.last_update, Some(0.0));
}

#[test]
fn truncated_json_changes_nothing() {
    let (mut world, mut config) = world_after(&[WITH_PORTAL]);
    let err = decode(&WITH_PORTAL[..60], &mut world, &mut config, 9.0).unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
    assert_eq!(world.objects.portals.len(), 1);
    assert_eq!(world.last_update, Some(0.0));
}

#[test]
fn unknown_kind_changes_nothing() {
    let (mut world, mut config) = world_after(&[WITH_PORTAL]);
    let err = decode(r#"{"type":"weather","payload":{}}"#, &mut world, &mut config, 9.0)
        .unwrap_err();
    assert!(matches!(err, DecodeError::UnknownKind(_)));
    assert_eq!(world.tracked_ids(), vec!["p1"]);
}

#[test]
fn grid_objects_are_replaced_wholesale() {
    let next = r#"{"type":"aoi_update","payload":{
        "player": {"id": "p1", "Pos": {"X": 5, "Y": 5}},
        "visiblePlayers": {},
        "visibleGridObjects": {
            "o1": {"Type": "obstacle", "Pos": {"X": 3, "Y": 3}},
            "f1": {"Type": "floor", "Pos": {"X": 0, "Y": 0}},
            "x1": {"Type": "lava", "Pos": {"X": 0, "Y": 0}}
        }
    }}"#;
    let (world, _) = world_after(&[WITH_PORTAL, next]);
    assert!(world.objects.portals.is_empty());
    assert_eq!(world.objects.of_kind(GridObjectKind::Obstacle)[0].id, "o1");
    assert_eq!(world.objects.floors.len(), 1);
    assert_eq!(world.objects.len(), 2);
}

#[test]
fn bots_are_tracked_and_swept() {
    let with_bots = r#"{"type":"aoi_update","payload":{
        "player": {"id": "p1", "Pos": {"X": 0, "Y": 0}},
        "visiblePlayers": {},
        "visibleGridObjects": {
            "b1": {"Type": "bot", "Pos": {"X": 4, "Y": 4}, "direction": "LEFT", "mode": "walking",
                   "life": 30, "maxLife": 50},
            "b2": {"Type": "bot", "Pos": {"X": 6, "Y": 6}}
        }
    }}"#;
    let one_bot = r#"{"type":"aoi_update","payload":{
        "player": {"id": "p1", "Pos": {"X": 0, "Y": 0}},
        "visiblePlayers": {},
        "visibleGridObjects": {"b2": {"Type": "bot", "Pos": {"X": 7, "Y": 6}}}
    }}"#;

    let (mut world, mut config) = world_after(&[with_bots]);
    let b1 = world.find("b1").unwrap();
    assert_eq!(b1.direction, Direction::Left);
    assert_eq!(b1.mode, Mode::Walking);
    assert_eq!(b1.life, 30.0);
    assert_eq!(b1.dims, config.default_object_dims);

    let out = decode(one_bot, &mut world, &mut config, 1.0).unwrap();
    assert_eq!(
        out,
        Decoded::WorldUpdated {
            pruned: 1,
            rejected: 0
        }
    );
    assert!(world.find("b1").is_none());
    assert_eq!(world.bots.find("b2").unwrap().entity.pos_server, Vec2::new(7.0, 6.0));
}

#[test]
fn players_leaving_view_are_pruned() {
    let two = r#"{"type":"aoi_update","payload":{
        "player": {"id": "p1", "Pos": {"X": 0, "Y": 0}},
        "visiblePlayers": {"p2": {"Pos": {"X": 1, "Y": 1}}, "p3": {"Pos": {"X": 2, "Y": 2}}}
    }}"#;
    let one = r#"{"type":"aoi_update","payload":{
        "player": {"id": "p1", "Pos": {"X": 0, "Y": 0}},
        "visiblePlayers": {"p3": {"Pos": {"X": 2, "Y": 3}}}
    }}"#;
    let (world, _) = world_after(&[two, one]);
    assert!(world.players.find("p2").is_none());
    // id taken from the map key
    assert_eq!(world.players.find("p3").unwrap().entity.id, "p3");
    assert_eq!(world.display_position("p3"), Some(Vec2::new(2.0, 2.0)));
}

#[test]
fn ping_is_recognised() {
    let mut world = WorldState::default();
    let mut config = GameConfig::default();
    assert_eq!(
        decode(r#"{"type":"ping"}"#, &mut world, &mut config, 0.0).unwrap(),
        Decoded::Ping
    );
    assert_eq!(world.last_update, None);
}
