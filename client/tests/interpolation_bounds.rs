use bevy::prelude::*;
use gridsync_client::interpolate::interpolation_factor;
use gridsync_client::world::EntityState;
use gridsync_protocol::messages::{EntitySnapshot, WirePos};
use proptest::prelude::*;

fn moving(from: Vec2, to: Vec2) -> EntityState {
    let at = |p: Vec2| EntitySnapshot {
        pos: WirePos { x: p.x, y: p.y },
        ..Default::default()
    };
    let mut e = EntityState::from_snapshot("e".into(), &at(from), Vec2::ONE);
    e.apply_snapshot(&at(to), Vec2::ONE);
    e
}

#[test]
fn endpoints_are_exact() {
    let from = Vec2::new(0.3, 7.1);
    let to = Vec2::new(-4.9, 2.2);
    let mut e = moving(from, to);
    e.interpolate(0.0);
    assert_eq!(e.interp_pos, from);
    e.interpolate(1.0);
    assert_eq!(e.interp_pos, to);
}

#[test]
fn zero_window_jumps_to_server_position() {
    let mut e = moving(Vec2::ZERO, Vec2::new(3.0, 4.0));
    e.interpolate(interpolation_factor(5.0, 5.0, 0.0));
    assert_eq!(e.interp_pos, Vec2::new(3.0, 4.0));
}

proptest! {
    #[test]
    fn factor_stays_in_unit_range(
        now in -1.0e4f64..1.0e4,
        last in -1.0e4f64..1.0e4,
        window in -500.0f32..2000.0,
    ) {
        let f = interpolation_factor(now, last, window);
        prop_assert!((0.0..=1.0).contains(&f));
    }

    #[test]
    fn position_stays_on_segment(
        ax in -1000.0f32..1000.0, ay in -1000.0f32..1000.0,
        bx in -1000.0f32..1000.0, by in -1000.0f32..1000.0,
        factor in 0.0f32..=1.0,
    ) {
        let (a, b) = (Vec2::new(ax, ay), Vec2::new(bx, by));
        let mut e = moving(a, b);
        e.interpolate(factor);
        let p = e.interp_pos;

        let seg = b - a;
        let len = seg.length();
        let tolerance = 1e-3 * (1.0 + len);
        // distance to the segment
        let t = if len > 0.0 { ((p - a).dot(seg) / (len * len)).clamp(0.0, 1.0) } else { 0.0 };
        prop_assert!(p.distance(a + seg * t) <= tolerance);
        // and as far along as the factor says
        prop_assert!(p.distance(a) <= len * factor + tolerance);
    }

    #[test]
    fn rerunning_is_idempotent(factor in 0.0f32..=1.0) {
        let mut e = moving(Vec2::new(1.0, 1.0), Vec2::new(9.0, -3.0));
        e.interpolate(factor);
        let once = e.interp_pos;
        e.interpolate(factor);
        prop_assert_eq!(e.interp_pos, once);
    }
}
