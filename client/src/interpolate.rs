/// Progress through the interpolation window since the last snapshot, in
/// `[0, 1]`. A non-positive window means "snap to the server position".
pub fn interpolation_factor(now: f64, last_update: f64, window_ms: f32) -> f32 {
    if window_ms <= 0.0 {
        return 1.0;
    }
    let elapsed_ms = (now - last_update) * 1000.0;
    (elapsed_ms / window_ms as f64).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_tracks_elapsed_time() {
        assert_eq!(interpolation_factor(10.0, 10.0, 200.0), 0.0);
        assert!((interpolation_factor(10.1, 10.0, 200.0) - 0.5).abs() < 1e-4);
        assert_eq!(interpolation_factor(11.0, 10.0, 200.0), 1.0);
    }

    #[test]
    fn clock_behind_last_update_clamps_to_zero() {
        assert_eq!(interpolation_factor(9.0, 10.0, 200.0), 0.0);
    }

    #[test]
    fn empty_window_snaps() {
        assert_eq!(interpolation_factor(10.0, 10.0, 0.0), 1.0);
        assert_eq!(interpolation_factor(10.0, 10.0, -5.0), 1.0);
    }
}
