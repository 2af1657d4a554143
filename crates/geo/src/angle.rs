/// Reduces any real angle into `[0, 360)`, always non-negative.
///
/// NaN propagates; callers at data boundaries are responsible for
/// discarding NaN-producing inputs.
pub fn normalize_deg(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if r >= 360.0 { 0.0 } else { r }
}

/// Signed shortest angular delta `absolute - reference`, wrapped into
/// `(-180, 180]`.
///
/// This is the single most load-bearing primitive in the engine: every
/// front/left/right selection sorts on it, so it must be exact across the
/// 0/360 wrap. Positive means clockwise of the reference.
pub fn relative_deg(absolute: f64, reference: f64) -> f64 {
    let d = normalize_deg(absolute - reference);
    if d > 180.0 { d - 360.0 } else { d }
}

#[cfg(test)]
mod tests {
    use super::{normalize_deg, relative_deg};
    use approx::assert_relative_eq;

    #[test]
    fn normalize_reduces_into_zero_360() {
        assert_eq!(normalize_deg(0.0), 0.0);
        assert_eq!(normalize_deg(360.0), 0.0);
        assert_eq!(normalize_deg(720.0), 0.0);
        assert_eq!(normalize_deg(-90.0), 270.0);
        assert_eq!(normalize_deg(-360.0), 0.0);
        assert_relative_eq!(normalize_deg(365.5), 5.5, epsilon = 1e-12);
        assert_relative_eq!(normalize_deg(-725.0), 355.0, epsilon = 1e-12);
    }

    #[test]
    fn normalize_never_returns_360() {
        // Tiny negative values round up inside rem_euclid.
        let r = normalize_deg(-1e-20);
        assert!((0.0..360.0).contains(&r), "got {r}");
    }

    #[test]
    fn normalize_propagates_nan() {
        assert!(normalize_deg(f64::NAN).is_nan());
    }

    #[test]
    fn relative_is_signed_shortest_delta() {
        assert_eq!(relative_deg(10.0, 0.0), 10.0);
        assert_eq!(relative_deg(0.0, 10.0), -10.0);
        assert_eq!(relative_deg(180.0, 0.0), 180.0);
        assert_relative_eq!(relative_deg(181.0, 0.0), -179.0, epsilon = 1e-12);
    }

    #[test]
    fn relative_is_correct_across_north() {
        // 350 -> 10 is +20 clockwise, not -340.
        assert_relative_eq!(relative_deg(10.0, 350.0), 20.0, epsilon = 1e-12);
        assert_relative_eq!(relative_deg(350.0, 10.0), -20.0, epsilon = 1e-12);
    }

    #[test]
    fn wraparound_round_trip() {
        // normalize(b + relative(a, b)) == a for all a, b in [0, 360).
        for ai in 0..72 {
            for bi in 0..72 {
                let a = ai as f64 * 5.0;
                let b = bi as f64 * 5.0;
                let rel = relative_deg(a, b);
                assert!(
                    rel > -180.0 && rel <= 180.0,
                    "relative({a}, {b}) = {rel} out of (-180, 180]"
                );
                assert_relative_eq!(normalize_deg(b + rel), a, epsilon = 1e-9);
            }
        }
    }
}
