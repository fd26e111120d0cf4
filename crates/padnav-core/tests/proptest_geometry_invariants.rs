//! Property-based invariant tests for the geometry calculator.
//!
//! 1. Distance is symmetric and non-negative
//! 2. Bearing is within (-180, 180] and flips by 180 when reversed
//! 3. Folded angles always lie in [0, 180]
//! 4. The direction gate is exclusive between opposite directions
//! 5. A point is never in any direction from itself

use padnav_core::geometry::{angle, angle_deviation, distance, in_direction, normalize_angle};
use padnav_core::{Direction, Point};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn coord() -> impl Strategy<Value = f64> {
    -5000.0f64..5000.0
}

fn point() -> impl Strategy<Value = Point> {
    (coord(), coord()).prop_map(|(x, y)| Point::new(x, y))
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Distance
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn distance_is_symmetric(a in point(), b in point()) {
        let ab = distance(a, b);
        let ba = distance(b, a);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() < 1e-9, "d(a,b)={} d(b,a)={}", ab, ba);
    }

    #[test]
    fn distance_to_self_is_zero(a in point()) {
        prop_assert_eq!(distance(a, a), 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Bearing
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn bearing_in_range(a in point(), b in point()) {
        let deg = angle(a, b);
        prop_assert!((-180.0..=180.0).contains(&deg), "angle {} out of range", deg);
    }

    #[test]
    fn reversed_bearing_differs_by_half_turn(a in point(), b in point()) {
        prop_assume!(distance(a, b) > 1e-6);
        let diff = normalize_angle(angle(a, b) - angle(b, a));
        prop_assert!((diff - 180.0).abs() < 1e-6, "folded difference {}", diff);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Folding
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn normalized_angle_in_half_turn(diff in -100_000.0f64..100_000.0) {
        let folded = normalize_angle(diff);
        prop_assert!((0.0..=180.0).contains(&folded), "folded {} from {}", folded, diff);
    }

    #[test]
    fn deviation_in_half_turn(a in point(), b in point(), dir in direction()) {
        let dev = angle_deviation(a, b, dir);
        prop_assert!((0.0..=180.0).contains(&dev));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4–5. Direction gate
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn gate_excludes_opposite_direction(
        a in point(),
        b in point(),
        dir in direction(),
        threshold in 0.0f64..100.0,
    ) {
        prop_assert!(
            !(in_direction(a, b, dir, threshold) && in_direction(a, b, dir.opposite(), threshold)),
            "point passed the gate for both {} and {}", dir, dir.opposite()
        );
    }

    #[test]
    fn point_is_never_in_direction_of_itself(a in point(), dir in direction()) {
        prop_assert!(!in_direction(a, a, dir, 0.0));
    }
}
