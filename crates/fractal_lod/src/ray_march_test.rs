use std::cell::Cell;

use super::*;
use crate::formula::FractalFormula;

fn ball(radius: f64) -> impl Fn(DVec3) -> bool {
  move |p: DVec3| p.length() <= radius
}

// =========================================================================
// Outcome classes
// =========================================================================

/// A ray starting far away hits the ball with a color and no near-hit event.
#[test]
fn test_far_hit_has_color() {
  let near = Cell::new(false);
  let hit = march(
    &ball(0.5),
    DVec3::new(0.0, 0.0, -2.0),
    DVec3::Z,
    0.01,
    10.0,
    || near.set(true),
  );
  let RayHit::Color(rgb) = hit else {
    panic!("expected a color hit, got {hit:?}");
  };
  assert!(rgb.iter().all(|c| (0.0..=1.0).contains(c)));
  assert_eq!(rgb[2], 1.0);
  assert!(!near.get(), "hit at t > 1 is not a near hit");
}

/// Hit on the very first sample is a boolean hit and a near hit.
#[test]
fn test_buried_origin_is_inside() {
  let near = Cell::new(false);
  let hit = march(&ball(0.5), DVec3::ZERO, DVec3::new(0.5, 0.0, 0.0), 0.01, 10.0, || {
    near.set(true)
  });
  assert_eq!(hit, RayHit::Inside);
  assert!(near.get());
}

/// Surface found after the first sample but within t <= 1.
#[test]
fn test_near_hit_with_color() {
  let near = Cell::new(false);
  let hit = march(&ball(0.5), DVec3::new(0.0, 0.0, -1.3), DVec3::Z, 0.01, 10.0, || {
    near.set(true)
  });
  assert!(matches!(hit, RayHit::Color(_)), "got {hit:?}");
  assert!(near.get());
}

/// Color follows -3·ln(distance).
#[test]
fn test_color_phase() {
  assert_eq!(log_distance_color(1.0), [0.5, 1.0, 1.0]);
  let d = 0.37_f64;
  let phase = -3.0 * d.ln();
  let rgb = log_distance_color(d);
  assert!((rgb[0] - (0.5 + 0.5 * phase.sin())).abs() < 1e-12);
  assert!((rgb[1] - (0.5 + 0.5 * phase.cos())).abs() < 1e-12);
}

// =========================================================================
// Miss handling and termination
// =========================================================================

/// Rays leaving from beyond the escape radius never come back.
#[test]
fn test_mandelbulb_ray_from_outside_escape_radius_misses() {
  let formula = FractalFormula::MANDELBULB;
  let origins = [
    DVec3::new(0.0, 0.0, -2.5),
    DVec3::new(2.1, 0.0, 0.0),
    DVec3::new(-1.5, 1.5, 1.5),
  ];
  for origin in origins {
    let away = origin.normalize();
    let hit = march(&formula, origin, away, 1.0 / 16.0, 100.0, || {});
    assert_eq!(hit, RayHit::Miss, "origin {origin:?}");
  }
}

/// The miss test fires on the second sample when already moving away.
#[test]
fn test_miss_stops_early() {
  let samples = Cell::new(0u32);
  let counting = |p: DVec3| {
    samples.set(samples.get() + 1);
    p.length() < 0.1
  };
  let hit = march(&counting, DVec3::new(0.0, 0.0, 0.5), DVec3::Z, 0.001, 1e9, || {});
  assert_eq!(hit, RayHit::Miss);
  // Only samples inside the unit sphere consult the predicate.
  assert!(samples.get() < 100, "took {} samples", samples.get());
}

/// Running out of distance inside the unit sphere is a miss.
#[test]
fn test_max_distance_bounds_work() {
  let samples = Cell::new(0u32);
  let never = |_: DVec3| {
    samples.set(samples.get() + 1);
    false
  };
  let hit = march(&never, DVec3::ZERO, DVec3::new(0.01, 0.0, 0.0), 0.1, 10.0, || {});
  assert_eq!(hit, RayHit::Miss);
  // 0.7 * 1.1^n < 10  =>  n <= 27
  assert!(samples.get() <= 28);
}

#[test]
fn test_non_positive_step_growth_misses() {
  assert_eq!(
    march(&ball(0.5), DVec3::ZERO, DVec3::X, 0.0, 10.0, || {}),
    RayHit::Miss
  );
  assert_eq!(
    march(&ball(0.5), DVec3::ZERO, DVec3::X, f64::NAN, 10.0, || {}),
    RayHit::Miss
  );
}

/// Identical inputs give identical outcomes.
#[test]
fn test_march_is_deterministic() {
  let formula = FractalFormula::MANDELBOX;
  let origin = DVec3::new(0.0, 0.0, -1.1);
  let directions = [
    DVec3::new(0.0, 0.0, 0.7),
    DVec3::new(0.2, 0.1, 0.6),
    DVec3::new(-0.3, 0.3, 0.5),
  ];
  for dir in directions {
    let a = march(&formula, origin, dir, 1.0 / 64.0, 3.1 / 0.7, || {});
    let b = march(&formula, origin, dir, 1.0 / 64.0, 3.1 / 0.7, || {});
    assert_eq!(a, b);
  }
}
