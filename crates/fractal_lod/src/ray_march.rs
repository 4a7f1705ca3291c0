//! Geometric-step sphere tracing against a membership predicate.
//!
//! The marcher does not need a distance estimate: it samples at geometrically
//! growing distances `t ← t·(1 + step_growth)`, so the step size stays
//! proportional to the distance from the origin and a texel of angular size
//! `step_growth` is resolved at every depth.
//!
//! ```text
//!  origin ──●─────●───────●──────────●─────────────────●───▶ direction
//!          t0   t0·g   t0·g²      t0·g³             t0·g⁴      (g = 1 + step_growth)
//! ```

use glam::DVec3;

use crate::constants::{INITIAL_RAY_OFFSET, UNIT_SPHERE_RADIUS_SQ};
use crate::formula::Membership;

/// Outcome of a single march.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RayHit {
  /// Left the unit sphere or ran out of distance.
  Miss,
  /// The very first sample is already inside: the origin is buried.
  Inside,
  /// Surface found further along; color encodes log-distance from the origin.
  Color([f64; 3]),
}

impl RayHit {
  #[inline]
  pub fn is_hit(&self) -> bool {
    !matches!(self, RayHit::Miss)
  }
}

/// March from `origin` along `direction` (not necessarily unit length).
///
/// `on_near_hit` fires when the surface is found within one `direction`
/// length (`t ≤ 1`), which the hierarchy uses as its zoom trigger.
/// Stops once `t` reaches `max_distance`.
pub fn march<M, F>(
  formula: &M,
  origin: DVec3,
  direction: DVec3,
  step_growth: f64,
  max_distance: f64,
  mut on_near_hit: F,
) -> RayHit
where
  M: Membership + ?Sized,
  F: FnMut(),
{
  if !(step_growth > 0.0) {
    return RayHit::Miss;
  }

  let growth = 1.0 + step_growth;
  let mut t = INITIAL_RAY_OFFSET;
  let mut prev_d: Option<f64> = None;
  let mut first = true;

  while t < max_distance {
    let p = origin + direction * t;
    let d = p.length_squared();

    // Outside and moving away: the unit ball is convex, nothing left to hit.
    if let Some(prev) = prev_d {
      if d > UNIT_SPHERE_RADIUS_SQ && d > prev {
        return RayHit::Miss;
      }
    }
    prev_d = Some(d);

    if d <= UNIT_SPHERE_RADIUS_SQ && formula.contains(p) {
      if t <= 1.0 {
        on_near_hit();
      }
      if first {
        return RayHit::Inside;
      }
      return RayHit::Color(log_distance_color((p - origin).length()));
    }

    first = false;
    t *= growth;
  }

  RayHit::Miss
}

/// Hue cycling with the logarithm of the hit distance, so bands repeat at
/// every zoom level.
fn log_distance_color(distance: f64) -> [f64; 3] {
  let phase = -3.0 * distance.ln();
  [
    (0.5 + 0.5 * phase.sin()).clamp(0.0, 1.0),
    (0.5 + 0.5 * phase.cos()).clamp(0.0, 1.0),
    1.0,
  ]
}

#[cfg(test)]
#[path = "ray_march_test.rs"]
mod ray_march_test;
