use super::*;
use crate::formula::FractalFormula;

const BALL: FractalFormula = FractalFormula::Sphere { radius: 0.5 };

fn job(nr: usize, center: DVec3, size: u32) -> BakeJob {
  BakeJob::new(NodeId::new(0, nr), center, 0.7, 3.1, size)
}

fn valid_texels(size: u32) -> usize {
  (0..size)
    .flat_map(|y| (0..size).map(move |x| (x, y)))
    .filter(|&(x, y)| BakeJob::in_triangle(x, y, size))
    .count()
}

// =========================================================================
// Completion
// =========================================================================

#[test]
fn test_info_before_completion_fails() {
  let mut j = job(15, DVec3::ZERO, 16);
  assert_eq!(j.info(), Err(BakeError::Incomplete(NodeId::new(0, 15))));
  j.step(&BALL, &BakeBudget::DEFAULT);
  assert!(!j.is_complete());
  assert!(j.clone().finish().is_err());
}

#[test]
fn test_unlimited_budget_completes_in_one_step() {
  let mut j = job(15, DVec3::ZERO, 16);
  assert_eq!(j.step(&BALL, &BakeBudget::UNLIMITED), BakeProgress::Complete);
  let (_, next_y) = j.cursor();
  assert!(next_y >= j.texture_size());
  assert!(j.info().is_ok());
}

/// Row spans narrow toward the apex; 171 of 256 texels survive at size 16.
#[test]
fn test_row_span_skips_texels_outside_triangle() {
  assert_eq!(valid_texels(16), 171);
  assert!(BakeJob::in_triangle(0, 0, 16));
  assert!(BakeJob::in_triangle(15, 0, 16));
  assert!(!BakeJob::in_triangle(0, 15, 16));
  assert!(BakeJob::in_triangle(8, 15, 16));
}

/// Every slice marches at most the budget; skipped texels are free.
#[test]
fn test_default_budget_slices_work() {
  let mut j = job(15, DVec3::ZERO, 16);
  let mut steps = 0;
  let mut last = 0;
  while j.step(&BALL, &BakeBudget::DEFAULT) == BakeProgress::InProgress {
    assert_eq!(j.texels_marched() - last, 100);
    last = j.texels_marched();
    steps += 1;
  }
  assert_eq!(steps, 1);
  assert_eq!(j.texels_marched(), valid_texels(16));
}

/// Stepping a finished job is a no-op.
#[test]
fn test_step_after_completion() {
  let mut j = job(15, DVec3::ZERO, 16);
  j.step(&BALL, &BakeBudget::UNLIMITED);
  let marched = j.texels_marched();
  assert_eq!(j.step(&BALL, &BakeBudget::UNLIMITED), BakeProgress::Complete);
  assert_eq!(j.texels_marched(), marched);
}

// =========================================================================
// Flags and painting
// =========================================================================

/// Baking from inside a solid ball: every texel is a gray boolean hit.
#[test]
fn test_buried_center_is_opaque_and_intersecting() {
  let mut j = job(15, DVec3::ZERO, 16);
  j.step(&BALL, &BakeBudget::UNLIMITED);
  let out = j.finish().unwrap();
  assert!(!out.info.empty);
  assert!(out.info.opaque);
  assert!(out.info.intersection);
  assert_eq!(out.tile.painted_texels(), 171);
  assert_eq!(out.tile.pixel(0, 0), INSIDE_COLOR);
  assert_eq!(out.tile.pixel(0, 15), [0, 0, 0], "outside the row span");
}

/// Nothing to hit: black tile, empty, not opaque.
#[test]
fn test_nothing_to_hit_is_empty() {
  let nothing = |_: DVec3| false;
  let mut j = job(3, DVec3::new(0.0, 0.0, -1.1), 16);
  j.step(&nothing, &BakeBudget::UNLIMITED);
  let out = j.finish().unwrap();
  assert!(out.info.empty);
  assert!(!out.info.opaque);
  assert!(!out.info.intersection);
  assert_eq!(out.tile.painted_texels(), 0);
}

/// A ball ahead of the camera: colored hits, some misses at the rim, and the
/// surface is close enough to count as an intersection.
#[test]
fn test_ball_ahead_paints_colors() {
  let mut j = job(15, DVec3::new(0.0, 0.0, -0.95), 16);
  j.step(&BALL, &BakeBudget::UNLIMITED);
  let out = j.finish().unwrap();
  assert!(!out.info.empty);
  assert!(!out.info.opaque);
  assert!(out.info.intersection);

  let painted: Vec<[u8; 3]> = (0..16)
    .flat_map(|y| (0..16).map(move |x| (x, y)))
    .map(|(x, y)| out.tile.pixel(x, y))
    .filter(|p| p != &[0, 0, 0])
    .collect();
  assert!(!painted.is_empty());
  assert!(painted.iter().all(|p| p[2] == 255 && *p != INSIDE_COLOR));
}

#[test]
fn test_info_reports_job_geometry() {
  let center = DVec3::new(0.1, 0.2, -0.3);
  let mut j = job(7, center, 32);
  j.step(&BALL, &BakeBudget::UNLIMITED);
  let info = j.info().unwrap();
  assert_eq!(info.id, NodeId::new(0, 7));
  assert_eq!(info.center, center);
  assert_eq!(info.texture_size, 32);
}
