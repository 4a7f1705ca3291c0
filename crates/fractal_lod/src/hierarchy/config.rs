//! HierarchyConfig - tunable coefficients of node selection, zooming and
//! pruning.

use crate::baker::BakeBudget;
use crate::constants::DEFAULT_TEXTURE_SIZE;

/// Configuration for the LOD hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyConfig {
  /// Inner radius of generation 0.
  pub initial_radius_inner: f64,
  /// Outer radius of generation 0 (how far its rays reach).
  pub initial_radius_outer: f64,

  /// Each new generation's inner radius, as a fraction of the previous one.
  /// Its outer radius is the previous inner radius.
  pub child_radius_factor: f64,

  /// Append a generation once the camera is this close to an intersecting
  /// node's bake center, relative to `radius_inner`.
  pub zoom_trigger_ratio: f64,

  /// The deepest generation stays while a non-empty node is this close,
  /// relative to `radius_inner`.
  pub prune_distance_ratio: f64,

  /// Appending stops here; deeper radii lose f64 precision.
  pub max_generations: usize,

  // Priority: 20·(2d)² + 2·generation/total − ln(tex)/3, highest wins.
  pub distance_weight: f64,
  pub generation_weight: f64,
  pub texture_size_divisor: f64,
  /// Cap on the distance ratio `d` used in the score.
  pub distance_ratio_cap: f64,

  /// Nodes at or above this size with `d` at or below `settled_distance`
  /// need no further work.
  pub settled_texture_size: u32,
  pub settled_distance: f64,

  /// Size of a first bake.
  pub initial_texture_size: u32,
  /// Size used to re-center a node the camera moved away from.
  pub rebake_texture_size: u32,
  pub max_texture_size: u32,

  /// Work limit of one bake step.
  pub bake_budget: BakeBudget,
}

impl HierarchyConfig {
  /// Radii of the generation appended below one with `radius_inner`.
  #[inline]
  pub fn child_radii(&self, radius_inner: f64) -> (f64, f64) {
    (radius_inner * self.child_radius_factor, radius_inner)
  }
}

impl Default for HierarchyConfig {
  fn default() -> Self {
    Self {
      initial_radius_inner: 0.7,
      initial_radius_outer: 3.1,
      child_radius_factor: 0.5,
      zoom_trigger_ratio: 0.01,
      prune_distance_ratio: 0.5,
      max_generations: 40,
      distance_weight: 20.0,
      generation_weight: 2.0,
      texture_size_divisor: 3.0,
      distance_ratio_cap: 0.5,
      settled_texture_size: 256,
      settled_distance: 1e-5,
      initial_texture_size: DEFAULT_TEXTURE_SIZE,
      rebake_texture_size: 32,
      max_texture_size: 1024,
      bake_budget: BakeBudget::DEFAULT,
    }
  }
}
