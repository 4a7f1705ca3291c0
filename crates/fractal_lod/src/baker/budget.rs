//! Time slicing for incremental bakes.
//!
//! Keeps every idle slot short: one bake step marches at most
//! `texels_per_step` rays, then hands control back to the host loop.

/// Per-step work limit for the texture baker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BakeBudget {
  /// Maximum texels ray-marched per step (0 = unlimited).
  /// Texels outside the triangle are skipped for free.
  pub texels_per_step: usize,
}

impl BakeBudget {
  /// Default budget with a short, frame-friendly slice.
  pub const DEFAULT: Self = Self {
    texels_per_step: 100,
  };

  /// Finish a tile in one step. For tests and offline baking.
  pub const UNLIMITED: Self = Self { texels_per_step: 0 };

  /// Check if more texels can be marched in this step.
  #[inline]
  pub fn can_march(&self, marched: usize) -> bool {
    self.texels_per_step == 0 || marched < self.texels_per_step
  }
}

impl Default for BakeBudget {
  fn default() -> Self {
    Self::DEFAULT
  }
}
