//! One incremental bake: the texel cursor, the flag accumulators and the
//! tile being painted.
//!
//! Texels are scanned row-major. Row `y` only covers the triangle's span at
//! `v = y / size`, so texels left or right of the slanted edges are skipped
//! without marching:
//!
//! ```text
//!   y = size-1      ·····██·····
//!                   ····████····
//!                   ··████████··
//!   y = 0           ████████████
//!                   x = 0 ...  size-1
//! ```

use glam::DVec3;
use thiserror::Error;

use super::budget::BakeBudget;
use super::tile::TextureTile;
use crate::constants::INSIDE_COLOR;
use crate::formula::Membership;
use crate::hierarchy::NodeId;
use crate::mesh::triangle_texture_pos;
use crate::ray_march::{march, RayHit};

/// Query on a job that has not finished scanning.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BakeError {
  #[error("bake job for {0} is still in progress")]
  Incomplete(NodeId),
}

/// Result of one [`BakeJob::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BakeProgress {
  InProgress,
  Complete,
}

/// Flags and geometry a completed job commits to its node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BakeInfo {
  pub id: NodeId,
  /// Camera position the tile was baked from.
  pub center: DVec3,
  pub texture_size: u32,
  /// No texel hit the surface.
  pub empty: bool,
  /// Every texel hit the surface.
  pub opaque: bool,
  /// Some ray started inside or hit within one inner radius.
  pub intersection: bool,
}

/// A completed job's info plus its painted tile.
#[derive(Clone, Debug, PartialEq)]
pub struct BakeOutput {
  pub info: BakeInfo,
  pub tile: TextureTile,
}

/// Incremental scan of one node's texture tile.
#[derive(Clone, Debug)]
pub struct BakeJob {
  id: NodeId,
  center: DVec3,
  radius_inner: f64,
  radius_outer: f64,
  tile: TextureTile,
  next_x: u32,
  next_y: u32,
  empty: bool,
  opaque: bool,
  intersection: bool,
  texels_marched: usize,
}

impl BakeJob {
  /// Prepare a bake of node `id` at `texture_size`, seen from `center`.
  pub fn new(
    id: NodeId,
    center: DVec3,
    radius_inner: f64,
    radius_outer: f64,
    texture_size: u32,
  ) -> Self {
    Self {
      id,
      center,
      radius_inner,
      radius_outer,
      tile: TextureTile::new(texture_size),
      next_x: 0,
      next_y: 0,
      empty: true,
      opaque: true,
      intersection: false,
      texels_marched: 0,
    }
  }

  #[inline]
  pub fn id(&self) -> NodeId {
    self.id
  }

  #[inline]
  pub fn texture_size(&self) -> u32 {
    self.tile.size()
  }

  #[inline]
  pub fn center(&self) -> DVec3 {
    self.center
  }

  /// Cursor `(x, y)` of the next texel to consider.
  #[inline]
  pub fn cursor(&self) -> (u32, u32) {
    (self.next_x, self.next_y)
  }

  /// Rays marched so far.
  #[inline]
  pub fn texels_marched(&self) -> usize {
    self.texels_marched
  }

  #[inline]
  pub fn is_complete(&self) -> bool {
    self.next_y >= self.tile.size()
  }

  /// True when texel `(x, y)` lies within the triangle's row span.
  #[inline]
  fn in_triangle(x: u32, y: u32, size: u32) -> bool {
    let (x, half_y, size) = (x as f64, y as f64 / 2.0, size as f64);
    !(x < half_y - 1.0 || x > size - half_y + 1.0)
  }

  /// March up to `budget.texels_per_step` texels, resuming at the cursor.
  pub fn step<M: Membership + ?Sized>(&mut self, formula: &M, budget: &BakeBudget) -> BakeProgress {
    let size = self.tile.size();
    let inv_size = 1.0 / size as f64;
    let max_distance = self.radius_outer / self.radius_inner;
    let mut marched = 0;

    while !self.is_complete() && budget.can_march(marched) {
      let (x, y) = (self.next_x, self.next_y);
      self.next_x += 1;
      if self.next_x >= size {
        self.next_x = 0;
        self.next_y += 1;
      }

      if !Self::in_triangle(x, y, size) {
        continue;
      }

      let nr = self.id.nr;
      let direction =
        triangle_texture_pos(nr, x as f64 * inv_size, y as f64 * inv_size) * self.radius_inner;
      let mut near = false;
      let hit = march(formula, self.center, direction, inv_size, max_distance, || {
        near = true
      });
      marched += 1;

      match hit {
        RayHit::Miss => self.opaque = false,
        RayHit::Inside => {
          self.tile.put(x, y, INSIDE_COLOR);
          self.intersection = true;
          self.empty = false;
        }
        RayHit::Color(rgb) => {
          self.tile.put(x, y, rgb.map(|c| (255.0 * c).floor() as u8));
          self.empty = false;
        }
      }
      if near {
        self.intersection = true;
      }
    }

    self.texels_marched += marched;
    tracing::trace!(
      node = %self.id,
      marched,
      row = self.next_y,
      "bake slice"
    );

    if self.is_complete() {
      BakeProgress::Complete
    } else {
      BakeProgress::InProgress
    }
  }

  /// Flags and geometry to commit. Fails until the scan is done.
  pub fn info(&self) -> Result<BakeInfo, BakeError> {
    if !self.is_complete() {
      return Err(BakeError::Incomplete(self.id));
    }
    Ok(BakeInfo {
      id: self.id,
      center: self.center,
      texture_size: self.tile.size(),
      empty: self.empty,
      opaque: self.opaque,
      intersection: self.intersection,
    })
  }

  /// Consume the job into its commit payload. Fails until the scan is done.
  pub fn finish(self) -> Result<BakeOutput, BakeError> {
    let info = self.info()?;
    Ok(BakeOutput {
      info,
      tile: self.tile,
    })
  }
}

#[cfg(test)]
#[path = "job_test.rs"]
mod job_test;
