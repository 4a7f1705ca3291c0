//! LodNode - one baked tile at a given generation and triangle slot.

use std::fmt;

use glam::DVec3;

use crate::baker::{BakeInfo, TextureTile};
use crate::constants::PLACEHOLDER_CENTER;

/// Address of a node: generation (0 = outermost) and triangle slot (0-19).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId {
  pub generation: usize,
  pub nr: usize,
}

impl NodeId {
  pub fn new(generation: usize, nr: usize) -> Self {
    Self { generation, nr }
  }

  /// Same slot, one generation out. `None` at generation 0.
  pub fn parent(&self) -> Option<Self> {
    let generation = self.generation.checked_sub(1)?;
    Some(Self::new(generation, self.nr))
  }

  /// Same slot in every earlier generation, nearest first.
  pub fn ancestors(&self) -> impl Iterator<Item = NodeId> {
    let nr = self.nr;
    (0..self.generation).rev().map(move |g| NodeId::new(g, nr))
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "g{}/n{}", self.generation, self.nr)
  }
}

/// One node of the hierarchy.
///
/// Flags, center and tile only change together, when the node's own bake
/// commits. `hidden` is the exception: descendants toggle it.
#[derive(Clone, Debug, PartialEq)]
pub struct LodNode {
  pub id: NodeId,
  /// World-space point the tile was baked from.
  pub center: DVec3,
  pub radius_inner: f64,
  pub radius_outer: f64,
  /// `None` until the first bake.
  pub texture_size: Option<u32>,
  pub empty: bool,
  pub opaque: bool,
  pub intersection: bool,
  /// Covered by an opaque node of a deeper generation.
  pub hidden: bool,
  /// Painted tile; `None` while empty.
  pub tile: Option<TextureTile>,
}

impl LodNode {
  /// Never-baked node parked at the placeholder center.
  pub fn placeholder(id: NodeId, radius_inner: f64, radius_outer: f64) -> Self {
    Self {
      id,
      center: PLACEHOLDER_CENTER,
      radius_inner,
      radius_outer,
      texture_size: None,
      empty: true,
      opaque: false,
      intersection: false,
      hidden: false,
      tile: None,
    }
  }

  #[inline]
  pub fn is_baked(&self) -> bool {
    self.texture_size.is_some()
  }

  /// Camera distance from the bake center, in units of `radius_inner`.
  #[inline]
  pub fn distance_ratio(&self, position: DVec3) -> f64 {
    position.distance(self.center) / self.radius_inner
  }

  /// Replace center, flags and tile with a finished bake.
  pub(crate) fn commit(&mut self, info: &BakeInfo, tile: TextureTile) {
    self.center = info.center;
    self.texture_size = Some(info.texture_size);
    self.empty = info.empty;
    self.opaque = info.opaque;
    self.intersection = info.intersection;
    self.hidden = false;
    self.tile = (!info.empty).then_some(tile);
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
