//! Generation-indexed arena: fixed blocks of 20 nodes, grown and shrunk at
//! the tail only.
//!
//! ```text
//! generation 0  [n0 n1 ... n19]   radius 0.7   .. 3.1
//! generation 1  [n0 n1 ... n19]   radius 0.35 .. 0.7
//! generation 2  [n0 n1 ... n19]   radius 0.175 .. 0.35   <- deepest (tail)
//! ```
//!
//! Slot `i` of generation `g` continues slot `i` of generation `g - 1` at half
//! the scale, so `NodeId::ancestors` is plain index arithmetic.

use super::node::{LodNode, NodeId};
use crate::constants::TRIANGLE_COUNT;

/// One full set of nodes at a given depth.
pub type Generation = [LodNode; TRIANGLE_COUNT];

#[derive(Clone, Debug, Default)]
pub struct GenerationArena {
  generations: Vec<Generation>,
}

impl GenerationArena {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a generation of placeholder nodes. Returns its index.
  pub fn push(&mut self, radius_inner: f64, radius_outer: f64) -> usize {
    debug_assert!(radius_outer > radius_inner);
    let generation = self.generations.len();
    self.generations.push(std::array::from_fn(|nr| {
      LodNode::placeholder(NodeId::new(generation, nr), radius_inner, radius_outer)
    }));
    generation
  }

  /// Remove the deepest generation.
  pub fn pop(&mut self) -> Option<Generation> {
    self.generations.pop()
  }

  pub fn clear(&mut self) {
    self.generations.clear();
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.generations.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.generations.is_empty()
  }

  /// Node count over all generations.
  #[inline]
  pub fn total_nodes(&self) -> usize {
    self.generations.len() * TRIANGLE_COUNT
  }

  #[inline]
  pub fn deepest_index(&self) -> Option<usize> {
    self.generations.len().checked_sub(1)
  }

  pub fn deepest(&self) -> Option<&Generation> {
    self.generations.last()
  }

  pub fn deepest_mut(&mut self) -> Option<&mut Generation> {
    self.generations.last_mut()
  }

  pub fn generation(&self, generation: usize) -> Option<&Generation> {
    self.generations.get(generation)
  }

  pub fn get(&self, id: NodeId) -> Option<&LodNode> {
    self.generations.get(id.generation)?.get(id.nr)
  }

  pub fn get_mut(&mut self, id: NodeId) -> Option<&mut LodNode> {
    self.generations.get_mut(id.generation)?.get_mut(id.nr)
  }

  /// All nodes, generation 0 first.
  pub fn iter(&self) -> impl Iterator<Item = &LodNode> {
    self.generations.iter().flatten()
  }
}

#[cfg(test)]
#[path = "generations_test.rs"]
mod generations_test;
