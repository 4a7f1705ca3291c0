//! Next-node selection.
//!
//! Every idle step picks the single node whose refinement matters most:
//!
//! ```text
//! score = distance_weight · (2d)²            camera moved off the bake point
//!       + generation_weight · g / total      deeper is better (zoom bias)
//!       − ln(texture_size) / divisor         big tiles are expensive
//! ```
//!
//! `d` is the camera distance from the node's bake center in units of its
//! inner radius, capped at `distance_ratio_cap`. The highest score wins; on a
//! tie the first node scanned wins. Slots with a corner in view are scanned
//! first (deepest generation first); the rest only when no visible slot has
//! work left.

use glam::DVec3;

use super::config::HierarchyConfig;
use super::generations::GenerationArena;
use super::node::{LodNode, NodeId};
use crate::camera::Camera;
use crate::constants::TRIANGLE_COUNT;
use crate::mesh::Frustum;

/// Node chosen for the next bake.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
  pub id: NodeId,
  pub texture_size: u32,
  pub score: f64,
}

/// Score `node` and pick its next texture size. `None` when it needs no work.
pub fn evaluate(
  node: &LodNode,
  position: DVec3,
  total_nodes: usize,
  config: &HierarchyConfig,
) -> Option<Candidate> {
  if node.hidden {
    return None;
  }

  let tex = node.texture_size.unwrap_or(config.initial_texture_size);
  let d = node.distance_ratio(position).min(config.distance_ratio_cap);
  if tex >= config.settled_texture_size && d <= config.settled_distance {
    return None;
  }

  let texture_size = match node.texture_size {
    None => config.initial_texture_size,
    Some(tex) => {
      let recenter = d > 1.0 / tex as f64;
      let target = if recenter {
        config.rebake_texture_size
      } else {
        tex.saturating_mul(2)
      }
      .min(config.max_texture_size);
      if !recenter && target == tex {
        return None;
      }
      target
    }
  };

  let score = config.distance_weight * (2.0 * d).powi(2)
    + config.generation_weight * node.id.generation as f64 / total_nodes.max(1) as f64
    - (tex as f64).ln() / config.texture_size_divisor;

  Some(Candidate {
    id: node.id,
    texture_size,
    score,
  })
}

/// Best candidate, optionally restricted to one generation.
pub fn select(
  arena: &GenerationArena,
  camera: &Camera,
  frustum: &Frustum,
  config: &HierarchyConfig,
  only_generation: Option<usize>,
) -> Option<Candidate> {
  let (visible, hidden): (Vec<usize>, Vec<usize>) = (0..TRIANGLE_COUNT)
    .partition(|&nr| frustum.triangle_visible(nr, DVec3::ZERO, &camera.rotation) > 0);

  best_in_slots(arena, camera.position, config, only_generation, &visible)
    .or_else(|| best_in_slots(arena, camera.position, config, only_generation, &hidden))
}

fn best_in_slots(
  arena: &GenerationArena,
  position: DVec3,
  config: &HierarchyConfig,
  only_generation: Option<usize>,
  slots: &[usize],
) -> Option<Candidate> {
  let total_nodes = arena.total_nodes();
  let mut best: Option<Candidate> = None;

  for &nr in slots {
    for generation in (0..arena.len()).rev() {
      if only_generation.is_some_and(|g| g != generation) {
        continue;
      }
      let Some(node) = arena.get(NodeId::new(generation, nr)) else {
        continue;
      };
      let Some(candidate) = evaluate(node, position, total_nodes, config) else {
        continue;
      };
      if best.map_or(true, |b| candidate.score > b.score) {
        best = Some(candidate);
      }
    }
  }

  best
}

#[cfg(test)]
#[path = "priority_test.rs"]
mod priority_test;
