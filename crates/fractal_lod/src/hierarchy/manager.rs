//! HierarchyManager - decides, one idle slot at a time, which node to bake
//! next, when to zoom in a generation and when to drop one.
//!
//! # Step
//!
//! ```text
//!             ┌──────── Baking ────────┐
//! step() ──▶  │ advance job one slice  │──▶ complete? commit + hide ancestors
//!             └────────────────────────┘
//!             ┌──────── Idle ──────────┐
//!             │ 1. append generation?  │──▶ yes: bake in the new generation
//!             │ 2. prune deepest?      │
//!             │ 3. select best node    │──▶ start job at the camera position
//!             └────────────────────────┘
//! ```

use web_time::Instant;

use super::config::HierarchyConfig;
use super::generations::GenerationArena;
use super::node::{LodNode, NodeId};
use super::priority::{self, Candidate};
use crate::baker::{BakeJob, BakeOutput, BakeStep, Baker};
use crate::camera::Camera;
use crate::formula::FractalFormula;
use crate::mesh::Frustum;
use crate::metrics::BakeMetrics;

/// What the manager is doing between steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HierarchyState {
  Idle,
  Baking { id: NodeId, texture_size: u32 },
}

/// Changes the renderer and the host need to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HierarchyEvent {
  /// A node received a new tile and flags.
  Committed(NodeId),
  GenerationAppended(usize),
  /// The generation was removed along with its tiles.
  GenerationPruned(usize),
  /// All generations and tiles were dropped.
  Reset,
}

/// Owner of the generation arena and the single bake job.
pub struct HierarchyManager {
  config: HierarchyConfig,
  formula: FractalFormula,
  arena: GenerationArena,
  baker: Baker,
  events: Vec<HierarchyEvent>,
  metrics: BakeMetrics,
}

impl HierarchyManager {
  /// Manager with the initial generation in place. Emits no event.
  pub fn new(formula: FractalFormula, config: HierarchyConfig) -> Self {
    let mut manager = Self {
      baker: Baker::new(config.bake_budget),
      config,
      formula,
      arena: GenerationArena::new(),
      events: Vec::new(),
      metrics: BakeMetrics::new(),
    };
    manager.rebuild();
    manager
  }

  fn rebuild(&mut self) {
    self.baker.cancel();
    self.arena.clear();
    self
      .arena
      .push(self.config.initial_radius_inner, self.config.initial_radius_outer);
  }

  /// Drop the job, every node and tile, and start over with `formula`.
  pub fn reset(&mut self, formula: FractalFormula) {
    self.formula = formula;
    self.rebuild();
    self.metrics.record_reset();
    self.events.push(HierarchyEvent::Reset);
    tracing::info!(formula = %formula, "hierarchy reset");
  }

  /// Run one idle slot. Returns `true` when work was done.
  #[tracing::instrument(skip_all, name = "hierarchy::step")]
  pub fn step(&mut self, camera: &Camera, frustum: &Frustum) -> bool {
    if !self.baker.is_idle() {
      self.advance_job();
      return true;
    }

    if let Some(generation) = self.try_append(camera) {
      if let Some(candidate) =
        priority::select(&self.arena, camera, frustum, &self.config, Some(generation))
      {
        self.start(candidate, camera);
      }
      return true;
    }

    self.try_prune(camera);

    let candidate = {
      let _span = tracing::trace_span!("select").entered();
      priority::select(&self.arena, camera, frustum, &self.config, None)
    };
    match candidate {
      Some(candidate) => {
        self.start(candidate, camera);
        true
      }
      None => false,
    }
  }

  fn start(&mut self, candidate: Candidate, camera: &Camera) {
    let Some(node) = self.arena.get(candidate.id) else {
      return;
    };
    let job = BakeJob::new(
      candidate.id,
      camera.position,
      node.radius_inner,
      node.radius_outer,
      candidate.texture_size,
    );
    self.baker.start(job);
  }

  fn advance_job(&mut self) {
    let started = Instant::now();
    let step = self.baker.advance(&self.formula);
    let elapsed_us = started.elapsed().as_micros() as u64;

    match step {
      BakeStep::Idle => {}
      BakeStep::InProgress(marched) => self.metrics.record_slice(elapsed_us, marched),
      BakeStep::Complete(output, marched) => {
        self.metrics.record_slice(elapsed_us, marched);
        self.commit(output);
      }
    }
  }

  /// Store a finished bake and update occlusion along its slot.
  fn commit(&mut self, output: BakeOutput) {
    let BakeOutput { info, tile } = output;
    let Some(node) = self.arena.get_mut(info.id) else {
      return;
    };
    let bytes = if info.empty { 0 } else { tile.memory_bytes() };
    let released = node.tile.as_ref().map_or(0, |t| t.memory_bytes());
    node.commit(&info, tile);

    // An opaque shell hides everything behind it; a transparent one reveals.
    for ancestor in info.id.ancestors() {
      if let Some(node) = self.arena.get_mut(ancestor) {
        node.hidden = info.opaque;
      }
    }

    self.metrics.release_tiles(released);
    self.metrics.record_commit(bytes);
    self.events.push(HierarchyEvent::Committed(info.id));
    tracing::debug!(
      node = %info.id,
      texture_size = info.texture_size,
      empty = info.empty,
      opaque = info.opaque,
      intersection = info.intersection,
      "tile committed"
    );
  }

  /// Append a generation when the camera sits on an intersecting node of the
  /// deepest generation.
  fn try_append(&mut self, camera: &Camera) -> Option<usize> {
    if self.arena.len() >= self.config.max_generations {
      return None;
    }
    let deepest = self.arena.deepest()?;
    let trigger = deepest.iter().any(|node| {
      node.intersection && node.distance_ratio(camera.position) < self.config.zoom_trigger_ratio
    });
    if !trigger {
      return None;
    }

    let (inner, outer) = self.config.child_radii(deepest[0].radius_inner);
    let generation = self.arena.push(inner, outer);
    self.metrics.record_append();
    self.events.push(HierarchyEvent::GenerationAppended(generation));
    tracing::info!(generation, radius_inner = inner, "generation appended");
    Some(generation)
  }

  /// Drop the deepest generation once it is fully baked and the camera has
  /// left all of its non-empty nodes.
  fn try_prune(&mut self, camera: &Camera) -> Option<usize> {
    if self.arena.len() <= 1 {
      return None;
    }
    let deepest = self.arena.deepest()?;
    let near = deepest.iter().any(|node| {
      !node.empty && node.distance_ratio(camera.position) < self.config.prune_distance_ratio
    });
    if near || !deepest.iter().all(LodNode::is_baked) {
      return None;
    }

    let removed = self.arena.pop()?;
    let generation = removed[0].id.generation;
    let released: usize = removed
      .iter()
      .filter_map(|n| n.tile.as_ref())
      .map(|t| t.memory_bytes())
      .sum();
    if let Some(nodes) = self.arena.deepest_mut() {
      for node in nodes.iter_mut() {
        node.hidden = false;
      }
    }

    self.metrics.release_tiles(released);
    self.metrics.record_prune();
    self.events.push(HierarchyEvent::GenerationPruned(generation));
    tracing::info!(generation, "generation pruned");
    Some(generation)
  }

  pub fn state(&self) -> HierarchyState {
    match self.baker.active() {
      Some(job) => HierarchyState::Baking {
        id: job.id(),
        texture_size: job.texture_size(),
      },
      None => HierarchyState::Idle,
    }
  }

  /// Inner radius of the deepest generation: the current zoom scale.
  pub fn scale(&self) -> f64 {
    self
      .arena
      .deepest()
      .map_or(self.config.initial_radius_inner, |g| g[0].radius_inner)
  }

  pub fn generation_count(&self) -> usize {
    self.arena.len()
  }

  pub fn node(&self, id: NodeId) -> Option<&LodNode> {
    self.arena.get(id)
  }

  /// All nodes, generation 0 first.
  pub fn nodes(&self) -> impl Iterator<Item = &LodNode> {
    self.arena.iter()
  }

  /// Take the events raised since the last call.
  pub fn drain_events(&mut self) -> std::vec::Drain<'_, HierarchyEvent> {
    self.events.drain(..)
  }

  pub fn formula(&self) -> FractalFormula {
    self.formula
  }

  pub fn config(&self) -> &HierarchyConfig {
    &self.config
  }

  pub fn metrics(&self) -> &BakeMetrics {
    &self.metrics
  }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;
