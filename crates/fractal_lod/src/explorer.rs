//! Explorer: the single entry point a host loop drives.
//!
//! The host calls [`Explorer::tick`] for every animation frame and for every
//! idle slot it gets. Idle ticks advance the bake pipeline; frame ticks move
//! the camera, redraw and hand back the location to persist.
//!
//! ```text
//!  host loop ── tick(is_idle = true)  ──▶ HierarchyManager::step ──▶ events ──▶ Renderer::upload
//!            └─ tick(is_idle = false) ──▶ ViewController::update ──▶ Renderer::draw
//! ```
//!
//! An idle step that found nothing to do schedules one more step on the next
//! frame, so baking resumes as soon as the camera gives it work even when the
//! host stops reporting idle time.

use glam::DVec3;
use thiserror::Error;
use web_time::Instant;

use crate::algebra::AlgebraError;
use crate::formula::FractalFormula;
use crate::hierarchy::{HierarchyConfig, HierarchyEvent, HierarchyManager};
use crate::mesh::Frustum;
use crate::navigation::NavigationToken;
use crate::render::{GpuDevice, RenderError, Renderer};
use crate::view::{InputState, ViewConfig, ViewController};

#[derive(Error, Debug)]
pub enum ExplorerError {
  #[error(transparent)]
  Algebra(#[from] AlgebraError),
  #[error(transparent)]
  Render(#[from] RenderError),
}

/// Configuration of every component the explorer owns.
#[derive(Clone, Debug, Default)]
pub struct ExplorerConfig {
  pub hierarchy: HierarchyConfig,
  pub view: ViewConfig,
}

/// What one tick did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tick {
  /// A bake step ran and reported work.
  pub baked: bool,
  /// Nodes drawn, when the frame was redrawn.
  pub drawn: Option<usize>,
  /// Location the host should persist (e.g. into the URL fragment).
  pub persist: Option<NavigationToken>,
}

pub struct Explorer<G: GpuDevice> {
  view: ViewController,
  hierarchy: HierarchyManager,
  renderer: Renderer<G>,
  frustum: Frustum,
  bake_on_next_frame: bool,
}

impl<G: GpuDevice> Explorer<G> {
  /// Explorer showing `formula` from `position` in a `width × height`
  /// viewport.
  pub fn new(
    device: G,
    width: u32,
    height: u32,
    formula: FractalFormula,
    position: DVec3,
    config: ExplorerConfig,
  ) -> Result<Self, ExplorerError> {
    let frustum = Frustum::from_viewport(width, height);
    Ok(Self {
      view: ViewController::new(formula, position, config.view)?,
      hierarchy: HierarchyManager::new(formula, config.hierarchy),
      renderer: Renderer::new(device, frustum.aspect)?,
      frustum,
      bake_on_next_frame: false,
    })
  }

  /// Run one idle slot (`is_idle`) or one animation frame.
  pub fn tick(
    &mut self,
    is_idle: bool,
    input: &InputState,
    dt: f64,
    now: Instant,
  ) -> Result<Tick, ExplorerError> {
    let mut tick = Tick::default();

    if is_idle || std::mem::take(&mut self.bake_on_next_frame) {
      tick.baked = self.bake_step()?;
      self.bake_on_next_frame = !tick.baked;
    }
    if is_idle {
      return Ok(tick);
    }

    if self.view.update(input, dt, self.hierarchy.scale())? {
      let camera = self.view.camera()?;
      tick.drawn = Some(self.renderer.draw(self.hierarchy.nodes(), &camera)?);
    }
    tick.persist = self.view.poll_persist(now);
    Ok(tick)
  }

  fn bake_step(&mut self) -> Result<bool, ExplorerError> {
    let camera = self.view.camera()?;
    let worked = self.hierarchy.step(&camera, &self.frustum);
    self.sync_renderer()?;
    Ok(worked)
  }

  /// Mirror hierarchy changes into GPU textures.
  fn sync_renderer(&mut self) -> Result<(), ExplorerError> {
    let events: Vec<HierarchyEvent> = self.hierarchy.drain_events().collect();
    for event in events {
      match event {
        HierarchyEvent::Committed(id) => {
          match self.hierarchy.node(id).and_then(|n| n.tile.as_ref()) {
            Some(tile) => self.renderer.upload(id, tile)?,
            None => self.renderer.forget(id),
          }
          self.view.request_redraw();
        }
        HierarchyEvent::GenerationAppended(_) => {}
        HierarchyEvent::GenerationPruned(generation) => {
          self.renderer.forget_generation(generation);
          self.view.request_redraw();
        }
        HierarchyEvent::Reset => {
          self.renderer.clear_textures();
          self.view.request_redraw();
        }
      }
    }
    Ok(())
  }

  /// Viewport changed size.
  pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ExplorerError> {
    self.frustum = Frustum::from_viewport(width, height);
    self.renderer.resize(self.frustum.aspect)?;
    self.view.request_redraw();
    Ok(())
  }

  /// Switch fractal and jump to `position`; all baked state is dropped.
  /// A rejected position leaves both the view and the hierarchy untouched.
  pub fn set_formula(&mut self, formula: FractalFormula, position: DVec3) -> Result<(), ExplorerError> {
    self.view.set_formula(formula, position)?;
    self.hierarchy.reset(formula);
    self.sync_renderer()
  }

  /// Apply a location string from outside. Tokens the controller wrote
  /// itself only trigger a redraw; malformed ones are ignored. Returns
  /// `true` when the explorer was reset.
  pub fn on_location_change(&mut self, location: &str) -> Result<bool, ExplorerError> {
    let token = match location.parse::<NavigationToken>() {
      Ok(token) => token,
      Err(err) => {
        tracing::debug!(location, %err, "ignoring navigation token");
        return Ok(false);
      }
    };
    self.view.request_redraw();
    if token.is_internal() {
      return Ok(false);
    }
    self.set_formula(token.formula, token.position)?;
    Ok(true)
  }

  pub fn view(&self) -> &ViewController {
    &self.view
  }

  pub fn view_mut(&mut self) -> &mut ViewController {
    &mut self.view
  }

  pub fn hierarchy(&self) -> &HierarchyManager {
    &self.hierarchy
  }

  pub fn renderer(&self) -> &Renderer<G> {
    &self.renderer
  }

  pub fn frustum(&self) -> Frustum {
    self.frustum
  }
}

#[cfg(test)]
#[path = "explorer_test.rs"]
mod explorer_test;
