//! View controller: turns held controls and the pointer into camera motion.
//!
//! Orientation is absolute, derived from the pointer every frame:
//!
//! ```text
//! rx = 3 · (0.5 − my)     pitch
//! ry = 11 · (mx − 0.5)    yaw
//! rz = roll               accumulated from Q / E
//!
//! rotation = R(−rx, x) · R(ry, y) · R(rz, z)
//! inverse  = R(−rz, z) · R(−ry, y) · R(rx, x)    (moves camera-space input)
//! ```

use std::collections::HashSet;
use std::time::Duration;

use glam::DVec3;
use web_time::Instant;

use crate::algebra::{AlgebraError, Matrix};
use crate::camera::Camera;
use crate::formula::FractalFormula;
use crate::navigation::{NavigationToken, Origin};

/// Held-key controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
  Forward,
  Backward,
  StrafeLeft,
  StrafeRight,
  RollLeft,
  RollRight,
}

/// Input snapshot for one frame.
#[derive(Clone, Debug, Default)]
pub struct InputState {
  held: HashSet<Control>,
  /// Pointer in normalized viewport coordinates, `(0, 0)` top-left.
  pub pointer: Option<(f64, f64)>,
  /// Primary pointer button; moves forward like [`Control::Forward`].
  pub primary_button: bool,
}

impl InputState {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn press(&mut self, control: Control) {
    self.held.insert(control);
  }

  pub fn release(&mut self, control: Control) {
    self.held.remove(&control);
  }

  #[inline]
  pub fn is_held(&self, control: Control) -> bool {
    self.held.contains(&control)
  }

  /// Builder form for tests and scripted flights.
  pub fn holding(mut self, control: Control) -> Self {
    self.press(control);
    self
  }

  pub fn pointing_at(mut self, x: f64, y: f64) -> Self {
    self.pointer = Some((x, y));
    self
  }
}

/// Tunables of the view controller.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
  /// Movement speed per second, times the hierarchy scale.
  pub speed_factor: f64,
  /// Longest frame step integrated at once, in seconds.
  pub max_dt: f64,
  /// Roll speed in radians per second.
  pub roll_speed: f64,
  /// Pitch span across the viewport height.
  pub pitch_range: f64,
  /// Yaw span across the viewport width.
  pub yaw_range: f64,
  /// The camera is pulled back onto this sphere.
  pub max_radius: f64,
  /// Minimum time between persisted navigation tokens.
  pub persist_interval: Duration,
}

impl Default for ViewConfig {
  fn default() -> Self {
    Self {
      speed_factor: 0.6,
      max_dt: 0.1,
      roll_speed: 0.5,
      pitch_range: 3.0,
      yaw_range: 11.0,
      max_radius: 2.0,
      persist_interval: Duration::from_secs(1),
    }
  }
}

/// Camera state plus the bookkeeping for redraws and persistence.
#[derive(Clone, Debug)]
pub struct ViewController {
  config: ViewConfig,
  formula: FractalFormula,
  position: Matrix,
  rotation: Matrix,
  roll: f64,
  /// Pointer the current rotation was built from.
  last_pointer: Option<(f64, f64)>,
  rotation_locked: bool,
  needs_redraw: bool,
  dirty: bool,
  last_persist: Option<Instant>,
}

impl ViewController {
  pub fn new(
    formula: FractalFormula,
    position: DVec3,
    config: ViewConfig,
  ) -> Result<Self, AlgebraError> {
    Ok(Self {
      config,
      formula,
      position: start_position(position)?,
      rotation: Matrix::identity(3),
      roll: 0.0,
      last_pointer: None,
      rotation_locked: false,
      needs_redraw: true,
      dirty: false,
      last_persist: None,
    })
  }

  /// Integrate one frame of input. Returns `true` when the view changed and
  /// must be redrawn.
  pub fn update(&mut self, input: &InputState, dt: f64, scale: f64) -> Result<bool, AlgebraError> {
    let dt = dt.clamp(0.0, self.config.max_dt);
    let step = self.config.speed_factor * scale * dt;

    let mut movement = DVec3::ZERO;
    if input.is_held(Control::Forward) || input.primary_button {
      movement.z += step;
    }
    if input.is_held(Control::Backward) {
      movement.z -= step;
    }
    if input.is_held(Control::StrafeLeft) {
      movement.x -= step;
    }
    if input.is_held(Control::StrafeRight) {
      movement.x += step;
    }
    let mut rolled = false;
    if input.is_held(Control::RollLeft) {
      self.roll += self.config.roll_speed * dt;
      rolled = true;
    }
    if input.is_held(Control::RollRight) {
      self.roll -= self.config.roll_speed * dt;
      rolled = true;
    }

    let pointer = self.pointer(input);
    let moved = movement != DVec3::ZERO;
    if !(moved || rolled || self.needs_redraw || self.last_pointer != Some(pointer)) {
      return Ok(false);
    }

    self.orient(pointer, Matrix::from_dvec3(movement)?, moved)?;
    self.last_pointer = Some(pointer);
    self.needs_redraw = false;
    Ok(true)
  }

  /// Pointer used for orientation: frozen while locked, centered when absent.
  fn pointer(&self, input: &InputState) -> (f64, f64) {
    let pointer = if self.rotation_locked {
      self.last_pointer
    } else {
      input.pointer
    };
    match pointer {
      Some((x, y)) if x >= 0.0 && y >= 0.0 => (x, y),
      _ => (0.5, 0.5),
    }
  }

  fn orient(&mut self, (mx, my): (f64, f64), movement: Matrix, moved: bool) -> Result<(), AlgebraError> {
    let rx = self.config.pitch_range * (0.5 - my);
    let ry = self.config.yaw_range * (mx - 0.5);
    let rz = self.roll;

    self.rotation = Matrix::rotation(-rx, 0)?
      .multiply(&Matrix::rotation(ry, 1)?)?
      .multiply(&Matrix::rotation(rz, 2)?)?;

    if moved {
      let inverse = Matrix::rotation(-rz, 2)?
        .multiply(&Matrix::rotation(-ry, 1)?)?
        .multiply(&Matrix::rotation(rx, 0)?)?;
      self.position = self.position.add(&inverse.multiply(&movement)?)?;
      self.dirty = true;
    }

    let norm = self.position.norm()?;
    if norm > self.config.max_radius {
      self.position = self.position.scale(self.config.max_radius / norm)?;
    }
    Ok(())
  }

  /// Jump to `formula` at `position` with a level camera.
  pub fn set_formula(&mut self, formula: FractalFormula, position: DVec3) -> Result<(), AlgebraError> {
    self.position = start_position(position)?;
    self.rotation = Matrix::identity(3);
    self.roll = 0.0;
    self.formula = formula;
    self.dirty = true;
    self.needs_redraw = true;
    Ok(())
  }

  /// Force a redraw on the next update (a tile was committed, the viewport
  /// changed, ...).
  pub fn request_redraw(&mut self) {
    self.needs_redraw = true;
  }

  /// Freeze or unfreeze the orientation at the last pointer position.
  pub fn toggle_rotation_lock(&mut self) -> bool {
    self.rotation_locked = !self.rotation_locked;
    self.rotation_locked
  }

  #[inline]
  pub fn rotation_locked(&self) -> bool {
    self.rotation_locked
  }

  /// Token to persist, at most once per `persist_interval` and only after the
  /// camera moved. Formulas outside the registry have no token that could be
  /// read back and are never persisted.
  pub fn poll_persist(&mut self, now: Instant) -> Option<NavigationToken> {
    if !self.dirty || !self.formula.is_registered() {
      return None;
    }
    if let Some(last) = self.last_persist {
      if now.saturating_duration_since(last) < self.config.persist_interval {
        return None;
      }
    }
    let token = self.token().ok()?;
    self.dirty = false;
    self.last_persist = Some(now);
    Some(token)
  }

  /// Current location as an internal token.
  pub fn token(&self) -> Result<NavigationToken, AlgebraError> {
    Ok(NavigationToken {
      formula: self.formula,
      position: self.position.to_dvec3()?,
      origin: Origin::Internal,
    })
  }

  pub fn camera(&self) -> Result<Camera, AlgebraError> {
    Camera::from_matrices(&self.position, &self.rotation)
  }

  pub fn position(&self) -> &Matrix {
    &self.position
  }

  pub fn rotation(&self) -> &Matrix {
    &self.rotation
  }

  #[inline]
  pub fn roll(&self) -> f64 {
    self.roll
  }

  #[inline]
  pub fn formula(&self) -> FractalFormula {
    self.formula
  }

  #[inline]
  pub fn is_dirty(&self) -> bool {
    self.dirty
  }

  pub fn config(&self) -> &ViewConfig {
    &self.config
  }
}

/// Camera positions must be finite: the radius clamp cannot pull an
/// infinite coordinate back.
fn start_position(position: DVec3) -> Result<Matrix, AlgebraError> {
  if !position.is_finite() {
    return Err(AlgebraError::NotFinite { op: "position" });
  }
  Matrix::from_dvec3(position)
}

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;
