//! Camera snapshot handed to the hierarchy and the renderer each tick.

use glam::{DMat3, DVec3};

use crate::algebra::{AlgebraError, Matrix};

/// World-space position plus orthonormal view rotation.
///
/// `rotation` maps world offsets into camera space, where `+z` looks ahead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
  pub position: DVec3,
  pub rotation: DMat3,
}

impl Default for Camera {
  fn default() -> Self {
    Self {
      position: DVec3::ZERO,
      rotation: DMat3::IDENTITY,
    }
  }
}

impl Camera {
  pub fn new(position: DVec3, rotation: DMat3) -> Self {
    Self { position, rotation }
  }

  /// Camera at `position` looking down `+z`.
  pub fn at(position: DVec3) -> Self {
    Self {
      position,
      ..Self::default()
    }
  }

  /// Snapshot of the controller's matrix state.
  pub fn from_matrices(position: &Matrix, rotation: &Matrix) -> Result<Self, AlgebraError> {
    Ok(Self {
      position: position.to_dvec3()?,
      rotation: rotation.to_dmat3()?,
    })
  }

  /// Camera-space offset of a world point.
  #[inline]
  pub fn to_view(&self, world: DVec3) -> DVec3 {
    self.rotation * (world - self.position)
  }
}
