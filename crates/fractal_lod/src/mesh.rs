//! Base icosahedron: the 20 triangles every generation of the hierarchy
//! is tiled on.
//!
//! Each triangle carries a degenerate texture layout: vertex 0 is the apex at
//! UV `(0.5, 0)`, vertices 1 and 2 sit at `(0, 1)` and `(1, 1)`.
//!
//! ```text
//!   v=0        apex (vertex 0)
//!              /\
//!             /  \
//!            /    \
//!   v=1     /______\
//!     vertex 1    vertex 2
//! ```

use glam::{DMat3, DVec3};

use crate::constants::TRIANGLE_COUNT;

const S: f64 = 0.52573111211;
const T: f64 = 0.85065080835;

/// The 12 icosahedron vertices (unit length, golden-ratio proportions).
pub const VERTICES: [DVec3; 12] = [
  DVec3::new(-S, T, 0.0),
  DVec3::new(S, T, 0.0),
  DVec3::new(-S, -T, 0.0),
  DVec3::new(S, -T, 0.0),
  DVec3::new(0.0, -S, T),
  DVec3::new(0.0, S, T),
  DVec3::new(0.0, -S, -T),
  DVec3::new(0.0, S, -T),
  DVec3::new(T, 0.0, -S),
  DVec3::new(T, 0.0, S),
  DVec3::new(-T, 0.0, -S),
  DVec3::new(-T, 0.0, S),
];

/// Vertex indices per triangle; the first index is the texture apex.
pub const TRIANGLES: [[usize; 3]; TRIANGLE_COUNT] = [
  [0, 11, 5],
  [0, 5, 1],
  [0, 1, 7],
  [0, 7, 10],
  [0, 10, 11],
  [1, 5, 9],
  [5, 11, 4],
  [11, 10, 2],
  [10, 7, 6],
  [7, 1, 8],
  [3, 9, 4],
  [3, 4, 2],
  [3, 2, 6],
  [3, 6, 8],
  [3, 8, 9],
  [4, 9, 5],
  [2, 4, 11],
  [6, 2, 10],
  [8, 6, 7],
  [9, 8, 1],
];

/// UV of the three corners of every triangle.
pub const TRIANGLE_UVS: [[f32; 2]; 3] = [[0.5, 0.0], [0.0, 1.0], [1.0, 1.0]];

/// Corner positions of triangle `nr`.
///
/// # Panics
/// When `nr >= 20`.
#[inline]
pub fn triangle_vertices(nr: usize) -> [DVec3; 3] {
  let [a, b, c] = TRIANGLES[nr];
  [VERTICES[a], VERTICES[b], VERTICES[c]]
}

/// Point on triangle `nr` for tile coordinates `u, v ∈ [0, 1]`.
///
/// `v` is the tile row: 0 on the vertex 1 - vertex 2 edge, 1 at the apex.
/// Uploads flip rows, which turns this into the GPU layout above.
/// For `v < 1` the point is first interpolated along the base edge by
/// `(u - v/2) / (1 - v)`, then toward the apex by `v`.
pub fn triangle_texture_pos(nr: usize, u: f64, v: f64) -> DVec3 {
  let [apex, left, right] = triangle_vertices(nr);
  let base = if v < 1.0 {
    left.lerp(right, (u - v * 0.5) / (1.0 - v))
  } else {
    left
  };
  base.lerp(apex, v)
}

/// Symmetric perspective frustum of the camera, with 90° vertical field of
/// view and the horizontal extent scaled by the aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
  /// Viewport `height / width`.
  pub aspect: f64,
}

impl Default for Frustum {
  fn default() -> Self {
    Self { aspect: 1.0 }
  }
}

impl Frustum {
  pub fn new(aspect: f64) -> Self {
    Self { aspect }
  }

  /// Frustum for a viewport in pixels. Degenerate sizes fall back to square.
  pub fn from_viewport(width: u32, height: u32) -> Self {
    if width == 0 || height == 0 {
      return Self::default();
    }
    Self::new(height as f64 / width as f64)
  }

  /// True when the camera-space point lies in front of the camera and inside
  /// the view pyramid.
  #[inline]
  pub fn contains(&self, v: DVec3) -> bool {
    let z = v.z;
    if z <= 0.0 {
      return false;
    }
    let x = v.x * self.aspect;
    (-z..=z).contains(&x) && (-z..=z).contains(&v.y)
  }

  /// How many corners (0-3) of triangle `nr`, translated by `offset` and then
  /// rotated by `rotation`, are inside the frustum.
  pub fn triangle_visible(&self, nr: usize, offset: DVec3, rotation: &DMat3) -> u8 {
    triangle_vertices(nr)
      .iter()
      .filter(|v| self.contains(*rotation * (offset + **v)))
      .count() as u8
  }
}

/// Flat `xyz` positions for all 60 corners, for the GPU position buffer.
pub fn vertex_positions() -> Vec<f32> {
  (0..TRIANGLE_COUNT)
    .flat_map(triangle_vertices)
    .flat_map(|v| [v.x as f32, v.y as f32, v.z as f32])
    .collect()
}

/// Flat `uv` coordinates for all 60 corners, for the GPU texture buffer.
pub fn texture_coords() -> Vec<f32> {
  (0..TRIANGLE_COUNT)
    .flat_map(|_| TRIANGLE_UVS)
    .flatten()
    .collect()
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;
