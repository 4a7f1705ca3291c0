//! Fixed constants shared by the marcher, the baker and the hierarchy.
//!
//! Tunable coefficients (priority weights, zoom thresholds) live in
//! [`HierarchyConfig`](crate::hierarchy::HierarchyConfig) instead.

use glam::DVec3;

/// Triangles of the base icosahedron; also the number of nodes per generation.
pub const TRIANGLE_COUNT: usize = 20;

/// First ray sample, as a fraction of the node's inner radius.
///
/// Lands the first sample just inside the canonical unit sphere every formula
/// is scaled into, so a hit there means the bake origin itself is buried.
pub const INITIAL_RAY_OFFSET: f64 = 0.7;

/// Squared radius of the canonical sphere the formulas live in.
pub const UNIT_SPHERE_RADIUS_SQ: f64 = 1.0;

/// Resolution used for a node's first bake.
pub const DEFAULT_TEXTURE_SIZE: u32 = 16;

/// Center given to nodes that have never been baked.
///
/// Far enough that every distance ratio saturates.
pub const PLACEHOLDER_CENTER: DVec3 = DVec3::new(1000.0, 0.0, 0.0);

/// Where the camera starts for a freshly selected formula.
pub const START_POSITION: DVec3 = DVec3::new(0.0, 0.0, -1.1);

/// Texel color for a ray that starts inside the fractal.
pub const INSIDE_COLOR: [u8; 3] = [127, 127, 127];

/// Framebuffer clear color.
pub const SKY_COLOR: [f32; 3] = [0.4, 0.5, 1.0];

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
