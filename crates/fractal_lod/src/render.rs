//! Renderer facade over an external GPU collaborator.
//!
//! The crate never talks to a graphics API directly. The host implements
//! [`GpuDevice`] (WebGL, wgpu, a test double, ...) and the [`Renderer`] drives
//! it: one program, two static mesh buffers, one texture per committed node.
//!
//! Each node is drawn as a single icosahedron triangle in units of its inner
//! radius, positioned relative to the camera:
//!
//! ```text
//! p        = rot · (xyz + pos)          pos = (center − camera) / radius_inner
//! clip     = (p.x · ratio, p.y, p.z, p.z)
//! fragment = texel, discarded when pure black
//! ```

use std::collections::HashMap;

use thiserror::Error;

use crate::baker::TextureTile;
use crate::camera::Camera;
use crate::constants::SKY_COLOR;
use crate::hierarchy::{LodNode, NodeId};
use crate::mesh::{texture_coords, vertex_positions};

/// Vertex stage: places one node's triangle around the camera.
pub const VERTEX_SHADER: &str = "\
precision mediump float;
uniform float ratio;
attribute vec3 xyz;
attribute vec2 uv;
uniform vec3 pos;
uniform mat3 rot;
varying vec2 v_st;
void main() {
    v_st = uv;
    vec3 p = rot * (xyz + pos);
    gl_Position = vec4(p.x * ratio, p.y, p.z, p.z);
}
";

/// Fragment stage: black texels are holes.
pub const FRAGMENT_SHADER: &str = "\
precision mediump float;
varying vec2 v_st;
uniform sampler2D sampl;
void main() {
    vec4 c = texture2D(sampl, vec2(v_st.s, v_st.t));
    if (c.xyz == vec3(0.0)) discard;
    gl_FragColor = c;
}
";

/// Faults reported by the GPU collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GpuError {
  #[error("no GPU context available")]
  ContextUnavailable,
  #[error("shader compilation failed: {0}")]
  ShaderCompile(String),
  #[error("program link failed: {0}")]
  ProgramLink(String),
  #[error("no attribute or uniform named {0:?}")]
  MissingLocation(String),
  #[error("invalid buffer: {0}")]
  InvalidBuffer(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
  /// The collaborator cannot run the renderer at all.
  #[error("rendering unsupported: {0}")]
  Unsupported(#[source] GpuError),
  #[error("GPU failure while drawing: {0}")]
  Gpu(#[from] GpuError),
}

/// Uniform values the shaders take.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Uniform {
  Float(f32),
  Vec3([f32; 3]),
  /// Column-major 3×3.
  Mat3([f32; 9]),
}

/// Host-side graphics context.
pub trait GpuDevice {
  type Buffer;
  type Texture: GpuTexture;
  type Program: GpuProgram<Buffer = Self::Buffer, Texture = Self::Texture>;

  fn create_program(&mut self, vertex: &str, fragment: &str) -> Result<Self::Program, GpuError>;
  fn upload_buffer(&mut self, data: &[f32]) -> Result<Self::Buffer, GpuError>;
  fn create_texture(&mut self) -> Result<Self::Texture, GpuError>;
  fn clear(&mut self, rgb: [f32; 3]);
}

/// Linked shader program.
pub trait GpuProgram {
  type Buffer;
  type Texture;

  fn bind_attribute(
    &mut self,
    name: &str,
    buffer: &Self::Buffer,
    components: usize,
  ) -> Result<(), GpuError>;
  fn bind_uniform(&mut self, name: &str, value: Uniform) -> Result<(), GpuError>;
  /// Draw `count` vertices starting at `start` with `texture` bound.
  fn draw_triangles(&mut self, texture: &Self::Texture, start: usize, count: usize);
}

/// GPU-side copy of a [`TextureTile`].
///
/// Tiles arrive row 0 first; implementations flip rows so `v = 1` lands on
/// row 0 (`UNPACK_FLIP_Y_WEBGL` in WebGL).
pub trait GpuTexture {
  fn upload(&mut self, tile: &TextureTile) -> Result<(), GpuError>;
}

/// Draws the committed nodes of a hierarchy.
pub struct Renderer<G: GpuDevice> {
  device: G,
  program: G::Program,
  // Kept alive for the attribute bindings.
  _positions: G::Buffer,
  _uvs: G::Buffer,
  textures: HashMap<NodeId, G::Texture>,
  aspect: f64,
}

impl<G: GpuDevice> Renderer<G> {
  /// Compile the program and upload the mesh. `aspect` is `height / width`.
  pub fn new(mut device: G, aspect: f64) -> Result<Self, RenderError> {
    let setup = |device: &mut G| -> Result<_, GpuError> {
      let mut program = device.create_program(VERTEX_SHADER, FRAGMENT_SHADER)?;
      let positions = device.upload_buffer(&vertex_positions())?;
      let uvs = device.upload_buffer(&texture_coords())?;
      program.bind_attribute("xyz", &positions, 3)?;
      program.bind_attribute("uv", &uvs, 2)?;
      program.bind_uniform("ratio", Uniform::Float(aspect as f32))?;
      Ok((program, positions, uvs))
    };
    let (program, positions, uvs) = setup(&mut device).map_err(RenderError::Unsupported)?;

    Ok(Self {
      device,
      program,
      _positions: positions,
      _uvs: uvs,
      textures: HashMap::new(),
      aspect,
    })
  }

  #[inline]
  pub fn aspect(&self) -> f64 {
    self.aspect
  }

  pub fn device(&self) -> &G {
    &self.device
  }

  pub fn device_mut(&mut self) -> &mut G {
    &mut self.device
  }

  /// Update the `ratio` uniform after a viewport change.
  pub fn resize(&mut self, aspect: f64) -> Result<(), RenderError> {
    self.aspect = aspect;
    self.program.bind_uniform("ratio", Uniform::Float(aspect as f32))?;
    Ok(())
  }

  /// Send a freshly committed tile to the GPU, creating its texture on first
  /// use.
  pub fn upload(&mut self, id: NodeId, tile: &TextureTile) -> Result<(), RenderError> {
    let texture = match self.textures.entry(id) {
      std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
      std::collections::hash_map::Entry::Vacant(e) => e.insert(self.device.create_texture()?),
    };
    texture.upload(tile)?;
    Ok(())
  }

  /// Drop the texture of one node (committed empty).
  pub fn forget(&mut self, id: NodeId) {
    self.textures.remove(&id);
  }

  /// Drop the textures of a pruned generation.
  pub fn forget_generation(&mut self, generation: usize) {
    self.textures.retain(|id, _| id.generation != generation);
  }

  pub fn clear_textures(&mut self) {
    self.textures.clear();
  }

  pub fn texture_count(&self) -> usize {
    self.textures.len()
  }

  /// Clear to the sky color and draw every drawable node. Returns the number
  /// of nodes drawn.
  pub fn draw<'a>(
    &mut self,
    nodes: impl IntoIterator<Item = &'a LodNode>,
    camera: &Camera,
  ) -> Result<usize, RenderError> {
    self.device.clear(SKY_COLOR);
    let rot = camera.rotation.as_mat3().to_cols_array();

    let mut drawn = 0;
    for node in nodes {
      if node.empty || node.hidden {
        continue;
      }
      let offset = node.center - camera.position;
      if offset.length() > node.radius_inner * 0.5 {
        continue;
      }
      let Some(texture) = self.textures.get(&node.id) else {
        continue;
      };

      let pos = (offset / node.radius_inner).as_vec3().to_array();
      self.program.bind_uniform("pos", Uniform::Vec3(pos))?;
      self.program.bind_uniform("rot", Uniform::Mat3(rot))?;
      self.program.draw_triangles(texture, node.id.nr * 3, 3);
      drawn += 1;
    }
    Ok(drawn)
  }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;
