//! Texture tile: the RGB8 pixel buffer of one baked node.

/// Square RGB8 image, `size × size` texels, row-major.
///
/// Row `y` holds the texels at `v = y / size` of the triangle layout, so
/// row 0 is the base edge and the last row the apex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureTile {
  size: u32,
  pixels: Vec<u8>,
}

impl TextureTile {
  /// All-black tile. Black is the "no surface" color.
  pub fn new(size: u32) -> Self {
    Self {
      size,
      pixels: vec![0; (size as usize) * (size as usize) * 3],
    }
  }

  #[inline]
  pub fn size(&self) -> u32 {
    self.size
  }

  #[inline]
  fn offset(&self, x: u32, y: u32) -> usize {
    ((y as usize) * (self.size as usize) + x as usize) * 3
  }

  /// Color at `(x, y)`.
  ///
  /// # Panics
  /// When the texel is outside the tile.
  pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
    assert!(x < self.size && y < self.size, "texel out of range");
    let i = self.offset(x, y);
    [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
  }

  /// Paint one texel. Out-of-range texels are ignored.
  pub(crate) fn put(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
    if x >= self.size || y >= self.size {
      return;
    }
    let i = self.offset(x, y);
    self.pixels[i..i + 3].copy_from_slice(&rgb);
  }

  /// Raw RGB bytes, row-major.
  pub fn as_raw(&self) -> &[u8] {
    &self.pixels
  }

  /// Consume into the raw RGB bytes (e.g. for `image::RgbImage::from_raw`).
  pub fn into_raw(self) -> Vec<u8> {
    self.pixels
  }

  /// Number of texels that are not black.
  pub fn painted_texels(&self) -> usize {
    self.pixels.chunks_exact(3).filter(|p| p != &[0, 0, 0]).count()
  }

  /// Approximate memory held by the pixel buffer.
  pub fn memory_bytes(&self) -> usize {
    self.pixels.len()
  }
}
