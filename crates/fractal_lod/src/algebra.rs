//! Immutable matrix value type used by the view controller.
//!
//! Vectors are column matrices (`n×1`). Every operation returns a new value;
//! the receiver is never modified. Operations fail instead of producing NaN
//! cells or mixing incompatible shapes - both indicate a bug in the caller.
//!
//! The hot paths (ray marching, frustum tests) work on `glam` types directly;
//! [`Matrix::to_dvec3`] and [`Matrix::to_dmat3`] hand values over to them.

use glam::{DMat3, DVec3};
use smallvec::SmallVec;
use thiserror::Error;

/// Inline storage covers everything up to 3×3 without allocating.
type Cells = SmallVec<[f64; 9]>;

/// Algebra faults. Programming-error class: never retried.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum AlgebraError {
  #[error("{op}: matrix cell is not a number")]
  NotANumber { op: &'static str },
  #[error("{op}: value is not finite")]
  NotFinite { op: &'static str },
  #[error("{op}: incompatible shapes {left:?} and {right:?}")]
  DimensionMismatch {
    op: &'static str,
    left: (usize, usize),
    right: (usize, usize),
  },
  #[error("cell ({row}, {col}) is outside a {height}x{width} matrix")]
  OutOfBounds {
    row: usize,
    col: usize,
    height: usize,
    width: usize,
  },
}

/// Row-major `height × width` matrix of finite-or-infinite, never-NaN cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
  height: usize,
  width: usize,
  cells: Cells,
}

impl Matrix {
  fn from_cells(
    op: &'static str,
    height: usize,
    width: usize,
    cells: Cells,
  ) -> Result<Self, AlgebraError> {
    if cells.iter().any(|c| c.is_nan()) {
      return Err(AlgebraError::NotANumber { op });
    }
    Ok(Self {
      height,
      width,
      cells,
    })
  }

  /// `height × width` matrix of zeros.
  pub fn zeros(height: usize, width: usize) -> Self {
    Self {
      height,
      width,
      cells: SmallVec::from_elem(0.0, height * width),
    }
  }

  /// `n × n` identity matrix.
  pub fn identity(n: usize) -> Self {
    let mut cells = SmallVec::from_elem(0.0, n * n);
    for i in 0..n {
      cells[i * n + i] = 1.0;
    }
    Self {
      height: n,
      width: n,
      cells,
    }
  }

  /// Column vector from a list of values.
  pub fn vector(values: &[f64]) -> Result<Self, AlgebraError> {
    Self::from_cells("vector", values.len(), 1, values.iter().copied().collect())
  }

  /// Column vector `(x, y, z)`.
  pub fn vector3(x: f64, y: f64, z: f64) -> Result<Self, AlgebraError> {
    Self::vector(&[x, y, z])
  }

  pub fn from_dvec3(v: DVec3) -> Result<Self, AlgebraError> {
    Self::vector3(v.x, v.y, v.z)
  }

  /// Rotation by `angle` radians in the plane orthogonal to `axis` (0, 1, 2).
  ///
  /// With `i1 = axis+1` and `i2 = axis+2` (mod 3) the cells are
  /// `(i1,i1)=cos`, `(i1,i2)=sin`, `(i2,i1)=-sin`, `(i2,i2)=cos`.
  pub fn rotation(angle: f64, axis: usize) -> Result<Self, AlgebraError> {
    let i1 = (axis + 1) % 3;
    let i2 = (axis + 2) % 3;
    let (sin, cos) = angle.sin_cos();
    Self::identity(3)
      .set_cell(i1, i1, cos)?
      .set_cell(i1, i2, sin)?
      .set_cell(i2, i1, -sin)?
      .set_cell(i2, i2, cos)
  }

  #[inline]
  pub fn height(&self) -> usize {
    self.height
  }

  #[inline]
  pub fn width(&self) -> usize {
    self.width
  }

  #[inline]
  pub fn shape(&self) -> (usize, usize) {
    (self.height, self.width)
  }

  /// True for column vectors (`n×1`).
  #[inline]
  pub fn is_vector(&self) -> bool {
    self.width == 1
  }

  /// Cell at `(row, col)`.
  ///
  /// # Panics
  /// When the cell is outside the matrix, like slice indexing.
  #[inline]
  pub fn cell(&self, row: usize, col: usize) -> f64 {
    assert!(row < self.height && col < self.width, "matrix cell out of range");
    self.cells[row * self.width + col]
  }

  /// Copy with one cell replaced.
  pub fn set_cell(&self, row: usize, col: usize, value: f64) -> Result<Self, AlgebraError> {
    if row >= self.height || col >= self.width {
      return Err(AlgebraError::OutOfBounds {
        row,
        col,
        height: self.height,
        width: self.width,
      });
    }
    if value.is_nan() {
      return Err(AlgebraError::NotANumber { op: "set_cell" });
    }
    let mut cells = self.cells.clone();
    cells[row * self.width + col] = value;
    Ok(Self {
      height: self.height,
      width: self.width,
      cells,
    })
  }

  fn zip_with(
    &self,
    op: &'static str,
    other: &Self,
    f: impl Fn(f64, f64) -> f64,
  ) -> Result<Self, AlgebraError> {
    if self.shape() != other.shape() {
      return Err(AlgebraError::DimensionMismatch {
        op,
        left: self.shape(),
        right: other.shape(),
      });
    }
    let cells = self
      .cells
      .iter()
      .zip(other.cells.iter())
      .map(|(a, b)| f(*a, *b))
      .collect();
    Self::from_cells(op, self.height, self.width, cells)
  }

  pub fn add(&self, other: &Self) -> Result<Self, AlgebraError> {
    self.zip_with("add", other, |a, b| a + b)
  }

  pub fn sub(&self, other: &Self) -> Result<Self, AlgebraError> {
    self.zip_with("sub", other, |a, b| a - b)
  }

  /// Multiply every cell by `factor`.
  pub fn scale(&self, factor: f64) -> Result<Self, AlgebraError> {
    if factor.is_nan() {
      return Err(AlgebraError::NotANumber { op: "scale" });
    }
    let cells = self.cells.iter().map(|c| c * factor).collect();
    Self::from_cells("scale", self.height, self.width, cells)
  }

  /// Matrix product `self · other` (a vector is an `n×1` matrix).
  pub fn multiply(&self, other: &Self) -> Result<Self, AlgebraError> {
    if self.width != other.height {
      return Err(AlgebraError::DimensionMismatch {
        op: "multiply",
        left: self.shape(),
        right: other.shape(),
      });
    }
    let mut cells = Cells::with_capacity(self.height * other.width);
    for row in 0..self.height {
      for col in 0..other.width {
        let sum = (0..self.width)
          .map(|i| self.cells[row * self.width + i] * other.cells[i * other.width + col])
          .sum();
        cells.push(sum);
      }
    }
    Self::from_cells("multiply", self.height, other.width, cells)
  }

  /// Euclidean length of a vector.
  pub fn norm(&self) -> Result<f64, AlgebraError> {
    if !self.is_vector() {
      return Err(AlgebraError::DimensionMismatch {
        op: "norm",
        left: self.shape(),
        right: (self.height, 1),
      });
    }
    Ok(self.cells.iter().map(|c| c * c).sum::<f64>().sqrt())
  }

  /// Euclidean distance between two vectors of equal length.
  pub fn distance(&self, other: &Self) -> Result<f64, AlgebraError> {
    if !self.is_vector() || !other.is_vector() || self.height != other.height {
      return Err(AlgebraError::DimensionMismatch {
        op: "distance",
        left: self.shape(),
        right: other.shape(),
      });
    }
    self.sub(other)?.norm()
  }

  pub fn to_dvec3(&self) -> Result<DVec3, AlgebraError> {
    if self.shape() != (3, 1) {
      return Err(AlgebraError::DimensionMismatch {
        op: "to_dvec3",
        left: self.shape(),
        right: (3, 1),
      });
    }
    Ok(DVec3::new(self.cells[0], self.cells[1], self.cells[2]))
  }

  pub fn to_dmat3(&self) -> Result<DMat3, AlgebraError> {
    if self.shape() != (3, 3) {
      return Err(AlgebraError::DimensionMismatch {
        op: "to_dmat3",
        left: self.shape(),
        right: (3, 3),
      });
    }
    // glam is column-major
    let col = |c: usize| DVec3::new(self.cell(0, c), self.cell(1, c), self.cell(2, c));
    Ok(DMat3::from_cols(col(0), col(1), col(2)))
  }
}

#[cfg(test)]
#[path = "algebra_test.rs"]
mod algebra_test;
