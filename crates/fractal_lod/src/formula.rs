//! Fractal membership predicates.
//!
//! Every formula answers one question: is the point `p` inside the fractal?
//! All formulas are scaled to fit the canonical unit sphere the ray marcher
//! works in. The predicates are pure and total (bounded iteration).

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use thiserror::Error;

/// Inside/outside test over 3-D points.
///
/// Implemented by [`FractalFormula`] and by any `Fn(DVec3) -> bool`, so tests
/// and benches can march against ad-hoc shapes.
pub trait Membership {
  fn contains(&self, p: DVec3) -> bool;
}

impl<F: Fn(DVec3) -> bool> Membership for F {
  #[inline]
  fn contains(&self, p: DVec3) -> bool {
    self(p)
  }
}

/// Name lookup failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
  #[error("unknown fractal formula: {0:?}")]
  Unknown(String),
}

/// Closed set of supported fractals, each carrying only its parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FractalFormula {
  /// Power-`p` Mandelbulb in spherical coordinates.
  Mandelbulb {
    /// Space scale applied before iterating.
    zoom: f64,
    power: i32,
    iterations: u32,
    /// Early escape radius checked every iteration.
    bailout: f64,
    /// Final inside test radius after all iterations.
    escape_radius: f64,
  },
  /// Box-fold / sphere-fold Mandelbox.
  Mandelbox {
    zoom: f64,
    scale: f64,
    iterations: u32,
    fold_limit: f64,
    min_radius_sq: f64,
    fixed_radius_sq: f64,
    /// Inside iff `|z| * escape_factor < dr`.
    escape_factor: f64,
  },
  /// Solid ball around the origin. Debugging shape, not in the named registry.
  Sphere { radius: f64 },
}

impl FractalFormula {
  pub const MANDELBULB: Self = Self::Mandelbulb {
    zoom: 1.3,
    power: 8,
    iterations: 1000,
    bailout: 1.3,
    escape_radius: 2.0,
  };

  pub const MANDELBOX: Self = Self::Mandelbox {
    zoom: 11.0,
    scale: 2.0,
    iterations: 100,
    fold_limit: 1.0,
    min_radius_sq: 0.25,
    fixed_radius_sq: 1.0,
    escape_factor: 100.0,
  };

  /// Named formulas offered to the user, in menu order.
  pub fn registry() -> [(&'static str, FractalFormula); 2] {
    [("mandelbulb", Self::MANDELBULB), ("mandelbox", Self::MANDELBOX)]
  }

  /// Look up a registry formula by name.
  pub fn by_name(name: &str) -> Option<Self> {
    Self::registry()
      .into_iter()
      .find(|(n, _)| *n == name)
      .map(|(_, f)| f)
  }

  /// True for formulas reachable through [`FractalFormula::by_name`].
  pub fn is_registered(&self) -> bool {
    Self::by_name(self.name()) == Some(*self)
  }

  /// Registry name (`"sphere"` for the debugging shape).
  pub fn name(&self) -> &'static str {
    match self {
      Self::Mandelbulb { .. } => "mandelbulb",
      Self::Mandelbox { .. } => "mandelbox",
      Self::Sphere { .. } => "sphere",
    }
  }
}

impl Membership for FractalFormula {
  fn contains(&self, p: DVec3) -> bool {
    match *self {
      Self::Mandelbulb {
        zoom,
        power,
        iterations,
        bailout,
        escape_radius,
      } => mandelbulb(p * zoom, power, iterations, bailout, escape_radius),
      Self::Mandelbox {
        zoom,
        scale,
        iterations,
        fold_limit,
        min_radius_sq,
        fixed_radius_sq,
        escape_factor,
      } => {
        let c = p * zoom;
        let mut z = c;
        let mut dr = 1.0;
        let min_scale = fixed_radius_sq / min_radius_sq;
        for _ in 0..iterations {
          z = box_fold(z, fold_limit);
          let r2 = z.length_squared();
          if r2 < min_radius_sq {
            z *= min_scale;
          } else if r2 < fixed_radius_sq {
            z *= fixed_radius_sq / r2;
          }
          z = z * scale + c;
          dr *= scale;
        }
        z.length() * escape_factor < dr
      }
      Self::Sphere { radius } => p.length_squared() <= radius * radius,
    }
  }
}

fn mandelbulb(c: DVec3, power: i32, iterations: u32, bailout: f64, escape_radius: f64) -> bool {
  let p = power as f64;
  let mut z = c;
  for _ in 0..iterations {
    let r = z.length();
    if r > bailout {
      return false;
    }
    // At r == 0 theta is NaN and the orbit stays NaN: the final test fails.
    let phi = p * z.z.atan2(z.x);
    let theta = p * (z.y / r).acos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    let rp = r.powi(power);
    z = DVec3::new(
      rp * sin_theta * phi.cos(),
      rp * cos_theta,
      rp * sin_theta * phi.sin(),
    ) + c;
  }
  z.length() < escape_radius
}

#[inline]
fn box_fold(z: DVec3, limit: f64) -> DVec3 {
  let fold = |v: f64| {
    if v > limit {
      2.0 * limit - v
    } else if v < -limit {
      -2.0 * limit - v
    } else {
      v
    }
  };
  DVec3::new(fold(z.x), fold(z.y), fold(z.z))
}

impl FromStr for FractalFormula {
  type Err = FormulaError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::by_name(s).ok_or_else(|| FormulaError::Unknown(s.to_string()))
  }
}

impl fmt::Display for FractalFormula {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[cfg(test)]
#[path = "formula_test.rs"]
mod formula_test;
