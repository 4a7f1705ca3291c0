//! Navigation token: the persisted `formula;x;y;z[;v]` location string.
//!
//! The trailing `v` marks tokens the controller wrote itself. Those only echo
//! the current state back and must not reset anything; any other token is a
//! jump requested from outside (a bookmark, a menu link, an edited URL).

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use thiserror::Error;

use crate::constants::START_POSITION;
use crate::formula::{FormulaError, FractalFormula};

/// Who wrote a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
  /// Written by the view controller (`;v` suffix).
  Internal,
  /// Anything else.
  External,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
  #[error("expected at least 4 fields, found {0}")]
  TooFewFields(usize),
  #[error(transparent)]
  Formula(#[from] FormulaError),
  #[error("coordinate {index} is not a finite number: {value:?}")]
  InvalidCoordinate { index: usize, value: String },
}

/// A formula plus a camera position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavigationToken {
  pub formula: FractalFormula,
  pub position: DVec3,
  pub origin: Origin,
}

impl NavigationToken {
  /// External token starting `formula` at the default camera position.
  pub fn start(formula: FractalFormula) -> Self {
    Self {
      formula,
      position: START_POSITION,
      origin: Origin::External,
    }
  }

  #[inline]
  pub fn is_internal(&self) -> bool {
    self.origin == Origin::Internal
  }
}

impl FromStr for NavigationToken {
  type Err = TokenError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.strip_prefix('#').unwrap_or(s);
    let fields: Vec<&str> = s.split(';').collect();
    if fields.len() < 4 {
      return Err(TokenError::TooFewFields(fields.len()));
    }

    let formula: FractalFormula = fields[0].parse()?;
    let coordinate = |index: usize| -> Result<f64, TokenError> {
      let value = fields[index];
      value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TokenError::InvalidCoordinate {
          index,
          value: value.to_string(),
        })
    };
    let position = DVec3::new(coordinate(1)?, coordinate(2)?, coordinate(3)?);

    let origin = match fields.get(4) {
      Some(&"v") => Origin::Internal,
      _ => Origin::External,
    };

    Ok(Self {
      formula,
      position,
      origin,
    })
  }
}

impl fmt::Display for NavigationToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let p = self.position;
    write!(f, "{};{};{};{}", self.formula.name(), p.x, p.y, p.z)?;
    if self.is_internal() {
      f.write_str(";v")?;
    }
    Ok(())
  }
}

impl FractalFormula {
  /// `(title, token)` pairs for a formula menu, e.g.
  /// `("Mandelbulb", "mandelbulb;0;0;-1.1")`.
  pub fn menu_entries() -> Vec<(String, String)> {
    Self::registry()
      .into_iter()
      .map(|(name, formula)| {
        let mut title = name.to_string();
        if let Some(first) = title.get_mut(0..1) {
          first.make_ascii_uppercase();
        }
        (title, NavigationToken::start(formula).to_string())
      })
      .collect()
  }
}

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;
