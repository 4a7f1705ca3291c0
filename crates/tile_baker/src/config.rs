//! Flight plan parsing for headless tile baking.

use anyhow::{Context, Result};
use glam::DVec3;
use serde::Deserialize;
use std::path::Path;

use fractal_lod::{BakeBudget, FractalFormula, HierarchyConfig};

/// Root configuration: which fractal to bake and the camera path to fly.
#[derive(Debug, Deserialize)]
pub struct Config {
	/// Registry name of the fractal ("mandelbulb", "mandelbox").
	pub formula: String,
	/// Output directory relative to the config file.
	pub output_dir: String,
	/// Viewport height / width used for visibility tests.
	#[serde(default = "default_aspect_ratio")]
	pub aspect_ratio: f64,
	/// Camera positions visited in order. The camera always looks at the origin.
	pub waypoints: Vec<[f64; 3]>,
	/// Hierarchy steps spent travelling to each waypoint.
	pub steps_per_waypoint: usize,
	/// Texels marched per step (default: 100).
	pub texels_per_step: Option<usize>,
	/// Largest tile resolution (default: 1024).
	pub max_texture_size: Option<u32>,
}

fn default_aspect_ratio() -> f64 {
	1.0
}

impl Config {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse and validate a TOML flight plan.
	pub fn parse(content: &str) -> Result<Self> {
		let config: Config =
			toml::from_str(content).with_context(|| "Failed to parse config TOML")?;

		config.formula()?;
		if config.waypoints.is_empty() {
			anyhow::bail!("Config must have at least one waypoint");
		}
		if let Some(p) = config.waypoints.iter().find(|p| DVec3::from_array(**p).length() > 2.0) {
			anyhow::bail!("Waypoint {:?} lies outside radius 2", p);
		}
		if config.steps_per_waypoint == 0 {
			anyhow::bail!("steps_per_waypoint must be positive");
		}
		if !(config.aspect_ratio.is_finite() && config.aspect_ratio > 0.0) {
			anyhow::bail!("aspect_ratio must be positive, got {}", config.aspect_ratio);
		}
		if let Some(size) = config.max_texture_size {
			if size < 16 || !size.is_power_of_two() {
				anyhow::bail!("max_texture_size must be a power of 2 >= 16, got {}", size);
			}
		}

		Ok(config)
	}

	pub fn formula(&self) -> Result<FractalFormula> {
		self.formula
			.parse::<FractalFormula>()
			.with_context(|| format!("Invalid formula in config: {}", self.formula))
	}

	/// Hierarchy settings with the plan's overrides applied.
	pub fn hierarchy(&self) -> HierarchyConfig {
		let defaults = HierarchyConfig::default();
		HierarchyConfig {
			bake_budget: BakeBudget {
				texels_per_step: self.texels_per_step.unwrap_or(defaults.bake_budget.texels_per_step),
			},
			max_texture_size: self.max_texture_size.unwrap_or(defaults.max_texture_size),
			..defaults
		}
	}

	pub fn waypoints(&self) -> impl Iterator<Item = DVec3> + '_ {
		self.waypoints.iter().map(|p| DVec3::from_array(*p))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const PLAN: &str = r#"
formula = "mandelbulb"
output_dir = "tiles"
waypoints = [[0.0, 0.0, -1.1], [0.0, 0.0, -0.9]]
steps_per_waypoint = 200
max_texture_size = 256
"#;

	#[test]
	fn test_parse_plan() {
		let config = Config::parse(PLAN).unwrap();
		assert_eq!(config.formula().unwrap(), FractalFormula::MANDELBULB);
		assert_eq!(config.aspect_ratio, 1.0);
		assert_eq!(config.waypoints().count(), 2);

		let hierarchy = config.hierarchy();
		assert_eq!(hierarchy.max_texture_size, 256);
		assert_eq!(hierarchy.bake_budget, BakeBudget::DEFAULT);
	}

	#[test]
	fn test_rejects_unknown_formula() {
		let plan = PLAN.replace("mandelbulb", "julia");
		assert!(Config::parse(&plan).is_err());
	}

	#[test]
	fn test_rejects_far_waypoint() {
		let plan = PLAN.replace("-0.9", "-2.5");
		assert!(Config::parse(&plan).is_err());
	}

	#[test]
	fn test_rejects_odd_texture_size() {
		let plan = PLAN.replace("256", "100");
		assert!(Config::parse(&plan).is_err());
	}
}
