//! Headless tile baker.
//!
//! Flies a camera along the waypoints of a TOML flight plan, drives the LOD
//! hierarchy exactly like an interactive session would, and writes every
//! committed tile as a PNG:
//!
//! - `g{generation}_n{triangle}_{size}.png`, apex row on top
//!
//! Useful for inspecting bake output and for profiling the hierarchy without a
//! GPU. Set `RUST_LOG=debug` to follow every bake.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use glam::{DMat3, DVec3};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use config::Config;
use fractal_lod::{Camera, Frustum, HierarchyEvent, HierarchyManager, LodNode};

/// Headless tile baker for the fractal LOD hierarchy.
#[derive(Parser, Debug)]
#[command(name = "bake_tiles")]
#[command(about = "Flies a camera path and writes every baked tile as PNG")]
struct Args {
	/// Path to flight plan TOML file.
	#[arg(short, long)]
	config: PathBuf,

	/// Output directory (default: `output_dir` next to the config file).
	#[arg(short, long)]
	output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let args = Args::parse();
	tracing::info!(config = %args.config.display(), "loading flight plan");
	let config = Config::load(&args.config)?;

	let output_dir = args.output_dir.unwrap_or_else(|| {
		args.config
			.parent()
			.unwrap_or(Path::new("."))
			.join(&config.output_dir)
	});
	std::fs::create_dir_all(&output_dir)
		.with_context(|| format!("Failed to create output dir: {}", output_dir.display()))?;

	let formula = config.formula()?;
	let frustum = Frustum::new(config.aspect_ratio);
	let mut manager = HierarchyManager::new(formula, config.hierarchy());
	let mut written = 0usize;

	let waypoints: Vec<DVec3> = config.waypoints().collect();
	let mut from = waypoints[0];
	for (leg, &to) in waypoints.iter().enumerate() {
		tracing::info!(leg, target = ?to, "flying");
		for step in 0..config.steps_per_waypoint {
			let t = (step + 1) as f64 / config.steps_per_waypoint as f64;
			let camera = look_at_origin(from.lerp(to, t));
			manager.step(&camera, &frustum);

			let events: Vec<HierarchyEvent> = manager.drain_events().collect();
			for event in events {
				if let HierarchyEvent::Committed(id) = event {
					if let Some(node) = manager.node(id) {
						written += write_tile(node, &output_dir)?;
					}
				}
			}
		}
		from = to;
	}

	let metrics = manager.metrics();
	tracing::info!(
		tiles_written = written,
		tiles_committed = metrics.tiles_committed,
		generations = manager.generation_count(),
		appended = metrics.generations_appended,
		pruned = metrics.generations_pruned,
		texels = metrics.texels_marched,
		avg_slice_us = metrics.avg_slice_us(),
		"done"
	);
	println!("\nDone! {} tiles written to: {}", written, output_dir.display());

	Ok(())
}

/// Camera at `position` looking at the origin.
fn look_at_origin(position: DVec3) -> Camera {
	let forward = (-position).try_normalize().unwrap_or(DVec3::Z);
	let up_hint = if forward.y.abs() > 0.99 { DVec3::Z } else { DVec3::Y };
	let right = up_hint.cross(forward).normalize();
	let up = forward.cross(right);
	// Rows map world offsets into camera space.
	Camera::new(position, DMat3::from_cols(right, up, forward).transpose())
}

/// Write a committed node's tile. Returns the number of files written.
fn write_tile(node: &LodNode, output_dir: &Path) -> Result<usize> {
	let Some(tile) = node.tile.as_ref() else {
		return Ok(0);
	};
	let size = tile.size();
	let image = image::RgbImage::from_raw(size, size, tile.as_raw().to_vec())
		.context("Tile buffer does not match its size")?;
	let image = image::imageops::flip_vertical(&image);

	let path = output_dir.join(format!(
		"g{:02}_n{:02}_{}.png",
		node.id.generation, node.id.nr, size
	));
	image
		.save(&path)
		.with_context(|| format!("Failed to write: {}", path.display()))?;
	tracing::debug!(path = %path.display(), "tile written");
	Ok(1)
}
