//! Bake statistics for the hierarchy manager.
//!
//! Feature-gated and runtime-toggled: with the `metrics` feature off every
//! `record_*` call is a no-op.
//!
//! # Usage
//!
//! ```ignore
//! use fractal_lod::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let metrics = manager.metrics();
//! println!("{} tiles, {:.0} µs/slice", metrics.tiles_committed, metrics.avg_slice_us());
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// True when metrics are compiled in and switched on.
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Fixed-capacity window of the most recent values.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a value, evicting the oldest at capacity.
  pub fn push(&mut self, value: T) {
    if self.capacity == 0 {
      return;
    }
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Oldest to newest.
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl RollingWindow<u64> {
  pub fn sum(&self) -> u64 {
    self.buffer.iter().sum()
  }

  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = *self.buffer.iter().min()?;
    let max = *self.buffer.iter().max()?;
    Some((min, max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128) // ~2 seconds of slices at 60 fps
  }
}

/// Counters and timings of the bake pipeline.
#[derive(Debug, Clone, Default)]
pub struct BakeMetrics {
  /// Wall time of recent bake slices, in microseconds.
  pub slice_timings: RollingWindow<u64>,
  /// Rays marched since start.
  pub texels_marched: u64,
  pub tiles_committed: u64,
  /// Approximate bytes held by committed tiles.
  pub tile_memory_bytes: u64,
  pub generations_appended: u64,
  pub generations_pruned: u64,
  pub resets: u64,
}

impl BakeMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record one bake slice.
  pub fn record_slice(&mut self, timing_us: u64, texels: usize) {
    if is_enabled() {
      self.slice_timings.push(timing_us);
      self.texels_marched += texels as u64;
    }
  }

  pub fn record_commit(&mut self, tile_bytes: usize) {
    if is_enabled() {
      self.tiles_committed += 1;
      self.tile_memory_bytes += tile_bytes as u64;
    }
  }

  /// Tiles released by a prune or reset.
  pub fn release_tiles(&mut self, tile_bytes: usize) {
    if is_enabled() {
      self.tile_memory_bytes = self.tile_memory_bytes.saturating_sub(tile_bytes as u64);
    }
  }

  pub fn record_append(&mut self) {
    if is_enabled() {
      self.generations_appended += 1;
    }
  }

  pub fn record_prune(&mut self) {
    if is_enabled() {
      self.generations_pruned += 1;
    }
  }

  pub fn record_reset(&mut self) {
    if is_enabled() {
      self.resets += 1;
      self.slice_timings.clear();
      self.tile_memory_bytes = 0;
    }
  }

  pub fn avg_slice_us(&self) -> f64 {
    self.slice_timings.average()
  }

  pub fn tile_memory_mb(&self) -> f64 {
    self.tile_memory_bytes as f64 / 1_048_576.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rolling_window() {
    let mut window = RollingWindow::new(3);
    assert!(window.is_empty());
    assert_eq!(window.min_max(), None);

    window.push(10u64);
    window.push(20);
    window.push(30);
    assert_eq!(window.sum(), 60);
    assert_eq!(window.average(), 20.0);

    // Oldest is evicted
    window.push(40);
    assert_eq!(window.len(), 3);
    assert_eq!(window.sum(), 90);
    assert_eq!(window.min_max(), Some((20, 40)));
    assert_eq!(window.last(), Some(&40));
  }

  #[cfg(feature = "metrics")]
  #[test]
  fn test_bake_metrics() {
    let mut metrics = BakeMetrics::new();
    metrics.record_slice(100, 100);
    metrics.record_slice(300, 71);
    metrics.record_commit(768);
    metrics.record_append();
    assert_eq!(metrics.texels_marched, 171);
    assert_eq!(metrics.avg_slice_us(), 200.0);
    assert_eq!(metrics.tiles_committed, 1);
    assert_eq!(metrics.generations_appended, 1);

    metrics.release_tiles(1000);
    assert_eq!(metrics.tile_memory_bytes, 0);
  }

  #[cfg(not(feature = "metrics"))]
  #[test]
  fn test_disabled_metrics_record_nothing() {
    let mut metrics = BakeMetrics::new();
    metrics.record_slice(100, 100);
    metrics.record_commit(768);
    assert!(metrics.slice_timings.is_empty());
    assert_eq!(metrics.tiles_committed, 0);
  }
}
