//! Incremental texture baking.
//!
//! A bake paints one node's [`TextureTile`] by ray-marching every texel's
//! direction from the camera position. The work is sliced: each
//! [`Baker::advance`] call marches at most [`BakeBudget::texels_per_step`]
//! rays so the host loop stays responsive.
//!
//! # Lifecycle
//!
//! ```text
//! start(job) ──▶ advance ──▶ advance ──▶ ... ──▶ Complete(output)
//!                  │
//!                  └── cancel: job and accumulators are dropped
//! ```
//!
//! At most one job exists at a time. Nothing partial is ever committed: the
//! tile and the flags leave the baker together in [`BakeOutput`].

mod budget;
mod job;
mod tile;

pub use budget::BakeBudget;
pub use job::{BakeError, BakeInfo, BakeJob, BakeOutput, BakeProgress};
pub use tile::TextureTile;

use crate::formula::Membership;

/// Outcome of one [`Baker::advance`].
#[derive(Debug)]
pub enum BakeStep {
  /// No job is active.
  Idle,
  /// The slice ran; the job continues next time. Carries texels marched.
  InProgress(usize),
  /// The job finished in this slice and left the baker.
  Complete(BakeOutput, usize),
}

/// Owner of the single in-flight [`BakeJob`].
#[derive(Debug, Default)]
pub struct Baker {
  job: Option<BakeJob>,
  budget: BakeBudget,
}

impl Baker {
  pub fn new(budget: BakeBudget) -> Self {
    Self { job: None, budget }
  }

  #[inline]
  pub fn budget(&self) -> BakeBudget {
    self.budget
  }

  pub fn set_budget(&mut self, budget: BakeBudget) {
    self.budget = budget;
  }

  /// Begin `job`, returning any job it displaced.
  pub fn start(&mut self, job: BakeJob) -> Option<BakeJob> {
    tracing::debug!(
      node = %job.id(),
      texture_size = job.texture_size(),
      "bake started"
    );
    self.job.replace(job)
  }

  /// Drop the active job without committing anything.
  pub fn cancel(&mut self) -> Option<BakeJob> {
    self.job.take()
  }

  #[inline]
  pub fn active(&self) -> Option<&BakeJob> {
    self.job.as_ref()
  }

  #[inline]
  pub fn is_idle(&self) -> bool {
    self.job.is_none()
  }

  /// Run one slice of the active job against `formula`.
  pub fn advance<M: Membership + ?Sized>(&mut self, formula: &M) -> BakeStep {
    let Some(job) = self.job.as_mut() else {
      return BakeStep::Idle;
    };

    let before = job.texels_marched();
    let progress = job.step(formula, &self.budget);
    let marched = job.texels_marched() - before;

    if progress == BakeProgress::InProgress {
      return BakeStep::InProgress(marched);
    }

    match self.job.take().map(BakeJob::finish) {
      Some(Ok(output)) => BakeStep::Complete(output, marched),
      // A job that reported completion always finishes.
      Some(Err(_)) | None => BakeStep::Idle,
    }
  }
}

#[cfg(test)]
#[path = "baker_test.rs"]
mod baker_test;
