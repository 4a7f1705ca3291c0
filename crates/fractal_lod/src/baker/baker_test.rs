use glam::DVec3;

use super::*;
use crate::formula::FractalFormula;
use crate::hierarchy::NodeId;

const BALL: FractalFormula = FractalFormula::Sphere { radius: 0.5 };

fn buried_job(nr: usize) -> BakeJob {
  BakeJob::new(NodeId::new(1, nr), DVec3::ZERO, 0.35, 0.7, 16)
}

#[test]
fn test_idle_baker_does_nothing() {
  let mut baker = Baker::default();
  assert!(baker.is_idle());
  assert!(matches!(baker.advance(&BALL), BakeStep::Idle));
}

#[test]
fn test_advance_until_complete() {
  let mut baker = Baker::new(BakeBudget::DEFAULT);
  assert!(baker.start(buried_job(4)).is_none());

  let mut total = 0;
  let output = loop {
    match baker.advance(&BALL) {
      BakeStep::InProgress(marched) => {
        assert!(marched <= 100);
        total += marched;
      }
      BakeStep::Complete(output, marched) => {
        total += marched;
        break output;
      }
      BakeStep::Idle => panic!("job vanished"),
    }
  };
  assert_eq!(total, 171);
  assert_eq!(output.info.id, NodeId::new(1, 4));
  assert!(baker.is_idle(), "completed job leaves the baker");
}

#[test]
fn test_start_displaces_previous_job() {
  let mut baker = Baker::default();
  baker.start(buried_job(1));
  let displaced = baker.start(buried_job(2));
  assert_eq!(displaced.map(|j| j.id()), Some(NodeId::new(1, 1)));
  assert_eq!(baker.active().map(BakeJob::id), Some(NodeId::new(1, 2)));
}

/// Cancel drops partial work; nothing is produced afterwards.
#[test]
fn test_cancel_discards_partial_job() {
  let mut baker = Baker::new(BakeBudget { texels_per_step: 10 });
  baker.start(buried_job(0));
  assert!(matches!(baker.advance(&BALL), BakeStep::InProgress(10)));
  let cancelled = baker.cancel();
  assert!(cancelled.is_some_and(|j| !j.is_complete()));
  assert!(matches!(baker.advance(&BALL), BakeStep::Idle));
}

#[test]
fn test_tile_pixels() {
  let mut tile = TextureTile::new(4);
  assert_eq!(tile.as_raw().len(), 48);
  tile.put(1, 2, [1, 2, 3]);
  tile.put(9, 9, [9, 9, 9]);
  assert_eq!(tile.pixel(1, 2), [1, 2, 3]);
  assert_eq!(tile.painted_texels(), 1);
  assert_eq!(&tile.clone().into_raw()[(2 * 4 + 1) * 3..][..3], &[1, 2, 3]);
}
