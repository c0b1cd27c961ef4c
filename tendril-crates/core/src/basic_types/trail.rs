use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::tendril_assert_simple;

/// An undo log of entries of type `T`, split into checkpoints.
///
/// Besides the entries, every checkpoint receives a stamp which is unique for the lifetime of the
/// trail; a stamp is never handed out twice, even when the same checkpoint level is reached again
/// in another branch. Owners of mutable cells use [`Trail::current_stamp`] to only push an entry
/// the first time a cell changes within a checkpoint.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_checkpoint: usize,
    /// At index i is the position where the i-th checkpoint ends (exclusive) on the trail
    trail_delimiter: Vec<usize>,
    /// At index i is the stamp of checkpoint i; index 0 is the root.
    stamps: Vec<u64>,
    next_stamp: u64,
    trail: Vec<T>,
}

// Implemented by hand to avoid imposing `Default` on `T`.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_checkpoint: 0,
            trail_delimiter: Vec::new(),
            stamps: vec![0],
            next_stamp: 1,
            trail: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.current_checkpoint += 1;
        self.trail_delimiter.push(self.trail.len());
        self.stamps.push(self.next_stamp);
        self.next_stamp += 1;
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    /// The stamp of the current checkpoint.
    pub(crate) fn current_stamp(&self) -> u64 {
        self.stamps[self.current_checkpoint]
    }

    pub(crate) fn values_at_checkpoint(&self, checkpoint: usize) -> &[T] {
        tendril_assert_simple!(checkpoint <= self.current_checkpoint);

        let start = if checkpoint == 0 {
            0
        } else {
            self.trail_delimiter[checkpoint - 1]
        };

        let end = if checkpoint == self.current_checkpoint {
            self.trail.len()
        } else {
            self.trail_delimiter[checkpoint]
        };

        &self.trail[start..end]
    }

    /// Removes every entry pushed after `new_checkpoint` was created, most recent first.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> Rev<Drain<'_, T>> {
        tendril_assert_simple!(new_checkpoint < self.current_checkpoint);

        let new_trail_len = self.trail_delimiter[new_checkpoint];

        self.current_checkpoint = new_checkpoint;
        self.trail_delimiter.truncate(new_checkpoint);
        self.stamps.truncate(new_checkpoint + 1);
        self.trail.drain(new_trail_len..).rev()
    }

    pub(crate) fn push(&mut self, elem: T) {
        self.trail.push(elem)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.trail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_values_are_observed_through_indexing() {
        let mut trail = Trail::default();

        let expected = [1, 2, 3, 4];
        for &elem in expected.iter() {
            trail.push(elem);
        }

        assert_eq!(&expected, trail.deref());
    }

    #[test]
    fn backtracking_removes_elements_beyond_checkpoint() {
        let mut trail = Trail::default();

        trail.new_checkpoint();
        trail.push(1);
        let _ = trail.synchronise(0);

        assert!(trail.is_empty());
    }

    #[test]
    fn backtracking_can_skip_several_checkpoints() {
        let mut trail = Trail::default();
        trail.push(1);

        trail.new_checkpoint();
        trail.push(2);
        trail.new_checkpoint();
        trail.push(3);
        trail.new_checkpoint();
        trail.push(4);

        let _ = trail.synchronise(1);

        assert_eq!(&[1, 2], trail.deref());
        assert_eq!(1, trail.get_checkpoint());
    }

    #[test]
    fn popped_elements_are_given_in_reverse_order_when_backtracking() {
        let mut trail = Trail::default();
        trail.push(1);

        trail.new_checkpoint();
        trail.push(2);
        trail.new_checkpoint();
        trail.push(3);
        trail.new_checkpoint();
        trail.push(4);

        let popped = trail.synchronise(0).collect::<Vec<_>>();
        assert_eq!(vec![4, 3, 2], popped);
    }

    #[test]
    fn elements_at_current_checkpoint() {
        let mut trail = Trail::default();
        trail.push(1);
        trail.push(2);

        trail.new_checkpoint();
        trail.push(3);
        trail.new_checkpoint();
        trail.push(4);
        trail.push(5);

        assert_eq!(&[1, 2], trail.values_at_checkpoint(0));
        assert_eq!(&[3], trail.values_at_checkpoint(1));
        assert_eq!(&[4, 5], trail.values_at_checkpoint(2));
    }

    #[test]
    fn stamps_are_not_reused_after_backtracking() {
        let mut trail: Trail<u32> = Trail::default();
        let root = trail.current_stamp();

        trail.new_checkpoint();
        let first_branch = trail.current_stamp();
        let _ = trail.synchronise(0);
        assert_eq!(root, trail.current_stamp());

        trail.new_checkpoint();
        let second_branch = trail.current_stamp();

        assert_ne!(root, first_branch);
        assert_ne!(first_branch, second_branch);
    }

    #[test]
    fn the_stamp_of_a_checkpoint_is_restored_when_returning_to_it() {
        let mut trail: Trail<u32> = Trail::default();

        trail.new_checkpoint();
        let level_one = trail.current_stamp();
        trail.new_checkpoint();
        trail.new_checkpoint();

        let _ = trail.synchronise(1);

        assert_eq!(level_one, trail.current_stamp());
    }
}
