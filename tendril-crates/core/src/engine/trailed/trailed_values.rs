use super::TrailedInteger;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TrailedChange {
    old_value: i64,
    old_stamp: u64,
    reference: TrailedInteger,
}

#[derive(Debug, Clone, Copy)]
struct StampedValue {
    value: i64,
    stamp: u64,
}

/// Integers which are restored on backtracking. Only the first write to an integer within a
/// checkpoint is recorded on the trail.
#[derive(Default, Debug, Clone)]
pub(crate) struct TrailedValues {
    trail: Trail<TrailedChange>,
    values: KeyedVec<TrailedInteger, StampedValue>,
}

impl TrailedValues {
    pub(crate) fn grow(&mut self, initial_value: i64) -> TrailedInteger {
        self.values.push(StampedValue {
            value: initial_value,
            stamp: 0,
        })
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint()
    }

    pub(crate) fn num_trail_entries(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.values[trailed_integer].value
    }

    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        for change in self.trail.synchronise(new_checkpoint) {
            self.values[change.reference] = StampedValue {
                value: change.old_value,
                stamp: change.old_stamp,
            };
        }
    }

    pub(crate) fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let stamp = self.trail.current_stamp();
        let cell = &mut self.values[trailed_integer];
        if cell.value == value {
            return;
        }

        if cell.stamp != stamp {
            self.trail.push(TrailedChange {
                old_value: cell.value,
                old_stamp: cell.stamp,
                reference: trailed_integer,
            });
            cell.stamp = stamp;
        }
        cell.value = value;
    }

    pub(crate) fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.assign(trailed_integer, self.read(trailed_integer) + addition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_resets() {
        let mut trailed_values = TrailedValues::default();
        let trailed_integer = trailed_values.grow(0);

        assert_eq!(trailed_values.read(trailed_integer), 0);

        trailed_values.new_checkpoint();
        trailed_values.add_assign(trailed_integer, 5);

        assert_eq!(trailed_values.read(trailed_integer), 5);

        trailed_values.add_assign(trailed_integer, 5);
        assert_eq!(trailed_values.read(trailed_integer), 10);

        trailed_values.new_checkpoint();
        trailed_values.add_assign(trailed_integer, 1);

        assert_eq!(trailed_values.read(trailed_integer), 11);

        trailed_values.synchronise(1);
        assert_eq!(trailed_values.read(trailed_integer), 10);

        trailed_values.synchronise(0);
        assert_eq!(trailed_values.read(trailed_integer), 0);
    }

    #[test]
    fn only_the_first_write_of_a_checkpoint_is_trailed() {
        let mut trailed_values = TrailedValues::default();
        let trailed_integer = trailed_values.grow(3);

        trailed_values.new_checkpoint();
        for value in 4..10 {
            trailed_values.assign(trailed_integer, value);
        }

        assert_eq!(trailed_values.num_trail_entries(), 1);
    }

    #[test]
    fn writes_at_the_root_are_not_trailed() {
        let mut trailed_values = TrailedValues::default();
        let trailed_integer = trailed_values.grow(0);

        trailed_values.assign(trailed_integer, 2);

        assert_eq!(trailed_values.num_trail_entries(), 0);
        assert_eq!(trailed_values.read(trailed_integer), 2);
    }
}
