use crate::containers::StorageKey;

/// A handle to an integer which is restored automatically on backtracking.
///
/// Propagators use these for internal counters that have to follow the search; they are
/// allocated in [`PropagatorConstructorContext::new_trailed_integer`].
///
/// [`PropagatorConstructorContext::new_trailed_integer`]:
/// crate::propagation::PropagatorConstructorContext::new_trailed_integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrailedInteger {
    id: u32,
}

impl StorageKey for TrailedInteger {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}
