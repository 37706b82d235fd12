use crate::store::StoreKind;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounters {
    /// Bytes written to the store's blob so far
    pub offset: u64,
    /// Records accepted into the store so far, equal to its index length
    pub records: u64,
}

/// Counters owned by a single export run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunState {
    pub records_seen: u64,
    pub batches: u64,
    /// Progress marker of the most recently drained batch
    pub last_progress: Option<u64>,
    pub unified: StoreCounters,
    pub small: StoreCounters,
    pub large: StoreCounters,
}

impl RunState {
    pub fn counters(&self, store: StoreKind) -> StoreCounters {
        match store {
            StoreKind::Unified => self.unified,
            StoreKind::Small => self.small,
            StoreKind::Large => self.large,
        }
    }

    fn counters_mut(&mut self, store: StoreKind) -> &mut StoreCounters {
        match store {
            StoreKind::Unified => &mut self.unified,
            StoreKind::Small => &mut self.small,
            StoreKind::Large => &mut self.large,
        }
    }

    pub fn observe_record(&mut self) {
        self.records_seen += 1;
    }

    pub fn finish_batch(&mut self, progress: u64) {
        self.batches += 1;
        self.last_progress = Some(progress);
    }

    /// Account for `len` bytes accepted into `store`, returning the new cumulative offset
    pub fn advance(&mut self, store: StoreKind, len: u64) -> u64 {
        let counters = self.counters_mut(store);
        counters.offset += len;
        counters.records += 1;
        counters.offset
    }

    pub fn budget_reached(&self, budget: Option<u64>) -> bool {
        budget.is_some_and(|budget| self.records_seen >= budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_advances_only_the_named_store() {
        let mut state = RunState::default();

        assert_eq!(2, state.advance(StoreKind::Unified, 2));
        assert_eq!(14, state.advance(StoreKind::Unified, 12));
        assert_eq!(12, state.advance(StoreKind::Large, 12));

        assert_eq!(
            StoreCounters {
                offset: 14,
                records: 2
            },
            state.counters(StoreKind::Unified)
        );
        assert_eq!(StoreCounters::default(), state.counters(StoreKind::Small));
        assert_eq!(1, state.counters(StoreKind::Large).records);
    }

    #[test]
    fn zero_length_records_still_count() {
        let mut state = RunState::default();

        assert_eq!(0, state.advance(StoreKind::Small, 0));
        assert_eq!(1, state.small.records);
    }

    #[test]
    fn budget_is_inclusive_and_optional() {
        let mut state = RunState::default();
        for _ in 0..5 {
            state.observe_record();
        }

        assert!(state.budget_reached(Some(5)));
        assert!(state.budget_reached(Some(0)));
        assert!(!state.budget_reached(Some(6)));
        assert!(!state.budget_reached(None));
    }
}
