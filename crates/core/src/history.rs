use crate::stimulus::Stimulus;

/// Append-only record of every stimulus shown in the current session.
///
/// Index `i` is always the `i`-th stimulus presented. Entries are never
/// reordered or pruned; only a session reset clears the ledger.
#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    entries: Vec<Stimulus>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(128),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Stimulus> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stimulus> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Stimulus] {
        &self.entries
    }

    /// The stimulus on screen: the most recent entry.
    pub fn latest(&self) -> Option<&Stimulus> {
        self.entries.last()
    }

    pub fn push(&mut self, stimulus: Stimulus) {
        self.entries.push(stimulus);
    }

    /// `history[len - n]`: the reference for a stimulus that is about to be
    /// appended. Requires `len >= n`.
    pub fn lag_reference(&self, n: usize) -> Option<&Stimulus> {
        if n == 0 || self.entries.len() < n {
            return None;
        }
        self.entries.get(self.entries.len() - n)
    }

    /// `history[len - n - 1]`: the reference for the stimulus currently on
    /// screen. Requires `len >= n + 1`.
    pub fn response_reference(&self, n: usize) -> Option<&Stimulus> {
        let len = self.entries.len();
        if len < n + 1 {
            return None;
        }
        self.entries.get(len - n - 1)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::DETERMINISTIC_CYCLE;

    fn ledger_of(k: usize) -> HistoryLedger {
        let mut h = HistoryLedger::new();
        for i in 0..k {
            h.push(DETERMINISTIC_CYCLE[i % DETERMINISTIC_CYCLE.len()]);
        }
        h
    }

    #[test]
    fn lag_reference_needs_n_entries() {
        let h = ledger_of(1);
        assert!(h.lag_reference(2).is_none());

        let h = ledger_of(2);
        assert_eq!(h.lag_reference(2), Some(&DETERMINISTIC_CYCLE[0]));

        let h = ledger_of(5);
        assert_eq!(h.lag_reference(2), Some(&DETERMINISTIC_CYCLE[3]));
    }

    #[test]
    fn response_reference_is_one_further_back() {
        let h = ledger_of(2);
        assert!(h.response_reference(2).is_none());

        let h = ledger_of(3);
        assert_eq!(h.response_reference(2), Some(&DETERMINISTIC_CYCLE[0]));
        assert_eq!(h.latest(), Some(&DETERMINISTIC_CYCLE[2]));

        let h = ledger_of(5);
        assert_eq!(h.response_reference(2), Some(&DETERMINISTIC_CYCLE[2]));
        assert_eq!(h.lag_reference(2), Some(&DETERMINISTIC_CYCLE[3]));
    }

    #[test]
    fn zero_lag_has_no_lag_reference() {
        let h = ledger_of(3);
        assert!(h.lag_reference(0).is_none());
        assert_eq!(h.response_reference(0), Some(&DETERMINISTIC_CYCLE[2]));
    }

    #[test]
    fn entries_keep_their_index() {
        let mut h = ledger_of(4);
        let before: Vec<Stimulus> = h.iter().copied().collect();
        h.push(DETERMINISTIC_CYCLE[5]);
        assert_eq!(h.len(), 5);
        assert_eq!(&h.as_slice()[..4], before.as_slice());
    }
}
