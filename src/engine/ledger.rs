use std::collections::BTreeMap;

/// Running length deltas keyed by original-buffer end position.
///
/// Each entry holds the total shift accumulated by every replacement ending
/// at or before its key, so translating a position only needs the nearest
/// entry at or below it. Lives for a single batch pass.
#[derive(Debug, Default)]
pub struct OffsetLedger {
    totals: BTreeMap<usize, isize>,
}

impl OffsetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cumulative delta in effect at `position` (0 before any entry).
    pub fn offset_at(&self, position: usize) -> isize {
        self.totals
            .range(..=position)
            .next_back()
            .map(|(_, total)| *total)
            .unwrap_or(0)
    }

    /// Fold `delta` into the running total at `end`. Repeated ends accumulate.
    pub fn record(&mut self, end: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let total = self.offset_at(end) + delta;
        self.totals.insert(end, total);
    }

    /// Translate an original-buffer position into current-buffer space.
    pub fn translate(&self, position: usize) -> usize {
        position.saturating_add_signed(self.offset_at(position))
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}
