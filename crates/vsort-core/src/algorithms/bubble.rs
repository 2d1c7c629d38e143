use super::{Progress, SortAlgorithm, SortStats, Sorter};
use crate::buffer::is_sorted;

/// Bubble sort; one snapshot per full pass.
#[derive(Debug, Default)]
pub struct BubbleSorter {
    stats: SortStats,
}

impl BubbleSorter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sorter for BubbleSorter {
    fn algorithm(&self) -> SortAlgorithm {
        SortAlgorithm::Bubble
    }

    fn advance(&mut self, data: &mut [i32]) -> Progress {
        self.stats.comparisons += data.len().saturating_sub(1) as u64;
        if is_sorted(data) {
            return Progress::Done;
        }

        for i in 0..data.len() - 1 {
            if data[i] > data[i + 1] {
                data.swap(i, i + 1);
                self.stats.swaps += 1;
            }
        }
        self.stats.comparisons += (data.len() - 1) as u64;
        self.stats.snapshots += 1;
        Progress::Snapshot
    }

    fn stats(&self) -> SortStats {
        self.stats
    }
}
