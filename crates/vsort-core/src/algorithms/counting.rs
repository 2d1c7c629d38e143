use super::{Progress, SortAlgorithm, SortStats, Sorter};

/// Rank-based in-place "counting sort".
///
/// For each position, count the elements strictly smaller than the value
/// there. A mismatch moves the value to its rank and restarts the scan from
/// position 0. Every swap fixes one value in its final slot, so the sort
/// terminates on any buffer of distinct values, after O(n^3) comparisons in
/// the worst case.
#[derive(Debug, Default)]
pub struct CountingSorter {
    position: usize,
    stats: SortStats,
}

impl CountingSorter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the outer scan resumes from.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

impl Sorter for CountingSorter {
    fn algorithm(&self) -> SortAlgorithm {
        SortAlgorithm::Counting
    }

    fn advance(&mut self, data: &mut [i32]) -> Progress {
        while self.position < data.len() {
            let i = self.position;
            let value = data[i];
            let rank = data.iter().filter(|&&other| other < value).count();
            self.stats.comparisons += data.len() as u64;

            if rank != i {
                data.swap(i, rank);
                self.position = 0;
                self.stats.swaps += 1;
                self.stats.restarts += 1;
                self.stats.snapshots += 1;
                return Progress::Snapshot;
            }
            self.position += 1;
        }
        Progress::Done
    }

    fn stats(&self) -> SortStats {
        self.stats
    }
}
