use super::{Progress, SortAlgorithm, SortStats, Sorter};

/// Selection sort; one snapshot per completed position.
#[derive(Debug, Default)]
pub struct SelectionSorter {
    position: usize,
    stats: SortStats,
}

impl SelectionSorter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sorter for SelectionSorter {
    fn algorithm(&self) -> SortAlgorithm {
        SortAlgorithm::Selection
    }

    fn advance(&mut self, data: &mut [i32]) -> Progress {
        let i = self.position;
        if i >= data.len() {
            return Progress::Done;
        }

        let mut min_index = i;
        for j in i + 1..data.len() {
            if data[j] < data[min_index] {
                min_index = j;
            }
        }
        self.stats.comparisons += (data.len() - i - 1) as u64;

        if min_index != i {
            data.swap(i, min_index);
            self.stats.swaps += 1;
        }

        self.position += 1;
        self.stats.snapshots += 1;
        Progress::Snapshot
    }

    fn stats(&self) -> SortStats {
        self.stats
    }
}
