use super::{Progress, SortAlgorithm, SortStats, Sorter};

/// Insertion sort; one snapshot per adjacent swap.
#[derive(Debug, Default)]
pub struct InsertionSorter {
    /// First index not yet merged into the sorted prefix.
    next: usize,
    /// Current position of the element being moved left.
    cursor: usize,
    stats: SortStats,
}

impl InsertionSorter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sorter for InsertionSorter {
    fn algorithm(&self) -> SortAlgorithm {
        SortAlgorithm::Insertion
    }

    fn advance(&mut self, data: &mut [i32]) -> Progress {
        loop {
            if self.next >= data.len() {
                return Progress::Done;
            }

            let j = self.cursor;
            if j > 0 {
                self.stats.comparisons += 1;
                if data[j] < data[j - 1] {
                    data.swap(j, j - 1);
                    self.cursor = j - 1;
                    self.stats.swaps += 1;
                    self.stats.snapshots += 1;
                    return Progress::Snapshot;
                }
            }

            self.next += 1;
            self.cursor = self.next;
        }
    }

    fn stats(&self) -> SortStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_element_example_emits_one_snapshot_per_swap() {
        let mut data = [5, 3, 4, 1, 2];
        let mut sorter = InsertionSorter::new();
        let mut frames = 0;
        while sorter.advance(&mut data) == Progress::Snapshot {
            frames += 1;
        }
        assert_eq!(data, [1, 2, 3, 4, 5]);
        // One swap per inversion of the input.
        assert_eq!(frames, 8);
        assert_eq!(sorter.stats().swaps, 8);
    }

    #[test]
    fn first_frames_show_the_prefix_growing() {
        let mut data = [3, 1, 2];
        let mut sorter = InsertionSorter::new();
        let mut frames = Vec::new();
        while sorter.advance(&mut data) == Progress::Snapshot {
            frames.push(data);
        }
        assert_eq!(frames, [[1, 3, 2], [1, 2, 3]]);
    }

    #[test]
    fn sorted_input_performs_no_swaps() {
        let mut data = [1, 2, 3, 4];
        let mut sorter = InsertionSorter::new();
        assert_eq!(sorter.advance(&mut data), Progress::Done);
        assert_eq!(sorter.stats().swaps, 0);
        assert_eq!(sorter.stats().comparisons, 3);
    }
}
