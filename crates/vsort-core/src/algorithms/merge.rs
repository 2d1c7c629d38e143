use super::{Progress, SortAlgorithm, SortStats, Sorter};

/// Pending work on the explicit recursion stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    /// Sort `[low, high]`.
    Split { low: usize, high: usize },
    /// Merge the sorted halves `[low, mid]` and `[mid + 1, high]`.
    Merge { low: usize, mid: usize, high: usize },
}

/// Top-down merge sort; one snapshot per completed merge.
///
/// The recursion runs on an explicit stack so the sort can pause after each
/// merge. Tasks are pushed so that they pop in the same post-order as the
/// recursive formulation: left half, right half, then the merge.
#[derive(Debug)]
pub struct MergeSorter {
    stack: Vec<Task>,
    /// Full-length scratch, indexed by absolute position.
    scratch: Vec<i32>,
    stats: SortStats,
}

impl MergeSorter {
    /// Sorter for a whole buffer of `len` elements.
    #[must_use]
    pub fn new(len: usize) -> Self {
        match len {
            0 => Self::with_stack(0, Vec::new()),
            _ => Self::for_range(len, 0, len - 1),
        }
    }

    /// Sorter restricted to `[low, high]` of a buffer of `len` elements.
    pub(crate) fn for_range(len: usize, low: usize, high: usize) -> Self {
        debug_assert!(high < len || len == 0);
        Self::with_stack(len, vec![Task::Split { low, high }])
    }

    fn with_stack(len: usize, stack: Vec<Task>) -> Self {
        Self {
            stack,
            scratch: vec![0; len],
            stats: SortStats::default(),
        }
    }

    fn merge(&mut self, data: &mut [i32], low: usize, mid: usize, high: usize) {
        self.scratch[low..=high].copy_from_slice(&data[low..=high]);

        let mut left = low;
        let mut right = mid + 1;
        let mut current = low;

        while left <= mid && right <= high {
            self.stats.comparisons += 1;
            if self.scratch[left] <= self.scratch[right] {
                data[current] = self.scratch[left];
                left += 1;
            } else {
                data[current] = self.scratch[right];
                right += 1;
            }
            current += 1;
            self.stats.swaps += 1;
        }

        // Leftover right-half values are already in place.
        let remaining = mid + 1 - left;
        data[current..current + remaining].copy_from_slice(&self.scratch[left..=mid]);
        self.stats.swaps += remaining as u64;
    }
}

impl Sorter for MergeSorter {
    fn algorithm(&self) -> SortAlgorithm {
        SortAlgorithm::Merge
    }

    fn advance(&mut self, data: &mut [i32]) -> Progress {
        debug_assert_eq!(data.len(), self.scratch.len());
        while let Some(task) = self.stack.pop() {
            match task {
                Task::Split { low, high } => {
                    if low < high {
                        let mid = low + (high - low) / 2;
                        self.stack.push(Task::Merge { low, mid, high });
                        self.stack.push(Task::Split { low: mid + 1, high });
                        self.stack.push(Task::Split { low, high: mid });
                    }
                }
                Task::Merge { low, mid, high } => {
                    self.merge(data, low, mid, high);
                    self.stats.snapshots += 1;
                    return Progress::Snapshot;
                }
            }
        }
        Progress::Done
    }

    fn stats(&self) -> SortStats {
        self.stats
    }
}
