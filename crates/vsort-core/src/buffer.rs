#![forbid(unsafe_code)]

//! Integer buffers and the array state that owns them.
//!
//! Every buffer holds a permutation of `1..=len`. The only mutations are
//! swaps and in-place reassignments, so the permutation invariant survives
//! any sequence of sorts and shuffles.

use std::fmt;
use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Which of the two buffers a run targets (the active-buffer flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferKind {
    /// The full-size buffer.
    #[default]
    Primary,
    /// The miniature buffer used by the slow algorithms.
    Mini,
}

impl BufferKind {
    /// Lowercase identifier used in config files and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Mini => "mini",
        }
    }

    #[must_use]
    pub const fn is_mini(self) -> bool {
        matches!(self, Self::Mini)
    }
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BufferKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "full" => Ok(Self::Primary),
            "mini" | "miniature" => Ok(Self::Mini),
            other => Err(format!("unknown buffer kind: {other}")),
        }
    }
}

/// Assign `values[i] = i + 1` for every index.
pub fn fill(values: &mut [i32]) {
    for (i, slot) in values.iter_mut().enumerate() {
        *slot = i as i32 + 1;
    }
}

/// Swap every index with a uniformly chosen index over the whole range.
///
/// This is the naive shuffle (the range never shrinks), so the resulting
/// permutations are not uniformly distributed. It is kept as is.
pub fn shuffle<R: Rng + ?Sized>(values: &mut [i32], rng: &mut R) {
    let len = values.len();
    if len == 0 {
        return;
    }
    for i in 0..len {
        let r = rng.random_range(0..len);
        values.swap(i, r);
    }
}

/// True iff `values[i] >= values[i - 1]` for every `i > 0`.
#[must_use]
pub fn is_sorted(values: &[i32]) -> bool {
    values.windows(2).all(|w| w[1] >= w[0])
}

/// True iff `values` holds exactly the integers `1..=values.len()`.
#[must_use]
pub fn is_permutation(values: &[i32]) -> bool {
    let len = values.len();
    let mut seen = vec![false; len];
    for &v in values {
        if v < 1 || v as usize > len {
            return false;
        }
        let slot = &mut seen[v as usize - 1];
        if *slot {
            return false;
        }
        *slot = true;
    }
    true
}

/// A fixed-length buffer holding a permutation of `1..=len`.
#[derive(Clone, PartialEq, Eq)]
pub struct SortBuffer {
    values: Vec<i32>,
}

impl SortBuffer {
    /// Create a filled (sorted) buffer of `len` elements.
    #[must_use]
    pub fn new(len: usize) -> Self {
        let mut values = vec![0; len];
        fill(&mut values);
        Self { values }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }

    /// Mutable access for sorters. Callers must only swap or reassign.
    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.values
    }

    pub fn fill(&mut self) {
        fill(&mut self.values);
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        shuffle(&mut self.values, rng);
    }

    #[must_use]
    pub fn is_sorted(&self) -> bool {
        is_sorted(&self.values)
    }
}

impl fmt::Debug for SortBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 8;
        let head = &self.values[..self.values.len().min(PREVIEW)];
        f.debug_struct("SortBuffer")
            .field("len", &self.values.len())
            .field("head", &head)
            .field("sorted", &self.is_sorted())
            .finish()
    }
}

/// Owns the primary and miniature buffers plus the shuffle RNG.
#[derive(Debug)]
pub struct ArrayState {
    primary: SortBuffer,
    mini: SortBuffer,
    rng: SmallRng,
}

impl ArrayState {
    /// Create both buffers filled with `1..=len`.
    ///
    /// A `seed` makes every later shuffle reproducible; without one the RNG
    /// is seeded from the operating system.
    #[must_use]
    pub fn new(primary_len: usize, mini_len: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self {
            primary: SortBuffer::new(primary_len),
            mini: SortBuffer::new(mini_len),
            rng,
        }
    }

    #[must_use]
    pub fn get(&self, kind: BufferKind) -> &SortBuffer {
        match kind {
            BufferKind::Primary => &self.primary,
            BufferKind::Mini => &self.mini,
        }
    }

    pub fn get_mut(&mut self, kind: BufferKind) -> &mut SortBuffer {
        match kind {
            BufferKind::Primary => &mut self.primary,
            BufferKind::Mini => &mut self.mini,
        }
    }

    /// Refill both buffers with `1..=len`.
    pub fn fill_all(&mut self) {
        self.mini.fill();
        self.primary.fill();
    }

    /// Shuffle both buffers, miniature first.
    pub fn shuffle_all(&mut self) {
        self.mini.shuffle(&mut self.rng);
        self.primary.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_assigns_index_plus_one() {
        let mut values = vec![0; 5];
        fill(&mut values);
        assert_eq!(values, [1, 2, 3, 4, 5]);
        assert!(is_sorted(&values));
    }

    #[test]
    fn fill_then_shuffle_is_usually_unsorted() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut values = vec![0; 1000];
        fill(&mut values);
        shuffle(&mut values, &mut rng);
        assert!(!is_sorted(&values));
        assert!(is_permutation(&values));
    }

    #[test]
    fn shuffle_is_reproducible_with_same_seed() {
        let mut a = SortBuffer::new(64);
        let mut b = SortBuffer::new(64);
        a.shuffle(&mut SmallRng::seed_from_u64(99));
        b.shuffle(&mut SmallRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_handles_empty_and_single() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut empty: Vec<i32> = Vec::new();
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut one = vec![1];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, [1]);
    }

    #[test]
    fn is_sorted_accepts_trivial_inputs() {
        assert!(is_sorted(&[]));
        assert!(is_sorted(&[42]));
        assert!(is_sorted(&[1, 1, 2]));
        assert!(!is_sorted(&[2, 1]));
    }

    #[test]
    fn is_permutation_rejects_duplicates_and_out_of_range() {
        assert!(is_permutation(&[3, 1, 2]));
        assert!(!is_permutation(&[1, 1, 3]));
        assert!(!is_permutation(&[0, 1, 2]));
        assert!(!is_permutation(&[1, 2, 4]));
        assert!(is_permutation(&[]));
    }

    #[test]
    fn array_state_shuffles_both_buffers() {
        let mut state = ArrayState::new(500, 100, Some(3));
        state.shuffle_all();
        assert!(!state.get(BufferKind::Primary).is_sorted());
        assert!(!state.get(BufferKind::Mini).is_sorted());
        assert!(is_permutation(state.get(BufferKind::Primary).as_slice()));
        assert!(is_permutation(state.get(BufferKind::Mini).as_slice()));

        state.fill_all();
        assert!(state.get(BufferKind::Primary).is_sorted());
        assert!(state.get(BufferKind::Mini).is_sorted());
    }

    #[test]
    fn buffer_kind_parses_aliases() {
        assert_eq!("full".parse::<BufferKind>(), Ok(BufferKind::Primary));
        assert_eq!(" Mini ".parse::<BufferKind>(), Ok(BufferKind::Mini));
        assert!("huge".parse::<BufferKind>().is_err());
        assert_eq!(BufferKind::Mini.to_string(), "mini");
    }

    #[test]
    fn debug_output_is_truncated() {
        let buf = SortBuffer::new(100);
        let text = format!("{buf:?}");
        assert!(text.contains("len: 100"));
        assert!(text.contains("sorted: true"));
    }
}
