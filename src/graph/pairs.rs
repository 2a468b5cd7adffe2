//! Enumeration of unordered node pairs

use itertools::structs::TupleCombinations;
use itertools::Itertools;
use std::ops::Range;

/// Number of unordered pairs of distinct nodes among `n`
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Lazy sequence of every index pair `(i, j)` with `i < j < n`, in
/// lexicographic order
pub struct PairEnumerator {
    inner: TupleCombinations<Range<usize>, (usize, usize)>,
    remaining: usize,
}

impl PairEnumerator {
    pub fn new(n: usize) -> Self {
        Self {
            inner: (0..n).tuple_combinations(),
            remaining: pair_count(n),
        }
    }
}

impl Iterator for PairEnumerator {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.inner.next()?;
        self.remaining -= 1;
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for PairEnumerator {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_small_inputs_have_no_pairs() {
        assert_eq!(PairEnumerator::new(0).count(), 0);
        assert_eq!(PairEnumerator::new(1).count(), 0);
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
    }

    #[test]
    fn test_pairs_are_lexicographic() {
        let pairs: Vec<_> = PairEnumerator::new(4).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_every_pair_exactly_once() {
        let n = 25;
        let pairs: Vec<_> = PairEnumerator::new(n).collect();
        assert_eq!(pairs.len(), n * (n - 1) / 2);

        let unique: HashSet<_> = pairs.iter().copied().collect();
        assert_eq!(unique.len(), pairs.len());
        assert!(pairs.iter().all(|&(i, j)| i < j && j < n));
    }

    #[test]
    fn test_len_tracks_consumption() {
        let mut pairs = PairEnumerator::new(5);
        assert_eq!(pairs.len(), 10);
        pairs.next();
        pairs.next();
        assert_eq!(pairs.len(), 8);
    }
}
