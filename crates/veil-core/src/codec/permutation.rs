//! Key-driven permutation tables.
//!
//! A table is built with a Fisher-Yates style pass whose swap targets come
//! from a [`DigestStream`] instead of a system RNG, so the same `(size, key)`
//! always produces the same table. The codec never reads the table as a
//! mapping directly; it replays the swaps `i <-> table[i]` over pixel columns
//! or rows, in descending order to encode and ascending order to decode.

use super::digest::DigestStream;

/// Order in which the swap sequence `i <-> table[i]` is replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOrder {
    /// `i = len-1, ..., 0` (encode)
    Descending,
    /// `i = 0, ..., len-1` (decode, undoes `Descending`)
    Ascending,
}

/// A permutation of `0..len` derived from a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationTable {
    indices: Vec<usize>,
}

impl PermutationTable {
    /// Build the table for `size` elements from `key`.
    ///
    /// Step `i` swaps `table[i]` with `table[v % (size - i)]` where `v` is the
    /// next value of the digest stream over `SHA-256(key)`. The target is taken
    /// from `[0, size - i)`, not from the unfixed suffix; every step is still a
    /// swap, so the result is always a permutation. `size == 0` yields an
    /// empty table.
    pub fn build(size: usize, key: &str) -> Self {
        let mut stream = DigestStream::from_key(key);
        let mut indices: Vec<usize> = (0..size).collect();
        for i in 0..size {
            let remaining = (size - i) as u64;
            let target = (stream.next_value() % remaining) as usize;
            indices.swap(i, target);
        }
        Self { indices }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The raw index sequence.
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Consume the table and return its indices.
    pub fn into_vec(self) -> Vec<usize> {
        self.indices
    }

    /// Check that every index in `0..len` appears exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut seen = vec![false; self.indices.len()];
        for &idx in &self.indices {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    /// Replay the swap sequence `i <-> table[i]` in the given order.
    ///
    /// Self-swaps (`table[i] == i`) are skipped, so `swap` always receives two
    /// distinct positions.
    pub fn replay_swaps<F>(&self, order: SwapOrder, mut swap: F)
    where
        F: FnMut(usize, usize),
    {
        let mut step = |i: usize| {
            let target = self.indices[i];
            if target != i {
                swap(i, target);
            }
        };
        match order {
            SwapOrder::Descending => (0..self.indices.len()).rev().for_each(&mut step),
            SwapOrder::Ascending => (0..self.indices.len()).for_each(&mut step),
        }
    }

    /// Result of replaying the swaps over `[0, 1, ..., len-1]`.
    ///
    /// Entry `j` is the original position of the element that ends up at `j`,
    /// which lets a caller gather into a fresh buffer instead of swapping.
    pub fn arrangement(&self, order: SwapOrder) -> Vec<usize> {
        let mut positions: Vec<usize> = (0..self.indices.len()).collect();
        self.replay_swaps(order, |a, b| positions.swap(a, b));
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::digest::sha256_hex;

    #[test]
    fn test_build_known_tables() {
        assert_eq!(PermutationTable::build(5, "test").as_slice(), &[4, 2, 0, 1, 3]);
        assert_eq!(
            PermutationTable::build(10, "test").as_slice(),
            &[9, 8, 7, 1, 2, 3, 0, 5, 6, 4]
        );
        assert_eq!(
            PermutationTable::build(8, "hunter2").as_slice(),
            &[7, 1, 5, 4, 3, 0, 2, 6]
        );
        assert_eq!(
            PermutationTable::build(3, &sha256_hex("test")).as_slice(),
            &[0, 2, 1]
        );
    }

    #[test]
    fn test_empty_key_is_valid() {
        let table = PermutationTable::build(5, "");
        assert_eq!(table.as_slice(), &[4, 3, 2, 1, 0]);
        assert!(table.is_permutation());
    }

    #[test]
    fn test_deterministic() {
        let a = PermutationTable::build(257, "same key");
        let b = PermutationTable::build(257, "same key");
        assert_eq!(a, b);
    }

    #[test]
    fn test_always_a_permutation() {
        for size in 0..200 {
            for key in ["", "a", "test", "correct horse battery staple"] {
                let table = PermutationTable::build(size, key);
                assert_eq!(table.len(), size);
                assert!(table.is_permutation(), "size={size} key={key:?}");
            }
        }
    }

    #[test]
    fn test_size_zero_and_one() {
        assert!(PermutationTable::build(0, "test").is_empty());
        assert_eq!(PermutationTable::build(1, "anything").as_slice(), &[0]);
    }

    #[test]
    fn test_is_permutation_rejects_duplicates_and_out_of_range() {
        let dup = PermutationTable {
            indices: vec![0, 0, 2],
        };
        assert!(!dup.is_permutation());
        let oob = PermutationTable {
            indices: vec![0, 3, 1],
        };
        assert!(!oob.is_permutation());
    }

    #[test]
    fn test_replay_skips_self_swaps() {
        let table = PermutationTable {
            indices: vec![0, 2, 1, 3],
        };
        let mut calls = Vec::new();
        table.replay_swaps(SwapOrder::Descending, |a, b| calls.push((a, b)));
        assert_eq!(calls, vec![(2, 1), (1, 2)]);
    }

    #[test]
    fn test_ascending_undoes_descending() {
        for key in ["test", "k0", "hunter2", ""] {
            let table = PermutationTable::build(31, key);
            let forward = table.arrangement(SwapOrder::Descending);
            let mut restored: Vec<usize> = forward.clone();
            table.replay_swaps(SwapOrder::Ascending, |a, b| restored.swap(a, b));
            assert_eq!(restored, (0..31).collect::<Vec<_>>(), "key={key:?}");
        }
    }

    #[test]
    fn test_arrangement_known_values() {
        // Swaps 4<->3, 3<->1, 2<->0, 1<->2, 0<->4 over [0, 1, 2, 3, 4]
        let table = PermutationTable::build(5, "test");
        assert_eq!(table.arrangement(SwapOrder::Descending), vec![3, 0, 4, 1, 2]);
    }
}
