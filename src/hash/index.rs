//! Last-occurrence chain index over a hashed sequence.
//!
//! For each hash value the index records the most recent position emitting
//! it (`last_word`) and how many positions did (`word_count`). The chain
//! array is the hash-value array mutated in place: once a value repeats, the
//! repeating position's slot is overwritten with the previous occurrence, so
//! walking from `last_word[v]` for `word_count[v]` steps enumerates every
//! occurrence exactly once, most recent first. The first occurrence's slot
//! still holds the raw hash value; the step count is what terminates a walk.

use crate::hash::kmer::{table_size, NO_HASH};

pub struct HashIndex {
    word_len: usize,
    last_word: Vec<i32>,
    word_count: Vec<u32>,
    chain: Vec<i32>,
}

impl HashIndex {
    /// Build the index in a single left-to-right pass, consuming the hash
    /// array produced by [`crate::hash::hash_sequence`].
    pub fn build(mut hash_values: Vec<i32>, word_len: usize) -> Self {
        let size = table_size(word_len);
        let mut last_word = vec![NO_HASH; size];
        let mut word_count = vec![0u32; size];

        for pos in 0..hash_values.len() {
            let value = hash_values[pos];
            if value < 0 {
                continue;
            }
            let value = value as usize;
            if word_count[value] > 0 {
                hash_values[pos] = last_word[value];
            }
            last_word[value] = pos as i32;
            word_count[value] += 1;
        }

        HashIndex {
            word_len,
            last_word,
            word_count,
            chain: hash_values,
        }
    }

    pub fn word_len(&self) -> usize {
        self.word_len
    }

    /// Length of the indexed sequence.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Occurrence count for a hash value. Sentinel values count zero.
    #[inline(always)]
    pub fn count(&self, value: i32) -> u32 {
        if value < 0 {
            0
        } else {
            self.word_count[value as usize]
        }
    }

    /// Iterate the occurrence positions of a hash value, most recent first.
    #[inline]
    pub fn occurrences(&self, value: i32) -> OccurrenceIter<'_> {
        let (head, remaining) = if value < 0 {
            (NO_HASH, 0)
        } else {
            (self.last_word[value as usize], self.word_count[value as usize])
        };
        OccurrenceIter {
            chain: &self.chain,
            next: head,
            remaining,
        }
    }
}

pub struct OccurrenceIter<'a> {
    chain: &'a [i32],
    next: i32,
    remaining: u32,
}

impl Iterator for OccurrenceIter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let pos = self.next as usize;
        self.remaining -= 1;
        // the final slot holds a stale hash value, never followed
        if self.remaining > 0 {
            self.next = self.chain[pos];
        }
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}
