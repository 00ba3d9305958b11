//! Rolling 2-bit k-mer hashing.
//!
//! A word of length W hashes to its base-4 encoding (`value = value*4 +
//! code`, two bits per base), computed with a rolling update that keeps only
//! the low `2*W` bits. Any window touching an ambiguous or unknown base
//! produces the sentinel `-1` and hashing restarts just past the offending
//! character, so downstream consumers can skip bad regions in O(1) per
//! position.

use crate::alphabet::AlphabetTable;
use crate::error::{Error, Result};

pub const MIN_WORD_LEN: usize = 1;
pub const MAX_WORD_LEN: usize = 8;

/// Sentinel for positions without a valid hash value.
pub const NO_HASH: i32 = -1;

/// Number of distinct hash values for a word length (`4^word_len`).
#[inline(always)]
pub fn table_size(word_len: usize) -> usize {
    1usize << (2 * word_len)
}

/// Hash every window of `word_len` characters of `seq`.
///
/// The output has one entry per sequence position; positions past
/// `len - word_len` and positions whose window contains a non-ACGT character
/// hold [`NO_HASH`]. Fails if the sequence is shorter than the word.
pub fn hash_sequence(seq: &[u8], word_len: usize, table: &AlphabetTable) -> Result<Vec<i32>> {
    debug_assert!((MIN_WORD_LEN..=MAX_WORD_LEN).contains(&word_len));
    if seq.len() < word_len {
        return Err(Error::SequenceTooShort {
            len: seq.len(),
            required: word_len,
        });
    }

    let mask = (table_size(word_len) - 1) as u32;
    let mut values = vec![NO_HASH; seq.len()];
    let mut word: u32 = 0;
    let mut valid_bases = 0usize;

    for (pos, &byte) in seq.iter().enumerate() {
        let code = table.code(byte);
        if code > 3 {
            // hash-breaker: restart the window past this character
            valid_bases = 0;
            word = 0;
            continue;
        }
        word = ((word << 2) | code as u32) & mask;
        valid_bases += 1;
        if valid_bases >= word_len {
            values[pos + 1 - word_len] = word as i32;
        }
    }

    Ok(values)
}
