//! K-mer hashing and the last-occurrence chain index.

pub mod index;
pub mod kmer;

pub use index::{HashIndex, OccurrenceIter};
pub use kmer::{hash_sequence, table_size, MAX_WORD_LEN, MIN_WORD_LEN};
