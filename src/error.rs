//! Engine error kinds.
//!
//! Core functions report failures synchronously to the immediate caller;
//! batch drivers catch per-record errors and continue with the next record.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Input shorter than the word length or minimum match length.
    #[error("sequence too short: {len} residues, need at least {required}")]
    SequenceTooShort { len: usize, required: usize },

    /// The traceback matrix for a `len1 x len2` alignment could not be
    /// allocated. Quadratic in the input lengths, so worth surfacing
    /// instead of aborting the process.
    #[error("failed to allocate {bytes} bytes for the traceback matrix")]
    AllocationFailure { bytes: usize },

    /// Scan completed but nothing met the cutoff. A normal "no result"
    /// outcome, not a fatal condition.
    #[error("no diagonal or alignment met the cutoff")]
    NoSignificantMatch,

    /// Zero-width or out-of-range scoring region requested from the aligner.
    #[error("zero-width or out-of-range scoring region")]
    InvalidRegion,

    /// Bounded match collection overflowed its cap.
    #[error("match list truncated at {cap} entries")]
    TooManyMatches { cap: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
