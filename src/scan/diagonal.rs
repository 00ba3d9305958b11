//! The diagonal scanner.
//!
//! For each query position whose word is present in the subject index, the
//! scanner walks the occurrence chain and extends an exact match along the
//! shared diagonal. A per-diagonal cover array records how far along the
//! query each diagonal has already been matched; an extension only starts
//! where the cover has not reached, so a run is never re-extended from a
//! later starting point inside it. Covers only ever advance within one scan.
//!
//! A second, cheaper pass accumulates raw word-hit counts per diagonal into
//! a histogram; the significance model turns those counts into
//! length-normalized scores.

use crate::alphabet::AlphabetTable;
use crate::hash::HashIndex;
use crate::stats::{ScoreThresholds, Significance};

/// An exact diagonal run of `len` agreeing characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub subject_pos: usize,
    pub query_pos: usize,
    pub len: usize,
}

impl Match {
    /// Query span `[start, end)` in forward-strand coordinates for a match
    /// found while scanning the reverse complement of a `query_len`-long
    /// query.
    pub fn reverse_query_span(&self, query_len: usize) -> (usize, usize) {
        let end = query_len - self.query_pos;
        (end - self.len, end)
    }
}

/// Scan termination policy. Both historical behaviors are preserved:
/// rearrangement detection stops on the first sufficient match, everything
/// else keeps the maximum over the whole scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPolicy {
    FirstSufficient,
    BestOverall,
}

#[derive(Debug, Clone, Copy)]
pub struct ScanConfig {
    pub min_match: usize,
    pub policy: ScanPolicy,
    /// Opt-in bounded collection: stop recording past this many matches and
    /// flag truncation.
    pub cap: Option<usize>,
}

impl ScanConfig {
    pub fn best(min_match: usize) -> Self {
        ScanConfig {
            min_match,
            policy: ScanPolicy::BestOverall,
            cap: None,
        }
    }

    pub fn first(min_match: usize) -> Self {
        ScanConfig {
            min_match,
            policy: ScanPolicy::FirstSufficient,
            cap: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanHits {
    pub matches: Vec<Match>,
    pub truncated: bool,
}

/// A significant diagonal from the histogram pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagonalHit {
    pub diagonal: usize,
    pub hits: u32,
    /// Length-normalized score `word_len * hits / diag_len`.
    pub score: f64,
}

/// Diagonal index for a (subject, query) position pair.
#[inline(always)]
pub fn diagonal_index(subject_len: usize, subject_pos: usize, query_pos: usize) -> usize {
    subject_len - subject_pos + query_pos - 1
}

/// Number of diagonals between two sequences.
#[inline(always)]
pub fn diagonal_count(subject_len: usize, query_len: usize) -> usize {
    subject_len + query_len - 1
}

/// Number of overlapping (subject, query) cells a diagonal can hold.
#[inline]
pub fn diagonal_length(diagonal: usize, subject_len: usize, query_len: usize) -> usize {
    (diagonal + 1)
        .min(subject_len + query_len - 1 - diagonal)
        .min(subject_len)
        .min(query_len)
}

/// First (subject, query) position pair on a diagonal.
#[inline]
pub fn diagonal_start(diagonal: usize, subject_len: usize) -> (usize, usize) {
    if diagonal < subject_len {
        (subject_len - 1 - diagonal, 0)
    } else {
        (0, diagonal - subject_len + 1)
    }
}

/// Extension scan. `diag_cover` must hold `diagonal_count` entries, filled
/// with -1. The callback returns `false` to terminate the scan early.
pub(crate) fn scan_extend(
    index: &HashIndex,
    subject: &[u8],
    query: &[u8],
    query_hashes: &[i32],
    table: &AlphabetTable,
    diag_cover: &mut [i32],
    min_match: usize,
    mut on_match: impl FnMut(Match) -> bool,
) {
    let subject_len = subject.len();
    let query_len = query.len();

    for (pw2, &word) in query_hashes.iter().enumerate() {
        if word < 0 || index.count(word) == 0 {
            continue;
        }
        for pw1 in index.occurrences(word) {
            let diagonal = diagonal_index(subject_len, pw1, pw2);
            // never re-extend a run a farther-left start already covered
            if diag_cover[diagonal] >= pw2 as i32 {
                continue;
            }
            let mut len = 0usize;
            while pw1 + len < subject_len
                && pw2 + len < query_len
                && table.codes_match(subject[pw1 + len], query[pw2 + len], true)
            {
                len += 1;
            }
            diag_cover[diagonal] = (pw2 + len) as i32;
            if len >= min_match
                && !on_match(Match {
                    subject_pos: pw1,
                    query_pos: pw2,
                    len,
                })
            {
                return;
            }
        }
    }
}

/// Histogram pass: one word-hit count per diagonal, no extension.
pub(crate) fn scan_histogram(
    index: &HashIndex,
    subject_len: usize,
    query_hashes: &[i32],
    diag_hits: &mut [u32],
) {
    for (pw2, &word) in query_hashes.iter().enumerate() {
        if word < 0 {
            continue;
        }
        for pw1 in index.occurrences(word) {
            diag_hits[diagonal_index(subject_len, pw1, pw2)] += 1;
        }
    }
}

/// Pick the best significant diagonal from a hit histogram.
///
/// Hits are summed over a sliding window of `band` adjacent diagonals (the
/// historical `num_diagonals` knob) before scoring. Poisson gating needs the
/// caller-built threshold table; the fixed-cutoff mode compares the raw
/// normalized score.
pub(crate) fn best_diagonal(
    diag_hits: &[u32],
    subject_len: usize,
    query_len: usize,
    word_len: usize,
    band: usize,
    significance: &Significance,
    thresholds: Option<&ScoreThresholds>,
) -> Option<DiagonalHit> {
    let n = diag_hits.len();
    let band = band.max(1);
    let mut best: Option<DiagonalHit> = None;

    for diagonal in 0..n {
        let window_end = (diagonal + band).min(n);
        let hits: u32 = diag_hits[diagonal..window_end].iter().sum();
        if hits == 0 {
            continue;
        }
        let diag_len = diagonal_length(diagonal, subject_len, query_len);
        if diag_len == 0 {
            continue;
        }
        let score = word_len as f64 * hits as f64 / diag_len as f64;
        let significant = match significance {
            Significance::Poisson { .. } => match thresholds {
                Some(t) => score >= t.threshold(diag_len),
                None => false,
            },
            Significance::FixedCutoff { min_score } => score >= *min_score,
        };
        if !significant {
            continue;
        }
        if best.map_or(true, |b| score > b.score) {
            best = Some(DiagonalHit {
                diagonal,
                hits,
                score,
            });
        }
    }
    best
}
