//! Scan-scoped state: the subject index and reusable scratch buffers.
//!
//! One `ScanContext` serves a whole batch. The subject hash index is the
//! only cross-call state; it is rebuilt when the subject changes and reused
//! read-only otherwise. Scratch arrays grow to the largest pair seen and
//! are re-initialized per scan. Nothing here is global.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::alphabet::{reverse_complement, AlphabetTable, TableKind};
use crate::error::{Error, Result};
use crate::hash::{hash_sequence, HashIndex, MAX_WORD_LEN, MIN_WORD_LEN};
use crate::stats::{ScoreThresholds, Significance};

use super::diagonal::{
    best_diagonal, diagonal_count, scan_extend, scan_histogram, DiagonalHit, Match, ScanConfig,
    ScanHits, ScanPolicy,
};

/// Orientation a query was scanned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

/// Shared flag for cooperative cancellation between batch items.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct ScanContext {
    word_len: usize,
    table: AlphabetTable,
    subject: Vec<u8>,
    index: HashIndex,
    diag_cover: Vec<i32>,
    diag_hits: Vec<u32>,
    thresholds: Option<ScoreThresholds>,
}

impl ScanContext {
    /// Build a context around an initial subject sequence.
    pub fn new(word_len: usize, kind: TableKind, subject: &[u8]) -> Result<Self> {
        debug_assert!((MIN_WORD_LEN..=MAX_WORD_LEN).contains(&word_len));
        let table = AlphabetTable::new(kind);
        let hashes = hash_sequence(subject, word_len, &table)?;
        Ok(ScanContext {
            word_len,
            index: HashIndex::build(hashes, word_len),
            table,
            subject: subject.to_vec(),
            diag_cover: Vec::new(),
            diag_hits: Vec::new(),
            thresholds: None,
        })
    }

    pub fn word_len(&self) -> usize {
        self.word_len
    }

    pub fn table(&self) -> &AlphabetTable {
        &self.table
    }

    pub fn subject(&self) -> &[u8] {
        &self.subject
    }

    /// Swap in a new subject, rebuilding the index only if it actually
    /// differs from the current one.
    pub fn set_subject(&mut self, subject: &[u8]) -> Result<()> {
        if self.subject == subject {
            return Ok(());
        }
        let hashes = hash_sequence(subject, self.word_len, &self.table)?;
        self.index = HashIndex::build(hashes, self.word_len);
        self.subject.clear();
        self.subject.extend_from_slice(subject);
        Ok(())
    }

    fn check_query(&self, query: &[u8], min_match: usize) -> Result<()> {
        let required = min_match.max(self.word_len);
        if query.len() < required {
            return Err(Error::SequenceTooShort {
                len: query.len(),
                required,
            });
        }
        Ok(())
    }

    fn reset_cover(&mut self, query_len: usize) {
        let n = diagonal_count(self.subject.len(), query_len);
        if self.diag_cover.len() < n {
            self.diag_cover.resize(n, -1);
        }
        self.diag_cover[..n].fill(-1);
    }

    fn reset_hits(&mut self, query_len: usize) {
        let n = diagonal_count(self.subject.len(), query_len);
        if self.diag_hits.len() < n {
            self.diag_hits.resize(n, 0);
        }
        self.diag_hits[..n].fill(0);
    }

    /// Best (or first sufficient) exact diagonal run of at least
    /// `min_match` characters.
    pub fn scan_best(&mut self, query: &[u8], config: &ScanConfig) -> Result<Option<Match>> {
        self.check_query(query, config.min_match)?;
        let query_hashes = hash_sequence(query, self.word_len, &self.table)?;
        self.reset_cover(query.len());

        let mut best: Option<Match> = None;
        let first_wins = config.policy == ScanPolicy::FirstSufficient;
        scan_extend(
            &self.index,
            &self.subject,
            query,
            &query_hashes,
            &self.table,
            &mut self.diag_cover,
            config.min_match,
            |m| {
                if best.map_or(true, |b| m.len > b.len) {
                    best = Some(m);
                }
                !first_wins
            },
        );
        Ok(best)
    }

    /// Every qualifying run, in scan order. With a cap set the list is
    /// truncated and flagged once the cap is reached.
    pub fn scan_all(&mut self, query: &[u8], config: &ScanConfig) -> Result<ScanHits> {
        self.check_query(query, config.min_match)?;
        let query_hashes = hash_sequence(query, self.word_len, &self.table)?;
        self.reset_cover(query.len());

        let mut hits = ScanHits::default();
        let cap = config.cap.unwrap_or(usize::MAX);
        scan_extend(
            &self.index,
            &self.subject,
            query,
            &query_hashes,
            &self.table,
            &mut self.diag_cover,
            config.min_match,
            |m| {
                if hits.matches.len() >= cap {
                    hits.truncated = true;
                    return false;
                }
                hits.matches.push(m);
                true
            },
        );
        Ok(hits)
    }

    fn ensure_thresholds(&mut self, significance: &Significance, max_diag_len: usize) {
        if let Significance::Poisson { max_prob } = *significance {
            let stale = match &self.thresholds {
                Some(t) => {
                    t.word_len() != self.word_len
                        || t.max_prob() != max_prob
                        || t.max_diag_len() < max_diag_len
                }
                None => true,
            };
            if stale {
                self.thresholds =
                    Some(ScoreThresholds::build(self.word_len, max_diag_len, max_prob));
            }
        }
    }

    /// Histogram scan: accumulate word hits per diagonal, sum over a
    /// `band`-wide window, and return the best diagonal that clears the
    /// significance gate.
    pub fn scan_best_diagonal(
        &mut self,
        query: &[u8],
        band: usize,
        significance: &Significance,
    ) -> Result<Option<DiagonalHit>> {
        self.check_query(query, self.word_len)?;
        let query_hashes = hash_sequence(query, self.word_len, &self.table)?;
        self.reset_hits(query.len());
        self.ensure_thresholds(significance, self.subject.len().min(query.len()));

        let subject_len = self.subject.len();
        let n = diagonal_count(subject_len, query.len());
        scan_histogram(
            &self.index,
            subject_len,
            &query_hashes,
            &mut self.diag_hits[..n],
        );
        Ok(best_diagonal(
            &self.diag_hits[..n],
            subject_len,
            query.len(),
            self.word_len,
            band,
            significance,
            self.thresholds.as_ref(),
        ))
    }

    /// Scan forward and reverse-complement orientations; the longer match
    /// wins (forward on ties). Reverse-strand coordinates are relative to
    /// the reverse-complemented query; [`Match::reverse_query_span`] maps
    /// them back.
    pub fn scan_best_both_strands(
        &mut self,
        query: &[u8],
        config: &ScanConfig,
    ) -> Result<Option<(Match, Strand)>> {
        let forward = self.scan_best(query, config)?;
        let rc = reverse_complement(query);
        let reverse = self.scan_best(&rc, config)?;

        Ok(match (forward, reverse) {
            (Some(f), Some(r)) => {
                if r.len > f.len {
                    Some((r, Strand::Reverse))
                } else {
                    Some((f, Strand::Forward))
                }
            }
            (Some(f), None) => Some((f, Strand::Forward)),
            (None, Some(r)) => Some((r, Strand::Reverse)),
            (None, None) => None,
        })
    }

    /// Both-strand histogram scan; the higher-scoring orientation wins.
    pub fn scan_best_diagonal_both_strands(
        &mut self,
        query: &[u8],
        band: usize,
        significance: &Significance,
    ) -> Result<Option<(DiagonalHit, Strand)>> {
        let forward = self.scan_best_diagonal(query, band, significance)?;
        let rc = reverse_complement(query);
        let reverse = self.scan_best_diagonal(&rc, band, significance)?;

        Ok(match (forward, reverse) {
            (Some(f), Some(r)) => {
                if r.score > f.score {
                    Some((r, Strand::Reverse))
                } else {
                    Some((f, Strand::Forward))
                }
            }
            (Some(f), None) => Some((f, Strand::Forward)),
            (None, Some(r)) => Some((r, Strand::Reverse)),
            (None, None) => None,
        })
    }
}
