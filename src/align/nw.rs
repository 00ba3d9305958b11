//! Needleman-Wunsch global alignment with padded output.
//!
//! Scoring is the engine's fixed scheme: +3 for identical definite codes,
//! -1 for mismatching definite codes, 0 wherever an ambiguity or unknown
//! code is involved, and a flat -2 per padded base with no
//! gap-open/gap-extend distinction. The flat penalty is a preserved design
//! constant of the original scheme, not a bug.
//!
//! The forward pass tracks the highest-scoring cell anywhere in the matrix
//! and traceback starts there, so trailing unmatched tails of either
//! sequence come out as trailing `*` pad columns rather than being
//! truncated. Ties break in the fixed order diagonal > down > across;
//! changing that order changes output alignments for degenerate inputs.

use crate::alphabet::{AlphabetTable, PAD};
use crate::error::{Error, Result};

use super::traceback::{TracebackDir, TracebackMatrix, TracebackStorage};

pub const MATCH_SCORE: i32 = 3;
pub const MISMATCH_SCORE: i32 = -1;
pub const GAP_PENALTY: i32 = -2;

#[derive(Debug, Clone, Copy)]
pub struct AlignConfig {
    pub storage: TracebackStorage,
    /// Whether unknown-equals-unknown counts as identity when scoring a
    /// region of the finished alignment.
    pub strict: bool,
}

impl Default for AlignConfig {
    fn default() -> Self {
        AlignConfig {
            storage: TracebackStorage::default(),
            strict: true,
        }
    }
}

/// Sub-range of the alignment over which percent identity is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreRegion {
    /// The whole alignment, end pads included.
    Full,
    /// Both end pad runs stripped; internal pad columns excluded from the
    /// denominator.
    UnpaddedCore,
    /// Leading pad run stripped.
    TrimLeftPads,
    /// Trailing pad run stripped.
    TrimRightPads,
}

/// A finished padded alignment. Both buffers always have equal length.
#[derive(Debug, Clone)]
pub struct Alignment {
    pub seq1: Vec<u8>,
    pub seq2: Vec<u8>,
    /// Best path score from the forward pass.
    pub score: i32,
    /// DP-matrix cell the traceback started from.
    pub best_row: usize,
    pub best_col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionScore {
    pub percent_identity: f64,
    pub left_end: usize,
    pub right_end: usize,
    pub pads1: usize,
    pub pads2: usize,
}

#[inline(always)]
fn substitution(table: &AlphabetTable, a: u8, b: u8) -> i32 {
    let ca = table.code(a);
    let cb = table.code(b);
    if !table.is_definite(ca) || !table.is_definite(cb) {
        0
    } else if ca == cb {
        MATCH_SCORE
    } else {
        MISMATCH_SCORE
    }
}

/// Globally align two sequences, producing equal-length padded buffers.
pub fn align(
    seq1: &[u8],
    seq2: &[u8],
    table: &AlphabetTable,
    config: &AlignConfig,
) -> Result<Alignment> {
    if seq1.is_empty() || seq2.is_empty() {
        return Err(Error::SequenceTooShort {
            len: seq1.len().min(seq2.len()),
            required: 1,
        });
    }

    let rows = seq1.len() + 1;
    let cols = seq2.len() + 1;
    let mut tb = TracebackMatrix::new(rows, cols, config.storage)?;

    let mut prev = vec![0i32; cols];
    let mut curr = vec![0i32; cols];
    for col in 1..cols {
        prev[col] = prev[col - 1] + GAP_PENALTY;
        tb.set(0, col, TracebackDir::Across);
    }

    let mut best_score = 0i32;
    let mut best_row = 0usize;
    let mut best_col = 0usize;

    for row in 1..rows {
        curr[0] = prev[0] + GAP_PENALTY;
        tb.set(row, 0, TracebackDir::Down);

        let c1 = seq1[row - 1];
        for col in 1..cols {
            let diag = prev[col - 1] + substitution(table, c1, seq2[col - 1]);
            let down = prev[col] + GAP_PENALTY;
            let across = curr[col - 1] + GAP_PENALTY;

            // fixed tie-break priority: diagonal > down > across
            let (score, dir) = if diag >= down && diag >= across {
                (diag, TracebackDir::Diag)
            } else if down >= across {
                (down, TracebackDir::Down)
            } else {
                (across, TracebackDir::Across)
            };
            curr[col] = score;
            tb.set(row, col, dir);

            if score > best_score {
                best_score = score;
                best_row = row;
                best_col = col;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    // walk back from the best cell to the origin
    let mut out1 = Vec::with_capacity(seq1.len() + seq2.len());
    let mut out2 = Vec::with_capacity(seq1.len() + seq2.len());
    let mut row = best_row;
    let mut col = best_col;
    while row > 0 || col > 0 {
        match tb.get(row, col) {
            TracebackDir::Diag => {
                out1.push(seq1[row - 1]);
                out2.push(seq2[col - 1]);
                row -= 1;
                col -= 1;
            }
            TracebackDir::Down => {
                out1.push(seq1[row - 1]);
                out2.push(PAD);
                row -= 1;
            }
            TracebackDir::Across => {
                out1.push(PAD);
                out2.push(seq2[col - 1]);
                col -= 1;
            }
        }
    }
    out1.reverse();
    out2.reverse();

    // unmatched tails after the best cell become trailing pad columns
    for &c in &seq1[best_row..] {
        out1.push(c);
        out2.push(PAD);
    }
    for &c in &seq2[best_col..] {
        out1.push(PAD);
        out2.push(c);
    }
    debug_assert_eq!(out1.len(), out2.len());

    Ok(Alignment {
        seq1: out1,
        seq2: out2,
        score: best_score,
        best_row,
        best_col,
    })
}

impl Alignment {
    pub fn len(&self) -> usize {
        self.seq1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq1.is_empty()
    }

    /// Percent identity over the selected region of this alignment.
    pub fn score_region(
        &self,
        region: ScoreRegion,
        table: &AlphabetTable,
        strict: bool,
    ) -> Result<RegionScore> {
        let len = self.len();
        let is_pad_col =
            |i: usize| -> bool { self.seq1[i] == PAD || self.seq2[i] == PAD };

        let mut lead = 0;
        while lead < len && is_pad_col(lead) {
            lead += 1;
        }
        let mut trail = len;
        while trail > lead && is_pad_col(trail - 1) {
            trail -= 1;
        }

        let (start, end) = match region {
            ScoreRegion::Full => (0, len),
            ScoreRegion::UnpaddedCore => (lead, trail),
            ScoreRegion::TrimLeftPads => (lead, len),
            ScoreRegion::TrimRightPads => (0, trail),
        };
        if end <= start {
            return Err(Error::InvalidRegion);
        }

        let mut matches = 0usize;
        let mut pads1 = 0usize;
        let mut pads2 = 0usize;
        let mut pad_cols = 0usize;
        for i in start..end {
            let (a, b) = (self.seq1[i], self.seq2[i]);
            if a == PAD {
                pads1 += 1;
            }
            if b == PAD {
                pads2 += 1;
            }
            if a == PAD || b == PAD {
                pad_cols += 1;
            } else if table.codes_match(a, b, strict) {
                matches += 1;
            }
        }

        let denominator = match region {
            ScoreRegion::UnpaddedCore => end - start - pad_cols,
            _ => end - start,
        };
        if denominator == 0 {
            return Err(Error::InvalidRegion);
        }

        Ok(RegionScore {
            percent_identity: 100.0 * matches as f64 / denominator as f64,
            left_end: start,
            right_end: end,
            pads1,
            pads2,
        })
    }
}

/// Align and score in one call.
pub fn score_alignment(
    seq1: &[u8],
    seq2: &[u8],
    region: ScoreRegion,
    table: &AlphabetTable,
    config: &AlignConfig,
) -> Result<RegionScore> {
    let alignment = align(seq1, seq2, table, config)?;
    alignment.score_region(region, table, config.strict)
}
