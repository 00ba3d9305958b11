//! Poisson model for diagonal hit-count significance.
//!
//! A diagonal of length D accumulates hash-collision word hits at random
//! with expected count `D / 4^W` even with no true homology. For every
//! diagonal length the model finds the minimum hit count h whose tail
//! probability falls below the requested false-positive bound, then converts
//! h into a length-normalized score `W * (h - 0.5) / D` (continuity
//! correction), so long and short diagonals are judged fairly.

use crate::hash::table_size;

/// How diagonal scores are gated.
///
/// The statistical model can be disabled outright (a non-positive
/// false-positive bound), in which case a caller-supplied raw normalized
/// score is the cutoff. Both modes are preserved, never conflated with the
/// scan termination policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Significance {
    Poisson { max_prob: f64 },
    FixedCutoff { min_score: f64 },
}

impl Significance {
    /// Historical CLI semantics: `max_prob <= 0` disables the model and
    /// falls back to the fixed raw-score cutoff.
    pub fn from_prob(max_prob: f64, fixed_cutoff: f64) -> Self {
        if max_prob > 0.0 {
            Significance::Poisson { max_prob }
        } else {
            Significance::FixedCutoff {
                min_score: fixed_cutoff,
            }
        }
    }
}

/// Upper tail `P(X >= h)` for X ~ Poisson(lambda), by direct pmf
/// accumulation.
pub fn poisson_tail(lambda: f64, h: u32) -> f64 {
    if h == 0 {
        return 1.0;
    }
    if lambda <= 0.0 {
        return 0.0;
    }
    let mut pmf = (-lambda).exp();
    let mut cdf = pmf;
    for k in 1..h {
        pmf *= lambda / k as f64;
        cdf += pmf;
    }
    (1.0 - cdf).max(0.0)
}

/// False-positive probability bound for an observed normalized score on a
/// diagonal of the given length. Diagnostic companion to the threshold
/// table; pass/fail decisions use [`ScoreThresholds`].
pub fn score_significance(diag_len: usize, word_len: usize, observed_score: f64) -> f64 {
    if diag_len == 0 {
        return 1.0;
    }
    let lambda = diag_len as f64 / table_size(word_len) as f64;
    let hits = (observed_score * diag_len as f64 / word_len as f64 + 0.5).ceil();
    poisson_tail(lambda, hits.max(1.0) as u32)
}

/// Score threshold per diagonal length, for one word length and
/// false-positive bound.
pub struct ScoreThresholds {
    word_len: usize,
    max_prob: f64,
    thresholds: Vec<f64>,
}

impl ScoreThresholds {
    pub fn build(word_len: usize, max_diag_len: usize, max_prob: f64) -> Self {
        let volume = table_size(word_len) as f64;
        let mut thresholds = Vec::with_capacity(max_diag_len + 1);
        thresholds.push(f64::INFINITY); // zero-length diagonal

        for diag_len in 1..=max_diag_len {
            let lambda = diag_len as f64 / volume;
            let mut hits = 1u32;
            while poisson_tail(lambda, hits) >= max_prob {
                hits += 1;
            }
            let raw = word_len as f64 * (hits as f64 - 0.5) / diag_len as f64;
            // the minimum hit count moves in integer steps; clamp so the
            // normalized threshold never rises with diagonal length
            let prev = thresholds[diag_len - 1];
            thresholds.push(raw.min(prev));
        }

        ScoreThresholds {
            word_len,
            max_prob,
            thresholds,
        }
    }

    pub fn word_len(&self) -> usize {
        self.word_len
    }

    pub fn max_prob(&self) -> f64 {
        self.max_prob
    }

    pub fn max_diag_len(&self) -> usize {
        self.thresholds.len() - 1
    }

    /// Threshold for a diagonal length; lengths beyond the table clamp to
    /// the last entry.
    #[inline]
    pub fn threshold(&self, diag_len: usize) -> f64 {
        let i = diag_len.min(self.thresholds.len() - 1);
        self.thresholds[i]
    }
}
