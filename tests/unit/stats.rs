//! Poisson gating on whole-sequence histogram scans.

use seqclip::alphabet::TableKind;
use seqclip::scan::ScanContext;
use seqclip::stats::{score_significance, ScoreThresholds, Significance};

use crate::helpers::{random_dna, rng};

#[test]
fn unrelated_random_sequences_are_not_significant() {
    let mut rng = rng(23);
    let significance = Significance::Poisson { max_prob: 1e-8 };
    for round in 0..5 {
        let subject = random_dna(&mut rng, 400);
        let query = random_dna(&mut rng, 300);
        let mut ctx = ScanContext::new(8, TableKind::Dna, &subject).unwrap();
        let hit = ctx.scan_best_diagonal(&query, 7, &significance).unwrap();
        assert!(
            hit.is_none(),
            "round {}: random sequences reported as significant: {:?}",
            round, hit
        );
    }
}

#[test]
fn planted_overlap_is_significant() {
    let mut rng = rng(29);
    let subject = random_dna(&mut rng, 400);
    let mut query = random_dna(&mut rng, 300);
    query[50..150].copy_from_slice(&subject[200..300]);

    let mut ctx = ScanContext::new(8, TableKind::Dna, &subject).unwrap();
    let hit = ctx
        .scan_best_diagonal(&query, 7, &Significance::Poisson { max_prob: 1e-6 })
        .unwrap()
        .expect("planted 100 bp overlap should clear the gate");
    assert!(hit.hits >= 50, "only {} word hits on the best window", hit.hits);
}

#[test]
fn fixed_cutoff_ignores_the_poisson_model() {
    let mut rng = rng(31);
    let subject = random_dna(&mut rng, 400);
    let mut query = random_dna(&mut rng, 300);
    query[50..150].copy_from_slice(&subject[200..300]);

    let mut ctx = ScanContext::new(8, TableKind::Dna, &subject).unwrap();
    // A permissive fixed cutoff accepts what the strict Poisson gate accepts,
    // and keeps working with no threshold table at all.
    let hit = ctx
        .scan_best_diagonal(&query, 7, &Significance::FixedCutoff { min_score: 0.35 })
        .unwrap();
    assert!(hit.is_some());
}

#[test]
fn thresholds_tighten_with_probability_and_relax_with_length() {
    for word_len in [4, 8] {
        let strict = ScoreThresholds::build(word_len, 2048, 1e-9);
        let loose = ScoreThresholds::build(word_len, 2048, 1e-3);
        for diag_len in [32, 128, 512, 2048] {
            assert!(
                strict.threshold(diag_len) >= loose.threshold(diag_len),
                "word {} len {}: stricter probability lowered the threshold",
                word_len,
                diag_len
            );
        }
        // Longer diagonals never need a higher score than shorter ones.
        for diag_len in 2..2048 {
            assert!(strict.threshold(diag_len + 1) <= strict.threshold(diag_len));
        }
    }
}

#[test]
fn observed_score_significance_is_a_tail_probability() {
    // More observed hits on the same diagonal can only get less probable.
    let mut prev = f64::INFINITY;
    for hits in 1..20 {
        let score = 8.0 * hits as f64 / 512.0;
        let p = score_significance(512, 8, score);
        assert!(p <= prev + 1e-12);
        assert!((0.0..=1.0).contains(&p));
        prev = p;
    }
}
