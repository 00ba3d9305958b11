//! Alignment and region-scoring behavior.

use seqclip::align::{align, score_alignment, AlignConfig, ScoreRegion, TracebackStorage};
use seqclip::alphabet::{AlphabetTable, TableKind, PAD};

use crate::helpers::{random_dna, rng};

fn dna() -> AlphabetTable {
    AlphabetTable::new(TableKind::Dna)
}

#[test]
fn compact_and_fast_storage_agree() {
    let mut rng = rng(37);
    let table = dna();
    for _ in 0..10 {
        let a = random_dna(&mut rng, 60);
        let b = random_dna(&mut rng, 55);
        let fast = align(&a, &b, &table, &AlignConfig::default()).unwrap();
        let compact = align(
            &a,
            &b,
            &table,
            &AlignConfig {
                storage: TracebackStorage::Compact,
                ..AlignConfig::default()
            },
        )
        .unwrap();
        assert_eq!(fast.score, compact.score);
        assert_eq!(fast.seq1, compact.seq1);
        assert_eq!(fast.seq2, compact.seq2);
    }
}

#[test]
fn alignment_buffers_stay_parallel_and_ungapped_elsewhere() {
    let mut rng = rng(41);
    let table = dna();
    for _ in 0..10 {
        let a = random_dna(&mut rng, 40);
        let b = random_dna(&mut rng, 48);
        let aln = align(&a, &b, &table, &AlignConfig::default()).unwrap();
        assert_eq!(aln.seq1.len(), aln.seq2.len());
        // Stripping pads restores the inputs.
        let stripped1: Vec<u8> = aln.seq1.iter().copied().filter(|&c| c != PAD).collect();
        let stripped2: Vec<u8> = aln.seq2.iter().copied().filter(|&c| c != PAD).collect();
        assert_eq!(stripped1, a);
        assert_eq!(stripped2, b);
        // No column pads both sequences.
        for (c1, c2) in aln.seq1.iter().zip(&aln.seq2) {
            assert!(*c1 != PAD || *c2 != PAD);
        }
    }
}

#[test]
fn unpadded_core_excludes_end_gaps_from_identity() {
    let table = dna();
    let config = AlignConfig::default();
    // Identical core, one sequence carrying extra flanks.
    let core = b"ACGTTGCAACGTTGCA";
    let mut flanked = b"TTTT".to_vec();
    flanked.extend_from_slice(core);
    flanked.extend_from_slice(b"GGGG");

    let full = score_alignment(&flanked, core, ScoreRegion::Full, &table, &config).unwrap();
    let core_score =
        score_alignment(&flanked, core, ScoreRegion::UnpaddedCore, &table, &config).unwrap();
    assert!(full.percent_identity < 100.0);
    assert_eq!(core_score.percent_identity, 100.0);
    assert!(core_score.left_end > full.left_end || core_score.right_end < full.right_end);
}

#[test]
fn one_sided_trims_strip_one_end_only() {
    let table = dna();
    let config = AlignConfig::default();
    let a = b"TTTTACGTACGTACGT";
    let b = b"ACGTACGTACGT";

    let left = score_alignment(a, b, ScoreRegion::TrimLeftPads, &table, &config).unwrap();
    let right = score_alignment(a, b, ScoreRegion::TrimRightPads, &table, &config).unwrap();
    assert_eq!(left.percent_identity, 100.0);
    assert!(right.percent_identity < 100.0);
}

#[test]
fn ambiguity_codes_are_neutral_not_identical() {
    let table = dna();
    let config = AlignConfig::default();
    // N columns drop out of the identity count entirely under strict scoring.
    let score = score_alignment(
        b"ACGTNNACGT",
        b"ACGTTTACGT",
        ScoreRegion::Full,
        &table,
        &config,
    )
    .unwrap();
    assert!(score.percent_identity < 100.0);
    let exact = score_alignment(
        b"ACGTACGT",
        b"ACGTACGT",
        ScoreRegion::Full,
        &table,
        &config,
    )
    .unwrap();
    assert_eq!(exact.percent_identity, 100.0);
}
