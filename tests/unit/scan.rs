//! Diagonal scan behavior against brute-force references.

use seqclip::alphabet::{reverse_complement, TableKind};
use seqclip::scan::{ScanConfig, ScanContext, Strand};

use crate::helpers::{naive_longest_run, random_dna, rng};

#[test]
fn best_match_length_agrees_with_brute_force() {
    let mut rng = rng(7);
    for word_len in [4, 6, 8] {
        for round in 0..10 {
            let subject = random_dna(&mut rng, 150);
            let mut query = random_dna(&mut rng, 120);
            // Plant a shared segment so most rounds have a real match.
            if round % 2 == 0 {
                let seg = &subject[40..40 + 20 + round];
                query[50..50 + seg.len()].copy_from_slice(seg);
            }

            let expected = naive_longest_run(&subject, &query);
            let mut ctx = ScanContext::new(word_len, TableKind::Dna, &subject).unwrap();
            let found = ctx
                .scan_best(&query, &ScanConfig::best(word_len))
                .unwrap()
                .map_or(0, |m| m.len);
            // Runs shorter than the word length are invisible to the scan.
            let want = if expected >= word_len { expected } else { 0 };
            assert_eq!(
                found, want,
                "word {} round {}: scan found {} but brute force says {}",
                word_len, round, found, expected
            );
        }
    }
}

#[test]
fn reported_matches_are_genuine_runs() {
    let mut rng = rng(11);
    let subject = random_dna(&mut rng, 200);
    let mut query = random_dna(&mut rng, 150);
    query[30..70].copy_from_slice(&subject[100..140]);

    let mut ctx = ScanContext::new(6, TableKind::Dna, &subject).unwrap();
    let hits = ctx.scan_all(&query, &ScanConfig::best(10)).unwrap();
    assert!(!hits.matches.is_empty());
    for m in &hits.matches {
        assert!(m.len >= 10);
        assert_eq!(
            &subject[m.subject_pos..m.subject_pos + m.len],
            &query[m.query_pos..m.query_pos + m.len],
            "reported run does not actually match"
        );
        // maximal to the right: either a boundary or a real mismatch
        let (se, qe) = (m.subject_pos + m.len, m.query_pos + m.len);
        assert!(
            se == subject.len() || qe == query.len() || subject[se] != query[qe],
            "run is not right-maximal"
        );
    }
}

#[test]
fn matches_on_one_diagonal_never_overlap() {
    let mut rng = rng(13);
    // Low-complexity subject makes diagonal collisions likely.
    let subject: Vec<u8> = b"ACGT".repeat(50);
    let query = {
        let mut q = random_dna(&mut rng, 80);
        q[10..30].copy_from_slice(&subject[0..20]);
        q[50..70].copy_from_slice(&subject[0..20]);
        q
    };

    let mut ctx = ScanContext::new(4, TableKind::Dna, &subject).unwrap();
    let hits = ctx.scan_all(&query, &ScanConfig::best(4)).unwrap();
    let slen = subject.len();
    let mut per_diagonal: Vec<(usize, usize, usize)> = hits
        .matches
        .iter()
        .map(|m| {
            (
                seqclip::scan::diagonal_index(slen, m.subject_pos, m.query_pos),
                m.query_pos,
                m.query_pos + m.len,
            )
        })
        .collect();
    per_diagonal.sort();
    for pair in per_diagonal.windows(2) {
        if pair[0].0 == pair[1].0 {
            assert!(
                pair[0].2 <= pair[1].1,
                "overlapping runs on diagonal {}",
                pair[0].0
            );
        }
    }
}

#[test]
fn reverse_strand_span_round_trips() {
    let mut rng = rng(17);
    let subject = random_dna(&mut rng, 100);
    // Query carries the reverse complement of a subject segment.
    let mut query = random_dna(&mut rng, 90);
    let segment = reverse_complement(&subject[20..60]);
    query[25..65].copy_from_slice(&segment);

    let mut ctx = ScanContext::new(8, TableKind::Dna, &subject).unwrap();
    let (m, strand) = ctx
        .scan_best_both_strands(&query, &ScanConfig::best(20))
        .unwrap()
        .expect("planted reverse match not found");
    assert_eq!(strand, Strand::Reverse);

    // The run covers the whole planted segment, possibly extended by chance.
    let (start, end) = m.reverse_query_span(query.len());
    assert!(start <= 25 && end >= 65, "span {}..{} misses the plant", start, end);
    // The forward-coordinate span reverse-complements back onto the subject.
    let rc = reverse_complement(&query[start..end]);
    assert_eq!(&rc[..], &subject[m.subject_pos..m.subject_pos + m.len]);
}

#[test]
fn poly_a_subject_never_reaches_min_match_against_random_query() {
    let mut rng = rng(19);
    let subject = vec![b'A'; 120];
    let mut ctx = ScanContext::new(4, TableKind::Dna, &subject).unwrap();
    for _ in 0..5 {
        let query = random_dna(&mut rng, 100);
        // Plenty of word hits, but no 20-long run of A in random sequence.
        assert!(ctx
            .scan_best(&query, &ScanConfig::best(20))
            .unwrap()
            .is_none());
    }
}

#[test]
fn subject_swap_invalidates_previous_matches() {
    let subject_a = b"ACGTACGTACGTACGTACGT".to_vec();
    let subject_b = b"TTGCATTGCATTGCATTGCA".to_vec();
    let mut ctx = ScanContext::new(4, TableKind::Dna, &subject_a).unwrap();
    assert!(ctx
        .scan_best(b"ACGTACGTACGT", &ScanConfig::best(12))
        .unwrap()
        .is_some());

    ctx.set_subject(&subject_b).unwrap();
    assert!(ctx
        .scan_best(b"ACGTACGTACGT", &ScanConfig::best(12))
        .unwrap()
        .is_none());
    assert!(ctx
        .scan_best(b"TTGCATTGCATTGCA", &ScanConfig::best(15))
        .unwrap()
        .is_some());
}

// On a self-reverse-complementary subject, scanning a query and its reverse
// complement must find the same run, mirrored about the subject midpoint.
#[test]
fn palindromic_subject_reflects_match_coordinates() {
    let half = b"GAATTCGGGGACGTTGCA";
    let mut subject = half.to_vec();
    subject.extend_from_slice(&reverse_complement(half));
    assert_eq!(reverse_complement(&subject), subject);

    let query = subject[4..24].to_vec();
    let mut ctx = ScanContext::new(4, TableKind::Dna, &subject).unwrap();
    let fwd = ctx
        .scan_best(&query, &ScanConfig::best(12))
        .unwrap()
        .unwrap();
    let rev = ctx
        .scan_best(&reverse_complement(&query), &ScanConfig::best(12))
        .unwrap()
        .unwrap();

    assert_eq!(fwd.len, query.len());
    assert_eq!(rev.len, fwd.len);
    assert_eq!(rev.subject_pos, subject.len() - fwd.subject_pos - fwd.len);
}
