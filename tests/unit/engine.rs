//! Restriction-site search over realistic sequence.

use seqclip::engine::find_sites;
use seqclip::scan::Strand;

use crate::helpers::{random_dna, rng};

#[test]
fn planted_sites_are_found_among_random_sequence() {
    let mut rng = rng(43);
    let mut plasmid = Vec::new();
    let mut expected = Vec::new();
    for chunk in 0..6 {
        let filler: Vec<u8> = random_dna(&mut rng, 80 + chunk * 7)
            .into_iter()
            // keep the filler free of accidental sites
            .map(|b| if b == b'G' { b'C' } else { b })
            .collect();
        plasmid.extend_from_slice(&filler);
        expected.push(plasmid.len());
        plasmid.extend_from_slice(b"GAATTC");
    }

    let sites = find_sites(&plasmid, b"GAATTC", None).unwrap();
    let positions: Vec<usize> = sites.iter().map(|s| s.pos).collect();
    assert_eq!(positions, expected);
    assert!(sites.iter().all(|s| s.strand == Strand::Forward));
}

#[test]
fn asymmetric_site_reports_its_strand() {
    let mut rng = rng(47);
    let filler: Vec<u8> = random_dna(&mut rng, 60)
        .into_iter()
        .map(|b| if b == b'C' { b'A' } else { b })
        .collect();
    let mut seq = filler.clone();
    seq.extend_from_slice(b"GGTCTC"); // BsaI
    seq.extend_from_slice(&filler);
    seq.extend_from_slice(b"GAGACC"); // reverse complement
    seq.extend_from_slice(&filler);

    let sites = find_sites(&seq, b"GGTCTC", None).unwrap();
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].strand, Strand::Forward);
    assert_eq!(sites[0].pos, 60);
    assert_eq!(sites[1].strand, Strand::Reverse);
    assert_eq!(sites[1].pos, 126);
}

#[test]
fn ambiguous_recognition_scans_by_base_set() {
    // XhoII: RGATCY, R = A/G and Y = C/T.
    let seq = b"TTTAGATCCTTTGGATCTTTTCGATCCTTT";
    let sites = find_sites(seq, b"RGATCY", None).unwrap();
    let positions: Vec<usize> = sites.iter().map(|s| s.pos).collect();
    assert_eq!(positions, vec![3, 12]);
}
