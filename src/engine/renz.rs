//! Restriction-site search: find every occurrence of a recognition sequence
//! on either strand of a subject. Definite recognition sequences go through
//! the hashed diagonal scan; ambiguous ones (IUPAC codes) fall back to a
//! bitmask sliding window.

use crate::alphabet::{reverse_complement, TableKind};
use crate::error::{Error, Result};
use crate::hash::MAX_WORD_LEN;
use crate::scan::{ScanConfig, ScanContext, Strand};

/// 4-bit base sets: A=1, C=2, G=4, T=8. Ambiguity codes are unions; zero
/// means the byte is not a nucleotide code at all.
const IUPAC_MASK: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let b = (i as u8).to_ascii_uppercase();
        table[i] = match b {
            b'A' => 1,
            b'C' => 2,
            b'G' => 4,
            b'T' | b'U' => 8,
            b'R' => 1 | 4,
            b'Y' => 2 | 8,
            b'M' => 1 | 2,
            b'K' => 4 | 8,
            b'S' => 2 | 4,
            b'W' => 1 | 8,
            b'B' => 2 | 4 | 8,
            b'D' => 1 | 4 | 8,
            b'H' => 1 | 2 | 8,
            b'V' => 1 | 2 | 4,
            b'N' => 15,
            _ => 0,
        };
        i += 1;
    }
    table
};

/// Whether a definite subject base satisfies one recognition-pattern
/// position. Ambiguous subject bases never match.
#[inline(always)]
pub fn base_matches(base: u8, pattern: u8) -> bool {
    let b = IUPAC_MASK[base as usize];
    b.count_ones() == 1 && (b & IUPAC_MASK[pattern as usize]) != 0
}

/// One recognition-site occurrence. `pos` is the 0-based subject position of
/// the site's first base, always in forward-strand coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteMatch {
    pub pos: usize,
    pub strand: Strand,
}

/// Find every site on both strands, sorted by position. A palindromic
/// recognition sequence reports each site once, on the forward strand.
/// With `cap` set, exceeding it is an error rather than a silent cut.
pub fn find_sites(
    subject: &[u8],
    recognition: &[u8],
    cap: Option<usize>,
) -> Result<Vec<SiteMatch>> {
    if recognition.is_empty() || subject.len() < recognition.len() {
        return Err(Error::SequenceTooShort {
            len: subject.len(),
            required: recognition.len().max(1),
        });
    }

    let rc = reverse_complement(recognition);
    let palindromic = rc.eq_ignore_ascii_case(recognition);
    let definite = recognition
        .iter()
        .all(|&b| IUPAC_MASK[b as usize].count_ones() == 1);

    let mut sites = if definite {
        find_definite(subject, recognition, &rc, palindromic)?
    } else {
        find_ambiguous(subject, recognition, &rc, palindromic)
    };

    sites.sort_by_key(|s| s.pos);
    if let Some(cap) = cap {
        if sites.len() > cap {
            return Err(Error::TooManyMatches { cap });
        }
    }
    Ok(sites)
}

/// Definite recognition sequences reuse the diagonal scanner: the subject is
/// indexed once and each strand's pattern is scanned as a query. Only runs
/// spanning the whole pattern are sites.
fn find_definite(
    subject: &[u8],
    recognition: &[u8],
    rc: &[u8],
    palindromic: bool,
) -> Result<Vec<SiteMatch>> {
    let word_len = recognition.len().min(MAX_WORD_LEN);
    let mut ctx = ScanContext::new(word_len, TableKind::Dna, subject)?;
    let config = ScanConfig::best(recognition.len());

    let mut sites = Vec::new();
    let hits = ctx.scan_all(recognition, &config)?;
    for m in hits.matches {
        // a run can overhang the pattern on the subject side
        sites.extend(site_starts(m.subject_pos, m.len, recognition.len(), Strand::Forward));
    }
    if !palindromic {
        let hits = ctx.scan_all(rc, &config)?;
        for m in hits.matches {
            sites.extend(site_starts(m.subject_pos, m.len, recognition.len(), Strand::Reverse));
        }
    }
    Ok(sites)
}

/// Every pattern-length window inside a longer exact run is a site.
fn site_starts(
    start: usize,
    run_len: usize,
    site_len: usize,
    strand: Strand,
) -> impl Iterator<Item = SiteMatch> {
    (start..=start + run_len - site_len).map(move |pos| SiteMatch { pos, strand })
}

fn find_ambiguous(
    subject: &[u8],
    recognition: &[u8],
    rc: &[u8],
    palindromic: bool,
) -> Vec<SiteMatch> {
    let mut sites = Vec::new();
    let n = recognition.len();
    for pos in 0..=subject.len() - n {
        let window = &subject[pos..pos + n];
        if window
            .iter()
            .zip(recognition)
            .all(|(&b, &p)| base_matches(b, p))
        {
            sites.push(SiteMatch {
                pos,
                strand: Strand::Forward,
            });
        } else if !palindromic
            && window.iter().zip(rc).all(|(&b, &p)| base_matches(b, p))
        {
            sites.push(SiteMatch {
                pos,
                strand: Strand::Reverse,
            });
        }
    }
    sites
}
