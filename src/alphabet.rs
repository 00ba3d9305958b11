//! Character-to-code lookup tables for DNA, IUPAC and protein alphabets.
//!
//! Every byte value maps to exactly one small code; unrecognized bytes map to
//! a reserved unknown code. All three built-in tables fold case. Whether
//! unknown matches unknown is the caller's choice (the `strict` flag on
//! [`AlphabetTable::codes_match`]).

/// Pad/gap character used in alignment output.
pub const PAD: u8 = b'*';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// A, C, G, T(/U) plus unknown: 5 codes.
    Dna,
    /// Four bases, eleven ambiguity letters, gap and unknown: 17 codes.
    Iupac,
    /// Twenty standard residues, B, Z, X, gap and unknown: 25 codes.
    Protein,
}

/// A total byte-to-code mapping over one alphabet.
pub struct AlphabetTable {
    kind: TableKind,
    codes: [u8; 256],
    unknown: u8,
    definite: u8,
}

impl AlphabetTable {
    pub fn new(kind: TableKind) -> Self {
        let (letters, definite): (&[u8], u8) = match kind {
            TableKind::Dna => (b"ACGT".as_slice(), 4),
            TableKind::Iupac => (b"ACGTRYMKSWBDHVN".as_slice(), 4),
            TableKind::Protein => (b"ARNDCQEGHILKMFPSTWYVBZX".as_slice(), 20),
        };
        let gap_code = match kind {
            TableKind::Dna => None,
            TableKind::Iupac => Some(letters.len() as u8),
            TableKind::Protein => Some(letters.len() as u8),
        };
        let unknown = letters.len() as u8 + if gap_code.is_some() { 1 } else { 0 };

        let mut codes = [unknown; 256];
        for (i, &c) in letters.iter().enumerate() {
            codes[c as usize] = i as u8;
            codes[c.to_ascii_lowercase() as usize] = i as u8;
        }
        if let Some(g) = gap_code {
            codes[b'-' as usize] = g;
            codes[PAD as usize] = g;
        }
        // U behaves as T in nucleic alphabets
        if !matches!(kind, TableKind::Protein) {
            codes[b'U' as usize] = codes[b'T' as usize];
            codes[b'u' as usize] = codes[b'T' as usize];
        }

        AlphabetTable {
            kind,
            codes,
            unknown,
            definite,
        }
    }

    #[inline(always)]
    pub fn code(&self, byte: u8) -> u8 {
        self.codes[byte as usize]
    }

    #[inline(always)]
    pub fn unknown_code(&self) -> u8 {
        self.unknown
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Number of distinct codes, the unknown code included.
    pub fn size(&self) -> usize {
        self.unknown as usize + 1
    }

    /// Codes below this bound are unambiguous residues; ambiguity letters,
    /// gap and unknown all sit at or above it and score zero in alignments.
    #[inline(always)]
    pub fn is_definite(&self, code: u8) -> bool {
        code < self.definite
    }

    /// Compare two characters through the table. With `strict` the unknown
    /// code never matches anything, itself included; otherwise unknown
    /// matches unknown only.
    #[inline(always)]
    pub fn codes_match(&self, a: u8, b: u8, strict: bool) -> bool {
        let ca = self.code(a);
        if ca != self.code(b) {
            return false;
        }
        !(strict && ca == self.unknown)
    }
}

/// Per-byte complement, IUPAC-aware and case-preserving. Bytes outside the
/// nucleotide alphabet map to themselves so a complement round-trip restores
/// the original buffer.
const COMPLEMENT: [u8; 256] = {
    let mut t = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        t[i] = i as u8;
        i += 1;
    }
    let pairs: [(u8, u8); 10] = [
        (b'A', b'T'),
        (b'C', b'G'),
        (b'R', b'Y'),
        (b'M', b'K'),
        (b'B', b'V'),
        (b'D', b'H'),
        (b'G', b'C'),
        (b'T', b'A'),
        (b'Y', b'R'),
        (b'K', b'M'),
    ];
    let mut p = 0;
    while p < pairs.len() {
        let (from, to) = pairs[p];
        t[from as usize] = to;
        t[from.to_ascii_lowercase() as usize] = to.to_ascii_lowercase();
        p += 1;
    }
    t[b'V' as usize] = b'B';
    t[b'v' as usize] = b'b';
    t[b'H' as usize] = b'D';
    t[b'h' as usize] = b'd';
    t[b'U' as usize] = b'A';
    t[b'u' as usize] = b'a';
    t
};

/// Reverse-complement a sequence in place. Applying it twice restores the
/// original buffer (U excepted, which complements to A).
pub fn complement_in_place(seq: &mut [u8]) {
    let len = seq.len();
    for i in 0..len / 2 {
        let (a, b) = (seq[i], seq[len - 1 - i]);
        seq[i] = COMPLEMENT[b as usize];
        seq[len - 1 - i] = COMPLEMENT[a as usize];
    }
    if len % 2 == 1 {
        let mid = len / 2;
        seq[mid] = COMPLEMENT[seq[mid] as usize];
    }
}

pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&b| COMPLEMENT[b as usize])
        .collect()
}
