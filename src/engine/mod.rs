//! Scan orchestrators: end-to-end drivers that read FASTA input, run the
//! diagonal scanner over one or more subject sequences, and report results.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bio::io::fasta;

pub mod renz;
pub mod screen;
pub mod vector_clip;

pub use renz::{find_sites, SiteMatch};
pub use screen::ScreenArgs;
pub use vector_clip::VectorClipArgs;

/// A named sequence loaded from a FASTA file.
#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub seq: Vec<u8>,
}

/// Read every record of a FASTA file into memory.
pub(crate) fn read_fasta(path: &Path) -> Result<Vec<FastaRecord>> {
    let reader = fasta::Reader::from_file(path)
        .with_context(|| format!("Failed to open FASTA file: {}", path.display()))?;
    let mut records = Vec::new();
    for result in reader.records() {
        let record =
            result.with_context(|| format!("Invalid FASTA record in {}", path.display()))?;
        records.push(FastaRecord {
            id: record.id().to_string(),
            seq: record.seq().to_vec(),
        });
    }
    if records.is_empty() {
        bail!("No sequences found in {}", path.display());
    }
    Ok(records)
}

/// Read a file of filenames: one path per line, blank lines and `#` comments
/// skipped. Entries are returned in file order.
pub(crate) fn read_filenames(path: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file of filenames: {}", path.display()))?;
    let mut names = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        names.push(PathBuf::from(trimmed));
    }
    if names.is_empty() {
        bail!("File of filenames is empty: {}", path.display());
    }
    Ok(names)
}
