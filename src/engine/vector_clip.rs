//! Vector clipping driver: locate vector or primer sequence at the ends of
//! sequencing reads and report 1-based clip points. Reads are processed in
//! file-of-filenames order; a failure on one read never aborts the batch.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args};
use indicatif::{ProgressBar, ProgressStyle};

use crate::align::{score_alignment, AlignConfig, ScoreRegion};
use crate::alphabet::TableKind;
use crate::error::Error;
use crate::scan::{CancelToken, Match, ScanConfig, ScanContext, Strand};
use crate::stats::Significance;

use super::{read_fasta, read_filenames, FastaRecord};

/// Vector sequences larger than this are skipped outright.
const MAX_VECTOR_LEN_FLOOR: usize = 4096;
/// Historical clip-scan limit, one below the hasher's own maximum.
const MAX_CLIP_WORD_LEN: usize = 7;
/// Bounded match collection per read; enough for any sane vector hit count.
const MAX_MATCHES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipMode {
    Sequencing,
    Cloning,
    Primer,
    Rearrangement,
}

impl ClipMode {
    fn label(self) -> &'static str {
        match self {
            ClipMode::Sequencing => "sequencing-vector",
            ClipMode::Cloning => "cloning-vector",
            ClipMode::Primer => "primer",
            ClipMode::Rearrangement => "rearrangement",
        }
    }
}

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct VectorClipArgs {
    /// Hashing word length (1-7)
    #[arg(short = 'w', long, default_value_t = 4)]
    pub word_length: usize,
    /// Number of adjacent diagonals combined when scoring the histogram scan
    #[arg(short = 'n', long, default_value_t = 7)]
    pub num_diagonals: usize,
    /// Fixed diagonal score cutoff, used when the probability model is off
    #[arg(short = 'd', long, default_value_t = 0.35)]
    pub diag_score: f64,
    /// Minimum exact match length for end-match scans
    #[arg(short = 'l', long, default_value_t = 20)]
    pub min_match: usize,
    /// Percent identity cutoff for a 5' vector match
    #[arg(short = 'L', long, default_value_t = 60.0)]
    pub percent_5prime: f64,
    /// Percent identity cutoff for a 3' vector match
    #[arg(short = 'R', long, default_value_t = 80.0)]
    pub percent_3prime: f64,
    /// Maximum probability of a chance diagonal hit; <= 0 selects the fixed
    /// cutoff instead of the Poisson model
    #[arg(short = 'P', long, default_value_t = 0.0)]
    pub max_prob: f64,
    /// Skip vector sequences longer than this (floor 4096)
    #[arg(short = 'M', long, default_value_t = 100_000)]
    pub max_vector_length: usize,
    /// FASTA file holding the vector or primer sequence(s)
    #[arg(short = 'V', long)]
    pub vector: PathBuf,
    /// Clip sequencing-vector ends (histogram scan at both read ends)
    #[arg(short = 's', long, default_value_t = false)]
    pub sequencing: bool,
    /// Clip cloning-vector contamination (whole-read histogram scan)
    #[arg(short = 'c', long, default_value_t = false)]
    pub cloning: bool,
    /// Clip primer sequence (exact end-match scan)
    #[arg(short = 'h', long, default_value_t = false)]
    pub primer: bool,
    /// Flag rearranged reads (first sufficient internal match)
    #[arg(short = 'r', long, default_value_t = false)]
    pub rearrangement: bool,
    /// Report clip points without writing them anywhere but stdout
    #[arg(short = 't', long, default_value_t = false)]
    pub test_only: bool,
    /// Clip report destination (stdout when omitted)
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
    /// File of read FASTA filenames, processed in order
    pub reads: PathBuf,
    #[arg(long, action = ArgAction::HelpLong)]
    help: Option<bool>,
}

impl VectorClipArgs {
    fn mode(&self) -> Result<ClipMode> {
        let flags = [
            (self.sequencing, ClipMode::Sequencing),
            (self.cloning, ClipMode::Cloning),
            (self.primer, ClipMode::Primer),
            (self.rearrangement, ClipMode::Rearrangement),
        ];
        let mut selected: Vec<ClipMode> = flags
            .iter()
            .filter(|(on, _)| *on)
            .map(|&(_, mode)| mode)
            .collect();
        match selected.len() {
            1 => Ok(selected.pop().unwrap()),
            0 => bail!("Select one of -s, -c, -h, -r"),
            _ => bail!("Options -s, -c, -h, -r are mutually exclusive"),
        }
    }
}

/// One report line per read: name, 1-based left clip (0 = none), 1-based
/// right clip (len + 1 = none), status.
#[derive(Debug)]
struct ClipReport {
    name: String,
    left: usize,
    right: usize,
    status: &'static str,
}

pub fn run(args: VectorClipArgs) -> Result<()> {
    let mode = args.mode()?;
    if args.word_length == 0 || args.word_length > MAX_CLIP_WORD_LEN {
        bail!(
            "Word length must be between 1 and {}, got {}",
            MAX_CLIP_WORD_LEN,
            args.word_length
        );
    }
    let max_vector_len = args.max_vector_length.max(MAX_VECTOR_LEN_FLOOR);

    if args.verbose {
        eprintln!(
            "[INFO] Mode: {}, word length {}, band {}, min match {}",
            mode.label(),
            args.word_length,
            args.num_diagonals,
            args.min_match
        );
    }

    eprintln!("Reading vector sequences...");
    let vectors: Vec<FastaRecord> = read_fasta(&args.vector)?
        .into_iter()
        .filter(|r| {
            if r.seq.len() > max_vector_len {
                eprintln!(
                    "[WARN] Vector {} is {} bp, above the {} bp limit; skipped",
                    r.id,
                    r.seq.len(),
                    max_vector_len
                );
                false
            } else if r.seq.len() < args.word_length {
                eprintln!("[WARN] Vector {} is shorter than the word length; skipped", r.id);
                false
            } else {
                true
            }
        })
        .collect();
    if vectors.is_empty() {
        bail!("No usable vector sequences in {}", args.vector.display());
    }

    // One context per vector so each subject index is built exactly once.
    let mut contexts: Vec<ScanContext> = vectors
        .iter()
        .map(|v| ScanContext::new(args.word_length, TableKind::Dna, &v.seq))
        .collect::<crate::Result<_>>()?;

    let significance = Significance::from_prob(args.max_prob, args.diag_score);
    let files = read_filenames(&args.reads)?;

    let mut writer: Box<dyn Write> = match (&args.out, args.test_only) {
        (Some(path), false) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create report file: {}", path.display()))?,
        )),
        _ => Box::new(std::io::stdout().lock()),
    };

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let cancel = CancelToken::new();
    let mut processed = 0usize;
    let mut failed = 0usize;

    for file in &files {
        if cancel.is_cancelled() {
            eprintln!("[INFO] Cancelled after {} reads", processed);
            break;
        }
        bar.inc(1);

        let report = clip_file(file, &vectors, &mut contexts, mode, &args, &significance);
        match report {
            Ok(reports) => {
                for r in &reports {
                    writeln!(writer, "{}\t{}\t{}\t{}", r.name, r.left, r.right, r.status)?;
                }
                processed += reports.len();
            }
            Err(e) => {
                eprintln!("[WARN] {}: {:#}; skipped", file.display(), e);
                failed += 1;
            }
        }
    }
    bar.finish_and_clear();
    writer.flush()?;

    if args.verbose {
        eprintln!("[INFO] {} reads reported, {} files failed", processed, failed);
    }
    Ok(())
}

fn clip_file(
    file: &std::path::Path,
    vectors: &[FastaRecord],
    contexts: &mut [ScanContext],
    mode: ClipMode,
    args: &VectorClipArgs,
    significance: &Significance,
) -> Result<Vec<ClipReport>> {
    let reads = read_fasta(file)?;
    let mut reports = Vec::with_capacity(reads.len());
    for read in reads {
        match clip_read(&read, vectors, contexts, mode, args, significance) {
            Ok(report) => reports.push(report),
            Err(Error::NoSignificantMatch) => reports.push(no_match_report(&read, mode)),
            Err(e) => {
                eprintln!("[WARN] Read {}: {}; skipped", read.id, e);
            }
        }
    }
    Ok(reports)
}

/// An absent match is a normal outcome, not a failure: the read is reported
/// unclipped (or clean, for rearrangement detection).
fn no_match_report(read: &FastaRecord, mode: ClipMode) -> ClipReport {
    ClipReport {
        name: read.id.clone(),
        left: 0,
        right: read.seq.len() + 1,
        status: match mode {
            ClipMode::Rearrangement => "clean",
            _ => "no-match",
        },
    }
}

fn clip_read(
    read: &FastaRecord,
    vectors: &[FastaRecord],
    contexts: &mut [ScanContext],
    mode: ClipMode,
    args: &VectorClipArgs,
    significance: &Significance,
) -> crate::Result<ClipReport> {
    match mode {
        ClipMode::Sequencing | ClipMode::Primer => {
            clip_end_matches(read, vectors, contexts, mode, args)
        }
        ClipMode::Cloning => clip_cloning(read, vectors, contexts, args, significance),
        ClipMode::Rearrangement => clip_rearrangement(read, contexts, args),
    }
}

/// End-match clipping: collect every exact run against every vector on both
/// strands, verify each candidate with an end-anchored alignment, and keep
/// the longest verified candidate per read end.
fn clip_end_matches(
    read: &FastaRecord,
    vectors: &[FastaRecord],
    contexts: &mut [ScanContext],
    mode: ClipMode,
    args: &VectorClipArgs,
) -> crate::Result<ClipReport> {
    let qlen = read.seq.len();
    let config = ScanConfig {
        cap: Some(MAX_MATCHES),
        ..ScanConfig::best(args.min_match)
    };
    let rc = crate::alphabet::reverse_complement(&read.seq);
    let align_config = AlignConfig::default();

    // (match length, forward clip coordinate)
    let mut best5: Option<(usize, usize)> = None;
    let mut best3: Option<(usize, usize)> = None;

    for (ctx, vector) in contexts.iter_mut().zip(vectors) {
        for strand in [Strand::Forward, Strand::Reverse] {
            let scanned: &[u8] = match strand {
                Strand::Forward => &read.seq,
                Strand::Reverse => &rc,
            };
            let hits = ctx.scan_all(scanned, &config)?;
            if hits.truncated {
                eprintln!(
                    "[WARN] Read {}: more than {} matches against {}; extra matches dropped",
                    read.id, MAX_MATCHES, vector.id
                );
            }
            for m in &hits.matches {
                let (fs, fe) = match strand {
                    Strand::Forward => (m.query_pos, m.query_pos + m.len),
                    Strand::Reverse => m.reverse_query_span(qlen),
                };
                // A candidate belongs to whichever read end its center is
                // nearer to.
                let five_side = fs + fe < qlen;
                let cutoff = if five_side {
                    args.percent_5prime
                } else {
                    args.percent_3prime
                };
                // Verification runs toward the read end the candidate claims,
                // which is the scanned-strand start for forward 5' and
                // reverse 3' candidates.
                let toward_scanned_end = match strand {
                    Strand::Forward => !five_side,
                    Strand::Reverse => five_side,
                };
                let percent = verify_candidate(
                    &vector.seq,
                    scanned,
                    m,
                    toward_scanned_end,
                    args.num_diagonals,
                    ctx,
                    &align_config,
                )?;
                if percent < cutoff {
                    continue;
                }
                if five_side {
                    if best5.map_or(true, |(len, _)| m.len > len) {
                        best5 = Some((m.len, fe));
                    }
                } else if best3.map_or(true, |(len, _)| m.len > len) {
                    best3 = Some((m.len, fs + 1));
                }
            }
        }
    }

    if best5.is_none() && best3.is_none() {
        return Err(Error::NoSignificantMatch);
    }
    Ok(ClipReport {
        name: read.id.clone(),
        left: best5.map_or(0, |(_, fe)| fe),
        right: best3.map_or(qlen + 1, |(_, fs)| fs),
        status: mode.label(),
    })
}

/// Percent identity of the read segment between the exact run and the
/// relevant read end, aligned against the matching vector segment. The
/// vector segment carries `slack` extra bases to absorb indels.
fn verify_candidate(
    vector: &[u8],
    scanned: &[u8],
    m: &Match,
    toward_scanned_end: bool,
    slack: usize,
    ctx: &ScanContext,
    config: &AlignConfig,
) -> crate::Result<f64> {
    let (v_seg, q_seg) = if toward_scanned_end {
        let q_seg = &scanned[m.query_pos..];
        let hi = (m.subject_pos + q_seg.len() + slack).min(vector.len());
        (&vector[m.subject_pos..hi], q_seg)
    } else {
        let q_seg = &scanned[..m.query_pos + m.len];
        let lo = m.subject_pos.saturating_sub(m.query_pos + slack);
        (&vector[lo..m.subject_pos + m.len], q_seg)
    };
    let score = score_alignment(v_seg, q_seg, ScoreRegion::UnpaddedCore, ctx.table(), config)?;
    Ok(score.percent_identity)
}

/// Cloning-vector clipping: a whole-read histogram scan. The winning
/// diagonal's overlap window marks the vector portion of the read; the clip
/// point sits at the junction nearer the read interior.
fn clip_cloning(
    read: &FastaRecord,
    vectors: &[FastaRecord],
    contexts: &mut [ScanContext],
    args: &VectorClipArgs,
    significance: &Significance,
) -> crate::Result<ClipReport> {
    let qlen = read.seq.len();
    let mut best: Option<(crate::scan::DiagonalHit, Strand, usize)> = None;
    for (i, ctx) in contexts.iter_mut().enumerate() {
        if let Some((hit, strand)) =
            ctx.scan_best_diagonal_both_strands(&read.seq, args.num_diagonals, significance)?
        {
            if best.map_or(true, |(b, _, _)| hit.score > b.score) {
                best = Some((hit, strand, i));
            }
        }
    }
    let (hit, strand, vector_idx) = best.ok_or(Error::NoSignificantMatch)?;

    let slen = vectors[vector_idx].seq.len();
    let (_, qp) = crate::scan::diagonal_start(hit.diagonal, slen);
    let overlap = crate::scan::diagonal_length(hit.diagonal, slen, qlen);
    let (fs, fe) = match strand {
        Strand::Forward => (qp, qp + overlap),
        Strand::Reverse => (qlen - (qp + overlap), qlen - qp),
    };

    let five_side = fs + fe < qlen;
    Ok(ClipReport {
        name: read.id.clone(),
        left: if five_side { fe } else { 0 },
        right: if five_side { qlen + 1 } else { fs + 1 },
        status: ClipMode::Cloning.label(),
    })
}

/// Rearrangement detection: the first sufficient run anywhere flags the
/// read; the reported span is the run itself.
fn clip_rearrangement(
    read: &FastaRecord,
    contexts: &mut [ScanContext],
    args: &VectorClipArgs,
) -> crate::Result<ClipReport> {
    let qlen = read.seq.len();
    let config = ScanConfig::first(args.min_match);
    for ctx in contexts.iter_mut() {
        if let Some((m, strand)) = ctx.scan_best_both_strands(&read.seq, &config)? {
            let (fs, fe) = match strand {
                Strand::Forward => (m.query_pos, m.query_pos + m.len),
                Strand::Reverse => m.reverse_query_span(qlen),
            };
            return Ok(ClipReport {
                name: read.id.clone(),
                left: fs + 1,
                right: fe,
                status: ClipMode::Rearrangement.label(),
            });
        }
    }
    Err(Error::NoSignificantMatch)
}
