//! Contamination screening driver: scan each input sequence against a panel
//! of screen sequences and split the inputs into pass and fail lists.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rustc_hash::FxHashMap;

use crate::alphabet::TableKind;
use crate::hash::MAX_WORD_LEN;
use crate::scan::{ScanConfig, ScanContext, Strand};

use super::{read_fasta, read_filenames, FastaRecord};

#[derive(Args, Debug)]
pub struct ScreenArgs {
    /// Hashing word length
    #[arg(short = 'w', long, default_value_t = 8)]
    pub word_length: usize,
    /// Minimum exact match length for a sequence to fail screening
    #[arg(short = 'l', long, default_value_t = 25)]
    pub min_match: usize,
    /// Skip screen sequences longer than this
    #[arg(short = 'm', long, default_value_t = 100_000)]
    pub max_screen_length: usize,
    /// FASTA file of sequences to screen
    #[arg(short = 'i', long, conflicts_with = "input_list")]
    pub input: Option<PathBuf>,
    /// File of FASTA filenames to screen, processed in order
    #[arg(short = 'I', long)]
    pub input_list: Option<PathBuf>,
    /// FASTA file of screen (contaminant) sequences
    #[arg(short = 's', long, conflicts_with = "screen_list")]
    pub screen: Option<PathBuf>,
    /// File of screen FASTA filenames
    #[arg(short = 'S', long)]
    pub screen_list: Option<PathBuf>,
    /// Write names of sequences with no screen match here
    #[arg(short = 'p', long)]
    pub pass_file: Option<PathBuf>,
    /// Write names and match details of failing sequences here
    #[arg(short = 'f', long)]
    pub fail_file: Option<PathBuf>,
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

/// Where an input sequence hit the screen panel.
#[derive(Debug)]
struct FailDetail {
    screen_id: String,
    start: usize,
    end: usize,
    strand: Strand,
}

pub fn run(args: ScreenArgs) -> Result<()> {
    if args.word_length == 0 || args.word_length > MAX_WORD_LEN {
        bail!(
            "Word length must be between 1 and {}, got {}",
            MAX_WORD_LEN,
            args.word_length
        );
    }
    let inputs = load_records(&args.input, &args.input_list, "input")?;
    let screens: Vec<FastaRecord> = load_records(&args.screen, &args.screen_list, "screen")?
        .into_iter()
        .filter(|r| {
            if r.seq.len() > args.max_screen_length {
                eprintln!(
                    "[WARN] Screen sequence {} is {} bp, above the {} bp limit; skipped",
                    r.id,
                    r.seq.len(),
                    args.max_screen_length
                );
                false
            } else if r.seq.len() < args.word_length {
                eprintln!(
                    "[WARN] Screen sequence {} is shorter than the word length; skipped",
                    r.id
                );
                false
            } else {
                true
            }
        })
        .collect();
    if screens.is_empty() {
        bail!("No usable screen sequences");
    }

    eprintln!(
        "Screening {} sequences against {} screen sequences (word {}, min match {})...",
        inputs.len(),
        screens.len(),
        args.word_length,
        args.min_match
    );

    let mut contexts: Vec<ScanContext> = screens
        .iter()
        .map(|s| ScanContext::new(args.word_length, TableKind::Dna, &s.seq))
        .collect::<crate::Result<_>>()?;
    let config = ScanConfig::best(args.min_match);

    let bar = ProgressBar::new(inputs.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut passed: Vec<String> = Vec::new();
    let mut failed: Vec<(String, FailDetail)> = Vec::new();
    let mut skipped = 0usize;
    let mut screen_tallies: FxHashMap<String, usize> = FxHashMap::default();

    for input in &inputs {
        bar.inc(1);
        match screen_one(input, &screens, &mut contexts, &config) {
            Ok(Some(detail)) => {
                *screen_tallies.entry(detail.screen_id.clone()).or_insert(0) += 1;
                failed.push((input.id.clone(), detail));
            }
            Ok(None) => passed.push(input.id.clone()),
            Err(e) => {
                eprintln!("[WARN] {}: {}; skipped", input.id, e);
                skipped += 1;
            }
        }
    }
    bar.finish_and_clear();

    if let Some(path) = &args.pass_file {
        let mut w = BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create pass file: {}", path.display()))?,
        );
        for name in &passed {
            writeln!(w, "{}", name)?;
        }
        w.flush()?;
    }
    if let Some(path) = &args.fail_file {
        let mut w = BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create fail file: {}", path.display()))?,
        );
        for (name, detail) in &failed {
            let strand = match detail.strand {
                Strand::Forward => '+',
                Strand::Reverse => '-',
            };
            writeln!(
                w,
                "{}\t{}\t{}\t{}\t{}",
                name,
                detail.screen_id,
                detail.start + 1,
                detail.end,
                strand
            )?;
        }
        w.flush()?;
    }

    eprintln!(
        "[INFO] {} passed, {} failed, {} skipped",
        passed.len(),
        failed.len(),
        skipped
    );
    if args.verbose {
        let mut tallies: Vec<(&String, &usize)> = screen_tallies.iter().collect();
        tallies.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (screen_id, count) in tallies {
            eprintln!("[INFO]   {}: {} hits", screen_id, count);
        }
    }
    Ok(())
}

fn load_records(
    single: &Option<PathBuf>,
    list: &Option<PathBuf>,
    what: &str,
) -> Result<Vec<FastaRecord>> {
    match (single, list) {
        (Some(path), None) => read_fasta(path),
        (None, Some(path)) => {
            let mut records = Vec::new();
            for file in read_filenames(path)? {
                records.extend(read_fasta(&file)?);
            }
            Ok(records)
        }
        _ => bail!("Provide exactly one {} source (FASTA file or file of filenames)", what),
    }
}

/// First matching screen sequence wins; further screens are not consulted.
fn screen_one(
    input: &FastaRecord,
    screens: &[FastaRecord],
    contexts: &mut [ScanContext],
    config: &ScanConfig,
) -> crate::Result<Option<FailDetail>> {
    for (ctx, screen) in contexts.iter_mut().zip(screens) {
        if let Some((m, strand)) = ctx.scan_best_both_strands(&input.seq, config)? {
            let (start, end) = match strand {
                Strand::Forward => (m.query_pos, m.query_pos + m.len),
                Strand::Reverse => m.reverse_query_span(input.seq.len()),
            };
            return Ok(Some(FailDetail {
                screen_id: screen.id.clone(),
                start,
                end,
                strand,
            }));
        }
    }
    Ok(None)
}
