use anyhow::Result;
use clap::{Parser, Subcommand};
use seqclip::engine::{screen, vector_clip};

#[derive(Parser)]
#[command(name = "seqclip")]
#[command(version = "0.1.0")]
#[command(about = "Vector clipping and contamination screening for sequencing reads", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Locate and clip vector, primer, or rearranged sequence in reads
    VectorClip(vector_clip::VectorClipArgs),

    /// Screen sequences against a contaminant panel
    ScreenSeq(screen::ScreenArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::VectorClip(args) => {
            vector_clip::run(args)?;
        }
        Commands::ScreenSeq(args) => {
            screen::run(args)?;
        }
    }
    Ok(())
}
