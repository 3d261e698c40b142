mod batch;
mod config;
mod scan;

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use batch::{run_batch, BatchEvent, BatchSummary};
use config::{BatchConfig, Preset, MAX_LIMIT_MB};
use hypershrink_core::fit::BYTES_PER_MEGABYTE;

#[derive(Parser, Debug)]
#[command(name = "hypershrink")]
#[command(about = "Shrink every oversized image in a folder to fit a size limit", long_about = None)]
#[command(version)]
#[command(after_help = "EXAMPLES:\n  hypershrink ~/Pictures                     Shrink to 16 MB into X-TREME_COMPRESSED/\n  hypershrink ~/Pictures --limit-mb 5         Shrink to 5 MB\n  hypershrink ~/Pictures --preset whatsapp    Fixed 16 MB into Listas_WhatsApp/\n  hypershrink ~/Pictures -vv                  Log every encode attempt\n\nSUPPORTED FORMATS:\n  .png .jpg .jpeg .webp .tiff .bmp (output is always JPEG)\n\nFiles already within the limit are left alone.")]
struct Cli {
    /// Folder with the images to shrink
    folder: PathBuf,

    /// Output naming and limit preset
    #[arg(short, long, value_enum, default_value_t = Preset::Xtreme)]
    preset: Preset,

    /// Size limit in MB (xtreme preset only, 1-50)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=MAX_LIMIT_MB as i64))]
    limit_mb: Option<u32>,

    /// Output folder (defaults to a preset-named folder inside FOLDER)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Suffix appended to output file names
    #[arg(long)]
    suffix: Option<String>,

    /// Verbosity level (-v=info, -vv=debug); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{e:#}");
        eprintln!("CRITICAL ERROR: {e:#}");
        std::process::exit(1);
    }
}

/// Log to stderr so stdout carries only the progress report.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(cli: Cli) -> Result<()> {
    if !cli.folder.is_dir() {
        bail!("'{}' is not a folder", cli.folder.display());
    }

    let config = BatchConfig::resolve(
        &cli.folder,
        cli.preset,
        cli.limit_mb,
        cli.output_dir,
        cli.suffix,
    )?;

    let stop = AtomicBool::new(false);
    let summary = run_batch(&config, &stop, report)?;
    print_summary(&summary);
    Ok(())
}

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MEGABYTE as f64
}

fn report(event: BatchEvent) {
    match event {
        BatchEvent::NoFiles => println!(">> NO FILES FOUND."),
        BatchEvent::Started { total, budget } => {
            println!(">> SYSTEM READY. TARGET: {budget}. {total} FILE(S) FOUND.")
        }
        BatchEvent::Progress { percent } => println!("[{percent:>3}%]"),
        BatchEvent::Processing { file, size_bytes } => {
            println!("PROCESSING: {file} ({:.1} MB)", megabytes(size_bytes))
        }
        BatchEvent::Skipped { .. } => {}
        BatchEvent::Compressed {
            size_bytes,
            quality,
            scale,
            ..
        } => println!(
            " [OK] REDUCED TO: {:.1} MB (quality {quality}, scale {scale:.2})",
            megabytes(size_bytes)
        ),
        BatchEvent::Unreachable { file, .. } => println!(" [FAIL] COULD NOT COMPRESS: {file}"),
        BatchEvent::FileError { file, error } => println!(" [ERROR] {file}: {error}"),
        BatchEvent::Stopped { remaining } => println!(">> STOPPED. {remaining} FILE(S) LEFT."),
    }
}

fn print_summary(summary: &BatchSummary) {
    println!(
        "\n>> JOB DONE. {} FILE(S) PROCESSED.",
        summary.compressed
    );
    if summary.unreachable + summary.failed > 0 {
        println!(
            ">> {} UNREACHABLE, {} FAILED.",
            summary.unreachable, summary.failed
        );
    }
    if summary.total > 0 {
        println!(">> OUTPUT: {}", summary.output_dir.display());
    }
}
