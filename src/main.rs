//! # qrsplit CLI
//!
//! Command-line interface for splitting files into QR code images.
//!
//! ## Usage
//!
//! ```bash
//! # Split into ./out/qr_000000.png, qr_000001.png, ...
//! qrsplit backup.tar.gz
//!
//! # Smaller symbols, custom directory
//! qrsplit --qr-version 20 --output-dir scans backup.tar.gz
//!
//! # Hex mode: every symbol holds printable text
//! qrsplit --hex backup.tar.gz
//!
//! # Show the plan without writing anything
//! qrsplit --dry-run --hex backup.tar.gz
//!
//! # Render on 4 threads
//! qrsplit --jobs 4 backup.tar.gz
//! ```
//!
//! ## Reassembly
//!
//! ```bash
//! # Binary mode
//! for f in out/qr_*.png; do zbarimg --raw -q -Sbinary "$f"; done > restored
//!
//! # Hex mode
//! for f in out/qr_*.png; do zbarimg --raw -q "$f" | tr -d '\n'; done | xxd -r -p > restored
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use qrsplit::{Orchestrator, QrSplitError, RunReport, SplitConfig, config};

/// qrsplit - Split a file into a sequence of QR code images
#[derive(Parser, Debug)]
#[command(name = "qrsplit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data file to split
    file: PathBuf,

    /// QR output directory
    #[arg(long, default_value = config::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// QR symbol version (1-40); larger versions hold more data per image
    #[arg(long, default_value_t = config::DEFAULT_VERSION,
          value_parser = clap::value_parser!(u8).range(1..=40))]
    qr_version: u8,

    /// Hex-encode the file first and use alphanumeric QR capacity
    #[arg(long)]
    hex: bool,

    /// Number of encoder threads
    #[arg(long, default_value_t = 1)]
    jobs: usize,

    /// Print the split plan without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "qrsplit=debug" } else { "qrsplit=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), QrSplitError> {
    let config = SplitConfig {
        output_dir: cli.output_dir,
        version: cli.qr_version,
        hex: cli.hex,
        jobs: cli.jobs,
        ..SplitConfig::new(cli.file)
    };
    let orchestrator = Orchestrator::new(config);

    if cli.dry_run {
        let report = orchestrator.dry_run()?;
        print_report("Would write", &report);
        return Ok(());
    }

    let report = orchestrator.run()?;
    print_report("Wrote", &report);
    Ok(())
}

/// Print a human-readable run summary to stdout
fn print_report(verb: &str, report: &RunReport) {
    println!("{} {} QR image(s)", verb, report.chunks);
    println!("  Input size: {} bytes", report.input_bytes);
    println!(
        "  Mode: {} ({} bytes encoded)",
        report.plan.mode, report.effective_bytes
    );
    println!(
        "  QR version: {} (level L, {} bytes per symbol)",
        report.plan.version, report.plan.split_size_bytes
    );
    if let (Some(first), Some(last)) = (report.outputs.first(), report.outputs.last()) {
        println!("  Files: {} .. {}", first.display(), last.display());
    }
}
