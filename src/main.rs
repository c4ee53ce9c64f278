use anyhow::{Context, Result};
use clap::Parser;
use jpeg_batch::cli::Args;
use jpeg_batch::constants::INFO_PREFIX;
use jpeg_batch::report::{format_file_size, ConsoleReporter};
use jpeg_batch::{info, logger, scan, JpegCodec, OutputMode, Scheduler};
use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    logger::configure(args.quiet, args.verbose);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            jpeg_batch::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let options = args
        .to_run_options()
        .context("Invalid configuration, nothing was processed")?;

    info!("🚀 Starting batch compression...");
    info!("📁 Root: {}", args.root.display());
    match &options.output {
        OutputMode::InPlace => {
            jpeg_batch::warn!("No --output given: files will be overwritten in place");
        }
        OutputMode::Directory { output_dir, .. } => {
            info!("📁 Output: {}", output_dir.display());
        }
    }

    let outcome = scan(&args.root, &options.scan)
        .with_context(|| format!("Failed to scan {}", args.root.display()))?;

    let total_bytes: u64 = outcome
        .paths
        .iter()
        .filter_map(|path| fs::metadata(path).ok())
        .map(|metadata| metadata.len())
        .sum();
    info!(
        "{} Found {} images ({})",
        INFO_PREFIX,
        outcome.paths.len(),
        format_file_size(total_bytes)
    );
    jpeg_batch::verbose!(
        "Batch size {}, {} workers, quality {}",
        options.batch.batch_size,
        options.batch.worker_count,
        options.batch.quality
    );

    let scheduler = Scheduler::new(JpegCodec, options.batch, options.output.clone());
    let mut reporter = ConsoleReporter::new(outcome.paths.len(), logger::is_quiet());
    let report = scheduler.run(&outcome.paths, &mut reporter)?;
    reporter.finish(&report);

    if !outcome.diagnostics.is_empty() {
        jpeg_batch::warn!(
            "{} director{} could not be read and were skipped",
            outcome.diagnostics.len(),
            if outcome.diagnostics.len() == 1 { "y" } else { "ies" }
        );
    }

    if options.strict && (report.failed() > 0 || !outcome.diagnostics.is_empty()) {
        jpeg_batch::error!(
            "Strict mode: {} failed files, {} unreadable directories",
            report.failed(),
            outcome.diagnostics.len()
        );
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
