//! Human-readable output for a run.
//!
//! The `format_*` functions are pure; [`ConsoleReporter`] feeds them to the
//! terminal through an `indicatif` progress bar.

use crate::batch::{BatchSummary, RunObserver, RunReport};
use crate::constants::{
    BYTES_PER_KB, BYTES_PER_MB, ERROR_PREFIX, PROGRESS_BAR_CHARS, PROGRESS_BAR_TEMPLATE,
    SIZE_PREFIX, SUCCESS_PREFIX, WARNING_PREFIX,
};
use crate::worker::{CompressionResult, Outcome};
use indicatif::{ProgressBar, ProgressStyle};

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 KB")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Calculate compression ratio as a percentage
///
/// Positive means the output is smaller, negative means it grew.
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

fn kb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_KB
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

pub fn format_file_line(result: &CompressionResult) -> String {
    match &result.outcome {
        Outcome::Success => format!(
            "Compressed: {} | Before: {:.2} KB | After: {:.2} KB | Reduction: {:.2} KB",
            result.path.display(),
            kb(result.before_size),
            kb(result.after_size),
            kb(result.before_size) - kb(result.after_size)
        ),
        Outcome::Failure { reason, .. } => format!(
            "{} Error compressing {}: {}",
            ERROR_PREFIX,
            result.path.display(),
            reason
        ),
    }
}

pub fn format_batch_line(summary: &BatchSummary) -> String {
    let mut line = format!(
        "Batch {} processed. ({}/{}, {} files",
        summary.index, summary.index, summary.batch_count, summary.processed
    );
    if summary.failed > 0 {
        line.push_str(&format!(", {} failed", summary.failed));
    }
    line.push(')');
    line
}

pub fn format_summary(report: &RunReport) -> Vec<String> {
    let totals = &report.totals;
    let before_mb = mb(totals.total_before_bytes);
    let after_mb = mb(totals.total_after_bytes);

    let mut lines = vec![
        String::new(),
        format!("{} Total Size Before Compression: {:.2} MB", SIZE_PREFIX, before_mb),
        format!("{} Total Size After Compression: {:.2} MB", SIZE_PREFIX, after_mb),
        format!(
            "{} Total Size Reduction: {:.2} MB ({:.1}%)",
            SIZE_PREFIX,
            before_mb - after_mb,
            calculate_compression_ratio(totals.total_before_bytes, totals.total_after_bytes)
        ),
        format!(
            "{} Compressed {} of {} files in {} batches ({:.2?})",
            SUCCESS_PREFIX, report.succeeded, report.processed, report.batches, report.elapsed
        ),
    ];

    if report.failed() > 0 {
        lines.push(format!(
            "{}  Failed files: {}",
            WARNING_PREFIX,
            report.failed()
        ));
        for failure in &report.failures {
            lines.push(format!(
                "  {}: {}",
                failure.path.display(),
                failure.failure_reason().unwrap_or_default()
            ));
        }
    }

    if report.cancelled {
        lines.push(format!(
            "{}  Run cancelled; remaining batches were skipped",
            WARNING_PREFIX
        ));
    }

    lines
}

/// Prints per-file and per-batch lines to stdout, with a progress bar
/// underneath when attached to a terminal. Failure lines print even when quiet.
pub struct ConsoleReporter {
    bar: ProgressBar,
}

impl ConsoleReporter {
    pub fn new(total_files: usize, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(total_files as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(PROGRESS_BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars(PROGRESS_BAR_CHARS),
            );
            bar
        };
        Self { bar }
    }

    pub fn finish(&self, report: &RunReport) {
        self.bar.finish_and_clear();
        if crate::logger::is_quiet() {
            return;
        }
        for line in format_summary(report) {
            println!("{}", line);
        }
    }
}

impl RunObserver for ConsoleReporter {
    fn file_completed(&mut self, result: &CompressionResult) {
        if !result.is_success() || !crate::logger::is_quiet() {
            let line = format_file_line(result);
            self.bar.suspend(|| println!("{}", line));
        }
        self.bar.inc(1);
    }

    fn batch_completed(&mut self, summary: &BatchSummary) {
        if !crate::logger::is_quiet() {
            self.bar.suspend(|| println!("{}", format_batch_line(summary)));
        }
        self.bar
            .set_message(format!("batch {}/{}", summary.index, summary.batch_count));
    }
}
