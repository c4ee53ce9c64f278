use crate::config::{BatchConfig, OutputMode, RunOptions};
use crate::error::Result;
use crate::scanner::{ScanErrorPolicy, ScanOptions};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "jpeg-batch",
    about = "Re-encode every JPEG under a directory tree, in parallel batches",
    long_about = "jpeg-batch walks a directory tree, finds every .jpg/.jpeg file and re-encodes it \
                  at the chosen quality. Files are processed in fixed-size batches; the files of one \
                  batch run concurrently on a bounded worker pool and the next batch starts only when \
                  the previous one has finished. Per-file and total size reductions are reported.",
    version,
    after_help = "EXAMPLES:\n  \
    jpeg-batch ./photos\n  \
    jpeg-batch ./photos -q 60 -b 50 -j 8\n  \
    jpeg-batch ./photos -o ./photos-small --exclude \"**/raw/*\"\n\n\
    WARNING: without --output every file is overwritten in place."
)]
pub struct Args {
    #[arg(help = "Root directory to scan recursively")]
    pub root: PathBuf,

    #[arg(
        short = 'b',
        long,
        help = "Files per batch (default: 100)",
        long_help = "Number of files submitted to the worker pool at once. \
                     The next batch starts only after every file of the current one is done."
    )]
    pub batch_size: Option<usize>,

    #[arg(
        short = 'j',
        long,
        help = "Concurrent workers per batch (default: 4)"
    )]
    pub workers: Option<usize>,

    #[arg(
        short = 'q',
        long,
        help = "JPEG quality (1-100, default: 70)",
        long_help = "JPEG encoder quality from 1 (smallest files) to 100 (best quality). \
                     Re-encoding at a high quality can make some files larger."
    )]
    pub quality: Option<u8>,

    #[arg(
        short = 'o',
        long,
        help = "Write results under this directory instead of overwriting",
        long_help = "Mirror the input tree under this directory and leave the originals untouched. \
                     Without it, each file is replaced in place via a temporary file and an atomic rename."
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        value_name = "GLOB",
        help = "Skip files matching this pattern (relative to root); repeatable"
    )]
    pub exclude: Vec<String>,

    #[arg(long, help = "Abort when a directory cannot be read (default: skip it)")]
    pub fail_fast: bool,

    #[arg(
        long,
        help = "Exit with an error if any file failed or a directory was skipped"
    )]
    pub strict: bool,

    #[arg(short = 's', long, conflicts_with = "verbose", help = "Only print errors")]
    pub quiet: bool,

    #[arg(short = 'v', long, help = "Print extra detail")]
    pub verbose: bool,
}

impl Args {
    /// Validates every parameter before any file is touched.
    pub fn to_run_options(&self) -> Result<RunOptions> {
        let batch = BatchConfig::new(self.batch_size, self.workers, self.quality)?;

        let policy = if self.fail_fast {
            ScanErrorPolicy::FailFast
        } else {
            ScanErrorPolicy::Skip
        };
        let scan = ScanOptions {
            policy,
            prune: self.output.clone(),
            ..ScanOptions::default()
        }
        .with_excludes(&self.exclude)?;

        Ok(RunOptions {
            batch,
            output: OutputMode::from_output(&self.root, self.output.clone()),
            scan,
            strict: self.strict,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompressionError;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("jpeg-batch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let options = parse(&["./photos"]).to_run_options().unwrap();
        assert_eq!(options.batch, BatchConfig::default());
        assert!(options.output.is_in_place());
        assert_eq!(options.scan.policy, ScanErrorPolicy::Skip);
        assert!(!options.strict);
    }

    #[test]
    fn test_all_flags() {
        let options = parse(&[
            "./photos", "-b", "10", "-j", "2", "-q", "55", "-o", "./out", "--exclude", "raw/*",
            "--fail-fast", "--strict",
        ])
        .to_run_options()
        .unwrap();

        assert_eq!(options.batch, BatchConfig::new(Some(10), Some(2), Some(55)).unwrap());
        assert_eq!(
            options.output,
            OutputMode::Directory {
                root: PathBuf::from("./photos"),
                output_dir: PathBuf::from("./out"),
            }
        );
        assert_eq!(options.scan.exclude.len(), 1);
        assert_eq!(options.scan.prune, Some(PathBuf::from("./out")));
        assert_eq!(options.scan.policy, ScanErrorPolicy::FailFast);
        assert!(options.strict);
    }

    #[test]
    fn test_invalid_quality_rejected() {
        let result = parse(&["./photos", "-q", "0"]).to_run_options();
        assert!(matches!(result, Err(CompressionError::InvalidQuality(0))));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Args::try_parse_from(["jpeg-batch", "./photos", "--quiet", "--verbose"]);
        assert!(result.is_err());
    }
}
