pub mod constants;
pub mod logger;

pub mod batch;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod report;
pub mod scanner;
pub mod worker;

pub use batch::{
    bounded_map, partition, BatchSummary, RunObserver, RunReport, RunTotals, Scheduler,
    SilentObserver,
};
pub use codec::{ImageCodec, JpegCodec};
pub use config::{BatchConfig, OutputMode, RunOptions};
pub use error::{CompressionError, Result};
pub use report::{format_batch_line, format_file_line, format_summary, ConsoleReporter};
pub use scanner::{is_jpeg_file, scan, ScanDiagnostic, ScanErrorPolicy, ScanOptions, ScanOutcome};
pub use worker::{compress, CompressionResult, FailureKind, Outcome};
