pub const DEFAULT_QUALITY: u8 = 70;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Extensions picked up by the scanner, compared case-insensitively.
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

pub const BYTES_PER_KB: f64 = 1024.0;
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
pub const PROGRESS_BAR_CHARS: &str = "=>-";

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";
pub const INFO_PREFIX: &str = "📋";
pub const SIZE_PREFIX: &str = "📊";
