use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_QUALITY, DEFAULT_WORKER_COUNT, MAX_QUALITY, MIN_QUALITY,
};
use crate::error::{CompressionError, Result};
use crate::scanner::ScanOptions;
use std::path::{Path, PathBuf};

/// Immutable parameters for one run, validated once before any work begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    pub batch_size: usize,
    pub worker_count: usize,
    pub quality: u8,
}

impl BatchConfig {
    pub fn new(
        batch_size: Option<usize>,
        worker_count: Option<usize>,
        quality: Option<u8>,
    ) -> Result<Self> {
        let batch_size = batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(CompressionError::InvalidBatchSize(batch_size));
        }

        let worker_count = worker_count.unwrap_or(DEFAULT_WORKER_COUNT);
        if worker_count == 0 {
            return Err(CompressionError::InvalidWorkerCount(worker_count));
        }

        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(CompressionError::InvalidQuality(quality));
        }

        Ok(Self {
            batch_size,
            worker_count,
            quality,
        })
    }

    /// Number of batches a run over `total_files` paths will execute.
    pub fn batch_count(&self, total_files: usize) -> usize {
        total_files.div_ceil(self.batch_size)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            worker_count: DEFAULT_WORKER_COUNT,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Where re-encoded files are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Replace each source file, via a temporary file and an atomic rename.
    #[default]
    InPlace,
    /// Mirror each file's path relative to `root` under `output_dir`.
    Directory { root: PathBuf, output_dir: PathBuf },
}

impl OutputMode {
    pub fn from_output(root: &Path, output_dir: Option<PathBuf>) -> Self {
        match output_dir {
            Some(output_dir) => OutputMode::Directory {
                root: root.to_path_buf(),
                output_dir,
            },
            None => OutputMode::InPlace,
        }
    }

    pub fn is_in_place(&self) -> bool {
        matches!(self, OutputMode::InPlace)
    }

    /// Destination for `input`. Files outside `root` keep their file name only.
    pub fn destination_for(&self, input: &Path) -> Result<PathBuf> {
        match self {
            OutputMode::InPlace => Ok(input.to_path_buf()),
            OutputMode::Directory { root, output_dir } => {
                let relative = match input.strip_prefix(root) {
                    Ok(relative) => relative.to_path_buf(),
                    Err(_) => PathBuf::from(input.file_name().ok_or_else(|| {
                        CompressionError::Encode(format!(
                            "Invalid file name: {}",
                            input.display()
                        ))
                    })?),
                };
                Ok(output_dir.join(relative))
            }
        }
    }
}

/// Everything a run needs besides the root directory.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub batch: BatchConfig,
    pub output: OutputMode,
    pub scan: ScanOptions,
    /// Escalate per-item failures and scan diagnostics to a failing exit code.
    pub strict: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_config_defaults() {
        let config = BatchConfig::new(None, None, None).unwrap();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.quality, 70);
        assert_eq!(config, BatchConfig::default());
    }

    #[test]
    fn test_batch_config_invalid_values() {
        assert!(matches!(
            BatchConfig::new(Some(0), None, None),
            Err(CompressionError::InvalidBatchSize(0))
        ));
        assert!(matches!(
            BatchConfig::new(None, Some(0), None),
            Err(CompressionError::InvalidWorkerCount(0))
        ));
        assert!(matches!(
            BatchConfig::new(None, None, Some(0)),
            Err(CompressionError::InvalidQuality(0))
        ));
        assert!(matches!(
            BatchConfig::new(None, None, Some(101)),
            Err(CompressionError::InvalidQuality(101))
        ));
    }

    #[test]
    fn test_batch_count() {
        let config = BatchConfig::new(Some(2), Some(1), None).unwrap();
        assert_eq!(config.batch_count(0), 0);
        assert_eq!(config.batch_count(1), 1);
        assert_eq!(config.batch_count(4), 2);
        assert_eq!(config.batch_count(5), 3);
    }

    #[test]
    fn test_destination_in_place() {
        let mode = OutputMode::default();
        let input = Path::new("/photos/a/b.jpg");
        assert_eq!(mode.destination_for(input).unwrap(), input);
    }

    #[test]
    fn test_destination_mirrors_relative_path() {
        let mode = OutputMode::from_output(Path::new("/photos"), Some(PathBuf::from("/out")));
        let dest = mode.destination_for(Path::new("/photos/2023/trip/img.JPG")).unwrap();
        assert_eq!(dest, PathBuf::from("/out/2023/trip/img.JPG"));
    }

    #[test]
    fn test_destination_outside_root_uses_file_name() {
        let mode = OutputMode::from_output(Path::new("/photos"), Some(PathBuf::from("/out")));
        let dest = mode.destination_for(Path::new("/elsewhere/img.jpg")).unwrap();
        assert_eq!(dest, PathBuf::from("/out/img.jpg"));
    }
}
