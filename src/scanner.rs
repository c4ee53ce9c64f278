use crate::constants::JPEG_EXTENSIONS;
use crate::error::{CompressionError, Result};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What to do when part of the tree cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanErrorPolicy {
    /// Abandon the unreadable subtree, record a diagnostic and keep going.
    #[default]
    Skip,
    /// Abort the whole scan on the first traversal error.
    FailFast,
}

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub policy: ScanErrorPolicy,
    /// Glob patterns matched against paths relative to the scan root.
    pub exclude: Vec<Pattern>,
    /// Directory never descended into, typically the output directory.
    pub prune: Option<PathBuf>,
}

impl ScanOptions {
    pub fn with_excludes<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let compiled =
                Pattern::new(pattern).map_err(|e| CompressionError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.msg.to_string(),
                })?;
            self.exclude.push(compiled);
        }
        Ok(self)
    }

    fn is_excluded(&self, relative: &Path) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_path_with(relative, options))
    }
}

/// A part of the tree that could not be traversed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDiagnostic {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Candidate files in traversal order.
    pub paths: Vec<PathBuf>,
    pub diagnostics: Vec<ScanDiagnostic>,
}

pub fn is_jpeg_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            JPEG_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}

/// Recursively collects every `.jpg`/`.jpeg` file under `root`.
///
/// Traversal errors are never dropped: under [`ScanErrorPolicy::Skip`] they
/// become [`ScanDiagnostic`]s, under [`ScanErrorPolicy::FailFast`] the first
/// one is returned as [`CompressionError::Scan`]. A missing or non-directory
/// root is always fatal.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<ScanOutcome> {
    if !root.is_dir() {
        return Err(CompressionError::Scan {
            path: root.to_path_buf(),
            reason: "not a readable directory".to_string(),
        });
    }

    let prune = options
        .prune
        .as_ref()
        .map(|dir| dir.canonicalize().unwrap_or_else(|_| dir.clone()));

    let mut outcome = ScanOutcome::default();

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        let Some(prune) = &prune else {
            return true;
        };
        if !entry.file_type().is_dir() || entry.depth() == 0 {
            return true;
        }
        entry
            .path()
            .canonicalize()
            .map(|canonical| &canonical != prune)
            .unwrap_or(true)
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                let reason = err
                    .io_error()
                    .map(|io| io.to_string())
                    .unwrap_or_else(|| err.to_string());

                if err.depth() == 0 || options.policy == ScanErrorPolicy::FailFast {
                    return Err(CompressionError::Scan { path, reason });
                }

                crate::warn!("Skipping {}: {}", path.display(), reason);
                outcome.diagnostics.push(ScanDiagnostic { path, reason });
                continue;
            }
        };

        if !entry.path().is_file() || !is_jpeg_file(entry.path()) {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if options.is_excluded(relative) {
            crate::verbose!("Excluded {}", entry.path().display());
            continue;
        }

        outcome.paths.push(entry.into_path());
    }

    Ok(outcome)
}
