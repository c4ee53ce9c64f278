use crate::codec::ImageCodec;
use crate::config::OutputMode;
use crate::error::{CompressionError, Result};
use image::error::{DecodingError, ImageFormatHint};
use image::ImageError;
use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The file is corrupt or not a JPEG. Nothing was written.
    Decode,
    /// The encoder, a write or the final rename failed. The destination is untouched.
    Encode,
    /// The source could not be read.
    Io,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure { kind: FailureKind, reason: String },
}

/// The result of compressing one file. `after_size` is 0 on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    pub path: PathBuf,
    pub before_size: u64,
    pub after_size: u64,
    pub outcome: Outcome,
}

impl CompressionResult {
    pub fn success(path: PathBuf, before_size: u64, after_size: u64) -> Self {
        Self {
            path,
            before_size,
            after_size,
            outcome: Outcome::Success,
        }
    }

    pub fn failure(path: PathBuf, before_size: u64, kind: FailureKind, reason: String) -> Self {
        Self {
            path,
            before_size,
            after_size: 0,
            outcome: Outcome::Failure { kind, reason },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success)
    }

    /// Bytes saved; negative when re-encoding grew the file.
    pub fn reduction(&self) -> i64 {
        self.before_size as i64 - self.after_size as i64
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success => None,
            Outcome::Failure { reason, .. } => Some(reason),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            Outcome::Success => None,
            Outcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    format!("codec panicked: {}", message)
}

fn failure_kind_of(err: &CompressionError) -> FailureKind {
    match err {
        CompressionError::Decode(_) => FailureKind::Decode,
        CompressionError::Encode(_) => FailureKind::Encode,
        _ => FailureKind::Io,
    }
}

/// Re-encodes one file and measures it.
///
/// Never returns an error: every codec or filesystem problem is folded into
/// an [`Outcome::Failure`] so a single bad file cannot abort its batch.
///
/// # Arguments
/// * `codec` - Decoder/encoder to run
/// * `path` - Source file
/// * `quality` - Encoder quality, 1-100
/// * `output` - In-place overwrite or mirrored output directory
pub fn compress<C: ImageCodec + ?Sized>(
    codec: &C,
    path: &Path,
    quality: u8,
    output: &OutputMode,
) -> CompressionResult {
    let before_size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            return CompressionResult::failure(
                path.to_path_buf(),
                0,
                FailureKind::Io,
                format!("Cannot read metadata: {}", e),
            )
        }
    };

    match compress_pipeline(codec, path, quality, output) {
        Ok(after_size) => CompressionResult::success(path.to_path_buf(), before_size, after_size),
        Err(e) => CompressionResult::failure(
            path.to_path_buf(),
            before_size,
            failure_kind_of(&e),
            e.to_string(),
        ),
    }
}

/// decode -> encode to a temporary sibling -> atomic rename over the destination
fn compress_pipeline<C: ImageCodec + ?Sized>(
    codec: &C,
    path: &Path,
    quality: u8,
    output: &OutputMode,
) -> Result<u64> {
    let image = panic::catch_unwind(AssertUnwindSafe(|| codec.decode(path))).map_err(|payload| {
        CompressionError::Decode(ImageError::Decoding(DecodingError::new(
            ImageFormatHint::Unknown,
            panic_message(payload),
        )))
    })??;

    // Past this point every filesystem error is a failed write.
    write_atomically(codec, &image, path, quality, output).map_err(|e| match e {
        CompressionError::Io(io) => CompressionError::Encode(io.to_string()),
        other => other,
    })
}

fn write_atomically<C: ImageCodec + ?Sized>(
    codec: &C,
    image: &C::Image,
    path: &Path,
    quality: u8,
    output: &OutputMode,
) -> Result<u64> {
    // In place, write through symlinks to the file they point at.
    let destination = match output {
        OutputMode::InPlace => fs::canonicalize(path)?,
        OutputMode::Directory { .. } => output.destination_for(path)?,
    };
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !output.is_in_place() {
        fs::create_dir_all(&parent)?;
    }

    // Removed on drop unless persisted, so a failed encode leaves no debris.
    let temp_file = NamedTempFile::new_in(&parent)?;
    panic::catch_unwind(AssertUnwindSafe(|| codec.encode(image, temp_file.path(), quality)))
        .map_err(|payload| CompressionError::Encode(panic_message(payload)))??;

    // Temporary files are created 0600; keep the source's mode instead.
    fs::set_permissions(temp_file.path(), fs::metadata(path)?.permissions())?;

    temp_file.persist(&destination).map_err(|e| {
        CompressionError::Encode(format!(
            "Cannot replace {}: {}",
            destination.display(),
            e.error
        ))
    })?;

    Ok(fs::metadata(&destination)?.len())
}
