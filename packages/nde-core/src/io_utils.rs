//! I/O utilities for opening table sources.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::NdeError;

/// Classifies I/O errors raised while opening or reading a source file.
///
/// Transient kinds are reported separately so [`retry_io_operation`] can
/// decide whether another attempt makes sense.
pub fn classify_io_error(error: std::io::Error, path: &Path) -> IoFailure {
    let err = NdeError::IoUnavailable {
        path: path.display().to_string(),
        message: error.to_string(),
    };
    match error.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted => {
            IoFailure::Transient(err)
        }
        _ => IoFailure::Permanent(err),
    }
}

/// Outcome of a failed I/O attempt.
#[derive(Debug)]
pub enum IoFailure {
    /// May succeed on retry
    Transient(NdeError),
    /// Retrying will not help
    Permanent(NdeError),
}

impl IoFailure {
    fn into_error(self) -> NdeError {
        match self {
            IoFailure::Transient(e) | IoFailure::Permanent(e) => e,
        }
    }
}

/// Retries an operation that may fail with transient I/O errors.
pub fn retry_io_operation<F, T>(
    operation: F,
    max_retries: u32,
    retry_delay_ms: u64,
    context: &str,
) -> Result<T, NdeError>
where
    F: Fn() -> Result<T, IoFailure>,
{
    let mut attempt = 0;
    loop {
        match operation() {
            Ok(result) => return Ok(result),
            Err(IoFailure::Transient(err)) if attempt < max_retries => {
                attempt += 1;
                tracing::warn!(
                    "Transient I/O error in {} (attempt {}/{}): {}",
                    context,
                    attempt,
                    max_retries,
                    err
                );
                if retry_delay_ms > 0 {
                    std::thread::sleep(std::time::Duration::from_millis(retry_delay_ms));
                }
            }
            Err(failure) => return Err(failure.into_error()),
        }
    }
}

/// Opens a file for reading, retrying transient failures.
pub fn open_source(path: &Path, max_retries: u32, retry_delay_ms: u64) -> Result<File, NdeError> {
    retry_io_operation(
        || File::open(path).map_err(|e| classify_io_error(e, path)),
        max_retries,
        retry_delay_ms,
        &format!("open {}", path.display()),
    )
}
