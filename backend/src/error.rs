//! Error taxonomy shared by every layer of the record store.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EffortLoggerError>;

#[derive(Debug, Error)]
pub enum EffortLoggerError {
    /// A file or directory expected on read is missing.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Registration conflict or first-write-wins creation lost the race.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Underlying read/write failure.
    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Timer or planning-poker round used out of order.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Stored content could not be decoded.
    #[error("decode failure: {0}")]
    Decode(String),

    /// Caller-supplied value rejected before touching storage.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl EffortLoggerError {
    /// Maps an I/O error on `path`, turning `NotFound` into the typed variant.
    pub fn io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => EffortLoggerError::NotFound(path.to_path_buf()),
            io::ErrorKind::AlreadyExists => {
                EffortLoggerError::AlreadyExists(path.display().to_string())
            }
            _ => EffortLoggerError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_is_typed() {
        let err = EffortLoggerError::io(
            Path::new("missing.txt"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, EffortLoggerError::NotFound(p) if p == Path::new("missing.txt")));
    }

    #[test]
    fn test_io_other_kind_keeps_source() {
        let err = EffortLoggerError::io(
            Path::new("locked.txt"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, EffortLoggerError::Io { .. }));
        assert!(err.to_string().contains("locked.txt"));
    }
}
