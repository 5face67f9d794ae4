use crate::StorageTarget;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FilesystemStatError {
    #[error("no {target} storage root is available")]
    Unavailable { target: StorageTarget },

    #[error("storage path does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("invalid storage path: {}", path.display())]
    InvalidPath { path: PathBuf },

    #[error("filesystem stat failed for {}: {source}", path.display())]
    StatFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("free space overflows u64: {available_blocks} blocks of {block_size} bytes")]
    Overflow { available_blocks: u64, block_size: u64 },
}

/// Coarse category of a [`FilesystemStatError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unavailable,
    NotFound,
    StatFailed,
}

impl FilesystemStatError {
    /// Builds the error for a failed stat call, mapping a missing path to `NotFound`.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            FilesystemStatError::NotFound { path }
        } else {
            FilesystemStatError::StatFailed { path, source }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FilesystemStatError::Unavailable { .. } => ErrorKind::Unavailable,
            FilesystemStatError::NotFound { .. } => ErrorKind::NotFound,
            FilesystemStatError::InvalidPath { .. }
            | FilesystemStatError::StatFailed { .. }
            | FilesystemStatError::Overflow { .. } => ErrorKind::StatFailed,
        }
    }
}
