use freespace_core::{CounterWidth, FilesystemStatError, FilesystemStats};
use std::io;
use std::path::Path;

pub fn counter_width() -> CounterWidth {
    CounterWidth::Wide
}

pub fn query(path: &Path) -> Result<FilesystemStats, FilesystemStatError> {
    Err(FilesystemStatError::StatFailed {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::Unsupported, "statvfs requires a Unix host"),
    })
}
