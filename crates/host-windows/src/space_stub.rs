use freespace_core::FilesystemStatError;
use std::io;
use std::path::Path;

pub fn free_space(path: &Path) -> Result<(u64, u64), FilesystemStatError> {
    Err(FilesystemStatError::StatFailed {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::Unsupported, "free space query requires Windows"),
    })
}
