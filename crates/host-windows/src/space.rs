use freespace_core::FilesystemStatError;
use std::io;
use std::path::Path;
use tracing::debug;
use windows::core::PCWSTR;
use windows::Win32::Foundation::MAX_PATH;
use windows::Win32::Storage::FileSystem::{
    GetDiskFreeSpaceExW, GetDiskFreeSpaceW, GetVolumePathNameW,
};

/// Bytes available to the caller and the cluster size (0 when unknown).
pub fn free_space(path: &Path) -> Result<(u64, u64), FilesystemStatError> {
    let wide = wide(path)?;
    let mut free = 0u64;
    unsafe { GetDiskFreeSpaceExW(PCWSTR(wide.as_ptr()), Some(&mut free), None, None) }
        .map_err(|err| FilesystemStatError::from_io(path, io::Error::from(err)))?;
    Ok((free, cluster_size(path, &wide)))
}

fn cluster_size(path: &Path, wide: &[u16]) -> u64 {
    // GetDiskFreeSpaceW wants the volume root, not an arbitrary directory
    let root = match volume_root(wide) {
        Ok(root) => root,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "volume root lookup failed");
            return 0;
        }
    };
    let mut sectors_per_cluster = 0u32;
    let mut bytes_per_sector = 0u32;
    let result = unsafe {
        GetDiskFreeSpaceW(
            PCWSTR(root.as_ptr()),
            Some(&mut sectors_per_cluster),
            Some(&mut bytes_per_sector),
            None,
            None,
        )
    };
    match result {
        Ok(()) => u64::from(sectors_per_cluster) * u64::from(bytes_per_sector),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "cluster geometry unavailable");
            0
        }
    }
}

fn volume_root(wide: &[u16]) -> windows::core::Result<Vec<u16>> {
    let mut buffer = vec![0u16; MAX_PATH as usize + 1];
    unsafe { GetVolumePathNameW(PCWSTR(wide.as_ptr()), &mut buffer) }?;
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len() - 1);
    buffer.truncate(len);
    buffer.push(0);
    Ok(buffer)
}

fn wide(path: &Path) -> Result<Vec<u16>, FilesystemStatError> {
    use std::os::windows::prelude::*;
    let wide: Vec<u16> = path.as_os_str().encode_wide().collect();
    if wide.contains(&0) {
        return Err(FilesystemStatError::InvalidPath {
            path: path.to_path_buf(),
        });
    }
    Ok(wide.into_iter().chain(std::iter::once(0)).collect())
}
