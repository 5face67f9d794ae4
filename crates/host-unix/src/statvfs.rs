use freespace_core::{CounterWidth, FilesystemStatError, FilesystemStats};
use std::ffi::CString;
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

// macOS `statvfs` has 32-bit counters and rescales f_frsize to fit them;
// `statfs` reports f_bavail as u64 in f_bsize units.
#[cfg(target_os = "macos")]
pub fn counter_width() -> CounterWidth {
    CounterWidth::Wide
}

#[cfg(target_os = "macos")]
pub fn query(path: &Path) -> Result<FilesystemStats, FilesystemStatError> {
    let c_path = c_path(path)?;
    let mut stats = MaybeUninit::<libc::statfs>::zeroed();
    let result = unsafe { libc::statfs(c_path.as_ptr(), stats.as_mut_ptr()) };
    if result != 0 {
        return Err(FilesystemStatError::from_io(path, io::Error::last_os_error()));
    }
    let stats = unsafe { stats.assume_init() };
    Ok(FilesystemStats {
        available_blocks: stats.f_bavail,
        block_size: u64::from(stats.f_bsize),
        width: counter_width(),
    })
}

// 32-bit Linux and Android: the LFS variant carries 64-bit counters.
#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    target_pointer_width = "32",
    not(target_env = "musl")
))]
pub fn counter_width() -> CounterWidth {
    CounterWidth::Wide
}

#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    target_pointer_width = "32",
    not(target_env = "musl")
))]
pub fn query(path: &Path) -> Result<FilesystemStats, FilesystemStatError> {
    let c_path = c_path(path)?;
    let mut stats = MaybeUninit::<libc::statvfs64>::zeroed();
    let result = unsafe { libc::statvfs64(c_path.as_ptr(), stats.as_mut_ptr()) };
    if result != 0 {
        return Err(FilesystemStatError::from_io(path, io::Error::last_os_error()));
    }
    let stats = unsafe { stats.assume_init() };
    Ok(FilesystemStats {
        available_blocks: stats.f_bavail as u64,
        block_size: fragment_size(stats.f_frsize as u64, stats.f_bsize as u64),
        width: counter_width(),
    })
}

#[cfg(not(any(
    target_os = "macos",
    all(
        any(target_os = "linux", target_os = "android"),
        target_pointer_width = "32",
        not(target_env = "musl")
    )
)))]
pub fn counter_width() -> CounterWidth {
    CounterWidth::from_counter_bytes(std::mem::size_of::<libc::fsblkcnt_t>())
}

#[cfg(not(any(
    target_os = "macos",
    all(
        any(target_os = "linux", target_os = "android"),
        target_pointer_width = "32",
        not(target_env = "musl")
    )
)))]
pub fn query(path: &Path) -> Result<FilesystemStats, FilesystemStatError> {
    let c_path = c_path(path)?;
    let mut stats = MaybeUninit::<libc::statvfs>::zeroed();
    let result = unsafe { libc::statvfs(c_path.as_ptr(), stats.as_mut_ptr()) };
    if result != 0 {
        return Err(FilesystemStatError::from_io(path, io::Error::last_os_error()));
    }
    let stats = unsafe { stats.assume_init() };
    Ok(FilesystemStats {
        available_blocks: stats.f_bavail as u64,
        block_size: fragment_size(stats.f_frsize as u64, stats.f_bsize as u64),
        width: counter_width(),
    })
}

fn c_path(path: &Path) -> Result<CString, FilesystemStatError> {
    CString::new(path.as_os_str().as_bytes()).map_err(|_| FilesystemStatError::InvalidPath {
        path: path.to_path_buf(),
    })
}

/// f_bavail counts fragments; some filesystems leave f_frsize unset.
#[cfg_attr(target_os = "macos", allow(dead_code))]
pub fn fragment_size(frsize: u64, bsize: u64) -> u64 {
    if frsize != 0 {
        frsize
    } else {
        bsize
    }
}
