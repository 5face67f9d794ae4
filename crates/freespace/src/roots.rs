use freespace_core::{FilesystemStatError, PathResolver, StorageTarget};
use std::path::PathBuf;

/// Storage roots as the host platform defines them.
///
/// Android: `EXTERNAL_STORAGE` (default `/sdcard`) and `ANDROID_DATA`
/// (default `/data`). Elsewhere: the user's home directory and the
/// platform data directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformResolver;

impl PathResolver for PlatformResolver {
    fn resolve(&self, target: StorageTarget) -> Result<Option<PathBuf>, FilesystemStatError> {
        Ok(platform_root(target))
    }
}

#[cfg(target_os = "android")]
fn platform_root(target: StorageTarget) -> Option<PathBuf> {
    match target {
        StorageTarget::External => Some(env_root("EXTERNAL_STORAGE", "/sdcard")),
        StorageTarget::Internal => Some(env_root("ANDROID_DATA", "/data")),
    }
}

#[cfg(target_os = "android")]
fn env_root(var: &str, default: &str) -> PathBuf {
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

#[cfg(not(target_os = "android"))]
fn platform_root(target: StorageTarget) -> Option<PathBuf> {
    match target {
        StorageTarget::External => dirs::home_dir(),
        StorageTarget::Internal => dirs::data_dir(),
    }
}
