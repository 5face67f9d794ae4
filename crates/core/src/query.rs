use crate::{
    now_utc_rfc3339, FilesystemStatError, FilesystemStats, FreeSpaceReport, PathResolver,
    StatsProvider, StorageTarget, REPORT_SCHEMA_VERSION,
};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Free space lookup for a storage target.
///
/// Holds no state besides its two collaborators; every call resolves the
/// root and stats the filesystem again.
#[derive(Debug, Clone)]
pub struct FreeSpaceQuery<R, P> {
    resolver: R,
    provider: P,
}

impl<R: PathResolver, P: StatsProvider> FreeSpaceQuery<R, P> {
    pub fn new(resolver: R, provider: P) -> Self {
        Self { resolver, provider }
    }

    /// Bytes available to unprivileged callers on the target's filesystem.
    pub fn available_space(&self, target: StorageTarget) -> Result<u64, FilesystemStatError> {
        let (_, stats) = self.stat_target(target)?;
        stats.available_bytes()
    }

    pub fn inspect(&self, target: StorageTarget) -> Result<FreeSpaceReport, FilesystemStatError> {
        let (path, stats) = self.stat_target(target)?;
        let available_bytes = stats.available_bytes()?;
        Ok(FreeSpaceReport {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            target,
            path,
            available_blocks: stats.available_blocks,
            block_size: stats.block_size,
            counter_width: stats.width,
            available_bytes,
            queried_at_utc: now_utc_rfc3339(),
        })
    }

    fn stat_target(
        &self,
        target: StorageTarget,
    ) -> Result<(PathBuf, FilesystemStats), FilesystemStatError> {
        let path = match self.resolver.resolve(target)? {
            Some(path) => path,
            None => {
                warn!(%target, "storage root unavailable");
                return Err(FilesystemStatError::Unavailable { target });
            }
        };
        let stats = self.provider.stats(&path).map_err(|err| {
            warn!(%target, path = %path.display(), error = %err, "filesystem stat failed");
            err
        })?;
        debug!(
            %target,
            path = %path.display(),
            available_blocks = stats.available_blocks,
            block_size = stats.block_size,
            width = ?stats.width,
            "filesystem stats"
        );
        Ok((path, stats))
    }
}
