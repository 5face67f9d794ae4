use anyhow::{Context, Result};
use freespace_core::{FilesystemStatError, PathResolver, StorageTarget};
use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const EXTERNAL_ROOT_ENV: &str = "FREESPACE_EXTERNAL_ROOT";
pub const INTERNAL_ROOT_ENV: &str = "FREESPACE_INTERNAL_ROOT";

/// Root directory overrides. Unset roots use the platform lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RootConfig {
    pub external_root: Option<PathBuf>,
    pub internal_root: Option<PathBuf>,
}

impl RootConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml(&data).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_toml(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Environment variables win over values read from a file.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var_os(name));
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<OsString>) {
        if let Some(root) = lookup(EXTERNAL_ROOT_ENV).filter(|value| !value.is_empty()) {
            self.external_root = Some(PathBuf::from(root));
            debug!("Applied env override for external root");
        }
        if let Some(root) = lookup(INTERNAL_ROOT_ENV).filter(|value| !value.is_empty()) {
            self.internal_root = Some(PathBuf::from(root));
            debug!("Applied env override for internal root");
        }
    }

    pub fn root(&self, target: StorageTarget) -> Option<&Path> {
        match target {
            StorageTarget::External => self.external_root.as_deref(),
            StorageTarget::Internal => self.internal_root.as_deref(),
        }
    }
}

/// Resolver that answers from a [`RootConfig`] first and defers to
/// `fallback` for targets the config leaves unset.
#[derive(Debug, Clone)]
pub struct ConfiguredResolver<R> {
    config: RootConfig,
    fallback: R,
}

impl<R: PathResolver> ConfiguredResolver<R> {
    pub fn new(config: RootConfig, fallback: R) -> Self {
        Self { config, fallback }
    }
}

impl<R: PathResolver> PathResolver for ConfiguredResolver<R> {
    fn resolve(&self, target: StorageTarget) -> Result<Option<PathBuf>, FilesystemStatError> {
        if let Some(root) = self.config.root(target) {
            debug!(%target, root = %root.display(), "using configured storage root");
            return Ok(Some(root.to_path_buf()));
        }
        self.fallback.resolve(target)
    }
}
