use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use freespace::{format_bytes, host_query, HostQuery, RootConfig, StorageTarget};
use freespace_guard::{check_free_space, SpaceRequest};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "freespace", version, about = "Free space on external or internal storage")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print free bytes on the selected storage root
    Query {
        #[command(flatten)]
        storage: StorageArgs,
        /// Print as GB/MB/KB
        #[arg(long, conflicts_with = "json")]
        human: bool,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
        #[arg(long, requires = "json")]
        pretty: bool,
    },
    /// Fail when the storage root cannot hold the requested bytes
    Check {
        #[command(flatten)]
        storage: StorageArgs,
        #[arg(long)]
        required: u64,
        #[arg(long, default_value_t = 0)]
        reserve: u64,
    },
}

#[derive(Debug, Args)]
struct StorageArgs {
    #[arg(long, value_enum, default_value_t = TargetArg::Internal)]
    target: TargetArg,
    /// TOML file with external_root / internal_root overrides
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetArg {
    External,
    Internal,
}

impl From<TargetArg> for StorageTarget {
    fn from(value: TargetArg) -> Self {
        match value {
            TargetArg::External => StorageTarget::External,
            TargetArg::Internal => StorageTarget::Internal,
        }
    }
}

impl StorageArgs {
    fn query(&self) -> Result<HostQuery> {
        let mut config = match &self.config {
            Some(path) => RootConfig::load(path)?,
            None => RootConfig::default(),
        };
        config.apply_env_overrides();
        Ok(host_query(config))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let output = run(cli)?;
    println!("{}", output);
    Ok(())
}

/// Executes one command and returns what it prints on stdout.
fn run(cli: Cli) -> Result<String> {
    match cli.command {
        Command::Query {
            storage,
            human,
            json,
            pretty,
        } => run_query(&storage, human, json, pretty),
        Command::Check {
            storage,
            required,
            reserve,
        } => run_check(&storage, required, reserve),
    }
}

fn run_query(storage: &StorageArgs, human: bool, json: bool, pretty: bool) -> Result<String> {
    let target = StorageTarget::from(storage.target);
    let query = storage.query()?;
    if json {
        let report = query
            .inspect(target)
            .with_context(|| format!("query {} storage", target))?;
        return Ok(if pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        });
    }
    let bytes = query
        .available_space(target)
        .with_context(|| format!("query {} storage", target))?;
    Ok(if human {
        format_bytes(bytes)
    } else {
        bytes.to_string()
    })
}

fn run_check(storage: &StorageArgs, required: u64, reserve: u64) -> Result<String> {
    let target = StorageTarget::from(storage.target);
    let available = storage
        .query()?
        .available_space(target)
        .with_context(|| format!("query {} storage", target))?;
    info!(%target, available, required, reserve, "checking free space");
    let request = SpaceRequest {
        required_bytes: required,
        reserve_bytes: reserve,
    };
    let headroom = check_free_space(&request, available).ensure()?;
    Ok(format!("ok: {} left after write", format_bytes(headroom)))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use freespace::FreeSpaceReport;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn query_defaults_to_internal() {
        let cli = Cli::try_parse_from(["freespace", "query"]).unwrap();
        match cli.command {
            Command::Query { storage, .. } => {
                assert_eq!(StorageTarget::from(storage.target), StorageTarget::Internal)
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn check_requires_size() {
        assert!(Cli::try_parse_from(["freespace", "check"]).is_err());
        let cli = Cli::try_parse_from([
            "freespace",
            "check",
            "--target",
            "external",
            "--required",
            "4096000",
        ])
        .unwrap();
        match cli.command {
            Command::Check {
                storage, required, ..
            } => {
                assert_eq!(StorageTarget::from(storage.target), StorageTarget::External);
                assert_eq!(required, 4_096_000);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    /// Config file pointing the external root at a fresh temporary directory.
    fn external_root_config() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("freespace.toml");
        std::fs::write(
            &config,
            format!("external_root = '{}'\n", dir.path().display()),
        )
        .unwrap();
        (dir, config)
    }

    fn run_args(args: &[&str]) -> Result<String> {
        run(Cli::try_parse_from(args.iter().copied()).unwrap())
    }

    #[cfg(unix)]
    #[test]
    fn check_refuses_oversized_request() {
        let (_dir, config) = external_root_config();
        let config = config.to_str().unwrap();
        let required = u64::MAX.to_string();
        let err = run_args(&[
            "freespace",
            "check",
            "--target",
            "external",
            "--config",
            config,
            "--required",
            required.as_str(),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("insufficient free space"));
    }

    #[cfg(unix)]
    #[test]
    fn check_accepts_empty_request() {
        let (_dir, config) = external_root_config();
        let output = run_args(&[
            "freespace",
            "check",
            "--target",
            "external",
            "--config",
            config.to_str().unwrap(),
            "--required",
            "0",
        ])
        .unwrap();
        assert!(output.starts_with("ok: "));
    }

    #[cfg(unix)]
    #[test]
    fn query_json_prints_consistent_report() {
        let (dir, config) = external_root_config();
        let output = run_args(&[
            "freespace",
            "query",
            "--target",
            "external",
            "--config",
            config.to_str().unwrap(),
            "--json",
        ])
        .unwrap();
        let report: FreeSpaceReport = serde_json::from_str(&output).unwrap();
        assert_eq!(report.target, StorageTarget::External);
        assert_eq!(report.path, dir.path());
        assert_eq!(
            report.available_bytes,
            report.available_blocks * report.block_size
        );
    }

    #[cfg(unix)]
    #[test]
    fn query_prints_plain_byte_count() {
        let (_dir, config) = external_root_config();
        let output = run_args(&[
            "freespace",
            "query",
            "--target",
            "external",
            "--config",
            config.to_str().unwrap(),
        ])
        .unwrap();
        assert!(output.parse::<u64>().is_ok());
    }

    #[test]
    fn missing_config_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("absent.toml");
        let err = run_args(&["freespace", "query", "--config", config.to_str().unwrap()])
            .unwrap_err();
        assert!(format!("{:#}", err).contains("absent.toml"));
    }

    #[test]
    fn pretty_needs_json() {
        assert!(Cli::try_parse_from(["freespace", "query", "--pretty"]).is_err());
    }
}
