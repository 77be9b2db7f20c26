//! Command-line flags and the optional TOML config file.
//!
//! Precedence is CLI flag, then config file, then built-in default.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::api::DEFAULT_BASE_URL;
use crate::controller::{ControllerSettings, StalePolicy};

const DEFAULT_HISTORY_DAYS: u32 = 120;
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_LOG_FILE: &str = "tui-covid.log";

/// Terminal dashboard of COVID-19 statistics from disease.sh
#[derive(Parser, Debug, Default)]
#[command(name = "tui-covid", version, about)]
pub struct Args {
    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the statistics API
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Days of worldwide history shown in the trend graph
    #[arg(long, value_name = "N")]
    pub history_days: Option<u32>,

    /// Per-request transport timeout in seconds (none by default)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Which response wins when selections overlap
    #[arg(long, value_enum)]
    pub stale_policy: Option<StalePolicy>,

    /// Directory holding Natural Earth GeoJSON files
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Where log output goes while the terminal is in use
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Contents of the config file. Every key is optional.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub history_days: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub stale_policy: Option<StalePolicy>,
    pub data_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Fully resolved runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub history_days: u32,
    pub timeout: Option<Duration>,
    pub stale_policy: StalePolicy,
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub verbosity: u8,
}

impl Settings {
    /// Read the config file named by `args`, if any, and merge it under the
    /// flags.
    pub fn resolve(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file)
    }

    fn merge(args: &Args, file: FileConfig) -> Result<Self> {
        let history_days = args.history_days.or(file.history_days).unwrap_or(DEFAULT_HISTORY_DAYS);
        // A daily delta needs two points
        if history_days < 2 {
            bail!("history days must be at least 2, got {history_days}");
        }

        let timeout = match args.timeout.or(file.timeout_secs) {
            Some(0) => bail!("timeout must be at least one second"),
            secs => secs.map(Duration::from_secs),
        };

        Ok(Self {
            base_url: args
                .base_url
                .clone()
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            history_days,
            timeout,
            stale_policy: args.stale_policy.or(file.stale_policy).unwrap_or_default(),
            data_dir: args
                .data_dir
                .clone()
                .or(file.data_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            log_file: args
                .log_file
                .clone()
                .or(file.log_file)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE)),
            verbosity: args.verbose,
        })
    }

    pub fn controller(&self) -> ControllerSettings {
        ControllerSettings {
            stale_policy: self.stale_policy,
            history_days: self.history_days,
        }
    }
}
