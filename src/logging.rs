use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Log level for this crate at a given `-v` count
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Send log output to `path`, appending.
///
/// The terminal belongs to the dashboard, so nothing is written to stderr.
/// `RUST_LOG`, when set, replaces the `-v` based filter entirely.
pub fn init_logging(verbosity: u8, path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let mut builder = Builder::from_env(Env::default().filter_or("RUST_LOG", "warn"));
    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_module("tui_covid", level_for(verbosity));
    }
    builder
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                buf.timestamp_seconds(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .context("logger already initialised")
}
