//! Logging setup: console plus a daily rotated log file.

use anyhow::{Context as _, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::prelude::*;
use ts3rbl::{LogLevel, LogParams};

/// Crates whose records follow the configured level
const BOT_TARGETS: [&str; 5] = ["ts3rbl", "ts3rbl_core", "ts3rbl_query", "ts3rbl_rbl", "ts3rbl_cli"];

/// Rotated files kept on disk
const MAX_LOG_FILES: usize = 14;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Install the global subscriber for the bot.
///
/// Without a configured level everything from the bot's own crates is kept.
pub fn init(params: &LogParams) -> Result<()> {
    let level = params.log_level.map_or(LevelFilter::TRACE, LogLevel::filter);
    let (dir, prefix) = split_log_path(&params.log_file);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix.to_string_lossy().into_owned())
        .max_log_files(MAX_LOG_FILES)
        .build(&dir)
        .with_context(|| format!("cannot open log file in {}", dir.display()))?;

    let console = tracing_subscriber::fmt::layer().with_timer(ChronoLocal::new(TIME_FORMAT.to_string()));
    let file = tracing_subscriber::fmt::layer()
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_writer(appender)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(targets(level))
        .with(console)
        .with(file)
        .try_init()
        .context("logging already initialized")?;

    if params.log_level.is_none() {
        warn!("logLevel is not set, logging at trace level");
    }
    Ok(())
}

/// Console-only logging for the auxiliary commands
pub fn init_console(verbose: bool) -> Result<()> {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    tracing_subscriber::registry()
        .with(targets(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("logging already initialized")
}

/// Bot crates at `level`, everything else at warn
fn targets(level: LevelFilter) -> Targets {
    Targets::new()
        .with_default(LevelFilter::WARN)
        .with_targets(BOT_TARGETS.iter().map(|target| (*target, level)))
}

fn split_log_path(path: &Path) -> (PathBuf, OsString) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let prefix = path
        .file_name()
        .map_or_else(|| OsString::from("ts3rbl.log"), ToOwned::to_owned);
    (dir, prefix)
}
