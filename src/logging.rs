use std::io;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn build_filter(verbose: u8, quiet: bool) -> EnvFilter {
    // An explicit -v/-q wins over RUST_LOG.
    if verbose == 0 && !quiet {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        EnvFilter::new(level_for(verbose, quiet))
    }
}

pub fn init_stderr(verbose: u8, quiet: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose, quiet))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Logs to `path` instead of the terminal, for full-screen sessions.
///
/// The returned guard flushes the background writer on drop; keep it alive
/// until the program exits.
pub fn init_file(verbose: u8, quiet: bool, path: &Path) -> Result<WorkerGuard> {
    let dir = path
        .parent()
        .ok_or_else(|| anyhow!("log file path has no parent directory"))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("invalid log file name {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose, quiet))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}
