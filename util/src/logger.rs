//! Logging setup for the navigation executables
//!
//! Records are written to stdout with coloured level tags, and to the session log file with plain
//! tags so the file stays greppable. Each line is prefixed with the session elapsed time.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::Colorize;
use log::{info, Level};
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Port read/write traces fire on every cycle, so they are capped at this level.
const PORT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Minimum log level must be at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Cannot open the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger is already set: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise logging to stdout and the session's log file.
///
/// `min_level` must be `Info`, `Debug` or `Trace`. Must only be called once.
pub fn logger_init(
    min_level: LevelFilter,
    session: &session::Session
) -> Result<(), LoggerInitError> {

    if min_level < Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level))
    }

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let stdout = fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!(
            "{}",
            format_line(session::get_elapsed_seconds(), record, message, true)
        )))
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!(
            "{}",
            format_line(session::get_elapsed_seconds(), record, message, false)
        )))
        .chain(log_file);

    fern::Dispatch::new()
        .level(min_level)
        .level_for("comms_if::port", min_level.min(PORT_LOG_LEVEL))
        .chain(stdout)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging to {:?} at {:?}", session.log_file_path, min_level);
    info!("Session epoch: {}", session::get_epoch());

    Ok(())
}

/// Parse a log level from the command line, falling back to `Info` for anything unrecognised.
pub fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::Info)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Format one log line. Debug and trace lines carry their target.
fn format_line(
    elapsed_s: f64,
    record: &log::Record,
    message: &std::fmt::Arguments,
    coloured: bool
) -> String {
    let tag = level_tag(record.level(), coloured);

    if record.level() > Level::Info {
        format!("[{:10.6} {}] {}: {}", elapsed_s, tag, record.target(), message)
    }
    else {
        format!("[{:10.6} {}] {}", elapsed_s, tag, message)
    }
}

fn level_tag(level: Level, coloured: bool) -> String {
    let tag = match level {
        Level::Trace => "TRC",
        Level::Debug => "DBG",
        Level::Info  => "INF",
        Level::Warn  => "WRN",
        Level::Error => "ERR"
    };

    if !coloured {
        return tag.to_string();
    }

    match level {
        Level::Trace => tag.dimmed().italic(),
        Level::Debug => tag.dimmed(),
        Level::Info  => tag.normal(),
        Level::Warn  => tag.yellow(),
        Level::Error => tag.red().bold()
    }.to_string()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
