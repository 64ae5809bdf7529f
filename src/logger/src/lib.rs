// Copyright 2023 Pelikan Foundation LLC.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Logging for Pelikan clients.
//!
//! Library crates log through the `log` macros which are re-exported here, and
//! record one command log (klog) line per completed command with the `klog!`
//! macro. Binaries call `configure_logging` once at startup, which bridges
//! `log` records into `tracing` and routes them to the debug log and the
//! command log according to the configuration.

pub use log::*;

use config::{Debug, Klog};
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{EnvFilter, Targets};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;

/// Log target used for the command log.
pub const KLOG_TARGET: &str = "klog";

#[macro_export]
macro_rules! klog {
    ($($arg:tt)*) => (
        // error is the lowest level, so klog is only filtered if the level
        // filter is set to `off`
        $crate::error!(target: $crate::KLOG_TARGET, $($arg)*);
    )
}

/// Holds the background writers for file outputs. Buffered log lines are
/// flushed when this is dropped, so it must be kept alive for the lifetime of
/// the program.
pub struct LogDrain {
    _guards: Vec<WorkerGuard>,
}

/// Install the global logger. Returns an error if the log files cannot be
/// opened or if a global logger has already been installed.
pub fn configure_logging(debug: &Debug, klog: &Klog) -> Result<LogDrain, std::io::Error> {
    let mut guards = Vec::new();

    let debug_writer = match debug.log_file() {
        Some(file) => {
            let (writer, guard) = file_writer(&file)?;
            guards.push(guard);
            BoxMakeWriter::new(writer)
        }
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let debug_filter = EnvFilter::try_new(format!(
        "{},{}=off",
        debug.log_level().as_str(),
        KLOG_TARGET
    ))
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(debug_writer)
        .with_filter(debug_filter);

    let klog_layer = match klog.file() {
        Some(file) => {
            let (writer, guard) = file_writer(&file)?;
            guards.push(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(false)
                    .with_level(false)
                    .with_filter(Targets::new().with_target(KLOG_TARGET, tracing::Level::ERROR)),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(debug_layer)
        .with(klog_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    tracing_log::LogTracer::init()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    Ok(LogDrain { _guards: guards })
}

fn file_writer(file: &str) -> Result<(NonBlocking, WorkerGuard), std::io::Error> {
    let path = Path::new(file);

    let name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("log file path has no file name: {file}"),
        )
    })?;

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(directory)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(directory)
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("failed to open log file {file}: {e}"),
            )
        })?;

    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{ClientConfig, DebugConfig, KlogConfig};

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("logger-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).expect("failed to create scratch dir");
        dir
    }

    #[test]
    fn file_writer_opens_file() {
        let dir = scratch_dir("open");
        let file = dir.join("debug.log");

        let (_writer, _guard) = file_writer(&file.to_string_lossy()).expect("failed to open");
        assert!(file.is_file());
    }

    #[test]
    fn file_writer_rejects_directory() {
        let dir = scratch_dir("directory");
        assert!(file_writer(&dir.to_string_lossy()).is_err());
    }

    #[test]
    fn unusable_debug_log_is_an_error() {
        let dir = scratch_dir("debug");
        let config = ClientConfig::parse(&format!("[debug]\nlog_file = \"{}\"\n", dir.display()))
            .expect("config is valid");

        assert!(configure_logging(config.debug(), config.klog()).is_err());
    }

    #[test]
    fn unusable_klog_is_an_error() {
        let dir = scratch_dir("klog");
        let config = ClientConfig::parse(&format!(
            "[debug]\nlog_file = \"{}\"\n[klog]\nfile = \"{}\"\n",
            dir.join("debug.log").display(),
            dir.display()
        ))
        .expect("config is valid");

        assert!(configure_logging(config.debug(), config.klog()).is_err());
    }

    #[test]
    fn klog_target() {
        assert_eq!(KLOG_TARGET, "klog");
        // expands without a global logger installed
        klog!("\"set {} {} {} {}\" {} {}", "key", 0, 0, 5, 5, 24);
    }
}
