// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::lifecycle::LifecycleError;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

/// Install the global subscriber, writing to `log_file` or stderr
///
/// `RUST_LOG` overrides the default `info` level. Keep the returned guard
/// alive until exit so buffered lines are flushed.
pub fn setup_logging(log_file: Option<&Path>) -> Result<WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let (writer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| LifecycleError::InvalidLogFile(path.to_path_buf()))?;
            std::fs::create_dir_all(dir)?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name))
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(log_file.is_none()))
        .init();

    Ok(guard)
}
