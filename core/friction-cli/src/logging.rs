//! Logging setup for the `friction` binary.
//!
//! stderr only shows warnings unless `FRICTION_DEBUG_LOG` is set, so command
//! output stays readable. The daily log file under `<root>/logs` follows
//! `RUST_LOG` and defaults to `info`.

use std::env;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEBUG_ENV: &str = "FRICTION_DEBUG_LOG";
const LOG_FILE_PREFIX: &str = "friction.log";

/// Installs the global subscriber. Keep the returned guard alive for the
/// whole process or buffered file lines are lost on exit.
pub fn init(logs_dir: Option<&Path>) -> Option<WorkerGuard> {
    let debug = debug_enabled(env::var(DEBUG_ENV).ok().as_deref());

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(if debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::WARN
        });

    let (file_layer, guard) = match logs_dir.and_then(prepare_dir) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter(debug))
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    guard
}

fn env_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("info,friction=debug,friction_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn debug_enabled(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "TRUE" | "yes" | "YES"))
}

fn prepare_dir(dir: &Path) -> Option<&Path> {
    match fs_err::create_dir_all(dir) {
        Ok(()) => Some(dir),
        Err(err) => {
            eprintln!("friction: file logging disabled: {}", err);
            None
        }
    }
}
