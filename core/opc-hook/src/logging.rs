//! Diagnostics for opc-hook.
//!
//! Stdout belongs to the host (resolved path or continue sentinel), so every
//! log line goes to stderr. Setting `OPC_HOOK_LOG_DIR` additionally appends to
//! a daily-rolling `opc-hook.log` in that directory, which is the only way to
//! see hook diagnostics the host swallows.
//!
//! Level: `OPC_DEBUG_LOG=1` forces debug, otherwise `RUST_LOG`, otherwise warn.
//!
//! Both writers are blocking. `require` can end in `std::process::exit`, which
//! never runs a worker guard's flush.

use std::env;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEBUG_ENV_VAR: &str = "OPC_DEBUG_LOG";
const LOG_DIR_ENV_VAR: &str = "OPC_HOOK_LOG_DIR";
const LOG_FILE_PREFIX: &str = "opc-hook.log";

pub fn init() {
    let file_layer = log_dir().and_then(|dir| {
        // An unusable log dir must not break the hook; stderr still works
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .build(dir)
            .ok()?;
        Some(fmt::layer().with_ansi(false).with_writer(appender))
    });

    let _ = tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();
}

fn filter() -> EnvFilter {
    if debug_enabled(env::var(DEBUG_ENV_VAR).ok().as_deref()) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn debug_enabled(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "TRUE" | "yes" | "YES"))
}

fn log_dir() -> Option<PathBuf> {
    env::var_os(LOG_DIR_ENV_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
