//! Error types for opc-core operations.
//!
//! Only unexpected faults live here. A missing env var, a missing config file,
//! malformed JSON or a nonexistent candidate path are not errors: the resolver
//! absorbs them and moves on to the next source.

use std::path::PathBuf;
use std::time::Duration;

/// All errors that can occur in opc-core operations.
#[derive(Debug, thiserror::Error)]
pub enum OpcError {
    // ─────────────────────────────────────────────────────────────────────
    // Filesystem Faults
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Script Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Invalid script name: {0}")]
    InvalidScriptName(String),

    #[error("Failed to spawn script {script} in {dir}: {source}")]
    ScriptSpawn {
        script: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Script {script} timed out after {}s", timeout.as_secs())]
    ScriptTimeout { script: String, timeout: Duration },
}

impl OpcError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        OpcError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Convenience type alias for Results using OpcError.
pub type Result<T> = std::result::Result<T, OpcError>;
