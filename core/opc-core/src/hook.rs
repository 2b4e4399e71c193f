//! Graceful degradation for host-triggered hooks.
//!
//! A hook that needs the OPC directory and cannot find one must look to the
//! host like a hook with nothing to do: it prints the continue sentinel and
//! exits successfully.
//!
//! ```text
//! Found(path) → returned to the caller, no output
//! NotFound    → {"result":"continue"} on stdout, exit 0
//! Err(fault)  → returned to the caller
//! ```

use crate::error::Result;
use crate::resolver::{resolve_with, ResolveInputs, Resolution};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::PathBuf;

/// Value of `result` telling the host to carry on normally.
pub const CONTINUE: &str = "continue";

/// Structured response written to the host on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookResponse {
    pub result: String,
}

impl HookResponse {
    /// The no-op response: let the host's flow continue.
    pub fn proceed() -> Self {
        Self {
            result: CONTINUE.to_string(),
        }
    }
}

/// Writes the continue sentinel followed by a newline.
pub fn emit_continue<W: Write>(writer: &mut W) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, &HookResponse::proceed())?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Resolves the OPC directory from the environment, or exits as a no-op.
///
/// Never returns when no directory is found.
pub fn require_or_exit() -> Result<PathBuf> {
    require_or_exit_with(&ResolveInputs::from_env())
}

pub fn require_or_exit_with(inputs: &ResolveInputs) -> Result<PathBuf> {
    match resolve_with(inputs)? {
        Resolution::Found { path, .. } => Ok(path),
        Resolution::NotFound => exit_continue(),
    }
}

fn exit_continue() -> ! {
    tracing::debug!("No OPC directory; exiting as no-op");
    let mut stdout = io::stdout().lock();
    // Exit 0 regardless: the host must never see this as a failure
    if let Err(err) = emit_continue(&mut stdout) {
        tracing::warn!(error = %err, "Failed to write continue sentinel");
    }
    std::process::exit(0)
}
